use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::{bail, Context};
use tracing_actix_web::TracingLogger;

use dl_api::config::{Config, StorageBackend};
use dl_api::telemetry::init_tracing;
use dl_api::{create_app, AppState};
use dl_core::repositories::UserRepository;
use dl_core::services::verification::{CodeStoreTrait, MailServiceTrait};
use dl_core::services::{
    AuthService, PasswordService, TokenService, TokenServiceConfig, VerificationService,
    VerificationServiceConfig,
};
use dl_infra::{
    DatabasePool, InMemoryCodeStore, InMemoryUserRepository, MailDispatcher, MySqlUserRepository,
    RedisClient, RedisCodeStore,
};
use dl_shared::ServerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("configuration rejected")?;
    init_tracing(&config.app.logging)?;

    let app = &config.app;
    tracing::info!(
        environment = %app.environment,
        storage = ?config.storage,
        mail_provider = %app.mail.provider,
        "Starting Auth service"
    );

    if app.auth.jwt.is_using_default_secret() {
        if app.environment.is_production() {
            bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("Using the built-in development JWT secret");
    }

    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from_jwt_config(&app.auth.jwt)?)?);
    let password_service = PasswordService::new(app.auth.bcrypt_cost);
    let mail_service = Arc::new(MailDispatcher::from_config(&app.mail)?);
    let verification_config = VerificationServiceConfig::from(&app.verification);

    match config.storage {
        StorageBackend::MySql => {
            let pool = DatabasePool::new(app.database.clone())
                .await
                .context("failed to connect to MySQL")?;
            if app.database.run_migrations {
                pool.run_migrations().await?;
            }
            let redis = RedisClient::new(app.cache.clone())
                .await
                .context("failed to connect to Redis")?;

            if !pool.health_check().await? {
                bail!("MySQL did not answer the readiness query");
            }
            if !redis.health_check().await? {
                bail!("Redis did not answer PING");
            }
            tracing::info!("Storage backends ready");

            let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
            let codes = Arc::new(RedisCodeStore::new(redis));
            let verification = Arc::new(VerificationService::new(mail_service, codes, verification_config));
            let auth_service = Arc::new(AuthService::new(users, verification, token_service, password_service));

            serve(&app.server, auth_service).await?;
            pool.close().await;
        }
        StorageBackend::Memory => {
            tracing::warn!("In-memory storage selected, accounts and codes are lost on restart");

            let users = Arc::new(InMemoryUserRepository::new());
            let codes = Arc::new(InMemoryCodeStore::new());
            let verification = Arc::new(VerificationService::new(mail_service, codes, verification_config));
            let auth_service = Arc::new(AuthService::new(users, verification, token_service, password_service));

            serve(&app.server, auth_service).await?;
        }
    }

    tracing::info!("Auth service stopped");
    Ok(())
}

async fn serve<U, M, C>(server: &ServerConfig, auth_service: Arc<AuthService<U, M, C>>) -> std::io::Result<()>
where
    U: UserRepository + 'static,
    M: MailServiceTrait + 'static,
    C: CodeStoreTrait + 'static,
{
    let state = web::Data::new(AppState::new(auth_service));
    let max_payload_size = server.max_payload_size;

    let mut http = HttpServer::new(move || {
        create_app(state.clone(), max_payload_size).wrap(TracingLogger::default())
    });
    if server.workers > 0 {
        http = http.workers(server.workers);
    }

    let address = server.bind_address();
    tracing::info!(address = %address, "Listening");
    http.bind(&address)?.run().await
}
