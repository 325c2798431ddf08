//! Main authentication service implementation

use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use dl_shared::utils::email::{mask_email, normalize_email};

use crate::domain::entities::pending::{PendingEmailChange, PendingPasswordReset, PendingRegistration};
use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{ProfileUpdate, Role, User};
use crate::errors::{AuthError, DomainError, DomainResult, VerificationError};
use crate::repositories::UserRepository;
use crate::services::password::PasswordService;
use crate::services::token::TokenService;
use crate::services::verification::{
    CodeStoreTrait, IssuedCode, MailServiceTrait, VerificationService,
};

use super::types::{validate_password, LoginResult, RegistrationRequest};

/// Hashed once and compared against when no account matches a login
const DUMMY_PASSWORD: &str = "no-account-has-this-password";

/// Authentication service driving every credential flow
pub struct AuthService<U, M, C>
where
    U: UserRepository,
    M: MailServiceTrait,
    C: CodeStoreTrait,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Verification service for email codes
    verification_service: Arc<VerificationService<M, C>>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// bcrypt hashing and comparison
    password_service: PasswordService,
    /// Hash at the configured cost, verified on unknown-email logins
    pub(super) dummy_hash: OnceCell<String>,
}

impl<U, M, C> AuthService<U, M, C>
where
    U: UserRepository,
    M: MailServiceTrait,
    C: CodeStoreTrait,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `verification_service` - Service for email verification codes
    /// * `token_service` - Service for JWT token management
    /// * `password_service` - bcrypt hasher with the configured cost
    pub fn new(
        user_repository: Arc<U>,
        verification_service: Arc<VerificationService<M, C>>,
        token_service: Arc<TokenService>,
        password_service: PasswordService,
    ) -> Self {
        Self {
            user_repository,
            verification_service,
            token_service,
            password_service,
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    /// Start a customer registration
    pub async fn register_user(&self, request: RegistrationRequest) -> DomainResult<IssuedCode> {
        self.register(request, Role::User).await
    }

    /// Start a courier registration
    pub async fn register_courier(&self, request: RegistrationRequest) -> DomainResult<IssuedCode> {
        self.register(request, Role::Courier).await
    }

    /// Hash the password, park the registration in the cache and mail a code
    ///
    /// Nothing is written to the credential store until `verify_email`.
    async fn register(&self, request: RegistrationRequest, role: Role) -> DomainResult<IssuedCode> {
        validate_password(&request.password)?;
        let email = normalize_email(&request.email);

        if self.user_repository.exists_active_email(&email).await? {
            tracing::info!(email = %mask_email(&email), event = "registration_email_taken", "Registration for an email already in use");
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let password_hash = self.password_service.hash(&request.password).await?;
        let pending = PendingRegistration {
            user_id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            email,
            password_hash,
            role,
        };

        let issued = self.verification_service.issue(&pending).await?;

        tracing::info!(
            user_id = %pending.user_id,
            role = %role,
            event = "registration_started",
            "Registration awaiting email confirmation"
        );
        Ok(issued)
    }

    /// Consume a registration code and persist the account
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored account
    /// * `Err(DomainError)` - `NotFound` for an unknown, expired or replayed
    ///   code, `Unauthorized` when the code belongs to another email,
    ///   `Conflict` when the email was taken in the meantime
    pub async fn verify_email(&self, email: &str, code: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        let pending: PendingRegistration = self.verification_service.consume(code, &email, None).await?;

        let user = self
            .user_repository
            .create(User::from_registration(pending))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, event = "user_registered", "User registered");
        Ok(user)
    }

    /// Authenticate with email and password
    ///
    /// Unknown email, deleted account and wrong password produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginResult> {
        let user = self.authenticate(email, password).await?;
        let tokens = self.issue_tokens(&user)?;

        tracing::info!(user_id = %user.id, event = "login_succeeded", "User logged in");
        Ok(LoginResult { user, tokens })
    }

    /// Check an email/password pair without issuing tokens
    pub async fn check_credentials(&self, email: &str, password: &str) -> DomainResult<bool> {
        match self.authenticate(email, password).await {
            Ok(_) => Ok(true),
            Err(DomainError::Auth(AuthError::InvalidCredentials)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Exchange a valid token for a new pair carrying the account's current
    /// email and role
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.token_service.verify(refresh_token)?;

        let user = self
            .user_repository
            .find_active_by_id(claims.id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        tracing::debug!(user_id = %user.id, event = "token_refreshed", "Token pair refreshed");
        self.issue_tokens(&user)
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        validate_password(new_password)?;
        let mut user = self.active_user(user_id).await?;

        if !self.password_service.verify(current_password, &user.password_hash).await {
            tracing::warn!(user_id = %user_id, event = "password_change_rejected", "Current password did not match");
            return Err(AuthError::IncorrectCurrentPassword.into());
        }

        let hash = self.password_service.hash(new_password).await?;
        user.set_password_hash(hash);
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user_id, event = "password_changed", "Password changed");
        Ok(())
    }

    /// Mail a password reset code
    ///
    /// Succeeds silently for unknown emails, so the response does not reveal
    /// which addresses are registered.
    pub async fn forget_password(&self, email: &str) -> DomainResult<Option<IssuedCode>> {
        let email = normalize_email(email);

        if self.user_repository.find_active_by_email(&email).await?.is_none() {
            tracing::info!(email = %mask_email(&email), event = "password_reset_unknown_email", "Password reset requested for unknown email");
            return Ok(None);
        }

        let issued = self
            .verification_service
            .issue(&PendingPasswordReset { email })
            .await?;
        Ok(Some(issued))
    }

    /// Consume a reset code and set a new password
    ///
    /// Any code problem (unknown, expired, replayed, other email) is reported
    /// as `Unauthorized`.
    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> DomainResult<()> {
        validate_password(new_password)?;
        let email = normalize_email(email);

        let pending: PendingPasswordReset = self
            .verification_service
            .consume(code, &email, None)
            .await
            .map_err(|e| match e {
                DomainError::Verification(VerificationError::CodeNotFound)
                | DomainError::Verification(VerificationError::Mismatch) => {
                    DomainError::Auth(AuthError::InvalidResetCode)
                }
                other => other,
            })?;

        let mut user = self
            .user_repository
            .find_active_by_email(&pending.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let hash = self.password_service.hash(new_password).await?;
        user.set_password_hash(hash);
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user.id, event = "password_reset", "Password reset with code");
        Ok(())
    }

    /// Mail a code to `new_email` confirming the change
    pub async fn change_email(&self, user_id: Uuid, new_email: &str) -> DomainResult<IssuedCode> {
        let new_email = normalize_email(new_email);
        let user = self.active_user(user_id).await?;

        if user.email == new_email {
            return Err(DomainError::validation("New email must differ from the current one"));
        }
        if self.user_repository.exists_active_email(&new_email).await? {
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        self.verification_service
            .issue(&PendingEmailChange { user_id, new_email })
            .await
    }

    /// Consume an email change code, update the address and issue tokens
    /// carrying the new email
    pub async fn verify_new_email(&self, user_id: Uuid, new_email: &str, code: &str) -> DomainResult<TokenPair> {
        let new_email = normalize_email(new_email);
        let pending: PendingEmailChange = self
            .verification_service
            .consume(code, &new_email, Some(user_id))
            .await?;

        let mut user = self.active_user(user_id).await?;
        user.change_email(pending.new_email);
        self.user_repository.update(&user).await?;

        tracing::info!(user_id = %user_id, event = "email_changed", "Email address changed");
        self.issue_tokens(&user)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> DomainResult<User> {
        self.active_user(user_id).await
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> DomainResult<User> {
        let mut user = self.active_user(user_id).await?;
        user.apply_profile(update);
        self.user_repository.update(&user).await?;
        Ok(user)
    }

    /// Soft delete the caller's own account
    pub async fn delete_profile(&self, user_id: Uuid) -> DomainResult<()> {
        if !self.user_repository.soft_delete(user_id).await? {
            return Err(AuthError::UserNotFound.into());
        }
        tracing::info!(user_id = %user_id, event = "account_deleted", "Account deleted by owner");
        Ok(())
    }

    /// All active accounts. Admin only.
    pub async fn list_users(&self, actor_id: Uuid) -> DomainResult<Vec<User>> {
        self.require_admin(actor_id).await?;
        self.user_repository.list_active().await
    }

    /// Soft delete any account. Admin only.
    pub async fn delete_user(&self, actor_id: Uuid, target_id: Uuid) -> DomainResult<()> {
        self.require_admin(actor_id).await?;
        if !self.user_repository.soft_delete(target_id).await? {
            return Err(AuthError::UserNotFound.into());
        }
        tracing::info!(actor_id = %actor_id, user_id = %target_id, event = "account_deleted_by_admin", "Account deleted by admin");
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);

        let user = match self.user_repository.find_active_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Same bcrypt work as a wrong password
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| self.password_service.hash(DUMMY_PASSWORD))
                    .await?;
                self.password_service.verify(password, dummy).await;

                tracing::info!(email = %mask_email(&email), event = "login_failed", "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.password_service.verify(password, &user.password_hash).await {
            tracing::info!(email = %mask_email(&email), event = "login_failed", "Login failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(user)
    }

    /// The role is read from the stored account, not the token
    async fn require_admin(&self, actor_id: Uuid) -> DomainResult<()> {
        let actor = self
            .user_repository
            .find_active_by_id(actor_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if actor.role != Role::Admin {
            tracing::warn!(user_id = %actor_id, role = %actor.role, event = "admin_access_denied", "Admin operation refused");
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(())
    }

    async fn active_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_active_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    fn issue_tokens(&self, user: &User) -> DomainResult<TokenPair> {
        self.token_service.issue_pair(user.id, &user.email, user.role)
    }
}
