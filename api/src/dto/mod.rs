//! Data transfer objects for the HTTP surface

pub mod auth;
pub mod profile;

pub use auth::{
    CheckCredentialsResponse, CodeSentResponse, ForgetPasswordRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, TokenResponse, VerifyEmailRequest,
};
pub use profile::{
    ChangeEmailRequest, ChangePasswordRequest, UpdateProfileRequest, UserResponse,
    VerifyNewEmailRequest,
};
