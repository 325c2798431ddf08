//! Domain entities representing core business objects.

pub mod pending;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use pending::{
    PendingEmailChange, PendingPasswordReset, PendingPayload, PendingRegistration,
    VerificationFlow,
};
pub use token::{Claims, TokenPair, ACCESS_TOKEN_EXPIRY_SECONDS, REFRESH_TOKEN_EXPIRY_SECONDS};
pub use user::{Gender, ProfileUpdate, Role, User};
