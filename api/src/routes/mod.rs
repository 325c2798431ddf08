//! Route handlers grouped by audience
//!
//! - `auth` - public registration, login and password reset
//! - `profile` - the caller's own account, behind `JwtAuth`
//! - `admin` - account administration, behind `JwtAuth` and the admin role
//! - `health` - liveness probe

pub mod admin;
pub mod auth;
pub mod health;
pub mod profile;
