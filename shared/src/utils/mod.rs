//! Common utility functions

pub mod email;

pub use email::*;
