//! Signup, login, and logout.

pub mod service;

pub use service::{AuthService, LoginOutcome, SignupCommand};
