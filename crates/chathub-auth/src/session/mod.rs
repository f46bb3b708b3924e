//! Session lifecycle bound to the revocation store.

pub mod manager;

pub use manager::{IssuedToken, SessionManager};
