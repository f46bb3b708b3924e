//! Session token claims and codec.

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::{JwtCodec, TokenCodec};
