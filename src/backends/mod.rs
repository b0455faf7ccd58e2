//! Secret store backends
//!
//! The rotation only ever writes, so backends are reached through the narrow
//! [`SecretWriter`] capability.

mod secret_writer;
mod vault;

pub use secret_writer::SecretWriter;
pub use vault::VaultClient;
