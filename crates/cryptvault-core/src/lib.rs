pub mod config;
pub mod error;
pub mod password;
pub mod paths;
pub mod preview;
pub mod stats;

pub use error::{VaultError, VaultResult};
