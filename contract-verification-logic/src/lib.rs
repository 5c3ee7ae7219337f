pub mod client;
pub mod compiler;
pub mod error;
pub mod repository;
pub mod settings;
#[cfg(test)]
pub mod test_utils;
pub mod token;
pub mod types;
pub mod verifier;

pub use client::Client;
pub use error::{ParseError, ServiceError};
pub use settings::VerificationSettings;
