//! Credential adapters.
//!
//! Implementations of the `CredentialProvider` port:
//!
//! - `StaticCredential` - fixed token from configuration, or anonymous
//! - `TokenFileCredential` - token file re-read on every request
//! - `MockCredentialProvider` - mutable token for tests
//! - `ConfiguredCredential` - static or token-file source, chosen at startup

mod configured;
mod mock;
mod static_credential;
mod token_file;

pub use configured::ConfiguredCredential;
pub use mock::MockCredentialProvider;
pub use static_credential::StaticCredential;
pub use token_file::TokenFileCredential;
