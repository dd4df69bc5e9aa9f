pub mod cli;
pub mod config;
pub mod error;
pub mod math;
pub mod security;
pub mod storage;

pub use config::{ArtifactPaths, ParamsConfig, Party};
pub use error::{Error, Result};
pub use math::{is_probable_prime, mod_exp};
pub use security::{
    derive_shared_secret, issue_certificate, verify_certificate, CertificateStatus,
    DomainParameters, KeyPair,
};
