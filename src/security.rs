//! DISCLAIMER: a teaching implementation of authenticated finite-field
//! Diffie-Hellman. It is not constant time and not audited. Use a vetted
//! cryptography library for anything security-sensitive.

pub mod certificate;
pub mod dsa;
pub mod keys;
pub mod params;
pub mod shared_secret;

// Re-export domain parameter functionality
pub use params::{find_generator, generate_p, generate_q, DomainParameters};

// Re-export key pair functionality
pub use keys::{derive_private, derive_public, KeyPair, PrivateKey, PublicKey};

// Re-export DSA functionality
pub use dsa::{DigestSigner, DigestVerifier, DsaKeyPair, DsaSigningKey, DsaVerifyingKey};

// Re-export certificate functionality
pub use certificate::{
    encode_body, extract_subject, issue_certificate, split_certificate, verify_certificate,
    Certificate, CertificateStatus, VerifiedPublicKey, SIGNATURE_DELIMITER,
};

// Re-export shared secret functionality
pub use shared_secret::{derive_shared_secret, SharedSecret};
