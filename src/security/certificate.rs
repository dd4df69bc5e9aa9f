//! Authority-signed certificates binding a subject's public key.
//!
//! A certificate is the canonical body, the delimiter, then the Base64 of the
//! authority's signature over `SHA-256(body)`:
//!
//! ```text
//! Signature Algorithm: DSA
//! Subject PublicKey:
//! <decimal public key>
//! Signature:
//! <base64 signature>
//! ```
//!
//! Issuing builds the body with [`encode_body`]; verifying hashes the received
//! body bytes as-is and finds the key after [`SUBJECT_LABEL`]. Both sides split
//! on the same [`SIGNATURE_DELIMITER`].

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

use super::dsa::{DigestSigner, DigestVerifier};
use super::keys::PublicKey;
use crate::error::{Error, Result};
use crate::storage;

pub const ALGORITHM_LINE: &str = "Signature Algorithm: DSA";
pub const SUBJECT_LABEL: &str = "Subject PublicKey:";
pub const SIGNATURE_DELIMITER: &str = "\nSignature:\n";

/// The signed portion of a certificate for `subject`.
pub fn encode_body(subject: &PublicKey) -> String {
    format!("{}\n{}\n{}", ALGORITHM_LINE, SUBJECT_LABEL, subject.value())
}

/// SHA-256 of the exact body bytes.
pub fn body_digest(body: &[u8]) -> Vec<u8> {
    Sha256::digest(body).to_vec()
}

/// Raw certificate bytes as issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate(Vec<u8>);

impl Certificate {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Certificate(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_atomic(path, &self.0)
    }

    pub fn load(path: &Path) -> Result<Self> {
        storage::read_bytes(path).map(Certificate)
    }
}

/// A subject key taken from a certificate whose signature checked out.
///
/// Only [`verify_certificate`] constructs one, so holding it proves the check ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPublicKey(PublicKey);

impl VerifiedPublicKey {
    pub fn public_key(&self) -> &PublicKey {
        &self.0
    }

    pub fn value(&self) -> &BigUint {
        self.0.value()
    }
}

/// Outcome of checking a well-formed certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateStatus {
    Verified(VerifiedPublicKey),
    Rejected,
}

impl CertificateStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, CertificateStatus::Verified(_))
    }

    pub fn subject(&self) -> Option<&PublicKey> {
        match self {
            CertificateStatus::Verified(key) => Some(key.public_key()),
            CertificateStatus::Rejected => None,
        }
    }

    pub fn into_verified(self) -> Option<VerifiedPublicKey> {
        match self {
            CertificateStatus::Verified(key) => Some(key),
            CertificateStatus::Rejected => None,
        }
    }
}

/// Signs the canonical body for `subject` with the authority key.
pub fn issue_certificate<S>(
    subject: &PublicKey,
    authority: &S,
    rng: &mut dyn CryptoRngCore,
) -> Result<Certificate>
where
    S: DigestSigner + ?Sized,
{
    let body = encode_body(subject);
    let digest = body_digest(body.as_bytes());
    let signature = authority.sign_digest(&digest, rng)?;

    let mut bytes = body.into_bytes();
    bytes.extend_from_slice(SIGNATURE_DELIMITER.as_bytes());
    bytes.extend_from_slice(STANDARD.encode(&signature).as_bytes());
    info!("issued certificate ({} bytes)", bytes.len());
    Ok(Certificate(bytes))
}

/// Splits at the first delimiter into `(body, encoded signature)`.
pub fn split_certificate(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let delim = SIGNATURE_DELIMITER.as_bytes();
    let pos = bytes
        .windows(delim.len())
        .position(|w| w == delim)
        .ok_or_else(|| Error::decode("certificate has no signature delimiter"))?;
    Ok((&bytes[..pos], &bytes[pos + delim.len()..]))
}

/// Reads the decimal subject key following the label in a certificate body.
pub fn extract_subject(body: &[u8]) -> Result<PublicKey> {
    let label = SUBJECT_LABEL.as_bytes();
    let after_label = body
        .windows(label.len())
        .position(|w| w == label)
        .map(|pos| &body[pos + label.len()..])
        .ok_or_else(|| Error::decode("certificate body has no subject label"))?;
    let digits_start = after_label
        .iter()
        .position(u8::is_ascii_digit)
        .ok_or_else(|| Error::decode("certificate body has no subject key digits"))?;
    let digits = after_label[digits_start..].trim_ascii();
    BigUint::parse_bytes(digits, 10)
        .map(PublicKey::from_value)
        .ok_or_else(|| Error::decode("subject key is not a decimal integer"))
}

/// Checks the authority's signature and, on success, returns the subject key.
///
/// A missing delimiter or, after a valid signature, a missing subject key is a
/// `Decode` error. Any signature that does not verify, including one that is
/// not valid Base64, yields `Rejected`.
pub fn verify_certificate<V>(bytes: &[u8], authority: &V) -> Result<CertificateStatus>
where
    V: DigestVerifier + ?Sized,
{
    let (body, encoded) = split_certificate(bytes)?;

    let compact: Vec<u8> = encoded
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let signature = match STANDARD.decode(&compact) {
        Ok(sig) => sig,
        Err(e) => {
            warn!("certificate rejected: signature is not valid base64 ({})", e);
            return Ok(CertificateStatus::Rejected);
        }
    };

    let digest = body_digest(body);
    if !authority.verify_digest(&digest, &signature)? {
        warn!("certificate rejected: signature does not match");
        return Ok(CertificateStatus::Rejected);
    }

    let subject = extract_subject(body)?;
    debug!("certificate verified for subject key of {} bits", subject.value().bits());
    Ok(CertificateStatus::Verified(VerifiedPublicKey(subject)))
}
