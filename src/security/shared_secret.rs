use std::path::Path;

use num_bigint::BigUint;
use num_traits::One;
use sha2::{Digest, Sha256};

use super::certificate::VerifiedPublicKey;
use super::keys::PrivateKey;
use crate::error::{Error, Result};
use crate::math::mod_exp;
use crate::storage;

/// Diffie-Hellman session key material: `peer_public^my_private mod p`.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(BigUint);

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret({})", self.fingerprint())
    }
}

impl SharedSecret {
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Hex SHA-256 of the secret's persisted record, for out-of-band comparison.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(storage::encode_records(&[&self.0])))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        storage::write_integer(path, &self.0)
    }

    pub fn load(path: &Path) -> Result<Self> {
        storage::read_integer(path).map(SharedSecret)
    }
}

/// Combines a certified peer key with the local private scalar.
///
/// The peer value must lie in `[2, p-2]`; `0`, `1` and `p-1` would pin the
/// secret to a trivially guessable value. A modulus below 5 leaves that range
/// empty and is rejected outright.
pub fn derive_shared_secret(
    peer: &VerifiedPublicKey,
    mine: &PrivateKey,
    p: &BigUint,
) -> Result<SharedSecret> {
    if p < &BigUint::from(5u32) {
        return Err(Error::invalid_argument(format!("modulus {} is too small", p)));
    }
    let y = peer.value();
    if y <= &BigUint::one() || y + 1u32 >= *p {
        return Err(Error::invalid_argument("peer public key outside [2, p-2]"));
    }
    mod_exp(y, mine.value(), p).map(SharedSecret)
}
