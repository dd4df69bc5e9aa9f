//! DSA signatures for the certificate authority.
//!
//! The authority's domain parameters come from the same `(p, q, g)` construction
//! used for the key exchange. Signatures are computed over a message digest
//! whose leftmost `bits(q)` bits are taken as the integer `h`, and are encoded
//! as `r || s`, each left-padded to the byte length of `q`.

use std::path::Path;

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng};
use rand_core::CryptoRngCore;

use super::keys::derive_private;
use super::params::DomainParameters;
use crate::error::{Error, Result};
use crate::math::{mod_exp, mod_inverse, random_in_range, to_fixed_be};
use crate::storage;

/// Signs a digest produced by the hash primitive.
pub trait DigestSigner {
    fn sign_digest(&self, digest: &[u8], rng: &mut dyn CryptoRngCore) -> Result<Vec<u8>>;
}

/// Checks a signature over a digest. `Ok(false)` means the signature does not match.
pub trait DigestVerifier {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool>;
}

/// A DSA private key: domain parameters and `x` in `[1, q-1]`.
#[derive(Clone)]
pub struct DsaSigningKey {
    params: DomainParameters,
    x: BigUint,
}

/// A DSA public key: domain parameters and `y = g^x mod p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaVerifyingKey {
    params: DomainParameters,
    y: BigUint,
}

/// An authority key pair.
#[derive(Clone)]
pub struct DsaKeyPair {
    pub signing: DsaSigningKey,
    pub verifying: DsaVerifyingKey,
}

impl DsaKeyPair {
    /// Picks `x` in `[1, q-1]` and computes `y = g^x mod p`.
    pub fn generate<R>(params: &DomainParameters, rng: &mut R) -> Result<Self>
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let x = derive_private(&params.q, rng)?.value().clone();
        let y = mod_exp(&params.g, &x, &params.p)?;
        Ok(DsaKeyPair {
            signing: DsaSigningKey {
                params: params.clone(),
                x,
            },
            verifying: DsaVerifyingKey {
                params: params.clone(),
                y,
            },
        })
    }
}

fn q_len(params: &DomainParameters) -> usize {
    (params.q.bits() as usize).div_ceil(8)
}

/// Leftmost `bits(q)` bits of the digest as an integer.
fn digest_to_int(digest: &[u8], q: &BigUint) -> BigUint {
    let h = BigUint::from_bytes_be(digest);
    let digest_bits = digest.len() as u64 * 8;
    let q_bits = q.bits();
    if digest_bits > q_bits {
        h >> (digest_bits - q_bits)
    } else {
        h
    }
}

fn load_key_file(path: &Path) -> Result<(DomainParameters, BigUint)> {
    let mut v = storage::read_integers(path, 4)?.into_iter();
    match (v.next(), v.next(), v.next(), v.next()) {
        (Some(p), Some(q), Some(g), Some(k)) => Ok((DomainParameters { p, q, g }, k)),
        _ => Err(Error::decode(format!(
            "{}: expected p, q, g and key records",
            path.display()
        ))),
    }
}

impl DsaSigningKey {
    pub fn params(&self) -> &DomainParameters {
        &self.params
    }

    /// The public key matching this private key.
    pub fn verifying_key(&self) -> Result<DsaVerifyingKey> {
        let y = mod_exp(&self.params.g, &self.x, &self.params.p)?;
        Ok(DsaVerifyingKey {
            params: self.params.clone(),
            y,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let DomainParameters { p, q, g } = &self.params;
        storage::write_integers(path, &[p, q, g, &self.x])
    }

    /// Loads a key file and checks `x` lies in `[1, q-1]`.
    pub fn load(path: &Path) -> Result<Self> {
        let (params, x) = load_key_file(path)?;
        if x.is_zero() || x >= params.q {
            return Err(Error::crypto(format!(
                "{}: private exponent outside [1, q-1]",
                path.display()
            )));
        }
        Ok(DsaSigningKey { params, x })
    }
}

impl DsaVerifyingKey {
    pub fn params(&self) -> &DomainParameters {
        &self.params
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let DomainParameters { p, q, g } = &self.params;
        storage::write_integers(path, &[p, q, g, &self.y])
    }

    /// Loads a key file and checks `1 < y < p`.
    pub fn load(path: &Path) -> Result<Self> {
        let (params, y) = load_key_file(path)?;
        if y <= BigUint::one() || y >= params.p {
            return Err(Error::crypto(format!(
                "{}: public value outside (1, p)",
                path.display()
            )));
        }
        Ok(DsaVerifyingKey { params, y })
    }
}

impl DigestSigner for DsaSigningKey {
    fn sign_digest(&self, digest: &[u8], rng: &mut dyn CryptoRngCore) -> Result<Vec<u8>> {
        let DomainParameters { p, q, g } = &self.params;
        if q <= &BigUint::one() {
            return Err(Error::crypto("signing key has a degenerate subgroup order"));
        }
        let h = digest_to_int(digest, q);
        let q_minus_one = q - 1u32;

        // a fresh k per attempt; r = 0 or s = 0 forces a retry
        for attempt in 1..=64 {
            let k = random_in_range(rng, &BigUint::one(), &q_minus_one)?;
            let r = mod_exp(g, &k, p)? % q;
            if r.is_zero() {
                continue;
            }
            let k_inv = mod_inverse(&k, q)
                .ok_or_else(|| Error::crypto("ephemeral k has no inverse modulo q"))?;
            let s = (&k_inv * ((&h + &self.x * &r) % q)) % q;
            if s.is_zero() {
                continue;
            }
            debug!("signature produced on attempt {}", attempt);
            let len = q_len(&self.params);
            let mut sig = to_fixed_be(&r, len)?;
            sig.extend(to_fixed_be(&s, len)?);
            return Ok(sig);
        }
        Err(Error::crypto("could not produce a non-degenerate signature"))
    }
}

impl DigestVerifier for DsaVerifyingKey {
    fn verify_digest(&self, digest: &[u8], signature: &[u8]) -> Result<bool> {
        let DomainParameters { p, q, g } = &self.params;
        let len = q_len(&self.params);
        if signature.len() != 2 * len {
            debug!(
                "signature is {} bytes, expected {}",
                signature.len(),
                2 * len
            );
            return Ok(false);
        }
        let (r_bytes, s_bytes) = signature.split_at(len);
        let r = BigUint::from_bytes_be(r_bytes);
        let s = BigUint::from_bytes_be(s_bytes);

        // 0 < r, s < q
        if r.is_zero() || &r >= q || s.is_zero() || &s >= q {
            debug!("signature component out of range");
            return Ok(false);
        }

        let w = match mod_inverse(&s, q) {
            Some(w) => w,
            None => return Ok(false),
        };
        let h = digest_to_int(digest, q);
        let u1 = (&h * &w) % q;
        let u2 = (&r * &w) % q;

        // v = ((g^u1 * y^u2) mod p) mod q
        let v = (mod_exp(g, &u1, p)? * mod_exp(&self.y, &u2, p)?) % p % q;
        Ok(v == r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use sha2::{Digest, Sha256};

    use crate::config::ParamsConfig;

    fn authority(seed: u64) -> (DsaKeyPair, StdRng) {
        let cfg = ParamsConfig::new(256, 160).with_seed(seed);
        let mut rng = cfg.rng();
        let params = DomainParameters::generate(&cfg, &mut rng).unwrap();
        let pair = DsaKeyPair::generate(&params, &mut rng).unwrap();
        (pair, rng)
    }

    #[test]
    fn test_sign_verify() {
        let (ca, mut rng) = authority(42);
        let digest = Sha256::digest(b"Signature Algorithm: DSA");
        let sig = ca.signing.sign_digest(&digest, &mut rng).unwrap();
        assert_eq!(sig.len(), 40);
        assert!(ca.verifying.verify_digest(&digest, &sig).unwrap());

        let other = Sha256::digest(b"Signature Algorithm: RSA");
        assert!(!ca.verifying.verify_digest(&other, &sig).unwrap());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (ca, mut rng) = authority(7);
        let digest = Sha256::digest(b"payload");
        let sig = ca.signing.sign_digest(&digest, &mut rng).unwrap();
        for i in 0..sig.len() {
            let mut bad = sig.clone();
            bad[i] ^= 0x01;
            assert!(
                !ca.verifying.verify_digest(&digest, &bad).unwrap(),
                "flip at byte {} must be rejected",
                i
            );
        }
        assert!(!ca.verifying.verify_digest(&digest, &sig[1..]).unwrap());
        assert!(!ca.verifying.verify_digest(&digest, &[0u8; 40]).unwrap());
    }

    #[test]
    fn test_wrong_authority_rejected() {
        let (ca, mut rng) = authority(1);
        let (other, _) = authority(2);
        let digest = Sha256::digest(b"payload");
        let sig = ca.signing.sign_digest(&digest, &mut rng).unwrap();
        assert!(!other.verifying.verify_digest(&digest, &sig).unwrap());
    }

    #[test]
    fn test_digest_truncation() {
        let q = BigUint::from(0xffffu32); // 16 bits
        let digest = [0xab, 0xcd, 0xef, 0x01];
        assert_eq!(digest_to_int(&digest, &q), BigUint::from(0xabcdu32));
        assert_eq!(digest_to_int(&digest[..1], &q), BigUint::from(0xabu32));
    }

    #[test]
    fn test_key_files() {
        let dir = tempfile::tempdir().unwrap();
        let (ca, mut rng) = authority(3);
        let priv_path = dir.path().join("CA_Priv.bin");
        let pub_path = dir.path().join("CA_Pub.bin");
        ca.signing.save(&priv_path).unwrap();
        ca.verifying.save(&pub_path).unwrap();

        let signing = DsaSigningKey::load(&priv_path).unwrap();
        let verifying = DsaVerifyingKey::load(&pub_path).unwrap();
        assert_eq!(signing.verifying_key().unwrap(), verifying);

        let digest = Sha256::digest(b"reloaded");
        let sig = signing.sign_digest(&digest, &mut rng).unwrap();
        assert!(verifying.verify_digest(&digest, &sig).unwrap());
    }

    #[test]
    fn test_corrupt_key_file_is_crypto_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CA_Pub.bin");
        let p = BigUint::from(23u32);
        let q = BigUint::from(11u32);
        let g = BigUint::from(4u32);
        storage::write_integers(&path, &[&p, &q, &g, &BigUint::one()]).unwrap();
        assert!(matches!(DsaVerifyingKey::load(&path), Err(Error::Crypto(_))));

        storage::write_integers(&path, &[&p, &q, &g]).unwrap();
        assert!(matches!(DsaVerifyingKey::load(&path), Err(Error::Decode(_))));
    }
}
