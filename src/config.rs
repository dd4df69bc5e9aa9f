//! Tunables and artifact locations.
//!
//! Round counts and attempt caps default to the values every artifact in an
//! exchange has been generated with; bit sizes have no default and must be
//! chosen by the caller.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::{rngs::StdRng, SeedableRng};

use crate::error::{Error, Result};

/// Miller-Rabin rounds used when searching for `q`.
pub const Q_ROUNDS: usize = 10;
/// Miller-Rabin rounds used when searching for `p`.
pub const P_ROUNDS: usize = 20;
/// Candidates tried by the generator search before giving up.
pub const GENERATOR_ATTEMPTS: usize = 100;
/// Candidates tried by each prime search before giving up.
pub const MAX_PRIME_CANDIDATES: usize = 100_000;

/// Configuration to generate domain parameters `(p, q, g)`.
#[derive(Debug, Clone)]
pub struct ParamsConfig {
    /// Bit length of the field modulus `p`.
    pub p_bits: usize,
    /// Bit length of the subgroup order `q`.
    pub q_bits: usize,
    /// Miller-Rabin rounds for `q`.
    pub q_rounds: usize,
    /// Miller-Rabin rounds for `p`.
    pub p_rounds: usize,
    /// Attempts allowed for the generator search.
    pub generator_attempts: usize,
    /// Attempts allowed for each of the `q` and `p` searches.
    pub max_prime_candidates: usize,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl ParamsConfig {
    pub fn new(p_bits: usize, q_bits: usize) -> Self {
        ParamsConfig {
            p_bits,
            q_bits,
            q_rounds: Q_ROUNDS,
            p_rounds: P_ROUNDS,
            generator_attempts: GENERATOR_ATTEMPTS,
            max_prime_candidates: MAX_PRIME_CANDIDATES,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the process RNG this configuration asks for.
    pub fn rng(&self) -> StdRng {
        rng_from_seed(self.seed)
    }
}

/// A seeded `StdRng` when `seed` is given, otherwise one drawn from OS entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// One of the two exchanging parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Alice,
    Bob,
}

impl Party {
    /// Suffix used in the party's artifact file names.
    pub fn tag(self) -> char {
        match self {
            Party::Alice => 'A',
            Party::Bob => 'B',
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Alice => f.write_str("Alice"),
            Party::Bob => f.write_str("Bob"),
        }
    }
}

impl FromStr for Party {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alice" => Ok(Party::Alice),
            "bob" => Ok(Party::Bob),
            "" => Err(Error::invalid_argument("empty party name")),
            other => Err(Error::invalid_argument(format!(
                "unknown party '{}', expected Alice or Bob",
                other
            ))),
        }
    }
}

/// File names of every artifact in one exchange, rooted at a directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        ArtifactPaths::new(".")
    }
}

impl ArtifactPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactPaths { root: root.into() }
    }

    pub fn params(&self) -> PathBuf {
        self.root.join("params.bin")
    }

    pub fn ca_private_key(&self) -> PathBuf {
        self.root.join("CA_Priv.bin")
    }

    pub fn ca_public_key(&self) -> PathBuf {
        self.root.join("CA_Pub.bin")
    }

    pub fn private_key(&self, party: Party) -> PathBuf {
        self.root.join(format!("privatekey{}.bin", party.tag()))
    }

    pub fn public_key(&self, party: Party) -> PathBuf {
        self.root.join(format!("publicKey{}.bin", party.tag()))
    }

    pub fn certificate(&self, party: Party) -> PathBuf {
        self.root.join(format!("Certificate-{}.bin", party.tag()))
    }

    pub fn shared_secret(&self, party: Party) -> PathBuf {
        self.root.join(format!("SSNK{}.bin", party.tag()))
    }
}
