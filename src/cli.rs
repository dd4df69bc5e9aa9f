//! The file-based operations behind each binary in `src/bin/`.
//!
//! Every operation reads its inputs from artifact files under an
//! [`ArtifactPaths`] root and writes its output there, so a full exchange can be
//! driven from separate processes (or, in tests, from one).

use std::path::Path;
use std::process::ExitCode;

use log::{error, info};
use rand_core::CryptoRngCore;

pub use crate::config::Party;

use crate::config::{ArtifactPaths, ParamsConfig, P_ROUNDS};
use crate::error::{Error, Result};
use crate::security::{
    derive_private, issue_certificate, verify_certificate, Certificate, CertificateStatus,
    DomainParameters, DsaKeyPair, DsaSigningKey, DsaVerifyingKey, KeyPair, PrivateKey, PublicKey,
    SharedSecret,
};

/// Installs the `env_logger` backend, defaulting to `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

/// Maps an operation result to the process exit status, logging any error.
pub fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Generates `(p, q, g)` and writes them to the parameter file.
pub fn generate_params(
    paths: &ArtifactPaths,
    config: &ParamsConfig,
    rng: &mut dyn CryptoRngCore,
) -> Result<DomainParameters> {
    let params = DomainParameters::generate(config, rng)?;
    params.save(&paths.params())?;
    info!("domain parameters saved to {}", paths.params().display());
    Ok(params)
}

/// Loads the parameter file and re-checks its invariants.
pub fn show_params(
    paths: &ArtifactPaths,
    rng: &mut dyn CryptoRngCore,
) -> Result<DomainParameters> {
    let params = DomainParameters::load(&paths.params())?;
    params.validate(P_ROUNDS, rng)?;
    Ok(params)
}

/// Creates the authority's DSA key pair under its own fresh domain parameters.
pub fn generate_ca_keys(
    paths: &ArtifactPaths,
    config: &ParamsConfig,
    rng: &mut dyn CryptoRngCore,
) -> Result<DsaVerifyingKey> {
    let params = DomainParameters::generate(config, rng)?;
    let pair = DsaKeyPair::generate(&params, rng)?;
    pair.signing.save(&paths.ca_private_key())?;
    pair.verifying.save(&paths.ca_public_key())?;
    info!(
        "authority keys saved to {} and {}",
        paths.ca_private_key().display(),
        paths.ca_public_key().display()
    );
    Ok(pair.verifying)
}

pub fn generate_private_key(
    paths: &ArtifactPaths,
    party: Party,
    rng: &mut dyn CryptoRngCore,
) -> Result<()> {
    let params = DomainParameters::load(&paths.params())?;
    let private = derive_private(&params.q, rng)?;
    private.save(&paths.private_key(party))?;
    info!(
        "{}'s private key saved to {}",
        party,
        paths.private_key(party).display()
    );
    Ok(())
}

/// Recomputes the party's public key from its private key and the current parameters.
pub fn generate_public_key(paths: &ArtifactPaths, party: Party) -> Result<PublicKey> {
    let params = DomainParameters::load(&paths.params())?;
    let private = PrivateKey::load(&paths.private_key(party))?;
    let pair = KeyPair::from_private(&params, private)?;
    pair.public.save(&paths.public_key(party))?;
    info!(
        "{}'s public key saved to {}",
        party,
        paths.public_key(party).display()
    );
    Ok(pair.public)
}

/// Signs the party's public key with the authority's private key.
pub fn generate_certificate(
    paths: &ArtifactPaths,
    party: Party,
    rng: &mut dyn CryptoRngCore,
) -> Result<Certificate> {
    let authority = DsaSigningKey::load(&paths.ca_private_key())?;
    let subject = PublicKey::load(&paths.public_key(party))?;
    let cert = issue_certificate(&subject, &authority, rng)?;
    cert.save(&paths.certificate(party))?;
    info!(
        "certificate for {} saved to {}",
        party,
        paths.certificate(party).display()
    );
    Ok(cert)
}

pub fn verify_certificate_file(
    cert_path: &Path,
    ca_public_path: &Path,
) -> Result<CertificateStatus> {
    let authority = DsaVerifyingKey::load(ca_public_path)?;
    let cert = Certificate::load(cert_path)?;
    verify_certificate(cert.as_bytes(), &authority)
}

/// Verifies the peer certificate against the authority key, then derives and
/// saves the shared secret. A rejected certificate aborts before any secret
/// is computed.
pub fn derive_shared_secret_file(
    paths: &ArtifactPaths,
    cert_path: &Path,
    private_path: &Path,
    out_path: &Path,
) -> Result<SharedSecret> {
    let params = DomainParameters::load(&paths.params())?;
    let peer = verify_certificate_file(cert_path, &paths.ca_public_key())?
        .into_verified()
        .ok_or_else(|| {
            Error::crypto(format!(
                "{}: certificate signature rejected",
                cert_path.display()
            ))
        })?;
    let mine = PrivateKey::load(private_path)?;
    let secret = crate::security::derive_shared_secret(&peer, &mine, &params.p)?;
    secret.save(out_path)?;
    info!(
        "shared secret saved to {} (sha256 {})",
        out_path.display(),
        secret.fingerprint()
    );
    Ok(secret)
}
