use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code};
use dhcert::ArtifactPaths;

/// Verify the peer's certificate, then derive the shared secret from it and a private key.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Peer certificate, e.g. Certificate-B.bin
    certificate: PathBuf,
    /// Own private key, e.g. privatekeyA.bin
    private_key: PathBuf,
    /// Output file for the shared secret, e.g. SSNKA.bin
    output: PathBuf,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();

    exit_code(
        cli::derive_shared_secret_file(
            &ArtifactPaths::default(),
            &args.certificate,
            &args.private_key,
            &args.output,
        )
        .map(|secret| println!("{}", secret.fingerprint())),
    )
}
