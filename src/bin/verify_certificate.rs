use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code};
use dhcert::Error;

/// Check a certificate's signature against the authority's public key.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Certificate file, e.g. Certificate-A.bin
    certificate: PathBuf,
    /// Authority public key file, e.g. CA_Pub.bin
    ca_public_key: PathBuf,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();

    exit_code(
        cli::verify_certificate_file(&args.certificate, &args.ca_public_key).and_then(|status| {
            if status.is_verified() {
                println!("Certificate verification successful.");
                Ok(())
            } else {
                Err(Error::crypto("Signature verification failed."))
            }
        }),
    )
}
