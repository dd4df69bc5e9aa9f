use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code, Party};
use dhcert::config::rng_from_seed;
use dhcert::ArtifactPaths;

/// Issue a certificate for Alice's or Bob's public key, signed with CA_Priv.bin.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Alice or Bob
    party: Party,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();
    let mut rng = rng_from_seed(None);

    exit_code(
        cli::generate_certificate(&ArtifactPaths::default(), args.party, &mut rng).map(|_| {
            println!(
                "Certificate for {} generated and saved successfully!",
                args.party
            )
        }),
    )
}
