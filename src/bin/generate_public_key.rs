use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code, Party};
use dhcert::ArtifactPaths;

/// Compute g^private mod p for Alice or Bob.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Alice or Bob
    party: Party,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();
    let paths = ArtifactPaths::default();

    exit_code(cli::generate_public_key(&paths, args.party).map(|_| {
        println!(
            "{}'s public key generated and saved to {}",
            args.party,
            paths.public_key(args.party).display()
        )
    }))
}
