use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code, Party};
use dhcert::config::rng_from_seed;
use dhcert::ArtifactPaths;

/// Draw a private key in [1, q-1] for Alice or Bob.
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
    let mut rng = rng_from_seed(None);

    exit_code(
        cli::generate_private_key(&paths, args.party, &mut rng).map(|()| {
            println!(
                "Private key generated and saved to {}",
                paths.private_key(args.party).display()
            )
        }),
    )
}
