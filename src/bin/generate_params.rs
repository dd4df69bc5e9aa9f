use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code};
use dhcert::{ArtifactPaths, ParamsConfig};

/// Generate domain parameters (p, q, g) and save them to params.bin.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Bit length of the prime modulus p
    p_bits: usize,
    /// Bit length of the subgroup order q
    q_bits: usize,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();
    let config = ParamsConfig::new(args.p_bits, args.q_bits);
    let mut rng = config.rng();

    exit_code(
        cli::generate_params(&ArtifactPaths::default(), &config, &mut rng).map(|params| {
            println!("{}", params.p);
            println!("{}", params.q);
            println!("{}", params.g);
        }),
    )
}
