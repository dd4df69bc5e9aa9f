use std::process::ExitCode;

use clap::Parser;
use dhcert::cli::{self, exit_code};
use dhcert::{ArtifactPaths, ParamsConfig};

/// Generate the authority's DSA key pair into CA_Priv.bin and CA_Pub.bin.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Bit length of the authority's DSA modulus p
    p_bits: usize,
    /// Bit length of the authority's DSA subgroup order q
    q_bits: usize,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();
    let config = ParamsConfig::new(args.p_bits, args.q_bits);
    let mut rng = config.rng();

    exit_code(
        cli::generate_ca_keys(&ArtifactPaths::default(), &config, &mut rng)
            .map(|_| println!("Authority key pair generated and saved successfully!")),
    )
}
