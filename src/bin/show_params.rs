use std::process::ExitCode;

use dhcert::cli::{self, exit_code};
use dhcert::config::rng_from_seed;
use dhcert::ArtifactPaths;

/// Load params.bin, re-check its invariants, and print p, q and g.
fn main() -> ExitCode {
    cli::init_logging();
    let mut rng = rng_from_seed(None);

    exit_code(
        cli::show_params(&ArtifactPaths::default(), &mut rng).map(|params| {
            println!("Integers loaded from file successfully.");
            println!("p: {}", params.p);
            println!("q: {}", params.q);
            println!("g: {}", params.g);
        }),
    )
}
