//! # Algorithms Subcommand
//!
//! Lists the names that `--algorithm` accepts.

use anyhow::Result;
use clap::Args;
use tufsig_crypto::Registry;

/// Arguments for `tufsig algorithms`.
#[derive(Args, Debug)]
pub struct AlgorithmsArgs {}

/// Print every registered algorithm name, one per line, sorted.
pub fn run_algorithms(_args: &AlgorithmsArgs, registry: &Registry) -> Result<u8> {
    for name in sorted_names(registry) {
        println!("{name}");
    }
    Ok(0)
}

fn sorted_names(registry: &Registry) -> Vec<String> {
    let mut names = registry.names();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_sorted() {
        assert_eq!(
            sorted_names(&Registry::builtin()),
            ["ecdsa-sha2-nistp256", "ecdsa-sha384-nistp384", "ed25519"]
        );
    }

    #[test]
    fn run_succeeds_on_empty_registry() {
        assert_eq!(run_algorithms(&AlgorithmsArgs {}, &Registry::new()).unwrap(), 0);
    }
}
