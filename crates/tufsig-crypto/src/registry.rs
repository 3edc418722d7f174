//! # Algorithm Registry
//!
//! Maps algorithm names to factories so callers can ask for "the signer
//! named X" at runtime without knowing its implementation.
//!
//! ## Process-wide Registry
//!
//! [`global()`] returns the process-wide instance. It starts empty;
//! [`install_builtin()`] is the one-time population step and must be called
//! explicitly during startup. Nothing is registered as a side effect of
//! loading this crate.
//!
//! ```rust
//! use tufsig_crypto::registry;
//!
//! let registry = registry::install_builtin();
//! assert!(registry.resolve("ed25519").is_some());
//! assert!(registry.resolve("not-existent").is_none());
//! ```
//!
//! ## Concurrency
//!
//! Entries live in a [`DashMap`], so registration and lookup are safe from
//! any thread. Registration is expected during startup only; lookups take a
//! shard read lock for the duration of a factory call.

use std::sync::{Arc, Once, OnceLock};

use dashmap::DashMap;

use crate::algorithm::Algorithm;
use crate::ecdsa::EcdsaAlgorithm;
use crate::ed25519::Ed25519Algorithm;

/// Builds a fresh algorithm instance.
pub type Builder = Arc<dyn Fn() -> Box<dyn Algorithm> + Send + Sync>;

/// Name → factory mapping for signature algorithms.
#[derive(Default)]
pub struct Registry {
    builders: DashMap<String, Builder>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in algorithms.
    pub fn builtin() -> Self {
        let registry = Self::new();
        register_builtin(&registry);
        registry
    }

    /// Store `builder` under `name`, replacing any previous entry.
    pub fn register<F>(&self, name: impl Into<String>, builder: F)
    where
        F: Fn() -> Box<dyn Algorithm> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(algorithm = %name, "registering signature algorithm");
        if self.builders.insert(name, Arc::new(builder)).is_some() {
            tracing::debug!("replaced a previously registered builder");
        }
    }

    /// Build the algorithm registered under `name`, or `None` if there is
    /// no such entry.
    pub fn resolve(&self, name: &str) -> Option<Box<dyn Algorithm>> {
        // Clone the builder out so the shard lock is not held while it runs.
        let builder = self.builders.get(name).map(|entry| Arc::clone(entry.value()));
        match builder {
            Some(builder) => Some(builder()),
            None => {
                tracing::debug!(algorithm = %name, "no signature algorithm registered");
                None
            }
        }
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// All registered names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.builders.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of registered algorithms.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names();
        names.sort();
        f.debug_struct("Registry").field("algorithms", &names).finish()
    }
}

/// Register Ed25519, ECDSA P-256/SHA-256 and ECDSA P-384/SHA-384.
pub fn register_builtin(registry: &Registry) {
    registry.register(crate::ed25519::ED25519, || {
        Box::new(Ed25519Algorithm::new()) as Box<dyn Algorithm>
    });
    registry.register(crate::ecdsa::ECDSA_SHA2_NISTP256, || {
        Box::new(EcdsaAlgorithm::p256_sha256()) as Box<dyn Algorithm>
    });
    registry.register(crate::ecdsa::ECDSA_SHA384_NISTP384, || {
        Box::new(EcdsaAlgorithm::p384_sha384()) as Box<dyn Algorithm>
    });
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();
static BUILTIN: Once = Once::new();

/// The process-wide registry. Empty until [`install_builtin()`] runs or
/// entries are registered by hand.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::new)
}

/// Populate the process-wide registry with the built-in algorithms.
///
/// Runs the registration exactly once no matter how many threads call it;
/// later calls return the same registry without touching it, so entries
/// registered afterwards under a built-in name are kept.
pub fn install_builtin() -> &'static Registry {
    let registry = global();
    BUILTIN.call_once(|| register_builtin(registry));
    registry
}
