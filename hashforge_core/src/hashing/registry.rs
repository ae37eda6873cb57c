//! Central registry for hash algorithm implementations
//!
//! Algorithms are registered as factories keyed by a case-insensitive name
//! and by a numeric identity. A process-wide instance is available through
//! [`AlgorithmRegistry::global`]; isolated instances can be created for
//! tests or embedding.

use super::engine::HashEngine;
use super::traits::HashAlgorithm;
use crate::error::{EngineError, RegistryError, RegistryKind, Result};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Constructor for fresh algorithm instances
pub type AlgorithmFactory = Arc<dyn Fn() -> Box<dyn HashAlgorithm> + Send + Sync>;

/// A registered algorithm: its keys, geometry and factory
pub struct AlgorithmDescriptor {
    name: String,
    identity: u64,
    display_name: String,
    block_size: usize,
    digest_size: usize,
    factory: AlgorithmFactory,
}

impl AlgorithmDescriptor {
    /// Describe an algorithm by name, identity and factory.
    ///
    /// The factory is invoked once to read the geometry; algorithms with a
    /// zero block or digest size are refused.
    pub fn new<F>(name: &str, identity: u64, factory: F) -> Result<Self>
    where
        F: Fn() -> Box<dyn HashAlgorithm> + Send + Sync + 'static,
    {
        let sample = factory();
        let block_size = sample.block_size();
        let digest_size = sample.digest_size();

        if block_size == 0 {
            return Err(EngineError::abstract_invocation(name, "block_size").into());
        }
        if digest_size == 0 {
            return Err(EngineError::abstract_invocation(name, "digest_size").into());
        }

        Ok(Self {
            name: name.to_lowercase(),
            identity,
            display_name: sample.display_name().to_string(),
            block_size,
            digest_size,
            factory: Arc::new(factory),
        })
    }

    /// Describe a default-constructible algorithm under its own name
    pub fn of<A>(identity: u64) -> Result<Self>
    where
        A: HashAlgorithm + Default + 'static,
    {
        let name = A::default().name();
        Self::new(name, identity, || Box::new(A::default()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> u64 {
        self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// Build a new, uninitialized algorithm instance
    pub fn create_algorithm(&self) -> Box<dyn HashAlgorithm> {
        (self.factory)()
    }

    /// Build a new engine around a fresh instance
    pub fn create_engine(&self) -> HashEngine {
        HashEngine::new(self.create_algorithm())
    }

    pub fn factory(&self) -> AlgorithmFactory {
        Arc::clone(&self.factory)
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("name", &self.name)
            .field("identity", &format_args!("{:#x}", self.identity))
            .field("block_size", &self.block_size)
            .field("digest_size", &self.digest_size)
            .finish()
    }
}

#[derive(Default)]
struct RegistryState {
    by_name: HashMap<String, Arc<AlgorithmDescriptor>>,
    by_identity: HashMap<u64, Arc<AlgorithmDescriptor>>,
    default: Option<Arc<AlgorithmDescriptor>>,
}

/// Central registry for all hash algorithms
#[derive(Default)]
pub struct AlgorithmRegistry {
    state: RwLock<RegistryState>,
}

impl AlgorithmRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in algorithm
    pub fn with_builtin_algorithms() -> Result<Self> {
        let registry = Self::new();
        super::algorithms::register_all(&registry)?;
        Ok(registry)
    }

    /// Get the global registry instance
    ///
    /// Built-in algorithms are registered on first access. No default is
    /// set here; that is left to the embedding application.
    pub fn global() -> &'static Self {
        static INSTANCE: OnceCell<AlgorithmRegistry> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            let registry = Self::new();
            if let Err(e) = super::algorithms::register_all(&registry) {
                warn!("Failed to register built-in algorithms: {e}");
            }
            registry
        })
    }

    /// Register an algorithm under its name and identity
    pub fn register(&self, descriptor: AlgorithmDescriptor) -> Result<Arc<AlgorithmDescriptor>> {
        let mut state = self.write();

        if state.by_name.contains_key(&descriptor.name) {
            return Err(RegistryError::duplicate(RegistryKind::Algorithm, &descriptor.name).into());
        }
        if state.by_identity.contains_key(&descriptor.identity) {
            return Err(RegistryError::duplicate(
                RegistryKind::Algorithm,
                format_args!("{:#x}", descriptor.identity),
            )
            .into());
        }

        let descriptor = Arc::new(descriptor);
        state
            .by_name
            .insert(descriptor.name.clone(), Arc::clone(&descriptor));
        state
            .by_identity
            .insert(descriptor.identity, Arc::clone(&descriptor));

        debug!(
            "Registered algorithm '{}' ({:#x})",
            descriptor.name, descriptor.identity
        );
        Ok(descriptor)
    }

    /// Remove an algorithm, clearing the default if it pointed there
    pub fn unregister(&self, name: &str) -> Result<Arc<AlgorithmDescriptor>> {
        let mut state = self.write();
        let key = name.to_lowercase();

        let descriptor = state
            .by_name
            .remove(&key)
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Algorithm, name))?;
        state.by_identity.remove(&descriptor.identity);

        if state
            .default
            .as_ref()
            .is_some_and(|d| Arc::ptr_eq(d, &descriptor))
        {
            state.default = None;
        }

        debug!("Unregistered algorithm '{key}'");
        Ok(descriptor)
    }

    /// Remove every algorithm and the default
    pub fn clear(&self) {
        let mut state = self.write();
        state.by_name.clear();
        state.by_identity.clear();
        state.default = None;
    }

    /// Look up by name, ignoring case
    pub fn lookup_by_name(&self, name: &str) -> Result<Arc<AlgorithmDescriptor>> {
        self.read()
            .by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Algorithm, name).into())
    }

    /// Look up by numeric identity
    pub fn lookup_by_identity(&self, identity: u64) -> Result<Arc<AlgorithmDescriptor>> {
        self.read()
            .by_identity
            .get(&identity)
            .cloned()
            .ok_or_else(|| {
                RegistryError::not_registered(
                    RegistryKind::Algorithm,
                    format_args!("{identity:#x}"),
                )
                .into()
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().by_name.contains_key(&name.to_lowercase())
    }

    /// All registered algorithms, sorted by name
    pub fn list(&self) -> Vec<Arc<AlgorithmDescriptor>> {
        let state = self.read();
        let mut all: Vec<_> = state.by_name.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Set the process default algorithm.
    ///
    /// The default can be set once; a second call fails with
    /// `DuplicateRegistration` until [`clear_default`](Self::clear_default).
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut state = self.write();

        let descriptor = state
            .by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Algorithm, name))?;

        if let Some(current) = state.default.as_ref() {
            return Err(RegistryError::duplicate(
                RegistryKind::Algorithm,
                format_args!("default (already '{}')", current.name),
            )
            .into());
        }

        debug!("Default algorithm set to '{}'", descriptor.name);
        state.default = Some(descriptor);
        Ok(())
    }

    pub fn clear_default(&self) {
        self.write().default = None;
    }

    pub fn default_algorithm(&self) -> Option<Arc<AlgorithmDescriptor>> {
        self.read().default.clone()
    }

    /// Pick the requested algorithm, else the default
    pub fn resolve(&self, choice: Option<&str>) -> Result<Arc<AlgorithmDescriptor>> {
        match choice {
            Some(name) => self.lookup_by_name(name),
            None => self
                .default_algorithm()
                .ok_or_else(|| RegistryError::no_default(RegistryKind::Algorithm).into()),
        }
    }

    /// Create an engine for a named algorithm
    pub fn create_engine(&self, name: &str) -> Result<HashEngine> {
        Ok(self.lookup_by_name(name)?.create_engine())
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Algorithm registry lock was poisoned; continuing");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Algorithm registry lock was poisoned; continuing");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        let mut names: Vec<_> = state.by_name.keys().collect();
        names.sort();
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &names)
            .field("default", &state.default.as_ref().map(|d| d.name.as_str()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::hashing::algorithms::{Md5, Sha1, identity};

    fn registry_with_md5() -> AlgorithmRegistry {
        let registry = AlgorithmRegistry::new();
        registry
            .register(AlgorithmDescriptor::of::<Md5>(identity::MD5).unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn test_lookup_by_name_is_case_insensitive() {
        let registry = registry_with_md5();
        let descriptor = registry.lookup_by_name("MD5").unwrap();
        assert_eq!(descriptor.name(), "md5");
        assert_eq!(descriptor.digest_size(), 16);
    }

    #[test]
    fn test_lookup_by_identity() {
        let registry = registry_with_md5();
        assert_eq!(registry.lookup_by_identity(0xd5).unwrap().name(), "md5");

        let err = registry.lookup_by_identity(0x99).unwrap_err();
        assert!(err.is_not_registered());
        assert!(err.to_string().contains("0x99"));
    }

    #[test]
    fn test_unknown_name_not_registered() {
        let registry = registry_with_md5();
        assert!(registry.lookup_by_name("whirlpool").unwrap_err().is_not_registered());
    }

    #[test]
    fn test_custom_name_and_identity() {
        let registry = AlgorithmRegistry::new();
        registry
            .register(AlgorithmDescriptor::new("X", 42, || Box::new(Sha1::default())).unwrap())
            .unwrap();

        let by_name = registry.lookup_by_name("x").unwrap();
        let by_identity = registry.lookup_by_identity(42).unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_identity));
        assert_eq!(by_name.create_algorithm().name(), "sha1");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = registry_with_md5();
        let err = registry
            .register(AlgorithmDescriptor::new("md5", 7, || Box::new(Md5::default())).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::DuplicateRegistration { .. })
        ));
        // The failed registration must not leave its identity behind
        assert!(registry.lookup_by_identity(7).is_err());
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let registry = registry_with_md5();
        let descriptor =
            AlgorithmDescriptor::new("other", identity::MD5, || Box::new(Md5::default())).unwrap();
        let err = registry.register(descriptor).unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::DuplicateRegistration { .. })
        ));
        assert!(!registry.contains("other"));
    }

    #[test]
    fn test_default_is_set_once() {
        let registry = AlgorithmRegistry::with_builtin_algorithms().unwrap();
        assert!(registry.default_algorithm().is_none());

        registry.set_default("sha256").unwrap();
        assert_eq!(registry.resolve(None).unwrap().name(), "sha256");

        let err = registry.set_default("md5").unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::DuplicateRegistration { .. })
        ));

        registry.clear_default();
        registry.set_default("md5").unwrap();
        assert_eq!(registry.resolve(None).unwrap().name(), "md5");
    }

    #[test]
    fn test_set_default_unknown_name() {
        let registry = registry_with_md5();
        assert!(registry.set_default("nope").unwrap_err().is_not_registered());
        assert!(registry.default_algorithm().is_none());
    }

    #[test]
    fn test_resolve_without_default() {
        let registry = registry_with_md5();
        let err = registry.resolve(None).unwrap_err();
        assert!(matches!(
            err,
            Error::Registry(RegistryError::NoDefaultConfigured { .. })
        ));
        assert_eq!(registry.resolve(Some("md5")).unwrap().name(), "md5");
    }

    #[test]
    fn test_unregister_clears_both_keys_and_default() {
        let registry = registry_with_md5();
        registry.set_default("md5").unwrap();

        registry.unregister("MD5").unwrap();
        assert!(!registry.contains("md5"));
        assert!(registry.lookup_by_identity(identity::MD5).is_err());
        assert!(registry.default_algorithm().is_none());
        assert!(registry.unregister("md5").unwrap_err().is_not_registered());
    }

    #[test]
    fn test_list_is_sorted() {
        let registry = AlgorithmRegistry::with_builtin_algorithms().unwrap();
        let names: Vec<_> = registry.list().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["md5", "sha1", "sha224", "sha256", "sha384", "sha512"]
        );
    }

    #[test]
    fn test_clear() {
        let registry = AlgorithmRegistry::with_builtin_algorithms().unwrap();
        registry.set_default("sha1").unwrap();
        registry.clear();
        assert!(registry.list().is_empty());
        assert!(registry.default_algorithm().is_none());
    }

    #[test]
    fn test_engines_are_independent() {
        let registry = registry_with_md5();
        let mut first = registry.create_engine("md5").unwrap();
        let mut second = registry.create_engine("md5").unwrap();

        first.init().unwrap();
        second.init().unwrap();
        first.update(b"abc").unwrap();
        first.finalize().unwrap();
        second.finalize().unwrap();

        assert_eq!(hex::encode(first.digest()), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hex::encode(second.digest()), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
