//! Digest text encodings
//!
//! A small catalog of formatters that turn raw digest bytes into text
//! bytes, plus a registry with an optional process-wide default. When no
//! formatter is given and no default is configured, digests are returned
//! raw.

use crate::error::{RegistryError, RegistryKind, Result};
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Encodes raw digest bytes
pub trait DigestFormatter: Send + Sync {
    /// Registry name, lowercase
    fn name(&self) -> &'static str;

    /// Encode the digest; the output is text bytes for every built-in
    fn encode(&self, raw: &[u8]) -> Vec<u8>;
}

/// Hexadecimal, lowercase by default
#[derive(Debug, Clone, Copy, Default)]
pub struct HexFormatter {
    uppercase: bool,
}

impl HexFormatter {
    pub fn lower() -> Self {
        Self { uppercase: false }
    }

    pub fn upper() -> Self {
        Self { uppercase: true }
    }
}

impl DigestFormatter for HexFormatter {
    fn name(&self) -> &'static str {
        if self.uppercase { "hex-upper" } else { "hex" }
    }

    fn encode(&self, raw: &[u8]) -> Vec<u8> {
        let text = if self.uppercase {
            hex::encode_upper(raw)
        } else {
            hex::encode(raw)
        };
        text.into_bytes()
    }
}

/// Base64, standard alphabet with padding or URL-safe without
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Formatter {
    url_safe: bool,
}

impl Base64Formatter {
    pub fn standard() -> Self {
        Self { url_safe: false }
    }

    pub fn url_safe() -> Self {
        Self { url_safe: true }
    }
}

impl DigestFormatter for Base64Formatter {
    fn name(&self) -> &'static str {
        if self.url_safe { "base64url" } else { "base64" }
    }

    fn encode(&self, raw: &[u8]) -> Vec<u8> {
        let text = if self.url_safe {
            URL_SAFE_NO_PAD.encode(raw)
        } else {
            STANDARD.encode(raw)
        };
        text.into_bytes()
    }
}

/// Identity encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormatter;

impl DigestFormatter for RawFormatter {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn encode(&self, raw: &[u8]) -> Vec<u8> {
        raw.to_vec()
    }
}

#[derive(Default)]
struct FormatterState {
    by_name: HashMap<String, Arc<dyn DigestFormatter>>,
    default: Option<Arc<dyn DigestFormatter>>,
}

/// Named digest formatters with an optional default
#[derive(Default)]
pub struct FormatterRegistry {
    state: RwLock<FormatterState>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding hex, hex-upper, base64, base64url and raw
    pub fn with_builtin_formatters() -> Result<Self> {
        let registry = Self::new();
        registry.register(Arc::new(HexFormatter::lower()))?;
        registry.register(Arc::new(HexFormatter::upper()))?;
        registry.register(Arc::new(Base64Formatter::standard()))?;
        registry.register(Arc::new(Base64Formatter::url_safe()))?;
        registry.register(Arc::new(RawFormatter))?;
        Ok(registry)
    }

    /// Process-wide registry; built-ins are present, no default is set
    pub fn global() -> &'static Self {
        static INSTANCE: OnceCell<FormatterRegistry> = OnceCell::new();
        INSTANCE.get_or_init(|| {
            Self::with_builtin_formatters().unwrap_or_else(|e| {
                warn!("Failed to register built-in formatters: {e}");
                Self::new()
            })
        })
    }

    pub fn register(&self, formatter: Arc<dyn DigestFormatter>) -> Result<()> {
        let mut state = self.write();
        let name = formatter.name().to_lowercase();
        if state.by_name.contains_key(&name) {
            return Err(RegistryError::duplicate(RegistryKind::Formatter, name).into());
        }
        debug!("Registered formatter '{name}'");
        state.by_name.insert(name, formatter);
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> Result<Arc<dyn DigestFormatter>> {
        let mut state = self.write();
        let formatter = state
            .by_name
            .remove(&name.to_lowercase())
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Formatter, name))?;
        if state
            .default
            .as_ref()
            .is_some_and(|d| Arc::ptr_eq(d, &formatter))
        {
            state.default = None;
        }
        Ok(formatter)
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn DigestFormatter>> {
        self.read()
            .by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Formatter, name).into())
    }

    /// Sorted formatter names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.read().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Set the default formatter; can only be set once
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut state = self.write();
        let formatter = state
            .by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RegistryError::not_registered(RegistryKind::Formatter, name))?;
        if let Some(current) = state.default.as_ref() {
            return Err(RegistryError::duplicate(
                RegistryKind::Formatter,
                format_args!("default (already '{}')", current.name()),
            )
            .into());
        }
        debug!("Default formatter set to '{}'", formatter.name());
        state.default = Some(formatter);
        Ok(())
    }

    pub fn clear_default(&self) {
        self.write().default = None;
    }

    pub fn default_formatter(&self) -> Option<Arc<dyn DigestFormatter>> {
        self.read().default.clone()
    }

    /// Pick the requested formatter, else the default
    pub fn resolve(&self, choice: Option<&str>) -> Result<Arc<dyn DigestFormatter>> {
        match choice {
            Some(name) => self.lookup(name),
            None => self
                .default_formatter()
                .ok_or_else(|| RegistryError::no_default(RegistryKind::Formatter).into()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FormatterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormatterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Encode with the given formatter, else the global default, else raw
pub fn encode_digest(raw: &[u8], formatter: Option<&dyn DigestFormatter>) -> Vec<u8> {
    if let Some(formatter) = formatter {
        return formatter.encode(raw);
    }
    match FormatterRegistry::global().default_formatter() {
        Some(formatter) => formatter.encode(raw),
        None => raw.to_vec(),
    }
}
