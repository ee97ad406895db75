//! The format registry.
//!
//! A [`Registry`] maps case-insensitive format names to [`Format`]
//! implementations. It is filled once and only read afterwards, so a shared
//! reference can be used from any number of threads without locking.
//!
//! The process-wide registry returned by [`default_registry`] holds the
//! built-in formats. Callers that need more formats build their own registry
//! and pass it to [`convert_with_registry`](crate::convert_with_registry).
//!
//! ```rust
//! use std::sync::Arc;
//! use simple_serializer::formats::Json;
//! use simple_serializer::{Error, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register("json", Arc::new(Json)).unwrap();
//!
//! assert!(registry.resolve("JSON").is_some());
//! assert!(matches!(
//!     registry.register("Json", Arc::new(Json)),
//!     Err(Error::DuplicateFormat { .. })
//! ));
//! ```

use crate::formats::{Json, JsonLines, Properties, Tabular, Toml, Yaml};
use crate::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, Error, Result, Value};
use indexmap::IndexMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// A decoder and encoder pair for one data format.
pub trait Format: Send + Sync {
    /// The canonical name used in error messages.
    fn name(&self) -> &str;

    /// Returns `true` if the format stores rows of fields, such as CSV.
    fn is_tabular(&self) -> bool {
        false
    }

    /// Decodes a whole payload into one value.
    fn decode(
        &self,
        input: &[u8],
        options: &DecodeOptions,
    ) -> std::result::Result<Value, DecodeError>;

    /// Encodes a value into a payload.
    fn encode(
        &self,
        value: &Value,
        options: &EncodeOptions,
    ) -> std::result::Result<Vec<u8>, EncodeError>;
}

/// Case-insensitive table of formats, immutable once shared.
#[derive(Default)]
pub struct Registry {
    formats: IndexMap<String, Arc<dyn Format>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in formats.
    ///
    /// | Name | Format |
    /// |------|--------|
    /// | `json` | JSON document |
    /// | `jsonl`, `ndjson` | one JSON document per line |
    /// | `yaml`, `yml` | YAML document |
    /// | `csv`, `tsv`, `psv` | comma, tab and pipe delimited rows |
    /// | `properties` | `key=value` lines |
    /// | `toml` | TOML document |
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFormat`] if two built-ins share a name.
    pub fn with_builtin_formats() -> Result<Self> {
        let mut registry = Registry::new();
        let json_lines: Arc<dyn Format> = Arc::new(JsonLines);
        let yaml: Arc<dyn Format> = Arc::new(Yaml);

        registry.register("json", Arc::new(Json))?;
        registry.register("jsonl", Arc::clone(&json_lines))?;
        registry.register("ndjson", json_lines)?;
        registry.register("yaml", Arc::clone(&yaml))?;
        registry.register("yml", yaml)?;
        registry.register("csv", Arc::new(Tabular::csv()))?;
        registry.register("tsv", Arc::new(Tabular::tsv()))?;
        registry.register("psv", Arc::new(Tabular::psv()))?;
        registry.register("properties", Arc::new(Properties))?;
        registry.register("toml", Arc::new(Toml))?;

        debug!(formats = ?registry.names().collect::<Vec<_>>(), "registered builtin formats");
        Ok(registry)
    }

    /// Adds a format under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFormat`] if the name, ignoring case, is taken.
    pub fn register(&mut self, name: &str, format: Arc<dyn Format>) -> Result<()> {
        let key = normalize(name);
        if self.formats.contains_key(&key) {
            return Err(Error::duplicate_format(&key));
        }
        self.formats.insert(key, format);
        Ok(())
    }

    /// Looks up a format by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Arc<dyn Format>> {
        self.formats.get(&normalize(name))
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

static DEFAULT_REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Returns the process-wide registry of built-in formats.
///
/// # Panics
///
/// Panics during first use if the built-in formats cannot be registered. That
/// is a configuration fault of the crate itself and is never reported per call.
pub fn default_registry() -> &'static Registry {
    DEFAULT_REGISTRY.get_or_init(|| match Registry::with_builtin_formats() {
        Ok(registry) => registry,
        Err(err) => panic!("invalid builtin format table: {}", err),
    })
}
