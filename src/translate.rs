//! Translation catalog seam.
//!
//! The actual string catalog lives in the host application; corekit only needs
//! a way to turn a key like `general.not_found` into user-facing text. A
//! lookup miss returns the key itself, so untranslated installations still
//! produce usable messages.

use std::collections::HashMap;

/// Lookup into the host application's translation catalog.
pub trait Translator {
    /// Translate a catalog key. Returns the key unchanged when unknown.
    fn translate(&self, key: &str) -> String;
}

/// Map-backed translator, mainly for tests and small installations.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, text: &str) -> Self {
        self.entries.insert(key.to_string(), text.to_string());
        self
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Translator that performs no lookup at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTranslator;

impl Translator for NoopTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}
