//! # Records: Attribute Pipeline
//!
//! This module defines [`Record`], the base for persisted entities, and
//! [`Schema`], the compile-time capability table a record type declares.
//!
//! ## The Problem
//!
//! Field values arriving from HTTP handlers are messy: keys come in camelCase
//! or snake_case, strings carry markup, localized fields need per-locale
//! storage, and a nullable column should still read back as a typed value.
//! Every attribute read and write funnels through one pipeline so these rules
//! are applied uniformly.
//!
//! ## Write path (`set_attribute`)
//!
//! 1. Normalize the key to snake_case.
//! 2. Strip markup recursively, unless the field is exempt or sanitization is
//!    disabled on the instance.
//! 3. Translatable fields store the value under the active locale inside a
//!    locale→value map held in place of the raw value. The fallback locale is
//!    seeded too when the active locale is the default locale, or when the
//!    fallback has no entry yet — so the first write establishes the fallback
//!    and later non-default-locale writes never overwrite it.
//! 4. Everything else lands in the raw attribute map under the normalized key.
//!
//! ## Read path (`get_attribute`)
//!
//! 1. A name in the schema's accessor table dispatches to that accessor
//!    directly, with no normalization.
//! 2. Otherwise the normalized key reads from the raw map: translatable
//!    fields resolve active locale → fallback locale → empty string; plain
//!    fields are sanitized (unless exempt) and pushed through their declared
//!    cast, which turns null into the type's zero value.
//!
//! ## Serialization (`to_map`)
//!
//! Keys are camelCased for presentation and every value is re-fetched through
//! the read path, so translatable fields serialize locale-resolved.
//!
//! ## Hydration
//!
//! `set_raw_attributes` merges (new values win) rather than replacing, so a
//! record hydrated twice accumulates its raw attribute set. Translation blobs
//! arriving as serialized JSON strings are parsed on read.

pub mod cast;
pub mod casing;
pub mod sanitize;

pub use cast::CastType;
pub use casing::{camel_case, snake_case};

use serde_json::{Map, Value};

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};

/// Computed attribute resolver, dispatched by name ahead of stored lookup.
pub type Accessor = fn(&Record) -> Value;

/// Compile-time declaration of a record type's capabilities: which fields are
/// translatable, which skip sanitization, declared casts, and the computed
/// accessor table that replaces runtime method lookup.
#[derive(Clone, Copy)]
pub struct Schema {
    /// Record type name (singular).
    pub name: &'static str,
    /// Storage table / folder name (plural).
    pub table: &'static str,
    pub translatable: &'static [&'static str],
    pub unsanitized: &'static [&'static str],
    pub casts: &'static [(&'static str, CastType)],
    pub accessors: &'static [(&'static str, Accessor)],
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("translatable", &self.translatable)
            .field("unsanitized", &self.unsanitized)
            .field(
                "accessors",
                &self
                    .accessors
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Schema {
    pub const fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            translatable: &[],
            unsanitized: &[],
            casts: &[],
            accessors: &[],
        }
    }

    pub const fn translatable(mut self, fields: &'static [&'static str]) -> Self {
        self.translatable = fields;
        self
    }

    pub const fn unsanitized(mut self, fields: &'static [&'static str]) -> Self {
        self.unsanitized = fields;
        self
    }

    pub const fn casts(mut self, casts: &'static [(&'static str, CastType)]) -> Self {
        self.casts = casts;
        self
    }

    pub const fn accessors(mut self, accessors: &'static [(&'static str, Accessor)]) -> Self {
        self.accessors = accessors;
        self
    }

    pub fn is_translatable(&self, key: &str) -> bool {
        self.translatable.contains(&key)
    }

    pub fn is_unsanitized(&self, key: &str) -> bool {
        self.unsanitized.contains(&key)
    }

    pub fn cast_of(&self, key: &str) -> Option<CastType> {
        self.casts
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, cast)| *cast)
    }

    pub fn accessor(&self, key: &str) -> Option<Accessor> {
        self.accessors
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, accessor)| *accessor)
    }
}

/// Locale set a record operates under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    /// Locale of the current request.
    pub active: String,
    /// Locale treated as canonical for fallback seeding.
    pub default_locale: String,
    /// Locale served when the requested one has no entry.
    pub fallback: String,
}

impl Locales {
    pub fn new(active: &str, default_locale: &str, fallback: &str) -> Self {
        Self {
            active: active.to_string(),
            default_locale: default_locale.to_string(),
            fallback: fallback.to_string(),
        }
    }

    pub fn from_config(config: &CoreConfig, active: &str) -> Self {
        Self::new(active, &config.default_locale, &config.fallback_locale)
    }
}

/// A persisted entity: raw attributes plus the interception rules layered on
/// top of an external persistence engine.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static Schema,
    attributes: Map<String, Value>,
    locales: Locales,
    sanitize: bool,
}

impl Record {
    pub fn new(schema: &'static Schema, locales: Locales) -> Self {
        Self {
            schema,
            attributes: Map::new(),
            locales,
            sanitize: true,
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Switch the active locale for subsequent reads and writes.
    pub fn set_active_locale(&mut self, locale: &str) {
        self.locales.active = locale.to_string();
    }

    /// Enable or disable markup stripping for this instance.
    pub fn set_sanitization(&mut self, enabled: bool) {
        self.sanitize = enabled;
    }

    /// Sanitize a value under this instance's policy: a pass-through when
    /// sanitization is disabled, recursive markup stripping otherwise.
    pub fn sanitize_value(&self, value: &Value) -> Value {
        if !self.sanitize {
            return value.clone();
        }
        sanitize::sanitize_value(value)
    }

    /// Write an attribute through the full pipeline; see the module docs.
    pub fn set_attribute(&mut self, key: &str, value: Value) {
        let key = snake_case(key);
        let value = if self.schema.is_unsanitized(&key) {
            value
        } else {
            self.sanitize_value(&value)
        };

        if self.schema.is_translatable(&key) {
            let active = self.locales.active.clone();
            self.write_translation(&key, &active, value.clone());

            let seed_fallback = self.locales.active == self.locales.default_locale
                || !self
                    .translation_map(&key)
                    .contains_key(&self.locales.fallback);
            if seed_fallback {
                let fallback = self.locales.fallback.clone();
                self.write_translation(&key, &fallback, value);
            }
            return;
        }

        self.attributes.insert(key, value);
    }

    /// Read an attribute through the full pipeline; see the module docs.
    pub fn get_attribute(&self, key: &str) -> Value {
        // Computed accessors win, keyed by the name as given
        if let Some(accessor) = self.schema.accessor(key) {
            return accessor(self);
        }

        let key = snake_case(key);
        if self.schema.is_translatable(&key) {
            return self.translation_value(&key);
        }

        let raw = self.attributes.get(&key).cloned().unwrap_or(Value::Null);
        let raw = if self.schema.is_unsanitized(&key) {
            raw
        } else {
            self.sanitize_value(&raw)
        };
        match self.schema.cast_of(&key) {
            Some(cast) => cast.cast(raw),
            None => raw,
        }
    }

    /// Raw stored value, bypassing the pipeline.
    pub fn raw_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Store a raw value, bypassing the pipeline.
    pub fn set_raw_attribute(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// Bulk-load raw attributes, merging onto the existing set (new values
    /// win). Hydrating twice accumulates rather than resets.
    pub fn set_raw_attributes(&mut self, attributes: Map<String, Value>) {
        for (key, value) in attributes {
            self.attributes.insert(key, value);
        }
    }

    /// Numeric identity of the record, zero when unset.
    pub fn id(&self) -> i64 {
        self.attributes
            .get("id")
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    /// Write one locale's entry of a translatable field directly, without
    /// sanitization or fallback seeding.
    pub fn set_translation(&mut self, key: &str, locale: &str, value: Value) -> Result<()> {
        self.guard_translatable(key)?;
        self.write_translation(key, locale, value);
        Ok(())
    }

    /// The full locale→value map of a translatable field.
    pub fn translations(&self, key: &str) -> Result<Map<String, Value>> {
        self.guard_translatable(key)?;
        Ok(self.translation_map(key))
    }

    /// Locales that currently hold an entry for a translatable field.
    pub fn translated_locales(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.translations(key)?.keys().cloned().collect())
    }

    /// Presentation form: camelCased field names, every value re-fetched
    /// through the read path so translatable fields are locale-resolved.
    pub fn to_map(&self) -> Map<String, Value> {
        let keys: Vec<String> = self.attributes.keys().cloned().collect();
        let mut out = Map::new();
        for key in keys {
            out.insert(camel_case(&key), self.get_attribute(&key));
        }
        out
    }

    fn guard_translatable(&self, key: &str) -> Result<()> {
        if !self.schema.is_translatable(key) {
            return Err(CoreError::InvalidField(key.to_string()));
        }
        Ok(())
    }

    /// Current locale map of a field. A raw string value is parsed as a
    /// serialized blob (hydration from external persistence); anything else
    /// non-object yields an empty map.
    fn translation_map(&self, key: &str) -> Map<String, Value> {
        match self.attributes.get(key) {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::String(blob)) => serde_json::from_str::<Value>(blob)
                .ok()
                .and_then(|parsed| parsed.as_object().cloned())
                .unwrap_or_default(),
            _ => Map::new(),
        }
    }

    fn write_translation(&mut self, key: &str, locale: &str, value: Value) {
        let mut map = self.translation_map(key);
        map.insert(locale.to_string(), value);
        self.attributes.insert(key.to_string(), Value::Object(map));
    }

    fn translation_value(&self, key: &str) -> Value {
        let map = self.translation_map(key);
        map.get(&self.locales.active)
            .or_else(|| map.get(&self.locales.fallback))
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    }
}
