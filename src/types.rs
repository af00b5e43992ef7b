//! # Type Registry
//!
//! Named integer constants with listing and reverse lookup. Each registry is a
//! unit struct carrying a static `{name, value}` table; there is no runtime
//! reflection, a registry declares its entries once and the trait derives the
//! rest.
//!
//! ```
//! use corekit::types::{DeviceType, TypeRegistry};
//!
//! assert_eq!(DeviceType::key_of(2).unwrap(), "DESKTOP");
//! assert_eq!(DeviceType::delimited(), "1,2,3");
//! ```

use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::translate::Translator;

/// One declared constant of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: &'static str,
    pub value: i64,
}

impl TypeEntry {
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }
}

/// Output shape for [`TypeRegistry::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFormat {
    /// `"v1,v2,..."` in declaration order.
    Delimited,
    /// Name → value map.
    Pairs,
    /// Stringified value → (optionally translated) name map.
    Json,
}

/// A set of named integer constants.
///
/// Implementors supply [`entries`](TypeRegistry::entries); everything else has
/// a default implementation over the static table.
pub trait TypeRegistry {
    /// Declared constants in declaration order.
    fn entries() -> &'static [TypeEntry];

    /// All declared pairs in the requested shape.
    ///
    /// For [`TypeFormat::Json`], names are passed through the translator keyed
    /// by `"{prefix}.{lowercased name}"` when one is given.
    fn all(format: TypeFormat, translator: Option<&dyn Translator>, prefix: &str) -> Value {
        match format {
            TypeFormat::Delimited => Value::String(Self::delimited()),
            TypeFormat::Pairs => {
                let mut map = Map::new();
                for entry in Self::entries() {
                    map.insert(entry.name.to_string(), Value::from(entry.value));
                }
                Value::Object(map)
            }
            TypeFormat::Json => {
                let mut map = Map::new();
                for entry in Self::entries() {
                    let name = match translator {
                        Some(translator) => {
                            translator.translate(&format!("{}.{}", prefix, entry.name.to_lowercase()))
                        }
                        None => entry.name.to_string(),
                    };
                    map.insert(entry.value.to_string(), Value::String(name));
                }
                Value::Object(map)
            }
        }
    }

    /// Declared values joined with commas, in declaration order.
    fn delimited() -> String {
        Self::entries()
            .iter()
            .map(|entry| entry.value.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The symbolic name for a declared value.
    fn key_of(value: i64) -> Result<&'static str> {
        Self::entries()
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.name)
            .ok_or(CoreError::Lookup(value))
    }
}

/// Client device classes.
pub struct DeviceType;

impl DeviceType {
    pub const ALL: i64 = 1;
    pub const DESKTOP: i64 = 2;
    pub const MOBILE: i64 = 3;
}

impl TypeRegistry for DeviceType {
    fn entries() -> &'static [TypeEntry] {
        const ENTRIES: &[TypeEntry] = &[
            TypeEntry::new("ALL", DeviceType::ALL),
            TypeEntry::new("DESKTOP", DeviceType::DESKTOP),
            TypeEntry::new("MOBILE", DeviceType::MOBILE),
        ];
        ENTRIES
    }
}

/// HTTP status codes used at the request boundary.
pub struct HttpStatus;

impl HttpStatus {
    pub const MOVED_PERMANENTLY: i64 = 301;
    pub const BAD_REQUEST: i64 = 400;
    pub const UNAUTHORIZED: i64 = 401;
    pub const NOT_FOUND: i64 = 404;
    pub const METHOD_NOT_ALLOWED: i64 = 405;
    pub const UNPROCESSABLE_ENTITY: i64 = 422;
    pub const INTERNAL_SERVER_ERROR: i64 = 500;
}

impl TypeRegistry for HttpStatus {
    fn entries() -> &'static [TypeEntry] {
        const ENTRIES: &[TypeEntry] = &[
            TypeEntry::new("MOVED_PERMANENTLY", HttpStatus::MOVED_PERMANENTLY),
            TypeEntry::new("BAD_REQUEST", HttpStatus::BAD_REQUEST),
            TypeEntry::new("UNAUTHORIZED", HttpStatus::UNAUTHORIZED),
            TypeEntry::new("NOT_FOUND", HttpStatus::NOT_FOUND),
            TypeEntry::new("METHOD_NOT_ALLOWED", HttpStatus::METHOD_NOT_ALLOWED),
            TypeEntry::new("UNPROCESSABLE_ENTITY", HttpStatus::UNPROCESSABLE_ENTITY),
            TypeEntry::new("INTERNAL_SERVER_ERROR", HttpStatus::INTERNAL_SERVER_ERROR),
        ];
        ENTRIES
    }
}
