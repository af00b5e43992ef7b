//! # corekit
//!
//! corekit is a **framework-agnostic support library** for web application
//! backends. It does not ship an ORM, an HTTP server, or a cloud SDK — it
//! supplies the behavior layered on top of them:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HTTP boundary (http/)                                      │
//! │  - Request filters (cron guard, force-SSL)                  │
//! │  - Exception → JSON envelope translation                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Records (record/, icon.rs)                                 │
//! │  - Attribute pipeline: normalization, sanitization,         │
//! │    locale-aware translations, null-safe casts               │
//! │  - Icon attachments with owned-file cleanup                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (storage/)                                         │
//! │  - StorageBackend trait: LocalBackend, MemoryBackend        │
//! │  - Storage facade: prefix, visibility, directory ops        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Supporting pieces: [`params`] (request-scoped nested key-value data),
//! [`types`] (named constant registries), [`translate`] (catalog seam),
//! [`config`] (injected configuration).
//!
//! ## Key Principle: Collaborators Stay Outside
//!
//! The persistence engine, the real HTTP pipeline, cloud storage SDKs, and
//! the translation catalog are all consumed through traits
//! ([`storage::StorageBackend`], [`http::HttpRequest`],
//! [`translate::Translator`], [`icon::IconRecord`]). Everything here is
//! synchronous and request-scoped; nothing holds shared mutable state across
//! requests.

pub mod config;
pub mod error;
pub mod http;
pub mod icon;
pub mod params;
pub mod record;
pub mod storage;
pub mod translate;
pub mod types;

pub use config::{CoreConfig, Protocol};
pub use error::{CoreError, Result};
