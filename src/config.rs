//! # Configuration
//!
//! All components take their settings from [`CoreConfig`] at construction;
//! nothing reads configuration through globals. Loading is handled by
//! [`confique`], which layers TOML files, environment variables, and compiled
//! defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `translations_prefix` | `general` | Prefix for translation catalog keys |
//! | `default_locale` | `en` | Locale treated as canonical for fallback seeding |
//! | `fallback_locale` | `en` | Locale served when the requested one has no entry |
//! | `protocol` | `http` | Scheme enforced by the SSL filter |
//! | `private_disk` | `local` | Disk name for private storage |
//! | `public_disk` | `local_public` | Disk name for public storage |
//! | `images_folder` | `assets/images` | Root folder for icon files |

use confique::Config;
use serde::{Deserialize, Serialize};

/// Application scheme enforced at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

/// Configuration for corekit, stored in `corekit.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Prefix put before translation catalog keys (e.g. "general.not_found").
    #[config(default = "general")]
    pub translations_prefix: String,

    /// Locale treated as canonical when seeding translation fallbacks.
    #[config(default = "en")]
    pub default_locale: String,

    /// Locale served when the requested locale has no entry.
    #[config(default = "en")]
    pub fallback_locale: String,

    /// Scheme the SSL filter redirects to when set to `https`.
    #[config(default = "http")]
    pub protocol: Protocol,

    /// Disk name used for private storage.
    #[config(default = "local")]
    pub private_disk: String,

    /// Disk name used for public storage.
    #[config(default = "local_public")]
    pub public_disk: String,

    /// Folder (relative to the disk root) where record icons are stored.
    #[config(default = "assets/images")]
    pub images_folder: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            translations_prefix: "general".to_string(),
            default_locale: "en".to_string(),
            fallback_locale: "en".to_string(),
            protocol: Protocol::Http,
            private_disk: "local".to_string(),
            public_disk: "local_public".to_string(),
            images_folder: "assets/images".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.translations_prefix, "general");
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.fallback_locale, "en");
        assert_eq!(config.protocol, Protocol::Http);
        assert_eq!(config.images_folder, "assets/images");
    }

    #[test]
    fn test_protocol_deserializes_lowercase() {
        let config: CoreConfig = toml::from_str(
            r#"
            translations_prefix = "general"
            default_locale = "en"
            fallback_locale = "en"
            protocol = "https"
            private_disk = "gcs"
            public_disk = "gcs_public"
            images_folder = "assets/images"
            "#,
        )
        .unwrap();
        assert_eq!(config.protocol, Protocol::Https);
        assert_eq!(config.public_disk, "gcs_public");
    }
}
