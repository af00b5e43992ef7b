//! # Icon Attachments
//!
//! Records that own an icon file get it stored through the public storage
//! facade under `{images_folder}/{table}/{id}.{ext}`. The record exclusively
//! owns that file: replacing the icon deletes the old file first, and deleting
//! the record cleans the file up. Cleanup is best-effort — a failed storage
//! delete is logged and swallowed, never fatal.
//!
//! Image formats are detected from magic bytes; an unrecognizable source
//! fails with [`CoreError::Decode`]. GIF and PNG keep their extension,
//! anything else recognizable is stored as `.jpg`. Source bytes are written
//! verbatim (no re-encoding), which also preserves GIF animation for uploads.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use log::warn;
use serde_json::json;

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use crate::record::Record;
use crate::storage::{Storage, Visibility};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Image formats recognized by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Gif,
    Png,
    Jpeg,
    Bmp,
    WebP,
}

impl ImageFormat {
    /// Detect the format from leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Ok(ImageFormat::Gif);
        }
        if bytes.starts_with(&PNG_SIGNATURE) {
            return Ok(ImageFormat::Png);
        }
        if bytes.starts_with(&JPEG_SIGNATURE) {
            return Ok(ImageFormat::Jpeg);
        }
        if bytes.starts_with(b"BM") {
            return Ok(ImageFormat::Bmp);
        }
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Ok(ImageFormat::WebP);
        }
        Err(CoreError::Decode)
    }

    /// Stored file extension. GIF and PNG are kept; everything else lands on
    /// `.jpg`.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Gif => ".gif",
            ImageFormat::Png => ".png",
            _ => ".jpg",
        }
    }
}

/// Where icon bytes come from.
pub enum IconSource<'a> {
    /// Raw image bytes already in memory.
    Bytes(&'a [u8]),
    /// An uploaded file on local disk, read verbatim.
    Upload(&'a Path),
}

impl IconSource<'_> {
    fn bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            IconSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            IconSource::Upload(path) => Ok(Cow::Owned(fs::read(path).map_err(CoreError::Io)?)),
        }
    }
}

/// Persistence seam between a record and its external engine. Host
/// applications implement this; corekit never talks to the engine directly.
pub trait IconRecord {
    fn record(&self) -> &Record;
    fn record_mut(&mut self) -> &mut Record;

    /// Persist the record's current state.
    fn save(&mut self) -> Result<()>;

    /// Delete the record itself (the engine's base deletion).
    fn delete_record(&mut self) -> Result<()>;
}

/// Icon behavior, implemented entirely in terms of [`IconRecord`].
pub trait HasIcon: IconRecord {
    /// The stored icon file name, if an icon is set.
    fn icon_file(&self) -> Option<String> {
        self.record()
            .raw_attribute("icon")
            .and_then(|value| value.as_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    /// Full storage path of the current icon.
    fn icon_path(&self, config: &CoreConfig) -> Option<String> {
        self.icon_file().map(|file| {
            format!(
                "{}/{}/{}",
                config.images_folder,
                self.record().schema().table,
                file
            )
        })
    }

    /// Public URL of the current icon.
    fn icon_url(&self, storage: &Storage, config: &CoreConfig) -> Option<String> {
        self.icon_path(config).map(|path| storage.url(&path))
    }

    /// Set the icon field, keeping only the file name of whatever was given.
    fn set_icon(&mut self, value: &str) {
        let name = Storage::name(value);
        self.record_mut().set_raw_attribute("icon", json!(name));
    }

    /// Decode `source`, replace any existing icon file, write the new one to
    /// public storage, and persist the record.
    fn save_icon(
        &mut self,
        storage: &Storage,
        config: &CoreConfig,
        source: IconSource<'_>,
    ) -> Result<()> {
        let bytes = source.bytes()?;
        let format = ImageFormat::detect(&bytes)?;

        // Old file first; its name may carry a different extension
        self.delete_icon(storage, config);

        let file = format!("{}{}", self.record().id(), format.extension());
        self.set_icon(&file);
        let path = format!(
            "{}/{}/{}",
            config.images_folder,
            self.record().schema().table,
            file
        );
        storage.put(&path, &bytes, Some(Visibility::Public))?;

        self.save()
    }

    /// Delete the current icon file, if any. Failures are logged and
    /// swallowed; cleanup must never block the caller.
    fn delete_icon(&mut self, storage: &Storage, config: &CoreConfig) {
        if let Some(path) = self.icon_path(config) {
            if let Err(err) = storage.delete(&path) {
                warn!("could not delete icon {}: {}", path, err);
            }
        }
    }

    /// Delete the record, cleaning its icon file up first.
    fn delete(&mut self, storage: &Storage, config: &CoreConfig) -> Result<()> {
        self.delete_icon(storage, config);
        self.delete_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent GIF
    const GIF_BYTES: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
    ];

    #[test]
    fn test_detect_gif() {
        assert_eq!(ImageFormat::detect(GIF_BYTES).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_detect_png() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0; 8]);
        assert_eq!(ImageFormat::detect(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg_maps_to_jpg_extension() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let format = ImageFormat::detect(&bytes).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(format.extension(), ".jpg");
    }

    #[test]
    fn test_detect_bmp_and_webp_store_as_jpg() {
        assert_eq!(ImageFormat::detect(b"BM0000").unwrap().extension(), ".jpg");
        let webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert_eq!(ImageFormat::detect(webp).unwrap().extension(), ".jpg");
    }

    #[test]
    fn test_undetectable_source_fails_decode() {
        assert!(matches!(
            ImageFormat::detect(b"not an image"),
            Err(CoreError::Decode)
        ));
        assert!(matches!(ImageFormat::detect(&[]), Err(CoreError::Decode)));
    }
}
