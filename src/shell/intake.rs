use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ACCEPTED_TYPES: [&str; 2] = ["image/png", "image/jpeg"];
pub const DEFAULT_MAX_SIZE_MB: u64 = 5;

const SNIFF_LEN: u64 = 64;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntakeError {
    #[error("Invalid file type. Please upload {accepted} files.")]
    InvalidType { found: String, accepted: String },

    #[error("File is too large. Maximum size is {max_mb}MB.")]
    TooLarge { size: u64, max_mb: u64 },

    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// An accepted upload, shared cheaply between the UI and the analysis task
#[derive(Clone, PartialEq)]
pub struct SelectedImage {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedImage")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub accepted_types: Vec<String>,
    pub max_size_mb: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_types: DEFAULT_ACCEPTED_TYPES.iter().map(|t| t.to_string()).collect(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
        }
    }
}

impl UploadPolicy {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    /// Human form of the accepted list, e.g. `png or jpeg`
    pub fn accepted_label(&self) -> String {
        self.accepted_types
            .iter()
            .map(|t| t.trim().trim_start_matches("image/"))
            .collect::<Vec<_>>()
            .join(" or ")
    }

    /// Type first, then size
    pub fn validate(&self, mime_type: &str, size: u64) -> Result<(), IntakeError> {
        if !self.accepted_types.iter().any(|t| t.trim() == mime_type) {
            return Err(IntakeError::InvalidType {
                found: mime_type.to_string(),
                accepted: self.accepted_label(),
            });
        }

        if size > self.max_size_bytes() {
            return Err(IntakeError::TooLarge { size, max_mb: self.max_size_mb });
        }

        Ok(())
    }

    pub fn accept_bytes(&self, name: &str, mime_type: &str, bytes: Vec<u8>) -> Result<SelectedImage, IntakeError> {
        let mime_type = if mime_type.is_empty() {
            sniff_mime(&bytes).unwrap_or_default()
        } else {
            mime_type
        };

        self.validate(mime_type, bytes.len() as u64)?;
        debug!("Accepted {} ({}, {} bytes)", name, mime_type, bytes.len());

        Ok(SelectedImage {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.into(),
        })
    }

    /// Validate a file on disk before reading it whole
    pub fn load_path(&self, path: &Path) -> Result<SelectedImage, IntakeError> {
        let unreadable = |e: std::io::Error| IntakeError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let size = fs::metadata(path).map_err(unreadable)?.len();

        let mime_type = match mime_from_extension(path) {
            Some(mime) => mime,
            None => {
                let mut head = Vec::new();
                File::open(path)
                    .and_then(|f| f.take(SNIFF_LEN).read_to_end(&mut head))
                    .map_err(unreadable)?;
                sniff_mime(&head).unwrap_or_default()
            }
        };

        self.validate(mime_type, size)?;

        let bytes = fs::read(path).map_err(unreadable)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Loaded {} ({}, {} bytes)", name, mime_type, bytes.len());
        Ok(SelectedImage {
            name,
            mime_type: mime_type.to_string(),
            bytes: bytes.into(),
        })
    }
}

pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path).ok().map(|f| f.to_mime_type())
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn accepted_label_strips_prefix() {
        assert_eq!(UploadPolicy::default().accepted_label(), "png or jpeg");
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(mime_from_extension(Path::new("lever.PNG")), Some("image/png"));
        assert_eq!(mime_from_extension(Path::new("photo.jpg")), Some("image/jpeg"));
        assert_eq!(mime_from_extension(Path::new("anim.gif")), Some("image/gif"));
        assert_eq!(mime_from_extension(Path::new("notes.txt")), None);
    }

    #[test]
    fn sniffs_png_when_type_is_unknown() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(&[0; 32]);
        let image = UploadPolicy::default().accept_bytes("drop", "", bytes).unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn unknown_content_is_an_invalid_type() {
        let err = UploadPolicy::default().accept_bytes("drop", "", b"hello".to_vec()).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidType { .. }));
    }
}
