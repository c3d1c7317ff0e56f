use std::sync::Arc;

use crate::{
    config::InputLimits,
    foundation::core::Size,
    foundation::error::{AvatarError, AvatarResult},
};

/// A user-selected file as handed over by the file picker.
#[derive(Clone, Debug)]
pub struct FileInput {
    /// Original file name.
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileInput {
    /// Build an input whose declared size is the byte length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Guess a MIME type from the file extension; unknown extensions map to
    /// `application/octet-stream` so validation rejects them.
    pub fn mime_from_name(name: &str) -> &'static str {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Decoded bitmap in straight-alpha RGBA8.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: Arc<image::RgbaImage>,
}

impl SourceImage {
    /// Wrap an already decoded bitmap.
    pub fn from_rgba(pixels: image::RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Natural dimensions.
    pub fn natural_size(&self) -> Size {
        Size::from_u32(self.width(), self.height())
    }

    /// Pixel buffer.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Create the preview reference shown while the user edits.
    pub fn preview(&self) -> PreviewHandle {
        PreviewHandle {
            pixels: Arc::clone(&self.pixels),
        }
    }
}

/// Temporary on-screen reference to a decoded image.
///
/// Consumed by [`PreviewHandle::release`], so a handle can be released at most once.
#[derive(Debug)]
pub struct PreviewHandle {
    pixels: Arc<image::RgbaImage>,
}

impl PreviewHandle {
    /// Dimensions of the previewed bitmap.
    pub fn size(&self) -> Size {
        Size::from_u32(self.pixels.width(), self.pixels.height())
    }

    /// Drop the preview reference.
    pub fn release(self) {
        tracing::debug!(
            width = self.pixels.width(),
            height = self.pixels.height(),
            "preview released"
        );
    }
}

/// Check MIME type and size bound before any decoding work happens.
pub fn validate_input(file: &FileInput, limits: &InputLimits) -> AvatarResult<()> {
    let mime = file.mime_type.trim();
    if !limits
        .allowed_mime_types
        .iter()
        .any(|m| m.trim().eq_ignore_ascii_case(mime))
    {
        return Err(AvatarError::invalid_format(format!(
            "mime type '{}' is not accepted",
            file.mime_type
        )));
    }
    let size = file.size.max(file.bytes.len() as u64);
    if size > limits.max_bytes {
        return Err(AvatarError::TooLarge {
            size,
            max: limits.max_bytes,
        });
    }
    Ok(())
}

/// Validate and decode a selected file into a [`SourceImage`].
#[tracing::instrument(skip(file, limits), fields(name = %file.name, size = file.size))]
pub fn decode_image(file: &FileInput, limits: &InputLimits) -> AvatarResult<SourceImage> {
    validate_input(file, limits)?;

    let dyn_img = image::load_from_memory(&file.bytes)
        .map_err(|e| AvatarError::invalid_format(format!("cannot decode '{}': {e}", file.name)))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(AvatarError::invalid_format(format!(
            "'{}' decoded to an empty image",
            file.name
        )));
    }
    tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded source");
    Ok(SourceImage::from_rgba(rgba))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
