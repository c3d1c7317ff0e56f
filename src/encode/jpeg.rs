use crate::{
    foundation::error::{AvatarError, AvatarResult},
    render::compositor::Surface,
};

/// MIME type of every encoded avatar.
pub const AVATAR_MIME_TYPE: &str = "image/jpeg";

/// Final encoded avatar, ready for the upload collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedAvatar {
    /// Compressed image bytes.
    pub bytes: Vec<u8>,
    /// Always [`AVATAR_MIME_TYPE`].
    pub mime_type: &'static str,
    /// Generated storage key, `avatar-{user}-{millis}.jpg`.
    pub file_name: String,
}

/// Serializes a composited surface. The seam exists so callers can swap codecs.
pub trait AvatarEncoder {
    /// Encode `surface` with `quality` in `(0, 1]`.
    fn encode(&self, surface: &Surface, quality: f32) -> AvatarResult<Vec<u8>>;
}

/// Baseline JPEG via the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct JpegAvatarEncoder;

impl AvatarEncoder for JpegAvatarEncoder {
    fn encode(&self, surface: &Surface, quality: f32) -> AvatarResult<Vec<u8>> {
        encode_jpeg(surface, quality)
    }
}

/// Map a `(0, 1]` quality factor to the codec's `1..=100` scale.
pub fn jpeg_quality_percent(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode an opaque RGB surface as JPEG.
pub fn encode_jpeg(surface: &Surface, quality: f32) -> AvatarResult<Vec<u8>> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(AvatarError::encode(format!(
            "cannot encode an empty {width}x{height} surface"
        )));
    }
    if surface.as_raw().len() != (width as usize) * (height as usize) * 3 {
        return Err(AvatarError::encode("surface buffer does not match its size"));
    }

    let mut buf = Vec::new();
    {
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut buf,
            jpeg_quality_percent(quality),
        );
        encoder
            .encode(
                surface.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| AvatarError::encode(format!("jpeg encode failed: {e}")))?;
    }
    tracing::debug!(width, height, quality, bytes = buf.len(), "jpeg encoded");
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
