/// Convenience result type used across the crate.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Top-level error taxonomy for avatar normalization.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// Unsupported MIME type, or bytes that do not decode as an image.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Input exceeds the configured size bound.
    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge {
        /// Size of the rejected input in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max: u64,
    },

    /// Compositing or encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Opaque failure surfaced by the upload collaborator.
    #[error("upload error: {0}")]
    Upload(String),

    /// Invalid configuration, geometry, or identity data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build an [`AvatarError::InvalidFormat`] value.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Build an [`AvatarError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build an [`AvatarError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build an [`AvatarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short message suitable for a non-blocking notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFormat(_) => "Unsupported format. Use JPG, PNG or GIF.".to_string(),
            Self::TooLarge { max, .. } => {
                format!("File too large. Maximum {}.", human_bytes(*max))
            }
            Self::Encode(_) => "Could not process the image.".to_string(),
            Self::Upload(msg) => format!("Could not upload the photo: {msg}"),
            Self::Validation(msg) => msg.clone(),
            Self::Other(err) => format!("Unexpected error: {err}"),
        }
    }
}

fn human_bytes(n: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if n >= MIB && n % MIB == 0 {
        format!("{} MB", n / MIB)
    } else if n >= MIB {
        format!("{:.1} MB", n as f64 / MIB as f64)
    } else if n >= KIB {
        format!("{} KB", n / KIB)
    } else {
        format!("{n} bytes")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
