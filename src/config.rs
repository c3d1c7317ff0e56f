use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::Rgb8,
    error::{AvatarError, AvatarResult},
};

/// Maximum accepted input size (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
/// Side length of the square avatar output.
pub const DEFAULT_OUTPUT_SIZE: u32 = 400;

/// Which path produced an avatar; selects the JPEG quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeMode {
    /// Resize-and-letterbox without user input.
    Automatic,
    /// User-driven crop/zoom/rotate.
    Interactive,
}

/// Fixed output surface and encoding parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Opaque fill for every pixel not covered by the source.
    pub background: Rgb8,
    /// JPEG quality in `(0, 1]` for the automatic path.
    pub auto_quality: f32,
    /// JPEG quality in `(0, 1]` for the interactive path.
    pub interactive_quality: f32,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_SIZE,
            height: DEFAULT_OUTPUT_SIZE,
            background: Rgb8::WHITE,
            auto_quality: 0.8,
            interactive_quality: 0.9,
        }
    }
}

impl OutputSpec {
    /// Quality factor for the given mode.
    pub fn quality_for(&self, mode: EncodeMode) -> f32 {
        match mode {
            EncodeMode::Automatic => self.auto_quality,
            EncodeMode::Interactive => self.interactive_quality,
        }
    }

    /// Reject zero-sized outputs and out-of-range qualities.
    pub fn validate(&self) -> AvatarResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AvatarError::validation(
                "output width/height must be non-zero",
            ));
        }
        for (name, q) in [
            ("auto_quality", self.auto_quality),
            ("interactive_quality", self.interactive_quality),
        ] {
            if !(q > 0.0 && q <= 1.0) {
                return Err(AvatarError::validation(format!(
                    "{name} must be in (0, 1], got {q}"
                )));
            }
        }
        Ok(())
    }
}

/// Pre-decode acceptance rules.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Largest accepted file in bytes.
    pub max_bytes: u64,
    /// Accepted MIME types, lowercase.
    pub allowed_mime_types: Vec<String>,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_mime_types: ["image/jpeg", "image/jpg", "image/png", "image/gif"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Bounds for the interactive crop editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlannerLimits {
    /// Initial crop side as a fraction of the displayed width.
    pub initial_fraction: f64,
    /// Smallest crop side in display pixels.
    pub min_side: f64,
    /// Zoom slider lower bound.
    pub scale_min: f64,
    /// Zoom slider upper bound.
    pub scale_max: f64,
    /// Zoom slider step.
    pub scale_step: f64,
    /// Rotation slider lower bound in degrees.
    pub rotation_min: f64,
    /// Rotation slider upper bound in degrees.
    pub rotation_max: f64,
    /// Rotation slider step in degrees.
    pub rotation_step: f64,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            initial_fraction: 0.8,
            min_side: 100.0,
            scale_min: 0.5,
            scale_max: 3.0,
            scale_step: 0.1,
            rotation_min: -180.0,
            rotation_max: 180.0,
            rotation_step: 15.0,
        }
    }
}

impl PlannerLimits {
    /// Reject inverted ranges and non-positive steps.
    pub fn validate(&self) -> AvatarResult<()> {
        if !(self.initial_fraction > 0.0 && self.initial_fraction <= 1.0) {
            return Err(AvatarError::validation(
                "initial_fraction must be in (0, 1]",
            ));
        }
        if !(self.min_side >= 0.0) {
            return Err(AvatarError::validation("min_side must be >= 0"));
        }
        if !(self.scale_min > 0.0 && self.scale_min <= 1.0 && self.scale_max >= 1.0) {
            return Err(AvatarError::validation(
                "scale range must be positive and contain 1.0",
            ));
        }
        if !(self.rotation_min <= 0.0 && self.rotation_max >= 0.0) {
            return Err(AvatarError::validation("rotation range must contain 0"));
        }
        if !(self.scale_step > 0.0 && self.rotation_step > 0.0) {
            return Err(AvatarError::validation("slider steps must be > 0"));
        }
        Ok(())
    }
}

/// Options forwarded to the upload collaborator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// `Cache-Control` max-age in seconds, as a string.
    pub cache_control: String,
    /// Overwrite an existing object with the same key.
    pub upsert: bool,
    /// Storage bucket name.
    pub bucket: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            upsert: true,
            bucket: "avatars".to_string(),
        }
    }
}

/// Full configuration document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Output surface and encoding.
    pub output: OutputSpec,
    /// Input acceptance rules.
    pub input: InputLimits,
    /// Interactive editor bounds.
    pub planner: PlannerLimits,
    /// Upload handoff options.
    pub upload: UploadOptions,
}

impl AvatarConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> AvatarResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `AVATAR_MAX_UPLOAD_BYTES` and `AVATAR_OUTPUT_SIZE` overrides.
    pub fn apply_env(mut self) -> Self {
        if let Some(max) = env_positive("AVATAR_MAX_UPLOAD_BYTES") {
            self.input.max_bytes = max;
        }
        if let Some(side) = env_positive("AVATAR_OUTPUT_SIZE").and_then(|v| u32::try_from(v).ok())
        {
            self.output.width = side;
            self.output.height = side;
        }
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> AvatarResult<()> {
        self.output.validate()?;
        self.planner.validate()?;
        if self.input.allowed_mime_types.is_empty() {
            return Err(AvatarError::validation(
                "allowed_mime_types must not be empty",
            ));
        }
        if self.upload.bucket.trim().is_empty() {
            return Err(AvatarError::validation("upload bucket must not be empty"));
        }
        Ok(())
    }
}

fn env_positive(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&n| n > 0)
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
