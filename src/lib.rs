//! Avatar normalization: turn a user-selected image into a fixed-size JPEG avatar.
//!
//! Two paths share the same stages:
//!
//! 1. **Decode**: `FileInput -> SourceImage` after MIME/size validation ([`decode_image`])
//! 2. **Plan**: automatic letterbox ([`plan_letterbox`]) or interactive crop/zoom/rotate
//!    ([`CropPlanner`])
//! 3. **Composite**: onto an opaque output surface filled with the background colour
//!    ([`compose_letterbox`], [`compose_crop`])
//! 4. **Encode**: JPEG bytes plus a unique storage key ([`encode_jpeg`], [`AvatarKeyGen`])
//! 5. **Hand off**: to an external [`UploadSink`]
//!
//! The interactive path is driven by [`CropSession`], a small state machine
//! (`Idle -> Loaded -> Editing -> Processing -> Confirmed | Cancelled`).
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO outside the upload sink and config loading**: every stage works on in-memory buffers.
//! - **Deterministic**: planning and compositing are pure functions of their inputs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod encode;
mod foundation;
mod geometry;
mod pipeline;
mod render;
mod session;
mod upload;

pub use assets::decode::{FileInput, PreviewHandle, SourceImage, decode_image, validate_input};
pub use config::{
    AvatarConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OUTPUT_SIZE, EncodeMode, InputLimits,
    OutputSpec, PlannerLimits, UploadOptions,
};
pub use encode::jpeg::{
    AVATAR_MIME_TYPE, AvatarEncoder, EncodedAvatar, JpegAvatarEncoder, encode_jpeg,
    jpeg_quality_percent,
};
pub use encode::naming::{AvatarKeyGen, validate_user_id};
pub use foundation::core::{Affine, Point, Rect, Rgb8, Size, Vec2};
pub use foundation::error::{AvatarError, AvatarResult};
pub use geometry::crop::{Corner, CropRegion, CropUnit, fit_display};
pub use geometry::letterbox::{LetterboxPlan, plan_letterbox};
pub use geometry::planner::{AvatarTransform, CropPlanner};
pub use pipeline::{ProfileAvatar, normalize_auto, plan_for, upload_avatar};
pub use render::compositor::{Surface, compose_crop, compose_letterbox, crop_affine, crop_to_natural};
pub use session::auth::{AuthEvent, AuthHub, AuthMode, AuthSession, AuthState, SubscriptionId};
pub use session::crop::{CropSession, SessionState};
pub use session::notice::{Notice, NoticeLevel};
pub use upload::sink::{DirectoryStore, UploadReceipt, UploadSink};
