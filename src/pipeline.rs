use crate::{
    assets::decode::{FileInput, decode_image},
    config::{AvatarConfig, EncodeMode, UploadOptions},
    encode::{
        jpeg::{AVATAR_MIME_TYPE, AvatarEncoder, EncodedAvatar},
        naming::AvatarKeyGen,
    },
    foundation::error::{AvatarError, AvatarResult},
    geometry::letterbox::{LetterboxPlan, plan_letterbox},
    render::compositor::compose_letterbox,
    session::notice::Notice,
    upload::sink::{UploadReceipt, UploadSink},
};

/// Decode, letterbox onto the output surface, and encode at the automatic quality.
#[tracing::instrument(skip(file, config, encoder, keys), fields(name = %file.name))]
pub fn normalize_auto(
    file: &FileInput,
    config: &AvatarConfig,
    encoder: &dyn AvatarEncoder,
    keys: &mut AvatarKeyGen,
    user_id: &str,
) -> AvatarResult<EncodedAvatar> {
    let source = decode_image(file, &config.input)?;
    let plan = plan_for(source.width(), source.height(), config)?;
    let surface = compose_letterbox(&source, &plan, config.output.background)?;
    drop(source);

    let bytes = encoder.encode(
        &surface,
        config.output.quality_for(EncodeMode::Automatic),
    )?;
    let file_name = keys.next_file_name(user_id)?;
    tracing::info!(%file_name, bytes = bytes.len(), "avatar normalized");
    Ok(EncodedAvatar {
        bytes,
        mime_type: AVATAR_MIME_TYPE,
        file_name,
    })
}

/// Letterbox plan for a source of the given natural size under `config`.
pub fn plan_for(width: u32, height: u32, config: &AvatarConfig) -> AvatarResult<LetterboxPlan> {
    plan_letterbox(width, height, config.output.width, config.output.height)
}

/// Hand an encoded avatar to the upload collaborator. Its errors become
/// [`AvatarError::Upload`] without interpretation.
pub fn upload_avatar(
    sink: &mut dyn UploadSink,
    avatar: EncodedAvatar,
    options: &UploadOptions,
) -> AvatarResult<UploadReceipt> {
    sink.upload(&avatar.file_name, &avatar.bytes, options)
        .map_err(|e| AvatarError::upload(format!("{e:#}")))
}

/// The user's current avatar URL; replaced only once a new upload succeeds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileAvatar {
    url: Option<String>,
}

impl ProfileAvatar {
    /// Start from an existing URL (or none).
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    /// Current URL.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Upload `avatar` and swap the URL on success. Every outcome yields one notice; on
    /// failure the previous URL is kept.
    pub fn replace(
        &mut self,
        sink: &mut dyn UploadSink,
        avatar: EncodedAvatar,
        options: &UploadOptions,
    ) -> (AvatarResult<UploadReceipt>, Notice) {
        match upload_avatar(sink, avatar, options) {
            Ok(receipt) => {
                self.url = Some(receipt.url.clone());
                (Ok(receipt), Notice::success("Photo updated successfully!"))
            }
            Err(err) => {
                tracing::warn!(error = %err, "avatar upload failed; keeping previous avatar");
                let notice = Notice::from(&err);
                (Err(err), notice)
            }
        }
    }

    /// Full automatic flow: normalize then replace. Validation and decode failures are
    /// reported the same way as upload failures.
    pub fn update_from_file(
        &mut self,
        file: &FileInput,
        config: &AvatarConfig,
        encoder: &dyn AvatarEncoder,
        keys: &mut AvatarKeyGen,
        user_id: &str,
        sink: &mut dyn UploadSink,
    ) -> (AvatarResult<UploadReceipt>, Notice) {
        match normalize_auto(file, config, encoder, keys, user_id) {
            Ok(avatar) => self.replace(sink, avatar, &config.upload),
            Err(err) => {
                let notice = Notice::from(&err);
                (Err(err), notice)
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
