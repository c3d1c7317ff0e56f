use crate::{
    assets::decode::{FileInput, PreviewHandle, SourceImage, decode_image},
    config::{AvatarConfig, EncodeMode},
    encode::{
        jpeg::{AVATAR_MIME_TYPE, AvatarEncoder, EncodedAvatar, JpegAvatarEncoder},
        naming::AvatarKeyGen,
    },
    foundation::{
        core::Size,
        error::{AvatarError, AvatarResult},
    },
    geometry::{crop::fit_display, planner::CropPlanner},
    render::compositor::compose_crop,
    session::notice::Notice,
};

/// Lifecycle of one interactive avatar edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No image selected.
    Idle,
    /// Bitmap decoded, initial crop being computed.
    Loaded,
    /// User is adjusting crop/zoom/rotation.
    Editing,
    /// Compositing and encoding.
    Processing,
    /// Encoded avatar handed to the caller. Terminal.
    Confirmed,
    /// Closed without producing an avatar. Terminal.
    Cancelled,
}

impl SessionState {
    /// `Confirmed` or `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }
}

/// Interactive crop/zoom/rotate session.
///
/// Mutual exclusion of compositing passes follows from `&mut self`: a second confirm can
/// only start after the first returned, and by then the session is terminal or back in
/// `Editing`.
pub struct CropSession {
    config: AvatarConfig,
    encoder: Box<dyn AvatarEncoder>,
    state: SessionState,
    source: Option<SourceImage>,
    preview: Option<PreviewHandle>,
    planner: Option<CropPlanner>,
    notices: Vec<Notice>,
}

impl std::fmt::Debug for CropSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSession")
            .field("state", &self.state)
            .field("has_source", &self.source.is_some())
            .field("preview_active", &self.preview.is_some())
            .field("planner", &self.planner)
            .finish()
    }
}

impl CropSession {
    /// New idle session using the JPEG encoder.
    pub fn new(config: AvatarConfig) -> AvatarResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encoder: Box::new(JpegAvatarEncoder),
            state: SessionState::Idle,
            source: None,
            preview: None,
            planner: None,
            notices: Vec::new(),
        })
    }

    /// Replace the encoder used by [`CropSession::confirm`].
    pub fn with_encoder(mut self, encoder: Box<dyn AvatarEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the temporary preview reference is still held.
    pub fn preview_active(&self) -> bool {
        self.preview.is_some()
    }

    /// Read access to the planner while an image is loaded.
    pub fn planner(&self) -> Option<&CropPlanner> {
        self.planner.as_ref()
    }

    /// Mutable planner access; only available while `Editing`.
    pub fn planner_mut(&mut self) -> Option<&mut CropPlanner> {
        if self.state == SessionState::Editing {
            self.planner.as_mut()
        } else {
            None
        }
    }

    /// Drain pending notifications.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "crop session transition");
        self.state = next;
    }

    fn release_resources(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
        self.source = None;
        self.planner = None;
    }

    /// Decode `file` and enter `Editing` with the image fitted inside `display_box`.
    ///
    /// On failure the session stays `Idle` and an error notice is queued.
    pub fn load(&mut self, file: &FileInput, display_box: Size) -> AvatarResult<()> {
        if self.state != SessionState::Idle {
            return Err(AvatarError::validation(format!(
                "cannot load an image while {:?}",
                self.state
            )));
        }

        let prepared = decode_image(file, &self.config.input).and_then(|source| {
            let display = fit_display(source.natural_size(), display_box)?;
            Ok((source, display))
        });
        let (source, display) = match prepared {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "avatar load rejected");
                self.notices.push(Notice::from(&err));
                return Err(err);
            }
        };

        self.preview = Some(source.preview());
        self.source = Some(source);
        self.transition(SessionState::Loaded);

        match CropPlanner::new(display, self.config.planner.clone()) {
            Ok(planner) => {
                self.planner = Some(planner);
                self.transition(SessionState::Editing);
                Ok(())
            }
            Err(err) => {
                self.release_resources();
                self.transition(SessionState::Idle);
                self.notices.push(Notice::from(&err));
                Err(err)
            }
        }
    }

    /// Composite and encode the committed crop.
    ///
    /// Returns `Ok(None)` without any transition when not `Editing` or when no crop has
    /// been committed yet. A failure returns to `Editing` with the crop and transform intact.
    #[tracing::instrument(skip(self, keys))]
    pub fn confirm(
        &mut self,
        keys: &mut AvatarKeyGen,
        user_id: &str,
    ) -> AvatarResult<Option<EncodedAvatar>> {
        if self.state != SessionState::Editing {
            return Ok(None);
        }
        let (Some(source), Some(planner)) = (self.source.as_ref(), self.planner.as_ref()) else {
            return Ok(None);
        };
        let Some(crop) = planner.completed_crop() else {
            tracing::debug!("confirm ignored: no committed crop");
            return Ok(None);
        };
        let display = planner.display();
        let transform = planner.transform();
        let source = source.clone();

        self.transition(SessionState::Processing);
        let spec = &self.config.output;
        let result = compose_crop(&source, &crop, display, &transform, spec)
            .and_then(|surface| {
                self.encoder
                    .encode(&surface, spec.quality_for(EncodeMode::Interactive))
            })
            .and_then(|bytes| {
                Ok(EncodedAvatar {
                    bytes,
                    mime_type: AVATAR_MIME_TYPE,
                    file_name: keys.next_file_name(user_id)?,
                })
            });

        match result {
            Ok(avatar) => {
                tracing::info!(file_name = %avatar.file_name, bytes = avatar.bytes.len(), "avatar cropped");
                self.release_resources();
                self.transition(SessionState::Confirmed);
                Ok(Some(avatar))
            }
            Err(err) => {
                tracing::warn!(error = %err, "avatar processing failed; back to editing");
                self.notices.push(Notice::from(&err));
                self.transition(SessionState::Editing);
                Err(err)
            }
        }
    }

    /// Close the editor. No-op once terminal.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.release_resources();
        self.transition(SessionState::Cancelled);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/crop.rs"]
mod tests;
