use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{config::UploadOptions, encode::jpeg::AVATAR_MIME_TYPE};

/// Successful upload result.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadReceipt {
    /// Storage key the object was written under.
    pub key: String,
    /// Public URL of the stored object.
    pub url: String,
}

/// External object storage that receives encoded avatars.
///
/// Errors are opaque to this crate; callers wrap them as [`crate::AvatarError::Upload`].
pub trait UploadSink {
    /// Store `bytes` under `key` in `options.bucket`.
    fn upload(
        &mut self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> anyhow::Result<UploadReceipt>;
}

#[derive(serde::Serialize)]
struct ObjectMeta<'a> {
    content_type: &'a str,
    cache_control: &'a str,
    size: usize,
}

/// Bucket store on the local filesystem: objects land at `{root}/{bucket}/{key}`.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
    public_base_url: String,
}

impl DirectoryStore {
    /// Store rooted at `root`, advertising URLs under `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for `key` in `bucket`.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        let base = self.public_base_url.trim_end_matches('/');
        format!("{base}/{bucket}/{key}")
    }

    fn object_path(&self, bucket: &str, key: &str) -> anyhow::Result<PathBuf> {
        for (what, part) in [("bucket", bucket), ("key", key)] {
            anyhow::ensure!(
                !part.is_empty()
                    && part != "."
                    && part != ".."
                    && part
                        .chars()
                        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')),
                "invalid {what} '{part}'"
            );
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl UploadSink for DirectoryStore {
    #[tracing::instrument(skip(self, bytes, options), fields(bucket = %options.bucket, len = bytes.len()))]
    fn upload(
        &mut self,
        key: &str,
        bytes: &[u8],
        options: &UploadOptions,
    ) -> anyhow::Result<UploadReceipt> {
        let path = self.object_path(&options.bucket, key)?;
        if !options.upsert && path.exists() {
            anyhow::bail!("object '{key}' already exists in bucket '{}'", options.bucket);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create bucket dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;

        let meta = ObjectMeta {
            content_type: AVATAR_MIME_TYPE,
            cache_control: &options.cache_control,
            size: bytes.len(),
        };
        let meta_path = path.with_file_name(format!("{key}.meta.json"));
        let meta_json = serde_json::to_vec_pretty(&meta).context("serialize object metadata")?;
        std::fs::write(&meta_path, meta_json)
            .with_context(|| format!("write '{}'", meta_path.display()))?;

        let url = self.public_url(&options.bucket, key);
        tracing::info!(%url, "avatar stored");
        Ok(UploadReceipt {
            key: key.to_string(),
            url,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upload/sink.rs"]
mod tests;
