//! Local filesystem implementation of `MediaStore`.
//!
//! Content-addressable: the SHA-256 of the bytes is the media reference,
//! so duplicate uploads share one file on disk.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use domains::ports::MediaStore;
use domains::{AppError, Result};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g. "./data/uploads").
    root_path: PathBuf,
    /// Public URL prefix (e.g. "/uploads").
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix,
        }
    }

    /// Sharded path under the root: "ab/cd/ab cd ef...".
    fn sharded_path(&self, hash: &str) -> PathBuf {
        let mut path = self.root_path.clone();
        path.push(&hash[0..2]);
        path.push(&hash[2..4]);
        path.push(hash);
        path
    }
}

fn io_err(err: std::io::Error) -> AppError {
    AppError::Internal(format!("media store io error: {err}"))
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save_upload(&self, data: Bytes, content_type: &str) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let hash = format!("{:x}", hasher.finalize());

        let target_path = self.sharded_path(&hash);
        let parent = target_path
            .parent()
            .ok_or_else(|| AppError::Internal("media path has no parent".into()))?;
        fs::create_dir_all(parent).await.map_err(io_err)?;

        if fs::try_exists(&target_path).await.map_err(io_err)? {
            debug!(%hash, "upload deduplicated");
        } else {
            fs::write(&target_path, &data).await.map_err(io_err)?;
            debug!(%hash, content_type, size = data.len(), "upload stored");
        }
        Ok(hash)
    }

    fn url(&self, media_ref: &str) -> String {
        if media_ref.len() < 4 {
            return format!("{}/{}", self.url_prefix, media_ref);
        }
        format!(
            "{}/{}/{}/{}",
            self.url_prefix,
            &media_ref[0..2],
            &media_ref[2..4],
            media_ref
        )
    }
}
