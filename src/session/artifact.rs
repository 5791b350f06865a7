use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{NovaError, NovaResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// File name offered when saving a finished clip.
pub const SUGGESTED_FILENAME: &str = "novaforge-sequence.webm";

const URL_PREFIX: &str = "blob:novaforge/";

/// A finished, encoded clip.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoArtifact {
    /// Container/codec type the bytes were produced as.
    pub mime: String,
    /// Encoded bytes, chunks concatenated in delivery order.
    pub bytes: Vec<u8>,
    /// Frames pushed into the encoder.
    pub frames: u64,
    /// Clip length in seconds.
    pub duration_secs: f64,
}

/// Playable reference to an artifact held by an [`ArtifactStore`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactHandle {
    /// Store-unique id.
    pub id: u64,
    /// `blob:novaforge/<id>`.
    pub url: String,
    /// Mime type of the referenced artifact.
    pub mime: String,
}

#[derive(Debug, Default)]
struct StoreInner {
    next_id: u64,
    live: HashMap<u64, Arc<VideoArtifact>>,
}

/// Registry of live artifacts, addressed by handle.
///
/// Cloning shares the registry. A revoked handle no longer resolves.
#[derive(Clone, Debug, Default)]
pub struct ArtifactStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl ArtifactStore {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `artifact` and return a fresh handle.
    pub fn create(&self, artifact: VideoArtifact) -> ArtifactHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        let handle = ArtifactHandle {
            id,
            url: format!("{URL_PREFIX}{id}"),
            mime: artifact.mime.clone(),
        };
        inner.live.insert(id, Arc::new(artifact));
        handle
    }

    /// Resolve a handle. `None` once revoked.
    pub fn get(&self, handle: &ArtifactHandle) -> Option<Arc<VideoArtifact>> {
        self.lock().live.get(&handle.id).cloned()
    }

    /// Release a handle. Returns `false` when it was already revoked.
    pub fn revoke(&self, handle: &ArtifactHandle) -> bool {
        self.lock().live.remove(&handle.id).is_some()
    }

    /// Number of artifacts still registered.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Write the artifact's bytes to `dir`/[`SUGGESTED_FILENAME`].
    pub fn save_to_dir(&self, handle: &ArtifactHandle, dir: &Path) -> NovaResult<PathBuf> {
        let path = dir.join(SUGGESTED_FILENAME);
        self.save_as(handle, &path)?;
        Ok(path)
    }

    /// Write the artifact's bytes to `path`, creating parent directories.
    pub fn save_as(&self, handle: &ArtifactHandle, path: &Path) -> NovaResult<()> {
        let artifact = self.get(handle).ok_or_else(|| {
            NovaError::invalid_input(format!("artifact {} has been revoked", handle.url))
        })?;
        ensure_parent_dir(path)?;
        use anyhow::Context as _;
        std::fs::write(path, &artifact.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "saved clip");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/artifact.rs"]
mod tests;
