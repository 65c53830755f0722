use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// The file behind a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub media_type: &'static str,
}

/// One playable item in the playlist.
///
/// `name` and `artist` come from the filename only. `url` is the handle the
/// audio thread resolves to open `source`; it is revoked when the track is
/// dropped.
#[derive(Debug)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub source: SourceFile,
    pub url: MediaUrl,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: HashMap<String, PathBuf>,
}

/// Shared table of live media URLs.
///
/// Cloning is cheap; all clones see the same table. The audio thread only
/// ever resolves URLs, ownership stays with the `MediaUrl` guards.
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // The table holds plain data; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocate a fresh URL for `path`.
    pub fn register(&self, path: &Path) -> MediaUrl {
        let mut inner = self.lock();
        inner.next_id += 1;
        let url = format!("media://{}", inner.next_id);
        inner.entries.insert(url.clone(), path.to_path_buf());
        MediaUrl {
            url,
            registry: self.clone(),
        }
    }

    /// Path bound to `url`, or `None` once it has been revoked.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.lock().entries.get(url).cloned()
    }

    /// Number of URLs currently alive.
    pub fn live(&self) -> usize {
        self.lock().entries.len()
    }

    fn revoke(&self, url: &str) {
        self.lock().entries.remove(url);
    }
}

/// Owning guard for one registered URL.
pub struct MediaUrl {
    url: String,
    registry: MediaRegistry,
}

impl MediaUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaUrl").field(&self.url).finish()
    }
}

impl Drop for MediaUrl {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
