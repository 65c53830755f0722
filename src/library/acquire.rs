//! Manual selection: turn user-chosen paths into tracks.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::LibrarySettings;

use super::error::AcquireError;
use super::media::{is_audio_type, media_type_for};
use super::model::{MediaRegistry, SourceFile, Track};
use super::naming::parse_file_name;

/// Tracks produced by one acquisition request.
#[derive(Debug, Default)]
pub struct Acquired {
    pub tracks: Vec<Track>,
    /// Audio files that could not be accessed.
    pub skipped: usize,
}

impl Acquired {
    /// Fold the result of `accept` for one entry into the batch.
    pub(crate) fn push(&mut self, entry: Result<Option<Track>, AcquireError>) {
        match entry {
            Ok(Some(track)) => self.tracks.push(track),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "skipping file");
                self.skipped += 1;
            }
        }
    }
}

/// Build a track for `path` if it is an audio file the user can read.
///
/// `Ok(None)` means the entry is not audio and was filtered out.
pub(crate) fn accept(
    path: &Path,
    registry: &MediaRegistry,
    settings: &LibrarySettings,
) -> Result<Option<Track>, AcquireError> {
    let Some(media_type) = media_type_for(path).filter(|t| is_audio_type(t)) else {
        debug!(path = %path.display(), "not audio, ignored");
        return Ok(None);
    };

    File::open(path).map_err(|source| AcquireError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (name, artist) = parse_file_name(&file_name, &settings.unknown_artist);

    Ok(Some(Track {
        name,
        artist,
        source: SourceFile {
            path: path.to_path_buf(),
            media_type,
        },
        url: registry.register(path),
    }))
}

/// Manual selection of files.
///
/// Paths keep the order they were given in. A directory stands for all of
/// its direct children, sorted by file name.
pub fn from_paths(
    paths: &[PathBuf],
    registry: &MediaRegistry,
    settings: &LibrarySettings,
) -> Acquired {
    let mut acquired = Acquired::default();

    for path in paths {
        if path.is_dir() {
            match list_dir(path) {
                Ok(children) => {
                    for child in children.iter().filter(|p| p.is_file()) {
                        acquired.push(accept(child, registry, settings));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "cannot list directory");
                    acquired.skipped += 1;
                }
            }
        } else {
            acquired.push(accept(path, registry, settings));
        }
    }

    acquired
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, AcquireError> {
    let io_err = |source| AcquireError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut children = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    children.sort();
    Ok(children)
}
