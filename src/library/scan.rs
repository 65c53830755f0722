//! "Scan device music": bulk acquisition through the first available picker.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{LibrarySettings, PickerKind, ScanSettings, default_music_dir};

use super::acquire::{Acquired, accept};
use super::error::AcquireError;
use super::media::extension_allowed;
use super::model::MediaRegistry;

/// Paths a picker handed back.
#[derive(Debug, Default)]
pub struct Picked {
    pub paths: Vec<PathBuf>,
    /// Entries the picker saw but could not read.
    pub unreadable: usize,
}

/// One way of letting the user choose many files at once.
pub trait Picker: Send {
    fn kind(&self) -> PickerKind;
    /// Capability check; cheap and side-effect free.
    fn is_available(&self) -> bool;
    fn pick(&self) -> Result<Picked, AcquireError>;
}

/// Enumerates the entries of a music folder.
pub struct FolderPicker {
    dir: Option<PathBuf>,
    settings: LibrarySettings,
}

impl FolderPicker {
    pub fn new(dir: Option<PathBuf>, settings: LibrarySettings) -> Self {
        Self { dir, settings }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl Picker for FolderPicker {
    fn kind(&self) -> PickerKind {
        PickerKind::Folder
    }

    fn is_available(&self) -> bool {
        self.dir.as_deref().is_some_and(Path::is_dir)
    }

    fn pick(&self) -> Result<Picked, AcquireError> {
        let dir = self.dir.as_deref().ok_or(AcquireError::Unavailable)?;
        let settings = &self.settings;

        let mut walker = WalkDir::new(dir)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut picked = Picked::default();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        {
            match entry {
                Ok(e) if e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file()) => {
                    picked.paths.push(e.into_path());
                }
                Ok(_) => {}
                Err(e) if e.depth() == 0 => {
                    return Err(AcquireError::Io {
                        path: dir.to_path_buf(),
                        source: e.into_io_error().unwrap_or_else(|| {
                            std::io::Error::other("filesystem loop at scan root")
                        }),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "unreadable entry during folder scan");
                    picked.unreadable += 1;
                }
            }
        }
        Ok(picked)
    }
}

/// Runs an external multi-file picker (zenity, kdialog, ...).
///
/// The command prints one path per line; exit status 1 means cancelled.
pub struct CommandPicker {
    command: Vec<String>,
    extensions: Vec<String>,
}

impl CommandPicker {
    pub fn new(command: Vec<String>, extensions: Vec<String>) -> Self {
        Self {
            command,
            extensions,
        }
    }

    fn program(&self) -> Option<&str> {
        self.command.first().map(String::as_str).filter(|p| !p.trim().is_empty())
    }
}

/// Locate `program` the way a shell would.
fn find_program(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let p = PathBuf::from(program);
        return p.is_file().then_some(p);
    }
    env::split_paths(&env::var_os("PATH")?)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

impl Picker for CommandPicker {
    fn kind(&self) -> PickerKind {
        PickerKind::Files
    }

    fn is_available(&self) -> bool {
        self.program().and_then(find_program).is_some()
    }

    fn pick(&self) -> Result<Picked, AcquireError> {
        let program = self.program().ok_or(AcquireError::Unavailable)?;
        let output = Command::new(program)
            .args(&self.command[1..])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| AcquireError::Io {
                path: PathBuf::from(program),
                source,
            })?;

        if output.status.code() == Some(1) {
            return Err(AcquireError::Cancelled);
        }
        if !output.status.success() {
            return Err(AcquireError::Picker(format!(
                "{program} exited with {}",
                output.status
            )));
        }

        let paths = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .filter(|p| extension_allowed(p, &self.extensions))
            .collect();

        Ok(Picked {
            paths,
            unreadable: 0,
        })
    }
}

/// Pickers for `scan.probe_order`, in that order.
pub fn pickers_for(scan: &ScanSettings, library: &LibrarySettings) -> Vec<Box<dyn Picker>> {
    scan.probe_order
        .iter()
        .map(|kind| -> Box<dyn Picker> {
            match kind {
                PickerKind::Folder => Box::new(FolderPicker::new(
                    scan.music_dir.clone().or_else(default_music_dir),
                    library.clone(),
                )),
                PickerKind::Files => Box::new(CommandPicker::new(
                    scan.picker_command.clone(),
                    scan.extensions.clone(),
                )),
            }
        })
        .collect()
}

/// Use the first available picker and turn its audio files into tracks.
///
/// Only capability is probed in order: a cancelled or failed pick does not
/// fall through to the next picker.
pub fn scan_device(
    pickers: &[Box<dyn Picker>],
    registry: &MediaRegistry,
    settings: &LibrarySettings,
) -> Result<Acquired, AcquireError> {
    let picker = pickers
        .iter()
        .find(|p| p.is_available())
        .ok_or(AcquireError::Unavailable)?;
    info!(picker = ?picker.kind(), "scanning device music");

    let picked = picker.pick()?;
    let mut acquired = Acquired {
        skipped: picked.unreadable,
        ..Acquired::default()
    };
    for path in &picked.paths {
        acquired.push(accept(path, registry, settings));
    }

    info!(
        added = acquired.tracks.len(),
        skipped = acquired.skipped,
        "scan finished"
    );
    Ok(acquired)
}

/// Run `scan_device` on a worker thread and deliver its single outcome on `tx`.
pub fn spawn_scan(
    pickers: Vec<Box<dyn Picker>>,
    registry: MediaRegistry,
    settings: LibrarySettings,
    tx: Sender<Result<Acquired, AcquireError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let outcome = scan_device(&pickers, &registry, &settings);
        // The receiver is gone only when the player is shutting down.
        let _ = tx.send(outcome);
    })
}
