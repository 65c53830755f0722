//! File acquisition: manual selection and device scans both end up as
//! `Track`s carrying a registered media URL.

mod acquire;
mod error;
mod media;
mod model;
mod naming;
mod scan;

pub use acquire::{Acquired, from_paths};
pub use error::AcquireError;
pub use model::{MediaRegistry, Track};
pub use scan::{pickers_for, spawn_scan};

#[cfg(test)]
pub(crate) use acquire::accept;
#[cfg(test)]
pub(crate) use model::SourceFile;
#[cfg(test)]
pub(crate) use scan::{CommandPicker, FolderPicker, Picked, Picker, scan_device};
