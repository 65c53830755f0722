//! Application module: the playback controller used by the TUI and runtime.
//!
//! `App` (in `app::model`) holds the playlist, playback state, transient
//! status and the manual chooser prompt.

mod model;
mod playlist;
mod status;

pub use model::*;
pub use playlist::Playlist;
pub use status::StatusLine;
