//! The host media element: a rodio output driven from its own thread.
//!
//! The controller talks to it through `MediaElement` and hears back through
//! `MediaEvent`s (time updates, loaded metadata, end of track, play failures).

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{MediaElement, MediaEvent};

#[cfg(test)]
mod tests;
