use crate::library::Track;

/// Ordered tracks of the session. Append-only while the player runs;
/// dropping or clearing it releases every track's media URL.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Concatenate `tracks` after the existing ones; returns how many were added.
    pub fn append(&mut self, tracks: Vec<Track>) -> usize {
        let added = tracks.len();
        self.tracks.extend(tracks);
        added
    }

    /// Drop every track (teardown).
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Index after `index`, wrapping from last to first.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        match self.len() {
            0 => None,
            len => Some((index + 1) % len),
        }
    }

    /// Index before `index`, wrapping from first to last.
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        match self.len() {
            0 => None,
            len => Some((index % len + len - 1) % len),
        }
    }
}
