use std::path::Path;

/// Media type for a file, guessed from its extension.
///
/// Only types worth distinguishing are listed; anything else is `None` and
/// treated as not audio.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "weba" => "audio/webm",
        "mid" | "midi" => "audio/midi",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" | "nfo" | "cue" | "m3u" => "text/plain",
        _ => return None,
    };
    Some(media_type)
}

pub fn is_audio_type(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}

/// Whether `path`'s extension is in `allow` (case-insensitive, leading dot optional).
pub fn extension_allowed(path: &Path, allow: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    allow
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .any(|e| e.eq_ignore_ascii_case(ext))
}
