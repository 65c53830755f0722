//! Filename heuristics for `Artist - Title.ext` files.

/// Split `file_name` into `(name, artist)`.
///
/// The first `-` separates artist from title; later hyphens stay in the
/// title. Without a hyphen the artist is `unknown` and the name is the file
/// name minus its extension.
pub fn parse_file_name(file_name: &str, unknown: &str) -> (String, String) {
    match file_name.split_once('-') {
        Some((artist, rest)) => (
            strip_extension(rest).trim().to_string(),
            artist.trim().to_string(),
        ),
        None => (strip_extension(file_name).to_string(), unknown.to_string()),
    }
}

/// Drop a trailing `.ext` (one or more characters, no further dots).
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => &name[..i],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_dash_title_is_split_on_first_hyphen() {
        assert_eq!(
            parse_file_name("Queen - Bohemian Rhapsody.mp3", "Desconocido"),
            ("Bohemian Rhapsody".to_string(), "Queen".to_string())
        );
        assert_eq!(
            parse_file_name("Jay-Z - Empire State of Mind.flac", "Desconocido"),
            ("Z - Empire State of Mind".to_string(), "Jay".to_string())
        );
    }

    #[test]
    fn no_hyphen_uses_sentinel_artist() {
        assert_eq!(
            parse_file_name("Interlude.mp3", "Desconocido"),
            ("Interlude".to_string(), "Desconocido".to_string())
        );
        assert_eq!(
            parse_file_name("no extension", "?"),
            ("no extension".to_string(), "?".to_string())
        );
    }

    #[test]
    fn only_last_extension_is_stripped() {
        assert_eq!(
            parse_file_name("Live.at.Wembley.ogg", "x").0,
            "Live.at.Wembley"
        );
        assert_eq!(parse_file_name("trailing.", "x").0, "trailing.");
    }
}
