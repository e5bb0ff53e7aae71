use std::path::Path;

use crate::config::TrackNameField;

use super::probe::Probed;

/// Build the human-readable name for a track from the configured `fields`.
///
/// Fields are joined with `sep` in the configured order; missing or blank
/// tag values are skipped. Falls back to the file stem, then to the full
/// path, when nothing was produced.
pub fn name_from_fields(
    path: &Path,
    probed: &Probed,
    fields: &[TrackNameField],
    sep: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackNameField::Title => non_blank(probed.title.as_deref()),
            TrackNameField::Artist => non_blank(probed.artist.as_deref()),
            TrackNameField::Album => non_blank(probed.album.as_deref()),
            TrackNameField::Filename => non_blank(file_stem(path)),
            TrackNameField::Path => Some(path.display().to_string()),
        };
        if let Some(p) = part {
            parts.push(p);
        }
    }

    if !parts.is_empty() {
        return parts.join(sep);
    }

    non_blank(file_stem(path)).unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
