//! Charts and the songs they bundle.

use crate::types::*;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One song within a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Song {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub artist: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arranger: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            arranger: None,
        }
    }
}

/// A library entry: a single song, or a medley/show with its own title.
///
/// Charts are immutable once built. A single's title is always the title of
/// its only song, and a medley must carry a non-empty title of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ChartInfo", into = "ChartInfo"))]
pub struct Chart {
    slug: String,
    is_single: bool,
    songs: Vec<Song>,
    title: String,
}

impl Chart {
    pub fn new(
        slug: impl Into<String>,
        is_single: bool,
        songs: Vec<Song>,
        title: Option<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        let invalid = |reason: &str| LibraryError::InvalidChart {
            slug: slug.clone(),
            reason: reason.to_string(),
        };

        if slug.trim().is_empty() {
            return Err(invalid("slug is empty"));
        }
        if slug.contains(['/', '\\']) || slug.contains(char::is_whitespace) {
            return Err(invalid("slug must be a single filesystem-safe token"));
        }
        let Some(first) = songs.first() else {
            return Err(invalid("a chart needs at least one song"));
        };

        let title = if is_single {
            first.title.clone()
        } else {
            match title {
                Some(t) if !t.trim().is_empty() => t,
                _ => return Err(invalid("a medley needs a title")),
            }
        };

        Ok(Self {
            slug,
            is_single,
            songs,
            title,
        })
    }

    /// Convenience constructor for a chart holding exactly one song.
    pub fn single(slug: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        Self::new(slug, true, vec![Song::new(title)], None)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn is_single(&self) -> bool {
        self.is_single
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// True when the chart bundles more than one song.
    pub fn is_medley(&self) -> bool {
        self.songs.len() > 1
    }

    /// Directory holding this chart's part files.
    pub fn path(&self, library_dir: impl AsRef<Path>) -> PathBuf {
        library_dir.as_ref().join(&self.slug)
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// On-disk shape of a chart's `info.json`.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChartInfo {
    slug: String,
    is_single: bool,
    songs: Vec<Song>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

#[cfg(feature = "serde")]
impl TryFrom<ChartInfo> for Chart {
    type Error = LibraryError;

    fn try_from(info: ChartInfo) -> Result<Self> {
        Chart::new(info.slug, info.is_single, info.songs, info.title)
    }
}

#[cfg(feature = "serde")]
impl From<Chart> for ChartInfo {
    fn from(chart: Chart) -> Self {
        let title = (!chart.is_single).then_some(chart.title);
        Self {
            slug: chart.slug,
            is_single: chart.is_single,
            songs: chart.songs,
            title,
        }
    }
}

/// Result of reading every chart directory in a library.
#[derive(Debug, Default)]
pub struct LibraryScan {
    /// Charts that loaded cleanly, sorted by directory name.
    pub charts: Vec<Chart>,
    /// Directory name and reason for each chart that failed to load.
    pub failures: Vec<(String, LibraryError)>,
}

/// Load every `<library>/<chart>/info.json`.
///
/// A chart directory without a readable, well-formed info file is recorded
/// as a failure; the scan carries on with the remaining charts.
#[cfg(feature = "serde")]
pub fn load_library(library_dir: impl AsRef<Path>) -> Result<LibraryScan> {
    let library_dir = library_dir.as_ref();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(library_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    entries.sort();

    let mut scan = LibraryScan::default();
    for dir in entries {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match load_chart_info(dir.join("info.json")) {
            Ok(chart) => scan.charts.push(chart),
            Err(err) => {
                log::warn!("{} could not be loaded: {}", name, err);
                scan.failures.push((name, err));
            }
        }
    }
    Ok(scan)
}

/// Load a single chart's info file.
#[cfg(feature = "serde")]
pub fn load_chart_info(path: impl AsRef<Path>) -> Result<Chart> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| LibraryError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_takes_song_title() {
        let chart = Chart::new("march-a", true, vec![Song::new("March A")], Some("x".into()))
            .unwrap();
        assert_eq!(chart.title(), "March A");
        assert!(!chart.is_medley());
    }

    #[test]
    fn medley_requires_title() {
        let songs = vec![Song::new("One"), Song::new("Two")];
        assert!(Chart::new("show", false, songs.clone(), None).is_err());
        assert!(Chart::new("show", false, songs.clone(), Some("  ".into())).is_err());

        let chart = Chart::new("show", false, songs, Some("Halftime".into())).unwrap();
        assert_eq!(chart.title(), "Halftime");
        assert!(chart.is_medley());
    }

    #[test]
    fn rejects_empty_songs_and_bad_slugs() {
        assert!(Chart::new("empty", true, vec![], None).is_err());
        assert!(Chart::single("two words", "Title").is_err());
        assert!(Chart::single("a/b", "Title").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn info_json_roundtrip_keeps_invariants() {
        let json = r#"{"slug":"show","is_single":false,"title":"Show",
            "songs":[{"title":"One","artist":"A"},{"title":"Two"}]}"#;
        let chart: Chart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.songs()[0].artist.as_deref(), Some("A"));

        let bad = r#"{"slug":"show","is_single":false,"songs":[{"title":"One"}]}"#;
        assert!(serde_json::from_str::<Chart>(bad).is_err());
    }
}
