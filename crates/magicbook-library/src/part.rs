//! Part files discovered in the library and in working folders.
//!
//! Part files are named `<chart-slug> [FORMAT ]<instrument><number>.pdf`,
//! e.g. `march-a LYRE trumpet2.pdf` or `march-a tuba.pdf`. The name is
//! parsed once into a [`PartFile`] so later stages never re-scan strings.

use crate::types::*;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const PDF_SUFFIX: &str = ".pdf";

/// Physical page format a part was engraved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageFormat {
    /// Full-size letter/portrait page
    Portrait,
    /// Small lyre card for marching
    Lyre,
}

impl PageFormat {
    pub const ALL: [PageFormat; 2] = [PageFormat::Portrait, PageFormat::Lyre];

    /// The tag used in file names.
    pub fn tag(self) -> &'static str {
        match self {
            PageFormat::Portrait => "PORTRAIT",
            PageFormat::Lyre => "LYRE",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag() == tag)
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A part file with its name already broken into typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFile {
    /// Where the file lives
    pub path: PathBuf,
    pub chart_slug: String,
    pub format: Option<PageFormat>,
    /// Part label with chart slug, format tag and extension removed
    /// (`trumpet2`). Format variants of one part share a label.
    pub label: String,
    /// Instrument (or alternate) slug the part was written for
    pub instrument: String,
    /// Part number within the instrument section, if any
    pub number: Option<u32>,
}

impl PartFile {
    /// Parse a file name belonging to `chart_slug`.
    ///
    /// Returns `None` for files of other charts, non-PDF files, and names
    /// with no part label.
    pub fn parse(path: impl Into<PathBuf>, chart_slug: &str) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(PDF_SUFFIX)?;
        let rest = stem.strip_prefix(chart_slug)?.strip_prefix(' ')?.trim();

        let (format, label) = match rest.split_once(' ') {
            Some((first, remainder)) => match PageFormat::from_tag(first) {
                Some(format) => (Some(format), remainder.trim()),
                None => (None, rest),
            },
            None => (None, rest),
        };
        if label.is_empty() || PageFormat::from_tag(label).is_some() {
            return None;
        }

        let (instrument, number) = split_part_number(label);
        if instrument.is_empty() {
            return None;
        }

        Some(Self {
            chart_slug: chart_slug.to_string(),
            format,
            label: label.to_string(),
            instrument: instrument.to_string(),
            number,
            path,
        })
    }

    /// True when this part was written for the given instrument slug.
    ///
    /// The label must start with the slug, so `horn1a` and `trumpet-solo`
    /// belong to `horn` and `trumpet`, while a `bass-trumpet` part never
    /// belongs to `trumpet`.
    pub fn is_for(&self, instrument_slug: &str) -> bool {
        !instrument_slug.is_empty() && self.label.starts_with(instrument_slug)
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Ordering key for part variants: numbered parts in numeric order,
    /// then by label.
    pub fn variant_key(&self) -> (u32, &str) {
        (self.number.unwrap_or(0), &self.label)
    }

    /// Copy this file into `dest_dir`, keeping its name.
    ///
    /// Refuses to overwrite an existing file. The source is left untouched.
    pub fn copy_into(&self, dest_dir: &Path) -> Result<PartFile> {
        let to = dest_dir.join(self.file_name());
        let copy_err = |source| LibraryError::Copy {
            from: self.path.clone(),
            to: to.clone(),
            source,
        };

        let mut source = std::fs::File::open(&self.path).map_err(copy_err)?;
        let mut dest = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&to)
            .map_err(copy_err)?;
        std::io::copy(&mut source, &mut dest).map_err(copy_err)?;

        Ok(PartFile {
            path: to,
            ..self.clone()
        })
    }
}

/// Split `trumpet2` into (`trumpet`, Some(2)) and `horn1a` into
/// (`horn`, Some(1)). The first run of digits is the part number.
fn split_part_number(label: &str) -> (&str, Option<u32>) {
    let Some(start) = label.find(|c: char| c.is_ascii_digit()).filter(|&i| i > 0) else {
        return (label, None);
    };
    let digits = &label[start..];
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let instrument = label[..start].trim_end_matches([' ', '-', '_']);
    (instrument, digits[..end].parse().ok())
}

/// List the part files in a directory tree that belong to `chart_slug`,
/// sorted by path.
///
/// Parts are copied into flat working folders, so file names must be
/// unique. When two files in the tree share a name the shallowest one is
/// kept (ties go to the first path) and the rest are skipped.
pub fn discover_parts(dir: impl AsRef<Path>, chart_slug: &str) -> Result<Vec<PartFile>> {
    let mut found = Vec::new();
    collect_parts(dir.as_ref(), chart_slug, &mut found)?;
    found.sort_by(|a, b| {
        let depth = |p: &PartFile| p.path.components().count();
        depth(a).cmp(&depth(b)).then_with(|| a.path.cmp(&b.path))
    });

    let mut names = HashSet::new();
    let mut parts = Vec::with_capacity(found.len());
    for part in found {
        if names.insert(part.file_name().to_string()) {
            parts.push(part);
        } else {
            log::warn!("skipping duplicate part {}", part.path.display());
        }
    }
    parts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(parts)
}

fn collect_parts(dir: &Path, chart_slug: &str, parts: &mut Vec<PartFile>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_parts(&path, chart_slug, parts)?;
        } else if let Some(part) = PartFile::parse(path, chart_slug) {
            parts.push(part);
        }
    }
    Ok(())
}

/// List the part files of `chart_slug` directly inside `dir`, sorted by path.
pub fn list_flat_parts(dir: impl AsRef<Path>, chart_slug: &str) -> Result<Vec<PartFile>> {
    let mut parts = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() {
            if let Some(part) = PartFile::parse(path, chart_slug) {
                parts.push(part);
            }
        }
    }
    parts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, chart: &str) -> Option<PartFile> {
        PartFile::parse(PathBuf::from("lib").join(chart).join(name), chart)
    }

    #[test]
    fn parses_plain_part() {
        let part = parse("march-a trumpet2.pdf", "march-a").unwrap();
        assert_eq!(part.label, "trumpet2");
        assert_eq!(part.instrument, "trumpet");
        assert_eq!(part.number, Some(2));
        assert_eq!(part.format, None);
    }

    #[test]
    fn parses_format_tag() {
        let part = parse("march-a LYRE trumpet2.pdf", "march-a").unwrap();
        assert_eq!(part.format, Some(PageFormat::Lyre));
        assert_eq!(part.label, "trumpet2");

        let part = parse("march-a PORTRAIT tuba.pdf", "march-a").unwrap();
        assert_eq!(part.format, Some(PageFormat::Portrait));
        assert_eq!(part.instrument, "tuba");
        assert_eq!(part.number, None);
    }

    #[test]
    fn rejects_other_charts_and_files() {
        assert!(parse("march-ab trumpet.pdf", "march-a").is_none());
        assert!(parse("march-b trumpet.pdf", "march-a").is_none());
        assert!(parse("info.json", "march-a").is_none());
        assert!(parse("march-a LYRE.pdf", "march-a").is_none());
        assert!(parse("march-a .pdf", "march-a").is_none());
    }

    #[test]
    fn instrument_match_anchors_at_label_start() {
        let part = parse("march-a bass-trumpet1.pdf", "march-a").unwrap();
        assert!(part.is_for("bass-trumpet"));
        assert!(!part.is_for("trumpet"));

        let part = parse("march-a horn1a.pdf", "march-a").unwrap();
        assert!(part.is_for("horn"));
        assert!(!part.is_for("flugelhorn"));
        assert!(!part.is_for(""));

        let part = parse("march-a LYRE trumpet-solo.pdf", "march-a").unwrap();
        assert!(part.is_for("trumpet"));
    }

    #[test]
    fn separators_before_numbers_are_trimmed() {
        assert_eq!(split_part_number("alto-sax-2"), ("alto-sax", Some(2)));
        assert_eq!(split_part_number("horn 10"), ("horn", Some(10)));
        assert_eq!(split_part_number("123"), ("123", None));
    }

    #[test]
    fn number_is_first_digit_run() {
        assert_eq!(split_part_number("horn1a"), ("horn", Some(1)));
        assert_eq!(split_part_number("horn12b"), ("horn", Some(12)));
        assert_eq!(split_part_number("trumpet-solo"), ("trumpet-solo", None));
    }

    #[test]
    fn duplicate_names_in_subfolders_are_skipped() {
        let temp = tempfile::TempDir::new().unwrap();
        let chart = temp.path().join("march-a");
        let archive = chart.join("old");
        std::fs::create_dir_all(&archive).unwrap();
        std::fs::write(chart.join("march-a tuba.pdf"), b"new").unwrap();
        std::fs::write(archive.join("march-a tuba.pdf"), b"old").unwrap();
        std::fs::write(archive.join("march-a horn1.pdf"), b"old").unwrap();

        let parts = discover_parts(&chart, "march-a").unwrap();
        let paths: Vec<_> = parts.iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            [chart.join("march-a tuba.pdf"), archive.join("march-a horn1.pdf")]
        );
    }
}
