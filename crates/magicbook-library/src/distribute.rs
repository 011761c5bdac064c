//! Divisi distribution
//!
//! Routes the parts acquired for a split section into one folder per book,
//! following the split table. The instrument's missing-parts report is
//! written separately with [`write_missing_report`].

use crate::acquire::Acquisition;
use crate::config::create_fresh_dir;
use crate::split::{SplitTable, VariantChoice};
use crate::types::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Name of the per-instrument report listing charts with no parts.
pub const MISSING_PARTS_FILE: &str = "MISSING_PARTS.txt";

/// A finished folder of parts that becomes one printed book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFolder {
    pub instrument_slug: String,
    pub instrument_name: String,
    /// Sub-book name when the section is split
    pub book: Option<String>,
    pub dir: PathBuf,
}

impl BookFolder {
    /// Human-readable book name, e.g. `Trumpet 2A`.
    pub fn title(&self) -> String {
        match &self.book {
            Some(book) => format!("{} {}", self.instrument_name, book),
            None => self.instrument_name.clone(),
        }
    }

    /// File-name stem for the book's output, e.g. `trumpet 2A`.
    pub fn file_stem(&self) -> String {
        match &self.book {
            Some(book) => format!("{} {}", self.instrument_slug, book),
            None => self.instrument_slug.clone(),
        }
    }
}

/// Split an instrument's acquired parts into its books.
///
/// An unsplit instrument's working folder already is its book and is left
/// as it is. For a split section every book folder is created fresh, the
/// assigned variants are copied in, and the flat copies are removed.
pub fn distribute_parts(acquisition: &Acquisition, table: &SplitTable) -> Result<Vec<BookFolder>> {
    let instrument = &acquisition.instrument;
    instrument.validate(table)?;

    let folder = |book: Option<&str>, dir: PathBuf| BookFolder {
        instrument_slug: instrument.slug.clone(),
        instrument_name: instrument.name.clone(),
        book: book.map(str::to_string),
        dir,
    };

    let folders = if !instrument.is_split() {
        vec![folder(None, acquisition.dir.clone())]
    } else {
        let names = table
            .book_names(instrument.division_count)
            .ok_or_else(|| LibraryError::UnknownDivision {
                instrument: instrument.slug.clone(),
                divisions: instrument.division_count,
            })?;

        let mut folders = Vec::with_capacity(names.len());
        for name in names {
            let dir = create_fresh_dir(acquisition.dir.join(name))?;
            folders.push(folder(Some(name), dir));
        }

        for chart in &acquisition.charts {
            for assignment in table.assign(instrument.division_count, chart.variants)? {
                let dest = acquisition.dir.join(assignment.book);
                let files: Vec<_> = match assignment.choice {
                    VariantChoice::All => chart.files.iter().collect(),
                    VariantChoice::Variant(v) => chart.variant_files(v).collect(),
                };
                for file in files {
                    file.copy_into(&dest)?;
                    log::info!(
                        " * {} {}: added {}",
                        instrument.name,
                        assignment.book,
                        file.file_name()
                    );
                }
            }
        }

        for chart in &acquisition.charts {
            for file in &chart.files {
                std::fs::remove_file(&file.path)?;
            }
        }
        folders
    };

    Ok(folders)
}

/// Write `MISSING_PARTS.txt` (charts with no parts, one slug per line) into
/// `dir`.
pub fn write_missing_report(acquisition: &Acquisition, dir: &Path) -> Result<PathBuf> {
    let mut report = String::new();
    let _ = writeln!(report, "Missing parts for {}:", acquisition.instrument.name);
    report.push_str("========================\n");
    for chart in acquisition.missing() {
        let _ = writeln!(report, "{}", chart.chart_slug);
    }

    let path = dir.join(MISSING_PARTS_FILE);
    std::fs::write(&path, report)?;
    Ok(path)
}
