//! Collecting a side's parts from a book folder

use crate::io::open_part;
use crate::types::*;
use lopdf::Document;
use magicbook_library::{Chart, IndexEntry, PageFormat, PageId, PartFile, list_flat_parts};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One part file placed in a book, ready to be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedPart {
    pub chart: Chart,
    pub label: String,
    pub page_id: PageId,
    pub path: PathBuf,
    pub format: Option<PageFormat>,
    pub page_count: usize,
}

/// A part together with its parsed document.
#[derive(Debug, Clone)]
pub struct LoadedPart {
    pub part: OrderedPart,
    pub document: Document,
}

/// Pick the files of one chart, preferring `preferred`.
///
/// Every label found in the preferred format is used in that format. A
/// label with no file in the preferred format falls back to the first of
/// its other files. The result is in variant order.
pub fn choose_parts(files: &[PartFile], preferred: PageFormat) -> Vec<&PartFile> {
    let mut chosen: Vec<&PartFile> = files
        .iter()
        .filter(|f| f.format == Some(preferred))
        .collect();
    let mut labels: BTreeSet<&str> = chosen.iter().map(|f| f.label.as_str()).collect();

    for file in files.iter().filter(|f| f.format != Some(preferred)) {
        if labels.insert(file.label.as_str()) {
            chosen.push(file);
        }
    }

    chosen.sort_by(|a, b| a.variant_key().cmp(&b.variant_key()).then(a.path.cmp(&b.path)));
    chosen
}

/// Gather the parts of one side, in running order.
///
/// Charts with no file in `book_dir` are skipped. Every chosen file is
/// parsed once here, so an unreadable part fails before anything is laid out.
pub fn collect_side_parts(
    book_dir: &Path,
    entries: &[IndexEntry],
    preferred: PageFormat,
) -> Result<Vec<LoadedPart>> {
    let mut parts = Vec::new();
    for entry in entries {
        let slug = entry.chart.slug();
        let files = list_flat_parts(book_dir, slug)?;
        if files.is_empty() {
            log::debug!("{} has no part in {}", slug, book_dir.display());
            continue;
        }

        for file in choose_parts(&files, preferred) {
            let document = open_part(slug, &file.path)?;
            let page_count = document.get_pages().len();
            log::info!(
                " * {} {} ({} page{})",
                entry.page_id,
                file.file_name(),
                page_count,
                if page_count == 1 { "" } else { "s" }
            );
            let part = OrderedPart {
                chart: entry.chart.clone(),
                label: file.label.clone(),
                page_id: entry.page_id,
                path: file.path.clone(),
                format: file.format,
                page_count,
            };
            parts.push(LoadedPart { part, document });
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PartFile {
        PartFile::parse(format!("/book/{name}"), "march").unwrap()
    }

    fn names<'a>(chosen: &[&'a PartFile]) -> Vec<&'a str> {
        chosen.iter().map(|f| f.file_name()).collect()
    }

    #[test]
    fn preferred_format_wins() {
        let files = [
            file("march LYRE trumpet1.pdf"),
            file("march PORTRAIT trumpet1.pdf"),
            file("march trumpet1.pdf"),
        ];
        assert_eq!(
            names(&choose_parts(&files, PageFormat::Lyre)),
            ["march LYRE trumpet1.pdf"]
        );
        assert_eq!(
            names(&choose_parts(&files, PageFormat::Portrait)),
            ["march PORTRAIT trumpet1.pdf"]
        );
    }

    #[test]
    fn missing_labels_fall_back() {
        let files = [
            file("march LYRE trumpet2.pdf"),
            file("march PORTRAIT trumpet1.pdf"),
            file("march trumpet1.pdf"),
        ];
        assert_eq!(
            names(&choose_parts(&files, PageFormat::Lyre)),
            ["march PORTRAIT trumpet1.pdf", "march LYRE trumpet2.pdf"]
        );
    }
}
