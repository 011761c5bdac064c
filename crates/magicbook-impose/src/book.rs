//! The per-book pipeline
//!
//! Collects each side's parts from a book folder, builds the table of
//! contents and the two sides, balances them, lays them out for print and
//! publishes the result into the issue's `output` folder. Work happens in
//! `<issue>/temp/<book>/`, which is removed once the book is published and
//! kept for inspection when anything fails.

use crate::io::write_pdf;
use crate::parts::{OrderedPart, collect_side_parts};
use crate::print::{composite_marchpack, concatenate_sides};
use crate::side::{MergedSide, balance, impose_side};
use crate::toc::{compile_toc, render_toc};
use crate::types::*;
use lopdf::Document;
use magicbook_library::{BookFolder, BookIndex, Chart, create_fresh_dir};
use std::path::{Path, PathBuf};

/// Issue subfolder holding per-book working folders
pub const TEMP_DIR: &str = "temp";

/// Issue subfolder finished books are published to
pub const OUTPUT_DIR: &str = "output";

/// A scoped working folder.
///
/// The folder must not exist beforehand. It is deleted when the handle is
/// dropped unless [`WorkDir::keep`] was called.
#[derive(Debug)]
pub struct WorkDir {
    path: PathBuf,
    keep: bool,
}

impl WorkDir {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: create_fresh_dir(path)?,
            keep: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the folder on disk and return its path
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if !self.keep {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                log::warn!("could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Everything needed to build one book.
#[derive(Debug, Clone)]
pub struct BookRequest {
    pub folder: BookFolder,
    pub index: BookIndex,
    pub format: BookFormat,
    /// Shown at the top of the table of contents
    pub ensemble_name: String,
    pub table_of_contents: bool,
    /// Print sheet drawn under marchpack cards
    pub template: Option<Document>,
    pub issue_dir: PathBuf,
}

impl BookRequest {
    pub fn temp_dir(&self) -> PathBuf {
        self.issue_dir.join(TEMP_DIR).join(self.folder.file_stem())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.issue_dir.join(OUTPUT_DIR)
    }

    /// Final file names, in publishing order
    pub fn output_names(&self) -> Vec<String> {
        let stem = self.folder.file_stem();
        match self.format {
            BookFormat::MarchpackSplit => vec![format!("{stem} A.pdf"), format!("{stem} B.pdf")],
            _ => vec![format!("{stem}.pdf")],
        }
    }
}

/// Page counts of a built book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookStatistics {
    pub toc_pages: usize,
    /// Part pages on side A (the whole book when unsplit)
    pub side_a_pages: usize,
    pub side_b_pages: usize,
    pub blank_pages_a: usize,
    pub blank_pages_b: usize,
    /// Pages over all published files
    pub output_pages: usize,
    /// Page id of every part page on side A, in order
    pub stamps_a: Vec<String>,
    pub stamps_b: Vec<String>,
}

/// A published book.
#[derive(Debug, Clone)]
pub struct BookOutput {
    pub files: Vec<PathBuf>,
    pub stats: BookStatistics,
}

/// Build and publish one book on a blocking worker.
///
/// Any failure is reported as [`ImposeError::Book`] naming the book.
pub async fn impose_book(request: BookRequest) -> Result<BookOutput> {
    let book = request.folder.title();
    let result = match tokio::task::spawn_blocking(move || build_book(&request)).await {
        Ok(result) => result,
        Err(e) => Err(e.into()),
    };
    result.map_err(|source| ImposeError::Book {
        book,
        source: Box::new(source),
    })
}

/// Blocking version of [`impose_book`], without the book name wrapper.
pub fn build_book(request: &BookRequest) -> Result<BookOutput> {
    let work = WorkDir::create(request.temp_dir())?;
    match assemble(request, work.path()) {
        Ok(output) => Ok(output),
        Err(e) => {
            let kept = work.keep();
            log::warn!("{} failed, working files kept in {}", request.folder.title(), kept.display());
            Err(e)
        }
    }
}

fn assemble(request: &BookRequest, work: &Path) -> Result<BookOutput> {
    let format = request.format;
    let index = &request.index;
    if format.is_marchpack() && !index.is_ab_split() {
        return Err(ImposeError::Config(format!(
            "{format} books need an A/B running order"
        )));
    }
    log::info!("Assembling {} ({})", request.folder.title(), format);

    let geometry = format.geometry();
    let preferred = format.preferred_format();
    let book_dir = &request.folder.dir;
    let merged_a = MergedSide::merge(collect_side_parts(book_dir, &index.side_a, preferred)?);
    let merged_b = MergedSide::merge(collect_side_parts(book_dir, &index.side_b, preferred)?);

    let toc = request
        .table_of_contents
        .then(|| table_of_contents(request, merged_a.parts(), merged_b.parts(), &geometry));
    let toc_pages = toc.as_ref().map_or(0, |doc| doc.get_pages().len());

    let (blank_a, blank_b) = if index.is_ab_split() {
        balance(toc_pages + merged_a.page_count(), merged_b.page_count())
    } else {
        (0, 0)
    };

    let mut side_a = impose_side(&merged_a, &geometry, toc.as_ref(), blank_a)?;
    write_pdf(&mut side_a, &work.join("A.pdf"))?;
    let side_b = if index.is_ab_split() {
        let mut side_b = impose_side(&merged_b, &geometry, None, blank_b)?;
        write_pdf(&mut side_b, &work.join("B.pdf"))?;
        Some(side_b)
    } else {
        None
    };

    let mut documents = match (format, side_b) {
        (BookFormat::MarchpackComprehensive, Some(side_b)) => {
            vec![composite_marchpack(&side_a, &side_b, request.template.as_ref())?]
        }
        (BookFormat::MarchpackSplit, Some(side_b)) => vec![side_a, side_b],
        (_, side_b) => vec![concatenate_sides(&side_a, side_b.as_ref())?],
    };

    let output_pages = documents.iter().map(|d| d.get_pages().len()).sum();
    let names = request.output_names();
    let mut staged = Vec::with_capacity(names.len());
    for (doc, name) in documents.iter_mut().zip(&names) {
        let path = work.join(name);
        write_pdf(doc, &path)?;
        staged.push(path);
    }
    let files = publish(&staged, &request.output_dir())?;

    Ok(BookOutput {
        files,
        stats: BookStatistics {
            toc_pages,
            side_a_pages: merged_a.page_count(),
            side_b_pages: merged_b.page_count(),
            blank_pages_a: blank_a,
            blank_pages_b: blank_b,
            output_pages,
            stamps_a: merged_a.stamps().to_vec(),
            stamps_b: merged_b.stamps().to_vec(),
        },
    })
}

fn table_of_contents(
    request: &BookRequest,
    parts_a: &[OrderedPart],
    parts_b: &[OrderedPart],
    geometry: &SideGeometry,
) -> Document {
    let charts: Vec<Chart> = request.index.charts().cloned().collect();
    let lines = compile_toc(&charts, parts_a, parts_b);
    let title = format!("{}: {}", request.ensemble_name, request.folder.title());
    render_toc(&title, &lines, geometry)
}

/// Move staged files into `output_dir`, keeping their names.
///
/// Nothing is moved if any destination already exists. If a move fails
/// part way, the files already moved are put back.
pub fn publish(staged: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut moves = Vec::with_capacity(staged.len());
    for path in staged {
        let name = path
            .file_name()
            .ok_or_else(|| ImposeError::Config(format!("{} has no file name", path.display())))?;
        let dest = output_dir.join(name);
        if dest.exists() {
            return Err(ImposeError::OutputExists(dest));
        }
        moves.push((path, dest));
    }

    let mut published: Vec<(&PathBuf, PathBuf)> = Vec::with_capacity(moves.len());
    for (from, to) in moves {
        if let Err(e) = std::fs::rename(from, &to) {
            // withdraw what already went out
            for (from, to) in published.iter().rev() {
                if let Err(undo) = std::fs::rename(to, from) {
                    log::warn!("could not withdraw {}: {}", to.display(), undo);
                }
            }
            return Err(e.into());
        }
        published.push((from, to));
    }

    Ok(published
        .into_iter()
        .map(|(_, to)| {
            log::info!("Published {}", to.display());
            to
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn work_dir_is_removed_unless_kept() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("temp").join("trumpet 1");

        let work = WorkDir::create(&path).unwrap();
        std::fs::write(work.path().join("A.pdf"), b"x").unwrap();
        drop(work);
        assert!(!path.exists());

        let work = WorkDir::create(&path).unwrap();
        assert_eq!(work.keep(), path);
        assert!(path.exists());
        assert!(WorkDir::create(&path).is_err());
    }

    #[test]
    fn publish_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let staged_dir = temp.path().join("work");
        let output = temp.path().join("output");
        std::fs::create_dir_all(&staged_dir).unwrap();
        std::fs::create_dir_all(&output).unwrap();

        let a = staged_dir.join("tuba A.pdf");
        let b = staged_dir.join("tuba B.pdf");
        std::fs::write(&a, b"new").unwrap();
        std::fs::write(&b, b"new").unwrap();
        std::fs::write(output.join("tuba B.pdf"), b"old").unwrap();

        let result = publish(&[a.clone(), b], &output);
        assert!(matches!(result, Err(ImposeError::OutputExists(_))));
        // nothing moved, nothing overwritten
        assert!(a.exists());
        assert!(!output.join("tuba A.pdf").exists());
        assert_eq!(std::fs::read(output.join("tuba B.pdf")).unwrap(), b"old");
    }

    #[test]
    fn failed_publish_withdraws_earlier_files() {
        let temp = TempDir::new().unwrap();
        let staged_dir = temp.path().join("work");
        let output = temp.path().join("output");
        std::fs::create_dir_all(&staged_dir).unwrap();

        let a = staged_dir.join("horn A.pdf");
        std::fs::write(&a, b"side a").unwrap();
        // B was never written, so its move fails after A has gone out
        let b = staged_dir.join("horn B.pdf");

        let result = publish(&[a.clone(), b], &output);
        assert!(matches!(result, Err(ImposeError::Io(_))));
        assert!(!output.join("horn A.pdf").exists());
        assert_eq!(std::fs::read(&a).unwrap(), b"side a");
    }
}
