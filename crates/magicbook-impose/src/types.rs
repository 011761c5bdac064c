use crate::constants::*;
use magicbook_library::{LibraryError, PageFormat};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("No pages to impose")]
    NoPages,
    #[error("cannot read part {} of {chart}: {source}", .path.display())]
    PartUnreadable {
        chart: String,
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("refusing to overwrite {}", .0.display())]
    OutputExists(PathBuf),
    #[error("book {book}: {source}")]
    Book {
        book: String,
        #[source]
        source: Box<ImposeError>,
    },
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Physical layout of a finished book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BookFormat {
    /// Lyre cards, A over B (rotated) on one letter sheet, ready to cut
    #[default]
    MarchpackComprehensive,
    /// Lyre cards, A and B sides as two separate files
    MarchpackSplit,
    /// Letter pages, one part per page, A side then B side
    BinderOnePartPg,
}

impl BookFormat {
    /// Marchpack books must be ordered into A and B sides
    pub fn is_marchpack(self) -> bool {
        matches!(
            self,
            BookFormat::MarchpackComprehensive | BookFormat::MarchpackSplit
        )
    }

    /// Part format picked first when a chart has several
    pub fn preferred_format(self) -> PageFormat {
        if self.is_marchpack() {
            PageFormat::Lyre
        } else {
            PageFormat::Portrait
        }
    }

    pub fn geometry(self) -> SideGeometry {
        if self.is_marchpack() {
            SideGeometry::LYRE
        } else {
            SideGeometry::LETTER
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookFormat::MarchpackComprehensive => "marchpack (comprehensive)",
            BookFormat::MarchpackSplit => "marchpack (split)",
            BookFormat::BinderOnePartPg => "binder (one part per page)",
        })
    }
}

/// Corner the page id is stamped into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampCorner {
    BottomRight,
    TopRight,
}

/// Page geometry of one side of a book, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideGeometry {
    pub paper_width: f32,
    pub paper_height: f32,
    /// Area a part page is scaled into, anchored at the lower left
    pub content_width: f32,
    pub content_height: f32,
    pub stamp_corner: StampCorner,
    pub stamp_size: f32,
}

impl SideGeometry {
    pub const LYRE: SideGeometry = SideGeometry {
        paper_width: LYRE_PAPER_WIDTH_PT,
        paper_height: LYRE_PAPER_HEIGHT_PT,
        content_width: LYRE_CONTENT_WIDTH_PT,
        content_height: LYRE_CONTENT_HEIGHT_PT,
        stamp_corner: StampCorner::BottomRight,
        stamp_size: LYRE_STAMP_SIZE,
    };

    pub const LETTER: SideGeometry = SideGeometry {
        paper_width: LETTER_WIDTH_PT,
        paper_height: LETTER_HEIGHT_PT,
        content_width: LETTER_WIDTH_PT,
        content_height: LETTER_HEIGHT_PT,
        stamp_corner: StampCorner::TopRight,
        stamp_size: LETTER_STAMP_SIZE,
    };

    pub fn paper(&self) -> (f32, f32) {
        (self.paper_width, self.paper_height)
    }
}
