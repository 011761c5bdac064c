//! Imposition of magicbook books
//!
//! Turns a folder of part PDFs and a running order into printable books:
//! every page is fitted onto the book's paper and stamped with its page
//! id, A and B sides are balanced, an optional table of contents leads
//! side A, and marchpack sides are composited two cards to a sheet.

pub mod book;
mod constants;
pub mod geometry;
mod io;
pub mod parts;
pub mod print;
pub mod render;
pub mod side;
pub mod stamp;
pub mod toc;
mod types;

pub use book::{
    BookOutput, BookRequest, BookStatistics, OUTPUT_DIR, TEMP_DIR, WorkDir, build_book,
    impose_book, publish,
};
pub use constants::*;
pub use geometry::{Placement, Rect, fit_scale};
pub use io::load_pdf;
pub use parts::{LoadedPart, OrderedPart, choose_parts, collect_side_parts};
pub use print::{composite_marchpack, concatenate_sides, trim_guides};
pub use side::{MergedSide, balance, impose_side};
pub use stamp::{stamp_ops, stamp_origin};
pub use toc::{TocLine, compile_toc, render_toc, toc_page_count};
pub use types::*;
