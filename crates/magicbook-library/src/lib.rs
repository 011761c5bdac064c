//! Chart library, part acquisition and divisi splitting for magicbook.
//!
//! The flow for one instrument is:
//! 1. [`acquire_parts`] copies the instrument's parts (or an alternate's)
//!    out of the library into its working folder
//! 2. [`distribute_parts`] splits them into sub-book folders using the
//!    [`SplitTable`]
//! 3. [`order_charts`] fixes the running order and page ids that the
//!    imposition stage stamps onto every page

pub mod acquire;
pub mod chart;
pub mod config;
pub mod distribute;
pub mod instrument;
pub mod order;
pub mod part;
pub mod split;
mod types;

pub use acquire::{Acquisition, ChartParts, PartSource, acquire_parts};
#[cfg(feature = "serde")]
pub use chart::{load_chart_info, load_library};
pub use chart::{Chart, LibraryScan, Song};
pub use config::{LibraryConfig, create_fresh_dir, prepare_issue_dir};
pub use distribute::{BookFolder, MISSING_PARTS_FILE, distribute_parts, write_missing_report};
#[cfg(feature = "serde")]
pub use instrument::load_instrument_defaults;
pub use instrument::{Ensemble, InstrumentDefaults, InstrumentSpec};
pub use order::{
    BookIndex, ChartSelector, IndexEntry, ListOrder, MAX_PAGE_ID, PageId, Side,
    SlugOrderSelector, auto_order, min_max_id, order_charts, validate_max_id,
};
pub use part::{PageFormat, PartFile, discover_parts, list_flat_parts};
pub use split::{Assignment, PartVariants, SplitTable, SubBook, VariantChoice};
pub use types::*;
