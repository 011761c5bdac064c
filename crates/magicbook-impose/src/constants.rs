//! Shared constants for book imposition
//!
//! All dimensions are PDF points (1/72 inch).

// =============================================================================
// Paper
// =============================================================================

/// US Letter width (8.5")
pub const LETTER_WIDTH_PT: f32 = 612.0;

/// US Letter height (11")
pub const LETTER_HEIGHT_PT: f32 = 792.0;

/// Lyre card width (7")
pub const LYRE_PAPER_WIDTH_PT: f32 = 504.0;

/// Lyre card height (4.8")
pub const LYRE_PAPER_HEIGHT_PT: f32 = 345.6;

/// Width of the lyre card that music may cover; the rest carries the stamp
pub const LYRE_CONTENT_WIDTH_PT: f32 = 475.2;

pub const LYRE_CONTENT_HEIGHT_PT: f32 = 345.6;

// =============================================================================
// Stamps
// =============================================================================

pub const STAMP_FONT: &str = "Helvetica-Bold";

pub const LYRE_STAMP_SIZE: f32 = 30.0;

pub const LETTER_STAMP_SIZE: f32 = 40.0;

/// Distance of the stamp from the paper edges
pub const STAMP_INSET_PT: f32 = 5.0;

// =============================================================================
// Print compositing
// =============================================================================

/// Lower-left corner of the A card on the print sheet
pub const SIDE_A_ORIGIN: (f32, f32) = (54.0, 396.0);

/// Where the B card's (rotated) lower-left corner lands on the print sheet
pub const SIDE_B_ORIGIN: (f32, f32) = (558.0, 396.0);

/// Line width of the generated trim guides
pub const TRIM_LINE_WIDTH: f32 = 0.5;

/// Gray level of the generated trim guides
pub const TRIM_LINE_GRAY: f32 = 0.6;

// =============================================================================
// Table of contents
// =============================================================================

pub const TOC_MARGIN_PT: f32 = 16.0;

/// Space between the two columns
pub const TOC_COLUMN_GAP_PT: f32 = 10.0;

pub const TOC_TITLE_SIZE: f32 = 14.0;

/// Approximate character width ratio for Helvetica (average)
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;
