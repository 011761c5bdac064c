//! Page id stamps

use crate::constants::STAMP_INSET_PT;
use crate::render::{helvetica_bold_width, show_text};
use crate::types::*;

/// Font resource name stamps are drawn with
pub const STAMP_FONT_RESOURCE: &str = "Fs";

/// Baseline start of a right-aligned stamp
pub fn stamp_origin(text: &str, geometry: &SideGeometry) -> (f32, f32) {
    let right = geometry.paper_width - STAMP_INSET_PT;
    let x = right - helvetica_bold_width(text, geometry.stamp_size);
    let y = match geometry.stamp_corner {
        StampCorner::BottomRight => STAMP_INSET_PT,
        StampCorner::TopRight => geometry.paper_height - (geometry.stamp_size + STAMP_INSET_PT),
    };
    (x, y)
}

/// Content stream operators drawing the stamp in the side's corner
pub fn stamp_ops(text: &str, geometry: &SideGeometry) -> String {
    if text.is_empty() {
        return String::new();
    }
    let (x, y) = stamp_origin(text, geometry);
    format!(
        "q 0 g {}Q\n",
        show_text(STAMP_FONT_RESOURCE, geometry.stamp_size, x, y, text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lyre_stamp_sits_bottom_right() {
        let g = SideGeometry::LYRE;
        let (x, y) = stamp_origin("A1", &g);
        assert_eq!(y, 5.0);
        let width = helvetica_bold_width("A1", 30.0);
        assert!((x + width - 499.0).abs() < 0.01);
    }

    #[test]
    fn letter_stamp_sits_top_right() {
        let g = SideGeometry::LETTER;
        let (x, y) = stamp_origin("12", &g);
        assert_eq!(y, 792.0 - 45.0);
        assert!((x + helvetica_bold_width("12", 40.0) - 607.0).abs() < 0.01);
    }

    #[test]
    fn longer_ids_start_further_left() {
        let g = SideGeometry::LYRE;
        assert!(stamp_origin("B18", &g).0 < stamp_origin("B8", &g).0);
        assert!(stamp_ops("B18", &g).contains("(B18) Tj"));
        assert!(stamp_ops("", &g).is_empty());
    }
}
