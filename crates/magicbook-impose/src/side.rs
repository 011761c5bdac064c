//! Building one side of a book
//!
//! A side is merged from its parts into one page stream, every page is
//! fitted onto the side's paper over its page id stamp, and blank pages
//! pad it to the length of the other side.

use crate::constants::STAMP_FONT;
use crate::geometry::Placement;
use crate::parts::{LoadedPart, OrderedPart};
use crate::render::{DocumentBuilder, PageContent, append_document, page_crop_box};
use crate::stamp::{STAMP_FONT_RESOURCE, stamp_ops};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;

/// The pages of a side's parts in order, with the stamp for each page.
#[derive(Debug, Default)]
pub struct MergedSide {
    parts: Vec<OrderedPart>,
    documents: Vec<Document>,
    /// (index into `documents`, page object)
    pages: Vec<(usize, ObjectId)>,
    stamps: Vec<String>,
}

impl MergedSide {
    /// Concatenate the parts' pages. Every page of a part carries its
    /// part's page id.
    pub fn merge(parts: Vec<LoadedPart>) -> Self {
        let mut merged = MergedSide::default();
        for LoadedPart { part, document } in parts {
            let index = merged.documents.len();
            let stamp = part.page_id.to_string();
            for page_id in document.get_pages().into_values() {
                merged.pages.push((index, page_id));
                merged.stamps.push(stamp.clone());
            }
            merged.parts.push(part);
            merged.documents.push(document);
        }
        merged
    }

    /// The merged parts, in running order
    pub fn parts(&self) -> &[OrderedPart] {
        &self.parts
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page id stamped on each page, in page order
    pub fn stamps(&self) -> &[String] {
        &self.stamps
    }
}

/// Blank pages to append to (A, B) so both sides end up the same length.
pub fn balance(a_pages: usize, b_pages: usize) -> (usize, usize) {
    (b_pages.saturating_sub(a_pages), a_pages.saturating_sub(b_pages))
}

/// Lay a side out on its paper.
///
/// `front_matter` pages (the table of contents) come first, copied as they
/// are; then every merged page, stamped and fitted; then `blanks` empty
/// pages.
pub fn impose_side(
    merged: &MergedSide,
    geometry: &SideGeometry,
    front_matter: Option<&Document>,
    blanks: usize,
) -> Result<Document> {
    let mut builder = DocumentBuilder::new();
    let (paper_width, paper_height) = geometry.paper();

    if let Some(front) = front_matter {
        append_document(&mut builder, front)?;
    }

    let font = builder.font(STAMP_FONT);
    let mut caches: Vec<HashMap<ObjectId, ObjectId>> = vec![HashMap::new(); merged.documents.len()];

    for ((doc_index, page_id), stamp) in merged.pages.iter().zip(&merged.stamps) {
        let source = &merged.documents[*doc_index];
        let crop = page_crop_box(source, *page_id)?;
        let placement = Placement::fit(crop, geometry)?;
        log::debug!(
            "{}: height {:.1} -> scale {:.3}",
            stamp,
            crop.height,
            placement.scale
        );

        let xobject = builder.import_page(source, *page_id, &mut caches[*doc_index])?;
        let mut content = PageContent::new();
        content.set_font(STAMP_FONT_RESOURCE, font);
        content.push(&stamp_ops(stamp, geometry));
        let name = content.add_xobject(xobject);
        content.push(&placement.draw(&name));
        builder.add_page(paper_width, paper_height, content);
    }

    for _ in 0..blanks {
        builder.add_blank_page(paper_width, paper_height);
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_side_is_padded() {
        assert_eq!(balance(5, 3), (0, 2));
        assert_eq!(balance(2, 6), (4, 0));
        assert_eq!(balance(4, 4), (0, 0));
        for a in 0..10 {
            for b in 0..10 {
                let (pad_a, pad_b) = balance(a, b);
                assert_eq!(a + pad_a, b + pad_b);
                assert_eq!(pad_a + pad_b, a.abs_diff(b));
            }
        }
    }
}
