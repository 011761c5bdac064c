//! Print compositing
//!
//! Marchpack sides are printed two cards to a letter sheet: the A card on
//! the upper half, the B card upside down on the lower half, so the sheet
//! can be cut and the halves glued back to back. Binder sides are simply
//! concatenated.

use crate::constants::*;
use crate::render::{DocumentBuilder, PageContent, append_document, page_size};
use crate::types::*;
use lopdf::Document;
use std::collections::HashMap;

/// Length of the corner crop marks of the generated template
const CROP_MARK_LENGTH: f32 = 12.0;

/// Lay side A and side B out on print sheets.
///
/// Both sides must already have the same page count. The first page of
/// `template` is drawn under every sheet; without one the generated
/// [`trim_guides`] are used.
pub fn composite_marchpack(
    side_a: &Document,
    side_b: &Document,
    template: Option<&Document>,
) -> Result<Document> {
    let a_pages: Vec<_> = side_a.get_pages().into_values().collect();
    let b_pages: Vec<_> = side_b.get_pages().into_values().collect();
    if a_pages.len() != b_pages.len() {
        return Err(ImposeError::Config(format!(
            "sides are not balanced: A has {} pages, B has {}",
            a_pages.len(),
            b_pages.len()
        )));
    }
    if a_pages.is_empty() {
        return Err(ImposeError::NoPages);
    }

    let generated;
    let template = match template {
        Some(doc) => doc,
        None => {
            generated = trim_guides();
            &generated
        }
    };
    let template_page = template
        .get_pages()
        .into_values()
        .next()
        .ok_or(ImposeError::NoPages)?;
    let (sheet_width, sheet_height) = page_size(template, template_page)?;

    let mut builder = DocumentBuilder::new();
    let mut template_cache = HashMap::new();
    let underlay = builder.import_page(template, template_page, &mut template_cache)?;
    let (mut a_cache, mut b_cache) = (HashMap::new(), HashMap::new());

    for (a_page, b_page) in a_pages.into_iter().zip(b_pages) {
        let a = builder.import_page(side_a, a_page, &mut a_cache)?;
        let b = builder.import_page(side_b, b_page, &mut b_cache)?;

        let mut content = PageContent::new();
        let name = content.add_xobject(underlay);
        content.push(&format!("q /{} Do Q\n", name));
        let name = content.add_xobject(a);
        content.push(&format!(
            "q 1 0 0 1 {} {} cm /{} Do Q\n",
            SIDE_A_ORIGIN.0, SIDE_A_ORIGIN.1, name
        ));
        let name = content.add_xobject(b);
        content.push(&format!(
            "q -1 0 0 -1 {} {} cm /{} Do Q\n",
            SIDE_B_ORIGIN.0, SIDE_B_ORIGIN.1, name
        ));
        builder.add_page(sheet_width, sheet_height, content);
    }

    Ok(builder.finish())
}

/// Side A followed by side B, pages untouched.
pub fn concatenate_sides(side_a: &Document, side_b: Option<&Document>) -> Result<Document> {
    let mut builder = DocumentBuilder::new();
    append_document(&mut builder, side_a)?;
    if let Some(side_b) = side_b {
        append_document(&mut builder, side_b)?;
    }
    if builder.page_count() == 0 {
        return Err(ImposeError::NoPages);
    }
    Ok(builder.finish())
}

/// A letter sheet marking where the two cards are cut out.
pub fn trim_guides() -> Document {
    let (left, right) = (SIDE_A_ORIGIN.0, SIDE_B_ORIGIN.0);
    let middle = SIDE_A_ORIGIN.1;
    let top = middle + LYRE_PAPER_HEIGHT_PT;
    let bottom = middle - LYRE_PAPER_HEIGHT_PT;

    let mut ops = String::new();
    ops.push_str(&format!("q {} G {} w\n", TRIM_LINE_GRAY, TRIM_LINE_WIDTH));
    // card outlines
    ops.push_str("[6 3] 0 d\n");
    for y in [bottom, middle] {
        ops.push_str(&format!(
            "{} {} {} {} re S\n",
            left,
            y,
            right - left,
            LYRE_PAPER_HEIGHT_PT
        ));
    }
    // crop marks outside the corners
    ops.push_str("[] 0 d\n");
    for y in [bottom, middle, top] {
        ops.push_str(&format!(
            "{} {} m {} {} l S\n",
            left - CROP_MARK_LENGTH - 3.0,
            y,
            left - 3.0,
            y
        ));
        ops.push_str(&format!(
            "{} {} m {} {} l S\n",
            right + 3.0,
            y,
            right + CROP_MARK_LENGTH + 3.0,
            y
        ));
    }
    for x in [left, right] {
        ops.push_str(&format!(
            "{} {} m {} {} l S\n",
            x,
            top + 3.0,
            x,
            top + CROP_MARK_LENGTH + 3.0
        ));
        ops.push_str(&format!(
            "{} {} m {} {} l S\n",
            x,
            bottom - CROP_MARK_LENGTH - 3.0,
            x,
            bottom - 3.0
        ));
    }
    ops.push_str("Q\n");

    let mut builder = DocumentBuilder::new();
    let mut content = PageContent::new();
    content.push(&ops);
    builder.add_page(LETTER_WIDTH_PT, LETTER_HEIGHT_PT, content);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_page(width: f32, height: f32) -> Document {
        let mut builder = DocumentBuilder::new();
        let mut content = PageContent::new();
        content.push("0 0 m 10 10 l S\n");
        builder.add_page(width, height, content);
        builder.finish()
    }

    fn sheet_content(doc: &Document) -> String {
        let page = doc.get_pages().into_values().next().unwrap();
        String::from_utf8(doc.get_page_content(page).unwrap()).unwrap()
    }

    #[test]
    fn template_sets_sheet_and_sides_are_placed() {
        let side_a = single_page(LYRE_PAPER_WIDTH_PT, LYRE_PAPER_HEIGHT_PT);
        let side_b = single_page(LYRE_PAPER_WIDTH_PT, LYRE_PAPER_HEIGHT_PT);
        let template = single_page(640.0, 820.0);

        let sheet = composite_marchpack(&side_a, &side_b, Some(&template)).unwrap();
        let pages: Vec<_> = sheet.get_pages().into_values().collect();
        assert_eq!(pages.len(), 1);
        assert_eq!(page_size(&sheet, pages[0]).unwrap(), (640.0, 820.0));

        let ops = sheet_content(&sheet);
        let underlay = ops.find("q /P0 Do Q").unwrap();
        let a = ops.find("q 1 0 0 1 54 396 cm /P1 Do Q").unwrap();
        let b = ops.find("q -1 0 0 -1 558 396 cm /P2 Do Q").unwrap();
        assert!(underlay < a && a < b);
    }

    #[test]
    fn generated_guides_are_letter_sized() {
        let side_a = single_page(LYRE_PAPER_WIDTH_PT, LYRE_PAPER_HEIGHT_PT);
        let side_b = single_page(LYRE_PAPER_WIDTH_PT, LYRE_PAPER_HEIGHT_PT);

        let sheet = composite_marchpack(&side_a, &side_b, None).unwrap();
        let page = sheet.get_pages().into_values().next().unwrap();
        assert_eq!(
            page_size(&sheet, page).unwrap(),
            (LETTER_WIDTH_PT, LETTER_HEIGHT_PT)
        );
    }

    #[test]
    fn unbalanced_sides_are_refused() {
        let side_a = single_page(LYRE_PAPER_WIDTH_PT, LYRE_PAPER_HEIGHT_PT);
        let side_b = DocumentBuilder::new().finish();
        assert!(matches!(
            composite_marchpack(&side_a, &side_b, None),
            Err(ImposeError::Config(_))
        ));
    }
}
