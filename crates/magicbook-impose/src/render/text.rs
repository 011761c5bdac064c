//! Text drawing with the standard 14 fonts

use crate::constants::HELVETICA_CHAR_WIDTH_RATIO;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Create a Type1 font dictionary for one of the standard 14 fonts.
pub fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(base_font.as_bytes().to_vec()));
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(font_dict)
}

/// Escape text as the body of a PDF literal string.
///
/// Latin-1 characters are written as octal escapes (they coincide with
/// WinAnsi there); anything outside Latin-1 becomes `?`.
pub fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}

/// Width of `text` set in Helvetica-Bold, in points.
///
/// Stamps only hold side letters and digits; other glyphs use an average.
pub fn helvetica_bold_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            '0'..='9' => 556,
            'A' | 'B' => 722,
            ' ' => 278,
            _ => 611,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Approximate width of `text` set in regular Helvetica, in points.
pub fn helvetica_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * HELVETICA_CHAR_WIDTH_RATIO
}

/// Shorten `text` with a trailing `..` until it fits in `width`.
pub fn fit_text(text: &str, size: f32, width: f32) -> String {
    if helvetica_width(text, size) <= width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "..";
        if helvetica_width(&candidate, size) <= width {
            return candidate;
        }
    }
    String::new()
}

/// `BT ... ET` block showing `text` with its baseline starting at (x, y).
pub fn show_text(font: &str, size: f32, x: f32, y: f32, text: &str) -> String {
    format!(
        "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
        font,
        size,
        x,
        y,
        pdf_string(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_delimiters_and_latin1() {
        assert_eq!(pdf_string("Hey (Jude)"), "Hey \\(Jude\\)");
        assert_eq!(pdf_string("a\\b"), "a\\\\b");
        assert_eq!(pdf_string("Für Elise"), "F\\374r Elise");
        assert_eq!(pdf_string("→"), "?");
    }

    #[test]
    fn stamp_widths() {
        assert!((helvetica_bold_width("A12", 30.0) - 30.0 * 1.834).abs() < 0.01);
        assert!(helvetica_bold_width("B7", 40.0) > helvetica_bold_width("7", 40.0));
    }

    #[test]
    fn long_text_is_shortened() {
        let fitted = fit_text("The Stars and Stripes Forever", 10.0, 60.0);
        assert!(fitted.ends_with(".."));
        assert!(helvetica_width(&fitted, 10.0) <= 60.0);
        assert_eq!(fit_text("Short", 10.0, 60.0), "Short");
    }
}
