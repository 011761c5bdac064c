//! Table of contents
//!
//! A two-column index of every part in the book, sorted by chart slug,
//! rendered on the book's own paper size.

use crate::constants::*;
use crate::parts::OrderedPart;
use crate::render::text::helvetica_width;
use crate::render::{DocumentBuilder, PageContent, fit_text, show_text};
use crate::types::*;
use lopdf::Document;
use magicbook_library::Chart;

/// One row of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocLine {
    Part {
        chart_title: String,
        label: String,
        page_id: String,
    },
    /// A song of the medley listed just above
    Song(String),
}

/// Rows for every part of the book.
///
/// Charts are listed by slug. Each part gets a row; a medley's songs
/// follow its last part row.
pub fn compile_toc(charts: &[Chart], side_a: &[OrderedPart], side_b: &[OrderedPart]) -> Vec<TocLine> {
    let mut sorted: Vec<&Chart> = charts.iter().collect();
    sorted.sort_by(|a, b| a.slug().cmp(b.slug()));

    let mut lines = Vec::new();
    for chart in sorted {
        let rows: Vec<TocLine> = side_a
            .iter()
            .chain(side_b)
            .filter(|p| p.chart.slug() == chart.slug())
            .map(|p| TocLine::Part {
                chart_title: chart.title().to_string(),
                label: p.label.clone(),
                page_id: p.page_id.to_string(),
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        lines.extend(rows);
        if chart.is_medley() {
            lines.extend(chart.songs().iter().map(|s| TocLine::Song(s.title.clone())));
        }
    }
    lines
}

/// Text metrics of the table for a paper size
#[derive(Debug, Clone, Copy)]
struct TocLayout {
    size: f32,
    leading: f32,
    column_width: f32,
    /// Baseline of the column headers
    header_y: f32,
    rows_per_column: usize,
}

impl TocLayout {
    fn new(geometry: &SideGeometry) -> Self {
        let (width, height) = geometry.paper();
        let size = if height < 500.0 { 8.0 } else { 11.0 };
        let leading = size * 1.4;
        let column_width = (width - 2.0 * TOC_MARGIN_PT - TOC_COLUMN_GAP_PT) / 2.0;
        let header_y = height - TOC_MARGIN_PT - TOC_TITLE_SIZE - leading - size;
        let first_row = header_y - leading;
        let rows = ((first_row - TOC_MARGIN_PT) / leading).floor() as usize + 1;
        Self {
            size,
            leading,
            column_width,
            header_y,
            rows_per_column: rows.max(1),
        }
    }

    fn rows_per_page(&self) -> usize {
        self.rows_per_column * 2
    }
}

/// Number of pages `line_count` rows take on this paper.
pub fn toc_page_count(line_count: usize, geometry: &SideGeometry) -> usize {
    line_count.div_ceil(TocLayout::new(geometry).rows_per_page()).max(1)
}

/// Render the table of contents.
pub fn render_toc(title: &str, lines: &[TocLine], geometry: &SideGeometry) -> Document {
    let layout = TocLayout::new(geometry);
    let (width, height) = geometry.paper();
    let mut builder = DocumentBuilder::new();
    let regular = builder.font("Helvetica");
    let bold = builder.font("Helvetica-Bold");

    let pages: Vec<&[TocLine]> = if lines.is_empty() {
        vec![lines]
    } else {
        lines.chunks(layout.rows_per_page()).collect()
    };

    for page_lines in pages {
        let mut content = PageContent::new();
        content.set_font("F1", regular);
        content.set_font("F2", bold);
        content.push(&show_text(
            "F2",
            TOC_TITLE_SIZE,
            TOC_MARGIN_PT,
            height - TOC_MARGIN_PT - TOC_TITLE_SIZE,
            &fit_text(title, TOC_TITLE_SIZE, width - 2.0 * TOC_MARGIN_PT),
        ));

        for column in 0..2 {
            let start = (column * layout.rows_per_column).min(page_lines.len());
            let end = (start + layout.rows_per_column).min(page_lines.len());
            let x = TOC_MARGIN_PT + column as f32 * (layout.column_width + TOC_COLUMN_GAP_PT);
            content.push(&column_ops(&layout, x, &page_lines[start..end]));
        }

        builder.add_page(width, height, content);
    }

    builder.finish()
}

fn column_ops(layout: &TocLayout, x: f32, lines: &[TocLine]) -> String {
    let size = layout.size;
    let chart_width = layout.column_width * 0.58;
    let part_x = x + layout.column_width * 0.6;
    let part_width = layout.column_width * 0.28;
    let right = x + layout.column_width;

    let mut ops = String::new();
    ops.push_str(&show_text("F2", size, x, layout.header_y, "CHART"));
    ops.push_str(&show_text("F2", size, part_x, layout.header_y, "PART"));
    ops.push_str(&show_text(
        "F2",
        size,
        right - helvetica_width("##", size),
        layout.header_y,
        "##",
    ));
    let rule_y = layout.header_y - size * 0.35;
    ops.push_str(&format!("q 0.5 w {} {} m {} {} l S Q\n", x, rule_y, right, rule_y));

    let mut y = layout.header_y - layout.leading;
    for line in lines {
        match line {
            TocLine::Part {
                chart_title,
                label,
                page_id,
            } => {
                ops.push_str(&show_text("F1", size, x, y, &fit_text(chart_title, size, chart_width)));
                ops.push_str(&show_text("F1", size, part_x, y, &fit_text(label, size, part_width)));
                ops.push_str(&show_text(
                    "F2",
                    size,
                    right - helvetica_width(page_id, size),
                    y,
                    page_id,
                ));
            }
            TocLine::Song(song) => {
                let indent = size * 1.5;
                ops.push_str(&show_text(
                    "F1",
                    size,
                    x + indent,
                    y,
                    &fit_text(song, size, chart_width - indent),
                ));
            }
        }
        y -= layout.leading;
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicbook_library::{PageId, Side, Song};
    use std::path::PathBuf;

    fn part(chart: &Chart, label: &str, side: Side, number: u32) -> OrderedPart {
        OrderedPart {
            chart: chart.clone(),
            label: label.to_string(),
            page_id: PageId::new(Some(side), number),
            path: PathBuf::from(format!("{} {}.pdf", chart.slug(), label)),
            format: None,
            page_count: 1,
        }
    }

    #[test]
    fn rows_are_sorted_by_slug_with_medley_songs() {
        let zebra = Chart::single("zebra", "Zebra March").unwrap();
        let medley = Chart::new(
            "beatles",
            false,
            vec![Song::new("Help!"), Song::new("Yesterday")],
            Some("Beatles Medley".to_string()),
        )
        .unwrap();
        let missing = Chart::single("absent", "Absent").unwrap();
        let charts = [zebra.clone(), medley.clone(), missing];

        let a = [part(&zebra, "trumpet1", Side::A, 1)];
        let b = [part(&medley, "trumpet1", Side::B, 20)];
        let lines = compile_toc(&charts, &a, &b);

        assert_eq!(
            lines,
            [
                TocLine::Part {
                    chart_title: "Beatles Medley".into(),
                    label: "trumpet1".into(),
                    page_id: "B20".into(),
                },
                TocLine::Song("Help!".into()),
                TocLine::Song("Yesterday".into()),
                TocLine::Part {
                    chart_title: "Zebra March".into(),
                    label: "trumpet1".into(),
                    page_id: "A1".into(),
                },
            ]
        );
    }

    #[test]
    fn long_tables_span_pages() {
        let geometry = SideGeometry::LYRE;
        let per_page = TocLayout::new(&geometry).rows_per_page();
        assert!(per_page >= 20);
        assert_eq!(toc_page_count(0, &geometry), 1);
        assert_eq!(toc_page_count(per_page, &geometry), 1);
        assert_eq!(toc_page_count(per_page + 1, &geometry), 2);

        let lines = vec![TocLine::Song("x".into()); per_page + 1];
        let doc = render_toc("Band: Trumpet", &lines, &geometry);
        assert_eq!(doc.get_pages().len(), 2);
    }
}
