//! Chart ordering and page ids
//!
//! A book either numbers its charts 1..n, or (for marchpacks) splits them
//! across an A side and a B side. A side ids count up from `A1`; B side ids
//! count *down* from a chosen maximum so that the last B chart is always
//! `B<max>`, leaving room to add charts to the B side later without
//! renumbering.

use crate::chart::Chart;
use crate::types::*;
use std::collections::VecDeque;
use std::fmt;

/// Largest id that fits the two-digit stamp.
pub const MAX_PAGE_ID: u32 = 99;

/// Side of a marchpack card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::A => "A",
            Side::B => "B",
        })
    }
}

/// Label stamped on every page of a chart: `A7`, `B18`, or plain `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub side: Option<Side>,
    pub number: u32,
}

impl PageId {
    pub fn new(side: Option<Side>, number: u32) -> Self {
        Self { side, number }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "{}{}", side, self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

/// A chart placed in a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// 1-based position on its side
    pub position: usize,
    pub page_id: PageId,
    pub chart: Chart,
}

/// The running order of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookIndex {
    /// Side A, or the whole book when it isn't split
    pub side_a: Vec<IndexEntry>,
    /// Side B; empty when the book isn't split
    pub side_b: Vec<IndexEntry>,
    /// Id of the last B chart, present when A/B splitting is in effect
    pub max_id: Option<u32>,
}

impl BookIndex {
    pub fn is_ab_split(&self) -> bool {
        self.max_id.is_some()
    }

    pub fn len(&self) -> usize {
        self.side_a.len() + self.side_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All charts of the book, A side first.
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.side_a.iter().chain(&self.side_b).map(|e| &e.chart)
    }
}

/// Picks the next chart for a position. Used for custom running orders.
pub trait ChartSelector {
    /// Return the index (into `remaining`) of the chart that gets `page_id`.
    fn select(&mut self, remaining: &[Chart], page_id: PageId) -> Result<usize>;
}

/// Takes charts in the order they were given.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOrder;

impl ChartSelector for ListOrder {
    fn select(&mut self, remaining: &[Chart], page_id: PageId) -> Result<usize> {
        if remaining.is_empty() {
            return Err(LibraryError::Selection(format!(
                "no chart left for {page_id}"
            )));
        }
        Ok(0)
    }
}

/// Answers from a predetermined sequence of chart slugs.
#[derive(Debug, Clone, Default)]
pub struct SlugOrderSelector {
    slugs: VecDeque<String>,
}

impl SlugOrderSelector {
    pub fn new<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }
}

impl ChartSelector for SlugOrderSelector {
    fn select(&mut self, remaining: &[Chart], page_id: PageId) -> Result<usize> {
        let slug = self.slugs.pop_front().ok_or_else(|| {
            LibraryError::Selection(format!("the running order has no chart for {page_id}"))
        })?;
        remaining
            .iter()
            .position(|c| c.slug() == slug)
            .ok_or_else(|| {
                LibraryError::Selection(format!(
                    "'{slug}' (for {page_id}) is not one of the remaining charts"
                ))
            })
    }
}

/// Smallest allowed last B id for `chart_count` charts.
pub fn min_max_id(chart_count: usize) -> u32 {
    let (pages, remainder) = (chart_count / 2, chart_count % 2);
    ((pages + remainder) as u32).max(1)
}

/// Check a last B id before any work starts.
pub fn validate_max_id(chart_count: usize, max_id: u32) -> Result<()> {
    let min = min_max_id(chart_count);
    if max_id < min || max_id > MAX_PAGE_ID {
        return Err(LibraryError::InvalidMaxId {
            max_id,
            min,
            max: MAX_PAGE_ID,
        });
    }
    Ok(())
}

/// Build a book's running order.
///
/// With `max_id` the charts are split across A and B: A takes the larger
/// half, B the rest with ids ending at `B<max_id>`. Without it every chart
/// gets an unprefixed id. The selector is asked for each position in turn
/// and only ever sees the charts not yet placed.
pub fn order_charts(
    charts: &[Chart],
    max_id: Option<u32>,
    selector: &mut dyn ChartSelector,
) -> Result<BookIndex> {
    if charts.is_empty() {
        return Err(LibraryError::Config("no charts selected".to_string()));
    }
    if let Some(max_id) = max_id {
        validate_max_id(charts.len(), max_id)?;
    }

    let mut remaining = charts.to_vec();
    let mut place = |side: Option<Side>, count: usize, first_id: u32| -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::with_capacity(count);
        for offset in 0..count {
            let page_id = PageId::new(side, first_id + offset as u32);
            let index = selector.select(&remaining, page_id)?;
            if index >= remaining.len() {
                return Err(LibraryError::Selection(format!(
                    "selection {index} for {page_id} is out of range"
                )));
            }
            entries.push(IndexEntry {
                position: offset + 1,
                page_id,
                chart: remaining.remove(index),
            });
        }
        Ok(entries)
    };

    match max_id {
        Some(max_id) => {
            let marchpack_pages = charts.len() / 2;
            let remainder = charts.len() % 2;
            let side_a = place(Some(Side::A), marchpack_pages + remainder, 1)?;
            let first_b = max_id + 1 - marchpack_pages as u32;
            let side_b = place(Some(Side::B), marchpack_pages, first_b)?;
            Ok(BookIndex {
                side_a,
                side_b,
                max_id: Some(max_id),
            })
        }
        None => Ok(BookIndex {
            side_a: place(None, charts.len(), 1)?,
            side_b: Vec::new(),
            max_id: None,
        }),
    }
}

/// Running order in list order.
pub fn auto_order(charts: &[Chart], max_id: Option<u32>) -> Result<BookIndex> {
    order_charts(charts, max_id, &mut ListOrder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charts(n: usize) -> Vec<Chart> {
        (1..=n)
            .map(|i| Chart::single(format!("chart-{i}"), format!("Chart {i}")).unwrap())
            .collect()
    }

    fn ids(entries: &[IndexEntry]) -> Vec<String> {
        entries.iter().map(|e| e.page_id.to_string()).collect()
    }

    #[test]
    fn seven_charts_max_twenty() {
        let index = auto_order(&charts(7), Some(20)).unwrap();
        assert_eq!(ids(&index.side_a), ["A1", "A2", "A3", "A4"]);
        assert_eq!(ids(&index.side_b), ["B18", "B19", "B20"]);
        assert_eq!(index.side_a[3].chart.slug(), "chart-4");
        assert_eq!(index.side_b[0].chart.slug(), "chart-5");
        assert_eq!(index.side_b[0].position, 1);
    }

    #[test]
    fn sides_stay_balanced() {
        for n in 1..=30 {
            let index = auto_order(&charts(n), Some(99)).unwrap();
            let (a, b) = (index.side_a.len(), index.side_b.len());
            assert_eq!(a + b, n);
            assert!(a - b <= 1, "n = {n}");
            assert!(index.side_b.iter().all(|e| e.page_id.number >= 1));
        }
    }

    #[test]
    fn unsplit_book_is_numbered_plainly() {
        let index = auto_order(&charts(3), None).unwrap();
        assert_eq!(ids(&index.side_a), ["1", "2", "3"]);
        assert!(index.side_b.is_empty());
        assert!(!index.is_ab_split());
    }

    #[test]
    fn max_id_bounds() {
        assert_eq!(min_max_id(7), 4);
        assert_eq!(min_max_id(8), 4);
        assert!(validate_max_id(7, 3).is_err());
        assert!(validate_max_id(7, 4).is_ok());
        assert!(validate_max_id(7, 99).is_ok());
        assert!(matches!(
            validate_max_id(7, 100),
            Err(LibraryError::InvalidMaxId { max_id: 100, min: 4, max: 99 })
        ));
        assert!(auto_order(&charts(7), Some(3)).is_err());
    }

    #[test]
    fn custom_order_follows_slugs() {
        let mut selector = SlugOrderSelector::new(["chart-3", "chart-1", "chart-2"]);
        let index = order_charts(&charts(3), Some(10), &mut selector).unwrap();
        let slugs: Vec<&str> = index.charts().map(Chart::slug).collect();
        assert_eq!(slugs, ["chart-3", "chart-1", "chart-2"]);
        assert_eq!(ids(&index.side_b), ["B10"]);
    }

    #[test]
    fn custom_order_rejects_placed_or_unknown_charts() {
        let mut selector = SlugOrderSelector::new(["chart-1", "chart-1"]);
        assert!(matches!(
            order_charts(&charts(2), None, &mut selector),
            Err(LibraryError::Selection(_))
        ));

        let mut short = SlugOrderSelector::new(["chart-1"]);
        assert!(order_charts(&charts(2), None, &mut short).is_err());
    }

    #[test]
    fn selector_only_sees_unplaced_charts() {
        struct Last(Vec<usize>);
        impl ChartSelector for Last {
            fn select(&mut self, remaining: &[Chart], _: PageId) -> Result<usize> {
                self.0.push(remaining.len());
                Ok(remaining.len() - 1)
            }
        }

        let mut selector = Last(Vec::new());
        let index = order_charts(&charts(4), Some(2), &mut selector).unwrap();
        assert_eq!(selector.0, [4, 3, 2, 1]);
        assert_eq!(index.side_a[0].chart.slug(), "chart-4");
        assert_eq!(ids(&index.side_b), ["B1", "B2"]);
    }
}
