//! Divisi split table
//!
//! When a section is split into several books, each book must be told which
//! of a chart's part variants to carry. The table is keyed by the number of
//! books; every book lists, for charts with 2, 3, 4... variants, the
//! (1-based) variant it receives.

use crate::types::*;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many distinct parts a chart has for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartVariants {
    /// Nothing found for the instrument or any alternate
    #[default]
    NoPart,
    /// One part that every player reads
    SinglePart,
    /// Several numbered parts (count is always >= 2)
    MultiPart(usize),
}

impl PartVariants {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => PartVariants::NoPart,
            1 => PartVariants::SinglePart,
            n => PartVariants::MultiPart(n),
        }
    }

    pub fn count(self) -> usize {
        match self {
            PartVariants::NoPart => 0,
            PartVariants::SinglePart => 1,
            PartVariants::MultiPart(n) => n,
        }
    }

    pub fn is_missing(self) -> bool {
        self == PartVariants::NoPart
    }
}

/// One book of a split section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubBook {
    pub name: String,
    /// `parts[k]` is the 1-based variant taken when a chart has `k + 2`
    /// variants
    pub parts: Vec<u32>,
}

impl SubBook {
    pub fn new(name: impl Into<String>, parts: impl Into<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            parts: parts.into(),
        }
    }

    /// 0-based variant for a chart with `variant_count` (>= 2) variants.
    ///
    /// Counts beyond the table fall back to its last column; the result
    /// never points past the variants that exist.
    fn variant_for(&self, variant_count: usize) -> usize {
        let column = (variant_count.saturating_sub(2)).min(self.parts.len() - 1);
        let variant = self.parts[column].saturating_sub(1) as usize;
        variant.min(variant_count - 1)
    }
}

/// What a book should take from a chart's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    /// Every file of the chart (the chart has a single part)
    All,
    /// Only the files of the nth variant (0-based, in variant order)
    Variant(usize),
}

/// A book paired with the variant it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub book: &'a str,
    pub choice: VariantChoice,
}

/// Static mapping from division count to the books of a split section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BTreeMap<u32, Vec<SubBook>>"))]
#[cfg_attr(feature = "serde", serde(into = "BTreeMap<u32, Vec<SubBook>>"))]
pub struct SplitTable {
    divisions: BTreeMap<u32, Vec<SubBook>>,
}

impl SplitTable {
    pub fn new(divisions: BTreeMap<u32, Vec<SubBook>>) -> Result<Self> {
        for (count, books) in &divisions {
            if *count < 2 {
                return Err(LibraryError::Config(format!(
                    "split table entry {count} must split into at least 2 books"
                )));
            }
            if books.is_empty() {
                return Err(LibraryError::Config(format!(
                    "split table entry {count} has no books"
                )));
            }
            for book in books {
                if book.parts.is_empty() || book.parts.contains(&0) {
                    return Err(LibraryError::Config(format!(
                        "book '{}' in split table entry {count} needs 1-based variants",
                        book.name
                    )));
                }
            }
        }
        Ok(Self { divisions })
    }

    /// Books for a division count, if the table covers it.
    pub fn books(&self, division_count: u32) -> Option<&[SubBook]> {
        self.divisions.get(&division_count).map(Vec::as_slice)
    }

    pub fn book_names(&self, division_count: u32) -> Option<Vec<&str>> {
        self.books(division_count)
            .map(|books| books.iter().map(|b| b.name.as_str()).collect())
    }

    /// Decide which variant each book receives for one chart.
    ///
    /// A chart with no parts feeds no book; a single part goes to every
    /// book unchanged.
    pub fn assign(
        &self,
        division_count: u32,
        variants: PartVariants,
    ) -> Result<Vec<Assignment<'_>>> {
        let books = self.books(division_count).ok_or_else(|| {
            LibraryError::Config(format!("no split table entry for {division_count} books"))
        })?;

        let assignments = match variants {
            PartVariants::NoPart => Vec::new(),
            PartVariants::SinglePart => books
                .iter()
                .map(|b| Assignment {
                    book: &b.name,
                    choice: VariantChoice::All,
                })
                .collect(),
            PartVariants::MultiPart(n) => books
                .iter()
                .map(|b| Assignment {
                    book: &b.name,
                    choice: VariantChoice::Variant(b.variant_for(n)),
                })
                .collect(),
        };
        Ok(assignments)
    }

    /// Load a split table from JSON.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        crate::config::read_json(path)
    }
}

impl Default for SplitTable {
    fn default() -> Self {
        let divisions = BTreeMap::from([
            (
                2,
                vec![SubBook::new("1", [1, 1, 1]), SubBook::new("2", [2, 2, 2])],
            ),
            (
                3,
                vec![
                    SubBook::new("1", [1, 1, 1]),
                    SubBook::new("2A", [1, 2, 2]),
                    SubBook::new("2B", [2, 2, 2]),
                    SubBook::new("3", [2, 3, 3]),
                ],
            ),
            (
                4,
                vec![
                    SubBook::new("1", [1, 1, 1]),
                    SubBook::new("2A", [1, 1, 2]),
                    SubBook::new("2B", [1, 2, 2]),
                    SubBook::new("2C", [2, 2, 2]),
                    SubBook::new("3A", [2, 2, 3]),
                    SubBook::new("3B", [2, 3, 3]),
                    SubBook::new("4", [2, 3, 4]),
                ],
            ),
        ]);
        Self { divisions }
    }
}

impl TryFrom<BTreeMap<u32, Vec<SubBook>>> for SplitTable {
    type Error = LibraryError;

    fn try_from(divisions: BTreeMap<u32, Vec<SubBook>>) -> Result<Self> {
        Self::new(divisions)
    }
}

impl From<SplitTable> for BTreeMap<u32, Vec<SubBook>> {
    fn from(table: SplitTable) -> Self {
        table.divisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(table: &SplitTable, div: u32, variants: PartVariants) -> Vec<(String, VariantChoice)> {
        table
            .assign(div, variants)
            .unwrap()
            .into_iter()
            .map(|a| (a.book.to_string(), a.choice))
            .collect()
    }

    #[test]
    fn three_books_two_variants() {
        let table = SplitTable::default();
        let got = choices(&table, 3, PartVariants::MultiPart(2));
        let expected: Vec<(String, VariantChoice)> = [("1", 0), ("2A", 0), ("2B", 1), ("3", 1)]
            .into_iter()
            .map(|(b, v)| (b.to_string(), VariantChoice::Variant(v)))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn four_books_four_variants_uses_last_column() {
        let table = SplitTable::default();
        let got: Vec<VariantChoice> = choices(&table, 4, PartVariants::MultiPart(4))
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        let expected: Vec<VariantChoice> = [0, 1, 1, 1, 2, 2, 3]
            .into_iter()
            .map(VariantChoice::Variant)
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn single_part_goes_everywhere() {
        let table = SplitTable::default();
        let got = choices(&table, 2, PartVariants::SinglePart);
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|(_, c)| *c == VariantChoice::All));
    }

    #[test]
    fn missing_part_feeds_nothing() {
        let table = SplitTable::default();
        assert!(table.assign(4, PartVariants::NoPart).unwrap().is_empty());
    }

    #[test]
    fn more_variants_than_table_clamps() {
        let table = SplitTable::default();
        let six = choices(&table, 2, PartVariants::MultiPart(6));
        let four = choices(&table, 2, PartVariants::MultiPart(4));
        assert_eq!(six, four);
    }

    #[test]
    fn unknown_division_is_config_error() {
        let table = SplitTable::default();
        assert!(table.assign(5, PartVariants::SinglePart).is_err());
    }

    #[test]
    fn rejects_malformed_tables() {
        let zero = BTreeMap::from([(2, vec![SubBook::new("1", [0, 1, 1])])]);
        assert!(SplitTable::new(zero).is_err());
        let empty = BTreeMap::from([(2, vec![SubBook::new("1", Vec::new())])]);
        assert!(SplitTable::new(empty).is_err());
        let one = BTreeMap::from([(1, vec![SubBook::new("1", [1])])]);
        assert!(SplitTable::new(one).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_from_json() {
        let json = r#"{"2": [{"name": "1", "parts": [1]}, {"name": "2", "parts": [2]}]}"#;
        let table: SplitTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.book_names(2), Some(vec!["1", "2"]));
        let got = choices(&table, 2, PartVariants::MultiPart(3));
        assert_eq!(got[1].1, VariantChoice::Variant(1));
    }
}
