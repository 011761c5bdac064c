//! Ensemble and instrument descriptors.

use crate::split::SplitTable;
use crate::types::*;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One instrument section of an ensemble.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentSpec {
    pub slug: String,
    pub name: String,
    /// How many books the section is split into
    #[cfg_attr(feature = "serde", serde(rename = "div"))]
    pub division_count: u32,
    /// Instruments whose parts may be used, in order, when the library has
    /// no part for this one. `None` means "inherit the defaults".
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub alternates: Option<Vec<String>>,
}

impl InstrumentSpec {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, division_count: u32) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            division_count,
            alternates: None,
        }
    }

    pub fn with_alternates<I, S>(mut self, alternates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternates = Some(alternates.into_iter().map(Into::into).collect());
        self
    }

    pub fn alternates(&self) -> &[String] {
        self.alternates.as_deref().unwrap_or_default()
    }

    pub fn is_split(&self) -> bool {
        self.division_count > 1
    }

    /// Check the division count against the split table.
    pub fn validate(&self, table: &SplitTable) -> Result<()> {
        if self.division_count < 1 {
            return Err(LibraryError::Config(format!(
                "instrument '{}' can't be divided into less than one part",
                self.slug
            )));
        }
        if self.is_split() && table.books(self.division_count).is_none() {
            return Err(LibraryError::UnknownDivision {
                instrument: self.slug.clone(),
                divisions: self.division_count,
            });
        }
        Ok(())
    }
}

/// Per-instrument defaults shared across ensembles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstrumentDefaults {
    #[cfg_attr(feature = "serde", serde(default))]
    pub alternates: Vec<String>,
}

/// An ensemble: a named set of instrument sections.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ensemble {
    pub name: String,
    pub slug: String,
    pub instruments: Vec<InstrumentSpec>,
}

impl Ensemble {
    /// Fill in alternates for instruments that don't declare their own.
    pub fn apply_defaults(&mut self, defaults: &BTreeMap<String, InstrumentDefaults>) {
        for instrument in &mut self.instruments {
            if instrument.alternates.is_none() {
                if let Some(d) = defaults.get(&instrument.slug) {
                    instrument.alternates = Some(d.alternates.clone());
                }
            }
        }
    }

    /// Load an ensemble file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        crate::config::read_json(path)
    }
}

/// Load a default-instruments file (`{ "<slug>": { "alternates": [...] } }`).
#[cfg(feature = "serde")]
pub fn load_instrument_defaults(
    path: impl AsRef<std::path::Path>,
) -> Result<BTreeMap<String, InstrumentDefaults>> {
    crate::config::read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_division_counts() {
        let table = SplitTable::default();
        assert!(InstrumentSpec::new("tuba", "Tuba", 1).validate(&table).is_ok());
        assert!(InstrumentSpec::new("tpt", "Trumpet", 3).validate(&table).is_ok());
        assert!(matches!(
            InstrumentSpec::new("tuba", "Tuba", 0).validate(&table),
            Err(LibraryError::Config(_))
        ));
        assert!(matches!(
            InstrumentSpec::new("tpt", "Trumpet", 7).validate(&table),
            Err(LibraryError::UnknownDivision { divisions: 7, .. })
        ));
    }

    #[test]
    fn defaults_fill_only_missing_alternates() {
        let mut ensemble = Ensemble {
            name: "Band".into(),
            slug: "band".into(),
            instruments: vec![
                InstrumentSpec::new("cornet", "Cornet", 1),
                InstrumentSpec::new("trumpet", "Trumpet", 1).with_alternates(Vec::<String>::new()),
            ],
        };
        let defaults = BTreeMap::from([
            (
                "cornet".to_string(),
                InstrumentDefaults {
                    alternates: vec!["trumpet".into()],
                },
            ),
            (
                "trumpet".to_string(),
                InstrumentDefaults {
                    alternates: vec!["cornet".into()],
                },
            ),
        ]);

        ensemble.apply_defaults(&defaults);
        assert_eq!(ensemble.instruments[0].alternates(), ["trumpet".to_string()]);
        assert!(ensemble.instruments[1].alternates().is_empty());
    }
}
