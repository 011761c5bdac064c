//! Part acquisition
//!
//! Copies each selected chart's parts for one instrument out of the library
//! and into that instrument's working folder, falling back through the
//! instrument's alternates when the library has nothing written for it.

use crate::chart::Chart;
use crate::config::create_fresh_dir;
use crate::instrument::InstrumentSpec;
use crate::part::{PartFile, discover_parts};
use crate::split::PartVariants;
use crate::types::*;
use std::path::{Path, PathBuf};

/// Whose parts ended up in the working folder for a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartSource {
    /// Written for the instrument itself
    Native,
    /// Borrowed from an alternate instrument
    Alternate(String),
    /// Nothing usable was found
    Missing,
}

/// Parts gathered for one chart.
#[derive(Debug, Clone)]
pub struct ChartParts {
    pub chart_slug: String,
    pub chart_title: String,
    pub source: PartSource,
    pub variants: PartVariants,
    /// Unique part labels in variant order (`trumpet1`, `trumpet2`, ...)
    pub labels: Vec<String>,
    /// Copies in the instrument's working folder
    pub files: Vec<PartFile>,
}

impl ChartParts {
    pub fn is_missing(&self) -> bool {
        self.variants.is_missing()
    }

    /// Files making up the nth variant.
    pub fn variant_files(&self, variant: usize) -> impl Iterator<Item = &PartFile> {
        let label = self.labels.get(variant);
        self.files
            .iter()
            .filter(move |f| Some(&f.label) == label)
    }
}

/// Everything gathered for one instrument.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub instrument: InstrumentSpec,
    /// The instrument's working folder
    pub dir: PathBuf,
    /// One entry per selected chart, in selection order
    pub charts: Vec<ChartParts>,
}

impl Acquisition {
    pub fn missing(&self) -> impl Iterator<Item = &ChartParts> {
        self.charts.iter().filter(|c| c.is_missing())
    }

    pub fn get(&self, chart_slug: &str) -> Option<&ChartParts> {
        self.charts.iter().find(|c| c.chart_slug == chart_slug)
    }
}

/// Gather parts for `instrument` into `<issue_dir>/<instrument slug>/`.
///
/// A chart with no part for the instrument or any alternate is recorded as
/// [`PartVariants::NoPart`]; that is not an error.
pub fn acquire_parts(
    instrument: &InstrumentSpec,
    charts: &[Chart],
    library_dir: &Path,
    issue_dir: &Path,
) -> Result<Acquisition> {
    let dir = create_fresh_dir(issue_dir.join(&instrument.slug))?;
    log::info!("Generating {} folder", instrument.name);

    let mut gathered = Vec::with_capacity(charts.len());
    for chart in charts {
        let available = discover_parts(chart.path(library_dir), chart.slug())?;
        gathered.push(acquire_chart(instrument, chart, &available, &dir)?);
    }

    Ok(Acquisition {
        instrument: instrument.clone(),
        dir,
        charts: gathered,
    })
}

fn acquire_chart(
    instrument: &InstrumentSpec,
    chart: &Chart,
    available: &[PartFile],
    dir: &Path,
) -> Result<ChartParts> {
    let candidates = std::iter::once((&instrument.slug, PartSource::Native)).chain(
        instrument
            .alternates()
            .iter()
            .map(|alt| (alt, PartSource::Alternate(alt.clone()))),
    );

    for (slug, source) in candidates {
        let matches: Vec<&PartFile> = available.iter().filter(|p| p.is_for(slug)).collect();
        if matches.is_empty() {
            continue;
        }

        let mut files = Vec::with_capacity(matches.len());
        for part in matches {
            files.push(part.copy_into(dir)?);
            log::info!(" - added {} {}", chart.slug(), part.label);
        }
        let labels = unique_labels(&files);
        if let PartSource::Alternate(alt) = &source {
            log::info!(" - {} uses {} parts", chart.slug(), alt);
        }

        return Ok(ChartParts {
            chart_slug: chart.slug().to_string(),
            chart_title: chart.title().to_string(),
            source,
            variants: PartVariants::from_count(labels.len()),
            labels,
            files,
        });
    }

    log::warn!("!!! MISSING {} for {}", chart.title(), instrument.name);
    Ok(ChartParts {
        chart_slug: chart.slug().to_string(),
        chart_title: chart.title().to_string(),
        source: PartSource::Missing,
        variants: PartVariants::NoPart,
        labels: Vec::new(),
        files: Vec::new(),
    })
}

/// Distinct labels in variant order; format variants of a part collapse.
fn unique_labels(files: &[PartFile]) -> Vec<String> {
    let mut keyed: Vec<(u32, &str)> = files.iter().map(PartFile::variant_key).collect();
    keyed.sort_unstable();
    keyed.dedup();
    keyed.into_iter().map(|(_, label)| label.to_string()).collect()
}
