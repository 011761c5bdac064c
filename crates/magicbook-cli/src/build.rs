//! The `build` command
//!
//! Loads the configuration, fixes the chart selection and running order
//! (so a bad max id or order is refused before anything is written), then
//! assembles every instrument's books into a new issue folder. A failing
//! instrument or book is reported and the rest carry on.

use anyhow::{Context, Result, bail};
use chrono::Local;
use lopdf::Document;
use magicbook_impose::{BookFormat, BookRequest, impose_book, load_pdf};
use magicbook_library::*;
use std::path::{Path, PathBuf};

/// Template looked up in the templates folder when none is given
const TRIM_GUIDES_TEMPLATE: &str = "trim-guides.pdf";

pub struct BuildArgs {
    pub root: PathBuf,
    pub ensemble: Option<PathBuf>,
    pub charts: Vec<String>,
    pub instruments: Vec<String>,
    pub format: BookFormat,
    pub max_id: Option<u32>,
    pub ab: bool,
    pub order: Vec<String>,
    pub split_table: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub table_of_contents: bool,
}

pub struct BuildSummary {
    pub issue_dir: PathBuf,
    pub published: Vec<PathBuf>,
    pub failures: Vec<String>,
}

pub async fn run(args: BuildArgs) -> Result<BuildSummary> {
    let root = args.root.as_path();
    let config = LibraryConfig::load(root)
        .with_context(|| format!("failed to load config from {}", root.display()))?;
    let ensemble = load_ensemble(&config, root, args.ensemble.as_deref())?;
    let table = load_split_table(&config, root, args.split_table.as_deref())?;

    let scan = load_library(config.library_dir(root))?;
    for (dir, error) in &scan.failures {
        log::warn!("skipping chart {dir}: {error}");
    }
    let charts = select_charts(&scan.charts, &args.charts)?;
    let index = running_order(&charts, &args)?;
    let instruments = select_instruments(&ensemble, &args.instruments)?;
    let template = load_template(&config, root, &args).await?;

    let issue_dir = prepare_issue_dir(
        config.output_dir(root),
        &ensemble.slug,
        Local::now().naive_local(),
    )?;
    log::info!("Issue folder {}", issue_dir.display());

    let library_dir = config.library_dir(root);
    let mut summary = BuildSummary {
        issue_dir: issue_dir.clone(),
        published: Vec::new(),
        failures: Vec::new(),
    };

    for instrument in instruments {
        let books = match prepare_books(instrument, &charts, &table, &library_dir, &issue_dir) {
            Ok(books) => books,
            Err(e) => {
                log::error!("{}: {}", instrument.name, e);
                summary.failures.push(format!("{}: {}", instrument.name, e));
                continue;
            }
        };

        for folder in books {
            let request = BookRequest {
                folder,
                index: index.clone(),
                format: args.format,
                ensemble_name: ensemble.name.clone(),
                table_of_contents: args.table_of_contents,
                template: template.clone(),
                issue_dir: issue_dir.clone(),
            };
            match impose_book(request).await {
                Ok(output) => summary.published.extend(output.files),
                Err(e) => {
                    log::error!("{e}");
                    summary.failures.push(e.to_string());
                }
            }
        }
    }

    Ok(summary)
}

/// Acquire, split and report one instrument's parts.
fn prepare_books(
    instrument: &InstrumentSpec,
    charts: &[Chart],
    table: &SplitTable,
    library_dir: &Path,
    issue_dir: &Path,
) -> magicbook_library::Result<Vec<BookFolder>> {
    instrument.validate(table)?;
    let acquisition = acquire_parts(instrument, charts, library_dir, issue_dir)?;
    let books = distribute_parts(&acquisition, table)?;
    let report = write_missing_report(&acquisition, &acquisition.dir)?;
    let missing = acquisition.missing().count();
    if missing > 0 {
        log::warn!("{}: {} chart(s) missing, see {}", instrument.name, missing, report.display());
    }
    Ok(books)
}

fn load_ensemble(config: &LibraryConfig, root: &Path, path: Option<&Path>) -> Result<Ensemble> {
    let path = match (path, &config.default_ensemble) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(default)) => config.config_path(root, default),
        (None, None) => bail!("no ensemble given and no default-ensemble configured"),
    };
    let mut ensemble = Ensemble::load(&path)
        .with_context(|| format!("failed to load ensemble {}", path.display()))?;

    if let Some(defaults) = &config.default_instruments {
        let defaults_path = config.config_path(root, defaults);
        let defaults = load_instrument_defaults(&defaults_path)
            .with_context(|| format!("failed to load {}", defaults_path.display()))?;
        ensemble.apply_defaults(&defaults);
    }
    Ok(ensemble)
}

fn load_split_table(config: &LibraryConfig, root: &Path, path: Option<&Path>) -> Result<SplitTable> {
    let path = match (path, &config.split_table) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(configured)) => config.config_path(root, configured),
        (None, None) => return Ok(SplitTable::default()),
    };
    SplitTable::load(&path).with_context(|| format!("failed to load split table {}", path.display()))
}

/// The requested charts in the order given, or the whole library.
fn select_charts(library: &[Chart], slugs: &[String]) -> Result<Vec<Chart>> {
    if slugs.is_empty() {
        if library.is_empty() {
            bail!("the library has no charts");
        }
        return Ok(library.to_vec());
    }

    let mut selected: Vec<Chart> = Vec::with_capacity(slugs.len());
    for slug in slugs {
        if selected.iter().any(|c| c.slug() == slug) {
            bail!("chart {slug} is listed twice");
        }
        let chart = library
            .iter()
            .find(|c| c.slug() == slug)
            .with_context(|| format!("no chart {slug} in the library"))?;
        selected.push(chart.clone());
    }
    Ok(selected)
}

fn running_order(charts: &[Chart], args: &BuildArgs) -> Result<BookIndex> {
    let split = args.format.is_marchpack() || args.ab;
    let max_id = if split {
        let max_id = args.max_id.unwrap_or_else(|| min_max_id(charts.len()));
        validate_max_id(charts.len(), max_id)?;
        Some(max_id)
    } else {
        if args.max_id.is_some() {
            log::warn!("--max-id only applies to A/B books, ignoring it");
        }
        None
    };

    let index = if args.order.is_empty() {
        auto_order(charts, max_id)?
    } else {
        if args.order.len() != charts.len() {
            bail!(
                "--order lists {} charts but {} are selected",
                args.order.len(),
                charts.len()
            );
        }
        order_charts(charts, max_id, &mut SlugOrderSelector::new(args.order.iter().cloned()))?
    };

    for entry in index.side_a.iter().chain(&index.side_b) {
        log::info!("{:>4}  {}", entry.page_id.to_string(), entry.chart.title());
    }
    Ok(index)
}

fn select_instruments<'a>(ensemble: &'a Ensemble, slugs: &[String]) -> Result<Vec<&'a InstrumentSpec>> {
    if slugs.is_empty() {
        return Ok(ensemble.instruments.iter().collect());
    }
    slugs
        .iter()
        .map(|slug| {
            ensemble
                .instruments
                .iter()
                .find(|i| &i.slug == slug)
                .with_context(|| format!("{} has no instrument {slug}", ensemble.name))
        })
        .collect()
}

async fn load_template(config: &LibraryConfig, root: &Path, args: &BuildArgs) -> Result<Option<Document>> {
    if args.format != BookFormat::MarchpackComprehensive {
        return Ok(None);
    }
    let path = match &args.template {
        Some(path) => path.clone(),
        None => {
            let default = config.templates_dir(root).join(TRIM_GUIDES_TEMPLATE);
            if !default.is_file() {
                log::info!("no print template found, using generated trim guides");
                return Ok(None);
            }
            default
        }
    };
    let template = load_pdf(&path)
        .await
        .with_context(|| format!("failed to load template {}", path.display()))?;
    Ok(Some(template))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<Chart> {
        ["alpha", "bravo", "charlie"]
            .iter()
            .map(|s| Chart::single(*s, s.to_uppercase()).unwrap())
            .collect()
    }

    fn args(format: BookFormat) -> BuildArgs {
        BuildArgs {
            root: PathBuf::from("."),
            ensemble: None,
            charts: Vec::new(),
            instruments: Vec::new(),
            format,
            max_id: None,
            ab: false,
            order: Vec::new(),
            split_table: None,
            template: None,
            table_of_contents: true,
        }
    }

    #[test]
    fn charts_are_selected_in_given_order() {
        let picked = select_charts(&library(), &["charlie".into(), "alpha".into()]).unwrap();
        let slugs: Vec<&str> = picked.iter().map(Chart::slug).collect();
        assert_eq!(slugs, ["charlie", "alpha"]);
        assert!(select_charts(&library(), &["delta".into()]).is_err());
        assert!(select_charts(&library(), &["alpha".into(), "alpha".into()]).is_err());
        assert_eq!(select_charts(&library(), &[]).unwrap().len(), 3);
    }

    #[test]
    fn marchpack_order_defaults_to_smallest_max_id() {
        let index = running_order(&library(), &args(BookFormat::MarchpackComprehensive)).unwrap();
        assert_eq!(index.max_id, Some(2));
        assert_eq!(index.side_b[0].page_id.to_string(), "B2");

        let binder = running_order(&library(), &args(BookFormat::BinderOnePartPg)).unwrap();
        assert!(!binder.is_ab_split());
    }

    #[test]
    fn bad_max_id_and_order_are_refused() {
        let mut too_small = args(BookFormat::MarchpackSplit);
        too_small.max_id = Some(1);
        assert!(running_order(&library(), &too_small).is_err());

        let mut short = args(BookFormat::BinderOnePartPg);
        short.order = vec!["alpha".into()];
        assert!(running_order(&library(), &short).is_err());

        let mut custom = args(BookFormat::BinderOnePartPg);
        custom.order = vec!["bravo".into(), "charlie".into(), "alpha".into()];
        let index = running_order(&library(), &custom).unwrap();
        assert_eq!(index.side_a[0].chart.slug(), "bravo");
    }
}
