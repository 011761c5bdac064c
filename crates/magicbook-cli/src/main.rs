use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use magicbook_impose::BookFormat;
use std::path::PathBuf;

mod build;
mod logger;

use build::BuildArgs;
use logger::StderrLogger;

#[derive(Parser)]
#[command(name = "magicbook", about = "Assemble and impose sheet-music books", version)]
struct Cli {
    /// Library root (the folder holding config/config.json)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log per-page details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the charts in the library
    List,

    /// Build books for an ensemble
    Build {
        /// Ensemble file (defaults to the configured default ensemble)
        #[arg(short, long)]
        ensemble: Option<PathBuf>,

        /// Chart slugs to include, in running order (default: the whole library)
        #[arg(short, long, num_args = 1..)]
        charts: Vec<String>,

        /// Only build these instruments
        #[arg(short, long, num_args = 1..)]
        instruments: Vec<String>,

        /// Book format
        #[arg(long, default_value = "marchpack", value_enum)]
        format: FormatArg,

        /// Id of the last B chart (marchpack); defaults to the smallest allowed
        #[arg(long)]
        max_id: Option<u32>,

        /// Split binder books into A and B sides as well
        #[arg(long)]
        ab: bool,

        /// Custom running order: every chart slug, A side first
        #[arg(long, num_args = 1..)]
        order: Vec<String>,

        /// Split table JSON (defaults to the configured or built-in table)
        #[arg(long)]
        split_table: Option<PathBuf>,

        /// Print template PDF for marchpack sheets
        #[arg(long)]
        template: Option<PathBuf>,

        /// Leave out the table of contents
        #[arg(long)]
        no_toc: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Marchpack,
    MarchpackSplit,
    Binder,
}

impl From<FormatArg> for BookFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Marchpack => Self::MarchpackComprehensive,
            FormatArg::MarchpackSplit => Self::MarchpackSplit,
            FormatArg::Binder => Self::BinderOnePartPg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("failed to install logger")?;

    match cli.command {
        Commands::List => list(&cli.root),

        Commands::Build {
            ensemble,
            charts,
            instruments,
            format,
            max_id,
            ab,
            order,
            split_table,
            template,
            no_toc,
        } => {
            let args = BuildArgs {
                root: cli.root,
                ensemble,
                charts,
                instruments,
                format: format.into(),
                max_id,
                ab,
                order,
                split_table,
                template,
                table_of_contents: !no_toc,
            };
            let summary = build::run(args).await?;
            println!("Issue: {}", summary.issue_dir.display());
            for file in &summary.published {
                println!("  {}", file.display());
            }
            if !summary.failures.is_empty() {
                for failure in &summary.failures {
                    eprintln!("  FAILED {failure}");
                }
                bail!("{} book(s) failed", summary.failures.len());
            }
            Ok(())
        }
    }
}

fn list(root: &std::path::Path) -> Result<()> {
    let config = magicbook_library::LibraryConfig::load(root)
        .with_context(|| format!("failed to load config from {}", root.display()))?;
    let scan = magicbook_library::load_library(config.library_dir(root))?;

    for chart in &scan.charts {
        println!("{}  [{}]", chart.title(), chart.slug());
        for song in chart.songs() {
            if chart.is_medley() {
                println!("    {}", song.title);
            }
            let credits: Vec<String> = [
                song.artist.as_ref().map(|a| format!("by {a}")),
                song.arranger.as_ref().map(|a| format!("arr. {a}")),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !credits.is_empty() {
                let indent = if chart.is_medley() { "      " } else { "    " };
                println!("{indent}{}", credits.join(", "));
            }
        }
    }
    println!("{} charts", scan.charts.len());
    for (dir, error) in &scan.failures {
        eprintln!("  skipped {dir}: {error}");
    }
    Ok(())
}
