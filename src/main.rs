//! `songbook` command line.
//!
//! Fatal errors (configuration, missing inputs, unknown songs) exit non-zero.
//! Per-song failures in a book run are reported in the summary only.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use songbook::render::{LopdfMerger, TemplateStore, Wkhtmltopdf};
use songbook::services::{self, DocumentAssembler, YoutubeApiSearch};
use songbook::song::{self, JsonWorkbook, SongSelector, Summary};
use songbook::{Config, InnerId, SongId, SortKey, Version};

const DEFAULT_CONFIG: &str = "config.json";

#[derive(Debug, Parser)]
#[command(name = "songbook", about = "Generate songbook PDFs from a song sheet")]
struct Cli {
    /// Configuration file (defaults to $SONGBOOK_CONFIG, then config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the song store from the exported sheet
    Import {
        /// Workbook JSON export (defaults to the configured sheet file)
        #[arg(long)]
        sheet: Option<PathBuf>,
        /// Song store to write (defaults to the configured store)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate tables of contents and every song page of an edition
    Book {
        #[arg(long)]
        version: Version,
    },
    /// Generate a single song page
    Song {
        #[command(flatten)]
        selector: SelectorArgs,
        #[arg(long)]
        version: Version,
    },
    /// Generate one table of contents
    Toc {
        #[arg(long)]
        version: Version,
        /// `id` or `title`
        #[arg(long)]
        sort: SortKey,
    },
    /// Merge an edition's pages into one book
    Merge {
        #[arg(long)]
        version: Version,
    },
    /// Look up recording links for every song
    FindLinks {
        /// Report file (defaults to the configured links file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct SelectorArgs {
    /// Human id as entered in the sheet
    #[arg(long)]
    id: Option<String>,
    /// Import-assigned id
    #[arg(long)]
    inner_id: Option<u32>,
}

impl SelectorArgs {
    fn selector(&self) -> anyhow::Result<SongSelector> {
        match (&self.id, self.inner_id) {
            (Some(id), _) => Ok(SongSelector::Id(SongId::new(id.as_str()))),
            (None, Some(n)) => Ok(SongSelector::InnerId(InnerId(n))),
            (None, None) => anyhow::bail!("pass --id or --inner-id"),
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .or_else(|| std::env::var_os("SONGBOOK_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn assembler(config: &Config) -> DocumentAssembler<'_, TemplateStore, Wkhtmltopdf> {
    DocumentAssembler::new(
        config,
        TemplateStore::new(&config.paths.templates_dir),
        Wkhtmltopdf::new(
            &config.paths.wkhtmltopdf,
            &config.paths.temp_dir,
            Duration::from_secs(config.render_timeout_secs),
        ),
    )
}

fn load_songs(config: &Config) -> anyhow::Result<Vec<songbook::SongRecord>> {
    let path = config.songs_json_path();
    let songs = song::load_songs(&path).with_context(|| format!("loading {}", path.display()))?;
    tracing::info!("Loaded {} songs", songs.len());
    Ok(songs)
}

fn import(config: &Config, sheet: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let sheet = sheet.map_or_else(|| config.sheet_path(), Path::to_path_buf);
    let output = output.map_or_else(|| config.songs_json_path(), Path::to_path_buf);

    let songs = song::import(config, &JsonWorkbook::new(&sheet))
        .with_context(|| format!("importing {}", sheet.display()))?;
    song::save_songs(&output, &songs)?;

    tracing::info!("Saved {} songs to {}", songs.len(), output.display());
    println!("{}", Summary::of(&songs));
    Ok(())
}

async fn find_links(config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let songs = load_songs(config)?;
    let search = YoutubeApiSearch::new(config);
    if !search.is_configured() {
        tracing::warn!("YOUTUBE_API_KEY is not set; songs without a link will get '-'");
    }
    let links = services::find_links_for_songs(&search, &songs).await;
    let output = output.map_or_else(|| config.links_txt_path(), Path::to_path_buf);
    services::write_links(&output, &links)?;
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = config_path(&cli);
    let config = Config::load(&path)?;

    match cli.command {
        Command::Import { sheet, output } => import(&config, sheet.as_deref(), output.as_deref())?,
        Command::Book { version } => {
            let songs = load_songs(&config)?;
            let summary = assembler(&config).generate_book(version, &songs);
            println!("{version}: {summary}");
        }
        Command::Song { selector, version } => {
            let songs = load_songs(&config)?;
            let path = assembler(&config).generate_single(&selector.selector()?, version, &songs)?;
            println!("{}", path.display());
        }
        Command::Toc { version, sort } => {
            let songs = load_songs(&config)?;
            match assembler(&config).generate_toc(version, sort, &songs)? {
                Some(path) => println!("{}", path.display()),
                None => println!("The {version} edition has no table of contents"),
            }
        }
        Command::Merge { version } => {
            let path = services::merge_final(&config, version, &LopdfMerger)?;
            println!("{}", path.display());
        }
        Command::FindLinks { output } => find_links(&config, output.as_deref()).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::prelude::*;

        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    run(Cli::parse()).await
}
