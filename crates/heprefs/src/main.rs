use std::{path::PathBuf, time::Duration};

use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::HeprefsErrors;
use hepref::{
  article::Article,
  errors::HeprefError,
  identifier::Source,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Look up high-energy physics references by arXiv, CDS, Inspire, or DOI key")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Open the abstract page in a browser
  Abs {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Open the PDF in a browser
  Pdf {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Open the source file page in a browser
  Src {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Download the PDF to a local file
  Get {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
    /// Directory to save the PDF into
    #[arg(long, short)]
    dir:    Option<PathBuf>,
  },
  /// Show the title
  Title {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Show the full author list
  Authors {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Show the first author only
  FirstAuthor {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Show a one-line citation summary
  Info {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
  /// Show every field derived for a reference
  Debug {
    /// Reference key (arXiv ID, CDS report number, Inspire query, or DOI)
    key:    String,
    /// Force a key type instead of guessing (arxiv, cds, inspire, doi)
    #[arg(long = "type", short = 't')]
    source: Option<Source>,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Classify the key and fetch the article it refers to.
async fn resolve(key: &str, source: Option<Source>) -> Result<Article, HeprefsErrors> {
  println!("{} Looking up: {}", style(LOOKING_GLASS).cyan(), style(key).yellow());
  let article = Article::resolve(key, source).await?;
  debug!("Article details: {:?}", article);
  Ok(article)
}

/// Print the URL and hand it to the system browser.
fn open_url(url: &str) -> Result<(), HeprefsErrors> {
  println!("{} Opening: {}", style(ROCKET).cyan(), style(url).blue().underlined());
  open::that(url)?;
  Ok(())
}

#[tokio::main]
async fn main() -> Result<(), HeprefsErrors> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  match cli.command {
    Commands::Abs { key, source } => {
      let article = resolve(&key, source).await?;
      if article.abs_url.is_empty() {
        return Err(HeprefsErrors::Hepref(HeprefError::UnsupportedOperation(format!(
          "no abstract page is known for {}",
          article.source_identifier
        ))));
      }
      open_url(&article.abs_url)
    },

    Commands::Pdf { key, source } => {
      let article = resolve(&key, source).await?;
      let url = article.pdf_url.clone().ok_or_else(|| {
        HeprefError::UnsupportedOperation(format!(
          "no PDF is known for {}",
          article.source_identifier
        ))
      })?;
      open_url(&url)
    },

    Commands::Src { key, source } => {
      let article = resolve(&key, source).await?;
      let url = article.source_url()?;
      open_url(&url)
    },

    Commands::Get { key, source, dir } => {
      let article = resolve(&key, source).await?;
      let target = article.download_target()?;
      let dir = dir.unwrap_or_else(|| PathBuf::from("."));
      let path = dir.join(&target.filename);

      if path.exists() {
        println!(
          "{} File already exists at: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );

        if !dialoguer::Confirm::new()
          .with_prompt("Do you want to overwrite it?")
          .default(false)
          .interact()?
        {
          println!("{} Keeping existing file", style("ℹ").blue());
          return Ok(());
        }
      }

      let spinner = ProgressBar::new_spinner();
      spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").unwrap());
      spinner.set_message(format!("Downloading {}", target.filename));
      spinner.enable_steady_tick(Duration::from_millis(100));

      let saved = article.download_pdf(&dir).await?;
      spinner.finish_and_clear();

      println!("{} Saved PDF to: {}", style(SAVE).green(), style(saved.display()).yellow());
      Ok(())
    },

    Commands::Title { key, source } => {
      let article = resolve(&key, source).await?;
      println!("{}", article.title);
      Ok(())
    },

    Commands::Authors { key, source } => {
      let article = resolve(&key, source).await?;
      println!("{}", article.authors_display());
      Ok(())
    },

    Commands::FirstAuthor { key, source } => {
      let article = resolve(&key, source).await?;
      match article.first_author() {
        Some(author) => println!("{author}"),
        None => println!("{} No authors listed", style(WARNING).yellow()),
      }
      Ok(())
    },

    Commands::Info { key, source } => {
      let article = resolve(&key, source).await?;
      println!("{}", article.short_info());
      Ok(())
    },

    Commands::Debug { key, source } => {
      let article = resolve(&key, source).await?;

      println!("\n{} Reference details:", style(PAPER).green());
      println!(
        "   {} {} {}",
        style("Source:").green().bold(),
        style(&article.source).cyan(),
        style(&article.source_identifier).yellow()
      );
      println!("   {} {}", style("Title:").green().bold(), style(&article.title).white());
      println!(
        "   {} {}",
        style("Authors:").green().bold(),
        style(article.authors_display()).white()
      );
      if let Some(info) = &article.publication_info {
        println!("   {} {}", style("Published in:").green().bold(), style(info).white());
      }
      if let Some(date) = &article.publication_date {
        println!("   {} {}", style("Date:").green().bold(), style(date).white());
      }
      if let Some(id) = &article.arxiv_id {
        println!("   {} {}", style("arXiv ID:").green().bold(), style(id).yellow());
      }
      if let Some(report) = &article.report_number {
        println!("   {} {}", style("Report number:").green().bold(), style(report).yellow());
      }
      if let Some(doi) = &article.doi {
        println!("   {} {}", style("DOI:").green().bold(), style(doi).blue().underlined());
      }
      if let Some(texkey) = &article.texkey {
        println!("   {} {}", style("TeX key:").green().bold(), style(texkey).yellow());
      }
      println!(
        "   {} {}",
        style("Abstract page:").green().bold(),
        style(&article.abs_url).blue().underlined()
      );
      if let Some(url) = &article.pdf_url {
        println!("   {} {}", style("PDF URL:").green().bold(), style(url).blue().underlined());
      }
      if let Ok(target) = article.download_target() {
        println!("   {} {}", style("Filename:").green().bold(), style(&target.filename).white());
      }
      if let Some(text) = &article.abstract_text {
        let preview = text.chars().take(200).collect::<String>();
        let preview = if text.chars().count() > 200 { format!("{}...", preview) } else { preview };
        println!("   {} {}", style("Abstract:").green().bold(), style(preview).white().italic());
      }

      println!("\n{} Lookup complete", style(SUCCESS).green());
      Ok(())
    },
  }
}
