//! A library for resolving high-energy-physics references (arXiv ids, CDS
//! report numbers, Inspire queries, DOIs) to metadata and derived actions:
//! abstract-page and PDF URLs, author listings, download filenames.
//!
//! # Example
//! ```rust,no_run
//! use hepref::{article::Article, identifier::Source};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   // Backend guessed from the key.
//!   let article = Article::resolve("1807.07546", None).await?;
//!   println!("{}", article.title);
//!
//!   // Or forced with a hint.
//!   let article = Article::resolve("10.1103/PhysRevD.98.030001", Some(Source::Doi)).await?;
//!   println!("{}", article.abs_url);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

pub mod article;
pub mod errors;
pub mod format;
pub mod identifier;
pub mod record;
pub mod sources;

use article::Article;
use errors::HeprefError;
use format::{sanitize_filename, squash_whitespace};
use identifier::{ClassifyOptions, Identifier, Source};
use record::{Author, Record};
use sources::{ArxivClient, CdsClient, DoiClient, InspireClient};
