//! Backend clients for fetching bibliographic records.
//!
//! This module provides one client per backend. Each submodule implements the
//! source-specific logic for:
//! - Building the query URL
//! - Parsing the response payload
//! - Converting the record to the common [`Article`] shape
//!
//! # Supported backends
//!
//! - [`arxiv`] - the arXiv.org Atom feed API
//! - [`cds`] - the CERN Document Server search API
//! - [`inspire`] - the Inspire literature search API
//! - [`doi`] - DOIs, resolved through the Inspire API
//!
//! CDS and Inspire are both Invenio installations and share their fetch path
//! (see [`invenio`]); arXiv answers with an Atom feed instead of JSON.
//!
//! # Examples
//!
//! ```no_run
//! use hepref::sources::{ArxivClient, CdsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let article = ArxivClient::new().fetch_article("1807.07546").await?;
//! println!("{}", article.title);
//!
//! let article = CdsClient::new().fetch_article("ATLAS-CONF-2018-001").await?;
//! println!("{}", article.abs_url);
//! # Ok(())
//! # }
//! ```

pub mod arxiv;
pub mod cds;
pub mod doi;
pub mod inspire;
pub(crate) mod invenio;

pub use arxiv::ArxivClient;
pub use cds::CdsClient;
pub use doi::DoiClient;
pub use inspire::InspireClient;

use super::*;

/// Base URL for arXiv abstract, PDF and source links.
pub(crate) const ARXIV_SERVER: &str = "https://arxiv.org";
/// Base URL for DOI resolution links.
pub(crate) const DOI_SERVER: &str = "https://dx.doi.org";
