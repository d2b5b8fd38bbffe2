//! Error types for the hepref library.
//!
//! This module provides a single error type covering every failure mode of a
//! reference lookup:
//! - Identifier classification failures
//! - Network and backend API errors
//! - Missing records and missing derived data
//!
//! # Examples
//!
//! ```
//! use hepref::{errors::HeprefError, identifier::Identifier};
//!
//! match Identifier::classify("not-a-reference !!") {
//!   Err(HeprefError::InvalidIdentifier(key)) => println!("no backend recognises {key}"),
//!   Err(e) => println!("other error: {e}"),
//!   Ok(id) => println!("classified as {id}"),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while resolving a reference.
///
/// This enum provides the full set of error cases for:
/// - Classifying raw keys into backend identifiers
/// - Fetching records from the backend APIs
/// - Deriving URLs and filenames from a fetched article
///
/// Ambiguity (a query matching more than one record) is deliberately *not* an
/// error: the first record is used and the candidates are logged at warn
/// level, matching the behavior of the backends' own web interfaces.
#[derive(Error, Debug)]
pub enum HeprefError {
  /// The provided key doesn't match any backend's identifier format.
  ///
  /// This can occur when:
  /// - An arXiv id has the wrong number of digits for its year-month
  /// - A report number or DOI is malformed
  /// - An explicit `--type` hint was given and the key doesn't fit it
  #[error("reference key not recognised: {0}")]
  InvalidIdentifier(String),

  /// The provided source type string couldn't be parsed.
  ///
  /// The string parameter contains the invalid source value for debugging.
  #[error("invalid source type, see `hepref::identifier::Source`")]
  InvalidSource(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The query was valid but matched no record at the backend.
  ///
  /// Note that the arXiv API returns a single blank entry for an unknown id;
  /// that case is also reported as `NotFound`.
  #[error("no record found")]
  NotFound,

  /// A backend returned an error response or an unparseable payload.
  ///
  /// The string parameter names the backend and, when available, the HTTP
  /// status or parser message.
  #[error("backend error: {0}")]
  ApiError(String),

  /// The requested action is not available for this article.
  ///
  /// This occurs when, for example, a PDF download is requested for an
  /// article that exposes no PDF link, or the arXiv source archive is
  /// requested for a non-arXiv article.
  #[error("unsupported operation: {0}")]
  UnsupportedOperation(String),

  /// Failed to parse a URL.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),
}
