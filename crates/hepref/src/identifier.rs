//! Identifier classification for the supported reference backends.
//!
//! This module decides which backend a raw key belongs to and constructs a
//! canonical, validated [`Identifier`] for it. It recognises:
//!
//! - arXiv ids, new style (`1807.07546`) and old style (`hep-ph/9905221`),
//!   plus bare old-style numbers (`9905221`), which are given a default
//!   category
//! - CDS report-number-like queries (`ATLAS-CONF-2018-001`)
//! - Inspire legacy search queries (`find a unruh`) and bare DOIs
//! - DOIs (`10.1103/PhysRevD.98.030001`), with an optional `doi:` prefix
//! - `arxiv.org` and `doi.org` URLs
//!
//! Auto-detection tries the backends in a fixed priority order: arXiv, CDS,
//! Inspire, DOI. Because Inspire also accepts bare DOIs, a plain DOI key
//! classifies as an Inspire query; the DOI backend proper is selected with an
//! explicit [`Source`] hint.
//!
//! # Examples
//!
//! ```
//! use hepref::identifier::{Identifier, Source};
//!
//! let id = Identifier::classify("1807.07546")?;
//! assert_eq!(id.source(), Source::Arxiv);
//!
//! let id = Identifier::classify("ATLAS-CONF-2018-001")?;
//! assert_eq!(id.source(), Source::Cds);
//!
//! // An explicit hint restricts classification to one backend.
//! let id = Identifier::classify_as("10.1103/PhysRevD.98.030001", Source::Doi)?;
//! assert_eq!(id.as_str(), "10.1103/PhysRevD.98.030001");
//! # Ok::<(), hepref::errors::HeprefError>(())
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::*;

lazy_static! {
  /// New-style arXiv id: year-month dot 4- or 5-digit number.
  static ref ARXIV_NEW: Regex = Regex::new(r"^(\d{4})\.(\d{4,5})$").unwrap();
  /// Old-style arXiv id: category slash 7-digit number.
  static ref ARXIV_OLD: Regex = Regex::new(r"^[a-zA-Z.-]+/\d{7}$").unwrap();
  /// Bare old-style number, completed with the configured default category.
  static ref ARXIV_BARE: Regex = Regex::new(r"^\d{7}$").unwrap();
  /// CDS report-number-like query, e.g. "ATLAS-CONF-2018-001".
  static ref CDS_REPORT: Regex = Regex::new(r"^[A-Za-z-]+-\d+-\d+$").unwrap();
  /// Legacy Spires search syntax, e.g. "find a unruh" or "fin t dark matter".
  static ref SPIRES_QUERY: Regex = Regex::new(r"^find? .+$").unwrap();
  /// DOI with optional "doi:" prefix; the capture holds the bare DOI.
  static ref DOI_KEY: Regex = Regex::new(r"^(?:doi:)?(10\.\d{4,}/\S+)$").unwrap();
}

/// The backend a reference key belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Source {
  /// arxiv.org, queried through its Atom feed API
  Arxiv,
  /// The CERN Document Server (cds.cern.ch)
  Cds,
  /// inspirehep.net literature search
  Inspire,
  /// A Digital Object Identifier, resolved through the Inspire API
  Doi,
}

impl std::fmt::Display for Source {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Source::Arxiv => write!(f, "arXiv"),
      Source::Cds => write!(f, "CDS"),
      Source::Inspire => write!(f, "Inspire"),
      Source::Doi => write!(f, "DOI"),
    }
  }
}

impl FromStr for Source {
  type Err = HeprefError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match &s.to_lowercase() as &str {
      "arxiv" => Ok(Source::Arxiv),
      "cds" => Ok(Source::Cds),
      "inspire" => Ok(Source::Inspire),
      "doi" => Ok(Source::Doi),
      s => Err(HeprefError::InvalidSource(s.to_owned())),
    }
  }
}

/// Knobs for classification that are not derivable from the key itself.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
  /// Category assumed for bare old-style arXiv numbers such as "9905221".
  pub default_category: String,
}

impl Default for ClassifyOptions {
  fn default() -> Self { Self { default_category: "hep-ph".to_owned() } }
}

/// A validated reference key, tagged by backend.
///
/// An `Identifier` is immutable once constructed: the contained string is the
/// canonical form sent to the backend (arXiv id, report-number query, search
/// query, or bare DOI). Invalid keys are rejected at construction with
/// [`HeprefError::InvalidIdentifier`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Identifier {
  /// A canonical arXiv id, e.g. "1807.07546" or "hep-ph/9905221".
  Arxiv(String),
  /// A report-number query for the CDS search API.
  Cds(String),
  /// A raw query for the Inspire search API.
  Inspire(String),
  /// A bare DOI (no "doi:" prefix).
  Doi(String),
}

impl std::fmt::Display for Identifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl Identifier {
  /// Classifies a raw key, trying the backends in priority order
  /// (arXiv, CDS, Inspire, DOI) with default options.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::InvalidIdentifier`] if no backend recognises the
  /// key.
  pub fn classify(input: &str) -> Result<Self, HeprefError> {
    Self::classify_with(input, None, &ClassifyOptions::default())
  }

  /// Classifies a raw key against a single backend.
  ///
  /// Unlike [`Identifier::classify`], a key the hinted backend doesn't
  /// recognise is fatal: no other backend is tried.
  pub fn classify_as(input: &str, source: Source) -> Result<Self, HeprefError> {
    Self::classify_with(input, Some(source), &ClassifyOptions::default())
  }

  /// Classifies a raw key with an optional backend hint and explicit options.
  ///
  /// URL inputs (`https://arxiv.org/abs/…`, `https://doi.org/…`) are
  /// recognised before the pattern table is consulted.
  pub fn classify_with(
    input: &str,
    hint: Option<Source>,
    options: &ClassifyOptions,
  ) -> Result<Self, HeprefError> {
    // A URL names its backend by host, so it bypasses the priority order.
    if let Ok(url) = Url::parse(input) {
      if url.host_str().is_some() {
        let identifier = Self::from_url(&url, options)?;
        if let Some(hint) = hint {
          if identifier.source() != hint {
            return Err(HeprefError::InvalidIdentifier(input.to_owned()));
          }
        }
        return Ok(identifier);
      }
    }

    let candidates = match hint {
      Some(source) => vec![source],
      None => vec![Source::Arxiv, Source::Cds, Source::Inspire, Source::Doi],
    };

    candidates
      .into_iter()
      .find_map(|source| Self::try_source(input, source, options))
      .ok_or_else(|| HeprefError::InvalidIdentifier(input.to_owned()))
  }

  /// The backend this identifier belongs to.
  pub fn source(&self) -> Source {
    match self {
      Identifier::Arxiv(_) => Source::Arxiv,
      Identifier::Cds(_) => Source::Cds,
      Identifier::Inspire(_) => Source::Inspire,
      Identifier::Doi(_) => Source::Doi,
    }
  }

  /// The canonical key sent to the backend.
  pub fn as_str(&self) -> &str {
    match self {
      Identifier::Arxiv(s) | Identifier::Cds(s) | Identifier::Inspire(s) | Identifier::Doi(s) => s,
    }
  }

  /// Tries one backend's pattern against the key.
  fn try_source(input: &str, source: Source, options: &ClassifyOptions) -> Option<Self> {
    match source {
      Source::Arxiv => parse_arxiv_id(input, options).map(Identifier::Arxiv),
      Source::Cds => CDS_REPORT.is_match(input).then(|| Identifier::Cds(input.to_owned())),
      Source::Inspire => (SPIRES_QUERY.is_match(input) || DOI_KEY.is_match(input))
        .then(|| Identifier::Inspire(input.to_owned())),
      Source::Doi => DOI_KEY
        .captures(input)
        .and_then(|cap| cap.get(1))
        .map(|m| Identifier::Doi(m.as_str().to_owned())),
    }
  }

  /// Classifies an abstract-page or DOI URL.
  fn from_url(url: &Url, options: &ClassifyOptions) -> Result<Self, HeprefError> {
    match url.host_str() {
      Some("arxiv.org") | Some("www.arxiv.org") => {
        let id = url
          .path()
          .strip_prefix("/abs/")
          .ok_or_else(|| HeprefError::InvalidIdentifier(url.as_str().to_owned()))?;
        parse_arxiv_id(id, options)
          .map(Identifier::Arxiv)
          .ok_or_else(|| HeprefError::InvalidIdentifier(url.as_str().to_owned()))
      },
      Some("doi.org") | Some("dx.doi.org") => {
        let doi = url.path().trim_start_matches('/');
        DOI_KEY
          .captures(doi)
          .and_then(|cap| cap.get(1))
          .map(|m| Identifier::Doi(m.as_str().to_owned()))
          .ok_or_else(|| HeprefError::InvalidIdentifier(url.as_str().to_owned()))
      },
      _ => Err(HeprefError::InvalidIdentifier(url.as_str().to_owned())),
    }
  }
}

/// Validates an arXiv id and returns its canonical form.
///
/// New-style ids carry a 5-digit number from 2015-01 (year-month 1500)
/// onwards and a 4-digit number before that; a mismatch is rejected.
/// Bare 7-digit numbers are completed with the default category.
fn parse_arxiv_id(input: &str, options: &ClassifyOptions) -> Option<String> {
  if let Some(captures) = ARXIV_NEW.captures(input) {
    let yymm: u32 = captures[1].parse().ok()?;
    let digits = captures[2].len();
    let valid = if yymm >= 1500 { digits == 5 } else { digits == 4 };
    return valid.then(|| input.to_owned());
  }
  if ARXIV_OLD.is_match(input) {
    return Some(input.to_owned());
  }
  if ARXIV_BARE.is_match(input) {
    return Some(format!("{}/{}", options.default_category, input));
  }
  None
}
