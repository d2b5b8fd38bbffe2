//! The normalized article and its derived presentation.
//!
//! An [`Article`] is the uniform result of a fetch, whatever the backend: a
//! small set of fields plus the derived strings the CLI prints, such as the
//! compact author list, the one-line summary, and the download filename.
//!
//! Construction is two-phase: classify the key into an
//! [`Identifier`](crate::identifier::Identifier), then fetch it once. The
//! article is never mutated after the fetch.
//!
//! # Examples
//!
//! ```no_run
//! use hepref::article::Article;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let article = Article::resolve("1807.07546", None).await?;
//! println!("{}", article.short_info());
//!
//! let target = article.download_target()?;
//! println!("would save {} as {}", target.url, target.filename);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Author lists longer than this are cut off with an "et al." marker.
const SHORT_AUTHOR_LIMIT: usize = 5;

/// A complete reference with its normalized metadata.
///
/// Fields that a backend may not provide are optional; `title` is the empty
/// string when absent, matching how the backends themselves display such
/// records.
#[derive(Debug, Clone)]
pub struct Article {
  /// The backend this article came from.
  pub source:            Source,
  /// The canonical key it was fetched with.
  pub source_identifier: String,
  /// Title, whitespace-normalized.
  pub title:             String,
  /// Individual authors, in record order.
  pub authors:           Vec<Author>,
  /// Collaboration credits; when present they take precedence over the
  /// individual authors in compact listings.
  pub collaborations:    Vec<String>,
  /// Abstract text.
  pub abstract_text:     Option<String>,
  /// Composed journal reference line.
  pub publication_info:  Option<String>,
  /// Submission timestamp (arXiv only).
  pub publication_date:  Option<DateTime<Utc>>,
  /// URL of the abstract page.
  pub abs_url:           String,
  /// URL of the PDF, when one could be derived.
  pub pdf_url:           Option<String>,
  /// Embedded arXiv id, when the record carries one.
  pub arxiv_id:          Option<String>,
  /// Primary report number.
  pub report_number:     Option<String>,
  /// Digital Object Identifier.
  pub doi:               Option<String>,
  /// Inspire TeX citation key.
  pub texkey:            Option<String>,
}

/// A computed (URL, filename) pair for a PDF download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
  /// Where to fetch the PDF from.
  pub url:      String,
  /// The sanitized local filename to save it under.
  pub filename: String,
}

impl Identifier {
  /// Fetches the record for this identifier from its backend.
  ///
  /// One HTTP request per call; the result is meant to be held immutably
  /// rather than re-fetched.
  pub async fn fetch(&self) -> Result<Article, HeprefError> {
    match self {
      Identifier::Arxiv(id) => ArxivClient::new().fetch_article(id).await,
      Identifier::Cds(query) => CdsClient::new().fetch_article(query).await,
      Identifier::Inspire(query) => InspireClient::new().fetch_article(query).await,
      Identifier::Doi(doi) => DoiClient::new().fetch_article(doi).await,
    }
  }
}

impl Article {
  /// Classifies a raw key and fetches the matching article in one step.
  ///
  /// With `hint` set, only that backend is tried and a mismatch is fatal;
  /// otherwise the backends are tried in priority order.
  pub async fn resolve(input: &str, hint: Option<Source>) -> Result<Self, HeprefError> {
    let identifier = Identifier::classify_with(input, hint, &ClassifyOptions::default())?;
    identifier.fetch().await
  }

  /// The full author line: collaborations (each marked as such) when
  /// present, otherwise the individual authors' display names.
  pub fn authors_display(&self) -> String {
    if !self.collaborations.is_empty() {
      return self
        .collaborations
        .iter()
        .map(|name| format!("{name} (collaboration)"))
        .collect::<Vec<String>>()
        .join(", ");
    }
    self.authors.iter().filter_map(Author::display_name).collect::<Vec<String>>().join(", ")
  }

  /// The first author's display name, or the first collaboration.
  pub fn first_author(&self) -> Option<String> {
    if let Some(name) = self.collaborations.first() {
      return Some(name.clone());
    }
    self.authors.iter().find_map(Author::display_name)
  }

  /// The compact author tokens and whether the list was cut off.
  ///
  /// Collaborations take precedence; otherwise surnames (hyphens removed),
  /// at most [`SHORT_AUTHOR_LIMIT`] of them.
  fn short_author_tokens(&self) -> (Vec<String>, bool) {
    if !self.collaborations.is_empty() {
      return (self.collaborations.clone(), false);
    }
    let mut surnames: Vec<String> = self.authors.iter().filter_map(Author::surname).collect();
    if surnames.len() > SHORT_AUTHOR_LIMIT {
      surnames.truncate(SHORT_AUTHOR_LIMIT);
      (surnames, true)
    } else {
      (surnames, false)
    }
  }

  /// Compact author list for display: up to five surnames, then "et al.".
  pub fn short_authors(&self) -> String {
    let (tokens, truncated) = self.short_author_tokens();
    let mut line = tokens.join(", ");
    if truncated {
      line.push_str(" et al.");
    }
    line
  }

  /// The one-line summary: compact authors, title, abstract URL.
  pub fn short_info(&self) -> String {
    format!("{}, \"{}\", {}", self.short_authors(), self.title, self.abs_url)
  }

  /// Computes the PDF download target.
  ///
  /// The filename is `{file title}-{authors}.pdf`, where the file title
  /// prefers the arXiv id, then the report number, then the DOI, then the
  /// key the article was fetched with; the whole name is sanitized of
  /// characters that are illegal in filenames.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::UnsupportedOperation`] when the article exposes
  /// no PDF link.
  pub fn download_target(&self) -> Result<DownloadTarget, HeprefError> {
    let url = self.pdf_url.clone().ok_or_else(|| {
      HeprefError::UnsupportedOperation(format!("no PDF link for {}", self.source_identifier))
    })?;

    let file_title = self
      .arxiv_id
      .clone()
      .or_else(|| self.report_number.clone())
      .or_else(|| self.doi.clone())
      .unwrap_or_else(|| self.source_identifier.clone());

    let (tokens, truncated) = self.short_author_tokens();
    let mut names = tokens.join("-");
    if truncated {
      names.push_str("-etal");
    }

    let filename = if names.is_empty() {
      format!("{file_title}.pdf")
    } else {
      format!("{file_title}-{names}.pdf")
    };
    Ok(DownloadTarget { url, filename: sanitize_filename(&filename) })
  }

  /// The URL of the arXiv e-print source archive.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::UnsupportedOperation`] for articles with no
  /// arXiv id; only arXiv serves source archives.
  pub fn source_url(&self) -> Result<String, HeprefError> {
    match &self.arxiv_id {
      Some(id) => Ok(format!("{}/e-print/{id}", sources::ARXIV_SERVER)),
      None => Err(HeprefError::UnsupportedOperation(format!(
        "source archive for non-arXiv reference {}",
        self.source_identifier
      ))),
    }
  }

  /// Downloads the PDF into `dir`, returning the written path.
  ///
  /// # Errors
  ///
  /// Fails with [`HeprefError::UnsupportedOperation`] when no PDF link is
  /// available, or with network/filesystem errors from the transfer.
  pub async fn download_pdf(&self, dir: &std::path::Path) -> Result<PathBuf, HeprefError> {
    let target = self.download_target()?;

    let response = reqwest::get(&target.url).await?;
    let status = response.status();
    if !status.is_success() {
      return Err(HeprefError::ApiError(format!(
        "PDF download from {} returned HTTP {status}",
        target.url
      )));
    }
    let bytes = response.bytes().await?;

    let path = dir.join(&target.filename);
    debug!("writing PDF to path: {path:?}");
    std::fs::write(&path, bytes)?;
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn article() -> Article {
    Article {
      source:            Source::Cds,
      source_identifier: "ATLAS-CONF-2018-001".to_owned(),
      title:             "Measurement of something rare".to_owned(),
      authors:           Vec::new(),
      collaborations:    Vec::new(),
      abstract_text:     None,
      publication_info:  None,
      publication_date:  None,
      abs_url:           "https://cds.cern.ch/record/1".to_owned(),
      pdf_url:           None,
      arxiv_id:          None,
      report_number:     None,
      doi:               None,
      texkey:            None,
    }
  }

  fn authors(names: &[&str]) -> Vec<Author> {
    names.iter().map(|name| Author::literal(*name)).collect()
  }

  #[test]
  fn test_short_authors_caps_at_five_with_et_al() {
    let mut article = article();
    article.authors = authors(&[
      "Aaboud, M.",
      "Aad, G.",
      "Abbott, B.",
      "Abdallah, J.",
      "Abdinov, O.",
      "Abeloos, B.",
      "Abidi, S.H.",
    ]);
    assert_eq!(article.short_authors(), "Aaboud, Aad, Abbott, Abdallah, Abdinov et al.");
  }

  #[test]
  fn test_short_authors_without_truncation() {
    let mut article = article();
    article.authors = authors(&["Giudice, Gian", "Rattazzi, Riccardo"]);
    assert_eq!(article.short_authors(), "Giudice, Rattazzi");
  }

  #[test]
  fn test_collaborations_take_precedence() {
    let mut article = article();
    article.authors = authors(&["Aaboud, M.", "Aad, G."]);
    article.collaborations = vec!["ATLAS".to_owned()];
    assert_eq!(article.short_authors(), "ATLAS");
    assert_eq!(article.authors_display(), "ATLAS (collaboration)");
    assert_eq!(article.first_author().as_deref(), Some("ATLAS"));
  }

  #[test]
  fn test_short_info_line() {
    let mut article = article();
    article.authors = authors(&["Giudice, Gian"]);
    assert_eq!(
      article.short_info(),
      "Giudice, \"Measurement of something rare\", https://cds.cern.ch/record/1"
    );
  }

  #[test]
  fn test_download_target_requires_pdf_url() {
    let article = article();
    assert!(matches!(
      article.download_target(),
      Err(HeprefError::UnsupportedOperation(_))
    ));
  }

  #[test]
  fn test_download_target_filename() {
    let mut article = article();
    article.authors = authors(&["Fuks, Benjamin", "Iwamoto, Sho"]);
    article.arxiv_id = Some("1807.07546".to_owned());
    article.pdf_url = Some("https://arxiv.org/pdf/1807.07546".to_owned());

    let target = article.download_target().unwrap();
    assert_eq!(target.filename, "1807.07546-Fuks-Iwamoto.pdf");
  }

  #[test]
  fn test_download_target_sanitizes_old_style_ids() {
    let mut article = article();
    article.source = Source::Arxiv;
    article.source_identifier = "hep-ph/9905221".to_owned();
    article.arxiv_id = Some("hep-ph/9905221".to_owned());
    article.authors = authors(&["Giudice, Gian"]);
    article.pdf_url = Some("https://arxiv.org/pdf/hep-ph/9905221".to_owned());

    let target = article.download_target().unwrap();
    assert_eq!(target.filename, "hep-ph9905221-Giudice.pdf");
  }

  #[test]
  fn test_download_target_truncation_marker() {
    let mut article = article();
    article.authors = authors(&["A, a", "B, b", "C, c", "D, d", "E, e", "F, f"]);
    article.report_number = Some("CMS-PAS-EXO-16-009".to_owned());
    article.pdf_url = Some("https://cds.cern.ch/f/full.pdf".to_owned());

    let target = article.download_target().unwrap();
    assert_eq!(target.filename, "CMS-PAS-EXO-16-009-A-B-C-D-E-etal.pdf");
  }

  #[test]
  fn test_source_url_only_for_arxiv() {
    let mut with_arxiv = article();
    with_arxiv.arxiv_id = Some("1807.07546".to_owned());
    assert_eq!(with_arxiv.source_url().unwrap(), "https://arxiv.org/e-print/1807.07546");

    assert!(matches!(
      article().source_url(),
      Err(HeprefError::UnsupportedOperation(_))
    ));
  }
}
