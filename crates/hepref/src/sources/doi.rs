//! Client for resolving DOIs.
//!
//! There is no DOI metadata service with the field coverage this tool needs,
//! so a DOI is resolved by querying the Inspire search API with the DOI as
//! the query, then overriding the derived URLs: the abstract page is always
//! the DOI resolver, and the PDF is only offered when the record embeds an
//! arXiv id (publisher PDFs are typically paywalled).

use super::*;

/// Client for DOI resolution via the Inspire API.
pub struct DoiClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The Inspire search endpoint used for resolution.
  base_url: String,
}

impl DoiClient {
  /// Creates a new DOI client instance.
  pub fn new() -> Self {
    Self { client: reqwest::Client::new(), base_url: "https://inspirehep.net/search".to_owned() }
  }

  /// Fetches the article for a bare DOI (no "doi:" prefix).
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::NotFound`] when Inspire doesn't know the DOI and
  /// [`HeprefError::ApiError`] on HTTP or parse failures.
  pub async fn fetch_article(&self, doi: &str) -> Result<Article, HeprefError> {
    let record = invenio::search(&self.client, "Inspire", &self.base_url, doi).await?;

    let mut article =
      invenio::article_from_record(Source::Doi, doi, &record, "https://inspirehep.net/record/", false);
    article.abs_url = format!("{DOI_SERVER}/{doi}");
    article.pdf_url = article.arxiv_id.as_ref().map(|id| format!("{ARXIV_SERVER}/pdf/{id}"));
    article.doi = Some(doi.to_owned());
    Ok(article)
  }
}

impl Default for DoiClient {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Hits the live Inspire API.
  #[ignore]
  #[tokio::test]
  async fn test_live_doi_fetch() {
    let article = DoiClient::new().fetch_article("10.1103/PhysRevD.98.030001").await.unwrap();
    assert_eq!(article.source, Source::Doi);
    assert_eq!(article.abs_url, "https://dx.doi.org/10.1103/PhysRevD.98.030001");
  }
}
