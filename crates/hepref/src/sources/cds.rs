//! Client for the CERN Document Server search API.
//!
//! CDS is queried with the raw report-number-like key; the shared Invenio
//! fetch path does the rest. CDS records have no SCOAP3 files, so the PDF
//! selection falls back from an embedded arXiv id straight to the
//! largest-attached-PDF heuristic.

use super::*;

/// Abstract-page path for records with nothing better than a record id.
const CDS_RECORD_PATH: &str = "https://cds.cern.ch/record/";

/// Client for the CDS search API.
pub struct CdsClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The search endpoint.
  base_url: String,
}

impl CdsClient {
  /// Creates a new CDS client instance.
  pub fn new() -> Self {
    Self { client: reqwest::Client::new(), base_url: "https://cds.cern.ch/search".to_owned() }
  }

  /// Fetches the article matching a report-number query.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::NotFound`] when the query has no hits and
  /// [`HeprefError::ApiError`] on HTTP or parse failures. Several hits are
  /// not an error; see [`invenio::select_record`].
  pub async fn fetch_article(&self, query: &str) -> Result<Article, HeprefError> {
    let record = invenio::search(&self.client, "CDS", &self.base_url, query).await?;
    Ok(invenio::article_from_record(Source::Cds, query, &record, CDS_RECORD_PATH, false))
  }
}

impl Default for CdsClient {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  // Hits the live CDS API.
  #[ignore]
  #[tokio::test]
  async fn test_live_cds_fetch() {
    let article = CdsClient::new().fetch_article("ATLAS-CONF-2018-001").await.unwrap();
    assert_eq!(article.source, Source::Cds);
    assert!(!article.title.is_empty());
  }
}
