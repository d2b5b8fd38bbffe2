//! Client for the Inspire literature search API.
//!
//! Inspire accepts both legacy Spires queries ("find a unruh") and bare
//! DOIs. Its records may carry a SCOAP3 open-access fulltext, which takes
//! precedence over every other PDF candidate, and an INSPIRETeX citation
//! key, which the shared record conversion extracts.

use super::*;

/// Abstract-page path for records with nothing better than a record id.
const INSPIRE_RECORD_PATH: &str = "https://inspirehep.net/record/";

/// Client for the Inspire search API.
pub struct InspireClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The search endpoint.
  base_url: String,
}

impl InspireClient {
  /// Creates a new Inspire client instance.
  pub fn new() -> Self {
    Self { client: reqwest::Client::new(), base_url: "https://inspirehep.net/search".to_owned() }
  }

  /// Fetches the article matching an Inspire query.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::NotFound`] when the query has no hits and
  /// [`HeprefError::ApiError`] on HTTP or parse failures. Several hits are
  /// not an error; see [`invenio::select_record`].
  pub async fn fetch_article(&self, query: &str) -> Result<Article, HeprefError> {
    let record = invenio::search(&self.client, "Inspire", &self.base_url, query).await?;
    Ok(invenio::article_from_record(Source::Inspire, query, &record, INSPIRE_RECORD_PATH, true))
  }
}

impl Default for InspireClient {
  fn default() -> Self { Self::new() }
}
