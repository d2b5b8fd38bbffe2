//! Client for fetching articles from arXiv.org.
//!
//! arXiv answers its query API with an Atom feed rather than JSON, so this
//! client parses XML via quick-xml and builds the [`Article`] directly: the
//! abstract and PDF URLs follow from the id alone, and the feed carries plain
//! full-name authors instead of the Invenio first/last pairs.
//!
//! A quirk of the API: an unknown id does not produce an empty feed but a
//! single blank entry with no `<id>` element. That case is reported as
//! [`HeprefError::NotFound`].

use quick_xml::de::from_str;

use super::*;

/// The arXiv query API's Atom feed.
#[derive(Debug, Deserialize)]
struct Feed {
  /// A feed may contain several entries even for an id query.
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// One entry of the Atom feed.
#[derive(Debug, Deserialize)]
struct Entry {
  /// Abstract-page URL; absent on the blank entry returned for unknown ids.
  id:        Option<String>,
  /// Title, possibly wrapped over several lines.
  title:     Option<String>,
  /// Authors as plain full names.
  #[serde(rename = "author", default)]
  authors:   Vec<FeedAuthor>,
  /// The abstract.
  summary:   Option<String>,
  /// Submission timestamp.
  published: Option<DateTime<Utc>>,
}

/// An author element of the feed.
#[derive(Debug, Deserialize)]
struct FeedAuthor {
  /// The author's full name, "First Last".
  name: String,
}

/// Client for the arXiv query API.
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client:   reqwest::Client,
  /// The query endpoint.
  base_url: String,
}

impl ArxivClient {
  /// Creates a new arXiv client instance.
  pub fn new() -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: "https://export.arxiv.org/api/query".to_owned(),
    }
  }

  /// Fetches an article by its canonical arXiv id.
  ///
  /// # Errors
  ///
  /// Returns [`HeprefError::NotFound`] for an unknown id (including the
  /// blank-entry case) and [`HeprefError::ApiError`] for an HTTP error
  /// status or an unparseable feed.
  pub async fn fetch_article(&self, arxiv_id: &str) -> Result<Article, HeprefError> {
    let url = format!("{}?id_list={}&max_results=1", self.base_url, arxiv_id);
    debug!("fetching from arXiv via: {url}");

    let response = self.client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(HeprefError::ApiError(format!("arXiv returned HTTP {status}")));
    }

    let body = response.text().await?;
    debug!("arXiv response: {body}");

    article_from_feed(arxiv_id, parse_feed(&body)?)
  }
}

impl Default for ArxivClient {
  fn default() -> Self { Self::new() }
}

/// Parses the Atom feed body.
fn parse_feed(body: &str) -> Result<Feed, HeprefError> {
  from_str(body).map_err(|e| HeprefError::ApiError(format!("failed to parse arXiv feed: {e}")))
}

/// Builds an [`Article`] from the feed's first entry.
fn article_from_feed(arxiv_id: &str, feed: Feed) -> Result<Article, HeprefError> {
  if feed.entries.len() > 1 {
    warn!("more than one feed entry for arXiv:{arxiv_id}; using the first");
  }

  let entry = feed.entries.into_iter().next().ok_or(HeprefError::NotFound)?;
  if entry.id.is_none() {
    // The blank entry arXiv returns for an unknown id.
    return Err(HeprefError::NotFound);
  }

  Ok(Article {
    source:            Source::Arxiv,
    source_identifier: arxiv_id.to_owned(),
    title:             entry.title.as_deref().map(squash_whitespace).unwrap_or_default(),
    authors:           entry.authors.into_iter().map(|author| Author::literal(author.name)).collect(),
    collaborations:    Vec::new(),
    abstract_text:     entry.summary.as_deref().map(squash_whitespace),
    publication_info:  None,
    publication_date:  entry.published,
    abs_url:           format!("{ARXIV_SERVER}/abs/{arxiv_id}"),
    pdf_url:           Some(format!("{ARXIV_SERVER}/pdf/{arxiv_id}")),
    arxiv_id:          Some(arxiv_id.to_owned()),
    report_number:     None,
    doi:               None,
    texkey:            None,
  })
}

#[cfg(test)]
mod tests {
  use tracing_test::traced_test;

  use super::*;

  const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/1807.07546v2</id>
    <title>Quark-lepton  model
   with a dark sector</title>
    <summary>We study a simplified model.</summary>
    <published>2018-07-19T17:59:59Z</published>
    <author><name>Benjamin Fuks</name></author>
    <author><name>Sho Iwamoto</name></author>
  </entry>
</feed>"#;

  const BLANK_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Error for id</title>
  </entry>
</feed>"#;

  const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;

  #[test]
  fn test_article_from_feed() {
    let article = article_from_feed("1807.07546", parse_feed(FEED).unwrap()).unwrap();
    assert_eq!(article.source, Source::Arxiv);
    assert_eq!(article.title, "Quark-lepton model with a dark sector");
    assert_eq!(article.authors.len(), 2);
    assert_eq!(article.authors[1].display_name().as_deref(), Some("Sho Iwamoto"));
    assert_eq!(article.abs_url, "https://arxiv.org/abs/1807.07546");
    assert_eq!(article.pdf_url.as_deref(), Some("https://arxiv.org/pdf/1807.07546"));
    assert!(article.publication_date.is_some());
  }

  #[test]
  fn test_blank_entry_is_not_found() {
    let result = article_from_feed("9999.99999", parse_feed(BLANK_FEED).unwrap());
    assert!(matches!(result, Err(HeprefError::NotFound)));
  }

  #[test]
  fn test_empty_feed_is_not_found() {
    let result = article_from_feed("9999.99999", parse_feed(EMPTY_FEED).unwrap());
    assert!(matches!(result, Err(HeprefError::NotFound)));
  }

  #[test]
  fn test_garbage_feed_is_api_error() {
    assert!(matches!(parse_feed("not xml at all"), Err(HeprefError::ApiError(_))));
  }

  #[traced_test]
  #[test]
  fn test_multiple_entries_warn_and_first_wins() {
    let doubled = FEED.replace(
      "</feed>",
      "<entry><id>http://arxiv.org/abs/0000.0000</id><title>Other</title></entry></feed>",
    );
    let article = article_from_feed("1807.07546", parse_feed(&doubled).unwrap()).unwrap();
    assert_eq!(article.title, "Quark-lepton model with a dark sector");
    assert!(logs_contain("more than one feed entry"));
  }

  // Hits the live arXiv API.
  #[ignore]
  #[tokio::test]
  async fn test_live_arxiv_fetch() {
    let article = ArxivClient::new().fetch_article("1807.07546").await.unwrap();
    assert!(!article.title.is_empty());
    assert!(!article.authors.is_empty());
    assert_eq!(article.source_identifier, "1807.07546");
  }
}
