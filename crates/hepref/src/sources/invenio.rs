//! Shared fetch path for the Invenio search APIs (CDS and Inspire).
//!
//! Both backends answer `?of=recjson` searches with a JSON array of records.
//! This module issues the query, enforces the exactly-one-record contract
//! (zero records is [`HeprefError::NotFound`]; several records log a warning
//! listing the candidates and the first one wins), and converts a [`Record`]
//! into the common [`Article`] shape.

use url::Url;

use super::*;

/// Fields requested from the search endpoint.
const DATA_KEY: &str = "primary_report_number,recid,system_control_number,authors,\
                        corporate_name,title,abstract,publication_info,files,doi";

/// How many records to request; one would do, but the extra context lets the
/// ambiguity warning list the competing titles.
const RESULT_LIMIT: &str = "3";

/// Issues one recjson search and returns the selected record.
pub(crate) async fn search(
  client: &reqwest::Client,
  backend: &str,
  base_url: &str,
  query: &str,
) -> Result<Record, HeprefError> {
  let url = Url::parse_with_params(base_url, &[
    ("p", query),
    ("of", "recjson"),
    ("ot", DATA_KEY),
    ("rg", RESULT_LIMIT),
  ])?;
  debug!("querying {backend} via: {url}");

  let response = client.get(url.as_str()).send().await?;
  let status = response.status();
  if !status.is_success() {
    return Err(HeprefError::ApiError(format!("{backend} returned HTTP {status}")));
  }

  let data = response.bytes().await?;
  let records = parse_results(backend, &data)?;
  select_record(backend, query, records)
}

/// Parses a recjson response body into records.
///
/// Invenio answers a query without hits with something that is not a JSON
/// array; that surfaces here as an `ApiError` naming the backend.
pub(crate) fn parse_results(backend: &str, data: &[u8]) -> Result<Vec<Record>, HeprefError> {
  serde_json::from_slice(data)
    .map_err(|e| HeprefError::ApiError(format!("failed to parse {backend} response: {e}")))
}

/// Enforces the one-record contract.
///
/// Zero records is `NotFound`. More than one is not an error: the candidates'
/// titles are logged at warn level and the first record is used, matching the
/// behavior of the backends' own web interfaces.
pub(crate) fn select_record(
  backend: &str,
  query: &str,
  mut records: Vec<Record>,
) -> Result<Record, HeprefError> {
  match records.len() {
    0 => Err(HeprefError::NotFound),
    1 => Ok(records.remove(0)),
    _ => {
      let titles: Vec<String> = records
        .iter()
        .map(|record| {
          record.title().unwrap_or_else(|| {
            format!("unknown {}", record.primary_report_number().unwrap_or_default())
          })
        })
        .collect();
      warn!("query {query:?} to {backend} matched several records: {}", titles.join(" | "));
      Ok(records.remove(0))
    },
  }
}

/// Builds an [`Article`] from an Invenio record.
///
/// The abstract URL prefers the DOI, then an embedded arXiv id, then the
/// backend's own record page. The PDF URL prefers a SCOAP3 open-access file
/// (Inspire only), then the arXiv PDF, then the largest attached PDF.
pub(crate) fn article_from_record(
  source: Source,
  identifier: &str,
  record: &Record,
  record_path: &str,
  allow_scoap3: bool,
) -> Article {
  let arxiv_id = record.arxiv_id();
  let doi = record.doi().map(str::to_owned);

  let abs_url = if let Some(doi) = &doi {
    format!("{DOI_SERVER}/{doi}")
  } else if let Some(id) = &arxiv_id {
    format!("{ARXIV_SERVER}/abs/{id}")
  } else if let Some(recid) = record.recid {
    format!("{record_path}{recid}")
  } else {
    String::new()
  };

  let scoap3 = if allow_scoap3 { record.scoap3_url() } else { None };
  let pdf_url = scoap3
    .or_else(|| arxiv_id.as_ref().map(|id| format!("{ARXIV_SERVER}/pdf/{id}")))
    .or_else(|| record.largest_pdf_url());

  Article {
    source,
    source_identifier: identifier.to_owned(),
    title: record.title().unwrap_or_default(),
    authors: record.authors(),
    collaborations: record.collaborations(),
    abstract_text: record.abstract_text(),
    publication_info: record.publication_info(),
    publication_date: None,
    abs_url,
    pdf_url,
    arxiv_id,
    report_number: record.primary_report_number(),
    doi,
    texkey: record.texkey(),
  }
}
