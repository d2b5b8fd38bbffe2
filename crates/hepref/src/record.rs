//! The Invenio `recjson` record shape and its field normalizers.
//!
//! CDS and Inspire both run on Invenio and answer search queries with a JSON
//! array of records whose fields vary by backend and by schema era: report
//! numbers arrive as a string or as a list, control numbers as an object or a
//! list, file sizes as numbers or strings. [`Record`] models that shape with
//! optional fields and tolerant enums, and its methods implement the
//! normalization rules that turn a record into the uniform field set used by
//! [`crate::article::Article`].
//!
//! The normalizers are pure with respect to their record. Diagnostics about
//! messy data (multiple matching arXiv ids, the PDF-by-size guess) are
//! emitted as `tracing` warnings rather than printed, so every method stays
//! independently testable.
//!
//! # Examples
//!
//! ```
//! use hepref::record::Record;
//!
//! let record: Record = serde_json::from_value(serde_json::json!({
//!   "title": { "title": "Observation  of a new particle" },
//!   "primary_report_number": ["arXiv:1207.7214", "CERN-PH-EP-2012-218"],
//! }))
//! .unwrap();
//!
//! assert_eq!(record.title().as_deref(), Some("Observation of a new particle"));
//! assert_eq!(record.arxiv_id().as_deref(), Some("1207.7214"));
//! ```

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

lazy_static! {
  /// Report-number entries carrying an embedded arXiv id.
  static ref ARXIV_REPORT: Regex = Regex::new(r"^arXiv:(.*)$").unwrap();
  /// Marker for a speaker presenting for a group; authorship stops here.
  static ref ON_BEHALF_OF: Regex = Regex::new(r"(?i)on behalf of").unwrap();
  /// Marker for an author entry that is itself a collaboration credit.
  static ref COLLABORATION: Regex = Regex::new(r"(?i)\bcollaborations?\b").unwrap();
  /// Filler words stripped from corporate names.
  static ref FILLER: Regex = Regex::new(r"(?i)\b(?:the|collaborations?)\b").unwrap();
}

/// A field that Invenio serializes as either a single value or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
  /// The single-value form, used when a record carries one entry.
  One(T),
  /// The list form.
  Many(Vec<T>),
}

impl<T> OneOrMany<T> {
  /// Iterates over the contained entries regardless of form.
  pub fn iter(&self) -> std::slice::Iter<'_, T> {
    match self {
      OneOrMany::One(value) => std::slice::from_ref(value).iter(),
      OneOrMany::Many(values) => values.iter(),
    }
  }
}

/// One raw bibliographic record as returned by an Invenio backend.
///
/// Every field is optional; the normalizer methods below turn whatever is
/// present into the uniform field set. A record is never mutated after it is
/// fetched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
  /// Nested title container.
  pub title:                 Option<Title>,
  /// Nested abstract container.
  #[serde(rename = "abstract")]
  pub summary:               Option<Abstract>,
  /// Per-author name entries.
  pub authors:               Option<OneOrMany<Author>>,
  /// Corporate credits; collaborations are extracted from here.
  pub corporate_name:        Option<Vec<HashMap<String, serde_json::Value>>>,
  /// Journal publication data.
  pub publication_info:      Option<PublicationInfo>,
  /// Report numbers; a string in old records, a list (with nulls) in newer
  /// ones.
  pub primary_report_number: Option<OneOrMany<Option<String>>>,
  /// Control numbers, including the Inspire TeX key.
  pub system_control_number: Option<OneOrMany<ControlNumber>>,
  /// Attached files (fulltext PDFs among them).
  pub files:                 Option<Vec<RecordFile>>,
  /// The backend's internal record id.
  pub recid:                 Option<u64>,
  /// Digital Object Identifier(s).
  pub doi:                   Option<OneOrMany<String>>,
}

/// Nested title field of a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Title {
  /// The title proper.
  pub title: Option<String>,
}

/// Nested abstract field of a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Abstract {
  /// The abstract text.
  pub summary: Option<String>,
}

/// One author entry: a first/last name pair, a free-text full name, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Author {
  /// Given name, when the backend splits names.
  pub first_name: Option<String>,
  /// Family name, when the backend splits names.
  pub last_name:  Option<String>,
  /// Free-text name, usually "Last, First" on Invenio backends.
  pub full_name:  Option<String>,
}

impl Author {
  /// An author known only by a free-text name (the arXiv feed's shape).
  pub fn literal(name: impl Into<String>) -> Self {
    Self { full_name: Some(name.into()), ..Self::default() }
  }

  /// The name as displayed, preferring the first/last pair over the
  /// free-text form.
  pub fn display_name(&self) -> Option<String> {
    match (&self.first_name, &self.last_name) {
      (Some(first), Some(last)) => Some(format!("{first} {last}")),
      _ => match self.full_name.as_deref() {
        Some(name) if !name.is_empty() => Some(name.to_owned()),
        _ => {
          warn!("author entry with no usable name: {self:?}");
          None
        },
      },
    }
  }

  /// The surname with hyphens removed, for compact author lists.
  ///
  /// Invenio free-text names are "Last, First", so the part before the comma
  /// is taken; arXiv feed names are "First Last", so the last word wins,
  /// after dropping a possible "Collaboration" suffix.
  pub fn surname(&self) -> Option<String> {
    if let Some(last) = self.last_name.as_deref() {
      return Some(last.replace('-', ""));
    }
    let full = self.full_name.as_deref().filter(|name| !name.is_empty())?;
    if let Some((last, _)) = full.split_once(", ") {
      return Some(last.replace('-', ""));
    }
    let stripped = squash_whitespace(&FILLER.replace_all(full, ""));
    stripped
      .rsplit(|c| c == ' ' || c == '.')
      .find(|token| !token.is_empty())
      .map(|token| token.replace('-', ""))
  }

  /// The raw text of the entry, used for marker detection.
  fn raw_text(&self) -> String {
    self
      .full_name
      .clone()
      .or_else(|| self.display_name())
      .unwrap_or_default()
  }
}

/// Journal reference data for a published record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationInfo {
  /// Journal or venue name.
  pub title:      Option<String>,
  /// Volume.
  pub volume:     Option<String>,
  /// Year of publication.
  pub year:       Option<String>,
  /// Page or article number range.
  pub pagination: Option<String>,
}

/// A control-number entry, e.g. the Inspire TeX key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlNumber {
  /// The issuing institute, e.g. "INSPIRETeX".
  pub institute: Option<String>,
  /// The assigned value.
  pub value:     Option<String>,
}

/// A file attached to a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFile {
  /// Download URL.
  pub url:         Option<String>,
  /// Full file name, e.g. "scoap3-fulltext.pdf".
  pub full_name:   Option<String>,
  /// File format marker; fulltext PDFs carry ".pdf".
  pub superformat: Option<String>,
  /// File size; a number or a decimal string depending on schema era.
  pub size:        Option<serde_json::Value>,
}

impl RecordFile {
  /// The file size in bytes, zero when absent or unparseable.
  pub fn size_bytes(&self) -> u64 {
    match &self.size {
      Some(value) =>
        value.as_u64().or_else(|| value.as_str().and_then(|s| s.parse().ok())).unwrap_or(0),
      None => 0,
    }
  }
}

impl Record {
  /// The record's title with whitespace normalized.
  pub fn title(&self) -> Option<String> {
    self.title.as_ref()?.title.as_deref().map(squash_whitespace)
  }

  /// The record's abstract text with whitespace normalized.
  pub fn abstract_text(&self) -> Option<String> {
    self.summary.as_ref()?.summary.as_deref().map(squash_whitespace)
  }

  /// The record's first DOI, if any.
  pub fn doi(&self) -> Option<&str> {
    self.doi.as_ref()?.iter().next().map(|doi| doi.as_str())
  }

  /// Collects the per-author name entries.
  ///
  /// Accumulation stops at an entry carrying a "presented on behalf of"
  /// marker (a speaker credited for a group; the entries after it are not
  /// authors). If any entry is itself a collaboration credit, the listing
  /// switches to collaboration-only: just those entries are returned.
  pub fn authors(&self) -> Vec<Author> {
    let Some(authors) = &self.authors else { return Vec::new() };

    let mut individuals = Vec::new();
    let mut collaborations = Vec::new();
    for author in authors.iter() {
      let text = author.raw_text();
      if ON_BEHALF_OF.is_match(&text) {
        break;
      }
      if COLLABORATION.is_match(&text) {
        collaborations.push(author.clone());
      } else {
        individuals.push(author.clone());
      }
    }

    if collaborations.is_empty() {
      individuals
    } else {
      collaborations
    }
  }

  /// Extracts collaboration names from the corporate-name field.
  ///
  /// Entries under a `collaboration` key are taken as-is; entries under a
  /// `name` key have the filler words "the" and "collaboration" stripped.
  /// Duplicates differing only in case collapse to the first occurrence.
  pub fn collaborations(&self) -> Vec<String> {
    let Some(corporate) = &self.corporate_name else { return Vec::new() };

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for entry in corporate {
      for (key, value) in entry {
        let Some(value) = value.as_str() else { continue };
        let name = match key.as_str() {
          "collaboration" => value.trim().to_owned(),
          "name" => squash_whitespace(&FILLER.replace_all(value, "")),
          _ => continue,
        };
        if !name.is_empty() && seen.insert(name.to_lowercase()) {
          names.push(name);
        }
      }
    }
    names
  }

  /// Composes the journal reference line: venue, volume, parenthesized year,
  /// pagination. Absent parts are skipped; `None` when nothing is present.
  pub fn publication_info(&self) -> Option<String> {
    let info = self.publication_info.as_ref()?;

    let mut parts = Vec::new();
    for field in [&info.title, &info.volume] {
      if let Some(value) = field.as_deref().filter(|v| !v.is_empty()) {
        parts.push(value.to_owned());
      }
    }
    if let Some(year) = info.year.as_deref().filter(|y| !y.is_empty()) {
      parts.push(format!("({year})"));
    }
    if let Some(pagination) = info.pagination.as_deref().filter(|p| !p.is_empty()) {
      parts.push(pagination.to_owned());
    }

    if parts.is_empty() {
      None
    } else {
      Some(parts.join(" "))
    }
  }

  /// The arXiv id embedded in the report numbers, "arXiv:" prefix stripped.
  ///
  /// A record occasionally carries more than one; the extras are logged and
  /// the first one wins.
  pub fn arxiv_id(&self) -> Option<String> {
    let numbers = self.primary_report_number.as_ref()?;
    let ids: Vec<String> = numbers
      .iter()
      .flatten()
      .filter_map(|number| ARXIV_REPORT.captures(number))
      .map(|cap| cap[1].to_owned())
      .collect();

    if ids.len() > 1 {
      warn!("multiple arXiv ids among report numbers: {}", ids.join(" & "));
    }
    ids.into_iter().next()
  }

  /// The primary report number: the string form as-is; for the list form the
  /// embedded arXiv id is preferred, then the first entry.
  pub fn primary_report_number(&self) -> Option<String> {
    match self.primary_report_number.as_ref()? {
      OneOrMany::One(number) => number.clone(),
      OneOrMany::Many(numbers) =>
        self.arxiv_id().or_else(|| numbers.iter().flatten().next().cloned()),
    }
  }

  /// The Inspire TeX key from the control numbers, if present.
  pub fn texkey(&self) -> Option<String> {
    let numbers = self.system_control_number.as_ref()?;
    let keys: Vec<&str> = numbers
      .iter()
      .filter(|entry| entry.institute.as_deref() == Some("INSPIRETeX"))
      .filter_map(|entry| entry.value.as_deref())
      .collect();

    if keys.len() > 1 {
      warn!("multiple Inspire TeX keys: {}", keys.join(" & "));
    }
    keys.first().map(|key| (*key).to_owned())
  }

  /// The URL of a SCOAP3 open-access fulltext, if one is attached.
  pub fn scoap3_url(&self) -> Option<String> {
    self
      .files
      .as_ref()?
      .iter()
      .find(|file| file.full_name.as_deref() == Some("scoap3-fulltext.pdf"))
      .and_then(|file| file.url.clone())
  }

  /// The URL of the largest attached PDF.
  ///
  /// When several PDFs are attached there is no marker for which one is the
  /// fulltext, so the largest is picked and the guess is logged.
  pub fn largest_pdf_url(&self) -> Option<String> {
    let files = self.files.as_ref()?;
    let mut pdfs: Vec<&RecordFile> =
      files.iter().filter(|file| file.superformat.as_deref() == Some(".pdf")).collect();
    if pdfs.is_empty() {
      return None;
    }
    if pdfs.len() > 1 {
      warn!("several PDFs attached; picking the fulltext by file size");
    }
    pdfs.sort_by_key(|file| std::cmp::Reverse(file.size_bytes()));
    pdfs.first().and_then(|file| file.url.clone())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use tracing_test::traced_test;

  use super::*;

  fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("record fixture should deserialize")
  }

  #[test]
  fn test_title_and_abstract_whitespace() {
    let record = record(json!({
      "title": { "title": "Search for\n   squarks  and gluinos" },
      "abstract": { "summary": "A search\nis presented." },
    }));
    assert_eq!(record.title().as_deref(), Some("Search for squarks and gluinos"));
    assert_eq!(record.abstract_text().as_deref(), Some("A search is presented."));
  }

  #[test]
  fn test_authors_prefer_name_pairs() {
    let record = record(json!({
      "authors": [
        { "first_name": "Gian", "last_name": "Giudice", "full_name": "Giudice, Gian" },
        { "full_name": "Rattazzi, Riccardo" },
      ],
    }));
    let authors = record.authors();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].display_name().as_deref(), Some("Gian Giudice"));
    assert_eq!(authors[1].display_name().as_deref(), Some("Rattazzi, Riccardo"));
  }

  #[test]
  fn test_authors_single_entry_form() {
    let record = record(json!({
      "authors": { "full_name": "Unruh, W.G." },
    }));
    assert_eq!(record.authors().len(), 1);
  }

  #[test]
  fn test_authors_stop_at_on_behalf_of() {
    let record = record(json!({
      "authors": [
        { "full_name": "Aaboud, M." },
        { "full_name": "presented on behalf of the ATLAS collaboration" },
        { "full_name": "Abbott, B." },
      ],
    }));
    let authors = record.authors();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].display_name().as_deref(), Some("Aaboud, M."));
  }

  #[test]
  fn test_authors_collaboration_marker_switches_listing() {
    let record = record(json!({
      "authors": [
        { "full_name": "ATLAS Collaboration" },
        { "full_name": "Aaboud, M." },
      ],
    }));
    let authors = record.authors();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].full_name.as_deref(), Some("ATLAS Collaboration"));
  }

  #[test]
  fn test_surname_shapes() {
    assert_eq!(Author::literal("Giudice, Gian").surname().as_deref(), Some("Giudice"));
    assert_eq!(Author::literal("Lisa Randall").surname().as_deref(), Some("Randall"));
    assert_eq!(Author::literal("The ATLAS Collaboration").surname().as_deref(), Some("ATLAS"));
    let paired = Author { last_name: Some("Arkani-Hamed".into()), ..Author::default() };
    assert_eq!(paired.surname().as_deref(), Some("ArkaniHamed"));
  }

  #[test]
  fn test_collaborations_dedup_case_insensitively() {
    let record = record(json!({
      "corporate_name": [
        { "collaboration": "ATLAS" },
        { "name": "the ATLAS collaboration" },
        { "collaboration": "atlas" },
        { "name": "CMS Collaboration" },
      ],
    }));
    assert_eq!(record.collaborations(), vec!["ATLAS", "CMS"]);
  }

  #[test]
  fn test_publication_info_full() {
    let record = record(json!({
      "publication_info": {
        "title": "Phys. Rev. D",
        "volume": "98",
        "year": "2018",
        "pagination": "030001",
      },
    }));
    assert_eq!(record.publication_info().as_deref(), Some("Phys. Rev. D 98 (2018) 030001"));
  }

  #[test]
  fn test_publication_info_skips_absent_parts() {
    let record = record(json!({
      "publication_info": { "title": "JHEP", "pagination": "027" },
    }));
    // No year, no volume: no stray parentheses or double spaces.
    assert_eq!(record.publication_info().as_deref(), Some("JHEP 027"));

    let empty = record_fixture_without_publication();
    assert_eq!(empty.publication_info(), None);
  }

  fn record_fixture_without_publication() -> Record {
    record(json!({ "publication_info": { "title": "", "year": "" } }))
  }

  #[test]
  fn test_arxiv_id_from_report_numbers() {
    let record = record(json!({
      "primary_report_number": ["arXiv:1501.12345"],
    }));
    assert_eq!(record.arxiv_id().as_deref(), Some("1501.12345"));
  }

  #[traced_test]
  #[test]
  fn test_arxiv_id_multiple_matches_warn_and_first_wins() {
    let record = record(json!({
      "primary_report_number": ["arXiv:1807.07546", null, "arXiv:1807.09999"],
    }));
    assert_eq!(record.arxiv_id().as_deref(), Some("1807.07546"));
    assert!(logs_contain("multiple arXiv ids"));
  }

  #[test]
  fn test_primary_report_number_string_and_list_shapes() {
    let string_form = record(json!({ "primary_report_number": "CERN-PH-EP-2012-218" }));
    assert_eq!(string_form.primary_report_number().as_deref(), Some("CERN-PH-EP-2012-218"));

    let list_form = record(json!({
      "primary_report_number": ["CERN-PH-EP-2012-218", "arXiv:1207.7214"],
    }));
    // The arXiv id is preferred over earlier plain report numbers.
    assert_eq!(list_form.primary_report_number().as_deref(), Some("1207.7214"));

    let no_arxiv = record(json!({
      "primary_report_number": [null, "ATLAS-CONF-2018-001"],
    }));
    assert_eq!(no_arxiv.primary_report_number().as_deref(), Some("ATLAS-CONF-2018-001"));
  }

  #[test]
  fn test_texkey_extraction() {
    let list_form = record(json!({
      "system_control_number": [
        { "institute": "SPIRESTeX", "value": "old:key" },
        { "institute": "INSPIRETeX", "value": "Giudice:1998bp" },
      ],
    }));
    assert_eq!(list_form.texkey().as_deref(), Some("Giudice:1998bp"));

    let object_form = record(json!({
      "system_control_number": { "institute": "INSPIRETeX", "value": "Aad:2012tfa" },
    }));
    assert_eq!(object_form.texkey().as_deref(), Some("Aad:2012tfa"));
  }

  #[traced_test]
  #[test]
  fn test_largest_pdf_by_size() {
    let record = record(json!({
      "files": [
        { "url": "https://cds.cern.ch/f/preview.pdf", "superformat": ".pdf", "size": 1024 },
        { "url": "https://cds.cern.ch/f/fulltext.pdf", "superformat": ".pdf", "size": "2048000" },
        { "url": "https://cds.cern.ch/f/figures.png", "superformat": ".png", "size": 9999999 },
      ],
    }));
    assert_eq!(record.largest_pdf_url().as_deref(), Some("https://cds.cern.ch/f/fulltext.pdf"));
    assert!(logs_contain("picking the fulltext by file size"));
  }

  #[test]
  fn test_scoap3_precedence_source_file() {
    let record = record(json!({
      "files": [
        { "url": "https://repo.scoap3.org/x.pdf", "full_name": "scoap3-fulltext.pdf" },
      ],
    }));
    assert_eq!(record.scoap3_url().as_deref(), Some("https://repo.scoap3.org/x.pdf"));
  }

  #[test]
  fn test_doi_string_and_list() {
    let one = record(json!({ "doi": "10.1103/PhysRevD.98.030001" }));
    assert_eq!(one.doi(), Some("10.1103/PhysRevD.98.030001"));
    let many = record(json!({ "doi": ["10.1/a", "10.2/b"] }));
    assert_eq!(many.doi(), Some("10.1/a"));
  }
}
