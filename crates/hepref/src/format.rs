//! Text formatting utilities for titles and download filenames.
//!
//! This module provides the small string transformations shared by the
//! normalizer and the presenter: collapsing the multi-line whitespace that
//! backends embed in titles and abstracts, and stripping characters that are
//! illegal in filenames from generated PDF names.
//!
//! # Examples
//!
//! ```
//! use hepref::format;
//!
//! assert_eq!(format::squash_whitespace("Search for\n  new physics"), "Search for new physics");
//! assert_eq!(format::sanitize_filename("hep-ph/9905221-Giudice.pdf"), "hep-ph9905221-Giudice.pdf");
//! ```

/// Characters that are not portable in filenames on at least one platform.
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Collapses all runs of whitespace (including newlines) into single spaces
/// and trims the ends.
///
/// Backend payloads wrap long titles over several lines with leading
/// indentation; this restores them to a single display line.
pub fn squash_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Removes every character of `\ / * ? : " < > |` from a filename candidate.
///
/// Old-style arXiv identifiers (`hep-ph/9905221`) and DOIs both contain `/`,
/// so any filename derived from an identifier must pass through here.
pub fn sanitize_filename(name: &str) -> String {
  name.chars().filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_squash_whitespace() {
    assert_eq!(squash_whitespace("hello  world"), "hello world");
    assert_eq!(squash_whitespace("  leading\tand trailing\n"), "leading and trailing");
    assert_eq!(squash_whitespace("Search for\n    dark matter"), "Search for dark matter");
    assert_eq!(squash_whitespace(""), "");
  }

  #[test]
  fn test_sanitize_filename_strips_all_illegal_characters() {
    assert_eq!(sanitize_filename(r#"a\b/c*d?e:f"g<h>i|j"#), "abcdefghij");
  }

  #[test]
  fn test_sanitize_filename_keeps_ordinary_names() {
    assert_eq!(sanitize_filename("1807.07546-Fuks-Iwamoto.pdf"), "1807.07546-Fuks-Iwamoto.pdf");
    assert_eq!(sanitize_filename("hep-ph/9905221-Giudice.pdf"), "hep-ph9905221-Giudice.pdf");
  }
}
