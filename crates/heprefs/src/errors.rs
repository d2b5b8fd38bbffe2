//! Error types for the heprefs CLI.
//!
//! This module provides a single wrapper error for everything the CLI can
//! fail on: lookups through the hepref library, user-interaction prompts,
//! and file system operations. The variants are transparent so the
//! underlying messages reach the user unchanged.

use thiserror::Error;

/// Errors that can occur during CLI operations.
#[derive(Error, Debug)]
pub enum HeprefsErrors {
  /// Errors from user interaction dialogs
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors from the underlying hepref library
  #[error(transparent)]
  Hepref(#[from] hepref::errors::HeprefError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),
}
