// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity tells the caller whether running again could help.

use crate::error::LogomarkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running again later may succeed (busy disk, transient I/O).
    Transient,
    /// User must do something (fix a path, create a directory, grant access).
    ActionRequired,
    /// Cannot be fixed by retrying: wrong format, corrupt file.
    Permanent,
}

impl Severity {
    /// Short tag printed ahead of the message.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Transient => "temporary problem",
            Severity::ActionRequired => "action needed",
            Severity::Permanent => "cannot be processed",
        }
    }
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (first line of output).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-running unchanged could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `LogomarkError` into a `HumanError`.
pub fn humanize_error(err: &LogomarkError) -> HumanError {
    match err {
        LogomarkError::Decode(detail) => humanize_decode_error(detail),

        LogomarkError::Encode(detail) => humanize_encode_error(detail),

        LogomarkError::InvalidConfig(detail) => HumanError {
            message: "The processing settings are not valid.".into(),
            suggestion: format!("Use a caption keep ratio between 0 and 1. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        LogomarkError::Serialization(_) => HumanError {
            message: "The processing report couldn't be produced.".into(),
            suggestion: "The icon itself was written. Run again without --json to see the summary.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Classify loader failures by the underlying cause in `detail`.
fn humanize_decode_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("no such file") || lower.contains("not found") {
        HumanError {
            message: "The logo image couldn't be found.".into(),
            suggestion: "Check the input path. It may have been moved or misspelled.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("permission denied") {
        HumanError {
            message: "The logo image couldn't be opened.".into(),
            suggestion: "Check that you are allowed to read the input file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("unsupported") || lower.contains("format") {
        HumanError {
            message: "This type of image isn't supported.".into(),
            suggestion: "Save the logo as a PNG or JPEG and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else {
        HumanError {
            message: "There's a problem with the logo image.".into(),
            suggestion: "The file may be damaged. Try opening it in an image viewer, or export it again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    }
}

/// Classify writer failures by the underlying cause in `detail`.
fn humanize_encode_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("no such file") || lower.contains("not found") {
        HumanError {
            message: "The output folder doesn't exist.".into(),
            suggestion: "Create the folder first, or choose a different output path.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("permission denied") || lower.contains("read-only") {
        HumanError {
            message: "The icon couldn't be saved there.".into(),
            suggestion: "Check that you can write to the output folder, or choose another one.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("no space") || lower.contains("disk full") {
        HumanError {
            message: "The disk is full.".into(),
            suggestion: "Free up some space and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "The icon couldn't be written.".into(),
            suggestion: "Try again. If this keeps happening, choose a different output path.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}
