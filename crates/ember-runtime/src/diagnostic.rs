//! Diagnostic system for front-end errors
//!
//! Scanner and parser problems are reported as `Diagnostic` values. The
//! `message` field always carries the plain diagnostic text; everything else
//! (code, location, snippet) is presentation.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Prevents the input from being evaluated
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A front-end error with its source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g., "EM2001")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Source range the diagnostic points at
    pub span: Span,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Length of error span
    pub length: usize,
    /// Source line string
    pub snippet: String,
    /// Short label for caret range
    pub label: String,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            span,
            line: 1,
            column: span.start + 1,
            length: span.len(),
            snippet: String::new(),
            label: String::new(),
            help: None,
        }
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label (caret description)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Resolve line, column and snippet from the span against `source`
    ///
    /// The parser only knows character offsets; callers that still hold the
    /// source text use this to fill in a human-friendly location.
    pub fn with_source(mut self, source: &str) -> Self {
        let mut line = 1;
        let mut line_start = 0;
        for (offset, c) in source.chars().enumerate() {
            if offset >= self.span.start {
                break;
            }
            if c == '\n' {
                line += 1;
                line_start = offset + 1;
            }
        }

        self.line = line;
        self.column = self.span.start - line_start + 1;
        self.snippet = source.lines().nth(line - 1).unwrap_or("").to_string();
        self
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[EM2001]: Expected next token to be RPAREN, got EOF
        output.push_str(&format!(
            "{}[{}]: {}\n",
            self.level, self.code, self.message
        ));
        output.push_str(&format!("  --> {}:{}\n", self.line, self.column));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));

            let padding = " ".repeat(self.column.saturating_sub(1));
            let carets = "^".repeat(self.length.max(1));
            output.push_str(&format!("   | {}{}", padding, carets));
            if !self.label.is_empty() {
                output.push_str(&format!(" {}", self.label));
            }
            output.push('\n');
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Error code registry
pub mod error_codes {
    // EM1xxx - Lexical errors
    pub const UNTERMINATED_STRING: &str = "EM1001";

    // EM2xxx - Syntax errors
    pub const UNEXPECTED_TOKEN: &str = "EM2001";
    pub const NO_PREFIX_PARSE: &str = "EM2002";
    pub const INVALID_INTEGER: &str = "EM2003";
}
