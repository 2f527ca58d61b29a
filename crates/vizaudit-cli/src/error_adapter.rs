//! Error adapter for converting AuditError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use vizaudit::AuditError;

/// Adapter rendering an [`AuditError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a AuditError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AuditError::Io(_) => "vizaudit::io",
            AuditError::Auth { .. } => "vizaudit::auth",
            AuditError::NotFound { .. } => "vizaudit::not_found",
            AuditError::Status { .. } => "vizaudit::status",
            AuditError::Http(_) => "vizaudit::http",
            AuditError::Decode { .. } => "vizaudit::decode",
            AuditError::Config(_) => "vizaudit::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            AuditError::Io(_) => {
                "check that the input file exists and the output path is writable"
            }
            AuditError::Auth { .. } => "check the login name and password given with -u and -p",
            AuditError::NotFound { .. } => {
                "check the project identifiers in the input file and the hostname"
            }
            AuditError::Http(_) => "check the hostname and your network connection",
            AuditError::Config(_) => "check the configuration file given with --config",
            AuditError::Status { .. } | AuditError::Decode { .. } => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
