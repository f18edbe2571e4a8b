//! Fetch error taxonomy.
//!
//! Per-candidate conditions (unreachable mirror, digest mismatch) are
//! recorded as strings inside the download loop and only ever surface as
//! part of the aggregate `Exhausted` variant. Everything here is fatal to
//! the operation that returns it.

use std::io;
use thiserror::Error;

/// Error returned by digest extraction and the checkout pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No digest could be extracted from the given string. Caller error;
    /// never retried.
    #[error("unable to extract SHA-1 from '{input}'")]
    MalformedUrn { input: String },

    /// The candidate list was empty; no network activity was attempted.
    #[error("no remote repositories were given")]
    NoMirrors,

    /// Every candidate failed. Carries one message per candidate, in
    /// attempt order, surfaced verbatim for diagnosis.
    #[error("{}", failures.join("\n"))]
    Exhausted { failures: Vec<String> },

    /// Local environment defect (temp file, directory creation, rename,
    /// permissions). Never retried against further candidates.
    #[error("{context}: {source}")]
    Local {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Wrap a local I/O failure with a human-readable context line.
    pub fn local(context: impl Into<String>, source: io::Error) -> Self {
        FetchError::Local {
            context: context.into(),
            source,
        }
    }

    /// True for failures of the local environment rather than of the
    /// remote mirrors or the caller's input.
    pub fn is_local(&self) -> bool {
        matches!(self, FetchError::Local { .. })
    }

    /// Process exit code for CLI callers: 1 = mirrors exhausted or none
    /// configured, 2 = malformed URN, 3 = local I/O failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            FetchError::NoMirrors | FetchError::Exhausted { .. } => 1,
            FetchError::MalformedUrn { .. } => 2,
            FetchError::Local { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_joins_messages_in_order() {
        let err = FetchError::Exhausted {
            failures: vec![
                "http://a/x: failed to open stream".to_string(),
                "http://b/x: expected SHA-1 A, got B".to_string(),
            ],
        };
        let text = err.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("http://a/x"));
        assert!(lines[1].starts_with("http://b/x"));
    }

    #[test]
    fn no_mirrors_message() {
        assert_eq!(
            FetchError::NoMirrors.to_string(),
            "no remote repositories were given"
        );
    }

    #[test]
    fn exit_codes_distinguish_failure_classes() {
        assert_eq!(FetchError::NoMirrors.exit_code(), 1);
        assert_eq!(
            FetchError::Exhausted { failures: vec![] }.exit_code(),
            1
        );
        assert_eq!(
            FetchError::MalformedUrn {
                input: "x".to_string()
            }
            .exit_code(),
            2
        );
        let local = FetchError::local(
            "open temp",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(local.exit_code(), 3);
        assert!(local.is_local());
        assert!(!FetchError::NoMirrors.is_local());
    }
}
