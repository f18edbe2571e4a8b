//! Verified candidate download.
//!
//! Streams each candidate URL into the temp file while hashing inline, and
//! stops at the first candidate whose digest matches. Candidate failures
//! (unreachable mirror, wrong bytes) are recorded and retried against the
//! next candidate; only local I/O trouble aborts the whole operation.

use crate::digest::{Sha1Digest, Sha1Stream};
use crate::error::FetchError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Per-attempt transfer knobs, sourced from config.
#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub connect_timeout: Duration,
    pub transfer_timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions {
            connect_timeout: Duration::from_secs(15),
            transfer_timeout: Duration::from_secs(300),
        }
    }
}

enum Attempt {
    /// Digest matched; verified bytes are in the temp file.
    Verified(u64),
    /// Candidate failed; message recorded, next candidate is tried.
    Rejected(String),
}

/// Try `candidates` in order until one serves bytes matching `expected`.
///
/// On success the verified bytes are at `temp_path` and the byte count is
/// returned. With an empty candidate list this fails immediately without
/// any network activity; when every candidate fails, the per-candidate
/// messages are aggregated in attempt order.
pub fn download(
    expected: &Sha1Digest,
    candidates: &[String],
    temp_path: &Path,
    opts: &DownloadOptions,
) -> Result<u64, FetchError> {
    if candidates.is_empty() {
        return Err(FetchError::NoMirrors);
    }

    let mut failures = Vec::new();
    for url in candidates {
        match try_candidate(expected, url, temp_path, opts)? {
            Attempt::Verified(size) => {
                tracing::info!(url, size, "verified download");
                return Ok(size);
            }
            Attempt::Rejected(message) => {
                tracing::debug!(url, %message, "candidate rejected");
                failures.push(message);
            }
        }
    }

    Err(FetchError::Exhausted { failures })
}

/// One attempt: one stream, one fresh temp file, one digest accumulator.
/// The temp file is opened at the first received byte, so a candidate
/// that never opens a stream touches nothing locally. Temp file trouble
/// is a local environment problem, not a remote one: fatal immediately,
/// no further candidates. All resources are released before the next
/// attempt starts.
fn try_candidate(
    expected: &Sha1Digest,
    url: &str,
    temp_path: &Path,
    opts: &DownloadOptions,
) -> Result<Attempt, FetchError> {
    let mut file: Option<File> = None;
    let mut stream = Sha1Stream::new();
    let mut local_error: Option<FetchError> = None;

    let transfer = perform_get(url, opts, &mut |chunk| {
        if file.is_none() {
            file = match open_temp(temp_path) {
                Ok(f) => Some(f),
                Err(e) => {
                    local_error = Some(e);
                    return false;
                }
            };
        }
        let Some(f) = file.as_mut() else {
            return false;
        };
        match f.write_all(chunk) {
            Ok(()) => {
                stream.update(chunk);
                true
            }
            Err(e) => {
                local_error = Some(FetchError::local(
                    format!("failed writing '{}'", temp_path.display()),
                    e,
                ));
                false
            }
        }
    });

    if let Some(e) = local_error {
        return Err(e);
    }

    if let Err(e) = transfer {
        tracing::debug!(url, error = %e, "transfer failed");
        return Ok(Attempt::Rejected(format!("{url}: failed to open stream")));
    }

    // An empty body is a normal end-of-stream; materialize the (empty)
    // temp file the installer will rename.
    if file.is_none() {
        open_temp(temp_path)?;
    }

    let size = stream.len();
    let actual = stream.finalize();
    if actual == *expected {
        Ok(Attempt::Verified(size))
    } else {
        Ok(Attempt::Rejected(format!(
            "{url}: expected SHA-1 {}, got {}",
            expected.to_base32(),
            actual.to_base32()
        )))
    }
}

fn open_temp(temp_path: &Path) -> Result<File, FetchError> {
    File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| {
            FetchError::local(
                format!("failed to open '{}' for writing", temp_path.display()),
                e,
            )
        })
}

/// GET `url`, feeding each received chunk to `sink`. A `false` from the
/// sink aborts the transfer. HTTP >= 400 is a transfer error
/// (`fail_on_error`), mirroring "could not open stream" semantics.
fn perform_get(
    url: &str,
    opts: &DownloadOptions,
    sink: &mut dyn FnMut(&[u8]) -> bool,
) -> Result<(), curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.transfer_timeout)?;

    let mut transfer = easy.transfer();
    transfer.write_function(|chunk| {
        if sink(chunk) {
            Ok(chunk.len())
        } else {
            Ok(0) // short write aborts the transfer
        }
    })?;
    transfer.perform()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> Sha1Digest {
        Sha1Digest::extract("f572d396fae9206628714fb2ce00f72e94f2258f").unwrap()
    }

    #[test]
    fn empty_candidate_list_fails_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join(".x.part");
        let err = download(&expected(), &[], &temp, &DownloadOptions::default()).unwrap_err();
        assert!(matches!(err, FetchError::NoMirrors));
        assert!(!temp.exists(), "no temp file should be created");
    }

    #[test]
    fn unreachable_candidates_create_no_temp_file() {
        // The temp file is only opened once a stream delivers bytes, so a
        // run whose mirrors are all unreachable touches nothing locally,
        // even with an unwritable temp path.
        let candidates = vec!["http://127.0.0.1:1/urn:sha1:X".to_string()];
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join(".x.part");
        let err =
            download(&expected(), &candidates, &temp, &DownloadOptions::default()).unwrap_err();
        assert!(matches!(err, FetchError::Exhausted { .. }));
        assert!(!temp.exists());

        let unwritable = Path::new("/nonexistent-dir/urnget.part");
        let err = download(
            &expected(),
            &candidates,
            unwritable,
            &DownloadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Exhausted { .. }));
    }
}
