//! Orchestrator: URN to shuffled candidates to verified download to
//! atomic install.

use crate::digest::Sha1Digest;
use crate::download::{self, DownloadOptions};
use crate::error::FetchError;
use crate::install;
use crate::mirrors::MirrorSet;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves content URNs into verified local files via a mirror set.
///
/// A local content cache is a deliberate extension point in front of
/// `checkout`: check a content-addressed store keyed by digest before any
/// network candidate, and populate it after a successful install. Cache
/// hits must still be digest-verified so store corruption never
/// propagates silently.
#[derive(Debug, Clone)]
pub struct Fetcher {
    mirrors: MirrorSet,
    options: DownloadOptions,
}

impl Fetcher {
    pub fn new(mirrors: MirrorSet) -> Self {
        Fetcher {
            mirrors,
            options: DownloadOptions::default(),
        }
    }

    pub fn with_options(mirrors: MirrorSet, options: DownloadOptions) -> Self {
        Fetcher { mirrors, options }
    }

    pub fn mirrors(&self) -> &MirrorSet {
        &self.mirrors
    }

    /// Fetch the content named by `urn` and install it at `dest`.
    ///
    /// The temp file is colocated with `dest`'s directory so the final
    /// rename stays on one filesystem and is therefore atomic. On any
    /// download failure the temp file is deleted and the error propagates
    /// unchanged; `dest` is never modified on failure.
    pub fn checkout(&self, urn: &str, dest: &Path) -> Result<(), FetchError> {
        let expected = Sha1Digest::extract(urn)?;
        let candidates = self.mirrors.candidates(urn);

        // The destination directory must exist before the temp file can
        // be created next to it.
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                FetchError::local(
                    format!("failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let temp_path = temp_path_for(dest);
        let size = match download::download(&expected, &candidates, &temp_path, &self.options) {
            Ok(size) => size,
            Err(err) => {
                if temp_path.exists() {
                    let _ = fs::remove_file(&temp_path);
                }
                return Err(err);
            }
        };
        tracing::debug!(urn, size, dest = %dest.display(), "download verified, installing");
        install::install(&temp_path, size, dest)
    }
}

/// Fresh temp name in the destination's directory, e.g.
/// `.file.bin.3f2a91cc.part` next to `file.bin`.
fn temp_path_for(dest: &Path) -> PathBuf {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "checkout".to_string());
    let nonce: u32 = rand::rng().random();
    dir.join(format!(".{name}.{nonce:08x}.part"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_colocated_and_hidden() {
        let temp = temp_path_for(Path::new("/data/out/file.bin"));
        assert_eq!(temp.parent().unwrap(), Path::new("/data/out"));
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".file.bin."));
        assert!(name.ends_with(".part"));
    }

    #[test]
    fn temp_path_for_bare_filename_stays_in_cwd() {
        let temp = temp_path_for(Path::new("file.bin"));
        assert_eq!(temp.parent().unwrap(), Path::new("."));
    }

    #[test]
    fn temp_names_are_unlikely_to_collide() {
        let a = temp_path_for(Path::new("/x/f"));
        let b = temp_path_for(Path::new("/x/f"));
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_urn_fails_before_any_io() {
        let fetcher = Fetcher::new(MirrorSet::new());
        let err = fetcher
            .checkout("not-a-urn", Path::new("/nonexistent/never-created"))
            .unwrap_err();
        assert!(matches!(err, FetchError::MalformedUrn { .. }));
    }
}
