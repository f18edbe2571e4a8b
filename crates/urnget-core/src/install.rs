//! Atomic installation: move verified bytes onto the destination path.
//!
//! The destination only ever changes through a single rename, so observers
//! never see a partially written file. On any failure the destination is
//! left untouched and the temp file is removed.

use crate::error::FetchError;
use std::fs;
use std::path::Path;

/// Mode applied to installed files (owner read/write, others read).
#[cfg(unix)]
const INSTALL_MODE: u32 = 0o644;

/// Install the verified temp file at `dest`.
///
/// Creates missing parent directories, renames the temp file into place,
/// re-stats the destination against `size` (deleting it on mismatch), and
/// sets the standard install permissions.
pub fn install(temp_path: &Path, size: u64, dest: &Path) -> Result<(), FetchError> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            remove_temp(temp_path);
            return Err(FetchError::local(
                format!("failed to create directory '{}'", parent.display()),
                e,
            ));
        }
    }

    if let Err(e) = fs::rename(temp_path, dest) {
        remove_temp(temp_path);
        return Err(FetchError::local(
            format!(
                "failed to move '{}' to '{}'",
                temp_path.display(),
                dest.display()
            ),
            e,
        ));
    }

    // Guard against concurrent writers or filesystem anomalies between
    // write and rename.
    let actual = match fs::metadata(dest) {
        Ok(meta) => meta.len(),
        Err(e) => {
            return Err(FetchError::local(
                format!("failed to stat '{}' after install", dest.display()),
                e,
            ))
        }
    };
    if actual != size {
        let _ = fs::remove_file(dest);
        return Err(FetchError::local(
            format!(
                "downloaded {size} bytes but '{}' is only {actual}",
                dest.display()
            ),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "size mismatch after rename"),
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(dest, fs::Permissions::from_mode(INSTALL_MODE)) {
            return Err(FetchError::local(
                format!("failed to set permissions on '{}'", dest.display()),
                e,
            ));
        }
    }

    Ok(())
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        tracing::warn!(path = %temp_path.display(), error = %e, "couldn't remove temp file");
    }
}
