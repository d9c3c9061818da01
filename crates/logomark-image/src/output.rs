// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Atomic output — bytes go to a temporary file beside the target, which is
// renamed over the target only once fully written.

use std::io::Write;
use std::path::Path;

use logomark_core::error::{LogomarkError, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `bytes` to `path`, replacing any existing file in one rename.
///
/// The temporary file lives in the target's directory so the rename never
/// crosses filesystems. If any step fails the temporary file is removed and
/// `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| {
        LogomarkError::Encode(format!(
            "failed to create temporary file in {}: {}",
            dir.display(),
            err
        ))
    })?;
    debug!(tmp = %tmp.path().display(), "Writing to temporary file");

    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|err| {
            LogomarkError::Encode(format!("failed to write {}: {}", path.display(), err))
        })?;
    set_mode(&tmp, path)?;

    tmp.persist(path).map_err(|err| {
        LogomarkError::Encode(format!(
            "failed to move output into place at {}: {}",
            path.display(),
            err.error
        ))
    })?;
    Ok(())
}

/// Temporary files are created owner-only. A replaced file keeps its own
/// mode; a new icon gets `0644` so a web server can read it.
#[cfg(unix)]
fn set_mode(tmp: &NamedTempFile, target: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(target)
        .map(|meta| meta.permissions().mode() & 0o7777)
        .unwrap_or(NEW_FILE_MODE);
    debug!(mode = %format!("{mode:o}"), "Setting output mode");

    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(mode))
        .map_err(|err| LogomarkError::Encode(format!("failed to set permissions: {}", err)))
}

#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

#[cfg(not(unix))]
fn set_mode(_tmp: &NamedTempFile, _target: &Path) -> Result<()> {
    Ok(())
}
