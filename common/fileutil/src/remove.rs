// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fs::{set_permissions, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::Result;

/// Recursively removes a directory, restoring write permission on any entry
/// that would otherwise make [`std::fs::remove_dir_all`] fail with EACCES.
///
/// Staged install trees sometimes contain directories with restrictive modes
/// inherited from the original artifact; plain `remove_dir_all` gives up on
/// those.
pub fn remove_dir_all_with_chmod(path: &Path) -> Result<()> {
    if path.symlink_metadata()?.is_dir() {
        // Restore read/write/execute before recursing, in case the directory
        // was staged with a restrictive mode.
        set_permissions(path, Permissions::from_mode(0o700))?;
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            remove_dir_all_with_chmod(&entry.path())?;
        }
        std::fs::remove_dir(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
