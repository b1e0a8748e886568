// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::path::Path;

use anyhow::{Context, Result};

/// Copies `src` to `dst`, creating `dst`'s parent directories as needed.
///
/// This is the primitive the install step uses to materialize a staged copy
/// of a built artifact; it does not attempt to preserve permissions beyond
/// what [`std::fs::copy`] already does.
pub fn copy_with_parents(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {parent:?}"))?;
    }
    std::fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {src:?} to {dst:?}"))?;
    Ok(())
}
