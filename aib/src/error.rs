// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The closed set of declaration- and execution-phase error kinds.
//!
//! Callers that need to distinguish the failure modes named in the tagging
//! contract match on [`AibError`]; everything else composes into
//! `anyhow::Error` via `?`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AibError {
    /// A role outside the closed set {base, common, debug, dev, meta, runtime}
    /// was referenced, either in a suffix mapping or a role tag.
    #[error("invalid role {0:?}: not in the closed role set")]
    InvalidRole(String),

    /// A component tag was empty, non-string, or contained whitespace.
    #[error("invalid component tag {0:?}: must be non-empty and contain no whitespace")]
    InvalidComponent(String),

    /// `AddSuffixMapping` was called with a source that is neither a plain
    /// suffix string nor a mapping of suffix to `SuffixMap`.
    #[error("invalid argument to AddSuffixMapping: {0}")]
    InvalidArgument(String),

    /// The packager's archive subprocess exited with a non-zero status.
    #[error("packaging {target} failed: {detail}")]
    PackageFailure { target: String, detail: String },
}
