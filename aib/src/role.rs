// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The closed role set and the fixed role-dependency lattice (spec §3).

use std::collections::BTreeSet;
use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

use crate::error::AibError;

/// An audience-oriented tag selecting which files of a component ship to a
/// given consumer. Variants are declared in alphabetical order so that the
/// derived `Ord` gives the deterministic sort the engine relies on when
/// iterating the alias map (spec §4.5, "Determinism").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Base,
    Common,
    Debug,
    Dev,
    Meta,
    Runtime,
}

impl Role {
    /// Parses a role name, reporting the closed-set violation the way the
    /// declaration phase is specified to (spec §7, `InvalidRole`).
    pub fn parse(name: &str) -> Result<Role, AibError> {
        Role::from_str(name).map_err(|_| AibError::InvalidRole(name.to_owned()))
    }

    /// The role-dependency lattice: the roles `self` transitively depends on.
    ///
    /// `common ← runtime ← debug`; `common, runtime ← dev`;
    /// `common, runtime, debug, dev ← meta`. `base` has no dependents and
    /// depends on nothing; it is handled separately as the always-transitive
    /// escape hatch (spec §4.6).
    pub fn lattice_dependencies(self) -> &'static [Role] {
        match self {
            Role::Debug => &[Role::Runtime],
            Role::Dev => &[Role::Runtime, Role::Common],
            Role::Meta => &[Role::Dev, Role::Runtime, Role::Common, Role::Debug],
            Role::Runtime => &[Role::Common],
            Role::Common => &[],
            Role::Base => &[],
        }
    }
}

/// Role tags used whenever a source string set needs conversion, e.g. when
/// parsing `ADDITIONAL_ROLES`-style inputs.
pub fn parse_roles<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<BTreeSet<Role>, AibError> {
    names.into_iter().map(Role::parse).collect()
}
