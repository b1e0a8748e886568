// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Suffix Classifier (spec §4.2): resolves a source artifact's filename
//! suffix to an install directory template and a set of default roles.
//!
//! The debug/`.dSYM` entries don't carry their own static directory:
//! they defer to whatever directory the node's `debug_origin` classifies
//! to, so debug symbols land next to the binary they were split from.

use std::collections::BTreeMap;

use crate::config::Env;
use crate::error::AibError;
use crate::role::{parse_roles, Role};

/// A single suffix→directory/roles entry.
#[derive(Debug, Clone)]
pub struct SuffixEntry {
    pub directory: String,
    pub default_roles: Vec<Role>,
    /// True for suffixes (`.debug`, `.dSYM`) whose directory is computed by
    /// re-classifying the node's `debug_origin` instead of using
    /// `directory` directly. `directory` is then only a fallback for when
    /// no origin is known.
    pub defer_to_debug_origin: bool,
}

impl SuffixEntry {
    fn new(directory: &str, default_roles: &[Role]) -> Self {
        Self {
            directory: directory.to_owned(),
            default_roles: default_roles.to_vec(),
            defer_to_debug_origin: false,
        }
    }
}

/// The engine's mutable suffix table, keyed by filename suffix (including
/// the leading dot, or a bare marker like `"THIRD-PARTY-NOTICES"`).
#[derive(Debug, Clone)]
pub struct SuffixMap {
    entries: BTreeMap<String, SuffixEntry>,
}

impl SuffixMap {
    /// The suffix table the engine ships with, covering the common
    /// executable, library, debug-info and documentation artifact kinds.
    /// Directory templates are `$VAR`-style and resolved against an [`Env`]
    /// at lookup time, so callers may override `INSTALL_DIR` etc. without
    /// rebuilding the map.
    pub fn with_defaults() -> Self {
        let mut map = Self {
            entries: BTreeMap::new(),
        };
        map.insert("", SuffixEntry::new("$PREFIX_BIN_DIR", &[Role::Runtime])); // PROGSUFFIX
        map.insert(".a", SuffixEntry::new("$PREFIX_LIB_DIR", &[Role::Dev])); // LIBSUFFIX
        map.insert(".dll", SuffixEntry::new("$PREFIX_BIN_DIR", &[Role::Runtime]));
        map.insert(
            ".dylib",
            SuffixEntry::new("$PREFIX_LIB_DIR", &[Role::Runtime, Role::Dev]),
        );
        map.insert(
            ".so",
            SuffixEntry::new("$PREFIX_LIB_DIR", &[Role::Runtime, Role::Dev]),
        );
        map.insert(".lib", SuffixEntry::new("$PREFIX_LIB_DIR", &[Role::Runtime]));
        map.insert(
            ".txt",
            SuffixEntry::new("$INSTALL_DIR", &[Role::Runtime, Role::Dev]),
        );
        map.insert(".h", SuffixEntry::new("$PREFIX_INCLUDE_DIR", &[Role::Dev]));
        map.insert(
            ".in",
            SuffixEntry::new("$PREFIX_LIB_DIR", &[Role::Runtime, Role::Dev]),
        );
        map.insert(
            "THIRD-PARTY-NOTICES",
            SuffixEntry::new("$PREFIX_DOC_DIR", &[Role::Runtime, Role::Dev]),
        );

        let mut debug = SuffixEntry::new("$PREFIX_DEBUG_DIR", &[Role::Debug]);
        debug.defer_to_debug_origin = true;
        map.entries.insert(".debug".to_owned(), debug.clone());
        map.entries.insert(".dSYM".to_owned(), debug);

        map
    }

    fn insert(&mut self, suffix: &str, entry: SuffixEntry) {
        self.entries.insert(suffix.to_owned(), entry);
    }

    /// `AddSuffixMapping`: registers or overwrites the entry for `suffix`.
    /// `default_roles` is parsed against the closed role set, matching the
    /// declaration-phase contract ("fatal and immediate").
    pub fn add_suffix_mapping<'a>(
        &mut self,
        suffix: &str,
        directory: &str,
        default_roles: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), AibError> {
        if suffix.is_empty() && directory.is_empty() {
            return Err(AibError::InvalidArgument(
                "suffix mapping requires a non-empty suffix or directory".to_owned(),
            ));
        }
        let roles: Vec<Role> = parse_roles(default_roles)?.into_iter().collect();
        self.insert(suffix, SuffixEntry::new(directory, &roles));
        Ok(())
    }

    /// Looks up the suffix of `filename`, matching the longest registered
    /// suffix first. Only falls back to the no-suffix (PROGSUFFIX) entry
    /// when `filename` itself carries no `.`-suffix at all, mirroring the
    /// original's `if not suffix: suffix = entry.name` guard — an
    /// unrecognized suffix (e.g. `README.rst`) yields `None` rather than
    /// silently matching the bare-program entry.
    pub fn lookup(&self, filename: &str) -> Option<&SuffixEntry> {
        if let Some(entry) = self.entries.get(filename) {
            return Some(entry);
        }
        if let Some((_, entry)) = self
            .entries
            .iter()
            .filter(|(suffix, _)| !suffix.is_empty() && filename.ends_with(suffix.as_str()))
            .max_by_key(|(suffix, _)| suffix.len())
        {
            return Some(entry);
        }
        if !filename.contains('.') {
            return self.entries.get("");
        }
        None
    }

    /// Classifies `filename`, returning its resolved install directory and
    /// default roles. `debug_origin`, if given, is the filename of the
    /// binary this node's debug info was split from; suffixes marked
    /// [`SuffixEntry::defer_to_debug_origin`] re-classify that name and
    /// inherit its directory instead of their own.
    pub fn classify(
        &self,
        filename: &str,
        debug_origin: Option<&str>,
        env: &Env,
    ) -> Option<(String, Vec<Role>)> {
        let entry = self.lookup(filename)?;
        if entry.defer_to_debug_origin {
            if let Some(origin) = debug_origin {
                if let Some(origin_entry) = self.lookup(origin) {
                    return Some((env.subst(&origin_entry.directory), entry.default_roles.clone()));
                }
            }
        }
        Some((env.subst(&entry.directory), entry.default_roles.clone()))
    }
}

impl Default for SuffixMap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_shared_library_to_lib_dir() {
        let map = SuffixMap::with_defaults();
        let env = Env::from_process_env();
        let (directory, roles) = map.classify("libfoo.so", None, &env).unwrap();
        assert_eq!(directory, env.subst("$PREFIX_LIB_DIR"));
        assert_eq!(roles, vec![Role::Runtime, Role::Dev]);
    }

    #[test]
    fn suffixless_filename_falls_back_to_program_entry() {
        let map = SuffixMap::with_defaults();
        let env = Env::from_process_env();
        let (_, roles) = map.classify("server", None, &env).unwrap();
        assert_eq!(roles, vec![Role::Runtime]);
    }

    #[test]
    fn unrecognized_dotted_suffix_classifies_to_none() {
        let map = SuffixMap::with_defaults();
        let env = Env::from_process_env();
        assert!(map.classify("README.rst", None, &env).is_none());
    }

    #[test]
    fn add_suffix_mapping_rejects_unknown_role() {
        let mut map = SuffixMap::with_defaults();
        let err = map
            .add_suffix_mapping(".weird", "", ["bogus"])
            .unwrap_err();
        assert_eq!(err, AibError::InvalidRole("bogus".to_owned()));
    }

    #[test]
    fn add_suffix_mapping_overrides_existing_entry() {
        let mut map = SuffixMap::with_defaults();
        map.add_suffix_mapping(".h", "$PREFIX_INCLUDE_DIR/custom", ["dev"])
            .unwrap();
        let entry = map.lookup("foo.h").unwrap();
        assert_eq!(entry.directory, "$PREFIX_INCLUDE_DIR/custom");
    }

    #[test]
    fn debug_info_inherits_origin_directory() {
        let map = SuffixMap::with_defaults();
        let env = Env::from_process_env();
        // `foo` has no suffix, so it classifies via the PROGSUFFIX entry
        // ($PREFIX_BIN_DIR). Its `.debug` split should land in the same
        // place, not under $PREFIX_DEBUG_DIR.
        let (directory, roles) = map.classify("foo.debug", Some("foo"), &env).unwrap();
        assert_eq!(directory, env.subst("$PREFIX_BIN_DIR"));
        assert_eq!(roles, vec![Role::Debug]);
    }

    #[test]
    fn debug_info_falls_back_without_origin() {
        let map = SuffixMap::with_defaults();
        let env = Env::from_process_env();
        let (directory, _) = map.classify("foo.debug", None, &env).unwrap();
        assert_eq!(directory, env.subst("$PREFIX_DEBUG_DIR"));
    }
}
