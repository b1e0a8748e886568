// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The environment-variable surface from spec §6, plus the `$VAR`
//! substitution the suffix map's directory templates use.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// A small variable-substitution environment, standing in for the
/// orchestrator's construction environment (`env.subst(...)` in the
/// original tool).
#[derive(Debug, Clone)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    /// Builds the default environment from `std::env`, applying the
    /// documented defaults for anything unset.
    pub fn from_process_env() -> Self {
        let mut vars = BTreeMap::new();
        let get = |name: &str, default: &str| env::var(name).unwrap_or_else(|_| default.to_owned());

        let install_dir = get("INSTALL_DIR", "/usr/local");
        vars.insert("INSTALL_DIR".to_owned(), install_dir.clone());
        // Archive-root ancestor (spec §6); staged files land under
        // `DEST_DIR` + the classified install directory, the way `make
        // install DESTDIR=...` stages a real prefix under a sandbox root.
        // Default "/" means the staged tree and the real prefix coincide.
        vars.insert("DEST_DIR".to_owned(), get("DEST_DIR", "/"));
        vars.insert(
            "AIB_PACKAGE_PREFIX".to_owned(),
            get("AIB_PACKAGE_PREFIX", ""),
        );
        vars.insert(
            "PREFIX_BIN_DIR".to_owned(),
            get("PREFIX_BIN_DIR", "$INSTALL_DIR/bin"),
        );
        vars.insert(
            "PREFIX_LIB_DIR".to_owned(),
            get("PREFIX_LIB_DIR", "$INSTALL_DIR/lib"),
        );
        vars.insert(
            "PREFIX_INCLUDE_DIR".to_owned(),
            get("PREFIX_INCLUDE_DIR", "$INSTALL_DIR/include"),
        );
        vars.insert(
            "PREFIX_DOC_DIR".to_owned(),
            get("PREFIX_DOC_DIR", "$INSTALL_DIR/share/doc"),
        );
        vars.insert(
            "PREFIX_SHARE_DIR".to_owned(),
            get("PREFIX_SHARE_DIR", "$INSTALL_DIR/share"),
        );
        vars.insert(
            "PREFIX_DEBUG_DIR".to_owned(),
            get("PREFIX_DEBUG_DIR", "$PREFIX_LIB_DIR/.debug"),
        );

        let mut env = Self { vars };
        env.resolve_all();
        env
    }

    /// Builds an environment from an explicit map, useful for tests that
    /// don't want to depend on process-wide environment variables.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        let mut env = Self { vars };
        env.resolve_all();
        env
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_owned(), value.into());
        self.resolve_all();
    }

    /// Substitutes every `$NAME` token in `template` with the variable's
    /// current value. Unknown variables are left untouched, matching a
    /// permissive `env.subst`.
    pub fn subst(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let rest = &template[i + 1..];
            let name_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if name_len == 0 {
                out.push('$');
                continue;
            }
            let name = &rest[..name_len];
            match self.vars.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            for _ in 0..name_len {
                chars.next();
            }
        }
        out
    }

    /// The configured `DEST_DIR`, defaulting to `/` when unset.
    pub fn dest_dir(&self) -> &str {
        self.get("DEST_DIR").unwrap_or("/")
    }

    /// Resolves `directory` (an absolute classified install directory, e.g.
    /// `$PREFIX_BIN_DIR`'s expansion) to its actual staged path by nesting
    /// it under `DEST_DIR`, matching how the Packager later recovers paths
    /// relative to that same root.
    pub fn stage_path(&self, directory: &str) -> PathBuf {
        Path::new(self.dest_dir()).join(directory.trim_start_matches('/'))
    }

    /// Repeatedly substitutes every stored variable against the full map
    /// until a fixpoint, so templates like `PREFIX_DEBUG_DIR = "$PREFIX_LIB_DIR/.debug"`
    /// resolve to a fully expanded path.
    fn resolve_all(&mut self) {
        for _ in 0..8 {
            let mut changed = false;
            let names: Vec<String> = self.vars.keys().cloned().collect();
            for name in names {
                let value = self.vars[&name].clone();
                let resolved = self.subst(&value);
                if resolved != value {
                    self.vars.insert(name, resolved);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }
}
