// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Packager (spec §4.7): materializes a `(component, role)` pair's
//! installed files into a gzip-compressed tar archive.
//!
//! Unlike the Transitive Scanner, which only walks structural dependency
//! edges, the Packager first resolves which install actions an alias
//! actually aggregates (following `Depends` edges down through the alias
//! graph the Alias Wiring stage built), then repeatedly invokes the
//! Transitive Scanner over that seed set with [`ComponentAwareBoundary`],
//! so a runtime package pulls in its linked libraries' own install
//! actions without also pulling in an unrelated component's.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::Env;
use crate::error::AibError;
use crate::graph::{Graph, NodeId, NodeKind};
use crate::installer::AliasMap;
use crate::role::Role;
use crate::scanner::{self, ComponentAwareBoundary};

/// `(component, role) → basename` overrides registered via
/// `AddPackageNameAlias`, consulted when an archive's default
/// `<component>-<role>` basename isn't the one a caller wants published.
pub type PackageNameMap = BTreeMap<(String, Role), String>;

/// `AddPackageNameAlias(component, role, name)`: overrides the archive
/// basename for one `(component, role)` slice.
pub fn add_package_name_alias(names: &mut PackageNameMap, component: &str, role: Role, name: &str) {
    names.insert((component.to_owned(), role), name.to_owned());
}

fn default_basename(component: &str, role: Role) -> String {
    format!("{component}-{role}")
}

fn package_basename(names: &PackageNameMap, component: &str, role: Role) -> String {
    names
        .get(&(component.to_owned(), role))
        .cloned()
        .unwrap_or_else(|| default_basename(component, role))
}

/// Walks `alias`'s `Depends` edges (its `sources`) down through any nested
/// aliases, collecting every `InstallAction` leaf reachable — the set of
/// files that alias actually aggregates.
fn collect_install_actions(graph: &Graph, alias: NodeId) -> BTreeSet<NodeId> {
    let mut actions = BTreeSet::new();
    let mut stack = vec![alias];
    let mut visited = BTreeSet::new();

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        match graph.node(node).kind {
            NodeKind::InstallAction => {
                actions.insert(node);
            }
            NodeKind::Alias => {
                stack.extend(graph.node(node).sources.iter().copied());
            }
            _ => {}
        }
    }

    actions
}

/// Resolves the full set of staged file paths a `(component, role)`
/// package should contain: the alias's own install actions, plus the
/// transitive closure of their structural dependencies' install actions
/// admitted by the component-aware boundary policy.
pub fn resolve_package_members(
    graph: &Graph,
    alias_map: &AliasMap,
    component: &str,
    role: Role,
) -> Vec<PathBuf> {
    let Some(info) = alias_map.get(component).and_then(|rolemap| rolemap.get(&role)) else {
        return Vec::new();
    };

    let seeds = collect_install_actions(graph, info.alias);
    let closure = scanner::scan_transitive_closure(graph, seeds, &ComponentAwareBoundary);

    closure
        .into_iter()
        .filter_map(|action| graph.node(action).staged_path.clone())
        .collect()
}

/// Builds the gzip-compressed tar archive for `(component, role)` under
/// `output_dir`, by invoking `tar -P -czf <target> -C <root> <relative
/// paths...>` where `root` is the configured `DEST_DIR` and each member is
/// recorded relative to it. Returns the tarball path, or `None` if the
/// slice has no members (a no-op, per spec).
pub fn package(
    graph: &Graph,
    alias_map: &AliasMap,
    package_names: &PackageNameMap,
    env: &Env,
    component: &str,
    role: Role,
    output_dir: &Path,
) -> Result<Option<PathBuf>, AibError> {
    let members = resolve_package_members(graph, alias_map, component, role);
    if members.is_empty() {
        return Ok(None);
    }

    let dest_dir = Path::new(env.dest_dir());
    let relative: Vec<PathBuf> = members
        .iter()
        .map(|member| member.strip_prefix(dest_dir).unwrap_or(member).to_owned())
        .collect();

    let prefix = env.get("AIB_PACKAGE_PREFIX").unwrap_or("");
    let basename = package_basename(package_names, component, role);
    let tarball_path = output_dir.join(format!("{prefix}{basename}.tar.gz"));
    let target_label = default_basename(component, role);

    let mut cmd = Command::new("tar");
    cmd.arg("-P").arg("-czf").arg(&tarball_path);
    cmd.arg("-C").arg(dest_dir);
    cmd.args(&relative);

    let status = processes::run(&mut cmd).map_err(|err| AibError::PackageFailure {
        target: target_label.clone(),
        detail: err.to_string(),
    })?;
    if !status.success() {
        return Err(AibError::PackageFailure {
            target: target_label,
            detail: format!("tar exited with {status}"),
        });
    }

    Ok(Some(tarball_path))
}
