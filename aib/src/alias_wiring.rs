// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Alias Wiring (spec §4.5): the cross-component "common" dependency, the
//! role-dependency lattice edges, and the default install target, applied
//! once declaration is complete.
//!
//! Because `meta` is "an aggregate role that pulls in every other role for
//! a component" (and every install implicitly carries `meta`), finalizing
//! first completes each meta-bearing component's role space — creating any
//! of the other five roles' aliases that weren't otherwise populated, empty
//! — so `meta` has something concrete to depend on.
//!
//! Iteration is over the `AliasMap`'s `BTreeMap`s, so components and roles
//! are visited in sorted order — the determinism spec §4.5 requires falls
//! directly out of `Role`'s alphabetical variant order and `String`'s
//! lexical order, with no separate sort step needed.

use strum::IntoEnumIterator;

use crate::graph::{Graph, NodeId};
use crate::installer::{generate_alias, AliasMap, RoleInfo};
use crate::role::Role;

fn ensure_alias(graph: &mut Graph, alias_map: &mut AliasMap, component: &str, role: Role) -> NodeId {
    if let Some(info) = alias_map.get(component).and_then(|rolemap| rolemap.get(&role)) {
        return info.alias;
    }
    let alias = graph.alias(&generate_alias(component, role, "install"));
    alias_map
        .entry(component.to_owned())
        .or_default()
        .insert(role, RoleInfo { alias });
    alias
}

/// Completes the role space of every component that has a `meta` alias:
/// for each of the other five roles not yet present, creates an empty
/// alias and wires `meta`'s dependency on it.
fn complete_meta_role_spaces(graph: &mut Graph, alias_map: &mut AliasMap) {
    let meta_bearing: Vec<String> = alias_map
        .iter()
        .filter(|(_, rolemap)| rolemap.contains_key(&Role::Meta))
        .map(|(component, _)| component.clone())
        .collect();

    for component in meta_bearing {
        let meta_alias = ensure_alias(graph, alias_map, &component, Role::Meta);
        for role in Role::iter() {
            if role == Role::Meta {
                continue;
            }
            let role_alias = ensure_alias(graph, alias_map, &component, role);
            graph.depends(meta_alias, role_alias);
        }
    }
}

/// Applies every component's dependency on `common` for shared roles, and
/// every role's lattice dependency, then wires the default install target
/// if a `default` component declared a `runtime` role.
///
/// Returns the `install` alias node if a default target was wired.
pub fn finalize_alias_dependencies(graph: &mut Graph, alias_map: &mut AliasMap) -> Option<NodeId> {
    complete_meta_role_spaces(graph, alias_map);

    for (component, rolemap) in alias_map.iter() {
        for (&role, info) in rolemap {
            if component != "common" {
                if let Some(common_info) = alias_map.get("common").and_then(|r| r.get(&role)) {
                    graph.depends(info.alias, common_info.alias);
                }
            }

            for &dependency in role.lattice_dependencies() {
                if let Some(dependency_info) = rolemap.get(&dependency) {
                    graph.depends(info.alias, dependency_info.alias);
                }
            }
        }
    }

    let default_rolemap = alias_map.get("default")?;
    let runtime_info = default_rolemap.get(&Role::Runtime)?;
    let install = graph.alias("install");
    graph.depends(install, runtime_info.alias);
    Some(install)
}
