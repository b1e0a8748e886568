// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Installer (spec §4.4): `AutoInstall`, wiring sources into staged
//! install actions and into the per-(component, role) alias map.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::AibError;
use crate::graph::{Graph, NodeId};
use crate::role::Role;
use crate::tags;

/// What an (component, role) alias resolved to: its generated name and the
/// alias node aggregating every install action tagged with that pair.
#[derive(Debug, Clone, Copy)]
pub struct RoleInfo {
    pub alias: NodeId,
}

/// `component → role → RoleInfo`, populated incrementally by every
/// `auto_install` call and consumed by the Alias Wiring stage.
pub type AliasMap = BTreeMap<String, BTreeMap<Role, RoleInfo>>;

/// Generates the canonical alias name for `(component, role)` (role suffix
/// elided for `runtime`), e.g. `install-server` / `install-server-dev`, or
/// `tar-server` / `tar-server-dev` for `target = "tar"`.
pub fn generate_alias(component: &str, role: Role, target: &str) -> String {
    if role == Role::Runtime {
        format!("{target}-{component}")
    } else {
        format!("{target}-{component}-{role}")
    }
}

/// Gets or creates the alias for `(component, role)`, recording it in both
/// the graph and the alias map. Matches the alias map's monotonicity
/// invariant: a `(c, r)` already present is never replaced.
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

/// The arguments to a single `AutoInstall` call, mirroring the keyword
/// arguments the original builder accepted.
#[derive(Debug, Default)]
pub struct AutoInstallArgs<'a> {
    pub component_tag: Option<&'a str>,
    pub role_tag: Option<Role>,
    pub additional_roles: Vec<Role>,
    pub additional_components: Vec<&'a str>,
}

/// Installs every node in `sources` under `target_dir`, tags each one with
/// the union of the requested components/roles (plus the implicit `all`
/// component and `meta` role), records one alias per (component, role)
/// pair, and wires the base-dependency edges every `(c, r)` carries
/// (spec §4.4 step 6): `install-<c>-<r>` depends on `install-<c>-base`
/// (for `r ≠ base`), and on `install-common-base` (for any `(c, r)` other
/// than `(common, base)`).
///
/// Returns the install-action nodes created, one per source, in order.
pub fn auto_install(
    graph: &mut Graph,
    alias_map: &mut AliasMap,
    target_dir: &str,
    sources: &[NodeId],
    args: AutoInstallArgs,
) -> Result<Vec<NodeId>, AibError> {
    let mut roles: BTreeSet<Role> = args.role_tag.into_iter().collect();
    roles.insert(Role::Meta);
    roles.extend(args.additional_roles);

    if let Some(component) = args.component_tag {
        if component.is_empty() || component.chars().any(char::is_whitespace) {
            return Err(AibError::InvalidComponent(component.to_owned()));
        }
    }
    let mut components: BTreeSet<String> = args
        .component_tag
        .into_iter()
        .map(str::to_owned)
        .collect();
    components.insert("all".to_owned());
    components.extend(args.additional_components.iter().map(|s| s.to_string()));

    let mut actions = Vec::with_capacity(sources.len());
    for &source in sources {
        tags::merge_tags(graph, source, components.clone(), roles.clone())?;

        let action = graph.install(target_dir, source);
        tags::add_install_action(graph, source, action);
        actions.push(action);

        for component in &components {
            for &role in &roles {
                let alias = ensure_alias(graph, alias_map, component, role);
                graph.depends(alias, action);

                if role != Role::Base {
                    let base_alias = ensure_alias(graph, alias_map, component, Role::Base);
                    graph.depends(alias, base_alias);
                }
                if (component.as_str(), role) != ("common", Role::Base) {
                    let common_base = ensure_alias(graph, alias_map, "common", Role::Base);
                    graph.depends(alias, common_base);
                }
            }
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_runtime_alias_without_suffix() {
        assert_eq!(generate_alias("server", Role::Runtime, "install"), "install-server");
        assert_eq!(generate_alias("server", Role::Dev, "install"), "install-server-dev");
    }

    #[test]
    fn auto_install_tags_and_wires_aliases() {
        let mut graph = Graph::new();
        let mut alias_map = AliasMap::new();
        let artifact = graph.add_artifact("build/bin/server");

        let args = AutoInstallArgs {
            component_tag: Some("server"),
            role_tag: Some(Role::Runtime),
            ..Default::default()
        };
        let actions = auto_install(&mut graph, &mut alias_map, "/install/bin", &[artifact], args)
            .unwrap();
        assert_eq!(actions.len(), 1);

        let components = tags::get_components(&graph, artifact).unwrap();
        assert!(components.contains("all"));
        assert!(components.contains("server"));

        let roles = tags::get_roles(&graph, artifact).unwrap();
        assert!(roles.contains(&Role::Meta));
        assert!(roles.contains(&Role::Runtime));

        let runtime_alias = alias_map["server"][&Role::Runtime].alias;
        assert_eq!(graph.name(runtime_alias), "install-server");
        assert!(graph.node(runtime_alias).sources.contains(&actions[0]));
    }

    #[test]
    fn auto_install_wires_base_dependency_edges() {
        let mut graph = Graph::new();
        let mut alias_map = AliasMap::new();
        let artifact = graph.add_artifact("build/bin/server");
        let args = AutoInstallArgs {
            component_tag: Some("server"),
            role_tag: Some(Role::Runtime),
            ..Default::default()
        };
        auto_install(&mut graph, &mut alias_map, "/install/bin", &[artifact], args).unwrap();

        let runtime_alias = alias_map["server"][&Role::Runtime].alias;
        let server_base = alias_map["server"][&Role::Base].alias;
        let common_base = alias_map["common"][&Role::Base].alias;
        assert!(graph.node(runtime_alias).sources.contains(&server_base));
        assert!(graph.node(runtime_alias).sources.contains(&common_base));
    }

    #[test]
    fn rejects_whitespace_component_tag() {
        let mut graph = Graph::new();
        let mut alias_map = AliasMap::new();
        let artifact = graph.add_artifact("build/bin/server");
        let args = AutoInstallArgs {
            component_tag: Some("bad tag"),
            ..Default::default()
        };
        let err = auto_install(&mut graph, &mut alias_map, "/install/bin", &[artifact], args)
            .unwrap_err();
        assert_eq!(err, AibError::InvalidComponent("bad tag".to_owned()));
    }
}
