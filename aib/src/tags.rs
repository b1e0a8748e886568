// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Tag Store (spec §4.1): the component/role metadata attached to
//! artifacts and install actions, plus the install-action back-reference
//! used to recover a component's files later (`keep_targetinfo` in the
//! original tool).

use std::collections::BTreeSet;

use crate::error::AibError;
use crate::graph::{Graph, NodeId};

/// Validates a single component tag: non-empty, no whitespace. Mirrors the
/// original tool's use of component strings as alias-name fragments, which
/// silently breaks if a tag contains a space.
fn validate_component(component: &str) -> Result<(), AibError> {
    if component.is_empty() || component.chars().any(char::is_whitespace) {
        return Err(AibError::InvalidComponent(component.to_owned()));
    }
    Ok(())
}

/// Attaches component and role tags to `node`, validating every component
/// tag. Implicit `"all"` / `"meta"` membership is the caller's
/// responsibility (the Auto-Install entry point adds them); the store
/// itself only records exactly what it's given.
pub fn set_tags(
    graph: &mut Graph,
    node: NodeId,
    components: impl IntoIterator<Item = impl Into<String>>,
    roles: BTreeSet<crate::role::Role>,
) -> Result<(), AibError> {
    let mut component_set = BTreeSet::new();
    for component in components {
        let component = component.into();
        validate_component(&component)?;
        component_set.insert(component);
    }

    let attrs = &mut graph.node_mut(node).attributes;
    attrs.components = Some(component_set);
    attrs.roles = Some(roles);
    Ok(())
}

/// Unions `components`/`roles` into whatever tags `node` already carries,
/// matching the original tool's `s.attributes.components.union(components)`
/// behavior when a source is auto-installed under more than one component.
pub fn merge_tags(
    graph: &mut Graph,
    node: NodeId,
    components: BTreeSet<String>,
    roles: BTreeSet<crate::role::Role>,
) -> Result<(), AibError> {
    for component in &components {
        validate_component(component)?;
    }
    let attrs = &mut graph.node_mut(node).attributes;
    match &mut attrs.components {
        Some(existing) => existing.extend(components),
        None => attrs.components = Some(components),
    }
    match &mut attrs.roles {
        Some(existing) => existing.extend(roles),
        None => attrs.roles = Some(roles),
    }
    Ok(())
}

pub fn get_components(graph: &Graph, node: NodeId) -> Option<&BTreeSet<String>> {
    graph.node(node).attributes.components.as_ref()
}

pub fn get_roles(graph: &Graph, node: NodeId) -> Option<&BTreeSet<crate::role::Role>> {
    graph.node(node).attributes.roles.as_ref()
}

/// Records that `action` is one of `node`'s install actions, the
/// `keep_targetinfo=1` back-reference the Packager later walks to collect a
/// component's installed files.
pub fn add_install_action(graph: &mut Graph, node: NodeId, action: NodeId) {
    let attrs = &mut graph.node_mut(node).attributes;
    attrs.install_actions.insert(action);
    attrs.keep_targetinfo = true;
}

pub fn install_actions(graph: &Graph, node: NodeId) -> &BTreeSet<NodeId> {
    &graph.node(node).attributes.install_actions
}
