// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Transitive Scanner (spec §4.6): given an install action, walks its
//! artifact's structural dependency edges and returns the install actions
//! of every dependency that crosses the role boundary, sorted for
//! reproducible build plans. The Packager repeatedly drives this to a
//! fixpoint with a component-aware boundary policy (§4.7).

use std::collections::BTreeSet;

use crate::graph::{Graph, NodeId};
use crate::role::Role;
use crate::tags;

/// The stable string key an install action sorts by: its staged path if
/// one has been recorded, otherwise its source artifact's name. Two
/// distinct actions never share a staged path, so this is a total order.
fn sort_key(graph: &Graph, action: NodeId) -> String {
    if let Some(path) = &graph.node(action).staged_path {
        path.to_string_lossy().into_owned()
    } else {
        graph
            .node(action)
            .sources
            .first()
            .map(|&source| graph.name(source).to_owned())
            .unwrap_or_default()
    }
}

/// The origin or child tags a boundary decision is made from: components
/// with the implicit `all` removed, roles with the implicit `meta`
/// removed (spec §4.6 step 1).
#[derive(Debug, Clone, Default)]
pub struct Tags {
    pub components: BTreeSet<String>,
    pub roles: BTreeSet<Role>,
}

fn node_tags(graph: &Graph, node: NodeId) -> Tags {
    let mut components = tags::get_components(graph, node).cloned().unwrap_or_default();
    components.remove("all");
    let mut roles = tags::get_roles(graph, node).cloned().unwrap_or_default();
    roles.remove(&Role::Meta);
    Tags { components, roles }
}

/// Decides whether a build-graph edge from `origin` to `child` crosses the
/// role boundary, i.e. whether `child`'s install actions belong in
/// `origin`'s transitive closure. The scanner itself is policy-free; this
/// is the "small strategy interface" the Packager specializes (spec §9).
pub trait BoundaryPolicy {
    fn admits(&self, origin: &Tags, child: &Tags) -> bool;
}

/// The scanner's default: base always crosses in either direction;
/// otherwise an edge stays inside the same role slice (origin and child
/// share at least one role).
pub struct RoleOnlyBoundary;

impl BoundaryPolicy for RoleOnlyBoundary {
    fn admits(&self, origin: &Tags, child: &Tags) -> bool {
        if origin.roles.contains(&Role::Base) || child.roles.contains(&Role::Base) {
            return true;
        }
        origin.roles.intersection(&child.roles).next().is_some()
    }
}

/// The Packager's variant (spec §4.7): in addition to the role-only rule,
/// requires the child to share at least one component with the origin
/// (unless the edge already crossed via `base`).
pub struct ComponentAwareBoundary;

impl BoundaryPolicy for ComponentAwareBoundary {
    fn admits(&self, origin: &Tags, child: &Tags) -> bool {
        if origin.roles.contains(&Role::Base) || child.roles.contains(&Role::Base) {
            return true;
        }
        if origin.roles.intersection(&child.roles).next().is_none() {
            return false;
        }
        origin.components.intersection(&child.components).next().is_some()
    }
}

/// One hop of the scan: for install action `action`, follows its
/// artifact's declared outputs to their structural children, admitting a
/// child's install actions when `policy` allows crossing into it. Results
/// are sorted by each action's stable string key ([`sort_key`]), not by
/// node-creation order, so the same build graph always yields the same
/// plan regardless of node-allocation history.
pub fn scan_transitive_install(graph: &Graph, action: NodeId, policy: &dyn BoundaryPolicy) -> Vec<NodeId> {
    let Some(&artifact) = graph.node(action).sources.first() else {
        return Vec::new();
    };
    let origin = node_tags(graph, artifact);

    let Some(outputs) = graph.node(artifact).executor_outputs.clone() else {
        return Vec::new();
    };

    let mut results = BTreeSet::new();
    for output in outputs {
        for &child in &graph.node(output).deps {
            let child_actions = tags::install_actions(graph, child);
            if child_actions.is_empty() {
                continue;
            }
            let child_tags = node_tags(graph, child);
            if !policy.admits(&origin, &child_tags) {
                continue;
            }
            results.extend(child_actions.iter().copied());
        }
    }
    let mut results: Vec<NodeId> = results.into_iter().collect();
    results.sort_by(|&a, &b| sort_key(graph, a).cmp(&sort_key(graph, b)));
    results
}

/// Repeatedly applies [`scan_transitive_install`] from `seeds` until no new
/// install action is admitted, returning the full closure (seeds
/// included). Used by the Packager, and by tests exercising the scanner's
/// transitive behavior end to end.
pub fn scan_transitive_closure(
    graph: &Graph,
    seeds: impl IntoIterator<Item = NodeId>,
    policy: &dyn BoundaryPolicy,
) -> BTreeSet<NodeId> {
    let mut closure: BTreeSet<NodeId> = seeds.into_iter().collect();
    let mut frontier: Vec<NodeId> = closure.iter().copied().collect();

    while let Some(node) = frontier.pop() {
        for candidate in scan_transitive_install(graph, node, policy) {
            if closure.insert(candidate) {
                frontier.push(candidate);
            }
        }
    }

    closure
}
