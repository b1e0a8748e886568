// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A minimal stand-in for the "generic build orchestrator" spec.md treats as
//! an external collaborator (§1, §9: "Model them as fields of an engine
//! context passed explicitly rather than globals").
//!
//! Real orchestrators (Bazel, SCons, Ninja...) expose a graph of nodes with
//! sources, an executor that yields declared outputs, builder/emitter
//! registration, variable substitution and a subprocess primitive. This
//! module implements exactly that surface and nothing more: the tagging and
//! scanning engine in the other modules is written entirely against this
//! trait-free, in-memory graph so it has no dependency on any particular
//! build system.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::role::Role;

/// Opaque handle to a node in the [`Graph`]. Stable for the lifetime of the
/// graph; never reused after removal (removal is not supported — the
/// declaration phase is append-only, matching spec §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A produced artifact (binary, library, header, ...).
    Artifact,
    /// An install action: copies a single source into a staged path.
    InstallAction,
    /// A named aggregation node (`install-*` / `tar-*`).
    Alias,
    /// A tarball archive action.
    TarBall,
}

/// The mutable metadata bag attached to every node (spec §3).
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    pub components: Option<BTreeSet<String>>,
    pub roles: Option<BTreeSet<Role>>,
    pub install_actions: BTreeSet<NodeId>,
    pub keep_targetinfo: bool,
    pub debug_origin: Option<NodeId>,
    /// Opt-out marker consulted by the Auto-Install Emitter (spec §4.3).
    pub ignore_autoinstall: bool,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// The node's name, e.g. an install alias name, or a path for artifacts
    /// and install actions.
    pub name: String,
    /// Ordered input nodes this node was built from. For an install action
    /// this is exactly `[source_artifact]`. For an alias this is its
    /// dependency set in insertion order (deduplicated on push).
    pub sources: Vec<NodeId>,
    /// Structural build-graph dependency edges (e.g. link/use edges between
    /// artifacts). This is what the Transitive Scanner walks as "children"
    /// (spec §4.6); it is distinct from `sources`.
    pub deps: Vec<NodeId>,
    /// If set, the node's declared output set, as an executor would report
    /// it. `None` means the orchestrator never built (or does not keep)
    /// target info for this node.
    pub executor_outputs: Option<Vec<NodeId>>,
    /// The staged filesystem path, set once an install action is
    /// materialized by the Installer.
    pub staged_path: Option<PathBuf>,
    pub attributes: Attributes,
}

impl Node {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            sources: Vec::new(),
            deps: Vec::new(),
            executor_outputs: None,
            staged_path: None,
            attributes: Attributes::default(),
        }
    }
}

/// The in-memory build graph the engine operates against.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    /// Index from alias name to its node, so repeated `Alias(name)` calls
    /// return the same node (spec §3 invariant 5: the alias map is
    /// monotonic).
    alias_index: BTreeMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_artifact(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(NodeKind::Artifact, name);
        node.executor_outputs = Some(vec![id]);
        self.nodes.push(node);
        id
    }

    /// Creates an install-action node copying `source` into `target_dir`,
    /// named by the staged path. Mirrors `SCons.Script.Install`.
    pub fn install(&mut self, target_dir: &str, source: NodeId) -> NodeId {
        let source_name = self.nodes[source.0].name.clone();
        let base_name = PathBuf::from(&source_name)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(source_name);
        let staged = PathBuf::from(target_dir).join(&base_name);
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(NodeKind::InstallAction, staged.to_string_lossy().into_owned());
        node.sources = vec![source];
        node.staged_path = Some(staged);
        self.nodes.push(node);
        id
    }

    /// Gets or creates the alias node named `name`, matching `env.Alias`'s
    /// idempotence.
    pub fn alias(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.alias_index.get(name) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(NodeKind::Alias, name));
        self.alias_index.insert(name.to_owned(), id);
        id
    }

    pub fn find_alias(&self, name: &str) -> Option<NodeId> {
        self.alias_index.get(name).copied()
    }

    pub fn add_tarball(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(NodeKind::TarBall, name));
        id
    }

    /// Adds a dependency edge, deduplicated, matching `env.Depends`.
    pub fn depends(&mut self, node: NodeId, on: NodeId) {
        let deps = &mut self.nodes[node.0].sources;
        if !deps.contains(&on) {
            deps.push(on);
        }
    }

    /// Adds a structural build-graph edge (e.g. a link dependency), walked
    /// by the Transitive Scanner.
    pub fn add_structural_dep(&mut self, node: NodeId, on: NodeId) {
        let deps = &mut self.nodes[node.0].deps;
        if !deps.contains(&on) {
            deps.push(on);
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Records that `node`'s debug info was split from `origin`, consulted
    /// by the Suffix Classifier's debug-directory inheritance.
    pub fn set_debug_origin(&mut self, node: NodeId, origin: NodeId) {
        self.nodes[node.0].attributes.debug_origin = Some(origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_lookup_is_idempotent() {
        let mut graph = Graph::new();
        let a1 = graph.alias("install-server");
        let a2 = graph.alias("install-server");
        assert_eq!(a1, a2);
    }

    #[test]
    fn install_stages_under_target_dir() {
        let mut graph = Graph::new();
        let artifact = graph.add_artifact("/build/bin/foo");
        let action = graph.install("/install/bin", artifact);
        assert_eq!(
            graph.node(action).staged_path,
            Some(PathBuf::from("/install/bin/foo"))
        );
    }
}
