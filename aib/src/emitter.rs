// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The Auto-Install Emitter (spec §4.3): the hook a `Program`,
//! `SharedLibrary`, `LoadableModule` or `StaticLibrary`-equivalent builder
//! runs on every target it produces, routing the artifact through the
//! Suffix Map into `AutoInstall` unless the artifact opted out.
//!
//! The orchestrator's builder/emitter registration (`add_emitter` in the
//! original tool) is out of scope here; callers invoke [`emit`] directly
//! for each artifact a builder produces, which is the one piece of that
//! machinery with engine-owned semantics.

use crate::config::Env;
use crate::error::AibError;
use crate::graph::{Graph, NodeId};
use crate::installer::{self, AliasMap, AutoInstallArgs};
use crate::role::Role;
use crate::suffix::SuffixMap;

/// Default per-call tags a builder wants stamped onto every artifact it
/// emits, standing in for the construction environment's `COMPONENT_TAG` /
/// `ROLE_TAG` / `ADDITIONAL_COMPONENTS` variables.
#[derive(Debug, Default, Clone)]
pub struct EmitterContext<'a> {
    pub component_tag: Option<&'a str>,
    pub role_tag: Option<Role>,
    pub additional_components: Vec<&'a str>,
}

/// Looks `artifact`'s filename up in `suffix_map`; if a mapping exists and
/// the artifact hasn't opted out via [`crate::graph::Attributes::ignore_autoinstall`],
/// routes it through `AutoInstall` using the suffix's directory and default
/// roles. Returns the install-action node, or `None` if the artifact has no
/// known suffix or opted out.
pub fn emit(
    graph: &mut Graph,
    suffix_map: &SuffixMap,
    alias_map: &mut AliasMap,
    env: &Env,
    artifact: NodeId,
    ctx: EmitterContext,
) -> Result<Option<NodeId>, AibError> {
    if graph.node(artifact).attributes.ignore_autoinstall {
        return Ok(None);
    }

    let filename = graph.name(artifact).to_owned();
    let debug_origin_name = graph
        .node(artifact)
        .attributes
        .debug_origin
        .map(|origin| graph.name(origin).to_owned());
    let Some((directory, default_roles)) =
        suffix_map.classify(&filename, debug_origin_name.as_deref(), env)
    else {
        return Ok(None);
    };
    let target_dir = env.stage_path(&directory);

    let args = AutoInstallArgs {
        component_tag: ctx.component_tag,
        role_tag: ctx.role_tag,
        additional_roles: default_roles,
        additional_components: ctx.additional_components,
    };
    let actions = installer::auto_install(
        graph,
        alias_map,
        &target_dir.to_string_lossy(),
        &[artifact],
        args,
    )?;
    Ok(actions.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_shared_library_through_suffix_map() {
        let mut graph = Graph::new();
        let suffix_map = SuffixMap::with_defaults();
        let mut alias_map = AliasMap::new();
        let env = Env::from_process_env();

        let artifact = graph.add_artifact("libfoo.so");
        let ctx = EmitterContext {
            component_tag: Some("foo"),
            role_tag: Some(Role::Runtime),
            ..Default::default()
        };
        let action = emit(&mut graph, &suffix_map, &mut alias_map, &env, artifact, ctx)
            .unwrap()
            .expect("known suffix produces an install action");

        assert!(graph.node(action).staged_path.is_some());
        assert!(alias_map.contains_key("foo"));
    }

    #[test]
    fn debug_artifact_inherits_origin_directory() {
        let mut graph = Graph::new();
        let suffix_map = SuffixMap::with_defaults();
        let mut alias_map = AliasMap::new();
        let env = Env::from_process_env();

        let binary = graph.add_artifact("server");
        let binary_action = emit(
            &mut graph,
            &suffix_map,
            &mut alias_map,
            &env,
            binary,
            EmitterContext {
                component_tag: Some("server"),
                role_tag: Some(Role::Runtime),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        let debug_info = graph.add_artifact("server.debug");
        graph.set_debug_origin(debug_info, binary);
        let debug_action = emit(
            &mut graph,
            &suffix_map,
            &mut alias_map,
            &env,
            debug_info,
            EmitterContext {
                component_tag: Some("server"),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        let binary_dir = graph.node(binary_action).staged_path.clone().unwrap();
        let debug_dir = graph.node(debug_action).staged_path.clone().unwrap();
        assert_eq!(binary_dir.parent(), debug_dir.parent());
    }

    #[test]
    fn skips_artifacts_without_known_suffix_marker() {
        let mut graph = Graph::new();
        let suffix_map = SuffixMap::with_defaults();
        let mut alias_map = AliasMap::new();
        let env = Env::from_process_env();

        let artifact = graph.add_artifact("README.rst");
        let result = emit(
            &mut graph,
            &suffix_map,
            &mut alias_map,
            &env,
            artifact,
            EmitterContext::default(),
        );
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn honors_ignore_autoinstall_opt_out() {
        let mut graph = Graph::new();
        let suffix_map = SuffixMap::with_defaults();
        let mut alias_map = AliasMap::new();
        let env = Env::from_process_env();

        let artifact = graph.add_artifact("libfoo.so");
        graph.node_mut(artifact).attributes.ignore_autoinstall = true;
        let result = emit(
            &mut graph,
            &suffix_map,
            &mut alias_map,
            &env,
            artifact,
            EmitterContext::default(),
        );
        assert!(result.unwrap().is_none());
    }
}
