// Copyright 2024 The Auto-Install Binaries Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! CLI front-end for the tagging engine.
//!
//! There is no real build orchestrator wired up here (that collaborator is
//! explicitly out of scope); `demo` builds a small illustrative install
//! graph in-process and runs it through every stage so `list-aib-components`
//! and `list-aib-targets` have something to introspect.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aib::config::Env;
use aib::emitter::{self, EmitterContext};
use aib::graph::Graph;
use aib::installer::AliasMap;
use aib::role::Role;
use aib::suffix::SuffixMap;
use aib::{alias_wiring, packager};

#[derive(Parser, Debug)]
#[command(name = "aib", about = "Auto-install binaries tagging and packaging engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists every component that has been tagged, one per line.
    ListAibComponents,
    /// Lists every (component, role) install alias, with its dependency count.
    ListAibTargets,
    /// Runs a small illustrative build through the whole pipeline, optionally
    /// packaging it into archives under `--output-dir`.
    Demo {
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Builds a small illustrative graph: a `server` runtime binary linking a
/// `core` shared library (itself installed under the `core` component), run
/// through the Suffix Map / Installer / Emitter / Alias Wiring stages.
fn build_demo_graph() -> Result<(Graph, AliasMap, SuffixMap, Env)> {
    let mut graph = Graph::new();
    let mut alias_map = AliasMap::new();
    let suffix_map = SuffixMap::with_defaults();
    let env = Env::from_process_env();

    let core_lib = graph.add_artifact("libcore.so");
    emitter::emit(
        &mut graph,
        &suffix_map,
        &mut alias_map,
        &env,
        core_lib,
        EmitterContext {
            component_tag: Some("core"),
            role_tag: Some(Role::Runtime),
            ..Default::default()
        },
    )?;

    let server_bin = graph.add_artifact("server");
    graph.add_structural_dep(server_bin, core_lib);
    emitter::emit(
        &mut graph,
        &suffix_map,
        &mut alias_map,
        &env,
        server_bin,
        EmitterContext {
            component_tag: Some("server"),
            role_tag: Some(Role::Runtime),
            ..Default::default()
        },
    )?;

    alias_wiring::finalize_alias_dependencies(&mut graph, &mut alias_map);

    Ok((graph, alias_map, suffix_map, env))
}

fn list_aib_components() -> Result<()> {
    let (_, alias_map, ..) = build_demo_graph()?;
    for component in alias_map.keys() {
        println!("{component}");
    }
    Ok(())
}

fn list_aib_targets() -> Result<()> {
    let (graph, alias_map, ..) = build_demo_graph()?;
    for (component, rolemap) in &alias_map {
        for (role, info) in rolemap {
            let alias_name = graph.name(info.alias);
            let dep_count = graph.node(info.alias).sources.len();
            println!("{component}\t{role}\t{alias_name}\t{dep_count} deps");
        }
    }
    Ok(())
}

fn demo(output_dir: Option<PathBuf>) -> Result<()> {
    let (graph, alias_map, _, env) = build_demo_graph()?;

    let Some(output_dir) = output_dir else {
        tracing::info!("no --output-dir given, skipping archive creation");
        return Ok(());
    };
    std::fs::create_dir_all(&output_dir)?;

    let mut package_names = packager::PackageNameMap::new();
    packager::add_package_name_alias(&mut package_names, "server", Role::Runtime, "demo-server");

    for (component, rolemap) in &alias_map {
        for role in rolemap.keys() {
            let tarball_path = packager::package(
                &graph,
                &alias_map,
                &package_names,
                &env,
                component,
                *role,
                &output_dir,
            )?;
            if let Some(tarball_path) = tarball_path {
                tracing::info!(%component, %role, "packaged {}", tarball_path.display());
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    cliutil::cli_main(
        || -> Result<()> {
            let cli = Cli::parse();
            match cli.command {
                Command::ListAibComponents => list_aib_components(),
                Command::ListAibTargets => list_aib_targets(),
                Command::Demo { output_dir } => demo(output_dir),
            }
        },
        cliutil::Config::default(),
    )
}
