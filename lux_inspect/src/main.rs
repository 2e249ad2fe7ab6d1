//! Scene light-list inspector
//!
//! Opens a scene description, computes the light list of one root and
//! prints it. Optionally publishes the result into the root's cache and
//! checks mesh topology.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use lux_engine::foundation::logging;
use lux_engine::prelude::*;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "lux.toml";

fn cli() -> Command {
    Command::new("lux_inspect")
        .about("Computes and caches light lists of a scene description")
        .arg(
            Arg::new("scene")
                .value_name("SCENE")
                .help("Scene description (.ron or .toml)")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Engine configuration file (defaults to lux.toml when present)"),
        )
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("PATH")
                .help("Light-list root prim"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Cache handling for the query")
                .value_parser(["ignore", "consult"]),
        )
        .arg(
            Arg::new("load")
                .long("load")
                .value_name("POLICY")
                .help("Which payloads to load")
                .value_parser(["all", "none"]),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .help("Store the computed list as the root's cache and query again")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check-meshes")
                .long("check-meshes")
                .help("Validate the topology of every loaded mesh")
                .action(ArgAction::SetTrue),
        )
}

fn load_config(matches: &ArgMatches) -> Result<LuxConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => LuxConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None if PathBuf::from(DEFAULT_CONFIG).exists() => {
            LuxConfig::load_from_file(DEFAULT_CONFIG).context("Failed to load lux.toml")?
        }
        None => LuxConfig::default(),
    };

    let mut config = match matches.get_one::<String>("root") {
        Some(root) => config.with_root(root),
        None => config,
    };
    if let Some(mode) = matches.get_one::<String>("mode") {
        config = config.with_mode(mode.parse().map_err(anyhow::Error::msg)?);
    }
    if let Some(load) = matches.get_one::<String>("load") {
        let policy = if load == "none" { LoadPolicy::None } else { LoadPolicy::All };
        config = config.with_load_policy(policy);
    }

    config.validate()?;
    Ok(config)
}

fn print_list(label: &str, lights: &LightList) {
    println!("{label}: {} light(s)", lights.len());
    for path in lights {
        println!("  {path}");
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    logging::init_with_level(&config.logging.level);

    let scene_arg = matches.get_one::<String>("scene").context("SCENE is required")?;
    let scene_path = PathBuf::from(scene_arg);
    let desc = SceneDescription::load_from_file(&scene_path)
        .with_context(|| format!("Failed to read scene {}", scene_path.display()))?;
    let mut scene = LuxScene::from_description(&desc, config.stage.load)
        .with_context(|| format!("Failed to build scene {}", scene_path.display()))?;
    log::info!(
        "Opened {} ({} prims, {} cached roots, load policy {:?})",
        scene_path.display(),
        scene.stage().len(),
        scene.cache().len(),
        config.stage.load
    );

    let root = config.query.root()?;
    let mode = config.query.default_mode;
    let lights = scene.compute_light_list(&root, mode)?;
    print_list(&format!("{root} [{mode}]"), &lights);
    println!("  cache: {:?}", scene.cache().state(&root));

    if matches.get_flag("store") {
        scene.store_light_list(&root, lights)?;
        let consulted = scene.compute_light_list(&root, ComputeMode::ConsultModelHierarchyCache)?;
        print_list(&format!("{root} [consult, after store]"), &consulted);
    }

    if matches.get_flag("check-meshes") {
        let mut failures = 0usize;
        for (path, result) in scene.stage().validate_meshes() {
            match result {
                Ok(()) => println!("mesh {path}: ok"),
                Err(e) => {
                    failures += 1;
                    println!("mesh {path}: {e}");
                }
            }
        }
        if failures > 0 {
            anyhow::bail!("{failures} mesh(es) failed topology validation");
        }
    }

    Ok(())
}
