//! Headless configurator driver
//!
//! Loads the catalogs and settings, replays a set of user choices, logs
//! every call the engine makes to the renderer and writes the engraving
//! maps out as PNG files.

use anyhow::{anyhow, Context, Result};
use appearance_engine::appliance::{ApplianceCall, RecordingAppliance};
use appearance_engine::engraving::EngravingMaps;
use appearance_engine::foundation::math::Vec3;
use appearance_engine::material::PropertyName;
use appearance_engine::prelude::*;
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};

const DEFAULT_ASSETS: &str = "resources/catalog/asset.json";
const DEFAULT_MATERIALS: &str = "resources/catalog/materials.json";
const DEFAULT_OUTPUT_DIR: &str = "engraving_out";

/// Appliance that logs every call before recording it
#[derive(Default)]
struct LoggingAppliance {
    recorder: RecordingAppliance,
}

impl ApplianceLayer for LoggingAppliance {
    fn set_mesh_enabled(&mut self, instance: &str, enabled: bool) {
        log::info!("set_mesh_enabled {instance} = {enabled}");
        self.recorder.set_mesh_enabled(instance, enabled);
    }

    fn apply_material(&mut self, instance: &str, material: &PbrMaterialParams) {
        log::info!(
            "apply_material {instance} <- {} (color {:.3},{:.3},{:.3} metallic {:.2} roughness {:.2})",
            material.name,
            material.base_color.x,
            material.base_color.y,
            material.base_color.z,
            material.metallic,
            material.roughness
        );
        self.recorder.apply_material(instance, material);
    }

    fn update_material(&mut self, material: &PbrMaterialParams) {
        log::info!("update_material {}", material.name);
        self.recorder.update_material(material);
    }

    fn bind_engraving_maps(&mut self, instance: &str, maps: &EngravingMaps, binding: &EngravingBinding) {
        let (width, height) = maps.dimensions();
        log::info!(
            "bind_engraving_maps {instance}: {width}x{height}, font {}px, blur {}px, bump {}",
            maps.font_px,
            maps.blur_px,
            binding.bump_level
        );
        self.recorder.bind_engraving_maps(instance, maps, binding);
    }

    fn detach_engraving_maps(&mut self, instance: &str) {
        log::info!("detach_engraving_maps {instance}");
        self.recorder.detach_engraving_maps(instance);
    }
}

/// Parse `mesh=x,y,z`
fn parse_extents(arg: &str) -> Result<(String, Vec3)> {
    let (name, dims) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected NAME=X,Y,Z, got '{arg}'"))?;
    let values = dims
        .split(',')
        .map(|value| value.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid extents '{dims}'"))?;
    match values.as_slice() {
        [x, y, z] => Ok((name.trim().to_string(), Vec3::new(*x, *y, *z))),
        _ => Err(anyhow!("Expected three extents, got {}", values.len())),
    }
}

fn save_maps(maps: &EngravingMaps, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).context("Failed to create output directory")?;
    for (name, map) in [("alpha", &maps.alpha), ("ao", &maps.ao), ("normal", &maps.normal)] {
        let path = output_dir.join(format!("engraving_{name}.png"));
        map.save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_material(session: &ConfiguratorSession, name: &str) {
    let Some(effective) = session.selected_effective() else {
        return;
    };
    println!("Material '{name}':");
    for property in PropertyName::ALL {
        let marker = if session.independence().contains(property) {
            "own"
        } else {
            "inherited"
        };
        println!("  {:<24} {:<12} ({marker})", property.as_str(), effective.get(property).to_string());
    }
}

fn main() -> Result<()> {
    appearance_engine::foundation::logging::init();

    let matches = Command::new("configurator")
        .about("Replays configurator choices and exports the engraving maps")
        .arg(
            Arg::new("assets")
                .long("assets")
                .value_name("FILE")
                .help("Asset catalog (.json or .toml)")
                .default_value(DEFAULT_ASSETS),
        )
        .arg(
            Arg::new("materials")
                .long("materials")
                .value_name("FILE")
                .help("Material catalog (.json or .toml)")
                .default_value(DEFAULT_MATERIALS),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Settings file (.toml or .ron)"),
        )
        .arg(
            Arg::new("tag")
                .short('t')
                .long("tag")
                .value_name("TAG")
                .help("Toggle a visibility tag (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("option")
                .long("option")
                .value_name("TAG")
                .help("Exclusive option: clear all tags, then activate this one"),
        )
        .arg(Arg::new("text").long("text").value_name("TEXT").help("Engraving text"))
        .arg(Arg::new("font").long("font").value_name("FONT").help("Engraving font id"))
        .arg(
            Arg::new("aspect")
                .long("aspect")
                .value_name("RATIO")
                .help("Engraving aspect override; empty for automatic"),
        )
        .arg(
            Arg::new("blur")
                .long("blur")
                .value_name("FRACTION")
                .help("Blur radius as a fraction of the smaller canvas side"),
        )
        .arg(
            Arg::new("select")
                .long("select")
                .value_name("MATERIAL")
                .help("Print the effective values of a material"),
        )
        .arg(
            Arg::new("extents")
                .long("extents")
                .value_name("NAME=X,Y,Z")
                .help("Bounding size of a rendered instance (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("DIR")
                .help("Output directory for the engraving maps")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => ConfiguratorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {path}"))?,
        None => ConfiguratorConfig::default(),
    };

    let assets_path = matches
        .get_one::<String>("assets")
        .map_or(DEFAULT_ASSETS, String::as_str);
    let materials_path = matches
        .get_one::<String>("materials")
        .map_or(DEFAULT_MATERIALS, String::as_str);
    let assets = AssetCatalog::load_from_file(assets_path)
        .with_context(|| format!("Failed to load asset catalog {assets_path}"))?;
    let materials = MaterialCatalog::load_from_file(materials_path)
        .with_context(|| format!("Failed to load material catalog {materials_path}"))?;

    let mut scene = SceneIndex::from_catalog(&assets);
    for arg in matches.get_many::<String>("extents").unwrap_or_default() {
        let (name, extents) = parse_extents(arg)?;
        if !scene.set_extents(&name, extents) {
            log::warn!("No rendered instance named '{name}'");
        }
    }

    let mut appliance = LoggingAppliance::default();
    let mut session = ConfiguratorSession::new(config, assets, materials, scene);
    session.initialize(&mut appliance);

    for tag in matches.get_many::<String>("tag").unwrap_or_default() {
        session.toggle_tag(tag, &mut appliance);
    }
    if let Some(option) = matches.get_one::<String>("option") {
        session.set_option(option, &mut appliance);
    }
    if let Some(font) = matches.get_one::<String>("font") {
        session.set_engraving_font(font, &mut appliance);
    }
    if let Some(aspect) = matches.get_one::<String>("aspect") {
        session.set_engraving_aspect_input(aspect, &mut appliance);
    }
    if let Some(blur) = matches.get_one::<String>("blur") {
        let blur: f32 = blur.parse().context("Invalid blur fraction")?;
        session.set_engraving_blur(blur, &mut appliance);
    }
    if let Some(text) = matches.get_one::<String>("text") {
        session.set_engraving_text(text, &mut appliance);
    }

    if let Some(name) = matches.get_one::<String>("select") {
        if session.select_material(name) {
            print_material(&session, name);
        } else {
            println!("Unknown material '{name}'");
        }
    }

    let calls = &appliance.recorder.calls;
    let enabled = calls
        .iter()
        .filter(|call| matches!(call, ApplianceCall::SetMeshEnabled { enabled: true, .. }))
        .count();
    println!("{} appliance calls ({enabled} enable)", calls.len());
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    match session.engraving_maps() {
        Some(maps) => {
            let output_dir = PathBuf::from(
                matches
                    .get_one::<String>("out")
                    .map_or(DEFAULT_OUTPUT_DIR, String::as_str),
            );
            save_maps(maps, &output_dir)?;
        }
        None => println!("No engraving text, no maps written"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extents() {
        let (name, extents) = parse_extents("grip_plate=3.0, 1.0,0.05").unwrap();
        assert_eq!(name, "grip_plate");
        assert_eq!(extents, Vec3::new(3.0, 1.0, 0.05));
        assert!(parse_extents("grip_plate").is_err());
        assert!(parse_extents("grip_plate=1,2").is_err());
        assert!(parse_extents("grip_plate=a,b,c").is_err());
    }
}
