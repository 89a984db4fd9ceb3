//! Cross-module scenarios driving a full session


use crate::assets::{AssetCatalog, MaterialCatalog};
use crate::config::{ConfiguratorConfig, EngravingConfig};
use crate::scene::SceneIndex;
use crate::ConfiguratorSession;

const ASSETS_JSON: &str = r#"{
    "models": {
        "part_model": {
            "name": "Grip",
            "file": "grip.glb",
            "meshes": {
                "grip_base": { "materialSlots": ["slot1", "slot2"], "tags": ["base"] },
                "grip_mlok": { "materialSlots": ["slot1"], "tags": ["mlok"] },
                "grip_picatinny": { "materialSlots": ["slot1"], "tags": ["picatinny"] },
                "grip_plate": { "materialSlots": ["slot1"], "tags": ["engraving", "picatinny"] }
            }
        }
    },
    "materialConfigs": {
        "grip_base": {
            "black": { "slot1": "grip_black", "slot2": "rubber" },
            "sand": { "slot1": "grip_sand", "slot2": "rubber" }
        },
        "grip_mlok": {
            "black": { "slot1": "grip_black_worn" }
        }
    }
}"#;

const MATERIALS_JSON: &str = r##"{
    "materials": {
        "grip_black": { "type": "pbr", "parent": "none", "baseColor": "#111111", "roughness": 0.6 },
        "grip_black_worn": { "type": "pbr", "parent": "grip_black", "metallic": 0.3 },
        "grip_sand": { "type": "pbr", "parent": "none", "baseColor": "#c2b280" },
        "rubber": { "type": "pbr", "parent": "none", "roughness": 0.9, "backFaceCulling": false }
    }
}"##;

/// Session over the sample grip catalog with a small engraving canvas
fn grip_session() -> ConfiguratorSession {
    crate::foundation::logging::init_for_tests();

    let assets = AssetCatalog::from_json_str(ASSETS_JSON).unwrap();
    let materials = MaterialCatalog::from_json_str(MATERIALS_JSON).unwrap();
    let scene = SceneIndex::from_catalog(&assets);
    let config = ConfiguratorConfig {
        engraving: EngravingConfig {
            base_resolution: 64,
            min_font_px: 8.0,
            font_step_px: 2.0,
            ..EngravingConfig::default()
        },
        ..ConfiguratorConfig::default()
    };
    ConfiguratorSession::new(config, assets, materials, scene)
}
