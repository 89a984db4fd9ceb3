//! Tag-driven mesh visibility
//!
//! A mesh entry is visible when any of its tags is active. Entries tagged
//! `engraving` are additionally hidden while the engraving text is blank,
//! regardless of their other tags.

mod tag_state;

pub use tag_state::{TagSnapshot, TagState};

use std::collections::BTreeMap;

use crate::assets::{AssetCatalog, MeshEntry};

/// Tag marking surfaces that receive the engraving maps
pub const ENGRAVING_TAG: &str = "engraving";

/// Mesh id → enabled
pub type VisibilityMap = BTreeMap<String, bool>;

/// Visibility of a single mesh entry
pub fn is_entry_visible(entry: &MeshEntry, tags: &TagState) -> bool {
    if entry.has_tag(ENGRAVING_TAG) && !tags.has_engraving() {
        return false;
    }
    entry.tags.iter().any(|tag| tags.is_active(tag))
}

/// Decide which mesh entries are enabled
///
/// Unknown tags and empty catalogs simply produce hidden entries.
pub fn resolve_visibility(catalog: &AssetCatalog, tags: &TagState) -> VisibilityMap {
    let visibility: VisibilityMap = catalog
        .mesh_entries()
        .map(|(mesh_id, entry)| (mesh_id.to_string(), is_entry_visible(entry, tags)))
        .collect();

    log::debug!(
        "Resolved visibility for {} mesh entries ({} visible)",
        visibility.len(),
        visibility.values().filter(|visible| **visible).count()
    );
    visibility
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Part;

    fn catalog() -> AssetCatalog {
        let mut part = Part::default();
        part.meshes.insert("base".into(), MeshEntry::new(["slot1"], ["base", "optionalTrim"]));
        part.meshes.insert("mlok".into(), MeshEntry::new(["slot1"], ["mlok"]));
        part.meshes.insert("plate".into(), MeshEntry::new(["slot1"], [ENGRAVING_TAG, "mlok"]));
        part.meshes.insert("untagged".into(), MeshEntry::new(["slot1"], Vec::<String>::new()));
        AssetCatalog::default().with_part("part_model", part)
    }

    #[test]
    fn test_any_matching_tag_shows_entry() {
        let visibility = resolve_visibility(&catalog(), &TagState::with_tags(["optionalTrim"]));
        assert!(visibility["base"]);
        assert!(!visibility["mlok"]);
        assert!(!visibility["untagged"]);
    }

    #[test]
    fn test_disjoint_tags_hide_everything() {
        let visibility = resolve_visibility(&catalog(), &TagState::with_tags(["unknown", "other"]));
        assert!(visibility.values().all(|visible| !visible));
    }

    #[test]
    fn test_engraving_entries_need_text() {
        let mut tags = TagState::with_tags(["mlok"]);
        let visibility = resolve_visibility(&catalog(), &tags);
        assert!(visibility["mlok"]);
        assert!(!visibility["plate"], "blank engraving hides the plate despite 'mlok'");

        tags.set_engraving_text(" \t ");
        assert!(!resolve_visibility(&catalog(), &tags)["plate"]);

        tags.set_engraving_text("AB");
        assert!(resolve_visibility(&catalog(), &tags)["plate"]);
    }

    #[test]
    fn test_engraving_text_alone_shows_plate() {
        let mut tags = TagState::new();
        tags.set_engraving_text("AB");
        let visibility = resolve_visibility(&catalog(), &tags);
        assert!(visibility["plate"]);
        assert!(!visibility["mlok"]);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(resolve_visibility(&AssetCatalog::default(), &TagState::with_tags(["a"])).is_empty());
    }
}
