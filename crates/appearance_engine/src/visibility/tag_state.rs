//! Active tag state

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ENGRAVING_TAG;

/// Tags the user has switched on, plus the engraving text
///
/// Tags can be toggled independently or driven to a single value by an
/// exclusive option selection. The `engraving` tag is derived: it is active
/// exactly when the engraving text has non-whitespace content, whatever the
/// manual toggles say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagState {
    active_tags: BTreeSet<String>,
    engraving_text: String,
}

impl TagState {
    /// Empty state: no tags, no engraving
    pub fn new() -> Self {
        Self::default()
    }

    /// State with the given tags switched on
    pub fn with_tags<I>(tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut state = Self::new();
        for tag in tags {
            state.activate(tag);
        }
        state
    }

    /// Switch a tag on
    pub fn activate(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if tag != ENGRAVING_TAG {
            self.active_tags.insert(tag);
        }
    }

    /// Switch a tag off
    pub fn deactivate(&mut self, tag: &str) {
        self.active_tags.remove(tag);
    }

    /// Flip a tag; returns the new state of the tag
    pub fn toggle(&mut self, tag: &str) -> bool {
        if tag == ENGRAVING_TAG {
            log::debug!("Ignoring manual toggle of the derived '{ENGRAVING_TAG}' tag");
            return self.has_engraving();
        }
        if self.active_tags.remove(tag) {
            false
        } else {
            self.active_tags.insert(tag.to_string());
            true
        }
    }

    /// Exclusive selection: clear every tag, then activate `option`
    pub fn set_option(&mut self, option: &str) {
        self.active_tags.clear();
        self.activate(option);
    }

    /// Replace the engraving text
    pub fn set_engraving_text(&mut self, text: impl Into<String>) {
        self.engraving_text = text.into();
    }

    /// Current engraving text
    pub fn engraving_text(&self) -> &str {
        &self.engraving_text
    }

    /// Whether the engraving text has visible content
    pub fn has_engraving(&self) -> bool {
        !self.engraving_text.trim().is_empty()
    }

    /// Whether a tag is active, counting the derived engraving tag
    pub fn is_active(&self, tag: &str) -> bool {
        if tag == ENGRAVING_TAG {
            self.has_engraving()
        } else {
            self.active_tags.contains(tag)
        }
    }

    /// Active tags including the derived engraving tag
    pub fn active_tags(&self) -> BTreeSet<&str> {
        let mut tags: BTreeSet<&str> = self.active_tags.iter().map(String::as_str).collect();
        if self.has_engraving() {
            tags.insert(ENGRAVING_TAG);
        }
        tags
    }
}

/// Serializable view of the selection, handed to the persistence sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSnapshot {
    /// Active tags including the derived engraving tag
    pub active_tags: Vec<String>,
    /// Active material option per mesh
    pub materials: BTreeMap<String, String>,
    /// Engraving text
    pub engraving_text: String,
}

impl TagSnapshot {
    /// Capture tag state and the active material options
    pub fn capture(state: &TagState, materials: &BTreeMap<String, String>) -> Self {
        Self {
            active_tags: state.active_tags().into_iter().map(str::to_string).collect(),
            materials: materials.clone(),
            engraving_text: state.engraving_text().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_tags() {
        let mut state = TagState::new();
        assert!(state.toggle("mlok"));
        assert!(state.is_active("mlok"));
        assert!(!state.toggle("mlok"));
        assert!(!state.is_active("mlok"));
    }

    #[test]
    fn test_set_option_is_exclusive() {
        let mut state = TagState::with_tags(["mlok", "trim"]);
        state.set_option("picatinny");
        assert_eq!(state.active_tags().into_iter().collect::<Vec<_>>(), vec!["picatinny"]);
    }

    #[test]
    fn test_engraving_tag_is_derived_from_text() {
        let mut state = TagState::new();
        state.toggle(ENGRAVING_TAG);
        assert!(!state.is_active(ENGRAVING_TAG));

        state.set_engraving_text("  ");
        assert!(!state.is_active(ENGRAVING_TAG));

        state.set_engraving_text("AB");
        assert!(state.is_active(ENGRAVING_TAG));

        // Exclusive selection does not clear a derived tag
        state.set_option("mlok");
        assert!(state.active_tags().contains(ENGRAVING_TAG));
    }

    #[test]
    fn test_snapshot_capture() {
        let mut state = TagState::with_tags(["mlok"]);
        state.set_engraving_text("XY");
        let mut materials = BTreeMap::new();
        materials.insert("grip_mlok".to_string(), "sand".to_string());

        let snapshot = TagSnapshot::capture(&state, &materials);
        assert_eq!(snapshot.active_tags, vec!["engraving", "mlok"]);
        assert_eq!(snapshot.materials["grip_mlok"], "sand");
        assert_eq!(snapshot.engraving_text, "XY");
    }
}
