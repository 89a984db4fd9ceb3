//! Parent/child material resolution
//!
//! A property's effective value is the first own value found walking from
//! the material up its parent chain, falling back to the built-in default.
//! Missing materials, missing parents and cycles all end the walk early;
//! nothing here fails.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::assets::{MaterialCatalog, MaterialDefinition};

use super::{PropertyName, PropertyValue};

/// Chains longer than this are cut off
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Where an effective value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Stored on the material itself
    Own,
    /// Stored on the named ancestor
    Inherited(String),
    /// Built-in default
    Default,
}

/// Effective property set of a material
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterial {
    values: BTreeMap<PropertyName, PropertyValue>,
    sources: BTreeMap<PropertyName, ValueSource>,
}

impl Default for ResolvedMaterial {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ResolvedMaterial {
    /// Every property at its built-in default
    pub fn defaults() -> Self {
        Self {
            values: PropertyName::ALL
                .iter()
                .map(|name| (*name, name.default_value()))
                .collect(),
            sources: PropertyName::ALL
                .iter()
                .map(|name| (*name, ValueSource::Default))
                .collect(),
        }
    }

    /// Effective value of a property
    pub fn get(&self, property: PropertyName) -> &PropertyValue {
        // Every recognized property is always present
        &self.values[&property]
    }

    /// Where the effective value of a property came from
    pub fn source(&self, property: PropertyName) -> &ValueSource {
        &self.sources[&property]
    }

    /// Iterate over every effective value
    pub fn iter(&self) -> impl Iterator<Item = (PropertyName, &PropertyValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

/// The material followed by its ancestors, child first
///
/// The walk stops at a missing material, a repeated name (cycle) or
/// [`MAX_CHAIN_DEPTH`] entries.
pub fn parent_chain<'a>(name: &'a str, catalog: &'a MaterialCatalog) -> Vec<(&'a str, &'a MaterialDefinition)> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = name;

    loop {
        let Some(definition) = catalog.get(current) else {
            if current == name {
                log::debug!("Material '{name}' not in catalog, using defaults");
            } else {
                log::warn!("Material '{name}': parent '{current}' not in catalog");
            }
            break;
        };
        if !visited.insert(current) {
            log::warn!("Material '{name}': parent cycle at '{current}', treating as no parent");
            break;
        }
        chain.push((current, definition));
        if chain.len() >= MAX_CHAIN_DEPTH {
            log::warn!("Material '{name}': parent chain longer than {MAX_CHAIN_DEPTH}, truncating");
            break;
        }
        match definition.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    chain
}

/// The parent actually used for resolution
///
/// `None` when the material has no parent, the parent is missing, or the
/// link closes a cycle.
pub fn effective_parent<'a>(name: &'a str, catalog: &'a MaterialCatalog) -> Option<&'a str> {
    parent_chain(name, catalog).get(1).map(|(parent, _)| *parent)
}

/// Compute the effective property set of a material
pub fn resolve_effective(name: &str, catalog: &MaterialCatalog) -> ResolvedMaterial {
    let chain = parent_chain(name, catalog);
    let mut resolved = ResolvedMaterial::defaults();

    for property in PropertyName::ALL {
        let found = chain
            .iter()
            .enumerate()
            .find_map(|(depth, (owner, definition))| {
                definition.own(property).map(|value| (depth, *owner, value))
            });

        if let Some((depth, owner, value)) = found {
            let source = if depth == 0 {
                ValueSource::Own
            } else {
                ValueSource::Inherited(owner.to_string())
            };
            resolved.values.insert(property, value.clone());
            resolved.sources.insert(property, source);
        }
    }
    resolved
}

/// Effective values of the material's parent, or the defaults without one
pub fn resolve_parent(name: &str, catalog: &MaterialCatalog) -> ResolvedMaterial {
    effective_parent(name, catalog)
        .map_or_else(ResolvedMaterial::defaults, |parent| resolve_effective(parent, catalog))
}

/// A value removed by demoting a property, kept so the next promotion can restore it
#[derive(Debug, Clone, PartialEq)]
struct StashedValue {
    value: PropertyValue,
    revision: u64,
}

/// Which properties of the selected material are stored on it directly
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndependenceSet {
    properties: BTreeSet<PropertyName>,
    stash: BTreeMap<PropertyName, StashedValue>,
    // Own values that already existed when promoted, by catalog revision
    kept: BTreeMap<PropertyName, u64>,
}

impl IndependenceSet {
    /// Whether a property is independent
    pub fn contains(&self, property: PropertyName) -> bool {
        self.properties.contains(&property)
    }

    /// Independent properties in display order
    pub fn iter(&self) -> impl Iterator<Item = PropertyName> + '_ {
        self.properties.iter().copied()
    }

    /// Number of independent properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is independent
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn insert(&mut self, property: PropertyName) {
        self.properties.insert(property);
    }

    fn remove(&mut self, property: PropertyName) {
        self.properties.remove(&property);
    }
}

impl FromIterator<PropertyName> for IndependenceSet {
    fn from_iter<I: IntoIterator<Item = PropertyName>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
            stash: BTreeMap::new(),
            kept: BTreeMap::new(),
        }
    }
}

/// Compute which properties a material stores independently of its parent
///
/// Without a parent every recognized property is independent. With one, a
/// property is independent when the material defines it and the value
/// differs from the parent's effective value.
pub fn compute_independence(name: &str, catalog: &MaterialCatalog) -> IndependenceSet {
    let Some(definition) = catalog.get(name) else {
        return IndependenceSet::default();
    };
    if effective_parent(name, catalog).is_none() {
        return PropertyName::ALL.into_iter().collect();
    }

    let parent = resolve_parent(name, catalog);
    definition
        .own_values()
        .filter(|(property, value)| parent.get(*property) != *value)
        .map(|(property, _)| property)
        .collect()
}

/// Switch a property between independent and inherited
///
/// Demoting deletes the material's own value so the parent's value shows
/// through. Promoting writes the current effective value onto the material,
/// leaving the appearance unchanged; if the previous call demoted the same
/// property and the catalog has not changed since, the removed value is
/// restored instead. A stored value that merely matches the parent is left
/// in place by a promotion, and the demotion that immediately follows keeps
/// it. Returns the new independence of the property.
pub fn toggle_independence(
    name: &str,
    property: PropertyName,
    catalog: &mut MaterialCatalog,
    independence: &mut IndependenceSet,
) -> bool {
    if !catalog.contains(name) {
        log::warn!("Cannot toggle {property} on unknown material '{name}'");
        return false;
    }
    if effective_parent(name, catalog).is_none() {
        // Nothing to inherit from
        independence.insert(property);
        return true;
    }

    if independence.contains(property) {
        independence.remove(property);
        if independence.kept.remove(&property) == Some(catalog.revision()) {
            log::debug!("Material '{name}': {property} inherited, own value kept");
            return false;
        }
        if let Some(value) = catalog.clear_property(name, property) {
            let revision = catalog.revision();
            independence.stash.insert(property, StashedValue { value, revision });
        }
        log::debug!("Material '{name}': {property} now inherited");
        false
    } else {
        promote(name, property, catalog, independence);
        true
    }
}

fn promote(
    name: &str,
    property: PropertyName,
    catalog: &mut MaterialCatalog,
    independence: &mut IndependenceSet,
) {
    let revision = catalog.revision();
    let stashed = independence.stash.remove(&property);
    if catalog.get(name).is_some_and(|definition| definition.has_own(property)) {
        // Already stored, equal to the parent's value
        independence.kept.insert(property, revision);
    } else {
        let value = match stashed {
            Some(stashed) if stashed.revision == revision => stashed.value,
            _ => resolve_effective(name, catalog).get(property).clone(),
        };
        catalog.set_property(name, property, value);
    }
    independence.insert(property);
    log::debug!("Material '{name}': {property} now independent");
}

/// Write a property edit onto a material
///
/// Materials without a parent take the value directly. With a parent, an
/// inherited property is first promoted to independent, then written.
/// Returns `false` when the edit was ignored (unknown material or a value
/// of the wrong kind).
pub fn apply_edit(
    name: &str,
    property: PropertyName,
    value: PropertyValue,
    catalog: &mut MaterialCatalog,
    independence: &mut IndependenceSet,
) -> bool {
    if !value.matches(property.kind()) {
        log::warn!("Ignoring edit of {property} on '{name}': {value} has the wrong kind");
        return false;
    }
    if !catalog.contains(name) {
        log::warn!("Ignoring edit of {property} on unknown material '{name}'");
        return false;
    }

    if effective_parent(name, catalog).is_some() && !independence.contains(property) {
        promote(name, property, catalog, independence);
    }
    independence.stash.remove(&property);
    independence.kept.remove(&property);
    independence.insert(property);
    catalog.set_property(name, property, value)
}
