// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model documents and the set of open documents.
//!
//! A [`Document`] keeps one [`ElementTable`] per element kind. Tables keep
//! insertion order (collection order matters for deterministic processing)
//! and an id index for O(1) lookup.

use crate::elements::{
    Element, FamilyInstance, FamilySymbol, Level, LinkInstance, MepCurve, View3D, Wall,
};
use crate::error::{Error, Result};
use crate::ids::ElementId;
use rustc_hash::{FxHashMap, FxHashSet};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered element storage with id lookup
#[derive(Debug, Clone)]
pub struct ElementTable<T> {
    items: Vec<T>,
    index: FxHashMap<ElementId, usize>,
}

impl<T: Element> ElementTable<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Insert an element, rejecting ids already present in this table
    pub fn insert(&mut self, item: T) -> std::result::Result<(), ElementId> {
        let id = item.id();
        if self.index.contains_key(&id) {
            return Err(id);
        }
        self.index.insert(id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut T> {
        self.index.get(&id).map(|&i| &mut self.items[i])
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.items.iter().map(Element::id)
    }
}

impl<T: Element> Default for ElementTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a ElementTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "serde")]
impl<T: Serialize> Serialize for ElementTable<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: Deserialize<'de> + Element> Deserialize<'de> for ElementTable<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut table = Self::new();
        for item in items {
            table.insert(item).map_err(|id| {
                serde::de::Error::custom(format!("duplicate element id {}", id))
            })?;
        }
        Ok(table)
    }
}

/// One open model.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Document {
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: ElementTable<Level>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub walls: ElementTable<Wall>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mep_curves: ElementTable<MepCurve>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub family_symbols: ElementTable<FamilySymbol>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub views: ElementTable<View3D>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: ElementTable<LinkInstance>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub instances: ElementTable<FamilyInstance>,
}

macro_rules! adder {
    ($name:ident, $field:ident, $ty:ty) => {
        pub fn $name(&mut self, item: $ty) -> Result<ElementId> {
            let id = item.id();
            self.check_new_id(id)?;
            self.$field
                .insert(item)
                .map_err(|id| Error::DuplicateElementId(id, self.title.clone()))?;
            Ok(id)
        }
    };
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    adder!(add_level, levels, Level);
    adder!(add_wall, walls, Wall);
    adder!(add_mep_curve, mep_curves, MepCurve);
    adder!(add_family_symbol, family_symbols, FamilySymbol);
    adder!(add_view, views, View3D);
    adder!(add_link, links, LinkInstance);
    adder!(add_instance, instances, FamilyInstance);

    /// Whether any table holds `id`
    pub fn contains_id(&self, id: ElementId) -> bool {
        self.levels.contains(id)
            || self.walls.contains(id)
            || self.mep_curves.contains(id)
            || self.family_symbols.contains(id)
            || self.views.contains(id)
            || self.links.contains(id)
            || self.instances.contains(id)
    }

    fn check_new_id(&self, id: ElementId) -> Result<()> {
        if !id.is_valid() {
            return Err(Error::InvalidElementId(id));
        }
        if self.contains_id(id) {
            return Err(Error::DuplicateElementId(id, self.title.clone()));
        }
        Ok(())
    }

    /// Next unused element id (one past the largest id in the document)
    pub fn next_element_id(&self) -> ElementId {
        let max = self
            .levels
            .ids()
            .chain(self.walls.ids())
            .chain(self.mep_curves.ids())
            .chain(self.family_symbols.ids())
            .chain(self.views.ids())
            .chain(self.links.ids())
            .chain(self.instances.ids())
            .map(ElementId::value)
            .max()
            .unwrap_or(0);
        ElementId(max.max(0) + 1)
    }

    /// Check cross-table id uniqueness and wall geometry.
    ///
    /// Deserialization only guarantees uniqueness within each table.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        let all = self
            .levels
            .ids()
            .chain(self.walls.ids())
            .chain(self.mep_curves.ids())
            .chain(self.family_symbols.ids())
            .chain(self.views.ids())
            .chain(self.links.ids())
            .chain(self.instances.ids());
        for id in all {
            if !id.is_valid() {
                return Err(Error::InvalidElementId(id));
            }
            if !seen.insert(id) {
                return Err(Error::DuplicateElementId(id, self.title.clone()));
            }
        }
        for wall in &self.walls {
            wall.validate()?;
        }
        Ok(())
    }

    pub fn wall(&self, id: ElementId) -> Option<&Wall> {
        self.walls.get(id)
    }

    pub fn level(&self, id: ElementId) -> Option<&Level> {
        self.levels.get(id)
    }

    pub fn link(&self, id: ElementId) -> Option<&LinkInstance> {
        self.links.get(id)
    }
}

/// Access to documents placed into another through link instances.
pub trait LinkedDocuments {
    /// Document whose title matches exactly.
    fn linked_document(&self, title: &str) -> Option<&Document>;
}

/// No links available.
impl LinkedDocuments for () {
    fn linked_document(&self, _title: &str) -> Option<&Document> {
        None
    }
}

/// The set of documents open in the host application.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Project {
    pub documents: Vec<Document>,
}

impl Project {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// First document whose title contains `needle`
    pub fn find_by_title_substring(&self, needle: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.title.contains(needle))
    }

    pub fn position_by_title(&self, title: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.title == title)
    }

    pub fn document(&self, title: &str) -> Result<&Document> {
        self.documents
            .iter()
            .find(|d| d.title == title)
            .ok_or_else(|| Error::DocumentNotFound(title.to_string()))
    }
}

impl LinkedDocuments for Project {
    fn linked_document(&self, title: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.title == title)
    }
}
