// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identity and geometric references.
//!
//! A [`Reference`] points at the element a ray struck. Walls hosted directly
//! in a document are referenced by their own id with an invalid linked id.
//! Walls living inside a linked document are referenced through the link
//! instance: `element_id` is the link instance and `linked_element_id` is the
//! wall inside the linked document.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an element within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ElementId(pub i64);

impl ElementId {
    /// Sentinel for "no element".
    pub const INVALID: ElementId = ElementId(-1);

    #[inline]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> i64 {
        self.0
    }

    /// Returns true unless this is the [`ElementId::INVALID`] sentinel.
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Structural identity of a referenced element: the pair
/// `(element_id, linked_element_id)`.
///
/// Two references with the same key denote the same wall no matter which
/// face produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceKey {
    pub element_id: ElementId,
    pub linked_element_id: ElementId,
}

/// Reference to a struck element, optionally down to one of its faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    /// Element in the host document (a wall, or a link instance).
    pub element_id: ElementId,
    /// Element inside the linked document, or [`ElementId::INVALID`].
    pub linked_element_id: ElementId,
    /// Index of the struck face on the element's solid, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub face_index: Option<u32>,
}

impl Reference {
    /// Reference to an element living in the host document.
    pub fn element(element_id: ElementId) -> Self {
        Self {
            element_id,
            linked_element_id: ElementId::INVALID,
            face_index: None,
        }
    }

    /// Reference to `linked_element_id` seen through `link_instance_id`.
    pub fn linked(link_instance_id: ElementId, linked_element_id: ElementId) -> Self {
        Self {
            element_id: link_instance_id,
            linked_element_id,
            face_index: None,
        }
    }

    pub fn with_face(mut self, face_index: u32) -> Self {
        self.face_index = Some(face_index);
        self
    }

    /// Drops face information, leaving an element reference.
    pub fn to_element_reference(self) -> Self {
        Self {
            face_index: None,
            ..self
        }
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked_element_id.is_valid()
    }

    #[inline]
    pub fn key(&self) -> ReferenceKey {
        ReferenceKey {
            element_id: self.element_id,
            linked_element_id: self.linked_element_id,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            write!(f, "{}:{}", self.element_id, self.linked_element_id)?;
        } else {
            write!(f, "{}", self.element_id)?;
        }
        if let Some(face) = self.face_index {
            write!(f, "/face{}", face)?;
        }
        Ok(())
    }
}
