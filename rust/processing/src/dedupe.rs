// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intersection deduplication
//!
//! A ray through a wall reports one hit per crossed face. Hits are collapsed
//! to one per [`ReferenceKey`], keeping the first occurrence.

use mep_holes_core::ReferenceKey;
use mep_holes_geometry::ReferenceWithContext;
use rustc_hash::FxHashSet;
use std::ops::Deref;

/// Hit that is the only one for its reference key in a deduplicated list
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueHit(ReferenceWithContext);

impl UniqueHit {
    #[inline]
    pub fn key(&self) -> ReferenceKey {
        self.0.reference.key()
    }

    pub fn into_inner(self) -> ReferenceWithContext {
        self.0
    }
}

impl Deref for UniqueHit {
    type Target = ReferenceWithContext;

    fn deref(&self) -> &ReferenceWithContext {
        &self.0
    }
}

/// Keep the first hit of each reference key, preserving input order
pub fn dedupe<I>(hits: I) -> Vec<UniqueHit>
where
    I: IntoIterator<Item = ReferenceWithContext>,
{
    let mut seen: FxHashSet<ReferenceKey> = FxHashSet::default();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.reference.key()))
        .map(UniqueHit)
        .collect()
}
