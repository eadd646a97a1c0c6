// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-application services used by the pipeline.
//!
//! A host creates family instances and runs all of it inside one
//! transaction. [`crate::session::ModelSession`] is the in-memory host.

use crate::error::Result;
use mep_holes_core::{ElementId, ParameterValue, Reference};
use nalgebra::Point3;
use std::ops::{Deref, DerefMut};

/// Creates opening instances in the destination document
pub trait OpeningPlacer {
    /// Place `symbol` at `point`, hosted by `host` on `level`
    fn new_family_instance(
        &mut self,
        point: Point3<f64>,
        symbol: ElementId,
        host: Reference,
        level: ElementId,
    ) -> Result<ElementId>;

    /// Set an instance parameter on a placed instance
    fn set_parameter(&mut self, instance: ElementId, name: &str, value: ParameterValue)
        -> Result<()>;
}

/// All-or-nothing unit of model changes
pub trait TransactionHost {
    fn start(&mut self, name: &str) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    /// Discard every change since `start`
    fn roll_back(&mut self);
}

/// Open transaction that rolls back on drop unless committed
pub struct TransactionGuard<'a, H: TransactionHost + ?Sized> {
    host: &'a mut H,
    committed: bool,
}

impl<'a, H: TransactionHost + ?Sized> TransactionGuard<'a, H> {
    pub fn start(host: &'a mut H, name: &str) -> Result<Self> {
        host.start(name)?;
        tracing::debug!(transaction = name, "Transaction started");
        Ok(Self {
            host,
            committed: false,
        })
    }

    pub fn commit(mut self) -> Result<()> {
        self.host.commit()?;
        self.committed = true;
        Ok(())
    }
}

impl<H: TransactionHost + ?Sized> Deref for TransactionGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: TransactionHost + ?Sized> DerefMut for TransactionGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: TransactionHost + ?Sized> Drop for TransactionGuard<'_, H> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::warn!("Transaction not committed, rolling back");
            self.host.roll_back();
        }
    }
}
