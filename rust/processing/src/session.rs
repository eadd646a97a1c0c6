// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model session
//!
//! Owns a copy of the destination document. Instances created inside a
//! transaction are staged and only written to the document on commit, so a
//! rolled-back run leaves the document untouched.

use crate::error::{Error, Result};
use crate::host::{OpeningPlacer, TransactionHost};
use mep_holes_core::{
    Document, ElementId, FamilyInstance, FamilySymbol, ParameterSet, ParameterValue, Reference,
};
use nalgebra::Point3;

/// Destination document plus the changes of the open transaction
#[derive(Debug)]
pub struct ModelSession {
    document: Document,
    transaction: Option<String>,
    staged: Vec<FamilyInstance>,
    next_id: i64,
}

impl ModelSession {
    pub fn new(document: Document) -> Self {
        let next_id = document.next_element_id().value();
        Self {
            document,
            transaction: None,
            staged: Vec::new(),
            next_id,
        }
    }

    /// Committed state of the document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Instances created in the open transaction
    pub fn staged(&self) -> &[FamilyInstance] {
        &self.staged
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    fn require_transaction(&self) -> Result<()> {
        if self.transaction.is_none() {
            return Err(Error::Transaction("no transaction is open".into()));
        }
        Ok(())
    }

    fn symbol(&self, id: ElementId) -> Result<&FamilySymbol> {
        self.document
            .family_symbols
            .get(id)
            .ok_or(Error::SymbolNotFound(id))
    }

    fn validate_host(&self, host: &Reference) -> Result<()> {
        let valid = if host.is_linked() {
            self.document.link(host.element_id).is_some()
        } else {
            self.document.wall(host.element_id).is_some()
        };
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidHost(*host))
        }
    }
}

impl OpeningPlacer for ModelSession {
    fn new_family_instance(
        &mut self,
        point: Point3<f64>,
        symbol: ElementId,
        host: Reference,
        level: ElementId,
    ) -> Result<ElementId> {
        self.require_transaction()?;
        self.symbol(symbol)?;
        self.validate_host(&host)?;
        if self.document.level(level).is_none() {
            return Err(Error::UnknownLevel(level));
        }

        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.staged.push(FamilyInstance {
            id,
            symbol_id: symbol,
            host,
            level_id: level,
            location: point,
            parameters: ParameterSet::new(),
        });
        Ok(id)
    }

    fn set_parameter(&mut self, instance: ElementId, name: &str, value: ParameterValue) -> Result<()> {
        self.require_transaction()?;
        let index = self
            .staged
            .iter()
            .position(|i| i.id == instance)
            .ok_or(Error::InstanceNotFound(instance))?;

        let symbol_id = self.staged[index].symbol_id;
        if !self.symbol(symbol_id)?.defines_parameter(name) {
            return Err(Error::UndefinedParameter {
                instance,
                name: name.to_string(),
            });
        }
        self.staged[index].parameters.set(name, value);
        Ok(())
    }
}

impl TransactionHost for ModelSession {
    fn start(&mut self, name: &str) -> Result<()> {
        if let Some(open) = &self.transaction {
            return Err(Error::Transaction(format!(
                "cannot start '{}' while '{}' is open",
                name, open
            )));
        }
        self.transaction = Some(name.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.require_transaction()?;
        if let Some(clash) = self.staged.iter().find(|i| self.document.contains_id(i.id)) {
            return Err(Error::Transaction(format!(
                "instance id {} already used in '{}'",
                clash.id, self.document.title
            )));
        }

        let count = self.staged.len();
        for instance in self.staged.drain(..) {
            self.document.add_instance(instance)?;
        }
        let name = self.transaction.take().unwrap_or_default();
        tracing::info!(transaction = %name, instances = count, "Transaction committed");
        Ok(())
    }

    fn roll_back(&mut self) {
        let discarded = self.staged.len();
        self.staged.clear();
        self.next_id = self.document.next_element_id().value();
        if let Some(name) = self.transaction.take() {
            tracing::info!(transaction = %name, discarded, "Transaction rolled back");
        }
    }
}
