//! The model registry.
//!
//! Assembly allocates an empty cell first and hands out [`RegistryView`]s
//! (weak handles) to everything that needs to see the finished models: type
//! thunks, field factories, and the models themselves. The cell is populated
//! exactly once at the end of assembly and never changes afterwards.

use super::model::InitialisedModel;
use super::relationship::RelationDef;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::{Arc, Weak};

pub(crate) struct RegistryData {
    pub(crate) models: IndexMap<String, Arc<InitialisedModel>>,
    pub(crate) relations: Vec<RelationDef>,
}

type Cell = OnceCell<Arc<RegistryData>>;

/// An allocated but not yet published registry.
pub(crate) struct RegistryCell {
    cell: Arc<Cell>,
}

impl RegistryCell {
    pub(crate) fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub(crate) fn view(&self) -> RegistryView {
        RegistryView {
            cell: Arc::downgrade(&self.cell),
        }
    }

    /// Populate the cell and hand back the owning registry.
    pub(crate) fn publish(self, data: RegistryData) -> Registry {
        let data = self.cell.get_or_init(|| Arc::new(data)).clone();
        Registry {
            cell: self.cell,
            data,
        }
    }
}

/// The assembled, immutable set of models.
///
/// Cloning is cheap. Every clone shares the same models.
#[derive(Clone)]
pub struct Registry {
    cell: Arc<Cell>,
    data: Arc<RegistryData>,
}

impl Registry {
    /// All models in declaration order.
    pub fn models(&self) -> &IndexMap<String, Arc<InitialisedModel>> {
        &self.data.models
    }

    /// A model by key.
    pub fn get(&self, key: &str) -> Option<&Arc<InitialisedModel>> {
        self.data.models.get(key)
    }

    /// A model by key, failing if it does not exist.
    pub fn model(&self, key: &str) -> Result<&Arc<InitialisedModel>> {
        self.get(key).ok_or_else(|| Error::UnknownModel(key.to_string()))
    }

    /// Every resolved relationship.
    pub fn relations(&self) -> &[RelationDef] {
        &self.data.relations
    }

    /// A weak read view of this registry.
    pub fn view(&self) -> RegistryView {
        RegistryView {
            cell: Arc::downgrade(&self.cell),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("models", &self.data.models.keys().collect::<Vec<_>>())
            .field("relations", &self.data.relations.len())
            .finish()
    }
}

/// A weak, read-only handle to a registry that may not be populated yet.
#[derive(Clone)]
pub struct RegistryView {
    cell: Weak<Cell>,
}

impl RegistryView {
    fn data(&self) -> Result<Arc<RegistryData>> {
        let cell = self.cell.upgrade().ok_or(Error::RegistryUnavailable)?;
        cell.get().cloned().ok_or(Error::RegistryNotReady)
    }

    /// Whether the registry has been populated.
    pub fn is_ready(&self) -> bool {
        self.data().is_ok()
    }

    /// A model by key.
    pub fn model(&self, key: &str) -> Result<Arc<InitialisedModel>> {
        self.data()?
            .models
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownModel(key.to_string()))
    }

    /// Keys of all models.
    pub fn model_keys(&self) -> Result<Vec<String>> {
        Ok(self.data()?.models.keys().cloned().collect())
    }
}

impl fmt::Debug for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryView")
            .field("ready", &self.is_ready())
            .finish()
    }
}
