use crate::{Record, RecordType, Result, Schema};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

/// Cache of the schemas built so far, keyed by record type.
///
/// A schema is built once, on the first request for its type. Concurrent
/// first requests for the same type wait for the build in progress and get
/// the same `Arc<Schema>`. Builds of different types do not wait on each
/// other. A failed build stores nothing, the next request tries again.
#[derive(Default, Debug)]
pub struct Registry {
    schemas: RwLock<HashMap<TypeId, Arc<Schema>>>,
    building: Mutex<HashMap<TypeId, Arc<Mutex<()>>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TypeId) -> Option<Arc<Schema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn contains<R: Record>(&self) -> bool {
        self.get(R::RECORD_TYPE.type_id()).is_some()
    }

    pub fn schema_of<R: Record>(&self) -> Result<Arc<Schema>> {
        self.schema_for(R::RECORD_TYPE)
    }

    pub fn schema_for(&self, record: RecordType) -> Result<Arc<Schema>> {
        let id = record.type_id();
        if let Some(schema) = self.get(id) {
            return Ok(schema);
        }
        let slot = self
            .building
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone();
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = self.get(id) {
            return Ok(schema);
        }
        let schema = Arc::new(Schema::build(record, |id| self.get(id))?);
        log::debug!(
            "Registered `{}` as table `{}` with {} columns",
            schema.record,
            schema.table,
            schema.columns.len()
        );
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, schema.clone());
        self.building
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
