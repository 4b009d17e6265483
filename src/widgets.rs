// In-memory widget store
// Backs the demo binary and the integration tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::RequestContext;
use crate::error::ResourceError;
use crate::resource::{
    DeleteItem, GetCollection, GetItem, HandlerResult, PostCollection, PutItem, Resource,
};

#[derive(Debug, Deserialize)]
struct WidgetInput {
    name: String,
    #[serde(default)]
    quantity: u32,
}

/// Widgets keyed by identifier, served under `<prefix>widget`
#[derive(Debug, Default)]
pub struct WidgetResource {
    store: RwLock<BTreeMap<String, Value>>,
    next_id: AtomicU64,
}

impl WidgetResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given names
    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let resource = Self::new();
        if let Ok(mut store) = resource.store.write() {
            for name in names {
                let id = resource.allocate_id();
                store.insert(id.clone(), widget(&id, name, 0));
            }
        }
        resource
    }

    pub fn len(&self) -> usize {
        self.store.read().map_or(0, |store| store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

fn widget(id: &str, name: &str, quantity: u32) -> Value {
    json!({ "id": id, "name": name, "quantity": quantity })
}

fn parse_input(ctx: &RequestContext) -> Result<WidgetInput, ResourceError> {
    let input: WidgetInput = ctx.json_body()?;
    if input.name.trim().is_empty() {
        return Err(ResourceError::bad_request("name must not be empty"));
    }
    Ok(input)
}

fn poisoned<T>(_: PoisonError<T>) -> ResourceError {
    ResourceError::new("widget store unavailable")
}

fn missing(identifier: &str) -> ResourceError {
    ResourceError::not_found(format!("Widget '{identifier}' not found"))
}

impl GetCollection for WidgetResource {
    fn get_collection(&self, _ctx: &RequestContext) -> HandlerResult {
        let store = self.store.read().map_err(poisoned)?;
        Ok(Value::Array(store.values().cloned().collect()))
    }
}

impl PostCollection for WidgetResource {
    fn post_collection(&self, ctx: &RequestContext) -> HandlerResult {
        let input = parse_input(ctx)?;
        let mut store = self.store.write().map_err(poisoned)?;
        let id = self.allocate_id();
        let created = widget(&id, &input.name, input.quantity);
        store.insert(id, created.clone());
        Ok(created)
    }
}

impl GetItem for WidgetResource {
    fn get_item(&self, identifier: &str, _ctx: &RequestContext) -> HandlerResult {
        let store = self.store.read().map_err(poisoned)?;
        store.get(identifier).cloned().ok_or_else(|| missing(identifier))
    }
}

impl PutItem for WidgetResource {
    fn put_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult {
        let input = parse_input(ctx)?;
        let mut store = self.store.write().map_err(poisoned)?;
        let updated = widget(identifier, &input.name, input.quantity);
        store.insert(identifier.to_string(), updated.clone());
        Ok(updated)
    }
}

impl DeleteItem for WidgetResource {
    fn delete_item(&self, identifier: &str, _ctx: &RequestContext) -> HandlerResult {
        let mut store = self.store.write().map_err(poisoned)?;
        store
            .remove(identifier)
            .map(|_| json!({ "deleted": identifier }))
            .ok_or_else(|| missing(identifier))
    }
}

impl Resource for WidgetResource {
    fn as_get_collection(&self) -> Option<&dyn GetCollection> {
        Some(self)
    }

    fn as_post_collection(&self) -> Option<&dyn PostCollection> {
        Some(self)
    }

    fn as_get_item(&self) -> Option<&dyn GetItem> {
        Some(self)
    }

    fn as_put_item(&self) -> Option<&dyn PutItem> {
        Some(self)
    }

    fn as_delete_item(&self) -> Option<&dyn DeleteItem> {
        Some(self)
    }
}
