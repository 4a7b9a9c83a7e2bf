use serde::{Deserialize, Serialize};
use shapecast_schema::{SchemaNode, SchemaRegistry};
use shapecast_transform::{Transformer, Value};
use uuid::Uuid;

use crate::error::TaskStoreError;
use crate::schemas::{self, TASK};

/// One entry of a [`TaskStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub label: String,
    pub done: bool,
}

/// Ordered, in-memory task list. Every operation addresses tasks by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, not yet done task and return its fresh id.
    pub fn add(&mut self, label: impl Into<String>) -> Uuid {
        let task = Task {
            id: Uuid::new_v4(),
            label: label.into(),
            done: false,
        };
        let id = task.id;
        tracing::debug!(%id, "task added");
        self.tasks.push(task);
        id
    }

    /// Remove the task with `id`. Returns the removed task, if there was one.
    pub fn remove(&mut self, id: Uuid) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(position))
    }

    /// Flip the done flag of the task with `id` and return the new state.
    /// Unknown ids leave the store untouched.
    pub fn toggle_done(&mut self, id: Uuid) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.done = !task.done;
        Some(task.done)
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// External JSON form of the store, checked against the `Task` type.
    pub fn to_value(&self) -> Result<serde_json::Value, TaskStoreError> {
        self.to_value_with(schemas::registry())
    }

    pub fn to_value_with(
        &self,
        registry: &SchemaRegistry,
    ) -> Result<serde_json::Value, TaskStoreError> {
        let internal = Value::from(serde_json::to_value(&self.tasks)?);
        let external = Transformer::new(registry).encode(&internal, &task_list())?;
        Ok(external.to_json())
    }

    /// Rebuild a store from its external JSON form.
    pub fn from_value(raw: &serde_json::Value) -> Result<Self, TaskStoreError> {
        Self::from_value_with(raw, schemas::registry())
    }

    pub fn from_value_with(
        raw: &serde_json::Value,
        registry: &SchemaRegistry,
    ) -> Result<Self, TaskStoreError> {
        let decoded = Transformer::new(registry).decode(&Value::from(raw), &task_list())?;

        let mut tasks = Vec::new();
        for entry in decoded.as_array().map(Vec::as_slice).unwrap_or_default() {
            let id = entry.get("id").and_then(Value::as_str).unwrap_or_default();
            let id = Uuid::parse_str(id).map_err(|_| TaskStoreError::InvalidId(id.to_string()))?;
            tasks.push(Task {
                id,
                label: entry.get("label").and_then(Value::as_str).unwrap_or_default().to_string(),
                done: entry.get("done").and_then(Value::as_bool).unwrap_or_default(),
            });
        }
        Ok(Self { tasks })
    }
}

fn task_list() -> SchemaNode {
    SchemaNode::array(SchemaNode::reference(TASK))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn add_assigns_distinct_ids_in_order() {
        let mut store = TaskStore::new();
        let first = store.add("write tests");
        let second = store.add("ship");

        assert_ne!(first, second);
        let labels: Vec<&str> = store.tasks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["write tests", "ship"]);
        assert!(store.tasks().iter().all(|t| !t.done));
    }

    #[test]
    fn remove_by_id() {
        let mut store = TaskStore::new();
        let keep = store.add("keep");
        let drop = store.add("drop");

        let removed = store.remove(drop).unwrap();
        assert_eq!(removed.label, "drop");
        assert_eq!(store.len(), 1);
        assert!(store.get(keep).is_some());
        assert!(store.remove(drop).is_none());
    }

    #[test]
    fn toggle_done_flips_and_ignores_unknown_ids() {
        let mut store = TaskStore::new();
        let id = store.add("task");

        assert_eq!(store.toggle_done(id), Some(true));
        assert_eq!(store.toggle_done(id), Some(false));
        assert_eq!(store.toggle_done(Uuid::new_v4()), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn external_form_round_trips() {
        let mut store = TaskStore::new();
        let id = store.add("first");
        store.add("second");
        store.toggle_done(id);

        let external = store.to_value().unwrap();
        assert_eq!(external[0]["done"], json!(true));
        assert_eq!(external[0]["id"], json!(id.to_string()));

        let restored = TaskStore::from_value(&external).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn from_value_rejects_malformed_tasks() {
        let missing_done = json!([{"id": Uuid::new_v4().to_string(), "label": "x"}]);
        assert!(matches!(
            TaskStore::from_value(&missing_done),
            Err(TaskStoreError::Transform(_))
        ));

        let bad_id = json!([{"id": "abc", "label": "x", "done": false}]);
        assert!(matches!(
            TaskStore::from_value(&bad_id),
            Err(TaskStoreError::InvalidId(id)) if id == "abc"
        ));
    }
}
