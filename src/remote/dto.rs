use serde::Serialize;

use crate::models::Todo;

/// Request body for POST and PUT. The store rejects `_id` echoed back in a body.
#[derive(Debug, Serialize)]
pub struct TodoPayload<'a> {
    pub title: &'a str,
    pub notes: &'a str,
    pub when: &'a str,
    #[serde(rename = "dueBy")]
    pub due_by: &'a str,
}

impl<'a> From<&'a Todo> for TodoPayload<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            title: &todo.title,
            notes: &todo.notes,
            when: &todo.when,
            due_by: &todo.due_by,
        }
    }
}
