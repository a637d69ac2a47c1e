use crate::error::AppError;
use crate::models::{Todo, date_input_value};

/// The four inputs of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Notes,
    When,
    DueBy,
}

impl Field {
    pub fn is_date(self) -> bool {
        matches!(self, Field::When | Field::DueBy)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Notes => "notes",
            Field::When => "when",
            Field::DueBy => "due",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    pub notes: String,
    pub when: String,
    pub due_by: String,
}

impl Form {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.notes.is_empty() && self.when.is_empty() && self.due_by.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Form::default();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Notes => &self.notes,
            Field::When => &self.when,
            Field::DueBy => &self.due_by,
        }
    }

    /// Types `value` into one input. Date inputs only take calendar dates.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), AppError> {
        let value = if field.is_date() {
            date_input_value(value).ok_or_else(|| {
                AppError::BadRequest(format!("{} must be a date like 2024-05-01, got {:?}", field.label(), value))
            })?
        } else {
            value.to_string()
        };

        match field {
            Field::Title => self.title = value,
            Field::Notes => self.notes = value,
            Field::When => self.when = value,
            Field::DueBy => self.due_by = value,
        }
        Ok(())
    }

    /// Mirrors a record into the inputs. Dates the input cannot hold show as empty.
    pub fn fill_from(&mut self, todo: &Todo) {
        self.title = todo.title.clone();
        self.notes = todo.notes.clone();
        self.when = date_input_value(&todo.when).unwrap_or_default();
        self.due_by = date_input_value(&todo.due_by).unwrap_or_default();
    }

    pub fn apply_to(&self, todo: &mut Todo) {
        todo.title = self.title.clone();
        todo.notes = self.notes.clone();
        todo.when = self.when.clone();
        todo.due_by = self.due_by.clone();
    }

    pub fn to_todo(&self) -> Todo {
        Todo::new(&self.title, &self.notes, &self.when, &self.due_by)
    }
}

/// A rendered table row. Keeps the fetched record, hidden id included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub todo: Todo,
    pub highlighted: bool,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 4] {
        [&self.todo.title, &self.todo.notes, &self.todo.when, &self.todo.due_by]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoneSelected,
    RowSelected(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Busy,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub rows: Vec<TableRow>,
    pub selection: Selection,
    pub active: Option<Todo>,
    pub form: Form,
    pub phase: Phase,
}

impl ViewState {
    /// Replaces every row. Any previous selection and active record are dropped.
    pub fn render(&mut self, records: Vec<Todo>) {
        self.rows = records
            .into_iter()
            .map(|todo| TableRow {
                todo,
                highlighted: false,
            })
            .collect();
        self.selection = Selection::NoneSelected;
        self.active = None;
    }

    pub fn select(&mut self, index: usize) -> Result<(), AppError> {
        if index >= self.rows.len() {
            return Err(AppError::NoSuchRow(index + 1));
        }

        if let Selection::RowSelected(previous) = self.selection {
            if let Some(row) = self.rows.get_mut(previous) {
                row.highlighted = false;
            }
        }

        let row = &mut self.rows[index];
        row.highlighted = true;
        self.selection = Selection::RowSelected(index);

        let active = row.todo.clone();
        self.form.fill_from(&active);
        self.active = Some(active);
        Ok(())
    }

    pub fn highlighted_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.highlighted)
            .map(|(i, _)| i)
            .collect()
    }
}
