use std::io::{self, Write};

use crate::controller::ViewState;
use crate::models::Todo;

/// Where the controller draws the table and form, and raises alerts.
pub trait TodoView: Send + Sync {
    fn render(&self, state: &ViewState);
    fn alert(&self, message: &str);
    fn show(&self, todo: &Todo);
    fn message(&self, text: &str);
    fn prompt(&self) {}
}

const HEADERS: [&str; 4] = ["Title", "Notes", "When", "Due By"];
const MAX_CELL_WIDTH: usize = 28;

/// Draws to stdout. A highlighted row gets a border on its left and right.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    fn write(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        // stdout going away leaves nothing to report to
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

impl TodoView for TerminalView {
    fn render(&self, state: &ViewState) {
        self.write(&format_screen(state));
    }

    fn alert(&self, message: &str) {
        self.write(&format!("!! {}\n", message));
    }

    fn show(&self, todo: &Todo) {
        self.write(&format!(
            "id:     {}\ntitle:  {}\nnotes:  {}\nwhen:   {}\ndue by: {}\n",
            todo.id.as_deref().unwrap_or("-"),
            todo.title,
            todo.notes,
            todo.when,
            todo.due_by
        ));
    }

    fn message(&self, text: &str) {
        self.write(text);
        if !text.ends_with('\n') {
            self.write("\n");
        }
    }

    fn prompt(&self) {
        self.write("> ");
    }
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut clipped: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

/// Table followed by the current form values.
pub fn format_screen(state: &ViewState) -> String {
    let rows: Vec<[String; 4]> = state
        .rows
        .iter()
        .map(|row| row.cells().map(clip))
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let number_width = state.rows.len().to_string().len().max(1);

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().zip(widths).map(|(h, w)| pad(h, w)).collect();
    out.push_str(&format!("  {}  {}\n", pad("#", number_width), header.join("  ")));

    if rows.is_empty() {
        out.push_str("  (no tasks)\n");
    }
    for (i, (row, cells)) in state.rows.iter().zip(&rows).enumerate() {
        let border = if row.highlighted { '│' } else { ' ' };
        let line: Vec<String> = cells.iter().zip(widths).map(|(c, w)| pad(c, w)).collect();
        out.push_str(&format!(
            "{} {}  {} {}\n",
            border,
            pad(&(i + 1).to_string(), number_width),
            line.join("  "),
            border
        ));
    }

    let form = &state.form;
    out.push_str(&format!(
        "form: title={:?} notes={:?} when={:?} due={:?}\n",
        form.title, form.notes, form.when, form.due_by
    ));
    out
}
