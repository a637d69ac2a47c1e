pub mod policy;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::Todo;
use crate::remote::TodoStore;
use crate::view::TodoView;

pub use policy::UpdateErrorPolicy;
pub use state::{Field, Form, Phase, Selection, TableRow, ViewState};

/// Keeps the table, the selection and the edit form in step with the store.
///
/// The state lock is never held across an await, so the controller can be
/// shared between tasks. Mutating actions are gated by [`Phase`]: while one
/// is in flight, others fail with [`AppError::Busy`].
pub struct TodoController {
    store: Arc<dyn TodoStore>,
    view: Arc<dyn TodoView>,
    policy: UpdateErrorPolicy,
    state: Mutex<ViewState>,
}

/// Puts the controller back to idle when a mutation ends, however it ends.
struct BusyGuard<'a> {
    state: &'a Mutex<ViewState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.phase = Phase::Idle;
    }
}

impl TodoController {
    pub fn new(store: Arc<dyn TodoStore>, view: Arc<dyn TodoView>, policy: UpdateErrorPolicy) -> Self {
        Self {
            store,
            view,
            policy,
            state: Mutex::new(ViewState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    fn present(&self) {
        let snapshot = self.snapshot();
        self.view.render(&snapshot);
    }

    pub fn prompt(&self) {
        self.view.prompt();
    }

    pub fn notify(&self, message: &str) {
        self.view.alert(message);
    }

    /// Plain text for the user, such as the command list.
    pub fn message(&self, text: &str) {
        self.view.message(text);
    }

    fn report(&self, err: &AppError) {
        error!("{}", err);
        self.view.alert(&format!("Error encountered: {}", err));
    }

    fn begin_mutation(&self) -> Result<BusyGuard<'_>, AppError> {
        let mut state = self.lock();
        if state.phase == Phase::Busy {
            drop(state);
            let err = AppError::Busy;
            self.report(&err);
            return Err(err);
        }
        state.phase = Phase::Busy;
        Ok(BusyGuard { state: &self.state })
    }

    fn active_id(&self) -> Result<String, AppError> {
        let state = self.lock();
        let active = state.active.as_ref().ok_or(AppError::NoActiveRecord)?;
        active.id.clone().ok_or(AppError::NotPersisted)
    }

    /// Fetches the whole list, re-renders the table and clears the form.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let todos = match self.store.list_all().await {
            Ok(todos) => todos,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };
        info!("Refreshed {} todos", todos.len());

        {
            let mut state = self.lock();
            state.render(todos);
            state.form.clear();
        }
        self.present();
        Ok(())
    }

    pub fn render(&self, records: Vec<Todo>) {
        self.lock().render(records);
        self.present();
    }

    /// Makes the row at `index` (zero-based) the active one.
    pub fn select(&self, index: usize) -> Result<(), AppError> {
        let result = self.lock().select(index);
        match result {
            Ok(()) => {
                self.present();
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub fn reset_fields(&self) {
        self.lock().form.clear();
        self.present();
    }

    pub fn set_field(&self, field: Field, value: &str) -> Result<(), AppError> {
        let result = self.lock().form.set(field, value);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    pub async fn add(&self) -> Result<(), AppError> {
        let _busy = self.begin_mutation()?;
        let todo = self.lock().form.to_todo();

        match self.store.create(&todo).await {
            Ok(created) => {
                info!("Created todo {:?}", created.id);
                self.refresh().await
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub async fn update(&self) -> Result<(), AppError> {
        let _busy = self.begin_mutation()?;

        let todo = {
            let mut state = self.lock();
            let form = state.form.clone();
            state.active.as_mut().map(|active| {
                form.apply_to(active);
                active.clone()
            })
        };
        let Some(todo) = todo else {
            let err = AppError::NoActiveRecord;
            self.report(&err);
            return Err(err);
        };

        match self.store.update(&todo).await {
            Ok(()) => {
                info!("Updated todo {:?}", todo.id);
                self.refresh().await
            }
            Err(e) if self.policy.is_ignorable(&e) => {
                warn!("Ignoring update error for todo {:?}: {}", todo.id, e);
                self.refresh().await
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub async fn delete(&self) -> Result<(), AppError> {
        let _busy = self.begin_mutation()?;

        let id = match self.active_id() {
            Ok(id) => id,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };

        match self.store.remove(&id).await {
            Ok(()) => {
                info!("Deleted todo {}", id);
                self.refresh().await
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Fetches the stored copy of the active record and shows it.
    pub async fn show_active(&self) -> Result<Todo, AppError> {
        let fetched = match self.active_id() {
            Ok(id) => self.store.get(&id).await,
            Err(e) => Err(e),
        };

        match fetched {
            Ok(todo) => {
                self.view.show(&todo);
                Ok(todo)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }
}
