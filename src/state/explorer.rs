use crate::config::ExplorerConfig;
use crate::core::json_text::{self, ParseFailure};
use crate::core::model_path::ModelPath;
use crate::core::traversal::branch_paths;
use crate::core::value;
use crate::core::{INPUT_JSON_STORAGE_KEY, sample_json};
use crate::runtime::{AppEvent, Scheduler, SchedulerCommand};
use crate::state::expansion::ExpansionStore;
use crate::state::model::{EditError, ModelStore};
use crate::storage::InputStorage;
use crate::ui::rows::{TreeRow, visible_rows};
use serde_json::Value;
use tracing::{debug, info, warn};

const SCROLL_KEY: &str = "scroll";

/// Wires the model, expansion state, scheduler and storage together and
/// exposes the user-facing operations.
pub struct Explorer {
    model: ModelStore,
    expansion: ExpansionStore,
    scheduler: Scheduler,
    storage: Box<dyn InputStorage>,
    edit_path: Option<ModelPath>,
    validation: Option<ParseFailure>,
    scroll_request: Option<String>,
}

impl Explorer {
    pub fn new(config: &ExplorerConfig, storage: Box<dyn InputStorage>) -> Self {
        Self {
            model: ModelStore::new(config.indent),
            expansion: ExpansionStore::new(),
            scheduler: Scheduler::new(),
            storage,
            edit_path: None,
            validation: None,
            scroll_request: None,
        }
    }

    /// Restores the last stored input, or the sample document on first run.
    pub fn load(&mut self) {
        let stored = match self.storage.load(INPUT_JSON_STORAGE_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "failed to read stored input");
                None
            }
        };

        match stored {
            Some(text) => match self.model.apply_editor_text(text) {
                Ok(()) => info!("restored last input"),
                Err(err) => {
                    warn!(error = %err, "stored input is not valid JSON, using sample");
                    self.model.replace_model(sample_json());
                }
            },
            None => {
                debug!("no stored input, using sample");
                self.model.replace_model(sample_json());
            }
        }

        self.validation = None;
        self.edit_path = None;
        self.expansion.expand(&ModelPath::root(), true);
    }

    pub fn model(&self) -> &Value {
        self.model.model()
    }

    pub fn text(&self) -> &str {
        self.model.text()
    }

    pub fn model_store(&self) -> &ModelStore {
        &self.model
    }

    pub fn expansion(&self) -> &ExpansionStore {
        &self.expansion
    }

    pub fn value_at(&self, path: &ModelPath) -> Option<&Value> {
        value::get(self.model(), path)
    }

    pub fn is_loading(&self) -> bool {
        self.expansion.is_loading()
    }

    pub fn validation_message(&self) -> Option<String> {
        self.validation
            .as_ref()
            .map(|failure| format!("Invalid JSON: {}", failure.message))
    }

    pub fn rows(&self) -> Vec<TreeRow> {
        visible_rows(self.model(), self.expansion.map())
    }

    /// Text from the editor. Accepted text is stored; rejected text leaves the
    /// model as it was and sets the validation message.
    pub fn apply_editor_text(&mut self, raw: impl Into<String>) -> Result<(), ParseFailure> {
        match self.model.apply_editor_text(raw) {
            Ok(()) => {
                self.validation = None;
                self.after_model_change();
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "editor text rejected");
                self.validation = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn set_value_at(&mut self, path: &ModelPath, new_value: Value) -> Result<(), EditError> {
        self.model.set_value_at(path, new_value)?;
        self.validation = None;
        self.after_model_change();
        Ok(())
    }

    pub fn remove_at(&mut self, path: &ModelPath) -> Result<Value, EditError> {
        let removed = self.model.remove_at(path)?;
        self.validation = None;
        self.after_model_change();
        Ok(removed)
    }

    pub fn edit_path(&self) -> Option<&ModelPath> {
        self.edit_path.as_ref()
    }

    /// Marks `path` as the node being edited. Fails if it does not resolve.
    pub fn begin_edit(&mut self, path: &ModelPath) -> Result<&Value, EditError> {
        let Some(current) = value::get(self.model.model(), path) else {
            return Err(EditError::PathNotFound(path.clone()));
        };
        self.edit_path = Some(path.clone());
        Ok(current)
    }

    pub fn cancel_edit(&mut self) {
        self.edit_path = None;
    }

    /// Writes `raw` into the node being edited. Text that is not JSON is
    /// stored as a JSON string.
    pub fn commit_edit(&mut self, raw: &str) -> Result<ModelPath, EditError> {
        let path = self.edit_path.take().ok_or(EditError::NoActiveEdit)?;
        let new_value = json_text::parse(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.set_value_at(&path, new_value)?;
        Ok(path)
    }

    pub fn is_expanded(&self, path: &ModelPath) -> bool {
        self.expansion.is_expanded(path)
    }

    pub fn expand(&mut self, path: &ModelPath, expand_parents: bool) {
        self.expansion.expand(path, expand_parents);
    }

    pub fn collapse(&mut self, path: &ModelPath) {
        self.expansion.collapse(path);
    }

    pub fn toggle(&mut self, path: &ModelPath) {
        if self.is_expanded(path) {
            self.collapse(path);
        } else {
            self.expand(path, true);
        }
    }

    /// Expands every strict ancestor of `path` and asks for the row to be
    /// scrolled to on the next turn, once the new rows exist.
    pub fn reveal(&mut self, path: &ModelPath) {
        if let Some(parent) = path.parent() {
            self.expansion.expand(&parent, true);
        }
        self.scheduler.schedule(SchedulerCommand::Replace {
            key: SCROLL_KEY.to_string(),
            event: AppEvent::ScrollIntoView(path.key()),
        });
    }

    pub fn expand_all(&mut self) {
        let paths = branch_paths(self.model());
        self.expansion.expand_many(paths, &mut self.scheduler);
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse(&ModelPath::root());
    }

    /// Runs one scheduler turn. Returns false when nothing was queued.
    pub fn tick(&mut self) -> bool {
        let Some(event) = self.scheduler.next_turn() else {
            return false;
        };
        match event {
            AppEvent::ApplyExpansion(paths) => {
                self.expansion.apply_expansion(paths, &mut self.scheduler);
            }
            AppEvent::FinishLoading => self.expansion.finish_loading(),
            AppEvent::ScrollIntoView(id) => self.scroll_request = Some(id),
        }
        true
    }

    pub fn run_until_idle(&mut self) {
        while self.tick() {}
    }

    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_idle()
    }

    pub fn take_scroll_request(&mut self) -> Option<String> {
        self.scroll_request.take()
    }

    fn after_model_change(&mut self) {
        self.persist();
        if let Some(path) = &self.edit_path
            && value::get(self.model.model(), path).is_none()
        {
            debug!(path = %path, "editing path no longer resolves");
            self.edit_path = None;
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.storage.save(INPUT_JSON_STORAGE_KEY, self.model.text()) {
            warn!(error = %err, "failed to store input");
        }
    }
}
