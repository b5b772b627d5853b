use crate::core::model_path::{ModelPath, decode};
use crate::runtime::{AppEvent, Scheduler};
use crate::state::store::{Store, SubscriptionId};
use indexmap::IndexMap;
use tracing::debug;

/// Canonical path-key to expanded flag. An absent key reads as collapsed.
///
/// Keys are never pruned when the model changes shape; a key for a node that
/// no longer exists simply matches no row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionMap {
    entries: IndexMap<String, bool>,
}

impl ExpansionMap {
    pub fn is_expanded(&self, path: &ModelPath) -> bool {
        self.is_key_expanded(path.key().as_str())
    }

    pub fn is_key_expanded(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(key, expanded)| (key.as_str(), *expanded))
    }

    fn with_expanded(&self, keys: impl IntoIterator<Item = String>) -> Self {
        let mut next = self.clone();
        for key in keys {
            next.entries.insert(key, true);
        }
        next
    }

    fn with_collapsed(&self, path: &ModelPath) -> Self {
        let mut next = self.clone();
        next.entries.insert(path.key(), false);
        for (key, expanded) in next.entries.iter_mut() {
            if *expanded && decode(key).starts_with(path) {
                *expanded = false;
            }
        }
        next
    }
}

/// Owns the expansion map and the bulk-operation loading flag. Writes go
/// through the operations below only; readers get shared references.
#[derive(Debug, Default)]
pub struct ExpansionStore {
    expanded: Store<ExpansionMap>,
    loading: Store<bool>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&self) -> &ExpansionMap {
        self.expanded.get()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.get()
    }

    pub fn is_expanded(&self, path: &ModelPath) -> bool {
        self.map().is_expanded(path)
    }

    pub fn subscribe_map(
        &mut self,
        subscriber: impl FnMut(&ExpansionMap) + 'static,
    ) -> SubscriptionId {
        self.expanded.subscribe(subscriber)
    }

    pub fn subscribe_loading(
        &mut self,
        subscriber: impl FnMut(&bool) + 'static,
    ) -> SubscriptionId {
        self.loading.subscribe(subscriber)
    }

    pub fn unsubscribe_map(&mut self, id: SubscriptionId) -> bool {
        self.expanded.unsubscribe(id)
    }

    pub fn unsubscribe_loading(&mut self, id: SubscriptionId) -> bool {
        self.loading.unsubscribe(id)
    }

    /// With `expand_parents`, the root and every ancestor are expanded too so
    /// the node is actually on screen afterwards.
    pub fn expand(&mut self, path: &ModelPath, expand_parents: bool) {
        let keys: Vec<String> = if expand_parents {
            path.prefixes().map(|prefix| prefix.key()).collect()
        } else {
            vec![path.key()]
        };
        debug!(path = %path, expand_parents, "expand");
        self.expanded.update(|map| map.with_expanded(keys));
    }

    /// Collapsing the root forgets all state. Any other path collapses itself
    /// and every recorded descendant, matched segment by segment.
    pub fn collapse(&mut self, path: &ModelPath) {
        debug!(path = %path, "collapse");
        if path.is_root() {
            self.expanded.set(ExpansionMap::default());
            return;
        }
        self.expanded.update(|map| map.with_collapsed(path));
    }

    /// Raises the loading flag now; the expansion itself and the flag reset
    /// each run on a later scheduler turn.
    pub fn expand_many(&mut self, paths: Vec<ModelPath>, scheduler: &mut Scheduler) {
        debug!(count = paths.len(), "expand many");
        self.loading.set(true);
        scheduler.emit(AppEvent::ApplyExpansion(paths));
    }

    pub(crate) fn apply_expansion(&mut self, paths: Vec<ModelPath>, scheduler: &mut Scheduler) {
        let keys = paths.iter().map(ModelPath::key);
        self.expanded.update(|map| map.with_expanded(keys));
        scheduler.emit(AppEvent::FinishLoading);
    }

    pub(crate) fn finish_loading(&mut self) {
        self.loading.set(false);
    }
}
