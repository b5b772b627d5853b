use crate::core::model_path::ModelPath;

/// Work deferred to a later turn of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Second phase of a bulk expand: mark every path expanded.
    ApplyExpansion(Vec<ModelPath>),
    /// Last phase of a bulk expand: clear the loading flag.
    FinishLoading,
    /// Ask the view to bring the row with this id on screen.
    ScrollIntoView(String),
}
