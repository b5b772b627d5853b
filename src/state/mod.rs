pub mod expansion;
pub mod explorer;
pub mod model;
pub mod store;

pub use expansion::{ExpansionMap, ExpansionStore};
pub use explorer::Explorer;
pub use model::{EditError, EditorText, ModelStore};
pub use store::{Store, SubscriptionId};
