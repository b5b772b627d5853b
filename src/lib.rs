pub mod app;
pub mod config;
pub mod core;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod terminal;
pub mod ui;

pub use core::json_text;
pub use core::model_path;
pub use core::traversal;
pub use core::value;

pub use state::expansion;
pub use state::explorer;
pub use state::model;
pub use state::store;

pub use runtime::event;
pub use runtime::scheduler;

pub use ui::rows;
pub use ui::view;
