pub mod rows;
pub mod scroll;
pub mod span;
pub mod style;
pub mod view;
