pub mod event;
pub mod scheduler;

pub use event::AppEvent;
pub use scheduler::{Scheduler, SchedulerCommand};
