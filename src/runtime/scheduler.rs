use crate::runtime::event::AppEvent;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
pub enum SchedulerCommand {
    EmitNow(AppEvent),
    /// Queue `event`, dropping any still-pending event queued under `key`.
    Replace {
        key: String,
        event: AppEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct QueuedTask {
    guard: Option<Guard>,
    event: AppEvent,
}

/// FIFO cooperative queue. Each turn runs one event; anything emitted while
/// handling it lands behind everything already queued.
#[derive(Debug, Default)]
pub struct Scheduler {
    ready: VecDeque<QueuedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: AppEvent) {
        self.schedule(SchedulerCommand::EmitNow(event));
    }

    pub fn schedule(&mut self, command: SchedulerCommand) {
        match command {
            SchedulerCommand::EmitNow(event) => {
                self.ready.push_back(QueuedTask { guard: None, event });
            }
            SchedulerCommand::Replace { key, event } => {
                let version = self.bump_version(&key);
                self.ready.push_back(QueuedTask {
                    guard: Some(Guard { key, version }),
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
            }
        }
    }

    pub fn next_turn(&mut self) -> Option<AppEvent> {
        while let Some(task) = self.ready.pop_front() {
            if self.task_is_valid(&task) {
                return Some(task.event);
            }
        }
        None
    }

    pub fn is_idle(&self) -> bool {
        !self.ready.iter().any(|task| self.task_is_valid(task))
    }

    fn task_is_valid(&self, task: &QueuedTask) -> bool {
        let Some(guard) = &task.guard else {
            return true;
        };
        let current = *self.key_versions.get(&guard.key).unwrap_or(&0);
        current == guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}

#[cfg(test)]
mod tests {
    use super::{AppEvent, Scheduler, SchedulerCommand};

    #[test]
    fn events_run_one_per_turn_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.emit(AppEvent::FinishLoading);
        scheduler.emit(AppEvent::ScrollIntoView("a".to_string()));

        assert_eq!(scheduler.next_turn(), Some(AppEvent::FinishLoading));
        scheduler.emit(AppEvent::ScrollIntoView("b".to_string()));
        assert_eq!(
            scheduler.next_turn(),
            Some(AppEvent::ScrollIntoView("a".to_string()))
        );
        assert_eq!(
            scheduler.next_turn(),
            Some(AppEvent::ScrollIntoView("b".to_string()))
        );
        assert_eq!(scheduler.next_turn(), None);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn replace_drops_pending_event_with_same_key() {
        let mut scheduler = Scheduler::new();
        for id in ["first", "second"] {
            scheduler.schedule(SchedulerCommand::Replace {
                key: "scroll".to_string(),
                event: AppEvent::ScrollIntoView(id.to_string()),
            });
        }

        assert_eq!(
            scheduler.next_turn(),
            Some(AppEvent::ScrollIntoView("second".to_string()))
        );
        assert_eq!(scheduler.next_turn(), None);
    }

    #[test]
    fn cancel_invalidates_pending_keyed_event() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SchedulerCommand::Replace {
            key: "scroll".to_string(),
            event: AppEvent::ScrollIntoView("a".to_string()),
        });
        scheduler.schedule(SchedulerCommand::Cancel {
            key: "scroll".to_string(),
        });

        assert!(scheduler.is_idle());
        assert_eq!(scheduler.next_turn(), None);
    }
}
