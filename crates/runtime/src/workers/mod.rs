//! Worker tasks that back room orchestration.

mod scheduler;

pub(crate) use scheduler::TurnScheduler;
