//! # Tasks
//!
//! The task entity, its request payloads and the service that maps task
//! operations onto the record store.

mod clock;
mod errors;
mod service;
mod task;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use errors::{MessageResponse, TaskError, TaskResult};
pub use service::{TaskService, TASKS_TABLE};
pub use task::{NewTask, Task, TaskPatch};
