pub mod task;
pub mod user;

pub use task::{parse_deadline, CreateTaskRequest, Task, TaskInput, TaskStatus, TaskUpdate};
pub use user::User;
