pub mod board;
pub mod filter;
pub mod stats;

pub use board::{EmptyState, Notice, NoticeKind, TaskBoard};
pub use filter::{filter_tasks, TaskFilter, ALL};
pub use stats::TaskStats;
