//! Action items extracted from meetings.

pub mod board;
pub mod controller;

pub use board::{partition, TaskBoard};
pub use controller::{TaskScope, TaskStatusController};
