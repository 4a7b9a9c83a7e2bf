//! Job listing and task collaborators built on shapecast.
//!
//! - [`schemas`]: the built-in job search and task types
//! - [`TaskStore`]: in-memory, id-based task list
//! - [`JobBoard`]: fetches a listing through a [`JobSource`] and keeps the
//!   last one that validated

pub mod board;
pub mod error;
pub mod schemas;
pub mod tasks;

pub use board::{JobBoard, JobSource, StaticSource};
pub use error::{JobBoardError, TaskStoreError};
pub use schemas::{
    build_registry, register_builtin, registry, BUILTIN_DEFINITIONS, JOB_POSTING,
    JOB_SEARCH_RESPONSE, TASK,
};
pub use tasks::{Task, TaskStore};
