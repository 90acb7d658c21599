pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod logging;
pub mod manager;
pub mod models;
pub mod periods;
pub mod report;
pub mod roster;
pub mod schema;
pub mod validate;

pub use crate::error::{AttendanceError, Result};
pub use crate::manager::AttendanceManager;
