//! Task execution engine
//!
//! This module handles prerequisite resolution, variable substitution and
//! command running.

pub mod command;
pub mod context;
pub mod interpolate;
pub mod plan;
pub mod task;
pub mod vars;

// Re-export main types
pub use command::*;
pub use context::*;
pub use interpolate::*;
pub use plan::*;
pub use task::*;
pub use vars::*;

pub use crate::ui::Verbosity;
