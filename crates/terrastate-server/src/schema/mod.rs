//! API schema types for request/response definitions.
//!
//! State documents travel as [`terrastate_core::StateDocument`] directly;
//! the modules here hold the remaining response bodies.

pub mod locks;
pub mod state;
pub mod system;
