//! HTTP/JSON remote state backend.
//!
//! Serves one state document per environment and an exclusive lock per
//! environment over plain HTTP verbs plus the `LOCK`/`UNLOCK` extension
//! methods. This crate contains the server framework, API schema types,
//! error handling, configuration and route definitions. Persistence lives in
//! `terrastate-storage`.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
