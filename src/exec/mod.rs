// src/exec/mod.rs

//! Command execution layer.
//!
//! Every task delegates its real work to external tools (test runner, type
//! checker, hook runner, git). They all go through a [`CommandRunner`]:
//!
//! - [`backend`] provides the `CommandRunner` trait and the concrete
//!   `ShellRunner` used in production, which tests replace with a recording
//!   fake.

pub mod backend;

pub use backend::{CommandRunner, RunFuture, SEPARATOR_WIDTH, ShellRunner};
