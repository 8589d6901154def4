//! # docgit
//!
//! Version history for word-processor documents, layered over git.
//!
//! - [`core`]: repository operations (bootstrap, status, diff, log, commit,
//!   restore, reset, revert)
//! - [`server`]: HTTP API over the core
//! - [`sdk`]: blocking client for the HTTP API

pub use docgit_core as core;
pub use docgit_sdk as sdk;
pub use docgit_server as server;
