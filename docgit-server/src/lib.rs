//! # docgit-server
//!
//! HTTP API over docgit repositories, for the browser front-end.

pub mod api;
pub mod locks;
pub mod server;

pub use server::DocgitServer;
