//! HTTP front end for tunetree.
//!
//! Serves the browser client, answers catalog requests posted as
//! `dffunc`/`dfdata` form fields, and streams audio objects.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::TunetreeServer;
