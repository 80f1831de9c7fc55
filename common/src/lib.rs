//! Shared core of the invite-link workspace.
//!
//! Everything in here is host independent: it compiles for the native backend and
//! for the `wasm32` frontend alike. Network access, timers and the browser are
//! reached only through the traits in [`services`], so the whole pipeline can be
//! exercised from plain unit tests.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod generate;
pub mod jobs;
pub mod model;
pub mod requests;
pub mod services;
pub mod session;
pub mod upload;

pub use error::{InviteError, ValidationError};
