//! Host-side sequential dispatch.
//!
//! When the server runs on the user's own machine it can open the generated
//! links in the desktop browser itself, which sidesteps the popup blocker that
//! limits the in-page dispatcher. The run is a background job:
//!
//! - `POST /api/dispatch/start`: takes `{ links, delayMs? }`, registers a job and
//!   returns its `job_id` right away. Refused with `409 Conflict` while another
//!   dispatch job is still pending or in progress, and with `400 Bad Request` for
//!   an empty list.
//! - `GET /api/dispatch/status/{job_id}`: the job's `JobStatus`.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get_status;
mod opener;
mod start;

pub use opener::DispatchOpener;

const API_PATH: &str = "/api/dispatch";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/start", post().to(start::process))
        .route("/status/{job_id}", get().to(get_status::process))
}
