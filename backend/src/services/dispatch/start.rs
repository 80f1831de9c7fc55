//! `POST /api/dispatch/start`
//!
//! Registers a dispatch job and spawns a tokio task that walks the batch with a
//! `SequentialDispatcher`: open one link, report progress, sleep for the delay
//! the dispatcher asks for, repeat until it returns to idle.

use super::opener::DispatchOpener;
use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};
use common::config::ClientConfig;
use common::dispatch::SequentialDispatcher;
use common::jobs::JobStatus;
use common::model::link::DispatchBatch;
use common::requests::{StartDispatchRequest, StartDispatchResponse};
use common::InviteError;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub(crate) async fn process(
    state: web::Data<JobsState>,
    config: web::Data<ClientConfig>,
    opener: web::Data<DispatchOpener>,
    payload: web::Json<StartDispatchRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if req.links.is_empty() {
        return HttpResponse::BadRequest().body("No links to open");
    }

    if req.delay_ms == Some(0) {
        return HttpResponse::BadRequest().body("delayMs must be positive");
    }

    let delay = req
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.open_delay());
    let batch = DispatchBatch::from(req.links);

    match schedule_dispatch_job(state.get_ref().clone(), opener.get_ref().clone(), batch, delay).await {
        Ok(job_id) => HttpResponse::Ok().json(StartDispatchResponse { job_id }),
        Err(err @ InviteError::DispatchInProgress) => HttpResponse::Conflict().body(err.to_string()),
        Err(err) => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

/// Registers the job and spawns the run. Returns the new job ID.
async fn schedule_dispatch_job(
    state: JobsState,
    opener: DispatchOpener,
    batch: DispatchBatch,
    delay: Duration,
) -> Result<String, InviteError> {
    let job_id = Uuid::new_v4().to_string();
    state.register_exclusive(&job_id).await?;
    info!("dispatch job {} opens {} links every {:?}", job_id, batch.len(), delay);

    let task_job_id = job_id.clone();
    tokio::spawn(async move {
        let mut dispatcher = SequentialDispatcher::new(delay);
        if let Err(err) = dispatcher.start(&batch) {
            state
                .report(&task_job_id, JobStatus::Failed(err.to_string()))
                .await;
            return;
        }

        let total = batch.len();
        let batch = Arc::new(batch);
        let mut opened = 0;
        loop {
            // Launching the browser waits for the system opener to exit, so
            // each step runs on the blocking pool.
            let step_batch = Arc::clone(&batch);
            let step_opener = opener.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let next = dispatcher.step(&step_batch, step_opener.0.as_ref());
                (dispatcher, next)
            });
            let next = match handle.await {
                Ok((returned, next)) => {
                    dispatcher = returned;
                    next
                }
                Err(err) => {
                    error!("dispatch job {} stopped: {}", task_job_id, err);
                    state
                        .report(
                            &task_job_id,
                            JobStatus::Failed(format!("Dispatch step failed: {}", err)),
                        )
                        .await;
                    return;
                }
            };
            opened += 1;
            state
                .report(&task_job_id, JobStatus::InProgress(progress(opened, total)))
                .await;

            match next {
                Some(wait) => tokio::time::sleep(wait).await,
                None => break,
            }
        }

        info!("dispatch job {} finished", task_job_id);
        state
            .report(
                &task_job_id,
                JobStatus::Completed(format!("Opened {} links", total)),
            )
            .await;
    });

    Ok(job_id)
}

/// Percentage of `done` out of `total`, rounded down.
fn progress(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f32 / total as f32 * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::progress;

    #[test]
    fn progress_is_a_percentage() {
        assert_eq!(progress(0, 0), 0);
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(3, 3), 100);
    }
}
