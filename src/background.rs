use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info, info_span, Instrument};

use crate::domain::services::lifecycle::sweep_window;
use crate::state::AppState;

const COMPLETE_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);
const EXPIRE_SWEEP_PERIOD: Duration = Duration::from_secs(6 * 60 * 60);

/// Both sweeps are single idempotent UPDATEs, so overlapping or repeated
/// runs are harmless.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting reservation lifecycle worker");

    let mut complete_tick = interval(COMPLETE_SWEEP_PERIOD);
    let mut expire_tick = interval(EXPIRE_SWEEP_PERIOD);

    loop {
        tokio::select! {
            _ = complete_tick.tick() => {
                let span = info_span!("lifecycle_sweep", kind = "complete");
                async {
                    match run_complete_sweep(&state).await {
                        Ok(0) => {}
                        Ok(n) => info!("Completed {} elapsed reservation(s)", n),
                        Err(e) => error!("Complete sweep failed: {:?}", e),
                    }
                }
                .instrument(span)
                .await;
            }
            _ = expire_tick.tick() => {
                let span = info_span!("lifecycle_sweep", kind = "expire");
                async {
                    match run_expire_sweep(&state).await {
                        Ok(0) => {}
                        Ok(n) => info!("Expired {} stale reservation(s)", n),
                        Err(e) => error!("Expire sweep failed: {:?}", e),
                    }
                }
                .instrument(span)
                .await;
            }
        }
    }
}

pub async fn run_complete_sweep(state: &AppState) -> Result<u64, crate::error::AppError> {
    let window = sweep_window(state.local_now());
    state.reservation_repo.complete_elapsed(window).await
}

pub async fn run_expire_sweep(state: &AppState) -> Result<u64, crate::error::AppError> {
    let window = sweep_window(state.local_now());
    state.reservation_repo.expire_stale(window).await
}
