use std::sync::Arc;
use tokio::{
    task::JoinHandle,
    time::{interval, Duration, MissedTickBehavior},
};
use tracing::{error, info};

use super::session::SessionManager;

/// Periodically purge expired sessions in the background.
///
/// Must be called from within a tokio runtime. The first sweep runs one full
/// `every` after spawning. Abort the returned handle to stop sweeping.
pub fn spawn(sessions: Arc<SessionManager>, every: Duration) -> JoinHandle<()> {
    info!("Sweeping expired sessions every {} seconds", every.as_secs());

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // interval fires immediately on the first tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match sessions.sweep() {
                Ok(purged) if purged > 0 => info!("Purged {} expired sessions", purged),
                Ok(_) => {}
                Err(e) => error!("Error sweeping sessions: {}", e),
            }
        }
    })
}
