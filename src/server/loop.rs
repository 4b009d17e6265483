// Server loop module
// Accepts connections until the shutdown future resolves, then drains

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop.
///
/// Once `shutdown` resolves the listener is dropped and in-flight
/// connections get up to `write_timeout` seconds to finish.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    drain(&state).await;
}

/// Wait for active connections to finish, bounded by `write_timeout`
///
/// A timeout too large to represent as an `Instant` waits without a deadline.
async fn drain(state: &AppState) {
    let deadline = drain_deadline(Instant::now(), state.config.performance.write_timeout);

    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            logger::log_warning(&format!(
                "Shutting down with {active} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

fn drain_deadline(now: Instant, timeout_secs: u64) -> Option<Instant> {
    now.checked_add(Duration::from_secs(timeout_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_deadline() {
        let now = Instant::now();
        assert_eq!(drain_deadline(now, 30), Some(now + Duration::from_secs(30)));
        assert_eq!(drain_deadline(now, u64::MAX), None);
    }
}
