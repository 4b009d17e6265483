// Connection handling module
// Accepts a single TCP connection and serves HTTP/1.1 on it

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::api::service::handle_request;
use crate::config::AppState;
use crate::logger;

/// One counted entry in `active_connections`, released on drop.
///
/// Dropping also happens while a panicking connection task unwinds, so a
/// failed task never keeps its slot.
pub struct ConnectionSlot {
    state: Arc<AppState>,
}

impl ConnectionSlot {
    /// Take a slot, or `None` when `max_connections` is reached
    pub fn acquire(state: &Arc<AppState>) -> Option<Self> {
        // Increment first, then check, so concurrent accepts cannot overshoot
        let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);
        let slot = Self {
            state: Arc::clone(state),
        };

        if let Some(max_conn) = state.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                logger::log_warning(&format!(
                    "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
                ));
                return None;
            }
        }
        Some(slot)
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.state.active_connections.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, enforcing `max_connections`.
///
/// Returns false when the connection was rejected.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) -> bool {
    let Some(slot) = ConnectionSlot::acquire(state) else {
        drop(stream);
        return false;
    };

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, slot);
    true
}

/// Serve the connection in a spawned task; the slot goes with the task
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, slot: ConnectionSlot) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let state = Arc::clone(slot.state());

        let performance = &state.config.performance;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            performance.read_timeout,
            performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_timeout > 0);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { handle_request(req, &state, peer_addr).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        drop(slot);
    });
}
