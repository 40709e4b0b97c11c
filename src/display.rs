//! Live State Display: one WebSocket connection feeding one [`DisplayState`].
//!
//! [`LiveStateDisplay::initialize`] spawns a single task that connects to the
//! endpoint and assigns every inbound text message to the display state, in
//! arrival order. There is no reconnection: once the connection fails or
//! closes the task ends and the state keeps its last value.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::endpoint::Endpoint;
use crate::error::ViewError;
use crate::state::DisplayState;

/// Connection lifecycle of a [`LiveStateDisplay`].
///
/// Moves from `Disconnected` to `Connected` at most once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake not (yet) completed.
    Disconnected,
    /// Handshake completed.
    Connected,
}

/// Bridges the inbound message stream of one connection to a [`DisplayState`].
///
/// Dropping the display aborts its connection task.
#[derive(Debug)]
pub struct LiveStateDisplay {
    endpoint: Endpoint,
    state: DisplayState,
    connection: Arc<watch::Sender<ConnectionState>>,
    task: JoinHandle<()>,
}

impl LiveStateDisplay {
    /// Opens the connection to `endpoint` and starts listening.
    ///
    /// Returns immediately. Connection failure is not reported to the
    /// caller: it is logged and the display stays
    /// [`ConnectionState::Disconnected`] with the initial state.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn initialize(endpoint: Endpoint) -> Self {
        Self::with_state(endpoint, DisplayState::new())
    }

    /// Like [`LiveStateDisplay::initialize`], assigning into an existing slot.
    #[must_use]
    pub fn with_state(endpoint: Endpoint, state: DisplayState) -> Self {
        let (connection, _) = watch::channel(ConnectionState::Disconnected);
        let connection = Arc::new(connection);

        let task = tokio::spawn(run_session(
            endpoint.clone(),
            state.clone(),
            Arc::clone(&connection),
        ));

        Self {
            endpoint,
            state,
            connection,
            task,
        }
    }

    /// The endpoint this display connects to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The display state slot.
    #[must_use]
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Current connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.borrow()
    }

    /// Returns a receiver notified when the connection state changes.
    #[must_use]
    pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    /// Returns `true` once the connection task has stopped receiving.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveStateDisplay {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Connects, then feeds every text frame into `state` until the stream ends.
async fn run_session(
    endpoint: Endpoint,
    state: DisplayState,
    connection: Arc<watch::Sender<ConnectionState>>,
) {
    let connected = connect_async(endpoint.url())
        .await
        .map_err(ViewError::from);
    let (mut stream, response) = match connected {
        Ok(pair) => pair,
        Err(err) => {
            tracing::error!(url = %endpoint, error = %err, "websocket connection failed");
            return;
        }
    };
    connection.send_replace(ConnectionState::Connected);
    tracing::info!(url = %endpoint, status = %response.status(), "websocket connected");

    // Ping replies are queued by tungstenite and flushed on the next read.
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => state.apply_message(text.as_str()),
            Ok(Message::Close(frame)) => {
                tracing::debug!(url = %endpoint, ?frame, "websocket closed by server");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::debug!(url = %endpoint, error = %err, "websocket read failed");
                break;
            }
        }
    }

    tracing::debug!(
        url = %endpoint,
        updates = state.update_count(),
        "websocket session ended"
    );
}
