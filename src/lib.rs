//! # live-state-view
//!
//! Live view of a WebSocket message stream: connects once to `/ws` on a
//! page host and keeps the most recently received JSON message as
//! observable state.
//!
//! There is no protocol on top of the socket. Each inbound text message is
//! decoded as JSON of any shape and replaces the display state wholesale.
//! Connection failures, malformed payloads and disconnects are logged and
//! otherwise ignored; the connection is never retried.
//!
//! ## Architecture
//!
//! ```text
//! Server (/ws)
//!     │
//!     ├── LiveStateDisplay (display/)   one connection, one task
//!     │
//!     ├── DisplayState (state/)         watch slot, replace-on-write
//!     │
//!     └── Renderer (render/)            prints every assignment
//! ```

pub mod config;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod render;
pub mod state;

pub use display::{ConnectionState, LiveStateDisplay};
pub use endpoint::Endpoint;
pub use error::ViewError;
pub use state::DisplayState;
