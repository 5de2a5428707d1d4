//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware/gate.rs (exclusions → auth decision → locale resolution)
//!     → response.rs (redirects, cookies)  or  server.rs proxy_handler
//!     → upstream renderer
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod state;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::GateError;
pub use server::{HttpServer, HEALTH_PATH, X_GATE_LOCALE};
pub use state::{AppState, GateRuntime};
