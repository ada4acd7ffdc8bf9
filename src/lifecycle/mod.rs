//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Logging/metrics → Upstream client → Listener
//!
//! Shutdown:
//!     signals.rs (SIGTERM/SIGINT) or shutdown.rs trigger
//!     → stop accepting → drain in-flight requests → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
