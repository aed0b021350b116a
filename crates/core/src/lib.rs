//! Pointer and pixel inspection core: sampling, countdown actions, origin
//! handling and the platform probes behind them.

pub mod error;
pub mod log_buffer;
pub mod logger;
pub mod origin;
pub mod platform;
pub mod refresh;
pub mod sample;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sinks;
pub mod timer;
pub mod types;
