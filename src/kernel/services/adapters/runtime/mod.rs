//! Async runtime adapter: executes effects against the gateways and sends
//! the responses back to the dispatch loop.

mod async_runtime;
mod message;

pub use async_runtime::{AsyncRuntime, Gateways};
pub use message::AppMessage;
