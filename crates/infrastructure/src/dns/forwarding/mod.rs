pub mod forwarder;

pub use forwarder::{ForwardHandler, FORWARD_HANDLER};
