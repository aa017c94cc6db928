pub mod chain;
pub mod forwarding;
pub mod server;
pub mod transport;

pub use chain::HandlerChain;
pub use forwarding::ForwardHandler;
pub use server::{BufferedSink, DnsServerHandler};
