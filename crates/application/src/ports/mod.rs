mod dns_handler;
mod response_sink;

pub use dns_handler::{next_or_failure, DnsHandler, RequestContext, RequestProtocol};
pub use response_sink::ResponseSink;
