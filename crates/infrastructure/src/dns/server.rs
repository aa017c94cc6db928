//! Wire-level entry point shared by the UDP and TCP listeners.

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use shard_dns_application::ports::{DnsHandler, RequestContext, ResponseSink};
use shard_dns_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Holds the single encoded reply a chain produces for one request.
#[derive(Debug, Default)]
pub struct BufferedSink {
    response: Option<Vec<u8>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_written(&self) -> bool {
        self.response.is_some()
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.response
    }

    fn store(&mut self, bytes: Vec<u8>) -> Result<(), DomainError> {
        if self.response.is_some() {
            return Err(DomainError::ResponseAlreadyWritten);
        }
        self.response = Some(bytes);
        Ok(())
    }
}

#[async_trait]
impl ResponseSink for BufferedSink {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        let bytes = response
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to encode response: {}", e)))?;
        self.store(bytes)
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<usize, DomainError> {
        self.store(bytes.to_vec())?;
        Ok(bytes.len())
    }
}

pub struct DnsServerHandler {
    chain: Arc<dyn DnsHandler>,
}

impl DnsServerHandler {
    pub fn new(chain: Arc<dyn DnsHandler>) -> Self {
        Self { chain }
    }

    /// Runs one raw query through the chain. `None` means nothing should
    /// be sent back.
    pub async fn handle_raw(&self, query: &[u8], ctx: RequestContext) -> Option<Vec<u8>> {
        let request = match Message::from_vec(query) {
            Ok(request) => request,
            Err(e) => {
                warn!(client = %ctx.client, error = %e, "Malformed DNS query");
                return format_error(query);
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %ctx.client, id = request.id(), "Dropping non-query message");
            return None;
        }

        let mut sink = BufferedSink::new();
        let outcome = self.chain.serve(&ctx, &mut sink, &request).await;

        if let Some(bytes) = sink.into_bytes() {
            if let Err(e) = &outcome {
                debug!(client = %ctx.client, error = %e, "Chain failed after writing a response");
            }
            return Some(bytes);
        }

        let code = match outcome {
            Ok(code) if needs_error_response(code) => code,
            Ok(code) => {
                debug!(client = %ctx.client, rcode = ?code, "Chain wrote nothing");
                return None;
            }
            Err(e) => {
                error!(client = %ctx.client, handler = self.chain.name(), error = %e, "Query handling failed");
                ResponseCode::ServFail
            }
        };

        encode(&error_response(&request, code))
    }
}

fn needs_error_response(code: ResponseCode) -> bool {
    matches!(
        code,
        ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::FormErr | ResponseCode::NotImp
    )
}

fn error_response(request: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
    response
        .set_recursion_desired(request.recursion_desired())
        .set_checking_disabled(request.checking_disabled())
        .set_response_code(code);
    for query in request.queries() {
        response.add_query(query.clone());
    }
    response
}

fn format_error(query: &[u8]) -> Option<Vec<u8>> {
    let id = match query {
        [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
        _ => return None,
    };
    let mut response = Message::new(id, MessageType::Response, OpCode::Query);
    response.set_response_code(ResponseCode::FormErr);
    encode(&response)
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    match message.to_vec() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode error response");
            None
        }
    }
}
