use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::Record;
use shard_dns_application::ports::{DnsHandler, RequestContext, ResponseSink};
use shard_dns_domain::DomainError;
use std::sync::Mutex;

use super::upstream_response;

/// Sink that keeps everything written to it.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Vec<Message>,
    pub raw: Vec<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single_message(&self) -> &Message {
        assert_eq!(self.messages.len(), 1, "expected exactly one response");
        &self.messages[0]
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        self.messages.push(response);
        Ok(())
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<usize, DomainError> {
        self.raw.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

enum Behaviour {
    Answer(Vec<Record>),
    Raw(Vec<u8>),
    Fail(DomainError),
    Silent(ResponseCode),
}

/// Stand-in for the rest of the chain: records what reached it and replies
/// as configured.
pub struct MockNextHandler {
    behaviour: Behaviour,
    received: Mutex<Vec<Message>>,
}

impl MockNextHandler {
    pub fn answering(answers: Vec<Record>) -> Self {
        Self::with(Behaviour::Answer(answers))
    }

    pub fn writing_raw(bytes: Vec<u8>) -> Self {
        Self::with(Behaviour::Raw(bytes))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with(Behaviour::Fail(error))
    }

    pub fn silent(code: ResponseCode) -> Self {
        Self::with(Behaviour::Silent(code))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for MockNextHandler {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn serve(
        &self,
        _ctx: &RequestContext,
        sink: &mut dyn ResponseSink,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.received.lock().unwrap().push(request.clone());

        match &self.behaviour {
            Behaviour::Answer(answers) => {
                let response = upstream_response(request, answers.clone());
                let code = response.response_code();
                sink.write_message(response).await?;
                Ok(code)
            }
            Behaviour::Raw(bytes) => {
                sink.write_raw(bytes).await?;
                Ok(ResponseCode::NoError)
            }
            Behaviour::Fail(error) => Err(error.clone()),
            Behaviour::Silent(code) => Ok(*code),
        }
    }
}
