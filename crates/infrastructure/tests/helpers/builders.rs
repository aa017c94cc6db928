use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use shard_dns_application::ports::{DnsHandler, RequestContext, RequestProtocol, ResponseSink};
use shard_dns_domain::DomainError;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub fn name(value: &str) -> Name {
    Name::from_str(value).unwrap()
}

pub fn ctx() -> RequestContext {
    RequestContext::new("127.0.0.1:40000".parse().unwrap(), RequestProtocol::Udp)
}

pub fn a_query(id: u16, qname: &str) -> Message {
    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name(qname), RecordType::A));
    message
}

pub fn a_answers(owner: &Name, addresses: &[Ipv4Addr]) -> Vec<Record> {
    addresses
        .iter()
        .map(|address| Record::from_rdata(owner.clone(), 300, RData::A(A(*address))))
        .collect()
}

pub fn addresses_of(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}

pub fn ips(addresses: &[&str]) -> Vec<Ipv4Addr> {
    addresses.iter().map(|a| a.parse().unwrap()).collect()
}

/// Terminal handler answering every question with a fixed set of A records
/// owned by the question name.
pub struct StaticAnswerHandler {
    addresses: Vec<Ipv4Addr>,
    received: Mutex<Vec<Message>>,
}

impl StaticAnswerHandler {
    pub fn new(addresses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            addresses: ips(addresses),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for StaticAnswerHandler {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn serve(
        &self,
        _ctx: &RequestContext,
        sink: &mut dyn ResponseSink,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.received.lock().unwrap().push(request.clone());

        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true);
        for query in request.queries() {
            response.add_query(query.clone());
            response.add_answers(a_answers(query.name(), &self.addresses));
        }

        sink.write_message(response).await?;
        Ok(ResponseCode::NoError)
    }
}

/// Terminal handler that writes nothing and reports a fixed outcome.
pub struct SilentHandler {
    outcome: Result<ResponseCode, DomainError>,
}

impl SilentHandler {
    pub fn returning(code: ResponseCode) -> Arc<Self> {
        Arc::new(Self { outcome: Ok(code) })
    }

    pub fn failing(error: DomainError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
        })
    }
}

#[async_trait]
impl DnsHandler for SilentHandler {
    fn name(&self) -> &'static str {
        "silent"
    }

    async fn serve(
        &self,
        _ctx: &RequestContext,
        _sink: &mut dyn ResponseSink,
        _request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.outcome.clone()
    }
}
