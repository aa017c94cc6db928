use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use shard_dns_application::ports::{RequestContext, RequestProtocol};
use shard_dns_domain::{ShardNameCodec, ShardSpec};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub fn name(value: &str) -> Name {
    Name::from_str(value).unwrap()
}

pub fn spec(requested: &str) -> ShardSpec {
    ShardNameCodec::with_default_bound()
        .unwrap()
        .parse(requested)
        .unwrap()
}

pub fn ctx() -> RequestContext {
    RequestContext::new("192.168.1.100:53000".parse().unwrap(), RequestProtocol::Udp)
}

pub fn a_record(owner: &str, address: &str, ttl: u32) -> Record {
    let address: Ipv4Addr = address.parse().unwrap();
    Record::from_rdata(name(owner), ttl, RData::A(A(address)))
}

pub fn aaaa_record(owner: &str, address: &str) -> Record {
    let address: Ipv6Addr = address.parse().unwrap();
    Record::from_rdata(name(owner), 60, RData::AAAA(AAAA(address)))
}

pub fn cname_record(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), 60, RData::CNAME(CNAME(name(target))))
}

pub fn a_records(owner: &str, addresses: &[&str]) -> Vec<Record> {
    addresses
        .iter()
        .map(|address| a_record(owner, address, 300))
        .collect()
}

pub fn addresses_of(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0.to_string()),
            _ => None,
        })
        .collect()
}

/// Client query with a typical recursive header.
pub struct QueryBuilder {
    id: u16,
    qname: Name,
    record_type: RecordType,
    class: DNSClass,
    authoritative: bool,
    checking_disabled: bool,
    authentic_data: bool,
}

impl QueryBuilder {
    pub fn new(id: u16, qname: &str) -> Self {
        Self {
            id,
            qname: name(qname),
            record_type: RecordType::A,
            class: DNSClass::IN,
            authoritative: false,
            checking_disabled: false,
            authentic_data: false,
        }
    }

    pub fn record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    pub fn class(mut self, class: DNSClass) -> Self {
        self.class = class;
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.authoritative = true;
        self
    }

    pub fn checking_disabled(mut self) -> Self {
        self.checking_disabled = true;
        self
    }

    pub fn authentic_data(mut self) -> Self {
        self.authentic_data = true;
        self
    }

    pub fn build(self) -> Message {
        let mut query = Query::query(self.qname, self.record_type);
        query.set_query_class(self.class);

        let mut message = Message::new(self.id, MessageType::Query, OpCode::Query);
        message
            .set_recursion_desired(true)
            .set_authoritative(self.authoritative)
            .set_checking_disabled(self.checking_disabled)
            .set_authentic_data(self.authentic_data);
        message.add_query(query);
        message
    }
}

/// Upstream reply to `request` carrying `answers`.
pub fn upstream_response(request: &Message, answers: Vec<Record>) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
    response
        .set_authoritative(true)
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(ResponseCode::NoError);
    for query in request.queries() {
        response.add_query(query.clone());
    }
    response.add_answers(answers);
    response
}
