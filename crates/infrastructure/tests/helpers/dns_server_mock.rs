use hickory_proto::op::{Message, MessageType};
use shard_dns_infrastructure::dns::transport::tcp::{read_framed, write_framed};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

use super::a_answers;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answer every A question with these addresses.
    Answer(Vec<Ipv4Addr>),
    /// Reply truncated over UDP, fully over TCP.
    TruncateUdp(Vec<Ipv4Addr>),
    /// Reply with a transaction id that does not match the query.
    WrongId,
    /// Never reply.
    Silent,
}

/// Upstream resolver on 127.0.0.1 serving UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<Message>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let (socket, listener) = bind_pair().await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let recorded = queries.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            if let Some(reply) = respond(&behavior, &buf[..len], false, &recorded) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                    result = listener.accept() => {
                        if let Ok((mut stream, _)) = result {
                            let behavior = behavior.clone();
                            let recorded = recorded.clone();
                            tokio::spawn(async move {
                                if let Ok(query) = read_framed(&mut stream).await {
                                    if let Some(reply) = respond(&behavior, &query, true, &recorded) {
                                        let _ = write_framed(&mut stream, &reply).await;
                                    }
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> Vec<Message> {
        self.queries.lock().unwrap().clone()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn bind_pair() -> Result<(UdpSocket, TcpListener), std::io::Error> {
    let mut last_error = None;
    for _ in 0..16 {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        match TcpListener::bind(socket.local_addr()?).await {
            Ok(listener) => return Ok((socket, listener)),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap())
}

fn respond(
    behavior: &MockBehavior,
    query: &[u8],
    over_tcp: bool,
    recorded: &Mutex<Vec<Message>>,
) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    recorded.lock().unwrap().push(request.clone());

    let (id, addresses, truncated) = match behavior {
        MockBehavior::Silent => return None,
        MockBehavior::WrongId => (request.id().wrapping_add(1), Vec::new(), false),
        MockBehavior::Answer(addresses) => (request.id(), addresses.clone(), false),
        MockBehavior::TruncateUdp(addresses) if over_tcp => {
            (request.id(), addresses.clone(), false)
        }
        MockBehavior::TruncateUdp(_) => (request.id(), Vec::new(), true),
    };

    let mut response = Message::new(id, MessageType::Response, request.op_code());
    response
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_truncated(truncated);
    for question in request.queries() {
        response.add_query(question.clone());
        response.add_answers(a_answers(question.name(), &addresses));
    }

    response.to_vec().ok()
}
