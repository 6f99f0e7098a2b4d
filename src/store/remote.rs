//! Client adapter for a store host reached over TCP.

use std::{fmt, sync::Arc};

use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
    runtime::{Builder, Runtime},
    sync::{mpsc::UnboundedSender, watch},
};

use crate::domain::{
    feed::FeedEvent,
    group::GroupLookup,
    message::{Message, NewMessage},
    subscription::Subscription,
};

use super::{
    protocol::{
        decode_line, encode_line, read_frame_line, unexpected, Request, Response,
        MAX_RESPONSE_BYTES,
    },
    ChatStore, StoreError,
};

const REMOTE_FEED_STOPPED: &str = "REMOTE_FEED_STOPPED";
const REMOTE_FEED_CLOSED_BY_HOST: &str = "REMOTE_FEED_CLOSED_BY_HOST";
const REMOTE_FEED_BAD_FRAME: &str = "REMOTE_FEED_BAD_FRAME";

type FrameReader = BufReader<OwnedReadHalf>;

/// Talks to a store host. Requests use a fresh connection each; every live
/// subscription holds its own connection on the background runtime.
#[derive(Clone)]
pub struct RemoteStore {
    endpoint: String,
    runtime: Arc<Runtime>,
}

impl RemoteStore {
    pub fn connect(endpoint: impl Into<String>) -> Result<Self, StoreError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("messx-store")
            .enable_io()
            .build()
            .map_err(|error| StoreError::Unavailable(format!("runtime start failed: {error}")))?;

        Ok(Self::with_runtime(endpoint, Arc::new(runtime)))
    }

    pub fn with_runtime(endpoint: impl Into<String>, runtime: Arc<Runtime>) -> Self {
        Self {
            endpoint: endpoint.into(),
            runtime,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call(&self, request: Request) -> Result<Response, StoreError> {
        self.runtime.block_on(async {
            let (mut reader, mut writer) = open(&self.endpoint).await?;
            send_frame(&mut writer, &request).await?;
            read_frame(&mut reader).await?.into_result()
        })
    }
}

impl fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStore")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ChatStore for RemoteStore {
    fn ensure_group(&self, group: &str) -> Result<GroupLookup, StoreError> {
        match self.call(Request::EnsureGroup {
            group: group.to_owned(),
        })? {
            Response::GroupReady {
                created,
                server_time_ms,
            } => Ok(GroupLookup {
                created,
                server_time_ms,
            }),
            other => Err(unexpected("groupReady", &other)),
        }
    }

    fn list_groups(&self) -> Result<Vec<String>, StoreError> {
        match self.call(Request::ListGroups)? {
            Response::Groups { names } => Ok(names),
            other => Err(unexpected("groups", &other)),
        }
    }

    fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError> {
        match self.call(Request::AddMessage {
            group: group.to_owned(),
            message,
        })? {
            Response::MessageAdded { message } => Ok(message),
            other => Err(unexpected("messageAdded", &other)),
        }
    }

    fn recent_messages(&self, group: &str, limit: usize) -> Result<Vec<Message>, StoreError> {
        match self.call(Request::RecentMessages {
            group: group.to_owned(),
            limit,
        })? {
            Response::Messages { messages } => Ok(messages),
            other => Err(unexpected("messages", &other)),
        }
    }

    fn subscribe(
        &self,
        group: &str,
        user: &str,
        since_ms: i64,
    ) -> Result<Subscription, StoreError> {
        let request = Request::Subscribe {
            group: group.to_owned(),
            user: user.to_owned(),
            since_ms,
        };

        let (reader, writer) = self.runtime.block_on(async {
            let (mut reader, mut writer) = open(&self.endpoint).await?;
            send_frame(&mut writer, &request).await?;
            match read_frame(&mut reader).await?.into_result()? {
                Response::Subscribed => Ok((reader, writer)),
                other => Err(unexpected("subscribed", &other)),
            }
        })?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let (events_tx, subscription) = Subscription::channel(group, move || {
            let _ = stop_tx.send(true);
        });

        self.runtime.spawn(forward_events(
            group.to_owned(),
            reader,
            writer,
            events_tx,
            stop_rx,
        ));

        Ok(subscription)
    }

    fn online_users(&self, group: &str) -> Result<Vec<String>, StoreError> {
        match self.call(Request::OnlineUsers {
            group: group.to_owned(),
        })? {
            Response::Users { names } => Ok(names),
            other => Err(unexpected("users", &other)),
        }
    }
}

async fn open(endpoint: &str) -> Result<(FrameReader, OwnedWriteHalf), StoreError> {
    let stream = TcpStream::connect(endpoint)
        .await
        .map_err(|error| StoreError::Unavailable(format!("{endpoint}: {error}")))?;
    let (read_half, write_half) = stream.into_split();
    Ok((BufReader::new(read_half), write_half))
}

async fn send_frame(writer: &mut OwnedWriteHalf, request: &Request) -> Result<(), StoreError> {
    let line = encode_line(request)?;
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|error| StoreError::Unavailable(format!("write failed: {error}")))
}

async fn read_frame(reader: &mut FrameReader) -> Result<Response, StoreError> {
    match read_frame_line(reader, MAX_RESPONSE_BYTES).await {
        Ok(Some(line)) => decode_line(&line),
        Ok(None) => Err(StoreError::Unavailable(
            "connection closed before a response arrived".to_owned(),
        )),
        Err(error) => Err(StoreError::Unavailable(format!("read failed: {error}"))),
    }
}

/// Copies `event` frames into the subscription until it is cancelled or the host hangs up.
async fn forward_events(
    group: String,
    mut reader: FrameReader,
    writer: OwnedWriteHalf,
    events_tx: UnboundedSender<FeedEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::debug!(code = REMOTE_FEED_STOPPED, group = %group, "remote feed cancelled");
                    break;
                }
            }
            frame = read_frame(&mut reader) => {
                match frame {
                    Ok(Response::Event { event }) => {
                        if events_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Ok(other) => {
                        tracing::warn!(
                            code = REMOTE_FEED_BAD_FRAME,
                            group = %group,
                            frame = other.kind(),
                            "ignoring unexpected frame on feed"
                        );
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = REMOTE_FEED_CLOSED_BY_HOST,
                            group = %group,
                            error = %error,
                            "remote feed ended"
                        );
                        break;
                    }
                }
            }
        }
    }

    drop(writer);
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use tokio::net::TcpListener;

    use super::*;
    use crate::store::{protocol::MAX_REQUEST_BYTES, server::StoreHost, MemoryStore};

    fn runtime() -> Arc<Runtime> {
        Arc::new(
            Builder::new_multi_thread()
                .worker_threads(2)
                .enable_io()
                .build()
                .expect("runtime should build"),
        )
    }

    fn start_host(runtime: &Runtime, store: MemoryStore) -> (String, watch::Sender<bool>) {
        let host = runtime
            .block_on(StoreHost::bind("127.0.0.1:0", store))
            .expect("host should bind");
        let addr = host.local_addr().expect("host address");
        let (stop_tx, stop_rx) = watch::channel(false);
        runtime.spawn(host.run(stop_rx));
        (addr.to_string(), stop_tx)
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn message_from_one_client_reaches_another_clients_feed() {
        let runtime = runtime();
        let (endpoint, _stop) = start_host(&runtime, MemoryStore::new());
        let alice = RemoteStore::with_runtime(endpoint.clone(), Arc::clone(&runtime));
        let bob = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));

        let lookup = bob.ensure_group("lobby").expect("bob joins");
        assert!(lookup.created);
        let mut feed = bob
            .subscribe("lobby", "bob", lookup.server_time_ms)
            .expect("bob subscribes");

        assert!(!alice.ensure_group("lobby").expect("alice joins").created);
        alice
            .add_message("lobby", NewMessage::new("alice", "hello"))
            .expect("alice sends");

        let mut delivered = Vec::new();
        assert!(wait_until(|| {
            delivered.extend(feed.drain());
            delivered.iter().any(|event| event.message().is_some())
        }));
        assert_eq!(
            delivered[0],
            FeedEvent::Joined {
                user: "bob".to_owned()
            }
        );
        let line = delivered[1].to_line().text;
        assert!(line.contains("alice"));
        assert!(line.contains("hello"));
    }

    #[test]
    fn presence_is_shared_between_clients() {
        let runtime = runtime();
        let (endpoint, _stop) = start_host(&runtime, MemoryStore::new());
        let alice = RemoteStore::with_runtime(endpoint.clone(), Arc::clone(&runtime));
        let bob = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));
        let lookup = alice.ensure_group("ops").expect("group");

        let mut alice_feed = alice
            .subscribe("ops", "alice", lookup.server_time_ms)
            .expect("alice subscribes");
        let bob_feed = bob
            .subscribe("ops", "bob", lookup.server_time_ms)
            .expect("bob subscribes");
        assert_eq!(
            alice.online_users("ops").expect("users"),
            vec!["alice".to_owned(), "bob".to_owned()]
        );

        bob_feed.cancel();

        let mut delivered = Vec::new();
        assert!(wait_until(|| {
            delivered.extend(alice_feed.drain());
            delivered.contains(&FeedEvent::Left {
                user: "bob".to_owned(),
            })
        }));
        assert!(delivered.contains(&FeedEvent::Joined {
            user: "bob".to_owned()
        }));
        assert!(wait_until(|| {
            alice.online_users("ops").ok() == Some(vec!["alice".to_owned()])
        }));
    }

    #[test]
    fn host_drops_oversized_requests_and_keeps_serving() {
        use tokio::io::AsyncReadExt;

        let runtime = runtime();
        let (endpoint, _stop) = start_host(&runtime, MemoryStore::new());

        let closed = runtime.block_on(async {
            let mut stream = TcpStream::connect(&endpoint).await.expect("connect");
            let flood = vec![b'x'; MAX_REQUEST_BYTES + 1024];
            let _ = stream.write_all(&flood).await;
            let mut buffer = [0u8; 64];
            matches!(stream.read(&mut buffer).await, Ok(0) | Err(_))
        });
        assert!(closed, "host should hang up on an oversized frame");

        let client = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));
        assert!(client.ensure_group("ops").expect("group").created);
    }

    #[test]
    fn queries_round_trip_over_tcp() {
        let runtime = runtime();
        let (endpoint, _stop) = start_host(&runtime, MemoryStore::new());
        let client = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));

        client.ensure_group("ops").expect("group");
        client.ensure_group("dev").expect("group");
        for body in ["one", "two", "three"] {
            client
                .add_message("ops", NewMessage::new("bob", body))
                .expect("send");
        }

        assert_eq!(
            client.list_groups().expect("list"),
            vec!["dev".to_owned(), "ops".to_owned()]
        );
        let bodies: Vec<_> = client
            .recent_messages("ops", 2)
            .expect("recent")
            .into_iter()
            .map(|message| message.body)
            .collect();
        assert_eq!(bodies, vec!["three", "two"]);
    }

    #[test]
    fn host_rejection_surfaces_as_rejected_error() {
        let runtime = runtime();
        let (endpoint, _stop) = start_host(&runtime, MemoryStore::new());
        let client = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));

        let result = client.add_message("missing", NewMessage::new("bob", "hi"));

        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }

    #[test]
    fn unreachable_host_is_unavailable() {
        let runtime = runtime();
        let endpoint = runtime.block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            listener.local_addr().expect("addr").to_string()
        });
        let client = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));

        assert!(matches!(
            client.list_groups(),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn cancelling_detaches_the_host_side_feed() {
        let runtime = runtime();
        let store = MemoryStore::new();
        let (endpoint, _stop) = start_host(&runtime, store.clone());
        let client = RemoteStore::with_runtime(endpoint, Arc::clone(&runtime));

        let lookup = client.ensure_group("ops").expect("group");
        let feed = client
            .subscribe("ops", "alice", lookup.server_time_ms)
            .expect("subscribe");
        assert_eq!(store.live_subscriptions(), 1);

        feed.cancel();

        assert!(wait_until(|| store.live_subscriptions() == 0));
    }
}
