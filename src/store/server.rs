//! TCP host that shares one `MemoryStore` between many clients.

use std::{io, net::SocketAddr};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpListener, TcpStream,
    },
    sync::watch,
};

use super::{
    protocol::{
        decode_line, encode_line, read_frame_line, Request, Response, MAX_REQUEST_BYTES,
    },
    ChatStore, MemoryStore,
};

const STORE_HOST_STARTED: &str = "STORE_HOST_STARTED";
const STORE_HOST_STOPPED: &str = "STORE_HOST_STOPPED";
const STORE_HOST_ACCEPT_FAILED: &str = "STORE_HOST_ACCEPT_FAILED";
const STORE_HOST_READ_FAILED: &str = "STORE_HOST_READ_FAILED";
const STORE_HOST_BAD_FRAME: &str = "STORE_HOST_BAD_FRAME";

pub struct StoreHost {
    listener: TcpListener,
    store: MemoryStore,
}

impl StoreHost {
    pub async fn bind(addr: &str, store: MemoryStore) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, store })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` flips to true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let local_addr = self.local_addr().ok();
        tracing::info!(
            code = STORE_HOST_STARTED,
            addr = ?local_addr,
            "store host listening"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                accept = self.listener.accept() => {
                    match accept {
                        Ok((stream, peer)) => {
                            let store = self.store.clone();
                            tokio::spawn(handle_connection(stream, peer, store));
                        }
                        Err(error) => {
                            tracing::warn!(
                                code = STORE_HOST_ACCEPT_FAILED,
                                error = %error,
                                "failed to accept store connection"
                            );
                        }
                    }
                }
            }
        }

        tracing::info!(code = STORE_HOST_STOPPED, "store host stopped");
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, store: MemoryStore) {
    tracing::debug!(%peer, "store connection opened");

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let line = match read_frame_line(&mut reader, MAX_REQUEST_BYTES).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(
                    code = STORE_HOST_READ_FAILED,
                    %peer,
                    error = %error,
                    "store connection read failed"
                );
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match decode_line(&line) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(code = STORE_HOST_BAD_FRAME, %peer, error = %error, "bad request frame");
                if write_frame(&mut write_half, &Response::from(error)).await.is_err() {
                    break;
                }
                continue;
            }
        };

        tracing::debug!(%peer, request = request.kind(), "store request");

        if let Request::Subscribe {
            group,
            user,
            since_ms,
        } = request
        {
            let feed = FeedRequest {
                group: &group,
                user: &user,
                since_ms,
            };
            stream_events(&store, feed, &mut reader, &mut write_half, peer).await;
            break;
        }

        let response = execute(&store, request);
        if write_frame(&mut write_half, &response).await.is_err() {
            break;
        }
    }

    tracing::debug!(%peer, "store connection closed");
}

fn execute(store: &MemoryStore, request: Request) -> Response {
    let result = match request {
        Request::EnsureGroup { group } => store
            .ensure_group(&group)
            .map(|lookup| Response::GroupReady {
                created: lookup.created,
                server_time_ms: lookup.server_time_ms,
            }),
        Request::ListGroups => store
            .list_groups()
            .map(|names| Response::Groups { names }),
        Request::AddMessage { group, message } => {
            store.add_message(&group, message).map(|message| {
                tracing::info!(
                    group = %message.group,
                    user = %message.user,
                    timestamp_ms = message.timestamp_ms,
                    "[{}] {}",
                    message.user,
                    message.body
                );
                Response::MessageAdded { message }
            })
        }
        Request::RecentMessages { group, limit } => store
            .recent_messages(&group, limit)
            .map(|messages| Response::Messages { messages }),
        Request::OnlineUsers { group } => store
            .online_users(&group)
            .map(|names| Response::Users { names }),
        Request::Subscribe { .. } => Ok(Response::from(super::StoreError::Protocol(
            "subscribe must be handled as a stream".to_owned(),
        ))),
    };

    result.unwrap_or_else(Response::from)
}

struct FeedRequest<'a> {
    group: &'a str,
    user: &'a str,
    since_ms: i64,
}

/// Holds the connection open as an event stream until either side goes away.
///
/// Anything the client writes after subscribing is discarded; end of stream
/// cancels the feed.
async fn stream_events(
    store: &MemoryStore,
    feed: FeedRequest<'_>,
    reader: &mut BufReader<OwnedReadHalf>,
    write_half: &mut OwnedWriteHalf,
    peer: SocketAddr,
) {
    let FeedRequest {
        group,
        user,
        since_ms,
    } = feed;
    let mut subscription = match store.subscribe(group, user, since_ms) {
        Ok(subscription) => subscription,
        Err(error) => {
            let _ = write_frame(write_half, &Response::from(error)).await;
            return;
        }
    };

    if write_frame(write_half, &Response::Subscribed).await.is_err() {
        return;
    }
    tracing::info!(
        %peer,
        group,
        user,
        live = store.live_subscriptions(),
        "subscriber attached"
    );

    let mut discard = [0u8; 512];
    loop {
        tokio::select! {
            delivered = subscription.recv() => {
                let Some(event) = delivered else { break };
                if write_frame(write_half, &Response::Event { event }).await.is_err() {
                    break;
                }
            }
            incoming = reader.read(&mut discard) => {
                match incoming {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        }
    }

    drop(subscription);
    tracing::info!(
        %peer,
        group,
        user,
        live = store.live_subscriptions(),
        "subscriber detached"
    );
}

async fn write_frame(write_half: &mut OwnedWriteHalf, response: &Response) -> io::Result<()> {
    let line = encode_line(response).map_err(io::Error::other)?;
    write_half.write_all(line.as_bytes()).await?;
    write_half.flush().await
}
