// WebSocket server for communication with draft clients.

use futures_util::stream::Stream;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Events emitted by the WebSocket server to the application layer.
#[derive(Debug, PartialEq)]
pub enum WsEvent {
    /// A new WebSocket client has connected.
    Connected { addr: String },
    /// The current WebSocket client has disconnected.
    Disconnected,
    /// A text message was received from the client (raw JSON string).
    Message(String),
}

/// Run the WebSocket server on the given port.
///
/// Binds `127.0.0.1:{port}` and serves one client at a time. Incoming text
/// frames are forwarded through `tx`; strings received on `out_rx` are
/// written back to the connected client. Returns when either channel closes.
pub async fn run(
    port: u16,
    tx: mpsc::Sender<WsEvent>,
    mut out_rx: mpsc::Receiver<String>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let local_addr = listener.local_addr()?;
    info!("WebSocket server listening on {local_addr}");

    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        info!("Accepted TCP connection from {addr_str}");

        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!("WebSocket handshake failed for {addr_str}: {e}");
                continue;
            }
        };

        // Replies still queued for a previous client are dropped.
        let mut stale = 0usize;
        while out_rx.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!("discarded {stale} replies queued for a previous client");
        }

        if tx
            .send(WsEvent::Connected {
                addr: addr_str.clone(),
            })
            .await
            .is_err()
        {
            break;
        }

        let (write, read) = ws_stream.split();
        if serve_connection(read, write, &tx, &mut out_rx, &addr_str)
            .await
            .is_err()
        {
            break;
        }

        if tx.send(WsEvent::Disconnected).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Pump one connection: forward text frames from `read` through `tx` and
/// write replies from `out_rx` to `write`.
///
/// Returns `Ok(())` when the client goes away and `Err(())` when either
/// channel is closed, signalling the caller to stop. Generic over the stream
/// and sink so it can be driven by in-memory fakes.
pub async fn serve_connection<St, Si>(
    mut read: St,
    mut write: Si,
    tx: &mpsc::Sender<WsEvent>,
    out_rx: &mut mpsc::Receiver<String>,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    Si: Sink<Message> + Unpin,
    Si::Error: std::fmt::Display,
{
    loop {
        tokio::select! {
            biased;

            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if tx.send(WsEvent::Message(text.to_string())).await.is_err() {
                        return Err(());
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    info!("Client {addr} sent close frame");
                    break;
                }
                Some(Err(e)) => {
                    warn!("WebSocket error from {addr}: {e}");
                    break;
                }
                None => break,
                Some(Ok(_)) => {
                    // Binary, Ping, Pong and raw frames carry nothing for us.
                }
            },

            reply = out_rx.recv() => {
                let Some(text) = reply else {
                    return Err(());
                };
                if let Err(e) = write.send(Message::text(text)).await {
                    warn!("Failed to send reply to {addr}: {e}");
                    break;
                }
            }
        }
    }
    Ok(())
}
