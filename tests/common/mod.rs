//! Fake line-protocol server for client tests
//!
//! Accepts connections one at a time, reads the request line and acts out a
//! scripted reply. Every accepted request line is recorded, and so is
//! whether the client closed its end afterwards.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpListener;

/// How long the server waits for the client to close after a reply
const CLOSE_WAIT: Duration = Duration::from_secs(5);

/// What the server does with one connection
#[derive(Debug, Clone)]
pub enum Reply {
    /// Write each chunk in order, pausing `gap` between chunks
    Chunks { chunks: Vec<Vec<u8>>, gap: Duration },
    /// Sleep, then write the text
    Delayed { text: String, delay: Duration },
    /// Write the request line back
    Echo,
    /// Close without writing anything
    Close,
    /// Read the request and never answer
    Hang,
}

impl Reply {
    pub fn line(text: &str) -> Self {
        Reply::Chunks {
            chunks: vec![format!("{}\n", text).into_bytes()],
            gap: Duration::ZERO,
        }
    }

    pub fn split(parts: &[&str], gap: Duration) -> Self {
        Reply::Chunks {
            chunks: parts.iter().map(|p| p.as_bytes().to_vec()).collect(),
            gap,
        }
    }

    async fn act_out(self, request: &str, write: &mut OwnedWriteHalf) {
        match self {
            Reply::Chunks { chunks, gap } => {
                for (i, chunk) in chunks.iter().enumerate() {
                    if i > 0 && !gap.is_zero() {
                        tokio::time::sleep(gap).await;
                    }
                    if write.write_all(chunk).await.is_err() {
                        break;
                    }
                    let _ = write.flush().await;
                }
            }
            Reply::Delayed { text, delay } => {
                tokio::time::sleep(delay).await;
                let _ = write.write_all(text.as_bytes()).await;
            }
            Reply::Echo => {
                let _ = write.write_all(request.as_bytes()).await;
            }
            Reply::Close | Reply::Hang => {}
        }
    }
}

pub struct FakeServer {
    pub addr: String,
    pub port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    client_closed: Arc<Mutex<Vec<bool>>>,
}

impl FakeServer {
    /// Serve replies produced by `script(connection_index, request_line)`.
    ///
    /// After replying, the server shuts down its write side (except for
    /// [`Reply::Hang`]) and reads until the client closes, so each
    /// connection ends with a record of whether EOF arrived.
    pub async fn start<F>(script: F) -> Self
    where
        F: Fn(usize, &str) -> Reply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let client_closed = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let closes = client_closed.clone();

        tokio::spawn(async move {
            let mut index = 0;
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let (read, mut write) = socket.into_split();
                let mut reader = BufReader::new(read);
                let mut line = String::new();
                if reader.read_line(&mut line).await.is_err() {
                    continue;
                }
                recorded.lock().unwrap().push(line.trim_end_matches('\n').to_string());

                let reply = script(index, line.trim_end_matches('\n'));
                let hang = matches!(reply, Reply::Hang);
                reply.act_out(&line, &mut write).await;
                if !hang {
                    drop(write);
                }

                let mut rest = Vec::new();
                let saw_eof = matches!(
                    tokio::time::timeout(CLOSE_WAIT, reader.read_to_end(&mut rest)).await,
                    Ok(Ok(_))
                );
                closes.lock().unwrap().push(saw_eof);
                index += 1;
            }
        });

        Self {
            addr: format!("127.0.0.1:{}", port),
            port,
            requests,
            client_closed,
        }
    }

    /// Always answer with the same line
    pub async fn constant(text: &str) -> Self {
        let text = text.to_string();
        Self::start(move |_, _| Reply::line(&text)).await
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Whether the client closed connection `index` after the exchange.
    pub async fn client_closed(&self, index: usize) -> bool {
        let deadline = tokio::time::Instant::now() + CLOSE_WAIT + Duration::from_secs(1);
        loop {
            let closed = self.client_closed.lock().unwrap().get(index).copied();
            if let Some(closed) = closed {
                return closed;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// A local port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
