//! Multi-client TCP command server.
//!
//! One task owns the listener, every client session, and the action
//! interface, and multiplexes readiness across all of them. Each iteration
//! waits until the listener or any session socket is ready, services
//! everything that is ready once, then waits again. Commands are dispatched
//! inline, so an action always runs to completion before the next readiness
//! wait — controllers are serialized with respect to action execution, and
//! callers of the action interface may rely on that ordering.
//!
//! Session reads are genuinely non-blocking (`try_read` after a readiness
//! check); a wakeup that loses the race to actual data simply keeps the
//! session and waits again.

use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::task::Poll;

use helm_core::command::{CommandBuffer, GREETING};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::application::control::GameActions;
use crate::infrastructure::command::{respond_to_line, READ_CHUNK};

/// Server-side state for one accepted controller connection.
struct ClientSession {
    stream: TcpStream,
    peer: SocketAddr,
    buffer: CommandBuffer,
}

/// What one readiness wait observed.
enum Readiness {
    /// A new controller connected.
    Incoming(TcpStream, SocketAddr),
    /// These sessions have bytes, an EOF, or an error to collect.
    Readable(Vec<usize>),
}

/// The TCP command server.
pub struct CommandServer<A> {
    listener: TcpListener,
    sessions: Vec<ClientSession>,
    actions: A,
}

impl<A: GameActions> CommandServer<A> {
    /// Binds the listener and takes exclusive ownership of the action
    /// interface. Exclusive ownership is the serialization guarantee.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, actions: A) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("command server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            sessions: Vec::new(),
            actions,
        })
    }

    /// The address actually bound (the OS picks one when binding port 0).
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the local address cannot be read back.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Accepts and serves controllers until the listener fails.
    ///
    /// Session-level errors never end the loop; they only drop the one
    /// session that produced them.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the listener itself fails.
    pub async fn run(mut self) -> io::Result<()> {
        loop {
            self.step().await?;
        }
    }

    /// One readiness iteration: wait, then service everything that is ready.
    pub async fn step(&mut self) -> io::Result<()> {
        match self.wait_ready().await? {
            Readiness::Incoming(stream, peer) => self.accept_session(stream, peer).await,
            Readiness::Readable(indexes) => {
                // Highest index first, so removals keep the rest valid.
                for index in indexes.into_iter().rev() {
                    self.service_session(index).await;
                }
            }
        }
        Ok(())
    }

    /// Blocks until the listener or any session socket is ready for reading.
    async fn wait_ready(&mut self) -> io::Result<Readiness> {
        poll_fn(|cx| {
            if let Poll::Ready(result) = self.listener.poll_accept(cx) {
                return Poll::Ready(result.map(|(stream, peer)| Readiness::Incoming(stream, peer)));
            }

            let mut readable = Vec::new();
            for (index, session) in self.sessions.iter().enumerate() {
                // An error counts as readable: the follow-up read surfaces it.
                if session.stream.poll_read_ready(cx).is_ready() {
                    readable.push(index);
                }
            }
            if readable.is_empty() {
                Poll::Pending
            } else {
                Poll::Ready(Ok(Readiness::Readable(readable)))
            }
        })
        .await
    }

    /// Greets a new controller and starts tracking its session.
    async fn accept_session(&mut self, mut stream: TcpStream, peer: SocketAddr) {
        info!("new controller connection from {peer}");
        if let Err(e) = stream.write_all(GREETING).await {
            warn!("could not greet {peer}: {e}");
            return;
        }
        self.sessions.push(ClientSession {
            stream,
            peer,
            buffer: CommandBuffer::new(),
        });
    }

    /// Collects whatever a ready session has, dispatches its complete lines,
    /// and decides whether the session survives.
    async fn service_session(&mut self, index: usize) {
        let mut chunk = [0u8; READ_CHUNK];
        let received = match self.sessions[index].stream.try_read(&mut chunk) {
            Ok(0) => {
                info!(
                    "controller {} closed the connection",
                    self.sessions[index].peer
                );
                self.sessions.remove(index);
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
            Err(e) => {
                warn!("read from {} failed: {e}", self.sessions[index].peer);
                self.sessions.remove(index);
                return;
            }
        };

        for line in self.sessions[index].buffer.push_chunk(&chunk[..received]) {
            debug!(
                "received command {:?} from {}",
                String::from_utf8_lossy(&line),
                self.sessions[index].peer
            );
            let reply = respond_to_line(&line, &mut self.actions);
            if let Err(e) = self.sessions[index].stream.write_all(reply).await {
                warn!("write to {} failed: {e}", self.sessions[index].peer);
                self.sessions.remove(index);
                return;
            }
        }
    }
}
