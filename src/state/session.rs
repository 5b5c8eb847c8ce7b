use std::net::SocketAddr;
use uuid::Uuid;

/// Protocol state of one connection. A connection serves exactly one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Accepted, streams set up
    Idle,
    /// Waiting for the command line
    AwaitingCommandLine,
    /// Querying the catalog
    Loading,
    /// Reading and persisting a registration form
    Registering,
    /// Writing the reply
    Responding,
    /// Torn down; nothing more is read or written
    Closed,
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub peer: SocketAddr,
    // When is the session started/created
    pub started: std::time::Instant,
    state: ConnState,
}

impl Session {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            started: std::time::Instant::now(),
            state: ConnState::Idle,
        }
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnState::Closed
    }

    /// Moves to `next`. Closed is terminal.
    pub fn transition(&mut self, next: ConnState) {
        if self.is_closed() {
            return;
        }
        tracing::trace!(conn = %self.id, from = ?self.state, to = ?next, "state change");
        self.state = next;
    }
}
