use fiesta_protocol::ServerEvent;
use fiesta_transport::ConnectionId;

/// One event addressed to one connection.
///
/// Broadcasts expand into one `Outbound` per subscriber, each with its
/// own copy of the event.
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: ConnectionId,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn new(to: ConnectionId, event: ServerEvent) -> Self {
        Self { to, event }
    }
}
