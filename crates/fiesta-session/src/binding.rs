//! How connections map onto players.

use fiesta_transport::ConnectionId;

/// Connection id used by the offline runner's single client.
pub const OFFLINE_HOST: &str = "local-host";

/// Whether each player has their own connection, or one device plays for
/// everybody.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Binding {
    /// One connection per player. Turn-gated actions are checked against
    /// the sender.
    #[default]
    Network,
    /// A single connection ([`OFFLINE_HOST`]) drives a room of synthetic
    /// players. Turn-gated actions are performed on behalf of whoever's
    /// turn it is.
    Offline,
}

impl Binding {
    pub fn is_offline(self) -> bool {
        matches!(self, Self::Offline)
    }

    /// Id of the `index`-th synthetic offline player.
    pub fn offline_player(index: usize) -> ConnectionId {
        ConnectionId::new(format!("local-player-{index}"))
    }

    pub fn offline_host() -> ConnectionId {
        ConnectionId::new(OFFLINE_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_ids() {
        assert_eq!(Binding::offline_player(2).as_str(), "local-player-2");
        assert_eq!(Binding::offline_host().as_str(), "local-host");
        assert!(Binding::Offline.is_offline());
        assert!(!Binding::default().is_offline());
    }
}
