//! Identity binding
//!
//! Tracks which wallet the ledger is scoped to. The wallet provider reports
//! `{ address, isConnected }`; the binder turns successive reports into
//! transitions that the ledger applies (clear memory, load from storage).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ledger::CreditsLedger;
use crate::types::Identity;

/// Connection status as reported by the wallet provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    pub address: Option<String>,
    pub is_connected: bool,
}

impl WalletStatus {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            is_connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Identity to bind, present only for a connected, non-empty address
    pub fn identity(&self) -> Option<Identity> {
        if !self.is_connected {
            return None;
        }
        self.address.as_deref().and_then(Identity::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Binding {
    #[default]
    Disconnected,
    Connected(Identity),
}

/// Change required to move from one binding to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Bind(Identity),
    Unbind(Identity),
    /// Clear the old identity, then load the new one
    Swap { from: Identity, to: Identity },
}

impl Binding {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Disconnected => None,
            Self::Connected(id) => Some(id),
        }
    }

    pub fn transition_to(&self, next: Option<&Identity>) -> Transition {
        match (self, next) {
            (Self::Disconnected, None) => Transition::Unchanged,
            (Self::Disconnected, Some(to)) => Transition::Bind(to.clone()),
            (Self::Connected(from), None) => Transition::Unbind(from.clone()),
            (Self::Connected(from), Some(to)) if from == to => Transition::Unchanged,
            (Self::Connected(from), Some(to)) => Transition::Swap {
                from: from.clone(),
                to: to.clone(),
            },
        }
    }
}

/// Apply every wallet status change to the ledger until the sender is dropped
///
/// The current value of the channel is applied immediately.
pub fn watch_wallet(
    ledger: Arc<CreditsLedger>,
    mut status: watch::Receiver<WalletStatus>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let current = status.borrow_and_update().clone();
            if let Err(e) = ledger.apply_wallet_status(&current) {
                log::error!("Failed to bind wallet {:?}: {}", current.address, e);
            }
            if status.changed().await.is_err() {
                log::debug!("Wallet status channel closed, stopping binder");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::parse(s).unwrap()
    }

    #[test]
    fn test_status_identity() {
        assert_eq!(WalletStatus::connected("0x1").identity(), Some(id("0x1")));
        assert_eq!(WalletStatus::disconnected().identity(), None);
        assert_eq!(WalletStatus::connected("").identity(), None);

        let stale = WalletStatus {
            address: Some("0x1".into()),
            is_connected: false,
        };
        assert_eq!(stale.identity(), None);
    }

    #[test]
    fn test_transitions() {
        let disconnected = Binding::Disconnected;
        let connected = Binding::Connected(id("0x1"));

        assert_eq!(disconnected.transition_to(None), Transition::Unchanged);
        assert_eq!(
            disconnected.transition_to(Some(&id("0x1"))),
            Transition::Bind(id("0x1"))
        );
        assert_eq!(connected.transition_to(Some(&id("0x1"))), Transition::Unchanged);
        assert_eq!(connected.transition_to(None), Transition::Unbind(id("0x1")));
        assert_eq!(
            connected.transition_to(Some(&id("0x2"))),
            Transition::Swap {
                from: id("0x1"),
                to: id("0x2")
            }
        );
    }
}
