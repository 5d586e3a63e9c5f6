//! Connection State
//!
//! Tracks the single peripheral link across connect/disconnect events.

use crate::ble::events::BleEvent;
use crate::ble::stack::ConnHandle;

/// State of the one link this service supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(ConnHandle),
}

impl ConnectionState {
    pub const fn new() -> Self {
        ConnectionState::Disconnected
    }

    /// A new link replaces whatever was there (last write wins).
    ///
    /// `ConnHandle::INVALID` is not a link and is ignored.
    pub fn connect(&mut self, handle: ConnHandle) {
        if handle == ConnHandle::INVALID {
            warn!("CONNECTION: connect without a valid handle, ignored");
            return;
        }
        if let ConnectionState::Connected(old) = *self {
            warn!(
                "CONNECTION: connect on {} while connected on {}, replacing",
                handle.raw(),
                old.raw()
            );
        }
        *self = ConnectionState::Connected(handle);
        debug!("CONNECTION: connected, handle {}", handle.raw());
    }

    /// Drop the link, whichever handle the stack reports
    pub fn disconnect(&mut self) {
        if let ConnectionState::Connected(handle) = *self {
            debug!("CONNECTION: handle {} disconnected", handle.raw());
        }
        *self = ConnectionState::Disconnected;
    }

    /// Feed a stack event. Returns `true` if it was a lifecycle event.
    pub fn apply(&mut self, event: &BleEvent) -> bool {
        match *event {
            BleEvent::Connected { conn_handle } => {
                self.connect(conn_handle);
                true
            }
            BleEvent::Disconnected { .. } => {
                self.disconnect();
                true
            }
            _ => false,
        }
    }

    pub const fn handle(&self) -> Option<ConnHandle> {
        match *self {
            ConnectionState::Connected(handle) => Some(handle),
            ConnectionState::Disconnected => None,
        }
    }

    pub const fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ConnectionState::new();
        assert!(!state.is_connected());
        assert_eq!(state.handle(), None);
    }

    #[test]
    fn test_connect_disconnect() {
        let mut state = ConnectionState::new();

        assert!(state.apply(&BleEvent::Connected { conn_handle: ConnHandle(1) }));
        assert_eq!(state, ConnectionState::Connected(ConnHandle(1)));

        assert!(state.apply(&BleEvent::Disconnected { conn_handle: ConnHandle(1) }));
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn test_second_connect_replaces_handle() {
        let mut state = ConnectionState::new();
        state.connect(ConnHandle(1));
        state.connect(ConnHandle(2));
        assert_eq!(state.handle(), Some(ConnHandle(2)));
    }

    #[test]
    fn test_disconnect_ignores_reported_handle() {
        let mut state = ConnectionState::new();
        state.connect(ConnHandle(3));
        state.apply(&BleEvent::Disconnected { conn_handle: ConnHandle(9) });
        assert_eq!(state, ConnectionState::Disconnected);
    }

    #[test]
    fn test_other_events_pass_through() {
        let mut state = ConnectionState::new();
        state.connect(ConnHandle(4));

        let handled = state.apply(&BleEvent::Write {
            conn_handle: ConnHandle(4),
            handle: 14,
            len: 2,
        });

        assert!(!handled);
        assert_eq!(state, ConnectionState::Connected(ConnHandle(4)));
    }

    #[test]
    fn test_connect_with_invalid_handle_is_ignored() {
        let mut state = ConnectionState::new();
        assert!(state.apply(&BleEvent::Connected { conn_handle: ConnHandle::INVALID }));
        assert_eq!(state, ConnectionState::Disconnected);

        state.connect(ConnHandle(2));
        state.connect(ConnHandle::INVALID);
        assert_eq!(state, ConnectionState::Connected(ConnHandle(2)));
    }
}
