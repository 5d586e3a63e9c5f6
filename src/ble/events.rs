//! BLE Stack Events
//!
//! Events delivered by the stack's event-dispatch path. Only the link
//! lifecycle events drive service state; the rest pass through.

use crate::ble::stack::ConnHandle;

/// Inbound stack event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleEvent {
    /// `BLE_GAP_EVT_CONNECTED`
    Connected { conn_handle: ConnHandle },
    /// `BLE_GAP_EVT_DISCONNECTED`
    Disconnected { conn_handle: ConnHandle },
    /// Central wrote a CCCD (notifications/indications enabled/disabled)
    CccdWrite {
        conn_handle: ConnHandle,
        char_handle: u16,
        notifications: bool,
        indications: bool,
    },
    /// Central wrote a characteristic value
    Write { conn_handle: ConnHandle, handle: u16, len: u16 },
}

impl BleEvent {
    /// Link the event belongs to
    pub const fn conn_handle(&self) -> ConnHandle {
        match *self {
            BleEvent::Connected { conn_handle }
            | BleEvent::Disconnected { conn_handle }
            | BleEvent::CccdWrite { conn_handle, .. }
            | BleEvent::Write { conn_handle, .. } => conn_handle,
        }
    }

    /// Short name for log lines
    pub const fn name(&self) -> &'static str {
        match self {
            BleEvent::Connected { .. } => "BLE_GAP_EVT_CONNECTED",
            BleEvent::Disconnected { .. } => "BLE_GAP_EVT_DISCONNECTED",
            BleEvent::CccdWrite { .. } => "BLE_GATTS_EVT_WRITE (CCCD)",
            BleEvent::Write { .. } => "BLE_GATTS_EVT_WRITE",
        }
    }

    /// Parse a CCCD value written by the central
    pub fn from_cccd_write(conn_handle: ConnHandle, char_handle: u16, data: &[u8]) -> Option<Self> {
        let flags = *data.first()?;
        Some(BleEvent::CccdWrite {
            conn_handle,
            char_handle,
            notifications: flags & 0x01 != 0,
            indications: flags & 0x02 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cccd_flags() {
        let event = BleEvent::from_cccd_write(ConnHandle(1), 12, &[0x01, 0x00]);
        assert_eq!(
            event,
            Some(BleEvent::CccdWrite {
                conn_handle: ConnHandle(1),
                char_handle: 12,
                notifications: true,
                indications: false,
            })
        );

        let event = BleEvent::from_cccd_write(ConnHandle(1), 12, &[0x02, 0x00]);
        assert!(matches!(event, Some(BleEvent::CccdWrite { notifications: false, indications: true, .. })));
    }

    #[test]
    fn test_empty_cccd_write_is_ignored() {
        assert_eq!(BleEvent::from_cccd_write(ConnHandle(1), 12, &[]), None);
    }

    #[test]
    fn test_conn_handle() {
        let event = BleEvent::Write {
            conn_handle: ConnHandle(7),
            handle: 14,
            len: 2,
        };
        assert_eq!(event.conn_handle(), ConnHandle(7));
    }
}
