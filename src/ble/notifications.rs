//! Notification Dispatcher
//!
//! Pushes a sensor value to the connected central as a handle value
//! notification. Each attempt is delivered now or dropped: nothing is
//! queued and nothing is retried, the next reading supersedes it.

use core::fmt;

use crate::ble::characteristic::SensorValue;
use crate::ble::connection::ConnectionState;
use crate::ble::stack::{nrf_error, GattStack, NotifyRequest, StackError};
use crate::config::characteristic::SOIL_MOISTURE_VALUE_LEN;

/// Why a notification was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// No central is connected
    NotConnected,
    /// The central has not enabled notifications in the CCCD
    NotSubscribed,
    /// Stack transmit buffers are full right now
    Busy,
    /// Any other stack failure
    Stack(StackError),
}

impl NotifyError {
    /// Expected during normal operation; callers drop these silently
    pub const fn is_expected(&self) -> bool {
        !matches!(self, NotifyError::Stack(_))
    }
}

impl From<StackError> for NotifyError {
    fn from(err: StackError) -> Self {
        match err.code() {
            nrf_error::INVALID_STATE | nrf_error::BLE_ERROR_GATTS_SYS_ATTR_MISSING => NotifyError::NotSubscribed,
            nrf_error::RESOURCES | nrf_error::BUSY => NotifyError::Busy,
            _ => NotifyError::Stack(err),
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::NotConnected => f.write_str("not connected"),
            NotifyError::NotSubscribed => f.write_str("notifications not enabled"),
            NotifyError::Busy => f.write_str("transmit buffers full"),
            NotifyError::Stack(err) => write!(f, "{}", err),
        }
    }
}

/// Wire encoding of a sensor value (nRF byte order)
pub const fn encode_value(value: SensorValue) -> [u8; SOIL_MOISTURE_VALUE_LEN] {
    value.to_le_bytes()
}

/// Attempt one notification of `value` on `value_handle`.
///
/// Fails with `NotConnected` without calling the stack when there is no
/// link; the stack would only reject the invalid handle.
pub fn dispatch<S: GattStack>(
    stack: &mut S,
    connection: &ConnectionState,
    value_handle: u16,
    value: SensorValue,
) -> Result<(), NotifyError> {
    let conn = connection.handle().ok_or(NotifyError::NotConnected)?;

    let payload = encode_value(value);
    let request = NotifyRequest {
        value_handle,
        data: &payload,
    };

    stack.notify(conn, &request).map_err(NotifyError::from)
}

/// Log a notification outcome at the level its kind deserves
pub fn report(result: &Result<(), NotifyError>) {
    match result {
        Ok(()) => {}
        Err(NotifyError::NotConnected) => debug!("NOTIFY: no central connected, reading dropped"),
        Err(NotifyError::NotSubscribed) => debug!("NOTIFY: central not subscribed, reading dropped"),
        Err(NotifyError::Busy) => debug!("NOTIFY: tx buffers full, reading dropped"),
        Err(NotifyError::Stack(err)) => error!("NOTIFY: sd_ble_gatts_hvx failed: {:#x}", err.code()),
    }
}
