//! BLE Stack Interface
//!
//! The outbound attribute-table calls the service makes into the BLE stack,
//! the opaque handles the stack hands back, and its error codes.
//! On the target this is implemented over the SoftDevice (`ble::softdevice`);
//! tests implement it with a recording mock.

use core::fmt;

use crate::ble::characteristic::CharacteristicDescriptor;
use crate::ble::registry::VendorUuid;

/// SoftDevice error codes (`nrf_error.h`, `ble_err.h`)
pub mod nrf_error {
    pub const SUCCESS: u32 = 0;
    pub const NO_MEM: u32 = 4;
    pub const NOT_FOUND: u32 = 5;
    pub const INVALID_PARAM: u32 = 7;
    pub const INVALID_STATE: u32 = 8;
    pub const INVALID_LENGTH: u32 = 9;
    pub const DATA_SIZE: u32 = 12;
    pub const FORBIDDEN: u32 = 15;
    pub const INVALID_ADDR: u32 = 16;
    pub const BUSY: u32 = 17;
    pub const RESOURCES: u32 = 19;

    pub const BLE_ERROR_INVALID_CONN_HANDLE: u32 = 0x3002;
    pub const BLE_ERROR_INVALID_ATTR_HANDLE: u32 = 0x3003;
    pub const BLE_ERROR_GATTS_SYS_ATTR_MISSING: u32 = 0x3401;
}

/// Raw error code returned by a failing stack call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StackError(pub u32);

impl StackError {
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Turn a raw return value into a result
    pub const fn check(ret: u32) -> Result<(), StackError> {
        if ret == nrf_error::SUCCESS {
            Ok(())
        } else {
            Err(StackError(ret))
        }
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack error {:#x}", self.0)
    }
}

/// Vendor UUID table slot assigned by the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UuidType(pub u8);

impl UuidType {
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Attribute handle of a registered service declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceHandle(pub u16);

impl ServiceHandle {
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Handles of a registered characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharacteristicHandles {
    /// Characteristic value attribute
    pub value_handle: u16,
    /// Client Characteristic Configuration Descriptor, 0 if absent
    pub cccd_handle: u16,
}

/// Link to a central
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnHandle(pub u16);

impl ConnHandle {
    /// `BLE_CONN_HANDLE_INVALID`
    pub const INVALID: ConnHandle = ConnHandle(0xFFFF);

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// A single handle value notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyRequest<'a> {
    /// Value handle of the characteristic being notified
    pub value_handle: u16,
    /// Payload, exactly the characteristic's declared size
    pub data: &'a [u8],
}

/// Attribute-table operations of the underlying BLE stack.
///
/// Every call is synchronous and non-blocking: it either completes or fails
/// immediately with the stack's error code.
pub trait GattStack {
    /// Add a vendor-specific 128-bit base UUID
    fn register_uuid_base(&mut self, base: &[u8; 16]) -> Result<UuidType, StackError>;

    /// Add a primary service declaration
    fn add_primary_service(&mut self, uuid: VendorUuid) -> Result<ServiceHandle, StackError>;

    /// Add a characteristic, its value and (if declared) its CCCD to a service
    fn add_characteristic(
        &mut self,
        service: ServiceHandle,
        uuid: VendorUuid,
        descriptor: &CharacteristicDescriptor,
        initial_value: &[u8],
    ) -> Result<CharacteristicHandles, StackError>;

    /// Queue a notification on a link
    fn notify(&mut self, conn: ConnHandle, request: &NotifyRequest<'_>) -> Result<(), StackError>;
}

impl<T: GattStack + ?Sized> GattStack for &mut T {
    fn register_uuid_base(&mut self, base: &[u8; 16]) -> Result<UuidType, StackError> {
        (**self).register_uuid_base(base)
    }

    fn add_primary_service(&mut self, uuid: VendorUuid) -> Result<ServiceHandle, StackError> {
        (**self).add_primary_service(uuid)
    }

    fn add_characteristic(
        &mut self,
        service: ServiceHandle,
        uuid: VendorUuid,
        descriptor: &CharacteristicDescriptor,
        initial_value: &[u8],
    ) -> Result<CharacteristicHandles, StackError> {
        (**self).add_characteristic(service, uuid, descriptor, initial_value)
    }

    fn notify(&mut self, conn: ConnHandle, request: &NotifyRequest<'_>) -> Result<(), StackError> {
        (**self).notify(conn, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_success() {
        assert_eq!(StackError::check(nrf_error::SUCCESS), Ok(()));
    }

    #[test]
    fn test_check_failure_keeps_code() {
        let err = StackError::check(nrf_error::BLE_ERROR_GATTS_SYS_ATTR_MISSING).unwrap_err();
        assert_eq!(err.code(), 0x3401);
    }
}
