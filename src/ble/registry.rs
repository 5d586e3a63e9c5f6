//! UUID Registry
//!
//! Registers vendor-specific 128-bit base UUIDs with the stack and resolves
//! 16-bit service/characteristic ids against them. A local mirror of the
//! registered bases is kept so a vendor UUID can be expanded back to its
//! full 128-bit form.

use heapless::Vec;

use crate::ble::stack::{nrf_error, GattStack, StackError, UuidType};
use crate::config::stack::MAX_VS_UUID_COUNT;

/// A 16-bit id drawn from a registered base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VendorUuid {
    pub uuid_type: UuidType,
    pub short: u16,
}

#[derive(Debug, Clone, Copy)]
struct UuidBase {
    uuid_type: UuidType,
    base: [u8; 16],
}

/// Mirror of the stack's vendor UUID table
pub struct UuidRegistry {
    bases: Vec<UuidBase, MAX_VS_UUID_COUNT>,
}

impl UuidRegistry {
    pub const fn new() -> Self {
        Self { bases: Vec::new() }
    }

    /// Register a base UUID and return the type the stack assigned to it.
    ///
    /// A base that is already registered returns its existing type without
    /// touching the stack. When the table is full this fails with
    /// `NRF_ERROR_NO_MEM`, as the stack itself would.
    pub fn register_base<S: GattStack>(&mut self, stack: &mut S, base: [u8; 16]) -> Result<UuidType, StackError> {
        if let Some(known) = self.bases.iter().find(|b| b.base == base) {
            debug!("UUID: base already registered as type {}", known.uuid_type.raw());
            return Ok(known.uuid_type);
        }

        if self.bases.is_full() {
            error!("UUID: vendor UUID table full ({} bases)", MAX_VS_UUID_COUNT);
            return Err(StackError(nrf_error::NO_MEM));
        }

        let uuid_type = stack.register_uuid_base(&base)?;
        self.bases
            .push(UuidBase { uuid_type, base })
            .map_err(|_| StackError(nrf_error::NO_MEM))?;

        info!("UUID: registered base as type {}", uuid_type.raw());
        Ok(uuid_type)
    }

    /// Compose the reference used by attribute operations
    pub const fn resolve(&self, uuid_type: UuidType, short: u16) -> VendorUuid {
        VendorUuid { uuid_type, short }
    }

    /// Full 128-bit UUID, or `None` if the type was not registered here
    pub fn expand(&self, uuid: VendorUuid) -> Option<[u8; 16]> {
        self.bases
            .iter()
            .find(|b| b.uuid_type == uuid.uuid_type)
            .map(|b| uuid_from_base_and_offset(&b.base, uuid.short))
    }

    /// Number of registered bases
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl Default for UuidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert a 16-bit id into a base UUID.
///
/// The id sits at bytes 12-13 (little-endian), matching the Nordic layout.
pub fn uuid_from_base_and_offset(base: &[u8; 16], offset: u16) -> [u8; 16] {
    let mut result = *base;
    let offset_bytes = offset.to_le_bytes();
    result[12] = offset_bytes[0];
    result[13] = offset_bytes[1];
    result
}
