//! Characteristic Descriptors
//!
//! Declarative metadata describing the wire-visible shape of a
//! characteristic. Registration consumes these; they hold no logic.

use crate::config::characteristic::SOIL_MOISTURE_VALUE_LEN;
use crate::config::uuid::SMS_UUID_SOIL_MOISTURE_CHAR;

/// Soil moisture reading as produced by the measurement subsystem
pub type SensorValue = u16;

/// Characteristic properties (matches BLE specification)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Properties(u8);

impl Properties {
    pub const BROADCAST: u8 = 0x01;
    pub const READ: u8 = 0x02;
    pub const WRITE_WITHOUT_RESPONSE: u8 = 0x04;
    pub const WRITE: u8 = 0x08;
    pub const NOTIFY: u8 = 0x10;
    pub const INDICATE: u8 = 0x20;
    pub const AUTH_SIGNED_WRITES: u8 = 0x40;

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn read(self) -> Self {
        Self(self.0 | Self::READ)
    }

    pub const fn notify(self) -> Self {
        Self(self.0 | Self::NOTIFY)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit == bit
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::new()
    }
}

/// Access level required for a read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecurityMode {
    /// No access at all
    NoAccess,
    /// No security required
    Open,
    /// Encrypted link, no MITM protection
    Encrypted,
    /// Encrypted link with MITM protection
    EncryptedWithMitm,
}

/// Where the attribute value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueLocation {
    /// Stack-owned memory
    Stack,
    /// Application-owned memory
    User,
}

/// Permissions and storage of one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeMetadata {
    pub read: SecurityMode,
    pub write: SecurityMode,
    pub location: ValueLocation,
    pub variable_len: bool,
}

/// Everything needed to add a characteristic to a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharacteristicDescriptor {
    /// 16-bit id within the service's base UUID
    pub uuid: u16,
    /// Value size in bytes (the fixed size unless `value.variable_len`)
    pub max_len: u16,
    pub properties: Properties,
    /// Value attribute
    pub value: AttributeMetadata,
    /// Subscription descriptor, required for notify/indicate
    pub cccd: Option<AttributeMetadata>,
}

impl CharacteristicDescriptor {
    pub const fn can_notify(&self) -> bool {
        self.properties.contains(Properties::NOTIFY) && self.cccd.is_some()
    }
}

/// Soil moisture: 2 bytes, readable and notifiable, never writable
pub const SOIL_MOISTURE: CharacteristicDescriptor = CharacteristicDescriptor {
    uuid: SMS_UUID_SOIL_MOISTURE_CHAR,
    max_len: SOIL_MOISTURE_VALUE_LEN as u16,
    properties: Properties::new().read().notify(),
    value: AttributeMetadata {
        read: SecurityMode::Open,
        write: SecurityMode::NoAccess,
        location: ValueLocation::Stack,
        variable_len: false,
    },
    // The central enables notifications here; the stack keeps it per link
    cccd: Some(AttributeMetadata {
        read: SecurityMode::Open,
        write: SecurityMode::Open,
        location: ValueLocation::Stack,
        variable_len: false,
    }),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_moisture_shape() {
        assert_eq!(SOIL_MOISTURE.max_len, 2);
        assert_eq!(SOIL_MOISTURE.properties.bits(), Properties::READ | Properties::NOTIFY);
        assert!(!SOIL_MOISTURE.properties.contains(Properties::WRITE));
        assert_eq!(SOIL_MOISTURE.value.write, SecurityMode::NoAccess);
        assert!(!SOIL_MOISTURE.value.variable_len);
        assert!(SOIL_MOISTURE.can_notify());
    }

    #[test]
    fn test_cccd_is_open_and_stack_stored() {
        let cccd = SOIL_MOISTURE.cccd.unwrap();
        assert_eq!(cccd.read, SecurityMode::Open);
        assert_eq!(cccd.write, SecurityMode::Open);
        assert_eq!(cccd.location, ValueLocation::Stack);
    }

    #[test]
    fn test_notify_needs_cccd() {
        let desc = CharacteristicDescriptor { cccd: None, ..SOIL_MOISTURE };
        assert!(!desc.can_notify());
    }
}
