//! Compile-time configuration for the soil moisture service

/// Vendor UUIDs of the Soil Moisture Service
pub mod uuid {
    /// 128-bit base UUID, little-endian as the SoftDevice stores it.
    /// Bytes 12-13 are replaced by the 16-bit service/characteristic id.
    pub const SMS_UUID_BASE: [u8; 16] = [
        0x23, 0xa9, 0x1f, 0xb8, 0x0d, 0xeb, 0x4a, 0xcc, 0x9d, 0xf1, 0x43, 0x98, 0x00, 0x00, 0x50, 0x08,
    ];

    pub const SMS_UUID_SERVICE: u16 = 0xc998;
    pub const SMS_UUID_SOIL_MOISTURE_CHAR: u16 = 0xc999;
}

/// Characteristic sizing
pub mod characteristic {
    /// Soil moisture value size in bytes (one `u16`)
    pub const SOIL_MOISTURE_VALUE_LEN: usize = core::mem::size_of::<u16>();
}

/// SoftDevice resource sizing
pub mod stack {
    /// Vendor-specific UUID bases the SoftDevice is configured to hold
    pub const MAX_VS_UUID_COUNT: usize = 4;

    /// ATT MTU negotiated at most
    pub const ATT_MTU: u16 = 23;

    /// Attribute table size in bytes
    pub const ATTR_TAB_SIZE: u32 = 1408;

    /// Simultaneous peripheral links
    pub const PERIPH_LINK_COUNT: u8 = 1;
}

/// Advertising parameters
pub mod advertising {
    pub const DEVICE_NAME: &str = "SoilMoisture";

    /// Delay before retrying a failed advertising start, in milliseconds
    pub const RETRY_DELAY_MS: u64 = 1000;
}

/// Firmware housekeeping
pub mod firmware {
    /// Heartbeat log period in seconds
    pub const HEARTBEAT_SECS: u64 = 10;
}
