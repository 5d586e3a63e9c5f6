//! BLE Service Implementation
//!
//! The Soil Moisture Service: UUID registration, characteristic schema,
//! link tracking and notification delivery, on top of the stack interface
//! in `stack`. The SoftDevice binding is only built for the target.

pub mod characteristic;
pub mod connection;
pub mod events;
pub mod notifications;
pub mod registry;
pub mod service;
#[cfg(feature = "embedded")]
pub mod softdevice;
pub mod stack;

pub use characteristic::SensorValue;
pub use events::BleEvent;
pub use notifications::NotifyError;
pub use service::{RegistrationError, RegistrationStep, ServiceInit, SoilMoistureService};
