//! Soil Moisture Service
//!
//! Registers the service and its soil moisture characteristic with the
//! stack, follows the link lifecycle and notifies new readings.

use core::fmt;

use crate::ble::characteristic::{SensorValue, SOIL_MOISTURE};
use crate::ble::connection::ConnectionState;
use crate::ble::events::BleEvent;
use crate::ble::notifications::{self, encode_value, NotifyError};
use crate::ble::registry::UuidRegistry;
use crate::ble::stack::{CharacteristicHandles, ConnHandle, GattStack, ServiceHandle, StackError, UuidType};
use crate::config::uuid::{SMS_UUID_BASE, SMS_UUID_SERVICE};

/// Service initialization parameters
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceInit {
    /// Value a central reads before the first measurement
    pub initial_value: SensorValue,
}

/// Registration step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStep {
    /// `sd_ble_uuid_vs_add`
    UuidBase,
    /// `sd_ble_gatts_service_add`
    PrimaryService,
    /// `sd_ble_gatts_characteristic_add`
    Characteristic,
}

impl RegistrationStep {
    pub const fn name(self) -> &'static str {
        match self {
            RegistrationStep::UuidBase => "sd_ble_uuid_vs_add",
            RegistrationStep::PrimaryService => "sd_ble_gatts_service_add",
            RegistrationStep::Characteristic => "sd_ble_gatts_characteristic_add",
        }
    }
}

/// The stack rejected a registration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistrationError {
    pub step: RegistrationStep,
    pub error: StackError,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step.name(), self.error)
    }
}

trait StepContext<T> {
    fn step(self, step: RegistrationStep) -> Result<T, RegistrationError>;
}

impl<T> StepContext<T> for Result<T, StackError> {
    fn step(self, step: RegistrationStep) -> Result<T, RegistrationError> {
        self.map_err(|error| {
            error!("SMS: {} failed: {:#x}", step.name(), error.code());
            RegistrationError { step, error }
        })
    }
}

/// A registered Soil Moisture Service instance.
///
/// Only a fully registered service exists: `init` either returns every
/// handle or none.
pub struct SoilMoistureService<S> {
    stack: S,
    uuids: UuidRegistry,
    uuid_type: UuidType,
    service_handle: ServiceHandle,
    moisture_handles: CharacteristicHandles,
    connection: ConnectionState,
}

impl<S: GattStack> SoilMoistureService<S> {
    /// Register the service with the stack.
    ///
    /// Runs once at boot. Each step must succeed before the next; the first
    /// failure abandons the instance, there is no retry.
    pub fn init(mut stack: S, init: &ServiceInit) -> Result<Self, RegistrationError> {
        let mut uuids = UuidRegistry::new();

        let uuid_type = uuids
            .register_base(&mut stack, SMS_UUID_BASE)
            .step(RegistrationStep::UuidBase)?;

        let service_uuid = uuids.resolve(uuid_type, SMS_UUID_SERVICE);
        let service_handle = stack
            .add_primary_service(service_uuid)
            .step(RegistrationStep::PrimaryService)?;

        let char_uuid = uuids.resolve(uuid_type, SOIL_MOISTURE.uuid);
        let initial = encode_value(init.initial_value);
        let moisture_handles = stack
            .add_characteristic(service_handle, char_uuid, &SOIL_MOISTURE, &initial)
            .step(RegistrationStep::Characteristic)?;

        info!(
            "SMS: service {} ready, value handle {}, cccd handle {}",
            service_handle.raw(),
            moisture_handles.value_handle,
            moisture_handles.cccd_handle
        );

        Ok(Self {
            stack,
            uuids,
            uuid_type,
            service_handle,
            moisture_handles,
            connection: ConnectionState::new(),
        })
    }

    /// Handle an event from the BLE stack
    pub fn on_ble_evt(&mut self, event: &BleEvent) {
        match *event {
            BleEvent::Connected { .. } | BleEvent::Disconnected { .. } => {
                info!("SMS: {}", event.name());
                self.connection.apply(event);
            }
            BleEvent::CccdWrite {
                char_handle,
                notifications,
                ..
            } if char_handle == self.moisture_handles.value_handle => {
                debug!("SMS: soil moisture notifications enabled: {}", notifications);
            }
            _ => {}
        }
    }

    /// Notify a reading to the connected central
    pub fn notify(&mut self, value: SensorValue) -> Result<(), NotifyError> {
        notifications::dispatch(
            &mut self.stack,
            &self.connection,
            self.moisture_handles.value_handle,
            value,
        )
    }

    /// Entry point for the measurement subsystem: notify and log the outcome
    pub fn on_moisture_update(&mut self, value: SensorValue) -> Result<(), NotifyError> {
        let result = self.notify(value);
        notifications::report(&result);
        result
    }

    pub fn service_handle(&self) -> ServiceHandle {
        self.service_handle
    }

    pub fn moisture_handles(&self) -> CharacteristicHandles {
        self.moisture_handles
    }

    pub fn uuid_type(&self) -> UuidType {
        self.uuid_type
    }

    /// Full 128-bit UUID of the service
    pub fn service_uuid128(&self) -> Option<[u8; 16]> {
        self.uuids.expand(self.uuids.resolve(self.uuid_type, SMS_UUID_SERVICE))
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn conn_handle(&self) -> Option<ConnHandle> {
        self.connection.handle()
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }
}
