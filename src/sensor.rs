//! Measurement Hand-off
//!
//! The measurement subsystem publishes readings here at its own cadence;
//! the notify task waits on them. Only the freshest reading is kept, a
//! reading that was not picked up in time is overwritten.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::ble::SensorValue;

static MOISTURE_READING: Signal<CriticalSectionRawMutex, SensorValue> = Signal::new();

/// Publish a new soil moisture reading.
///
/// This is the integration point for the measurement subsystem: the task
/// sampling the probe calls it, nothing in this crate does.
pub fn publish(value: SensorValue) {
    MOISTURE_READING.signal(value);
}

/// Wait for the next reading
pub async fn next_reading() -> SensorValue {
    MOISTURE_READING.wait().await
}
