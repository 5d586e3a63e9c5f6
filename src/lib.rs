#![cfg_attr(not(test), no_std)]

//! nRF52820 S140 Soil Moisture Service
//!
//! Peripheral-side logic of a GATT service exposing one soil moisture
//! reading to a central via read and notify:
//!
//! - `ble`: service registration, connection tracking, notifications
//! - `config`: compile-time UUIDs and stack sizing
//! - `sensor`: hand-off point for the measurement subsystem (target only)

#[macro_use]
mod fmt;

pub mod ble;
pub mod config;
#[cfg(feature = "embedded")]
pub mod sensor;
