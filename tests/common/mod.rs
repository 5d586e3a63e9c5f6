//! Common test utilities
//!
//! `MockStack` records every stack call and lets a test make any of them
//! fail with a chosen SoftDevice error code.

#![allow(dead_code)]

use std::collections::VecDeque;

use soil_moisture_s140::ble::characteristic::CharacteristicDescriptor;
use soil_moisture_s140::ble::registry::VendorUuid;
use soil_moisture_s140::ble::stack::{
    CharacteristicHandles, ConnHandle, GattStack, NotifyRequest, ServiceHandle, StackError, UuidType,
};

/// First vendor UUID type the SoftDevice hands out (`BLE_UUID_TYPE_VENDOR_BEGIN`)
pub const FIRST_VENDOR_UUID_TYPE: u8 = 2;

/// First attribute handle after the GAP and GATT services
pub const FIRST_APP_HANDLE: u16 = 12;

/// Stack operation, for error injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    RegisterUuidBase,
    AddPrimaryService,
    AddCharacteristic,
}

/// A recorded stack call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RegisterUuidBase([u8; 16]),
    AddPrimaryService(VendorUuid),
    AddCharacteristic {
        service: ServiceHandle,
        uuid: VendorUuid,
        descriptor: CharacteristicDescriptor,
        initial_value: Vec<u8>,
    },
    Notify {
        conn: ConnHandle,
        value_handle: u16,
        data: Vec<u8>,
    },
}

pub struct MockStack {
    calls: Vec<Call>,
    next_uuid_type: u8,
    next_handle: u16,
    failure: Option<(Op, u32)>,
    notify_errors: VecDeque<u32>,
}

impl MockStack {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_uuid_type: FIRST_VENDOR_UUID_TYPE,
            next_handle: FIRST_APP_HANDLE,
            failure: None,
            notify_errors: VecDeque::new(),
        }
    }

    /// Make every call of `op` fail with `code`
    pub fn fail_on(&mut self, op: Op, code: u32) {
        self.failure = Some((op, code));
    }

    /// Make the next notify fail with `code`
    pub fn fail_next_notify(&mut self, code: u32) {
        self.notify_errors.push_back(code);
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn notifications(&self) -> Vec<(ConnHandle, u16, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Notify { conn, value_handle, data } => Some((*conn, *value_handle, data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn notify_count(&self) -> usize {
        self.notifications().len()
    }

    fn injected(&self, op: Op) -> Result<(), StackError> {
        match self.failure {
            Some((failing, code)) if failing == op => Err(StackError(code)),
            _ => Ok(()),
        }
    }

    fn allocate_handle(&mut self) -> u16 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl Default for MockStack {
    fn default() -> Self {
        Self::new()
    }
}

impl GattStack for MockStack {
    fn register_uuid_base(&mut self, base: &[u8; 16]) -> Result<UuidType, StackError> {
        self.calls.push(Call::RegisterUuidBase(*base));
        self.injected(Op::RegisterUuidBase)?;

        let uuid_type = UuidType(self.next_uuid_type);
        self.next_uuid_type += 1;
        Ok(uuid_type)
    }

    fn add_primary_service(&mut self, uuid: VendorUuid) -> Result<ServiceHandle, StackError> {
        self.calls.push(Call::AddPrimaryService(uuid));
        self.injected(Op::AddPrimaryService)?;

        Ok(ServiceHandle(self.allocate_handle()))
    }

    fn add_characteristic(
        &mut self,
        service: ServiceHandle,
        uuid: VendorUuid,
        descriptor: &CharacteristicDescriptor,
        initial_value: &[u8],
    ) -> Result<CharacteristicHandles, StackError> {
        self.calls.push(Call::AddCharacteristic {
            service,
            uuid,
            descriptor: *descriptor,
            initial_value: initial_value.to_vec(),
        });
        self.injected(Op::AddCharacteristic)?;

        // Declaration, value, then CCCD if present
        let _declaration = self.allocate_handle();
        let value_handle = self.allocate_handle();
        let cccd_handle = if descriptor.cccd.is_some() { self.allocate_handle() } else { 0 };
        Ok(CharacteristicHandles {
            value_handle,
            cccd_handle,
        })
    }

    fn notify(&mut self, conn: ConnHandle, request: &NotifyRequest<'_>) -> Result<(), StackError> {
        self.calls.push(Call::Notify {
            conn,
            value_handle: request.value_handle,
            data: request.data.to_vec(),
        });

        match self.notify_errors.pop_front() {
            Some(code) => Err(StackError(code)),
            None => Ok(()),
        }
    }
}
