//! SoftDevice Binding
//!
//! `GattStack` over the S140 SoftDevice calls, and the GATT server the
//! connection task runs to receive CCCD writes.

use core::{mem, ptr};

use nrf_softdevice::ble::gatt_server::{self, WriteOp};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::{raw, Softdevice};

use crate::ble::characteristic::{AttributeMetadata, CharacteristicDescriptor, Properties, SecurityMode, ValueLocation};
use crate::ble::events::BleEvent;
use crate::ble::registry::VendorUuid;
use crate::ble::stack::{CharacteristicHandles, ConnHandle, GattStack, NotifyRequest, ServiceHandle, StackError, UuidType};

/// Attribute table access through the enabled SoftDevice
pub struct SoftdeviceStack {
    _enabled: (),
}

impl SoftdeviceStack {
    /// Only constructible once the SoftDevice has been enabled
    pub fn new(_sd: &Softdevice) -> Self {
        Self { _enabled: () }
    }
}

fn raw_uuid(uuid: VendorUuid) -> raw::ble_uuid_t {
    raw::ble_uuid_t {
        uuid: uuid.short,
        type_: uuid.uuid_type.raw(),
    }
}

fn raw_sec_mode(mode: SecurityMode) -> raw::ble_gap_conn_sec_mode_t {
    // Security mode 1, levels 0-3 (BLE_GAP_CONN_SEC_MODE_SET_*)
    let (sm, lv) = match mode {
        SecurityMode::NoAccess => (0, 0),
        SecurityMode::Open => (1, 1),
        SecurityMode::Encrypted => (1, 2),
        SecurityMode::EncryptedWithMitm => (1, 3),
    };
    let mut sec: raw::ble_gap_conn_sec_mode_t = unsafe { mem::zeroed() };
    sec.set_sm(sm);
    sec.set_lv(lv);
    sec
}

fn raw_attr_md(md: &AttributeMetadata) -> raw::ble_gatts_attr_md_t {
    let mut attr_md: raw::ble_gatts_attr_md_t = unsafe { mem::zeroed() };
    attr_md.read_perm = raw_sec_mode(md.read);
    attr_md.write_perm = raw_sec_mode(md.write);
    attr_md.set_vlen(md.variable_len as u8);
    attr_md.set_vloc(match md.location {
        ValueLocation::Stack => raw::BLE_GATTS_VLOC_STACK as u8,
        ValueLocation::User => raw::BLE_GATTS_VLOC_USER as u8,
    });
    attr_md
}

fn raw_char_props(props: Properties) -> raw::ble_gatt_char_props_t {
    let mut raw_props: raw::ble_gatt_char_props_t = unsafe { mem::zeroed() };
    raw_props.set_broadcast(props.contains(Properties::BROADCAST) as u8);
    raw_props.set_read(props.contains(Properties::READ) as u8);
    raw_props.set_write_wo_resp(props.contains(Properties::WRITE_WITHOUT_RESPONSE) as u8);
    raw_props.set_write(props.contains(Properties::WRITE) as u8);
    raw_props.set_notify(props.contains(Properties::NOTIFY) as u8);
    raw_props.set_indicate(props.contains(Properties::INDICATE) as u8);
    raw_props.set_auth_signed_wr(props.contains(Properties::AUTH_SIGNED_WRITES) as u8);
    raw_props
}

impl GattStack for SoftdeviceStack {
    fn register_uuid_base(&mut self, base: &[u8; 16]) -> Result<UuidType, StackError> {
        let vs_uuid = raw::ble_uuid128_t { uuid128: *base };
        let mut uuid_type: u8 = 0;
        let ret = unsafe { raw::sd_ble_uuid_vs_add(&vs_uuid, &mut uuid_type) };
        StackError::check(ret)?;
        Ok(UuidType(uuid_type))
    }

    fn add_primary_service(&mut self, uuid: VendorUuid) -> Result<ServiceHandle, StackError> {
        let uuid = raw_uuid(uuid);
        let mut handle: u16 = 0;
        let ret = unsafe { raw::sd_ble_gatts_service_add(raw::BLE_GATTS_SRVC_TYPE_PRIMARY as u8, &uuid, &mut handle) };
        StackError::check(ret)?;
        Ok(ServiceHandle(handle))
    }

    fn add_characteristic(
        &mut self,
        service: ServiceHandle,
        uuid: VendorUuid,
        descriptor: &CharacteristicDescriptor,
        initial_value: &[u8],
    ) -> Result<CharacteristicHandles, StackError> {
        let uuid = raw_uuid(uuid);
        let value_md = raw_attr_md(&descriptor.value);
        let cccd_md = descriptor.cccd.as_ref().map(raw_attr_md);

        let mut char_md: raw::ble_gatts_char_md_t = unsafe { mem::zeroed() };
        char_md.char_props = raw_char_props(descriptor.properties);
        char_md.p_cccd_md = cccd_md.as_ref().map_or(ptr::null(), |md| md as *const _);

        let attr = raw::ble_gatts_attr_t {
            p_uuid: &uuid,
            p_attr_md: &value_md,
            init_len: initial_value.len() as u16,
            init_offs: 0,
            max_len: descriptor.max_len,
            // Stack-located values are copied in, never written through
            p_value: initial_value.as_ptr() as *mut u8,
        };

        let mut handles: raw::ble_gatts_char_handles_t = unsafe { mem::zeroed() };
        let ret = unsafe { raw::sd_ble_gatts_characteristic_add(service.raw(), &char_md, &attr, &mut handles) };
        StackError::check(ret)?;

        Ok(CharacteristicHandles {
            value_handle: handles.value_handle,
            cccd_handle: handles.cccd_handle,
        })
    }

    fn notify(&mut self, conn: ConnHandle, request: &NotifyRequest<'_>) -> Result<(), StackError> {
        let mut len = request.data.len() as u16;
        let params = raw::ble_gatts_hvx_params_t {
            handle: request.value_handle,
            type_: raw::BLE_GATT_HVX_NOTIFICATION as u8,
            offset: 0,
            p_len: &mut len,
            p_data: request.data.as_ptr(),
        };
        let ret = unsafe { raw::sd_ble_gatts_hvx(conn.raw(), &params) };
        StackError::check(ret)
    }
}

/// GATT server for one connection.
///
/// The SoftDevice answers reads and stores the CCCD itself; this only
/// surfaces the writes as `BleEvent`s.
pub struct SmsServer {
    moisture: CharacteristicHandles,
}

impl SmsServer {
    pub fn new(moisture: CharacteristicHandles) -> Self {
        Self { moisture }
    }
}

impl gatt_server::Server for SmsServer {
    type Event = BleEvent;

    fn on_write(&self, conn: &Connection, handle: u16, _op: WriteOp, _offset: usize, data: &[u8]) -> Option<Self::Event> {
        let conn_handle = ConnHandle(conn.handle().unwrap_or(ConnHandle::INVALID.raw()));

        if handle == self.moisture.cccd_handle {
            return BleEvent::from_cccd_write(conn_handle, self.moisture.value_handle, data);
        }

        Some(BleEvent::Write {
            conn_handle,
            handle,
            len: data.len().min(u16::MAX as usize) as u16,
        })
    }
}
