mod common;

use common::MockStack;
use soil_moisture_s140::ble::connection::ConnectionState;
use soil_moisture_s140::ble::stack::ConnHandle;
use soil_moisture_s140::ble::{BleEvent, ServiceInit, SoilMoistureService};

#[test]
fn test_non_lifecycle_events_pass_through() {
    let mut stack = MockStack::new();
    let mut service = SoilMoistureService::init(&mut stack, &ServiceInit::default()).unwrap();
    let handles = service.moisture_handles();
    service.on_ble_evt(&BleEvent::Connected { conn_handle: ConnHandle(4) });

    let events = [
        BleEvent::CccdWrite {
            conn_handle: ConnHandle(4),
            char_handle: handles.value_handle,
            notifications: true,
            indications: false,
        },
        BleEvent::CccdWrite {
            conn_handle: ConnHandle(4),
            char_handle: handles.value_handle,
            notifications: false,
            indications: false,
        },
        BleEvent::Write {
            conn_handle: ConnHandle(4),
            handle: 0x40,
            len: 4,
        },
    ];

    for event in &events {
        service.on_ble_evt(event);
        assert_eq!(service.connection(), ConnectionState::Connected(ConnHandle(4)));
    }

    // Events never reach the stack
    assert_eq!(service.stack().calls().len(), 3);
}

#[test]
fn test_disconnect_from_other_handle_still_disconnects() {
    let mut stack = MockStack::new();
    let mut service = SoilMoistureService::init(&mut stack, &ServiceInit::default()).unwrap();

    service.on_ble_evt(&BleEvent::Connected { conn_handle: ConnHandle(1) });
    service.on_ble_evt(&BleEvent::Disconnected { conn_handle: ConnHandle(9) });

    assert_eq!(service.connection(), ConnectionState::Disconnected);
    assert_eq!(service.conn_handle(), None);
}

#[test]
fn test_second_connect_replaces_first() {
    let mut stack = MockStack::new();
    let mut service = SoilMoistureService::init(&mut stack, &ServiceInit::default()).unwrap();

    service.on_ble_evt(&BleEvent::Connected { conn_handle: ConnHandle(1) });
    service.on_ble_evt(&BleEvent::Connected { conn_handle: ConnHandle(2) });

    assert_eq!(service.conn_handle(), Some(ConnHandle(2)));
}

#[test]
fn test_cccd_write_decoding() {
    let mut stack = MockStack::new();
    let service = SoilMoistureService::init(&mut stack, &ServiceInit::default()).unwrap();
    let handles = service.moisture_handles();

    assert_eq!(
        BleEvent::from_cccd_write(ConnHandle(0), handles.value_handle, &[0x01, 0x00]),
        Some(BleEvent::CccdWrite {
            conn_handle: ConnHandle(0),
            char_handle: handles.value_handle,
            notifications: true,
            indications: false,
        })
    );
    assert_eq!(BleEvent::from_cccd_write(ConnHandle(0), handles.value_handle, &[]), None);
}
