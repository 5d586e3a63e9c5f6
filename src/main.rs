#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::{config::Config, interrupt};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::advertisement_builder::{Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::{raw, Config as SdConfig, Softdevice};
use panic_probe as _;

use soil_moisture_s140::ble::softdevice::{SmsServer, SoftdeviceStack};
use soil_moisture_s140::ble::stack::ConnHandle;
use soil_moisture_s140::ble::{BleEvent, ServiceInit, SoilMoistureService};
use soil_moisture_s140::config;
use soil_moisture_s140::sensor;

type Service = SoilMoistureService<SoftdeviceStack>;

/// The service is shared by the connection task and the notify task
static SERVICE: Mutex<CriticalSectionRawMutex, RefCell<Option<Service>>> = Mutex::new(RefCell::new(None));

fn with_service<R>(f: impl FnOnce(&mut Service) -> R) -> Option<R> {
    SERVICE.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting soil moisture firmware");

    // Keep clear of the interrupt levels the SoftDevice reserves (0, 1, 4)
    let mut nrf_config = Config::default();
    nrf_config.gpiote_interrupt_priority = interrupt::Priority::P2;
    nrf_config.time_interrupt_priority = interrupt::Priority::P2;
    let _peripherals = embassy_nrf::init(nrf_config);

    let sd_config = SdConfig {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: config::stack::PERIPH_LINK_COUNT,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t {
            att_mtu: config::stack::ATT_MTU,
        }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: config::stack::ATTR_TAB_SIZE,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: config::stack::PERIPH_LINK_COUNT,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: Default::default(),
        }),
        common_vs_uuid: Some(raw::ble_common_cfg_vs_uuid_t {
            vs_uuid_count: config::stack::MAX_VS_UUID_COUNT as u8,
        }),
        ..Default::default()
    };

    let sd: &'static Softdevice = Softdevice::enable(&sd_config);
    info!("SoftDevice enabled");

    // A half-registered service must never be advertised
    let service = match SoilMoistureService::init(SoftdeviceStack::new(sd), &ServiceInit::default()) {
        Ok(service) => service,
        Err(e) => {
            defmt::panic!("Soil moisture service registration failed: {}", e);
        }
    };
    if let Some(uuid) = service.service_uuid128() {
        info!("Service UUID {:02x}", uuid);
    }
    let server = SmsServer::new(service.moisture_handles());
    SERVICE.lock(|cell| *cell.borrow_mut() = Some(service));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(ble_task(sd, server)));
    unwrap!(spawner.spawn(notify_task()));

    loop {
        Timer::after(Duration::from_secs(config::firmware::HEARTBEAT_SECS)).await;
        info!("Heartbeat - system running");
    }
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: SmsServer) {
    static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
        .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
        .full_name(config::advertising::DEVICE_NAME)
        .build();

    static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new().build();

    loop {
        let adv_config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("BLE advertising failed: {:?}", Debug2Format(&e));
                Timer::after(Duration::from_millis(config::advertising::RETRY_DELAY_MS)).await;
                continue;
            }
        };

        // The link can drop before we get here
        let Some(raw_handle) = conn.handle() else {
            warn!("BLE connection closed before it was tracked");
            continue;
        };
        let conn_handle = ConnHandle(raw_handle);
        with_service(|s| s.on_ble_evt(&BleEvent::Connected { conn_handle }));

        // Returns when the link goes down
        let e = gatt_server::run(&conn, &server, |event| {
            with_service(|s| s.on_ble_evt(&event));
        })
        .await;
        debug!("gatt_server run exited: {:?}", Debug2Format(&e));

        with_service(|s| s.on_ble_evt(&BleEvent::Disconnected { conn_handle }));
    }
}

#[embassy_executor::task]
async fn notify_task() {
    loop {
        let value = sensor::next_reading().await;
        // Outcome is logged by the service; nothing is retried
        let _ = with_service(|s| s.on_moisture_update(value));
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
