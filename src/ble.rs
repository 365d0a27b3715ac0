//! Bluetooth Low Energy subsystem.
//!
//! Drives the Nordic SoftDevice S140 in **Peripheral** role: advertises as
//! [`DEVICE_NAME`] soliciting the Apple Notification Center Service, waits
//! for the phone to connect, and reports connection state to the
//! [`AncsHandler`]. This module only owns the link. Subscribing to ANCS and
//! decoding its notification records is left to the ANCS client, which
//! hands each record to `AncsHandler::on_notification_arrived` /
//! `on_notification_removed`; no such client is wired in here yet.

use core::mem;

use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use heapless::Vec;
use nrf_softdevice::ble::peripheral::{self, AdvertiseError};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::{raw, Softdevice};

use crate::ancs::{AncsHandler, ConnectionState};
use crate::apps::AppNames;
use crate::config::{BLE_ADV_INTERVAL, BLE_ADV_INTERVAL_FAST, DEVICE_NAME};
use crate::error::BleError;

/// Raised by the main loop every `KEEPALIVE_SECS`.
pub static KEEPALIVE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Legacy advertising payload limit.
const ADV_PAYLOAD_LEN: usize = 31;

/// How often a quiet link is checked for disconnection.
const LINK_POLL: Duration = Duration::from_millis(250);

/// Back-off after a failed advertising attempt.
const ADVERTISE_RETRY: Duration = Duration::from_secs(1);

/// ANCS service UUID 7905F431-B5CE-4E99-A40F-4B1E122D00D0, little-endian.
const ANCS_SERVICE_UUID: [u8; 16] = [
    0xd0, 0x00, 0x2d, 0x12, 0x1e, 0x4b, 0x0f, 0xa4, 0x99, 0x4e, 0xce, 0xb5, 0x31, 0xf4, 0x05, 0x79,
];

// AD types
const AD_FLAGS: u8 = 0x01;
const AD_COMPLETE_NAME: u8 = 0x09;
const AD_SOLICIT_128: u8 = 0x15;

/// SoftDevice configuration for a single peripheral link.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Flags + complete local name.
fn adv_data() -> Vec<u8, ADV_PAYLOAD_LEN> {
    let name = DEVICE_NAME.as_bytes();
    let name = &name[..name.len().min(ADV_PAYLOAD_LEN - 5)];

    let mut data = Vec::new();
    let _ = data.extend_from_slice(&[
        2,
        AD_FLAGS,
        raw::BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE as u8,
    ]);
    let _ = data.extend_from_slice(&[name.len() as u8 + 1, AD_COMPLETE_NAME]);
    let _ = data.extend_from_slice(name);
    data
}

/// ANCS solicitation, so iOS offers the device for notification sharing.
fn scan_data() -> Vec<u8, ADV_PAYLOAD_LEN> {
    let mut data = Vec::new();
    let _ = data.extend_from_slice(&[ANCS_SERVICE_UUID.len() as u8 + 1, AD_SOLICIT_128]);
    let _ = data.extend_from_slice(&ANCS_SERVICE_UUID);
    data
}

async fn advertise(sd: &Softdevice, interval: u32) -> Result<Connection, BleError> {
    let adv_data = adv_data();
    let scan_data = scan_data();
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: &adv_data,
        scan_data: &scan_data,
    };
    let config = peripheral::Config {
        interval,
        ..Default::default()
    };

    peripheral::advertise_connectable(sd, adv, &config)
        .await
        .map_err(|e| match e {
            AdvertiseError::Raw(code) => BleError::Raw(code as u32),
            _ => BleError::AdvertiseFailed,
        })
}

/// Wait until the link drops, answering keep-alive signals meanwhile.
async fn hold_link(conn: &Connection) {
    loop {
        let keepalive = match select(KEEPALIVE.wait(), Timer::after(LINK_POLL)).await {
            Either::First(()) => true,
            Either::Second(()) => false,
        };
        let Some(handle) = conn.handle() else {
            return;
        };
        if keepalive {
            debug!("Keep-alive: link {} up", handle);
        }
    }
}

/// Advertise, hold the link, report state; forever.
///
/// In pairing mode the device advertises at the fast interval so a phone
/// doing its first discovery finds it quickly.
pub async fn run<M, A, const Q: usize>(
    sd: &'static Softdevice,
    handler: &AncsHandler<'_, M, A, Q>,
    pairing_mode: bool,
) -> !
where
    M: RawMutex,
    A: AppNames,
{
    let interval = if pairing_mode {
        info!("Pairing mode: fast advertising");
        BLE_ADV_INTERVAL_FAST
    } else {
        BLE_ADV_INTERVAL
    };

    loop {
        info!("Advertising as {}", DEVICE_NAME);
        let conn = match advertise(sd, interval).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Advertising failed: {}", e);
                Timer::after(ADVERTISE_RETRY).await;
                continue;
            }
        };

        handler.on_connection_state_changed(ConnectionState::Connected);
        hold_link(&conn).await;
        handler.on_connection_state_changed(ConnectionState::Disconnected);
    }
}

