//! Shared fixtures for integration tests: a minimal FIT writer and track generators

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

pub const MESG_FILE_ID: u16 = 0;
pub const MESG_RECORD: u16 = 20;
pub const MESG_EVENT: u16 = 21;

pub const BASE_ENUM: u8 = 0x00;
pub const BASE_UINT8: u8 = 0x02;
pub const BASE_UINT16: u8 = 0x84;
pub const BASE_SINT32: u8 = 0x85;
pub const BASE_UINT32: u8 = 0x86;

/// Timestamp, position_lat, position_long
pub const RECORD_FIELDS: [(u8, u8, u8); 3] = [
    (253, 4, BASE_UINT32),
    (0, 4, BASE_SINT32),
    (1, 4, BASE_SINT32),
];

/// 2021-09-08T01:46:40Z in FIT time
pub const FIT_T0: u32 = 1_000_000_000;

/// Seconds between the Unix epoch and 1989-12-31T00:00:00Z
const FIT_EPOCH_OFFSET_SECS: i64 = 631_065_600;

pub fn fit_time(fit_seconds: u32) -> DateTime<Utc> {
    Utc.timestamp_opt(FIT_EPOCH_OFFSET_SECS + fit_seconds as i64, 0)
        .unwrap()
}

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// FIT CRC-16, low nibble first
pub fn fit_crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |mut crc, &byte| {
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = ((crc >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        ((crc >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

pub fn degrees_to_semicircles(degrees: f64) -> i32 {
    (degrees * 2_147_483_648.0 / 180.0).round() as i32
}

/// Builds the data section of a FIT file record by record
#[derive(Default)]
pub struct FitBuilder {
    records: Vec<u8>,
}

impl FitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> &mut Self {
        self.define_full(local, global, fields, false)
    }

    pub fn define_full(
        &mut self,
        local: u8,
        global: u16,
        fields: &[(u8, u8, u8)],
        big_endian: bool,
    ) -> &mut Self {
        self.records.push(0x40 | (local & 0x0F));
        self.records.push(0);
        self.records.push(big_endian as u8);
        if big_endian {
            self.records.extend_from_slice(&global.to_be_bytes());
        } else {
            self.records.extend_from_slice(&global.to_le_bytes());
        }
        self.records.push(fields.len() as u8);
        for &(number, size, base_type) in fields {
            self.records.extend_from_slice(&[number, size, base_type]);
        }
        self
    }

    /// Data message with a normal header
    pub fn data(&mut self, local: u8, payload: &[u8]) -> &mut Self {
        self.records.push(local & 0x0F);
        self.records.extend_from_slice(payload);
        self
    }

    /// Data message with a compressed timestamp header
    pub fn compressed(&mut self, local: u8, time_offset: u8, payload: &[u8]) -> &mut Self {
        self.records
            .push(0x80 | ((local & 0x03) << 5) | (time_offset & 0x1F));
        self.records.extend_from_slice(payload);
        self
    }

    /// Header, records and file CRC
    pub fn finish(&self) -> Vec<u8> {
        let mut bytes = vec![14, 0x20];
        bytes.extend_from_slice(&2194u16.to_le_bytes());
        bytes.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        bytes.extend_from_slice(b".FIT");
        let header_crc = fit_crc(&bytes);
        bytes.extend_from_slice(&header_crc.to_le_bytes());
        bytes.extend_from_slice(&self.records);
        let file_crc = fit_crc(&bytes);
        bytes.extend_from_slice(&file_crc.to_le_bytes());
        bytes
    }
}

pub fn record_payload(timestamp: u32, latitude: f64, longitude: f64) -> Vec<u8> {
    let mut payload = Vec::with_capacity(12);
    payload.extend_from_slice(&timestamp.to_le_bytes());
    payload.extend_from_slice(&degrees_to_semicircles(latitude).to_le_bytes());
    payload.extend_from_slice(&degrees_to_semicircles(longitude).to_le_bytes());
    payload
}

/// Kilometres to degrees of latitude
pub fn km_to_lat(km: f64) -> f64 {
    (km / rest_with_gps::EARTH_RADIUS_KM).to_degrees()
}

/// One fix per second: two minutes riding north at 36 km/h, ten minutes
/// parked, two minutes riding east. Returns `(seconds, lat, lon)`.
pub fn ride_with_one_stop() -> Vec<(u32, f64, f64)> {
    let start = (35.0, 139.0);
    let step = km_to_lat(0.01);
    let parked = (start.0 + 120.0 * step, start.1);

    let mut fixes = Vec::new();
    for t in 0..120u32 {
        fixes.push((t, start.0 + t as f64 * step, start.1));
    }
    for t in 120..720u32 {
        fixes.push((t, parked.0, parked.1));
    }
    let lon_step = step / parked.0.to_radians().cos();
    for t in 720..840u32 {
        fixes.push((t, parked.0, parked.1 + (t - 719) as f64 * lon_step));
    }
    fixes
}

pub fn ride_as_fit(fixes: &[(u32, f64, f64)]) -> Vec<u8> {
    let mut builder = FitBuilder::new();
    builder.define(0, MESG_RECORD, &RECORD_FIELDS);
    for &(t, lat, lon) in fixes {
        builder.data(0, &record_payload(FIT_T0 + t, lat, lon));
    }
    builder.finish()
}

pub fn ride_as_strava_json(fixes: &[(u32, f64, f64)]) -> String {
    let times: Vec<String> = fixes.iter().map(|(t, _, _)| t.to_string()).collect();
    let latlngs: Vec<String> = fixes
        .iter()
        .map(|(_, lat, lon)| format!("[{}, {}]", lat, lon))
        .collect();
    format!(
        r#"[{{"type": "latlng", "data": [{}]}}, {{"type": "time", "data": [{}]}}]"#,
        latlngs.join(", "),
        times.join(", ")
    )
}
