//! Device discovery: locate attached detector boards by USB VID/PID.

use serialport::{SerialPortInfo, SerialPortType, UsbPortInfo};

/// USB vendor/product identifiers of known detector boards.
const KNOWN_IDS: &[(u16, u16)] = &[
    (0x2e8a, 0x000a), // Raspberry Pi Pico (CDC-ACM)
];

/// A discovered detector board.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Serial port path (e.g. `/dev/ttyACM0`).
    pub port: String,
    /// USB vendor identifier.
    pub vid: u16,
    /// USB product identifier.
    pub pid: u16,
    /// USB serial number, when the board reports one.
    pub serial_number: Option<String>,
}

fn usb_info(port: &SerialPortInfo) -> Option<&UsbPortInfo> {
    match &port.port_type {
        SerialPortType::UsbPort(info) if KNOWN_IDS.contains(&(info.vid, info.pid)) => Some(info),
        _ => None,
    }
}

/// Port paths of all attached detector boards, sorted.
pub fn find_ports() -> Vec<String> {
    let mut ports: Vec<String> = serialport::available_ports()
        .unwrap_or_default()
        .iter()
        .filter(|p| usb_info(p).is_some())
        .map(|p| p.port_name.clone())
        .collect();
    ports.sort();
    ports
}

/// Discover all attached detector boards with their USB metadata.
pub fn discover_devices() -> Vec<DiscoveredDevice> {
    let mut devices: Vec<DiscoveredDevice> = serialport::available_ports()
        .unwrap_or_default()
        .iter()
        .filter_map(|p| {
            let info = usb_info(p)?;
            Some(DiscoveredDevice {
                port: p.port_name.clone(),
                vid: info.vid,
                pid: info.pid,
                serial_number: info.serial_number.clone(),
            })
        })
        .collect();
    devices.sort_by(|a, b| a.port.cmp(&b.port));
    devices
}
