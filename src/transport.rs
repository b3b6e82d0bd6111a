//! Raw byte transport from the detector board.
//!
//! The board pushes an unframed stream of extracted bytes over USB CDC
//! serial; there are no commands and no framing, and the host only ever
//! reads. [`Transport`] is the seam the RNG wrappers consume, so tests can
//! substitute a deterministic fake for the hardware.

use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;

use crate::DecayRngError;

/// Symbol rate of the board's CDC link.
pub const BAUD_RATE: u32 = 115_200;

/// A source of raw detector bytes.
///
/// `read_exact` fills the buffer completely or fails. Errors surface
/// immediately and are never retried here; callers decide what a failed
/// read means for their own state.
pub trait Transport {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecayRngError>;
}

/// Serial link to a detector board.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial connection to the given port at the fixed baud rate.
    ///
    /// Stale input buffered by the OS is discarded so the first read
    /// returns bytes produced after the session began.
    pub fn open(port_name: &str, timeout: Duration) -> Result<Self, DecayRngError> {
        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(timeout)
            .open()
            .map_err(|e| DecayRngError::Serial(format!("Failed to open {port_name}: {e}")))?;

        port.clear(serialport::ClearBuffer::Input)
            .map_err(|e| DecayRngError::Serial(format!("Clear buffer failed: {e}")))?;

        log::debug!("opened detector port {port_name} at {BAUD_RATE} baud");
        Ok(Self { port })
    }

    /// Set the read timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), DecayRngError> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| DecayRngError::Serial(format!("Set timeout failed: {e}")))
    }
}

impl Transport for SerialTransport {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecayRngError> {
        let mut total = 0;
        while total < buf.len() {
            match self.port.read(&mut buf[total..]) {
                Ok(0) => {
                    return Err(DecayRngError::Serial("Device stream ended".into()));
                }
                Ok(n) => total += n,
                Err(e) => {
                    return Err(DecayRngError::Serial(format!("Read failed: {e}")));
                }
            }
        }
        log::trace!("read {} raw bytes from detector", buf.len());
        Ok(())
    }
}
