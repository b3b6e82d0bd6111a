//! Whitened and raw random byte sources over a detector transport.
//!
//! [`DecayRng`] is the secure accessor: it keys a ChaCha20 cipher from raw
//! detector bytes, serves keystream output, and stirs fresh hardware
//! entropy back in on a randomized schedule. [`RawDecayRng`] bypasses all
//! of that and hands out the detector stream unmodified; it exists only
//! for entropy-quality vetting and is never the right choice for keys.
//!
//! Both implement [`RandomSource`], so callers (and tests) can treat them
//! interchangeably as byte sources.

use std::io;
use std::sync::Mutex;
use std::time::Duration;

use chacha20::cipher::StreamCipher;
use chacha20::ChaCha20;

use crate::cipher::{self, SEED_LEN};
use crate::discovery::find_ports;
use crate::transport::{SerialTransport, Transport};
use crate::DecayRngError;

/// Lower bound of the reseed window, in output bytes. The actual interval
/// is drawn uniformly from `[RESEED_BASE, 2 * RESEED_BASE)` at every stir.
pub const RESEED_BASE: u64 = 1 << 20;

/// A source of random bytes.
///
/// Implemented by both the whitened [`DecayRng`] and the raw
/// [`RawDecayRng`] passthrough. All methods serialize internally, so a
/// shared reference can be used from several threads.
pub trait RandomSource {
    /// Fill `buf` completely or fail.
    ///
    /// For the whitened source this XORs the cipher keystream over
    /// whatever `buf` holds; pass zeroes to get keystream output as-is.
    fn read(&self, buf: &mut [u8]) -> Result<(), DecayRngError>;

    /// Get `count` random bytes.
    fn get_random(&self, count: usize) -> Result<Vec<u8>, DecayRngError> {
        let mut buf = vec![0u8; count];
        self.read(&mut buf)?;
        Ok(buf)
    }
}

/// Everything a read touches, behind one lock: the whole sequence (stir
/// check, rekey, counter update, keystream application) is a single atomic
/// step.
struct Whitened<T> {
    transport: T,
    cipher: ChaCha20,
    reseed_counter: u64,
    base: u64,
}

impl<T: Transport> Whitened<T> {
    /// Rekey from fresh detector bytes when the current epoch is spent,
    /// then charge `len` output bytes against the counter.
    ///
    /// A failed raw read propagates with the prior cipher completely
    /// untouched; the instance stays usable and the next read retries the
    /// stir.
    fn stir_if_needed(&mut self, len: u64) -> Result<(), DecayRngError> {
        if self.reseed_counter <= len {
            let mut fresh = [0u8; SEED_LEN];
            self.transport.read_exact(&mut fresh)?;
            let seed = cipher::fold(&mut self.cipher, &fresh);
            self.cipher = cipher::init(&seed)?;
            self.reseed_counter = cipher::draw_interval(&mut self.cipher, self.base);
            log::debug!(
                "stirred {} detector bytes in; next reseed within {} bytes",
                SEED_LEN,
                self.reseed_counter
            );
        }
        self.reseed_counter = self.reseed_counter.saturating_sub(len);
        Ok(())
    }
}

/// Whitened random byte source backed by a detector board.
///
/// ```no_run
/// use decay_rng::{DecayRng, RandomSource};
///
/// let rng = DecayRng::open(None, None)?;
/// let key = rng.get_random(32)?;
/// rng.close();
/// # Ok::<(), decay_rng::DecayRngError>(())
/// ```
///
/// Construction reads one full seed (key ‖ nonce, 44 bytes) straight from
/// the hardware. Every read may additionally stir: once the randomized
/// per-epoch byte budget is spent, 44 fresh detector bytes are folded
/// through the outgoing cipher and a new cipher takes over. Any output
/// byte therefore depends on hardware entropy injected at most
/// `2 * RESEED_BASE` bytes earlier, and compromising the cipher state
/// exposes at most the remainder of the current epoch.
pub struct DecayRng<T = SerialTransport> {
    inner: Mutex<Whitened<T>>,
}

impl DecayRng<SerialTransport> {
    /// Connect to a detector board and seed the cipher.
    ///
    /// - `port`: serial port path. If `None`, auto-discovers the first
    ///   attached board.
    /// - `timeout`: per-read serial timeout. If `None`, uses 2 seconds.
    pub fn open(port: Option<&str>, timeout: Option<Duration>) -> Result<Self, DecayRngError> {
        Self::with_transport(open_transport(port, timeout)?)
    }
}

impl<T: Transport> DecayRng<T> {
    /// Seed a wrapper from an already-open transport.
    pub fn with_transport(transport: T) -> Result<Self, DecayRngError> {
        Self::with_reseed_base(transport, RESEED_BASE)
    }

    /// Seed a wrapper with a scaled reseed window.
    ///
    /// The default window is [`RESEED_BASE`]; scaling it down makes epoch
    /// behavior observable without serving megabytes. `base` must be
    /// nonzero.
    pub fn with_reseed_base(mut transport: T, base: u64) -> Result<Self, DecayRngError> {
        if base == 0 {
            return Err(DecayRngError::Cipher("Reseed base must be nonzero".into()));
        }
        let mut seed = [0u8; SEED_LEN];
        transport.read_exact(&mut seed)?;
        let cipher = cipher::init(&seed)?;
        Ok(Self {
            // Counter starts spent, so the first read stirs immediately.
            inner: Mutex::new(Whitened {
                transport,
                cipher,
                reseed_counter: 0,
                base,
            }),
        })
    }

    /// Release the transport.
    pub fn close(self) {
        drop(self);
    }
}

impl<T: Transport> RandomSource for DecayRng<T> {
    fn read(&self, buf: &mut [u8]) -> Result<(), DecayRngError> {
        if buf.is_empty() {
            return Ok(());
        }
        let mut inner = self.inner.lock().unwrap();
        inner.stir_if_needed(buf.len() as u64)?;
        inner.cipher.apply_keystream(buf);
        Ok(())
    }
}

impl<T: Transport> io::Read for DecayRng<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RandomSource::read(&*self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }
}

/// Raw detector bytes, unmodified: no cipher, no reseed schedule.
///
/// For inspecting the quality of the hardware stream (bias sweeps,
/// statistical test batteries). Not hardened for key material; use
/// [`DecayRng`] for anything secret.
pub struct RawDecayRng<T = SerialTransport> {
    transport: Mutex<T>,
}

impl RawDecayRng<SerialTransport> {
    /// Connect to a detector board without seeding a cipher.
    pub fn open(port: Option<&str>, timeout: Option<Duration>) -> Result<Self, DecayRngError> {
        Ok(Self::with_transport(open_transport(port, timeout)?))
    }
}

impl<T: Transport> RawDecayRng<T> {
    /// Wrap an already-open transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
        }
    }

    /// Release the transport.
    pub fn close(self) {
        drop(self);
    }
}

impl<T: Transport> RandomSource for RawDecayRng<T> {
    fn read(&self, buf: &mut [u8]) -> Result<(), DecayRngError> {
        if buf.is_empty() {
            return Ok(());
        }
        self.transport.lock().unwrap().read_exact(buf)
    }
}

/// Open a serial transport, auto-discovering the port when none is given.
fn open_transport(
    port: Option<&str>,
    timeout: Option<Duration>,
) -> Result<SerialTransport, DecayRngError> {
    let timeout = timeout.unwrap_or(Duration::from_secs(2));
    let port_name = match port {
        Some(p) => p.to_string(),
        None => find_ports()
            .into_iter()
            .next()
            .ok_or(DecayRngError::NoDevice)?,
    };
    SerialTransport::open(&port_name, timeout)
}
