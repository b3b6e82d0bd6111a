//! # decay-rng
//!
//! Host SDK for a DIY radioactive-decay hardware RNG.
//!
//! A Raspberry Pi Pico watches a decay detector, turns inter-pulse timing
//! jitter into debiased bits, and streams raw bytes over USB serial. This
//! crate finds the board, wraps the slow raw stream in a periodically
//! reseeded ChaCha20 keystream, and serves fast whitened output. The
//! firmware's bit-extraction core lives here too ([`extractor`]) as a pure
//! state machine, so it can be tested against synthetic pulse trains.
//!
//! ## Quick Start
//!
//! ```no_run
//! use decay_rng::{DecayRng, RandomSource};
//!
//! let rng = DecayRng::open(None, None)?;
//!
//! let bytes = rng.get_random(32)?;
//! println!("{:02x?}", &bytes);
//! # Ok::<(), decay_rng::DecayRngError>(())
//! ```
//!
//! Raw detector bytes (no whitening, for entropy-quality vetting only):
//!
//! ```no_run
//! use decay_rng::{RawDecayRng, RandomSource};
//!
//! let raw = RawDecayRng::open(None, None)?;
//! let sample = raw.get_random(1024)?;
//! # Ok::<(), decay_rng::DecayRngError>(())
//! ```

pub mod cipher;
pub mod discovery;
pub mod extractor;
pub mod rng;
pub mod transport;

pub use discovery::{discover_devices, find_ports, DiscoveredDevice};
pub use extractor::{BitExtractor, EdgeSampler};
pub use rng::{DecayRng, RandomSource, RawDecayRng, RESEED_BASE};
pub use transport::{SerialTransport, Transport, BAUD_RATE};

/// Errors returned by the decay-rng SDK.
#[derive(Debug, thiserror::Error)]
pub enum DecayRngError {
    /// No detector board found during auto-discovery.
    #[error("No decay RNG device found")]
    NoDevice,

    /// Serial communication error.
    #[error("Serial error: {0}")]
    Serial(String),

    /// Stream-cipher state error (malformed key/nonce material).
    #[error("Cipher error: {0}")]
    Cipher(String),
}
