//! Latest-value cell shared between the sensor callback and the tick loop
//!
//! Both angles are packed into a single `AtomicU64`, so a reader sees either
//! the previous sample or the new one, never half of each. Older samples are
//! simply overwritten.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use super::SensorReading;

/// Bit pattern meaning "nothing reported yet". Stored NaNs are canonicalized,
/// so no real sample packs to this value.
const EMPTY: u64 = u64::MAX;

/// Whether the platform confirmed that orientation data exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Query still in flight
    Pending,
    Available,
    Unavailable,
}

impl Availability {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Availability::Available,
            2 => Availability::Unavailable,
            _ => Availability::Pending,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Availability::Pending => 0,
            Availability::Available => 1,
            Availability::Unavailable => 2,
        }
    }
}

#[inline]
fn canonical_bits(v: f32) -> u32 {
    if v.is_nan() { f32::NAN.to_bits() } else { v.to_bits() }
}

#[inline]
fn pack(reading: SensorReading) -> u64 {
    (u64::from(canonical_bits(reading.beta)) << 32) | u64::from(canonical_bits(reading.gamma))
}

#[inline]
fn unpack(bits: u64) -> Option<SensorReading> {
    if bits == EMPTY {
        return None;
    }
    Some(SensorReading {
        beta: f32::from_bits((bits >> 32) as u32),
        gamma: f32::from_bits(bits as u32),
    })
}

/// Shared storage behind a [`SensorFeed`] / [`SensorReader`] pair
#[derive(Debug)]
pub struct ReadingCell {
    latest: AtomicU64,
    availability: AtomicU8,
}

impl Default for ReadingCell {
    fn default() -> Self {
        Self {
            latest: AtomicU64::new(EMPTY),
            availability: AtomicU8::new(Availability::Pending.as_u8()),
        }
    }
}

impl ReadingCell {
    /// Create a connected writer/reader pair
    pub fn channel() -> (SensorFeed, SensorReader) {
        let cell = Arc::new(Self::default());
        (SensorFeed { cell: cell.clone() }, SensorReader { cell })
    }
}

/// Writing half, owned by the platform callback
#[derive(Debug, Clone)]
pub struct SensorFeed {
    cell: Arc<ReadingCell>,
}

impl SensorFeed {
    /// Replace the latest sample
    pub fn publish(&self, reading: SensorReading) {
        self.cell.latest.store(pack(reading), Ordering::Release);
    }

    /// Record the outcome of the asynchronous availability query
    pub fn resolve_availability(&self, available: bool) {
        let state = if available {
            Availability::Available
        } else {
            Availability::Unavailable
        };
        self.cell.availability.store(state.as_u8(), Ordering::Release);
    }
}

/// Reading half, owned by the session
#[derive(Debug, Clone)]
pub struct SensorReader {
    cell: Arc<ReadingCell>,
}

impl SensorReader {
    /// Most recent sample, if any arrived
    pub fn latest(&self) -> Option<SensorReading> {
        unpack(self.cell.latest.load(Ordering::Acquire))
    }

    pub fn availability(&self) -> Availability {
        Availability::from_u8(self.cell.availability.load(Ordering::Acquire))
    }

    /// False until the availability query resolves positively
    pub fn is_available(&self) -> bool {
        self.availability() == Availability::Available
    }
}
