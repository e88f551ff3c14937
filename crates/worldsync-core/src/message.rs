//! World-state snapshot value

use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Ticks per full day/night cycle in the observed world
pub const DAY_LENGTH: u16 = 24000;

/// Well-known port on which the presenter listens for state updates
pub const DEFAULT_PORT: u16 = 52262;

/// Default synchronization target (loopback only)
pub fn default_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
}

/// One world-state snapshot as observed by the instrumented game process.
///
/// `time` is a raw tick count; any 16-bit value is wire-legal, consumers
/// reduce it modulo [`DAY_LENGTH`] via [`Message::time_of_day`]. Equality
/// covers `time` and `raining` only: `paused` travels on the wire and is
/// available to consumers, but has never participated in comparison.
#[derive(Clone, Copy, Debug, Default)]
pub struct Message {
    /// World tick count
    pub time: u16,
    /// Whether the observed clock is currently frozen
    pub paused: bool,
    /// Current precipitation state
    pub raining: bool,
}

impl Message {
    pub fn new(time: u16, paused: bool, raining: bool) -> Self {
        Message {
            time,
            paused,
            raining,
        }
    }

    /// Tick count reduced into `0..DAY_LENGTH`
    #[inline]
    pub fn time_of_day(&self) -> u16 {
        self.time % DAY_LENGTH
    }

    /// Position within the day/night cycle as a fraction in `[0, 1)`
    #[inline]
    pub fn day_fraction(&self) -> f64 {
        f64::from(self.time_of_day()) / f64::from(DAY_LENGTH)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.raining == other.raining
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.time.hash(state);
        self.raining.hash(state);
    }
}
