use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortRangeError {
    #[error("port range is empty")]
    Empty,
    #[error("port range {0:?} is not of the form LOW-HIGH")]
    Malformed(String),
    #[error("port {0:?} is not a decimal number")]
    NotANumber(String),
    #[error("port {port} is outside of {}-{}", MIN_PORT, MAX_PORT)]
    OutOfBounds { port: String },
    #[error("end port {high} cannot be less than start port {low}")]
    Reversed { low: u16, high: u16 },
}

/// An inclusive range of TCP/UDP ports written as `LOW-HIGH`.
///
/// Only the strict `LOW-HIGH` form is accepted: no whitespace, no sign, no
/// single-port or `BASE+SIZE` shorthand. `LOW` may equal `HIGH`.
#[derive(CopyGetters, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortRange {
    #[getset(get_copy = "pub")]
    low: u16,

    #[getset(get_copy = "pub")]
    high: u16,
}

impl PortRange {
    pub fn new(low: u16, high: u16) -> Result<Self, PortRangeError> {
        for port in [low, high] {
            if u32::from(port) < MIN_PORT {
                return Err(PortRangeError::OutOfBounds {
                    port: port.to_string(),
                });
            }
        }
        if low > high {
            return Err(PortRangeError::Reversed { low, high });
        }
        Ok(Self { low, high })
    }
}

fn parse_port(value: &str) -> Result<u16, PortRangeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortRangeError::NotANumber(value.to_string()));
    }

    let out_of_bounds = || PortRangeError::OutOfBounds {
        port: value.to_string(),
    };

    // All digits, so the only possible parse failure is overflow
    let port = value.parse::<u32>().map_err(|_| out_of_bounds())?;
    if !(MIN_PORT..=MAX_PORT).contains(&port) {
        return Err(out_of_bounds());
    }
    u16::try_from(port).map_err(|_| out_of_bounds())
}

impl FromStr for PortRange {
    type Err = PortRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PortRangeError::Empty);
        }

        let (low, high) = s
            .split_once('-')
            .ok_or_else(|| PortRangeError::Malformed(s.to_string()))?;

        let low = parse_port(low)?;
        let high = parse_port(high)?;

        Self::new(low, high)
    }
}

impl TryFrom<String> for PortRange {
    type Error = PortRangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortRange> for String {
    fn from(range: PortRange) -> Self {
        range.to_string()
    }
}

impl Display for PortRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}
