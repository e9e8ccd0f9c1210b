//! Haptic feedback descriptor attached to actions by `feedback()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which side of the controller an effect plays on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HapticPos {
    Left,
    Right,
    Both,
}

impl fmt::Display for HapticPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HapticPos::Left => "LEFT",
            HapticPos::Right => "RIGHT",
            HapticPos::Both => "BOTH",
        })
    }
}

#[derive(Debug, Error)]
#[error("Unknown haptic position '{0}'")]
pub struct UnknownSide(pub String);

impl FromStr for HapticPos {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LEFT" => HapticPos::Left,
            "RIGHT" => HapticPos::Right,
            "BOTH" => HapticPos::Both,
            _ => return Err(UnknownSide(s.to_string())),
        })
    }
}

/// One rumble effect description. Built once per `feedback()` modifier and
/// immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HapticData {
    pub position: HapticPos,
    pub amplitude: u16,
    pub frequency: f32,
    pub period: u16,
}

impl HapticData {
    pub const DEFAULT_AMPLITUDE: u16 = 512;
    pub const DEFAULT_FREQUENCY: f32 = 4.0;
    pub const DEFAULT_PERIOD: u16 = 1024;

    /// Creates a descriptor with the default effect parameters.
    pub fn new(position: HapticPos) -> Self {
        Self {
            position,
            amplitude: Self::DEFAULT_AMPLITUDE,
            frequency: Self::DEFAULT_FREQUENCY,
            period: Self::DEFAULT_PERIOD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_names_round_trip() {
        for side in [HapticPos::Left, HapticPos::Right, HapticPos::Both] {
            assert_eq!(side.to_string().parse::<HapticPos>().unwrap(), side);
        }
    }

    #[test]
    fn defaults_are_applied() {
        let haptic = HapticData::new(HapticPos::Both);
        assert_eq!(haptic.amplitude, 512);
        assert_eq!(haptic.frequency, 4.0);
        assert_eq!(haptic.period, 1024);
    }
}
