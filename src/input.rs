//! Controller vocabulary shared between the mapper and the modifier chain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Physical buttons a profile can refer to by symbolic name.
///
/// The symbolic names are what the text grammar and the structured record
/// use, see [`PadButton::symbol`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    LeftPad,
    RightPad,
    LeftGrip,
    RightGrip,
    Start,
    Back,
    C,
    StickPress,
}

impl PadButton {
    /// Symbolic name used in profile text and records.
    pub fn symbol(&self) -> &'static str {
        match self {
            PadButton::A => "A",
            PadButton::B => "B",
            PadButton::X => "X",
            PadButton::Y => "Y",
            PadButton::LeftBumper => "LB",
            PadButton::RightBumper => "RB",
            PadButton::LeftTrigger => "LT",
            PadButton::RightTrigger => "RT",
            PadButton::LeftPad => "LPAD",
            PadButton::RightPad => "RPAD",
            PadButton::LeftGrip => "LGRIP",
            PadButton::RightGrip => "RGRIP",
            PadButton::Start => "START",
            PadButton::Back => "BACK",
            PadButton::C => "C",
            PadButton::StickPress => "STICKPRESS",
        }
    }
}

impl fmt::Display for PadButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Error)]
#[error("Unknown button '{0}'")]
pub struct UnknownButton(pub String);

impl FromStr for PadButton {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "A" => PadButton::A,
            "B" => PadButton::B,
            "X" => PadButton::X,
            "Y" => PadButton::Y,
            "LB" => PadButton::LeftBumper,
            "RB" => PadButton::RightBumper,
            "LT" => PadButton::LeftTrigger,
            "RT" => PadButton::RightTrigger,
            "LPAD" => PadButton::LeftPad,
            "RPAD" => PadButton::RightPad,
            "LGRIP" => PadButton::LeftGrip,
            "RGRIP" => PadButton::RightGrip,
            "START" => PadButton::Start,
            "BACK" => PadButton::Back,
            "C" => PadButton::C,
            "STICKPRESS" => PadButton::StickPress,
            _ => return Err(UnknownButton(s.to_string())),
        })
    }
}

/// Continuous input sources whose events carry an origin marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    LeftPad,
    RightPad,
    Stick,
}

/// Press-state queries the external event dispatcher answers for the chain.
///
/// The dispatcher owns per-frame press history; `was_pressed` refers to the
/// previous frame, which is what release-edge detection needs.
pub trait Mapper {
    fn is_pressed(&self, button: PadButton) -> bool;
    fn was_pressed(&self, button: PadButton) -> bool;
}
