//! Test-Doubles für Mapper und Actions.

use crate::action::{Action, Record};
use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper, PadButton};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Beobachtete Aufrufe einer [`TrackingAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    ButtonPress,
    ButtonRelease,
    Trigger(i32, i32),
    Axis(i32, InputSource),
    Pad(i32, InputSource),
    Whole(i32, i32, InputSource),
    Gyro(i32, i32, i32),
    Haptic(HapticData),
    Speed(f32, f32, f32),
}

pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

/// Blatt-Action, die jeden Aufruf in ein geteiltes Log schreibt.
#[derive(Debug)]
pub struct TrackingAction {
    tag: &'static str,
    log: SeenLog,
}

impl TrackingAction {
    pub fn new(tag: &'static str) -> (Box<dyn Action>, SeenLog) {
        let log = SeenLog::default();
        (
            Box::new(Self {
                tag,
                log: log.clone(),
            }),
            log,
        )
    }

    fn push(&self, seen: Seen) {
        self.log.lock().unwrap().push(seen);
    }
}

impl Action for TrackingAction {
    fn button_press(&mut self, _mapper: &dyn Mapper) -> bool {
        self.push(Seen::ButtonPress);
        true
    }

    fn button_release(&mut self, _mapper: &dyn Mapper) -> bool {
        self.push(Seen::ButtonRelease);
        true
    }

    fn trigger(&mut self, _mapper: &dyn Mapper, position: i32, old_position: i32) -> bool {
        self.push(Seen::Trigger(position, old_position));
        true
    }

    fn axis(&mut self, _mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        self.push(Seen::Axis(position, what));
        true
    }

    fn pad(&mut self, _mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        self.push(Seen::Pad(position, what));
        true
    }

    fn whole(&mut self, _mapper: &dyn Mapper, x: i32, y: i32, what: InputSource) -> bool {
        self.push(Seen::Whole(x, y, what));
        true
    }

    fn gyro(&mut self, _mapper: &dyn Mapper, pitch: i32, yaw: i32, roll: i32) -> bool {
        self.push(Seen::Gyro(pitch, yaw, roll));
        true
    }

    fn set_haptic(&mut self, haptic: HapticData) -> bool {
        self.push(Seen::Haptic(haptic));
        true
    }

    fn set_speed(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.push(Seen::Speed(x, y, z));
        true
    }

    fn to_source(&self, _multiline: bool, pad: usize) -> String {
        format!("{}{}()", " ".repeat(pad), self.tag)
    }

    fn encode(&self) -> Record {
        let mut rv = Record::new();
        rv.insert(
            "action".to_string(),
            Value::String(self.to_source(false, 0)),
        );
        rv
    }

    fn strip(self: Box<Self>) -> Box<dyn Action> {
        self
    }

    fn compress(self: Box<Self>) -> Box<dyn Action> {
        self
    }
}

/// Mapper-Double mit direkt setzbarem Druckzustand.
#[derive(Debug, Default)]
pub struct TestMapper {
    pressed: HashSet<PadButton>,
    previous: HashSet<PadButton>,
}

impl TestMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drückt einen Button im aktuellen Frame.
    pub fn press(&mut self, button: PadButton) {
        self.pressed.insert(button);
    }

    /// Lässt einen Button los; der alte Zustand bleibt als Historie für
    /// `was_pressed` sichtbar.
    pub fn release(&mut self, button: PadButton) {
        if self.pressed.remove(&button) {
            self.previous.insert(button);
        }
    }

    /// Beginnt einen neuen Frame, die Historie verfällt.
    pub fn next_frame(&mut self) {
        self.previous.clear();
    }
}

impl Mapper for TestMapper {
    fn is_pressed(&self, button: PadButton) -> bool {
        self.pressed.contains(&button)
    }

    fn was_pressed(&self, button: PadButton) -> bool {
        self.previous.contains(&button)
    }
}
