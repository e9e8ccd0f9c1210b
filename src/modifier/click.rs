//! Click-Gating: Achsen-Events erreichen die innere Action nur, solange
//! das zugehörige Pad gedrückt ist.

use crate::action::{Action, Parameter, Record};
use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper, PadButton};
use crate::modifier::{base_encode, Modifier, ModifierError};
use serde_json::Value;

/// Reicht Stick- und Pad-Achsen nur bei gedrückter Oberfläche weiter.
///
/// Button- und Trigger-Events tragen bereits eine eigene Druck-Semantik
/// und passieren ungefiltert. Beim Übergang gedrückt zu losgelassen sieht
/// die innere Action genau ein genulltes Event, damit kein letzter
/// Achsenwert stehen bleibt.
#[derive(Debug)]
pub struct ClickModifier {
    inner: Box<dyn Action>,
    name: Option<String>,
}

impl ClickModifier {
    pub const COMMAND: &'static str = "click";

    pub fn new(inner: Box<dyn Action>) -> Self {
        Self { inner, name: None }
    }

    pub fn from_parameters(params: Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError> {
        let mut params = params;
        match (params.len(), params.pop()) {
            (1, Some(Parameter::Action(inner))) => Ok(Box::new(Self::new(inner))),
            _ => Err(ModifierError::InvalidParameters {
                command: Self::COMMAND,
                reason: "expects exactly one inner action".to_string(),
            }),
        }
    }

    /// Pad-Button, der Events dieser Quelle freigibt.
    fn gate(what: InputSource) -> PadButton {
        match what {
            InputSource::LeftPad | InputSource::Stick => PadButton::LeftPad,
            InputSource::RightPad => PadButton::RightPad,
        }
    }
}

impl Modifier for ClickModifier {
    fn inner(&self) -> &dyn Action {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn Action {
        self.inner.as_mut()
    }
}

impl Action for ClickModifier {
    fn button_press(&mut self, mapper: &dyn Mapper) -> bool {
        self.inner.button_press(mapper)
    }

    fn button_release(&mut self, mapper: &dyn Mapper) -> bool {
        self.inner.button_release(mapper)
    }

    fn trigger(&mut self, mapper: &dyn Mapper, position: i32, old_position: i32) -> bool {
        self.inner.trigger(mapper, position, old_position)
    }

    fn axis(&mut self, mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        let gate = Self::gate(what);
        if mapper.is_pressed(gate) {
            self.inner.axis(mapper, position, what)
        } else if mapper.was_pressed(gate) {
            // Gerade losgelassen
            self.inner.axis(mapper, 0, what)
        } else {
            false
        }
    }

    fn pad(&mut self, mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        let gate = Self::gate(what);
        if mapper.is_pressed(gate) {
            self.inner.pad(mapper, position, what)
        } else if mapper.was_pressed(gate) {
            self.inner.pad(mapper, 0, what)
        } else {
            false
        }
    }

    fn whole(&mut self, mapper: &dyn Mapper, x: i32, y: i32, what: InputSource) -> bool {
        let gate = Self::gate(what);
        if mapper.is_pressed(gate) {
            self.inner.whole(mapper, x, y, what)
        } else if mapper.was_pressed(gate) {
            self.inner.whole(mapper, 0, 0, what)
        } else {
            false
        }
    }

    fn set_haptic(&mut self, haptic: HapticData) -> bool {
        self.inner.set_haptic(haptic)
    }

    fn set_speed(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.inner.set_speed(x, y, z)
    }

    fn to_source(&self, multiline: bool, pad: usize) -> String {
        if multiline {
            let child = self.inner.to_source(true, pad + 2);
            if child.contains('\n') {
                let indent = " ".repeat(pad);
                return format!("{indent}click(\n{child}\n{indent})");
            }
        }
        format!("click( {} )", self.inner.to_source(false, 0))
    }

    fn encode(&self) -> Record {
        let mut rv = base_encode(self.inner.as_ref(), self.name.as_deref());
        rv.insert("click".to_string(), Value::Bool(true));
        rv
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    fn strip(self: Box<Self>) -> Box<dyn Action> {
        let this = *self;
        this.inner.strip()
    }

    fn compress(mut self: Box<Self>) -> Box<dyn Action> {
        let inner = std::mem::replace(&mut self.inner, Box::new(crate::action::NoAction));
        self.inner = inner.compress();
        self
    }
}
