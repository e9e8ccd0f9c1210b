//! Haptisches Feedback für die innere Action.

use crate::action::{Action, Parameter, Record};
use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper};
use crate::modifier::{base_encode, Modifier, ModifierError};
use serde_json::Value;

/// Baut einen unveränderlichen Haptik-Deskriptor und überträgt ihn bei der
/// Konstruktion einmalig in die innere Action.
///
/// Wie bei `sens()` reicht der Dispatch danach jedes Event unverändert
/// durch. Die Seite ist Pflicht, Amplitude, Frequenz und Periode fallen auf
/// ihre Standardwerte zurück.
#[derive(Debug)]
pub struct FeedbackModifier {
    inner: Box<dyn Action>,
    haptic: HapticData,
    /// Deskriptor-Parameter in der angegebenen Schreibweise.
    params: Vec<Parameter>,
    name: Option<String>,
}

impl FeedbackModifier {
    pub const COMMAND: &'static str = "feedback";

    pub fn new(haptic: HapticData, mut inner: Box<dyn Action>) -> Self {
        let params = vec![
            Parameter::Side(haptic.position),
            Parameter::Int(haptic.amplitude as i64),
            Parameter::Float(haptic.frequency as f64),
            Parameter::Int(haptic.period as i64),
        ];
        inner.set_haptic(haptic);
        Self {
            inner,
            haptic,
            params,
            name: None,
        }
    }

    pub fn from_parameters(params: Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError> {
        if params.len() < 2 {
            return Err(ModifierError::NotEnoughParameters {
                command: Self::COMMAND,
            });
        }
        let mut params = params;
        let inner = match params.pop() {
            Some(Parameter::Action(action)) => action,
            _ => {
                return Err(ModifierError::InvalidParameters {
                    command: Self::COMMAND,
                    reason: "last parameter must be the inner action".to_string(),
                })
            }
        };
        let position = match params.first() {
            Some(Parameter::Side(side)) => *side,
            _ => {
                return Err(ModifierError::InvalidParameters {
                    command: Self::COMMAND,
                    reason: "first parameter must be LEFT, RIGHT or BOTH".to_string(),
                })
            }
        };
        if params.len() > 4 {
            return Err(ModifierError::InvalidParameters {
                command: Self::COMMAND,
                reason: "too many parameters".to_string(),
            });
        }
        let mut values = [None; 3];
        for (index, param) in params[1..].iter().enumerate() {
            match param.as_number() {
                Some(value) => values[index] = Some(value),
                None => {
                    return Err(ModifierError::InvalidParameters {
                        command: Self::COMMAND,
                        reason: format!("parameter {} must be numeric", index + 2),
                    })
                }
            }
        }
        let haptic = HapticData {
            position,
            amplitude: values[0].unwrap_or(HapticData::DEFAULT_AMPLITUDE as f64) as u16,
            frequency: values[1].unwrap_or(HapticData::DEFAULT_FREQUENCY as f64) as f32,
            period: values[2].unwrap_or(HapticData::DEFAULT_PERIOD as f64) as u16,
        };
        let mut inner = inner;
        inner.set_haptic(haptic);
        Ok(Box::new(Self {
            inner,
            haptic,
            params,
            name: None,
        }))
    }

    /// Der konfigurierte Deskriptor.
    pub fn haptic(&self) -> HapticData {
        self.haptic
    }

    /// Parameter ohne die Werte, die am Ende auf ihrem Standard stehen.
    fn stripped_params(&self) -> &[Parameter] {
        let defaults = [
            HapticData::DEFAULT_AMPLITUDE as f64,
            HapticData::DEFAULT_FREQUENCY as f64,
            HapticData::DEFAULT_PERIOD as f64,
        ];
        let mut end = self.params.len();
        while end > 1 && self.params[end - 1].as_number() == Some(defaults[end - 2]) {
            end -= 1;
        }
        &self.params[..end]
    }

    /// Amplitude und Periode erscheinen ganzzahlig, die Frequenz behält die
    /// angegebene Schreibweise.
    fn render_param(index: usize, param: &Parameter) -> String {
        match index {
            1 | 3 => match param.as_number() {
                Some(value) => format!("{}", value as i64),
                None => param.to_string(),
            },
            _ => param.to_string(),
        }
    }
}

impl Modifier for FeedbackModifier {
    fn inner(&self) -> &dyn Action {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn Action {
        self.inner.as_mut()
    }
}

impl Action for FeedbackModifier {
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
        self.inner.axis(mapper, position, what)
    }

    fn pad(&mut self, mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        self.inner.pad(mapper, position, what)
    }

    fn whole(&mut self, mapper: &dyn Mapper, x: i32, y: i32, what: InputSource) -> bool {
        self.inner.whole(mapper, x, y, what)
    }

    fn gyro(&mut self, mapper: &dyn Mapper, pitch: i32, yaw: i32, roll: i32) -> bool {
        self.inner.gyro(mapper, pitch, yaw, roll)
    }

    fn set_haptic(&mut self, haptic: HapticData) -> bool {
        self.inner.set_haptic(haptic)
    }

    fn set_speed(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.inner.set_speed(x, y, z)
    }

    fn to_source(&self, multiline: bool, pad: usize) -> String {
        let params = self.stripped_params();
        let head: Vec<String> = params
            .iter()
            .enumerate()
            .map(|(index, param)| Self::render_param(index, param))
            .collect();
        if multiline {
            let child = self.inner.to_source(true, pad + 2);
            if child.contains('\n') {
                let indent = " ".repeat(pad);
                return format!("{indent}feedback({},\n{child}\n{indent})", head.join(", "));
            }
        }
        let mut parts = head;
        parts.push(self.inner.to_source(false, 0));
        format!("feedback({})", parts.join(", "))
    }

    fn encode(&self) -> Record {
        let mut rv = base_encode(self.inner.as_ref(), self.name.as_deref());
        let values: Vec<Value> = self
            .params
            .iter()
            .map(|param| match param {
                Parameter::Side(side) => Value::String(side.to_string()),
                Parameter::Int(value) => Value::from(*value),
                Parameter::Float(value) => Value::from(*value),
                other => Value::String(other.to_string()),
            })
            .collect();
        rv.insert("feedback".to_string(), Value::Array(values));
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

    fn compress(self: Box<Self>) -> Box<dyn Action> {
        // Der Deskriptor steckt seit der Konstruktion in der inneren
        // Action, der Wrapper selbst kann aus der Kette fallen.
        let this = *self;
        this.inner.compress()
    }
}
