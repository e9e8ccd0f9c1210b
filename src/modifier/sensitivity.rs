//! Empfindlichkeits-Skalierung für die innere Action.

use crate::action::{Action, Parameter, Record};
use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper};
use crate::modifier::{base_encode, Modifier, ModifierError};
use serde_json::Value;
use tracing::warn;

/// Überträgt bis zu drei Achsen-Multiplikatoren einmalig bei der
/// Konstruktion in die innere Action.
///
/// Die Skalierung passiert damit vollständig in der inneren Action; der
/// Dispatch reicht jedes Event unverändert durch. Fehlende Multiplikatoren
/// stehen auf 1.0.
#[derive(Debug)]
pub struct SensitivityModifier {
    inner: Box<dyn Action>,
    speeds: [f32; 3],
    /// Numerische Parameter in der angegebenen Schreibweise.
    params: Vec<Parameter>,
    name: Option<String>,
}

impl SensitivityModifier {
    pub const COMMAND: &'static str = "sens";

    pub fn new(x: f32, y: f32, z: f32, inner: Box<dyn Action>) -> Self {
        let params = vec![
            Parameter::Float(x as f64),
            Parameter::Float(y as f64),
            Parameter::Float(z as f64),
        ];
        Self::build(params, [x, y, z], inner)
    }

    fn build(params: Vec<Parameter>, speeds: [f32; 3], mut inner: Box<dyn Action>) -> Self {
        inner.set_speed(speeds[0], speeds[1], speeds[2]);
        Self {
            inner,
            speeds,
            params,
            name: None,
        }
    }

    pub fn from_parameters(params: Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError> {
        let mut numbers = Vec::new();
        let mut inner: Option<Box<dyn Action>> = None;
        for param in params {
            match param {
                Parameter::Int(_) | Parameter::Float(_) => {
                    if numbers.len() < 3 {
                        numbers.push(param);
                    } else {
                        warn!("sens: ignoring extra multiplier {param}");
                    }
                }
                Parameter::Action(action) => {
                    if inner.is_none() {
                        inner = Some(action);
                    } else {
                        warn!("sens: ignoring extra action parameter");
                    }
                }
                other => warn!("sens: ignoring parameter {other}"),
            }
        }
        let Some(inner) = inner else {
            return Err(ModifierError::NotEnoughParameters {
                command: Self::COMMAND,
            });
        };
        let mut speeds = [1.0f32; 3];
        for (slot, param) in speeds.iter_mut().zip(&numbers) {
            *slot = param.as_number().unwrap_or(1.0) as f32;
        }
        Ok(Box::new(Self::build(numbers, speeds, inner)))
    }

    /// Die drei effektiven Multiplikatoren.
    pub fn speeds(&self) -> [f32; 3] {
        self.speeds
    }

    /// Parameter ohne die Multiplikatoren, die am Ende auf 1.0 stehen.
    fn stripped_params(&self) -> &[Parameter] {
        let mut end = self.params.len();
        while end > 0 && self.params[end - 1].as_number() == Some(1.0) {
            end -= 1;
        }
        &self.params[..end]
    }
}

impl Modifier for SensitivityModifier {
    fn inner(&self) -> &dyn Action {
        self.inner.as_ref()
    }

    fn inner_mut(&mut self) -> &mut dyn Action {
        self.inner.as_mut()
    }
}

impl Action for SensitivityModifier {
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
        if multiline {
            let child = self.inner.to_source(true, pad + 2);
            if child.contains('\n') {
                let indent = " ".repeat(pad);
                let head: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                let head = if head.is_empty() {
                    String::new()
                } else {
                    format!("{},", head.join(", "))
                };
                return format!("{indent}sens({head}\n{child}\n{indent})");
            }
        }
        let mut parts: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        parts.push(self.inner.to_source(false, 0));
        format!("sens({})", parts.join(", "))
    }

    fn encode(&self) -> Record {
        let mut rv = base_encode(self.inner.as_ref(), self.name.as_deref());
        rv.insert(
            "sensitivity".to_string(),
            Value::Array(
                self.speeds
                    .iter()
                    .map(|speed| Value::from(*speed as f64))
                    .collect(),
            ),
        );
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
        // Die Multiplikatoren stecken seit der Konstruktion in der inneren
        // Action, der Wrapper selbst kann aus der Kette fallen.
        let this = *self;
        this.inner.compress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::NoAction;
    use crate::testutil::{Seen, TestMapper, TrackingAction};

    #[test]
    fn construction_pushes_speeds_exactly_once() {
        let (inner, log) = TrackingAction::new("track");
        let mut sens = SensitivityModifier::new(2.0, 0.5, 1.0, inner);
        assert_eq!(sens.speeds(), [2.0, 0.5, 1.0]);
        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[Seen::Speed(2.0, 0.5, 1.0)]
        );

        // Dispatch bleibt reine Durchreichung
        let mapper = TestMapper::new();
        assert!(sens.axis(&mapper, 77, InputSource::Stick));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn missing_multipliers_default_to_one() {
        let sens = SensitivityModifier::from_parameters(vec![
            Parameter::Float(2.0),
            Parameter::Action(Box::new(NoAction)),
        ])
        .unwrap();
        let record = sens.encode();
        assert_eq!(
            record.get("sensitivity"),
            Some(&serde_json::json!([2.0, 1.0, 1.0]))
        );
    }

    #[test]
    fn canonical_form_strips_trailing_unit_multipliers() {
        let sens = SensitivityModifier::new(2.0, 1.0, 1.0, Box::new(NoAction));
        assert_eq!(sens.to_source(false, 0), "sens(2.0, None)");

        let sens = SensitivityModifier::new(2.0, 0.5, 1.0, Box::new(NoAction));
        assert_eq!(sens.to_source(false, 0), "sens(2.0, 0.5, None)");

        let sens = SensitivityModifier::new(1.0, 1.0, 1.0, Box::new(NoAction));
        assert_eq!(sens.to_source(false, 0), "sens(None)");
    }

    #[test]
    fn requires_an_inner_action() {
        let result = SensitivityModifier::from_parameters(vec![Parameter::Float(2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn extra_multipliers_are_ignored() {
        let sens = SensitivityModifier::from_parameters(vec![
            Parameter::Float(2.0),
            Parameter::Float(3.0),
            Parameter::Float(4.0),
            Parameter::Float(5.0),
            Parameter::Action(Box::new(NoAction)),
        ])
        .unwrap();
        let record = sens.encode();
        assert_eq!(
            record.get("sensitivity"),
            Some(&serde_json::json!([2.0, 3.0, 4.0]))
        );
    }

    #[test]
    fn compress_drops_the_wrapper() {
        let sens: Box<dyn Action> =
            Box::new(SensitivityModifier::new(2.0, 1.0, 1.0, Box::new(NoAction)));
        let compressed = sens.compress();
        assert_eq!(compressed.to_source(false, 0), "None");
    }
}
