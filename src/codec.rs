//! Structured-record decoding for persisted profiles.
//!
//! Records are flat: every modifier merges its key into the wrapped
//! action's record, only `modes` nests. Decoding rebuilds the chain in a
//! fixed wrap order (leaf text, then `sensitivity`, `feedback`, `click`,
//! `name`, `modes` outermost), so a record produced by any chain decodes
//! into a chain that re-encodes to the identical record.

use crate::action::{Action, InvalidAction, NoAction, Parameter, Record};
use crate::haptic::HapticPos;
use crate::input::PadButton;
use crate::modifier::{
    ClickModifier, FeedbackModifier, ModeModifier, ModifierError, SensitivityModifier,
};
use crate::parse::ActionParser;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Rebuilds an action chain from its structured record. Never fails:
/// malformed records yield an [`InvalidAction`] carrying the problem.
pub fn decode_record(parser: &ActionParser, record: &Record) -> Box<dyn Action> {
    let mut action: Box<dyn Action> = match record.get("action") {
        Some(Value::String(text)) => parser.parse(text),
        Some(other) => return invalid(record, format!("'action' must be a string, got {other}")),
        None => Box::new(NoAction),
    };

    if let Some(value) = record.get("sensitivity") {
        action = match sensitivity_params(value) {
            Ok(mut params) => {
                params.push(Parameter::Action(action));
                or_invalid(SensitivityModifier::from_parameters(params), record)
            }
            Err(reason) => invalid(record, reason),
        };
    }

    if let Some(value) = record.get("feedback") {
        action = match feedback_params(value) {
            Ok(mut params) => {
                params.push(Parameter::Action(action));
                or_invalid(FeedbackModifier::from_parameters(params), record)
            }
            Err(reason) => invalid(record, reason),
        };
    }

    if record.get("click").and_then(Value::as_bool).unwrap_or(false) {
        action = Box::new(ClickModifier::new(action));
    }

    if let Some(Value::String(name)) = record.get("name") {
        action.set_name(Some(name.clone()));
    }

    if let Some(value) = record.get("modes") {
        action = match value.as_object() {
            Some(modes) => {
                let mut params = Vec::new();
                for (key, sub) in modes {
                    let Ok(button) = PadButton::from_str(key) else {
                        warn!("skipping mode entry for unknown button '{key}'");
                        continue;
                    };
                    let Some(sub) = sub.as_object() else {
                        warn!("skipping mode entry '{key}': not a record");
                        continue;
                    };
                    params.push(Parameter::Button(button));
                    params.push(Parameter::Action(decode_record(parser, sub)));
                }
                params.push(Parameter::Action(action));
                or_invalid(ModeModifier::from_parameters(params), record)
            }
            None => invalid(record, "'modes' must be a record".to_string()),
        };
    }

    action
}

fn invalid(record: &Record, reason: String) -> Box<dyn Action> {
    warn!("failed to decode record: {reason}");
    let source = serde_json::to_string(record).unwrap_or_default();
    Box::new(InvalidAction::new(source, reason))
}

fn or_invalid(
    result: Result<Box<dyn Action>, ModifierError>,
    record: &Record,
) -> Box<dyn Action> {
    match result {
        Ok(action) => action,
        Err(err) => invalid(record, err.to_string()),
    }
}

fn sensitivity_params(value: &Value) -> Result<Vec<Parameter>, String> {
    let Some(values) = value.as_array() else {
        return Err("'sensitivity' must be a list".to_string());
    };
    values.iter().map(number_param).collect()
}

fn feedback_params(value: &Value) -> Result<Vec<Parameter>, String> {
    let Some(values) = value.as_array() else {
        return Err("'feedback' must be a list".to_string());
    };
    let mut params = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if index == 0 {
            let Some(side) = value.as_str() else {
                return Err("feedback side must be a string".to_string());
            };
            let side = HapticPos::from_str(side).map_err(|err| err.to_string())?;
            params.push(Parameter::Side(side));
        } else {
            params.push(number_param(value)?);
        }
    }
    Ok(params)
}

fn number_param(value: &Value) -> Result<Parameter, String> {
    if let Some(int) = value.as_i64() {
        return Ok(Parameter::Int(int));
    }
    if let Some(float) = value.as_f64() {
        return Ok(Parameter::Float(float));
    }
    Err(format!("expected a number, got {value}"))
}
