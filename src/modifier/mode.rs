//! Mode-Umschaltung: gehaltene Buttons wählen aus, welche Sub-Action ein
//! Event erhält.

use crate::action::{Action, NoAction, Parameter, Record};
use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper, PadButton};
use crate::modifier::ModifierError;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Unterhalb dieser Trigger-Position gilt der Trigger als losgelassen und
/// alle gemerkten Trigger-Positionen werden verworfen.
pub const MIN_TRIGGER: i32 = 2;

/// Unterhalb dieses Betrags pro Achse gilt der Stick als zentriert und die
/// gemerkten Stick-Empfänger werden verworfen.
pub const MIN_STICK: i32 = 2;

/// Handle auf eine Sub-Action innerhalb des Modifiers. Die Halte-Mengen
/// merken sich Handles statt der Actions selbst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Selection {
    Default,
    Entry(usize),
}

/// Wählt pro Event eine Sub-Action anhand der gerade gehaltenen Buttons.
///
/// Die Designator-Liste wird in Einfügereihenfolge durchsucht, der erste
/// gehaltene Button gewinnt; ohne Treffer fällt die Auswahl auf die
/// Default-Action. Pro Event-Art hält der Modifier eigenen Zustand, damit
/// ein Moduswechsel zwischen Druck und Loslassen keine Sub-Action mit
/// einem offenen Press oder einem eingefrorenen Achsenwert zurücklässt.
#[derive(Debug)]
pub struct ModeModifier {
    entries: Vec<(PadButton, Box<dyn Action>)>,
    default: Box<dyn Action>,
    held_buttons: HashSet<Selection>,
    held_sticks: HashSet<Selection>,
    held_triggers: HashMap<Selection, i32>,
    old_gyro: Option<Selection>,
    name: Option<String>,
}

impl ModeModifier {
    pub const COMMAND: &'static str = "mode";

    pub fn new(
        entries: Vec<(PadButton, Box<dyn Action>)>,
        default: Option<Box<dyn Action>>,
    ) -> Self {
        Self {
            entries,
            default: default.unwrap_or_else(|| Box::new(NoAction)),
            held_buttons: HashSet::new(),
            held_sticks: HashSet::new(),
            held_triggers: HashMap::new(),
            old_gyro: None,
            name: None,
        }
    }

    /// Erwartet Paare aus Button-Designator und Action, optional gefolgt
    /// von genau einer Default-Action am Ende.
    pub fn from_parameters(params: Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError> {
        let mut entries = Vec::new();
        let mut default: Option<Box<dyn Action>> = None;
        let mut pending: Option<PadButton> = None;
        for param in params {
            if default.is_some() {
                return Err(ModifierError::InvalidParameters {
                    command: Self::COMMAND,
                    reason: "default action must be the last parameter".to_string(),
                });
            }
            match param {
                Parameter::Action(action) => match pending.take() {
                    Some(button) => entries.push((button, action)),
                    None => default = Some(action),
                },
                Parameter::Button(button) => {
                    if pending.is_some() {
                        return Err(ModifierError::InvalidParameters {
                            command: Self::COMMAND,
                            reason: "button designator must be followed by an action".to_string(),
                        });
                    }
                    pending = Some(button);
                }
                other => {
                    return Err(ModifierError::InvalidParameters {
                        command: Self::COMMAND,
                        reason: format!("unexpected parameter {other}"),
                    })
                }
            }
        }
        if pending.is_some() {
            return Err(ModifierError::InvalidParameters {
                command: Self::COMMAND,
                reason: "button designator without an action".to_string(),
            });
        }
        Ok(Box::new(Self::new(entries, default)))
    }

    /// Erster Designator in Einfügereihenfolge, dessen Button gehalten
    /// wird; sonst die Default-Action.
    fn select(&self, mapper: &dyn Mapper) -> Selection {
        for (index, (button, _)) in self.entries.iter().enumerate() {
            if mapper.is_pressed(*button) {
                return Selection::Entry(index);
            }
        }
        Selection::Default
    }

    fn action_mut(&mut self, selection: Selection) -> &mut dyn Action {
        match selection {
            Selection::Default => self.default.as_mut(),
            Selection::Entry(index) => self.entries[index].1.as_mut(),
        }
    }
}

impl Action for ModeModifier {
    fn button_press(&mut self, mapper: &dyn Mapper) -> bool {
        let selection = self.select(mapper);
        self.held_buttons.insert(selection);
        self.action_mut(selection).button_press(mapper)
    }

    fn button_release(&mut self, mapper: &dyn Mapper) -> bool {
        // Löst für jede gemerkte Sub-Action aus, nicht nur für die aktuelle
        // Auswahl; ein Moduswechsel zwischen Druck und Loslassen darf
        // keinen Release verschlucken.
        let held: Vec<Selection> = self.held_buttons.iter().copied().collect();
        let mut handled = false;
        for selection in held {
            handled |= self.action_mut(selection).button_release(mapper);
        }
        handled
    }

    fn trigger(&mut self, mapper: &dyn Mapper, position: i32, old_position: i32) -> bool {
        if position < MIN_TRIGGER {
            let held: Vec<(Selection, i32)> = self.held_triggers.drain().collect();
            for (selection, last) in held {
                self.action_mut(selection).trigger(mapper, 0, last);
            }
            false
        } else {
            let selection = self.select(mapper);
            self.held_triggers.insert(selection, position);
            self.action_mut(selection).trigger(mapper, position, old_position)
        }
    }

    fn axis(&mut self, mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        let selection = self.select(mapper);
        self.action_mut(selection).axis(mapper, position, what)
    }

    fn pad(&mut self, mapper: &dyn Mapper, position: i32, what: InputSource) -> bool {
        let selection = self.select(mapper);
        self.action_mut(selection).pad(mapper, position, what)
    }

    fn whole(&mut self, mapper: &dyn Mapper, x: i32, y: i32, what: InputSource) -> bool {
        if what != InputSource::Stick {
            let selection = self.select(mapper);
            return self.action_mut(selection).whole(mapper, x, y, what);
        }
        if x.abs() < MIN_STICK && y.abs() < MIN_STICK {
            let held: Vec<Selection> = self.held_sticks.drain().collect();
            let handled = !held.is_empty();
            for selection in held {
                self.action_mut(selection).whole(mapper, 0, 0, what);
            }
            handled
        } else {
            // Alle bisher gewählten Empfänger bekommen das Paar weiter, bis
            // der Stick wieder zentriert; so übergibt ein Moduswechsel die
            // Bewegung ohne Sprung.
            let selection = self.select(mapper);
            self.held_sticks.insert(selection);
            let held: Vec<Selection> = self.held_sticks.iter().copied().collect();
            for selection in held {
                self.action_mut(selection).whole(mapper, x, y, what);
            }
            true
        }
    }

    fn gyro(&mut self, mapper: &dyn Mapper, pitch: i32, yaw: i32, roll: i32) -> bool {
        let selection = self.select(mapper);
        if self.old_gyro != Some(selection) {
            if let Some(previous) = self.old_gyro.take() {
                debug!("mode: gyro selection changed, cancelling previous receiver");
                self.action_mut(previous).gyro(mapper, 0, 0, 0);
            }
            self.old_gyro = Some(selection);
        }
        self.action_mut(selection).gyro(mapper, pitch, yaw, roll)
    }

    fn set_haptic(&mut self, haptic: HapticData) -> bool {
        let mut supports = self.default.set_haptic(haptic);
        for (_, action) in &mut self.entries {
            supports |= action.set_haptic(haptic);
        }
        supports
    }

    fn set_speed(&mut self, x: f32, y: f32, z: f32) -> bool {
        let mut supports = self.default.set_speed(x, y, z);
        for (_, action) in &mut self.entries {
            supports |= action.set_speed(x, y, z);
        }
        supports
    }

    fn to_source(&self, multiline: bool, pad: usize) -> String {
        if multiline {
            let indent = " ".repeat(pad);
            let mut rv = vec![format!("{indent}mode(")];
            for (button, action) in &self.entries {
                let mut lines: Vec<String> = action
                    .to_source(true, 0)
                    .split('\n')
                    .map(str::to_string)
                    .collect();
                lines[0] = format!("{indent}  {:<11}{}", format!("{button},"), lines[0]);
                for line in lines.iter_mut().skip(1) {
                    *line = format!("{indent}  {line}");
                }
                if let Some(last) = lines.last_mut() {
                    last.push(',');
                }
                rv.extend(lines);
            }
            for line in self.default.to_source(true, 0).split('\n') {
                rv.push(format!("{indent}  {line}"));
            }
            if let Some(last) = rv.last_mut() {
                if last.ends_with(',') {
                    last.pop();
                }
            }
            rv.push(format!("{indent})"));
            rv.join("\n")
        } else {
            let mut parts = Vec::new();
            for (button, action) in &self.entries {
                parts.push(button.to_string());
                parts.push(action.to_source(false, 0));
            }
            parts.push(self.default.to_source(false, 0));
            format!("mode({})", parts.join(", "))
        }
    }

    fn encode(&self) -> Record {
        let mut rv = self.default.encode();
        let mut modes = Record::new();
        for (button, action) in &self.entries {
            modes.insert(button.to_string(), Value::Object(action.encode()));
        }
        rv.insert("modes".to_string(), Value::Object(modes));
        if let Some(name) = &self.name {
            rv.insert("name".to_string(), Value::String(name.clone()));
        }
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
        if !this.default.is_nothing() {
            return this.default.strip();
        }
        if let Some((_, first)) = this.entries.into_iter().next() {
            return first.strip();
        }
        Box::new(NoAction)
    }

    fn compress(mut self: Box<Self>) -> Box<dyn Action> {
        let default = std::mem::replace(&mut self.default, Box::new(NoAction));
        self.default = default.compress();
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .map(|(button, action)| (button, action.compress()))
            .collect();
        self
    }
}
