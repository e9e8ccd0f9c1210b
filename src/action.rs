//! Action-Schnittstelle und Basis-Actions für Modifier-Ketten.
//!
//! Eine Action ist die polymorphe Einheit des Controller-Verhaltens. Der
//! Mapper ruft pro Event genau eine der Dispatch-Methoden der äußersten
//! Action auf; Modifier reichen das Event (gefiltert, skaliert oder
//! umgeleitet) an ihre innere Action weiter, bis eine Blatt-Action es
//! verarbeitet. Jede Dispatch-Methode meldet zurück, ob das Event
//! verarbeitet wurde.

use crate::haptic::HapticData;
use crate::input::{InputSource, Mapper};
use serde_json::Value;
use std::fmt;

/// Strukturierter Record einer Action. Modifier mischen ihre Felder flach
/// in den Record der inneren Action, nur `modes` schachtelt.
pub type Record = serde_json::Map<String, Value>;

/// Verhalten, das der Mapper über eine Kette aus Modifiern und einer
/// Blatt-Action ansprechen kann.
pub trait Action: fmt::Debug + Send {
    /// Der zugehörige Button wurde in diesem Frame gedrückt.
    fn button_press(&mut self, _mapper: &dyn Mapper) -> bool {
        false
    }

    /// Der zugehörige Button wurde in diesem Frame losgelassen.
    fn button_release(&mut self, _mapper: &dyn Mapper) -> bool {
        false
    }

    /// Neue Trigger-Position auf dem nativen Wertebereich des Triggers.
    fn trigger(&mut self, _mapper: &dyn Mapper, _position: i32, _old_position: i32) -> bool {
        false
    }

    /// Einzelner Achsenwert einer Quelle.
    fn axis(&mut self, _mapper: &dyn Mapper, _position: i32, _what: InputSource) -> bool {
        false
    }

    /// Einzelner Pad-Wert einer Quelle.
    fn pad(&mut self, _mapper: &dyn Mapper, _position: i32, _what: InputSource) -> bool {
        false
    }

    /// Achsenpaar einer Quelle als zusammengehöriges Event.
    fn whole(&mut self, _mapper: &dyn Mapper, _x: i32, _y: i32, _what: InputSource) -> bool {
        false
    }

    /// Gyroskop-Messung.
    fn gyro(&mut self, _mapper: &dyn Mapper, _pitch: i32, _yaw: i32, _roll: i32) -> bool {
        false
    }

    /// Setzt den Haptik-Deskriptor. Liefert `true`, wenn irgendeine Action
    /// in der Kette haptisches Feedback unterstützt.
    fn set_haptic(&mut self, _haptic: HapticData) -> bool {
        false
    }

    /// Setzt die Empfindlichkeit pro Achse. Liefert `true`, wenn irgendeine
    /// Action in der Kette Empfindlichkeit unterstützt.
    fn set_speed(&mut self, _x: f32, _y: f32, _z: f32) -> bool {
        false
    }

    /// Textform der Action. `multiline` erzeugt die eingerückte Anzeigeform
    /// (zwei Leerzeichen pro Ebene ab `pad`), sonst die kanonische Zeile.
    fn to_source(&self, multiline: bool, pad: usize) -> String;

    /// Strukturierter Record für die Persistenz.
    fn encode(&self) -> Record {
        let mut rv = Record::new();
        rv.insert("action".to_string(), Value::String(self.to_source(false, 0)));
        if let Some(name) = self.name() {
            rv.insert("name".to_string(), Value::String(name.to_string()));
        }
        rv
    }

    /// Vom Benutzer vergebener Anzeigename.
    fn name(&self) -> Option<&str> {
        None
    }

    fn set_name(&mut self, _name: Option<String>) {}

    /// Beschreibung des Fehlers, falls diese Action beim Dekodieren aus
    /// fehlerhafter Eingabe entstanden ist.
    fn error(&self) -> Option<&str> {
        None
    }

    /// `true` nur für die leere Action.
    fn is_nothing(&self) -> bool {
        false
    }

    /// Entfernt alle Dekorationen und liefert die innerste Action.
    fn strip(self: Box<Self>) -> Box<dyn Action>;

    /// Faltet Modifier zusammen, deren Wirkung bereits bei der Konstruktion
    /// in die innere Action übertragen wurde.
    fn compress(self: Box<Self>) -> Box<dyn Action>;
}

/// Ein Konstruktor-Argument, wie es der Parser aus der Textform gewinnt.
///
/// Ganzzahlen und Gleitkommazahlen bleiben unterschieden, damit die
/// kanonische Textform die ursprüngliche Zahlenschreibweise reproduziert.
#[derive(Debug)]
pub enum Parameter {
    Int(i64),
    Float(f64),
    Side(crate::haptic::HapticPos),
    Button(crate::input::PadButton),
    Action(Box<dyn Action>),
}

impl Parameter {
    /// Numerischer Wert, falls der Parameter eine Zahl ist.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Parameter::Int(value) => Some(*value as f64),
            Parameter::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Int(value) => write!(f, "{value}"),
            Parameter::Float(value) => f.write_str(&format_float(*value)),
            Parameter::Side(side) => write!(f, "{side}"),
            Parameter::Button(button) => write!(f, "{button}"),
            Parameter::Action(action) => f.write_str(&action.to_source(false, 0)),
        }
    }
}

/// Formatiert eine Gleitkommazahl so, dass ganzzahlige Werte den
/// Dezimalpunkt behalten ("2.0" statt "2").
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Die leere Action: verarbeitet nichts und steht überall dort, wo keine
/// Action konfiguriert ist.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAction;

impl Action for NoAction {
    fn to_source(&self, _multiline: bool, pad: usize) -> String {
        format!("{}None", " ".repeat(pad))
    }

    fn is_nothing(&self) -> bool {
        true
    }

    fn strip(self: Box<Self>) -> Box<dyn Action> {
        self
    }

    fn compress(self: Box<Self>) -> Box<dyn Action> {
        self
    }
}

/// Platzhalter für eine Action, die nicht dekodiert werden konnte.
///
/// Trägt den ursprünglichen Text und eine lesbare Fehlerbeschreibung.
/// Dispatch-Aufrufe verarbeiten nichts, die Serialisierung liefert den
/// ursprünglichen Text zurück, damit ein fehlerhaftes Profil beim Speichern
/// nicht stillschweigend verschwindet. Modifier umhüllen diesen Platzhalter
/// wie jede andere Action.
#[derive(Debug)]
pub struct InvalidAction {
    source: String,
    error: String,
    name: Option<String>,
}

impl InvalidAction {
    pub fn new(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: error.into(),
            name: None,
        }
    }
}

impl Action for InvalidAction {
    fn to_source(&self, _multiline: bool, pad: usize) -> String {
        format!("{}{}", " ".repeat(pad), self.source)
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    fn error(&self) -> Option<&str> {
        Some(&self.error)
    }

    fn strip(self: Box<Self>) -> Box<dyn Action> {
        self
    }

    fn compress(self: Box<Self>) -> Box<dyn Action> {
        self
    }
}
