//! Modifier für Controller-Actions.
//!
//! Ein Modifier sitzt zwischen Eingang und eigentlicher Action und ändert,
//! wie die dekorierte Action wirkt. `click()` reicht Achsen-Events nur bei
//! gedrücktem Pad weiter, `mode()` wählt die Ziel-Action über gehaltene
//! Buttons, `sens()` skaliert die Empfindlichkeit und `feedback()` hängt
//! einen Haptik-Deskriptor an. Die innere Action weiß nichts davon, dass
//! sie dekoriert ist.

pub mod click;
pub mod error;
pub mod feedback;
pub mod mode;
pub mod sensitivity;

// Re-exports für einfacheren Zugriff
pub use click::ClickModifier;
pub use error::ModifierError;
pub use feedback::FeedbackModifier;
pub use mode::ModeModifier;
pub use sensitivity::SensitivityModifier;

use crate::action::{Action, Record};
use serde_json::Value;

/// Gemeinsamer Vertrag aller Modifier: genau eine innere Action dekorieren
/// und sie für Werkzeuge erreichbar halten.
pub trait Modifier: Action {
    fn inner(&self) -> &dyn Action;
    fn inner_mut(&mut self) -> &mut dyn Action;
}

/// Record der inneren Action plus Anzeigename, die Basis für den flachen
/// Feld-Merge der Modifier.
pub(crate) fn base_encode(inner: &dyn Action, name: Option<&str>) -> Record {
    let mut rv = inner.encode();
    if let Some(name) = name {
        rv.insert("name".to_string(), Value::String(name.to_string()));
    }
    rv
}
