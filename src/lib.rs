//! Komponierbare Modifier-Ketten für Controller-Eingaben.
//!
//! Eine Modifier-Kette dekoriert genau eine innere Action und verändert,
//! wie Eingabe-Events (Buttons, Achsen, Trigger, Pads, Gyro) an sie
//! weitergereicht werden: `click()` reicht Achsen nur bei gedrücktem Pad
//! weiter, `mode()` wählt die Ziel-Action über gehaltene Buttons, `sens()`
//! skaliert die Empfindlichkeit der inneren Action und `feedback()` hängt
//! einen Haptik-Deskriptor an. Ketten lassen sich verlustfrei in eine
//! kompakte Textform und in einen strukturierten Record serialisieren und
//! aus beiden wieder einlesen.
//!
//! Der externe Event-Dispatcher ("Mapper") speist pro Frame genau ein
//! Event in die äußerste Action einer Kette; die Kette selbst startet
//! keine Hintergrundarbeit und blockiert nicht.

pub mod action;
pub mod codec;
pub mod haptic;
pub mod input;
pub mod modifier;
pub mod parse;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports für einfacheren Zugriff
pub use action::{Action, InvalidAction, NoAction, Parameter, Record};
pub use haptic::{HapticData, HapticPos};
pub use input::{InputSource, Mapper, PadButton};
pub use modifier::{
    ClickModifier, FeedbackModifier, ModeModifier, Modifier, ModifierError, SensitivityModifier,
};
pub use parse::{ActionConstructor, ActionParser, Registry};
