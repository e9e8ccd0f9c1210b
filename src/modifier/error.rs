//! Fehlerdefinitionen für die Konstruktion von Modifiern.

use thiserror::Error;

/// Fehler beim Aufbau eines Modifiers oder der Kommando-Registry.
#[derive(Debug, Error)]
pub enum ModifierError {
    /// Die Argumentliste passt nicht zur Form des Kommandos.
    #[error("Invalid parameters for '{command}': {reason}")]
    InvalidParameters {
        command: &'static str,
        reason: String,
    },

    /// Das Kommando braucht mehr Argumente, als angegeben wurden.
    #[error("Not enough parameters for '{command}'")]
    NotEnoughParameters { command: &'static str },

    /// Jedes Schlüsselwort darf nur einmal registriert werden.
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),
}
