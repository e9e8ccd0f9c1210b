//! Textgrammatik und Kommando-Registry für Action-Ausdrücke.
//!
//! Die Registry bildet jedes Kommando-Schlüsselwort auf einen Konstruktor
//! ab; der Parser zerlegt die Textform und baut daraus eine Action-Kette.
//! Fehlerhafte Eingaben erreichen den Aufrufer nie als Fehler, sondern als
//! [`InvalidAction`], die die Kette nach außen dicht hält und beim
//! Speichern den ursprünglichen Text reproduziert.

use crate::action::{Action, InvalidAction, NoAction, Parameter};
use crate::haptic::HapticPos;
use crate::input::PadButton;
use crate::modifier::{
    ClickModifier, FeedbackModifier, ModeModifier, ModifierError, SensitivityModifier,
};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Konstruktor-Signatur, die die Registry einem Schlüsselwort zuordnet.
pub type ActionConstructor = fn(Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError>;

#[derive(Debug, Error)]
enum ParseError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("expected an action")]
    ExpectedAction,
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

/// Abbildung von Kommando-Schlüsselwörtern auf Konstruktoren.
///
/// Die vier Modifier-Kommandos sind fest eingebaut; Blatt-Actions des
/// Hosts kommen über [`Registry::register`] dazu. Jedes Schlüsselwort
/// existiert genau einmal.
pub struct Registry {
    commands: HashMap<String, ActionConstructor>,
}

impl Registry {
    /// Registry mit den eingebauten Modifier-Kommandos.
    pub fn builtin() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };
        for (keyword, constructor) in [
            (
                ClickModifier::COMMAND,
                ClickModifier::from_parameters as ActionConstructor,
            ),
            (ModeModifier::COMMAND, ModeModifier::from_parameters),
            (
                SensitivityModifier::COMMAND,
                SensitivityModifier::from_parameters,
            ),
            (FeedbackModifier::COMMAND, FeedbackModifier::from_parameters),
        ] {
            registry.commands.insert(keyword.to_string(), constructor);
        }
        registry
    }

    /// Registriert ein zusätzliches Kommando, etwa eine Blatt-Action des
    /// Hosts.
    pub fn register(
        &mut self,
        keyword: &str,
        constructor: ActionConstructor,
    ) -> Result<(), ModifierError> {
        if self.commands.contains_key(keyword) {
            return Err(ModifierError::DuplicateCommand(keyword.to_string()));
        }
        self.commands.insert(keyword.to_string(), constructor);
        Ok(())
    }

    pub fn get(&self, keyword: &str) -> Option<ActionConstructor> {
        self.commands.get(keyword).copied()
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    start: usize,
    end: usize,
}

fn describe_token(token: &Token) -> String {
    match token {
        Token::Ident(ident) => ident.clone(),
        Token::Int(value) => value.to_string(),
        Token::Float(value) => value.to_string(),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Comma => ",".to_string(),
    }
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '(' | ')' | ',' => {
                let token = match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    _ => Token::Comma,
                };
                tokens.push(Spanned {
                    token,
                    start: i,
                    end: i + 1,
                });
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Ident(text[start..i].to_string()),
                    start,
                    end: i,
                });
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = i;
                i += 1;
                let mut seen_dot = false;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_digit() || (bytes[i] == b'.' && !seen_dot))
                {
                    if bytes[i] == b'.' {
                        seen_dot = true;
                    }
                    i += 1;
                }
                let slice = &text[start..i];
                let token = if seen_dot {
                    Token::Float(
                        slice
                            .parse()
                            .map_err(|_| ParseError::InvalidNumber(slice.to_string()))?,
                    )
                } else {
                    Token::Int(
                        slice
                            .parse()
                            .map_err(|_| ParseError::InvalidNumber(slice.to_string()))?,
                    )
                };
                tokens.push(Spanned {
                    token,
                    start,
                    end: i,
                });
            }
            other => return Err(ParseError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

struct TokenStream<'a> {
    text: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> TokenStream<'a> {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    /// Überspringt bis zur schließenden Klammer des aktuellen Aufrufs und
    /// liefert deren Endposition. Die öffnende Klammer ist bereits
    /// konsumiert.
    fn skip_call(&mut self) -> Result<usize, ParseError> {
        let mut depth = 1usize;
        while let Some(spanned) = self.next() {
            match spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(spanned.end);
                    }
                }
                _ => {}
            }
        }
        Err(ParseError::UnexpectedEnd)
    }
}

/// Dekodiert Actions aus ihrer Textform.
pub struct ActionParser {
    registry: Registry,
}

impl ActionParser {
    pub fn new() -> Self {
        Self {
            registry: Registry::builtin(),
        }
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Dekodiert eine Action. Schlägt nie fehl: jede fehlerhafte Eingabe
    /// liefert eine [`InvalidAction`] mit Fehlerbeschreibung.
    pub fn parse(&self, text: &str) -> Box<dyn Action> {
        match self.try_parse(text) {
            Ok(action) => action,
            Err(err) => {
                warn!("failed to parse action '{}': {}", text.trim(), err);
                Box::new(InvalidAction::new(text.trim(), err.to_string()))
            }
        }
    }

    fn try_parse(&self, text: &str) -> Result<Box<dyn Action>, ParseError> {
        let tokens = tokenize(text)?;
        let mut stream = TokenStream {
            text,
            tokens,
            pos: 0,
        };
        let action = self.parse_action(&mut stream)?;
        match stream.peek() {
            None => Ok(action),
            Some(trailing) => Err(ParseError::UnexpectedToken(describe_token(&trailing.token))),
        }
    }

    fn parse_action(&self, stream: &mut TokenStream<'_>) -> Result<Box<dyn Action>, ParseError> {
        match self.parse_parameter(stream)? {
            Parameter::Action(action) => Ok(action),
            _ => Err(ParseError::ExpectedAction),
        }
    }

    fn parse_parameter(&self, stream: &mut TokenStream<'_>) -> Result<Parameter, ParseError> {
        let spanned = stream.next().ok_or(ParseError::UnexpectedEnd)?;
        match spanned.token {
            Token::Int(value) => Ok(Parameter::Int(value)),
            Token::Float(value) => Ok(Parameter::Float(value)),
            Token::Ident(ident) => {
                if matches!(stream.peek().map(|s| &s.token), Some(Token::LParen)) {
                    return self.parse_call(stream, &ident, spanned.start);
                }
                if ident == "None" {
                    return Ok(Parameter::Action(Box::new(NoAction)));
                }
                if let Ok(side) = HapticPos::from_str(&ident) {
                    return Ok(Parameter::Side(side));
                }
                if let Ok(button) = PadButton::from_str(&ident) {
                    return Ok(Parameter::Button(button));
                }
                Err(ParseError::UnknownIdentifier(ident))
            }
            other => Err(ParseError::UnexpectedToken(describe_token(&other))),
        }
    }

    fn parse_call(
        &self,
        stream: &mut TokenStream<'_>,
        keyword: &str,
        start: usize,
    ) -> Result<Parameter, ParseError> {
        stream.next();
        let Some(constructor) = self.registry.get(keyword) else {
            let end = stream.skip_call()?;
            let source = stream.text[start..end].trim().to_string();
            warn!("unknown action '{keyword}'");
            return Ok(Parameter::Action(Box::new(InvalidAction::new(
                source,
                format!("Unknown action '{keyword}'"),
            ))));
        };
        let mut params = Vec::new();
        if !matches!(stream.peek().map(|s| &s.token), Some(Token::RParen)) {
            loop {
                params.push(self.parse_parameter(stream)?);
                match stream.peek().map(|s| s.token.clone()) {
                    Some(Token::Comma) => {
                        stream.next();
                    }
                    Some(Token::RParen) => break,
                    Some(other) => {
                        return Err(ParseError::UnexpectedToken(describe_token(&other)))
                    }
                    None => return Err(ParseError::UnexpectedEnd),
                }
            }
        }
        let end = stream
            .next()
            .map(|s| s.end)
            .ok_or(ParseError::UnexpectedEnd)?;
        match constructor(params) {
            Ok(action) => {
                debug!("parsed '{keyword}' action");
                Ok(Parameter::Action(action))
            }
            Err(err) => {
                let source = stream.text[start..end].trim().to_string();
                warn!("failed to construct '{keyword}': {err}");
                Ok(Parameter::Action(Box::new(InvalidAction::new(
                    source,
                    err.to_string(),
                ))))
            }
        }
    }
}

impl Default for ActionParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestMapper;
    use serde_json::json;

    #[test]
    fn registry_holds_each_builtin_exactly_once() {
        let registry = Registry::builtin();
        let mut commands: Vec<&str> = registry.commands().collect();
        commands.sort_unstable();
        assert_eq!(commands, ["click", "feedback", "mode", "sens"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::builtin();
        assert!(registry
            .register("click", ClickModifier::from_parameters)
            .is_err());
        assert!(registry
            .register("noop", |_| Ok(Box::new(NoAction)))
            .is_ok());
    }

    #[test]
    fn parses_every_grammar_production() {
        let parser = ActionParser::new();
        for text in [
            "None",
            "click( None )",
            "sens(2.0, None)",
            "feedback(LEFT, 512, 10, 100, None)",
            "mode(A, None, B, None, None)",
        ] {
            let action = parser.parse(text);
            assert!(action.error().is_none(), "rejected '{text}'");
            assert_eq!(action.to_source(false, 0), text);
        }
    }

    #[test]
    fn whitespace_and_newlines_are_insignificant() {
        let parser = ActionParser::new();
        let action = parser.parse("click(\n  sens(2.0,\n    None\n  )\n)");
        assert!(action.error().is_none());
        assert_eq!(action.to_source(false, 0), "click( sens(2.0, None) )");
    }

    #[test]
    fn sens_round_trip_restores_all_three_multipliers() {
        let parser = ActionParser::new();
        let action = parser.parse("sens(2.0, None)");
        assert_eq!(
            action.encode().get("sensitivity"),
            Some(&json!([2.0, 1.0, 1.0]))
        );
        assert_eq!(action.to_source(false, 0), "sens(2.0, None)");
    }

    #[test]
    fn unknown_command_fails_closed() {
        let parser = ActionParser::new();
        let mut action = parser.parse("bogus(1, 2)");
        assert!(action.error().is_some());
        assert_eq!(action.to_source(false, 0), "bogus(1, 2)");

        let mapper = TestMapper::new();
        assert!(!action.button_press(&mapper));
        assert!(!action.whole(&mapper, 5, 5, crate::input::InputSource::Stick));
    }

    #[test]
    fn invalid_inner_action_is_wrapped_transparently() {
        let parser = ActionParser::new();
        let action = parser.parse("click( bogus(1) )");
        assert!(action.error().is_none());
        assert_eq!(action.to_source(false, 0), "click( bogus(1) )");
        assert_eq!(action.encode().get("click"), Some(&json!(true)));
    }

    #[test]
    fn construction_errors_become_invalid_actions() {
        let parser = ActionParser::new();
        for text in [
            "mode(A, B, None)",
            "mode(None, A, None)",
            "feedback(2.0, None)",
            "sens(2.0)",
        ] {
            let action = parser.parse(text);
            assert!(action.error().is_some(), "accepted '{text}'");
            assert_eq!(action.to_source(false, 0), text);
        }
    }

    #[test]
    fn malformed_text_becomes_an_invalid_action() {
        let parser = ActionParser::new();
        for text in ["", "None None", "click(", "mode(FROB, None, None)", "42"] {
            let action = parser.parse(text);
            assert!(action.error().is_some(), "accepted '{text}'");
        }
    }

    #[test]
    fn multiline_form_parses_back_to_the_same_chain() {
        let parser = ActionParser::new();
        let canonical = "mode(A, click( None ), sens(2.0, None))";
        let action = parser.parse(canonical);
        let pretty = action.to_source(true, 0);
        let reparsed = parser.parse(&pretty);
        assert!(reparsed.error().is_none(), "rejected '{pretty}'");
        assert_eq!(reparsed.to_source(false, 0), canonical);
    }
}
