//! End-to-end checks through the public API: a host-provided leaf action,
//! registry extension, and text/record round trips.

use modkette::{
    codec, Action, ActionParser, HapticData, InputSource, Mapper, ModifierError, PadButton,
    Parameter, Record, Registry,
};

#[derive(Debug, Default)]
struct ProbeAction {
    name: Option<String>,
}

impl Action for ProbeAction {
    fn axis(&mut self, _mapper: &dyn Mapper, _position: i32, _what: InputSource) -> bool {
        true
    }

    fn whole(&mut self, _mapper: &dyn Mapper, _x: i32, _y: i32, _what: InputSource) -> bool {
        true
    }

    fn button_press(&mut self, _mapper: &dyn Mapper) -> bool {
        true
    }

    fn button_release(&mut self, _mapper: &dyn Mapper) -> bool {
        true
    }

    fn set_haptic(&mut self, _haptic: HapticData) -> bool {
        true
    }

    fn set_speed(&mut self, _x: f32, _y: f32, _z: f32) -> bool {
        true
    }

    fn to_source(&self, _multiline: bool, pad: usize) -> String {
        format!("{}probe()", " ".repeat(pad))
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    fn strip(self: Box<Self>) -> Box<dyn Action> {
        self
    }

    fn compress(self: Box<Self>) -> Box<dyn Action> {
        self
    }
}

fn probe(_params: Vec<Parameter>) -> Result<Box<dyn Action>, ModifierError> {
    Ok(Box::new(ProbeAction::default()))
}

fn parser_with_probe() -> ActionParser {
    let mut registry = Registry::builtin();
    registry.register("probe", probe).expect("keyword is free");
    ActionParser::with_registry(registry)
}

struct StaticMapper(bool);

impl Mapper for StaticMapper {
    fn is_pressed(&self, _button: PadButton) -> bool {
        self.0
    }

    fn was_pressed(&self, _button: PadButton) -> bool {
        false
    }
}

#[test]
fn text_round_trip_through_a_full_chain() {
    let parser = parser_with_probe();
    let text =
        "mode(A, click( probe() ), LB, sens(2.0, probe()), feedback(BOTH, 256, probe()))";
    let action = parser.parse(text);
    assert!(action.error().is_none());
    assert_eq!(action.to_source(false, 0), text);
}

#[test]
fn record_round_trip_through_a_full_chain() {
    let parser = parser_with_probe();
    let action = parser.parse("mode(A, sens(2.0, probe()), click( probe() ))");
    assert!(action.error().is_none());

    let record: Record = action.encode();
    let decoded = codec::decode_record(&parser, &record);
    assert_eq!(decoded.encode(), record);
}

#[test]
fn dispatch_reaches_an_external_leaf_through_the_chain() {
    let parser = parser_with_probe();
    let mut action = parser.parse("click( probe() )");

    assert!(!action.axis(&StaticMapper(false), 100, InputSource::LeftPad));
    assert!(action.axis(&StaticMapper(true), 100, InputSource::LeftPad));
}

#[test]
fn capability_queries_reach_an_external_leaf() {
    let parser = parser_with_probe();
    let mut action = parser.parse("feedback(LEFT, probe())");
    assert!(action.set_speed(1.5, 1.5, 1.0));

    let mut bare = parser.parse("click( None )");
    assert!(!bare.set_speed(1.5, 1.5, 1.0));
}

#[test]
fn invalid_expressions_fail_closed_but_keep_their_text() {
    let parser = ActionParser::new();
    let mut action = parser.parse("warp(9)");
    assert!(action.error().is_some());
    assert_eq!(action.to_source(false, 0), "warp(9)");
    assert!(!action.button_press(&StaticMapper(true)));
}
