//! End-to-end tests: descriptions loaded from text and driven by events.

use fsm_table::builder::{build_table, BuildError, DescriptionBuilder};
use fsm_table::core::{ActionError, ActionMap, Continuation};
use fsm_table::dsl::{parse, ParseError, Parser, Reader, SymbolTable};
use fsm_table::engine::Machine;
use fsm_table::{action_map, Error};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct LightBulb {
    is_on: bool,
    error: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("oh no")]
struct OhNo;

fn symbols() -> SymbolTable<LightBulb> {
    SymbolTable::new()
        .context("tests.LightBulb", |_args| Ok(LightBulb::default()))
        .unwrap()
        .handler("tests.turn_on", |bulb, _args| {
            bulb.is_on = true;
            Ok(Continuation::Stop)
        })
        .unwrap()
        .handler("tests.turn_off", |bulb, _args| {
            bulb.is_on = false;
            Ok(Continuation::Stop)
        })
        .unwrap()
        .handler("tests.turn_off_exception", |_bulb, _args| Err(OhNo.into()))
        .unwrap()
        .handler("tests.set_error", |bulb, _args| {
            bulb.error = true;
            Ok(Continuation::Stop)
        })
        .unwrap()
        .exception("tests.on_exception", |bulb, _err| {
            bulb.error = true;
            Continuation::Stop
        })
        .unwrap()
        .exception("tests.on_exception_error", |_bulb, _err| {
            Continuation::next("error")
        })
        .unwrap()
}

fn load(lines: &[&str]) -> Machine<LightBulb> {
    Parser::new(symbols()).load(lines, &[]).unwrap()
}

fn parse_err(lines: &[&str]) -> ParseError {
    parse::<()>(lines).unwrap_err()
}

#[test]
fn toggle() {
    let mut fsm = load(&[
        "STATE off",
        "  EVENT press on",
        "    ACTION turn_on",
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off",
        "CONTEXT tests.LightBulb",
        "HANDLER turn_on tests.turn_on",
        "HANDLER turn_off tests.turn_off",
    ]);

    assert!(!fsm.context().is_on);
    fsm.handle("press", &[]).unwrap();
    assert!(fsm.context().is_on);
    fsm.handle("press", &[]).unwrap();
    assert!(!fsm.context().is_on);
    assert_eq!(fsm.state(), "off");
}

#[test]
fn exception_hook_stops_dispatch() {
    let mut fsm = load(&[
        "STATE off",
        "  EVENT press on",
        "    ACTION turn_on",
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off_exception",
        "CONTEXT tests.LightBulb",
        "HANDLER turn_on tests.turn_on",
        "HANDLER turn_off_exception tests.turn_off_exception",
        "EXCEPTION tests.on_exception",
    ]);

    fsm.handle("press", &[]).unwrap();
    assert!(fsm.context().is_on);
    assert!(!fsm.context().error);

    assert!(fsm.handle("press", &[]).unwrap());
    assert!(fsm.context().is_on);
    assert!(fsm.context().error);
    assert_eq!(fsm.state(), "on");
}

#[test]
fn exception_continuation_is_served_by_default() {
    let mut fsm = load(&[
        "STATE off",
        "  EVENT press on",
        "    ACTION turn_on",
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off_exception",
        "DEFAULT error",
        "    ACTION set_error",
        "CONTEXT tests.LightBulb",
        "HANDLER turn_on tests.turn_on",
        "HANDLER turn_off_exception tests.turn_off_exception",
        "HANDLER set_error tests.set_error",
        "EXCEPTION tests.on_exception_error",
    ]);

    fsm.handle("press", &[]).unwrap();
    assert!(!fsm.context().error);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    fsm.set_trace_hook(move |d| {
        sink.lock()
            .unwrap()
            .push((d.event.to_string(), d.is_default, d.is_internal));
    });
    fsm.handle("press", &[]).unwrap();

    assert!(fsm.context().is_on);
    assert!(fsm.context().error);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("press".to_string(), false, false),
            ("error".to_string(), true, true),
        ]
    );
}

#[test]
fn exception_to_error_state() {
    let mut fsm = load(&[
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off_exception",
        "STATE off",
        "STATE error",
        "DEFAULT error error",
        "HANDLER turn_off_exception tests.turn_off_exception",
        "EXCEPTION tests.on_exception_error",
    ]);

    assert!(fsm.handle("press", &[]).unwrap());
    assert_eq!(fsm.state(), "error");
}

#[test]
fn error_propagates_without_hook() {
    let mut fsm = load(&[
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off_exception",
        "STATE off",
        "HANDLER turn_off_exception tests.turn_off_exception",
    ]);

    let err: ActionError = fsm.handle("press", &[]).unwrap_err();
    assert!(err.downcast_ref::<OhNo>().is_some());
    assert_eq!(fsm.state(), "on");
}

#[test]
fn undefined_event_leaves_state() {
    let mut fsm = load(&["STATE off", "  EVENT press on", "STATE on"]);
    let missed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&missed);
    fsm.set_undefined_hook(move |d| sink.lock().unwrap().push(d.event.to_string()));

    assert!(!fsm.handle("kick", &[]).unwrap());
    assert_eq!(fsm.state(), "off");
    assert_eq!(*missed.lock().unwrap(), vec!["kick"]);
}

#[test]
fn press_twice_returns_to_off() {
    let parsed = parse::<()>(["STATE off", "EVENT press on", "STATE on", "EVENT press off"]).unwrap();
    assert_eq!(parsed.first_state(), Some("off"));

    let mut fsm = parsed.build(&ActionMap::new(), ()).unwrap();
    fsm.handle("press", &[]).unwrap();
    assert_eq!(fsm.state(), "on");
    fsm.handle("press", &[]).unwrap();
    assert_eq!(fsm.state(), "off");
}

#[test]
fn arguments_reach_only_the_first_action() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (Arc::clone(&seen), Arc::clone(&seen));
    let actions: ActionMap<()> = action_map! {
        "first" => move |_: &mut (), args: &[Value]| {
            a.lock().unwrap().push(args.len());
            Ok(Continuation::next("again"))
        },
        "second" => move |_: &mut (), args: &[Value]| {
            b.lock().unwrap().push(args.len());
            Ok(Continuation::Stop)
        },
    };
    let parsed = parse::<()>([
        "STATE idle",
        "  EVENT go busy",
        "    ACTION first",
        "STATE busy",
        "  EVENT again",
        "    ACTION second",
    ])
    .unwrap();

    let mut fsm = parsed.build(&actions, ()).unwrap();
    fsm.handle("go", &[Value::from(1), Value::from(2)]).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![2, 0]);
}

#[test]
fn missing_binding_fails_build() {
    let parsed = parse::<()>(["STATE a", "ENTER wake", "EVENT go", "ACTION run"]).unwrap();
    let only_wake: ActionMap<()> = action_map! {
        "wake" => |_: &mut (), _: &[Value]| Ok(Continuation::Stop),
    };

    let err = parsed.build(&only_wake, ()).unwrap_err();
    assert!(matches!(err, BuildError::MissingBinding { name } if name == "run"));
}

#[test]
fn load_reports_missing_handler() {
    let err = Parser::new(symbols())
        .load(["STATE a", "EVENT go", "ACTION run"], &[])
        .unwrap_err();
    assert!(matches!(err, Error::Build(BuildError::MissingBinding { .. })));
}

#[test]
fn too_few_tokens() {
    assert!(matches!(parse_err(&["FOO"]), ParseError::TooFewTokens { line: 1, .. }));
}

#[test]
fn unexpected_directive() {
    assert!(matches!(
        parse_err(&["FOO bar"]),
        ParseError::UnexpectedDirective { line: 1, .. }
    ));
    assert!(matches!(
        parse_err(&["ACTION early"]),
        ParseError::UnexpectedDirective { line: 1, .. }
    ));
    assert!(matches!(
        parse_err(&["STATE a", "HANDLER x a.x", "EVENT go"]),
        ParseError::UnresolvedSymbol { line: 2, .. }
    ));
}

#[test]
fn directive_after_handlers_is_unexpected() {
    let err = Parser::new(symbols())
        .parse(["STATE a", "HANDLER on tests.turn_on", "EVENT go"])
        .unwrap_err();
    assert_eq!(err.to_string(), "unexpected directive 'EVENT', line=3");
}

#[test]
fn extra_token() {
    for lines in [
        &["STATE foo bar"][..],
        &["STATE foo", "ENTER foo bar"][..],
        &["STATE foo", "EXIT foo bar"][..],
    ] {
        assert!(matches!(parse_err(lines), ParseError::ExtraToken { .. }));
    }
}

#[test]
fn duplicate_state_name() {
    parse::<()>(["STATE foo"]).unwrap();
    let err = parse_err(&["STATE foo", "# comment", "STATE foo"]);
    assert!(matches!(err, ParseError::DuplicateName { line: 3, .. }));
}

#[test]
fn duplicate_action_name() {
    parse::<()>(["STATE foo", "EVENT foo", "ACTION foo"]).unwrap();
    let err = parse_err(&["STATE foo", "EVENT foo", "ACTION foo", "ACTION foo"]);
    assert!(matches!(err, ParseError::DuplicateName { line: 4, .. }));
}

#[test]
fn duplicate_enter_and_exit() {
    parse::<()>(["STATE foo", "ENTER bar"]).unwrap();
    let err = parse_err(&["STATE foo", "ENTER bar", "ENTER none"]);
    assert!(matches!(err, ParseError::DuplicateDirective { line: 3, .. }));

    let err = parse_err(&["STATE foo", "EXIT bar", "EXIT none"]);
    assert!(matches!(err, ParseError::DuplicateDirective { line: 3, .. }));
}

#[test]
fn comments_are_ignored() {
    let parsed = parse::<()>(["STATE one # two"]).unwrap();
    assert_eq!(parsed.first_state(), Some("one"));
}

#[test]
fn reads_from_files_and_handles() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "STATE off\n  EVENT press on\nSTATE on").unwrap();

    let parsed = parse::<()>(file.path()).unwrap();
    assert_eq!(parsed.states(), vec!["off", "on"]);

    let parsed = parse::<()>(Reader("STATE solo".as_bytes())).unwrap();
    assert_eq!(parsed.states(), vec!["solo"]);
}

#[test]
fn missing_file_is_source_error() {
    let err = parse::<()>(std::path::Path::new("/no/such/light.fsm")).unwrap_err();
    assert!(matches!(err, ParseError::Source(_)));
    assert_eq!(err.line(), None);
}

#[test]
fn dump_round_trips_structure() {
    let source = "
        STATE off
            ENTER dark
            EVENT press on
                ACTION turn_on
                ACTION log
        STATE on
            EXIT cool
            EVENT press off
                ACTION turn_off
            EVENT hold
        DEFAULT reset off
            ACTION log
        HANDLER turn_on tests.turn_on
        HANDLER turn_off tests.turn_off
    ";
    let parser = Parser::new(symbols());
    let parsed = parser.parse(source).unwrap();
    let again = parser.parse(parsed.dump()).unwrap();

    assert_eq!(again.states(), parsed.states());
    assert_eq!(again.events(), parsed.events());
    assert_eq!(again.actions(), parsed.actions());
    assert_eq!(again.description(), parsed.description());
}

#[test]
fn description_survives_json() {
    let description = DescriptionBuilder::new()
        .state("off")
        .event("press", Some("on"))
        .state("on")
        .event("press", Some("off"))
        .build()
        .unwrap();

    let json = description.to_json().unwrap();
    let restored = fsm_table::core::Description::from_json(&json).unwrap();
    let table = build_table::<()>(&restored, &ActionMap::new()).unwrap();

    let mut fsm = Machine::new(Arc::new(table), ());
    fsm.handle("press", &[]).unwrap();
    assert_eq!(fsm.state(), "on");
}

#[test]
fn runtime_exception_hook_replaces_declared_one() {
    let mut fsm = load(&[
        "STATE on",
        "  EVENT press off",
        "    ACTION turn_off_exception",
        "STATE off",
        "CONTEXT tests.LightBulb",
        "HANDLER turn_off_exception tests.turn_off_exception",
        "EXCEPTION tests.on_exception",
    ]);
    assert!(fsm.has_exception_hook());

    let caught = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&caught);
    fsm.set_exception_hook(move |_bulb: &mut LightBulb, err: &ActionError| {
        sink.lock().unwrap().push(err.to_string());
        Continuation::Stop
    });

    assert!(fsm.handle("press", &[]).unwrap());
    assert_eq!(*caught.lock().unwrap(), vec!["oh no"]);
    assert!(!fsm.context().error);
    assert_eq!(fsm.state(), "on");
}
