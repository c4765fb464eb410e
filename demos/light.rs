//! Toggle a lamp described in `demos/light.fsm`.
//!
//! Run with `RUST_LOG=fsm_table=debug cargo run --example light` to see the
//! dispatch log.

use fsm_table::core::{ActionError, Continuation};
use fsm_table::dsl::{Parser, SymbolTable};
use serde_json::Value;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Lamp {
    watts: u64,
    lifetime: u32,
}

#[derive(Debug, thiserror::Error)]
#[error("the {0}W bulb burned out")]
struct BurnedOut(u64);

fn symbols() -> Result<SymbolTable<Lamp>, ActionError> {
    let symbols = SymbolTable::new()
        .context("lamp.Lamp", |args: &[Value]| {
            Ok(Lamp {
                watts: args.first().and_then(Value::as_u64).unwrap_or(60),
                lifetime: 2,
            })
        })?
        .handler("lamp.turn_on", |lamp: &mut Lamp, _args: &[Value]| {
            if lamp.lifetime == 0 {
                return Err(BurnedOut(lamp.watts).into());
            }
            lamp.lifetime -= 1;
            println!("the light is on");
            Ok(Continuation::Stop)
        })?
        .handler("lamp.turn_off", |_lamp: &mut Lamp, _args: &[Value]| {
            println!("the light is off");
            Ok(Continuation::Stop)
        })?
        .handler("lamp.glow", |lamp: &mut Lamp, _args: &[Value]| {
            println!("glowing at {}W", lamp.watts);
            Ok(Continuation::Stop)
        })?
        .handler("lamp.replace_bulb", |lamp: &mut Lamp, args: &[Value]| {
            lamp.watts = args.first().and_then(Value::as_u64).unwrap_or(lamp.watts);
            lamp.lifetime = 2;
            println!("new {}W bulb", lamp.watts);
            Ok(Continuation::Stop)
        })?
        .exception("lamp.on_error", |_lamp: &mut Lamp, err: &ActionError| {
            println!("{err}");
            Continuation::next("burned_out")
        })?;
    Ok(symbols)
}

fn main() -> Result<(), ActionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/light.fsm");
    let parser = Parser::new(symbols()?);
    let mut lamp = parser.load(path, &[Value::from(40)])?;

    for event in ["press", "press", "press", "press", "press"] {
        lamp.handle(event, &[])?;
        println!("  -> {}", lamp.state());
    }

    lamp.handle("replace", &[Value::from(75)])?;
    lamp.handle("press", &[])?;
    println!("  -> {}", lamp.state());

    if !lamp.handle("unplug", &[])? {
        println!("'unplug' is not an event of state {}", lamp.state());
    }
    Ok(())
}
