//! Elevator
//!
//! This example drives an elevator cabin with a statechart.
//!
//! Key concepts:
//! - An orthogonal state: movement and doors run as parallel regions
//! - Guards and actions backed by host closures reading shared state
//! - One entry hook shared by two states, told apart by its target
//! - Event payloads (`call` carries the requested floor)
//! - Eventless transitions that run until their guard stops holding
//! - A final state that completes the root
//!
//! Run with: cargo run --example elevator

use statecraft::builder::{StateBuilder, StatechartBuilder, TransitionBuilder};
use statecraft::evaluator::{HookRegistry, HookTarget};
use statecraft::interpreter::{Interpreter, InterpreterConfig, Policy};
use statecraft::{BuildError, Event, Statechart};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Cabin {
    floor: i64,
    target: i64,
}

fn requested(event: Option<&Event>) -> Option<i64> {
    event.and_then(|e| e.get("floor")).and_then(|f| f.as_i64())
}

fn elevator() -> Result<Statechart, BuildError> {
    StatechartBuilder::new("elevator")
        .description("A cabin serving calls while its doors work independently")
        .state(StateBuilder::compound("root").initial("active"))
        .state(StateBuilder::orthogonal("active").parent("root"))
        .state(StateBuilder::compound("movement").parent("active").initial("idle"))
        .state(StateBuilder::basic("idle").parent("movement"))
        .state(StateBuilder::basic("moving_up").parent("movement").on_entry("announce"))
        .state(StateBuilder::basic("moving_down").parent("movement").on_entry("announce"))
        .state(StateBuilder::compound("doors").parent("active").initial("closed"))
        .state(StateBuilder::basic("closed").parent("doors"))
        .state(StateBuilder::basic("opened").parent("doors"))
        .state(StateBuilder::final_state("stopped").parent("root"))
        .transition(
            TransitionBuilder::new()
                .from("idle")
                .to("moving_up")
                .on("call")
                .when("above")
                .action("set_target"),
        )?
        .transition(
            TransitionBuilder::new()
                .from("idle")
                .to("moving_down")
                .on("call")
                .when("below")
                .action("set_target"),
        )?
        .transition(TransitionBuilder::new().from("moving_up").when("short").action("up"))?
        .transition(TransitionBuilder::new().from("moving_up").to("idle").when("arrived"))?
        .transition(TransitionBuilder::new().from("moving_down").when("beyond").action("down"))?
        .transition(TransitionBuilder::new().from("moving_down").to("idle").when("arrived"))?
        .transition(TransitionBuilder::new().from("closed").to("opened").on("open"))?
        .transition(TransitionBuilder::new().from("opened").to("closed").on("close"))?
        .transition(TransitionBuilder::new().from("active").to("stopped").on("shutdown"))?
        .build()
}

fn hooks(cabin: &Arc<Mutex<Cabin>>) -> HookRegistry {
    let (above, below, short, beyond, arrived) = (
        Arc::clone(cabin),
        Arc::clone(cabin),
        Arc::clone(cabin),
        Arc::clone(cabin),
        Arc::clone(cabin),
    );
    let (target, up, down, announce) = (
        Arc::clone(cabin),
        Arc::clone(cabin),
        Arc::clone(cabin),
        Arc::clone(cabin),
    );

    HookRegistry::new()
        .guard("above", move |event: Option<&Event>| {
            requested(event).is_some_and(|floor| floor > above.lock().unwrap().floor)
        })
        .guard("below", move |event: Option<&Event>| {
            requested(event).is_some_and(|floor| floor < below.lock().unwrap().floor)
        })
        .guard("short", move |_: Option<&Event>| {
            let cabin = short.lock().unwrap();
            cabin.floor < cabin.target
        })
        .guard("beyond", move |_: Option<&Event>| {
            let cabin = beyond.lock().unwrap();
            cabin.floor > cabin.target
        })
        .guard("arrived", move |_: Option<&Event>| {
            let cabin = arrived.lock().unwrap();
            cabin.floor == cabin.target
        })
        .action("set_target", move |event: Option<&Event>| {
            if let Some(floor) = requested(event) {
                target.lock().unwrap().target = floor;
            }
        })
        .action("up", move |_: Option<&Event>| {
            up.lock().unwrap().floor += 1;
        })
        .action("down", move |_: Option<&Event>| {
            down.lock().unwrap().floor -= 1;
        })
        .action_with("announce", move |target: HookTarget<'_>, _: Option<&Event>| {
            let cabin = announce.lock().unwrap();
            let direction = target.state_name().replace('_', " ");
            println!("  {direction}: floor {} to floor {}", cabin.floor, cabin.target);
            Ok(())
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=statecraft=debug shows every macro step
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("=== Elevator ===\n");

    let cabin = Arc::new(Mutex::new(Cabin::default()));
    let config = InterpreterConfig::new(Policy::default()).with_max_steps(50);
    let mut elevator = Interpreter::with_config(elevator()?, hooks(&cabin), config);

    elevator.execute()?;
    println!("Started: {:?}", elevator.configuration());

    println!("\nCalled to floor 3 while the doors open:");
    elevator
        .queue(Event::new("call").with("floor", 3))
        .queue("open")
        .queue("close");
    for step in elevator.execute()? {
        let fired: Vec<String> = step.transitions().map(|t| t.to_string()).collect();
        println!("  {:?} -> {:?}", fired, step.configuration);
    }
    println!("Cabin at floor {}", cabin.lock().unwrap().floor);

    println!("\nCalled back to the ground floor:");
    elevator.queue(Event::new("call").with("floor", 0)).execute()?;
    println!("Cabin at floor {}", cabin.lock().unwrap().floor);

    println!("\nA call to the current floor is ignored:");
    let steps = elevator.queue(Event::new("call").with("floor", 0)).execute()?;
    println!("  {} step(s), all empty: {}", steps.len(), steps.iter().all(|s| s.is_empty()));

    elevator.queue("shutdown").execute()?;
    println!("\nShut down: {:?} (done: {})", elevator.configuration(), elevator.is_done());
    println!("Macro steps recorded: {}", elevator.trace().len());

    Ok(())
}
