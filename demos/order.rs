//! Order food from the command line.
//!
//! ```text
//! cargo run --example order -- pizza large -po
//! cargo run --example order -- chinese fried-rice --delivery "225 Bush St"
//! cargo run --example order -- mexican burrito -g
//! RUST_LOG=clispec=trace cargo run --example order -- pizza
//! ```

use std::process;
use std::rc::Rc;

use clispec::{Command, Outcome, Params, Parsed, Program, SpecError, Value, args_from_env};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn flag(params: &Params, name: &str) -> bool {
    params.get(name).and_then(Value::as_flag).unwrap_or(false)
}

fn toppings(params: &Params, names: &[&str], none: &str) -> String {
    let chosen: Vec<&str> = names.iter().copied().filter(|name| flag(params, name)).collect();
    if chosen.is_empty() {
        none.to_owned()
    } else {
        chosen.join(" and ")
    }
}

fn mexican() -> Result<Program<String>, SpecError> {
    Program::builder("mexican")
        .version("0.1.2")
        .description("any kind of mexican food")
        .command(
            Command::new("<item>", "order any kind of mexican food")
                .option("-g, --guac", "add guacamole")
                .option("-p, --pico", "add pico de gallo")
                .action(|params| {
                    let item = params["item"].as_str().unwrap_or_default();
                    let toppings = toppings(&params, &["pico", "guac"], "nothing on it");
                    Outcome::Value(format!("ordered a {item} with {toppings}."))
                }),
        )
        .build()
}

fn order() -> Result<Program<String>, SpecError> {
    let mexican = Rc::new(mexican()?);

    Program::builder("order")
        .version("0.0.1")
        .description("order food from your commandline!")
        .command(
            Command::new("pizza <size>", "order a pizza from your local pizza shop")
                .option("-p, --peperoni", "add peperoni topping")
                .option("-o, --olive", "add olive topping")
                .action(|params| {
                    let size = params["size"].as_str().unwrap_or_default();
                    let toppings = toppings(&params, &["peperoni", "olive"], "no");
                    Outcome::Value(format!("ordered a {size} pizza with {toppings} toppings"))
                }),
        )
        .command(
            Command::new(
                "chinese <dishes...>",
                "order chinese food from your local chinese restaurant",
            )
            .option(
                "-d, --delivery <address>",
                "specify an address to deliver to, otherwise pickup",
            )
            .action(|params| {
                let dishes = match params["dishes"].as_list().unwrap_or_default().split_last() {
                    Some((last, [])) => last.clone(),
                    Some((last, init)) => format!("{} and {last}", init.join(", ")),
                    None => String::new(),
                };
                let method = params
                    .get("delivery")
                    .and_then(Value::as_map)
                    .and_then(|delivery| delivery.get("address"))
                    .and_then(Value::as_str)
                    .map(|address| format!("delivered to {address}."))
                    .unwrap_or_else(|| "for pickup in 15 minutes.".to_owned());
                Outcome::Value(format!("ordered {dishes} {method}"))
            }),
        )
        .command(
            Command::new("<service>", "order from 3rd party services").action(move |params| {
                match params["service"].as_str() {
                    Some("mexican") => Outcome::hand_off(&mexican),
                    other => Outcome::fail(format!(
                        "Unknown service \"{}\".",
                        other.unwrap_or_default()
                    )),
                }
            }),
        )
        .build()
}

fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(env_filter),
        )
        .init();
}

fn main() {
    setup_logging();

    let program = match order() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    match program.run(args_from_env()) {
        Ok(Parsed::Help(text)) => print!("{text}"),
        Ok(Parsed::Value(message)) => println!("{message}"),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
