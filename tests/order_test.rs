mod common;

use std::rc::Rc;

use clispec::{CliError, Command, ErrorNode, Issue, Outcome, Params, Parsed, Program, Value};
use common::init_test_setup;
use rstest::{fixture, rstest};

fn flag(params: &Params, name: &str) -> bool {
    params.get(name).and_then(Value::as_flag).unwrap_or(false)
}

fn toppings(params: &Params, names: &[&str]) -> String {
    names
        .iter()
        .filter(|name| flag(params, name))
        .copied()
        .collect::<Vec<_>>()
        .join(" and ")
}

fn mexican() -> Program<String> {
    Program::builder("mexican")
        .version("0.1.2")
        .description("any kind of mexican food")
        .command(
            Command::new("<item>", "order any kind of mexican food")
                .option("-g, --guac", "add guacamole")
                .option("-p, --pico", "add pico de gallo")
                .action(|params| {
                    let item = params["item"].as_str().unwrap_or_default();
                    let toppings = toppings(&params, &["pico", "guac"]);
                    let toppings = if toppings.is_empty() {
                        "nothing on it".to_owned()
                    } else {
                        toppings
                    };
                    Outcome::Value(format!("ordered a {item} with {toppings}."))
                }),
        )
        .build()
        .expect("mexican compiles")
}

#[fixture]
fn order() -> Program<String> {
    init_test_setup();
    let mexican = Rc::new(mexican());

    Program::builder("order")
        .version("0.0.1")
        .description("order food from your commandline!")
        .command(
            Command::new("pizza <size>", "order a pizza from your local pizza shop")
                .option("-p, --peperoni", "add peperoni topping")
                .option("-o, --olive", "add olive topping")
                .action(|params| {
                    let size = params["size"].as_str().unwrap_or_default();
                    let toppings = toppings(&params, &["peperoni", "olive"]);
                    let toppings = if toppings.is_empty() {
                        "no".to_owned()
                    } else {
                        toppings
                    };
                    Outcome::Value(format!("ordered a {size} pizza with {toppings} toppings"))
                }),
        )
        .command(
            Command::new("chinese <dishes...>", "order chinese food")
                .option("-d, --delivery <address>", "deliver to an address, otherwise pickup")
                .action(|params| {
                    let dishes = params["dishes"].as_list().unwrap_or_default();
                    let dishes = match dishes.split_last() {
                        Some((last, [])) => last.clone(),
                        Some((last, init)) => format!("{} and {last}", init.join(", ")),
                        None => String::new(),
                    };
                    let method = match params.get("delivery").and_then(Value::as_map) {
                        Some(delivery) => format!(
                            "delivered to {}.",
                            delivery["address"].as_str().unwrap_or_default()
                        ),
                        None => "for pickup in 15 minutes.".to_owned(),
                    };
                    Outcome::Value(format!("ordered {dishes} {method}"))
                }),
        )
        .command(
            Command::new("<service>", "order from 3rd party services").action(move |params| {
                match params["service"].as_str() {
                    Some("mexican") => Outcome::hand_off(&mexican),
                    service => Outcome::fail(format!(
                        "Unknown service \"{}\".",
                        service.unwrap_or_default()
                    )),
                }
            }),
        )
        .build()
        .expect("order compiles")
}

#[rstest]
#[case("pizza large", "ordered a large pizza with no toppings")]
#[case("pizza small -p", "ordered a small pizza with peperoni toppings")]
#[case("pizza large -p -o", "ordered a large pizza with peperoni and olive toppings")]
#[case("pizza large -po", "ordered a large pizza with peperoni and olive toppings")]
#[case(
    "chinese white-rice broccoli-beef sesame-chicken",
    "ordered white-rice, broccoli-beef and sesame-chicken for pickup in 15 minutes."
)]
#[case("mexican burrito -g", "ordered a burrito with guac.")]
#[case("mexican taco", "ordered a taco with nothing on it.")]
#[case("mexican taco -gp", "ordered a taco with pico and guac.")]
fn test_orders(order: Program<String>, #[case] input: &str, #[case] expected: &str) {
    let parsed = order.run(input).unwrap();
    assert_eq!(parsed, Parsed::Value(expected.to_owned()));
}

#[rstest]
fn test_delivery_address_keeps_spaces(order: Program<String>) {
    let parsed = order
        .run(["chinese", "fried-rice", "--delivery", "225 Bush St, San Francisco"])
        .unwrap();
    assert_eq!(
        parsed,
        Parsed::Value("ordered fried-rice delivered to 225 Bush St, San Francisco.".to_owned())
    );
}

#[rstest]
fn test_help(order: Program<String>) {
    let help = order.run("--help").unwrap();
    let text = help.help().expect("help");
    assert!(text.starts_with("  \n  order 0.0.1\n  \n  order food from your commandline!\n"));
    assert!(text.contains("-d, --delivery <address>"));
}

#[rstest]
fn test_help_is_passed_to_delegated_program(order: Program<String>) {
    let help = order.run("mexican --help").unwrap();
    let text = help.help().expect("help");
    assert!(text.contains("mexican 0.1.2"));
    assert!(text.contains("-g, --guac"));
}

#[rstest]
fn test_unknown_service(order: Program<String>) {
    let result = order.parse("thai");
    assert_eq!(result.errors().len(), 3);
    assert_eq!(
        result.errors()[2],
        ErrorNode::Context {
            label: "While parsing with \"<service>\"".into(),
            errors: vec![Issue::Custom("Unknown service \"thai\".".into()).into()],
        }
    );

    let CliError::NoMatchingCommand { program, report } = order.run("thai").unwrap_err();
    assert_eq!(program, "order");
    assert!(report.contains("Expected command keyword \"pizza\"; received \"thai\""));
    assert!(report.contains("Unknown service \"thai\"."));
}

#[rstest]
fn test_missing_pizza_size(order: Program<String>) {
    let result = order.parse("pizza");
    assert_eq!(
        result.errors()[0],
        ErrorNode::Context {
            label: "While parsing positional arguments for \"pizza <size>\"".into(),
            errors: vec![Issue::MissingArguments(vec!["<size>".into()]).into()],
        }
    );
}

#[rstest]
fn test_option_needs_its_argument(order: Program<String>) {
    let report = order.run("chinese noodles --delivery").unwrap_err().to_string();
    assert!(report.contains("While parsing options for \"chinese <dishes...>\""));
    assert!(report.contains("While parsing arguments for \"-d, --delivery <address>\""));
    assert!(report.contains("Could not parse option \"--delivery\""));
}
