use std::process;

use adaptivity_core::{make_rule, parse_rule, PelError, RuleInput};

use crate::OutputFormat;

pub(crate) fn cmd_rule_make(
    operator: &str,
    value: &str,
    upper: Option<&str>,
    output: OutputFormat,
    quiet: bool,
) {
    let input = match upper {
        Some(upper) => RuleInput::range(value, upper),
        None => RuleInput::single(value),
    };
    let rule = match make_rule(operator, &input) {
        Ok(rule) => rule,
        Err(e) => fail(&e, output, quiet),
    };

    match output {
        OutputFormat::Text => println!("{}", rule),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "operator": operator,
                "input": input,
                "rule": rule,
            });
            println!("{}", pretty(&json));
        }
    }
}

pub(crate) fn cmd_rule_parse(rule: &str, output: OutputFormat, quiet: bool) {
    let parsed = match parse_rule(rule) {
        Ok(parsed) => parsed,
        Err(e) => fail(&e, output, quiet),
    };

    match output {
        OutputFormat::Text => {
            println!("operator: {}", parsed.operator);
            println!("input: {}", parsed.input);
        }
        OutputFormat::Json => {
            let json = serde_json::to_value(&parsed)
                .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
            println!("{}", pretty(&json));
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn fail(e: &PelError, output: OutputFormat, quiet: bool) -> ! {
    if !quiet {
        match output {
            OutputFormat::Json => eprintln!("{}", pretty(&e.to_json_value())),
            OutputFormat::Text => eprintln!("error: {}", e),
        }
    }
    process::exit(1);
}
