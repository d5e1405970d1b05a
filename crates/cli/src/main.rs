mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::check::cmd_check;
use commands::rule::{cmd_rule_make, cmd_rule_parse};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Adaptive lesson rule toolkit.
#[derive(Parser)]
#[command(name = "adaptivity", version, about = "Adaptive lesson rule toolkit")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run identifier and reference diagnostics on a deck JSON file
    Check {
        /// Path to the deck JSON file
        file: PathBuf,
        /// Comma-separated list of checks to run (duplicate,pattern,broken_navigation,
        /// invalid_mutate_target,invalid_init_target,invalid_condition_target,
        /// invalid_condition_value). Default: all.
        #[arg(long)]
        checks: Option<String>,
        /// Exit with status 1 when any problem is found
        #[arg(long)]
        strict: bool,
    },

    /// Build or classify predicate expression rules
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },
}

#[derive(Subcommand)]
enum RuleCommand {
    /// Build a rule string from an operator and its operand(s)
    Make {
        /// Operator (gt, gte, lt, lte, eq, neq, contains, notcontains, regex, btw, nbtw)
        operator: String,
        /// Operand, or lower bound for btw/nbtw
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Upper bound for btw/nbtw
        #[arg(allow_hyphen_values = true)]
        upper: Option<String>,
    },

    /// Classify a rule string into its operator and operand(s)
    Parse {
        /// Rule string, e.g. "input > {3}"
        #[arg(allow_hyphen_values = true)]
        rule: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            checks,
            strict,
        } => {
            cmd_check(&file, checks.as_deref(), strict, cli.output, cli.quiet);
        }
        Commands::Rule { command } => match command {
            RuleCommand::Make {
                operator,
                value,
                upper,
            } => {
                cmd_rule_make(&operator, &value, upper.as_deref(), cli.output, cli.quiet);
            }
            RuleCommand::Parse { rule } => {
                cmd_rule_parse(&rule, cli.output, cli.quiet);
            }
        },
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG`
/// overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
