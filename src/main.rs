//! bash-opts - Declarative option parsing for shell scripts.

use anyhow::{Context, Result};
use bash_opts::output::write_temp_file;
use bash_opts::{
    evaluate, generate_bindings_string, generate_declaration_string, generate_error_string,
    generate_init_string, opt, Bindings, OptionTable, Value, TABLE_ENV,
};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "BASH_OPTS_LOG";

/// Declarative option parsing for shell scripts.
#[derive(Parser, Debug)]
#[command(name = "bash-opts", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile option definitions and print their default bindings
    Declare {
        /// Print the compiled option table as JSON instead
        #[arg(long)]
        json: bool,

        /// Definition tokens, e.g. --[d]ebug --file= --names[]=
        #[arg(last = true)]
        definitions: Vec<String>,
    },

    /// Evaluate script arguments and print the resulting assignments
    Parse {
        /// Compiled option table, as exported by `declare`
        #[arg(long, env = TABLE_ENV, hide_env_values = true)]
        table: String,

        /// Write the assignments to a temporary file and print its path
        #[arg(long)]
        file: bool,

        /// Arguments to evaluate
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print the current value of a binding as option syntax
    Opt {
        /// Compiled option table, as exported by `declare`
        #[arg(long, env = TABLE_ENV, hide_env_values = true)]
        table: String,

        /// Declared option name
        name: String,

        /// Current value(s) of the binding
        values: Vec<String>,
    },

    /// Print the opts, opts_eval and opt shell functions
    Init,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Declare { json, definitions } => {
            let table = OptionTable::compile(&definitions);
            if json {
                println!("{}", table.to_json_pretty()?);
            } else {
                print!("{}", generate_declaration_string(&table)?);
            }
        }
        Commands::Parse { table, file, args } => {
            let table = OptionTable::from_json(&table).context("invalid option table")?;
            let mut bindings = Bindings::defaults(&table);
            let result = evaluate(&table, &mut bindings, &args);

            let mut script = generate_bindings_string(&table, &bindings);
            if let Err(ref e) = result {
                script.push_str(&generate_error_string(e));
            }

            if file {
                let path = write_temp_file(&script).context("failed to write output file")?;
                println!("{}", path.display());
            } else {
                print!("{}", script);
            }

            if result.is_err() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Opt {
            table,
            name,
            values,
        } => {
            let table = OptionTable::from_json(&table).context("invalid option table")?;
            let spec = table
                .get(&name)
                .with_context(|| format!("no option declared as '{}'", name))?;
            let value = Value::from_words(&spec.kind, &values);
            println!("{}", opt(spec, &value));
        }
        Commands::Init => {
            print!("{}", generate_init_string(env!("CARGO_PKG_NAME")));
        }
    }

    Ok(ExitCode::SUCCESS)
}
