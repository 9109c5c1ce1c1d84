use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use calc_core::{Calculator, CompileOptions};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

mod repl;

/// Compile and evaluate arithmetic expressions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, global = true, help = "Skip constant folding")]
    no_optimize: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression and print the result
    Execute {
        #[command(flatten)]
        source: Source,

        #[arg(
            short = 'D',
            long = "var",
            value_name = "NAME=VALUE",
            value_parser = parse_binding,
            help = "Bind a variable before evaluating"
        )]
        vars: Vec<(String, f64)>,
    },
    /// Print the postfix form of an expression
    Rpn {
        #[command(flatten)]
        source: Source,
    },
    /// Read expressions and commands from stdin, one per line
    Repl,
}

#[derive(Args, Debug)]
struct Source {
    /// Expression text; read from --input or stdin when omitted
    expression: Option<String>,

    #[arg(short, long, value_name = "PATH", conflicts_with = "expression")]
    input: Option<PathBuf>,
}

impl Source {
    fn read(&self) -> Result<String> {
        if let Some(expression) = &self.expression {
            return Ok(expression.clone());
        }
        let text = match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read input file {}", path.display()))?,
            None => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        Ok(text.trim().to_string())
    }
}

fn parse_binding(raw: &str) -> Result<(String, f64)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid value for variable '{}'", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    execute(cli)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let options = CompileOptions {
        optimize: !cli.no_optimize,
    };
    let mut calc = Calculator::default();

    match cli.command {
        Command::Execute { source, vars } => {
            let expression = source.read()?;
            for (name, value) in vars {
                calc.set_variable(&name, value);
            }
            calc.set_expression_with(&expression, options)
                .with_context(|| format!("failed to compile {expression:?}"))?;
            let result = calc.execute().context("failed to evaluate expression")?;
            println!("{result}");
        }
        Command::Rpn { source } => {
            let expression = source.read()?;
            let program = calc
                .compile_with(&expression, options)
                .with_context(|| format!("failed to compile {expression:?}"))?;
            println!("{}", program.dump_postfix().join(" "));
        }
        Command::Repl => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            repl::run(&mut calc, options, stdin.lock(), stdout.lock())?;
        }
    }

    Ok(())
}
