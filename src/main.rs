use clap::{Args, Parser as ClapParser, Subcommand};
use corn_lang::cli::{self, CheckOptions, CheckResult, CliError};
use corn_lang::{Lexer, Parser};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "corn")]
#[command(about = "Corn - A configuration language that evaluates to JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a .corn file (reads from stdin if neither a path nor --source is given)
    path: Option<PathBuf>,

    /// Corn document passed inline
    #[arg(short, long, conflicts_with = "path")]
    source: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a Corn document and print it as JSON
    Check {
        #[command(flatten)]
        input: SourceArgs,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the token stream of a document
    Tokens {
        #[command(flatten)]
        input: SourceArgs,
    },

    /// Print the syntax tree of a document
    Ast {
        #[command(flatten)]
        input: SourceArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("CORN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            input,
            pretty,
            syntax_only,
        } => run_check(input, pretty, syntax_only),
        Commands::Tokens { input } => run_tokens(input),
        Commands::Ast { input } => run_ast(input),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_source(input: SourceArgs) -> Result<String, CliError> {
    match (input.source, input.path) {
        (Some(source), _) => Ok(source),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        (None, None) => Err(CliError::NoInput),
    }
}

fn run_check(input: SourceArgs, pretty: bool, syntax_only: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        source: read_source(input)?,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_tokens(input: SourceArgs) -> Result<(), CliError> {
    let source = read_source(input)?;
    for token in Lexer::new(&source).tokenize()? {
        println!("{}", token);
    }
    Ok(())
}

fn run_ast(input: SourceArgs) -> Result<(), CliError> {
    let source = read_source(input)?;
    let tokens = Lexer::new(&source).tokenize()?;
    println!("{}", Parser::new(tokens).parse()?);
    Ok(())
}
