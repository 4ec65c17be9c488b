use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use skyparse::{errors::errors::Error, parse_expression, parse_module, render_error, tokenize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Parse a build file and print its syntax tree.
#[derive(Parser, Debug)]
#[command(name = "skyparse", version)]
struct Cli {
    /// Parse the input as a single expression instead of a file
    #[arg(long)]
    expr: bool,

    /// Print the token stream instead of the syntax tree
    #[arg(long, conflicts_with = "expr")]
    tokens: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,

    /// Input file, or `-` for standard input
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (file_name, bytes) = match read_input(&cli.file) {
        Ok(input) => input,
        Err(e) => {
            error!(file = %cli.file.display(), "cannot read input: {}", e);
            eprintln!("skyparse: {}: {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let result = if cli.tokens {
        tokenize(&file_name, &bytes[..]).map(|tokens| {
            tokens
                .iter()
                .map(|token| token.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
    } else if cli.expr {
        parse_expression(&file_name, &bytes[..]).map(|expr| format!("{:#?}", expr))
    } else {
        parse_module(&file_name, &bytes[..]).map(|module| format!("{:#?}", module))
    };

    info!("Parsed in {:?}", start.elapsed());

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(error) => {
            display_error(&error, &bytes);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Reads the whole input, returning the name used in positions and the raw
/// bytes.
fn read_input(path: &Path) -> io::Result<(String, Vec<u8>)> {
    if path.as_os_str() == "-" {
        let mut bytes = vec![];
        io::stdin().lock().read_to_end(&mut bytes)?;
        return Ok((String::from("<stdin>"), bytes));
    }

    let bytes = fs::read(path)?;
    Ok((path.display().to_string(), bytes))
}

fn display_error(error: &Error, bytes: &[u8]) {
    /*
        Error: UnexpectedToken (got ), want parameter)
        -> BUILD:20:13
           |
        20 | def f(*args,):
           | ------------^
    */
    let content = String::from_utf8_lossy(bytes);
    eprintln!("{}", render_error(error, &content));
}
