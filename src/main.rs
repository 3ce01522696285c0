use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use ifjc::config::Options;
use ifjc::diagnostics::{render_error, CompileError};

#[derive(Parser)]
#[command(name = "ifjc", version, about = "IFJ24 to IFJcode24 compiler")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Source file (reads standard input when omitted)
    file: Option<PathBuf>,
    /// Options file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not reject unused variables
    #[arg(long)]
    no_unused_check: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a program to IFJcode24
    Compile {
        #[command(flatten)]
        common: CommonArgs,
        /// Output file (writes standard output when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a program without generating code
    Check {
        #[command(flatten)]
        common: CommonArgs,
        /// Print the global symbols and block locals as JSON
        #[arg(long)]
        symbols: bool,
    },
    /// Print the token stream as JSON
    Tokens {
        /// Source file (reads standard input when omitted)
        file: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

/// Reads the raw program; on a decoding failure the lossy text is kept for
/// rendering the report.
fn read_source(file: Option<&Path>) -> Result<String, (String, CompileError)> {
    let bytes = match file {
        Some(path) => std::fs::read(path),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes).map(|_| bytes)
        }
    }
    .map_err(|e| (String::new(), CompileError::from(e)))?;
    ifjc::lexer::decode_source(&bytes).map_err(|e| (String::from_utf8_lossy(&bytes).into_owned(), e))
}

fn load_options(common: &CommonArgs) -> Result<Options, CompileError> {
    let mut options = match &common.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if common.no_unused_check {
        options.check_unused = false;
    }
    Ok(options)
}

fn display_name(file: Option<&Path>) -> String {
    file.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

/// Renders the error against the source and exits with its code.
fn fail(source: &str, file: Option<&Path>, err: &CompileError) -> ! {
    tracing::debug!(kind = ?err.kind(), line = err.line(), "compilation failed");
    render_error(source, &display_name(file), err);
    std::process::exit(err.exit_code());
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CompileError> {
    serde_json::to_string_pretty(value).map_err(|e| CompileError::internal(format!("cannot serialise output: {e}")))
}

fn run(command: Commands) -> Result<(), (String, Option<PathBuf>, CompileError)> {
    match command {
        Commands::Compile { common, output } => {
            let source = read_source(common.file.as_deref()).map_err(|(text, e)| (text, common.file.clone(), e))?;
            let fail_with = |e: CompileError| (source.clone(), common.file.clone(), e);
            let options = load_options(&common).map_err(fail_with)?;
            let code = ifjc::compile(&source, &options).map_err(fail_with)?;
            match output {
                Some(path) => std::fs::write(&path, code).map_err(|e| fail_with(e.into()))?,
                None => print!("{code}"),
            }
        }
        Commands::Check { common, symbols } => {
            let source = read_source(common.file.as_deref()).map_err(|(text, e)| (text, common.file.clone(), e))?;
            let fail_with = |e: CompileError| (source.clone(), common.file.clone(), e);
            let options = load_options(&common).map_err(fail_with)?;
            let analysis = ifjc::analyze(&source, &options).map_err(fail_with)?;
            if symbols {
                println!("{}", to_json(&analysis).map_err(fail_with)?);
            }
        }
        Commands::Tokens { file } => {
            let source = read_source(file.as_deref()).map_err(|(text, e)| (text, file.clone(), e))?;
            let fail_with = |e: CompileError| (source.clone(), file.clone(), e);
            let buffer = ifjc::lexer::lex(&source).map_err(fail_with)?;
            println!("{}", to_json(&buffer.tokens()).map_err(fail_with)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err((source, file, err)) = run(cli.command) {
        fail(&source, file.as_deref(), &err);
    }
}
