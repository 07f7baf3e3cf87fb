//! twalk - query and edit nested JSON/YAML documents with path expressions.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use treewalk::node::{walk, Node};
use treewalk::path::DEFAULT_SEPARATOR;
use treewalk::value::{self, CodecError, Value};

#[derive(Parser, Debug)]
#[command(name = "twalk")]
#[command(version)]
#[command(about = "Query and edit nested JSON/YAML documents with path expressions")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path segment separator
    #[arg(long, short, global = true, default_value = DEFAULT_SEPARATOR)]
    separator: String,

    /// Output format
    #[arg(long, short, global = true, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log engine activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value a path resolves to
    Get {
        /// Input file (.json, .yaml, .yml, or - for JSON on stdin)
        file: PathBuf,
        path: String,
    },

    /// List the keys of the document or of the container at a path
    Keys { file: PathBuf, path: Option<String> },

    /// List the concrete paths a query matches
    Paths { file: PathBuf, path: String },

    /// Write a value at a path and print the document
    Set {
        file: PathBuf,
        path: String,
        /// JSON value; text that is not valid JSON is stored as a string
        value: String,
    },

    /// Append values to the container at a path and print the document
    Append {
        file: PathBuf,
        path: String,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Merge two documents and print the result
    Merge { lhs: PathBuf, rhs: PathBuf },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("no match for path '{0}'")]
    NotFound(String),

    #[error("'{0}' is not a container")]
    NotContainer(String),

    #[error("invalid path '{0}': empty segment")]
    InvalidPath(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "treewalk=debug" } else { "treewalk=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, output: &mut dyn Write) -> Result<(), CliError> {
    let separator = cli.separator.as_str();

    match &cli.command {
        Command::Get { file, path } => {
            let root = walk(load(file)?);
            let node = resolve(&root, path, separator)?;
            emit(cli, &node.value(), output)?;
        }
        Command::Keys { file, path } => {
            let root = walk(load(file)?);
            let node = match path {
                Some(path) => resolve(&root, path, separator)?,
                None => root,
            };
            if !node.is_container() {
                return Err(CliError::NotContainer(node.absolute_path_with(separator)));
            }
            for key in node.keys() {
                writeln!(output, "{}", key)?;
            }
        }
        Command::Paths { file, path } => {
            let root = walk(load(file)?);
            for matched in root.matching_paths_with(path, separator) {
                writeln!(output, "{}", matched)?;
            }
        }
        Command::Set { file, path, value } => {
            let root = walk(load(file)?);
            if !root.is_container() {
                return Err(CliError::NotContainer(file.display().to_string()));
            }
            root.set_with(path, parse_argument(value), separator)
                .ok_or_else(|| CliError::InvalidPath(path.clone()))?;
            emit(cli, &root.value(), output)?;
        }
        Command::Append { file, path, values } => {
            let root = walk(load(file)?);
            let target = resolve(&root, path, separator)?;
            target
                .append(values.iter().map(|v| parse_argument(v)))
                .ok_or_else(|| CliError::NotContainer(path.clone()))?;
            emit(cli, &root.value(), output)?;
        }
        Command::Merge { lhs, rhs } => {
            let root = walk(load(lhs)?);
            root.merge(load(rhs)?)
                .ok_or_else(|| CliError::NotContainer(lhs.display().to_string()))?;
            emit(cli, &root.value(), output)?;
        }
    }

    Ok(())
}

fn resolve(root: &Node, path: &str, separator: &str) -> Result<Node, CliError> {
    root.resolve_with(path, separator)
        .ok_or_else(|| CliError::NotFound(path.to_string()))
}

/// Reads a document, choosing the codec by file extension.
fn load(file: &Path) -> Result<Value, CliError> {
    let read_error = |source| CliError::Read {
        path: file.to_path_buf(),
        source,
    };
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_error)?;
        buf
    } else {
        fs::read_to_string(file).map_err(read_error)?
    };

    let is_yaml = matches!(
        file.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(file = %file.display(), is_yaml, bytes = content.len(), "loading document");

    let decoded = if is_yaml {
        value::from_yaml(&content)
    } else {
        value::from_json(&content)
    };
    decoded.map_err(|source| CliError::Decode {
        path: file.to_path_buf(),
        source,
    })
}

/// Interprets a command line value as JSON, falling back to a plain string.
fn parse_argument(raw: &str) -> Value {
    value::from_json(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn emit(cli: &Cli, value: &Value, output: &mut dyn Write) -> Result<(), CliError> {
    let text = match cli.format {
        OutputFormat::Json if cli.pretty => value::to_json_pretty(value)?,
        OutputFormat::Json => value::to_json(value)?,
        OutputFormat::Yaml => value::to_yaml(value)?,
    };
    writeln!(output, "{}", text.trim_end())?;
    Ok(())
}
