//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Evaluate domain relational calculus queries over fact files.
#[derive(Parser, Debug)]
#[command(name = "drc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Query formula, e.g. `student(S, SD) && !registered(S, *)`.
    pub query: String,

    /// Fact files to load (one fact per line: predicate followed by values).
    #[arg(short, long, required = true)]
    pub facts: Vec<PathBuf>,

    /// Output variables in column order, comma separated (default: every
    /// variable bound in all conjunctions and not fixed by `--bind`).
    #[arg(short, long, value_delimiter = ',')]
    pub output: Vec<String>,

    /// Bind a variable to a value in every conjunction: NAME=VALUE.
    #[arg(short, long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
    pub bindings: Vec<(String, String)>,

    /// Store used to execute the query.
    #[arg(long, value_enum, env = "DRC_BACKEND", default_value_t = Backend::Memory)]
    pub backend: Backend,

    /// Result format.
    #[arg(long, value_enum, env = "DRC_FORMAT", default_value_t = Format::Aligned)]
    pub format: Format,

    /// Field delimiter for the delimited format.
    #[arg(short, long, default_value_t = '\t')]
    pub delimiter: char,

    /// Do not print the header row.
    #[arg(long)]
    pub no_header: bool,

    /// Print the compiled query instead of running it.
    #[arg(long, value_enum)]
    pub explain: Option<Explain>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Query execution backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Evaluate plans over in-memory relations.
    Memory,
    /// Load facts into an in-memory SQLite database and run SQL.
    Sqlite,
}

/// Result output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Columns padded to a common width.
    Aligned,
    /// One line per row, fields separated by the delimiter, escaped.
    Delimited,
    /// A JSON array of objects keyed by output variable.
    Json,
}

/// What `--explain` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Explain {
    /// SQL for the selected backend, literals inlined.
    Sql,
    /// The relational plan as text.
    Plan,
    /// The parsed formula and plan as JSON.
    Json,
}

/// Error in a `--bind` argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// No `=` separates name and value.
    #[error("expected NAME=VALUE, got {0:?}")]
    MissingEquals(String),
    /// The name cannot be a query variable.
    #[error("{0:?} is not a variable name (letters and digits, not only digits)")]
    InvalidName(String),
}

/// Parses `NAME=VALUE`; a value wrapped in double quotes is unquoted.
pub fn parse_binding(arg: &str) -> Result<(String, String), BindingError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| BindingError::MissingEquals(String::from(arg)))?;
    let name = name.trim();
    let valid = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_alphanumeric())
        && !name.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(BindingError::InvalidName(String::from(name)));
    }
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Ok((String::from(name), String::from(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("Y=2016"),
            Ok((String::from("Y"), String::from("2016")))
        );
        assert_eq!(
            parse_binding("SD=\"Jane Dane\""),
            Ok((String::from("SD"), String::from("Jane Dane")))
        );
        assert_eq!(
            parse_binding("X=a=b"),
            Ok((String::from("X"), String::from("a=b")))
        );
        assert_eq!(parse_binding("X="), Ok((String::from("X"), String::new())));
    }

    #[test]
    fn test_parse_binding_errors() {
        assert_eq!(
            parse_binding("Y"),
            Err(BindingError::MissingEquals(String::from("Y")))
        );
        assert_eq!(
            parse_binding("12=a"),
            Err(BindingError::InvalidName(String::from("12")))
        );
        assert_eq!(
            parse_binding("=a"),
            Err(BindingError::InvalidName(String::new()))
        );
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "drc",
            "-f",
            "a.facts",
            "--facts",
            "b.facts",
            "-o",
            "S,SD",
            "-b",
            "Y=2016",
            "--format",
            "delimited",
            "-d",
            ",",
            "student(S, SD) && immatriculated(S, Y)",
        ])
        .unwrap();
        assert_eq!(cli.facts.len(), 2);
        assert_eq!(cli.output, ["S", "SD"]);
        assert_eq!(cli.bindings, [(String::from("Y"), String::from("2016"))]);
        assert_eq!(cli.format, Format::Delimited);
        assert_eq!(cli.delimiter, ',');
        assert_eq!(cli.explain, None);
        assert!(!cli.no_header);
    }

    #[test]
    fn test_cli_requires_facts() {
        assert!(Cli::try_parse_from(["drc", "p(X)"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_binding() {
        assert!(Cli::try_parse_from(["drc", "-f", "a", "-b", "nope", "p(X)"]).is_err());
    }
}
