//! colscan - probe columnar data files with typed reads and filter comparisons

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use colscan::expression::ComparisonOperator;
use colscan::probe::{compare_field, read_field, FieldKind};
use colscan::storage::{CachedFileReader, FileReaderConfig};

/// colscan - random-access reads and predicate checks against data files
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Read-ahead buffer size per open file, in bytes
    #[arg(long, default_value_t = colscan::storage::disk::file_reader::DEFAULT_BUFFER_CAPACITY)]
    buffer_capacity: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a byte range
    Bytes {
        path: String,
        /// Start of the range; the start of the file when omitted
        #[arg(short, long)]
        offset: Option<u64>,
        #[arg(short, long)]
        length: usize,
    },

    /// Read a big-endian 32-bit integer
    Int {
        path: String,
        #[arg(short, long)]
        offset: Option<u64>,
    },

    /// Read a big-endian 64-bit integer
    Long {
        path: String,
        #[arg(short, long)]
        offset: Option<u64>,
    },

    /// Read a big-endian 64-bit float
    Double {
        path: String,
        #[arg(short, long)]
        offset: Option<u64>,
    },

    /// Read a field and compare it against a literal
    Compare {
        path: String,
        #[arg(short, long)]
        offset: Option<u64>,
        #[arg(short, long, value_enum)]
        kind: Kind,
        #[arg(long, value_enum)]
        op: Op,
        /// Literal parsed as the field kind
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Int,
    Long,
    Double,
}

impl From<Kind> for FieldKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Int => FieldKind::Int,
            Kind::Long => FieldKind::Long,
            Kind::Double => FieldKind::Double,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl From<Op> for ComparisonOperator {
    fn from(op: Op) -> Self {
        match op {
            Op::Eq => ComparisonOperator::EqualTo,
            Op::Ne => ComparisonOperator::NotEquals,
            Op::Lt => ComparisonOperator::LessThan,
            Op::Le => ComparisonOperator::LessThanEqualTo,
            Op::Gt => ComparisonOperator::GreaterThan,
            Op::Ge => ComparisonOperator::GreaterThanEqualTo,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let reader = CachedFileReader::with_config(FileReaderConfig {
        buffer_capacity: args.buffer_capacity,
        ..FileReaderConfig::default()
    });

    let outcome = run(&reader, args.command);
    reader.finish();
    outcome
}

fn run(reader: &CachedFileReader, command: Command) -> Result<()> {
    match command {
        Command::Bytes {
            path,
            offset,
            length,
        } => {
            let bytes = match offset {
                Some(offset) => reader.read_bytes_at(&path, offset, length),
                None => reader.read_bytes(&path, length),
            }
            .with_context(|| format!("Failed to read {} bytes from {}", length, path))?;
            let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            println!("{}", hex.join(" "));
            println!("{}", String::from_utf8_lossy(&bytes));
        }

        Command::Int { path, offset } => print_field(reader, &path, offset, FieldKind::Int)?,
        Command::Long { path, offset } => print_field(reader, &path, offset, FieldKind::Long)?,
        Command::Double { path, offset } => print_field(reader, &path, offset, FieldKind::Double)?,

        Command::Compare {
            path,
            offset,
            kind,
            op,
            value,
        } => {
            let kind = FieldKind::from(kind);
            let op = ComparisonOperator::from(op);
            let literal = kind
                .parse_literal(&value)
                .with_context(|| format!("Invalid {} literal: {}", kind.data_type(), value))?;
            let matched = compare_field(reader, &path, offset, kind, op, &literal)
                .with_context(|| format!("Failed to evaluate {} on {}", op.name(), path))?;
            println!("{}", matched);
        }
    }
    Ok(())
}

fn print_field(
    reader: &CachedFileReader,
    path: &str,
    offset: Option<u64>,
    kind: FieldKind,
) -> Result<()> {
    let value = read_field(reader, path, offset, kind).with_context(|| {
        format!(
            "Failed to read {}-byte {} from {}",
            kind.width(),
            kind.data_type(),
            path
        )
    })?;
    println!("{}", value);
    Ok(())
}
