//! cmos-ic - CMOS logic truth table generator
//!
//! Evaluates a transistor-level netlist over every input combination and
//! prints which transistors conduct in each state.
//!
//! # Usage
//!
//! ```bash
//! cmos-ic                                  # bundled full adder
//! cmos-ic circuit.ic -v                    # truth table with debug logging
//! cmos-ic circuit.ic --set X=1 --set Y=0   # a single state
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::Level as LogLevel;

use cmos_ic::{
    dsl,
    error::{IcError, Result},
    report::{self, TextTable},
    ContentionPolicy, Ic, Level, ResolveConfig, TransistorFilter, FULL_ADDER,
};

/// Transistor-level CMOS logic simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist (.ic); the bundled full adder when omitted
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: Option<PathBuf>,

    /// Evaluate one state instead of the full table (repeatable, NAME=VALUE)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, Level)>,

    /// Fail on nodes driven LOW and HIGH at once instead of letting HIGH win
    #[arg(long)]
    reject_contention: bool,

    /// Log construction and resolution details
    #[arg(short, long)]
    verbose: bool,
}

fn parse_assignment(s: &str) -> std::result::Result<(String, Level), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let level = value.parse::<Level>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), level))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LogLevel::DEBUG
        } else {
            LogLevel::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    // Parse the netlist
    let ast = match &args.circuit_file {
        Some(path) => dsl::parse_file(path)?,
        None => dsl::parse(FULL_ADDER)?,
    };

    // Build the IC
    let contention = if args.reject_contention {
        ContentionPolicy::Reject
    } else {
        ContentionPolicy::WiredOr
    };
    let mut ic = Ic::from_ast_with_config(&ast, ResolveConfig::new().with_contention(contention))?;

    if args.set.is_empty() {
        let table = ic.get_table()?;
        println!("{}", report::truth_table(&table));
    } else {
        ic.change_state(args.set.iter().map(|(n, l)| (n.as_str(), *l)))?;
        println!("{}", single_state(&ic)?);
    }
    println!("{}", report::capacity_table(&ic));

    Ok(())
}

/// Levels of every input and output plus transistor activity, as one row.
fn single_state(ic: &Ic) -> Result<TextTable> {
    let designators = |filter: TransistorFilter| -> Result<String> {
        Ok(ic
            .transistors(&filter)?
            .iter()
            .map(|t| t.designator().to_string())
            .collect::<Vec<_>>()
            .join(", "))
    };

    let mut header: Vec<String> = ic
        .input_names()
        .chain(ic.output_names())
        .map(String::from)
        .collect();
    header.extend(["Open transistors".to_string(), "Active transistors".to_string()]);

    let mut row = Vec::with_capacity(header.len());
    for name in ic.input_names() {
        row.push(level_of(ic.input_level(name), name)?);
    }
    for name in ic.output_names() {
        row.push(level_of(ic.output_level(name), name)?);
    }
    row.push(designators(TransistorFilter::any().open())?);
    row.push(designators(TransistorFilter::any().open().active())?);

    let mut table = TextTable::new(header);
    table.add_row(row);
    Ok(table)
}

fn level_of(level: Option<Level>, name: &str) -> Result<String> {
    level
        .map(|l| l.to_string())
        .ok_or_else(|| IcError::construction(format!("no terminal named '{}'", name)))
}
