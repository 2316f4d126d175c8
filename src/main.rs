extern crate vastc;
use clap::{arg, command, Arg, ArgAction};
use log::info;
use miette::{Diagnostic, SourceSpan};
use std::fs;
use std::io::{self, Write};
use thiserror::Error;
use vastc::{build_stage, Flavor, StageDescription, StageError};

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
	#[error(transparent)]
	#[diagnostic(code(vastc::io_error))]
	IoError(#[from] io::Error),

	#[error("Invalid stage description: {message}")]
	#[diagnostic(code(vastc::json))]
	JsonError {
		message: String,

		#[source_code]
		src: String,

		#[label("here")]
		span: SourceSpan,
	},

	#[error(transparent)]
	#[diagnostic(transparent)]
	StageError(#[from] StageError),
}

/// Byte offset of a 1-based line/column position
fn offset_of(source: &str, line: usize, column: usize) -> usize {
	let line_start: usize = source.split_inclusive('\n').take(line.saturating_sub(1)).map(str::len).sum();
	(line_start + column.saturating_sub(1)).min(source.len())
}

fn parse_stage(source: String) -> Result<StageDescription, CliError> {
	serde_json::from_str(&source).map_err(|err| CliError::JsonError {
		message: err.to_string(),
		span: (offset_of(&source, err.line(), err.column()), 0).into(),
		src: source.clone(),
	})
}

fn run(input: &str, output: &mut dyn Write, flavor: Flavor) -> Result<(), CliError> {
	let source = fs::read_to_string(input)?;
	let stage = parse_stage(source)?;
	let file = build_stage(&stage, flavor)?;
	output.write_all(file.emit().as_bytes())?;
	info!("Emitted module '{}'", stage.module);
	Ok(())
}

fn main() -> miette::Result<()> {
	let matches = command!()
		.arg(Arg::new("input").required(true).help("JSON description of the register stage"))
		.arg(arg!(-o --output <FILE> "Output file, standard output by default"))
		.arg(
			Arg::new("sv")
				.long("sv")
				.action(ArgAction::SetTrue)
				.help("Declare registers as SystemVerilog logic"),
		)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::SetTrue)
				.help("Log debug messages"),
		)
		.get_matches();

	let default_filter = match matches.get_flag("verbose") {
		true => "debug",
		false => "warn",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
		.format_timestamp(None)
		.init();

	let flavor = match matches.get_flag("sv") {
		true => Flavor::SystemVerilog,
		false => Flavor::Verilog,
	};

	let input = matches
		.get_one::<String>("input")
		.expect("input is a required argument");

	let mut output: Box<dyn Write> = match matches.get_one::<String>("output") {
		None => Box::new(io::stdout()),
		Some(path) => Box::new(fs::File::create(path).map_err(CliError::from)?),
	};

	run(input, &mut output, flavor)?;
	Ok(())
}
