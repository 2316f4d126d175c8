use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;
use vast::ast::{is_identifier_valid, Bits, FormatPreference};
use vast::{DataType, Direction, ExprId, PortDescriptor, Reset, VastError, VerilogFile};

/// Reset line of a register stage
#[derive(Clone, Debug, Deserialize)]
pub struct ResetDescription {
	pub signal: String,

	#[serde(default)]
	pub active_low: bool,

	#[serde(default)]
	pub asynchronous: bool,
}

/// A register flopping one port into another
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterDescription {
	pub input: String,
	pub output: String,

	#[serde(default)]
	pub reset_value: Option<u64>,
}

/// Register stage handed over by the scheduling stage of the compiler
#[derive(Clone, Debug, Deserialize)]
pub struct StageDescription {
	pub module: String,
	pub clock: String,

	#[serde(default)]
	pub reset: Option<ResetDescription>,

	pub ports: Vec<PortDescriptor>,

	#[serde(default)]
	pub registers: Vec<RegisterDescription>,
}

#[derive(Clone, Debug, Error, Diagnostic)]
pub enum StageError {
	#[error("'{0}' is not a valid Verilog identifier")]
	#[diagnostic(code(vastc::invalid_name), help("identifiers start with a letter or '_' followed by letters, digits or '_'"))]
	InvalidName(String),

	#[error("Name '{0}' is declared more than once")]
	#[diagnostic(
		code(vastc::duplicate_port),
		help("clock, reset, ports and the generated '<output>_reg' registers share one namespace")
	)]
	DuplicatePort(String),

	#[error("Port '{0}' is driven by more than one register")]
	#[diagnostic(code(vastc::duplicate_register))]
	DuplicateRegister(String),

	#[error("Register refers to unknown port '{0}'")]
	#[diagnostic(code(vastc::unknown_port))]
	UnknownPort(String),

	#[error("Register output '{0}' is not an output port")]
	#[diagnostic(code(vastc::not_an_output))]
	NotAnOutput(String),

	#[error("Register '{input}' -> '{output}' connects {input_width} bits to {output_width} bits")]
	#[diagnostic(code(vastc::width_mismatch))]
	WidthMismatch {
		input: String,
		output: String,
		input_width: u32,
		output_width: u32,
	},

	#[error("Register '{0}' has a reset value but the stage has no reset")]
	#[diagnostic(code(vastc::reset_value_without_reset), help("add a \"reset\" section to the stage"))]
	ResetValueWithoutReset(String),

	#[error(transparent)]
	#[diagnostic(code(vastc::ast))]
	Vast(#[from] VastError),
}

/// Output flavour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Flavor {
	#[default]
	Verilog,
	SystemVerilog,
}

fn check_name(name: &str) -> Result<(), StageError> {
	match is_identifier_valid(name) {
		true => Ok(()),
		false => Err(StageError::InvalidName(name.into())),
	}
}

fn register_name(output: &str) -> String {
	format!("{}_reg", output)
}

impl StageDescription {
	fn validate_names(&self) -> Result<(), StageError> {
		check_name(&self.module)?;
		check_name(&self.clock)?;
		if let Some(reset) = &self.reset {
			check_name(&reset.signal)?;
		}
		for port in &self.ports {
			check_name(&port.name)?;
		}
		for register in &self.registers {
			check_name(&register_name(&register.output))?;
		}
		Ok(())
	}

	/// Every declared name must be unique, including the generated registers
	fn validate_declarations(&self) -> Result<(), StageError> {
		let mut names: HashSet<&str> = HashSet::new();
		let port_names = self.ports.iter().map(|port| port.name.as_str());
		let fixed_names = std::iter::once(self.clock.as_str())
			.chain(self.reset.iter().map(|reset| reset.signal.as_str()))
			.chain(port_names);
		for name in fixed_names {
			if !names.insert(name) {
				return Err(StageError::DuplicatePort(name.into()));
			}
		}

		let mut driven: HashSet<&str> = HashSet::new();
		for register in &self.registers {
			if !driven.insert(&register.output) {
				return Err(StageError::DuplicateRegister(register.output.clone()));
			}
			let reg = register_name(&register.output);
			if names.contains(reg.as_str()) {
				return Err(StageError::DuplicatePort(reg));
			}
		}
		Ok(())
	}
}

/// Builds a file holding a single module implementing the stage.
///
/// Ports are ordered clock, reset (if any), then the described ports.
/// Every register `q` fed by `d` becomes a `q_reg` flopped from `d` and
/// continuously assigned to `q`.
pub fn build_stage(stage: &StageDescription, flavor: Flavor) -> Result<VerilogFile, StageError> {
	stage.validate_names()?;
	stage.validate_declarations()?;
	debug!(
		"Building stage '{}' with {} ports and {} registers",
		stage.module,
		stage.ports.len(),
		stage.registers.len()
	);

	let f = VerilogFile::new();
	let mut m = f.add_module(&stage.module);

	let clk = m.add_input(&stage.clock, f.scalar_type());
	let reset = match &stage.reset {
		Some(desc) => Some(Reset {
			signal: m.add_input(&desc.signal, f.scalar_type()),
			asynchronous: desc.asynchronous,
			active_low: desc.active_low,
		}),
		None => None,
	};

	if stage.ports.is_empty() {
		warn!("Stage '{}' has no ports besides clock and reset", stage.module);
	}

	let mut ports: HashMap<&str, (&PortDescriptor, ExprId)> = HashMap::new();
	for port in &stage.ports {
		let port_ref = m.add_port(port)?;
		ports.insert(&port.name, (port, port_ref));
	}

	if stage.registers.is_empty() {
		return Ok(f);
	}

	let mut regs = m.add_section();
	m.top().add_blank_line();
	let mut logic = m.add_section();
	m.top().add_blank_line();
	let mut outputs = m.add_section();

	let mut flop = logic.add_always_flop(clk, reset);
	for register in &stage.registers {
		let (input, input_ref) = match ports.get(register.input.as_str()) {
			Some(port) => *port,
			None => return Err(StageError::UnknownPort(register.input.clone())),
		};
		let (output, output_ref) = match ports.get(register.output.as_str()) {
			Some(port) => *port,
			None => return Err(StageError::UnknownPort(register.output.clone())),
		};

		if output.direction != Direction::Output {
			return Err(StageError::NotAnOutput(output.name.clone()));
		}
		if input.width != output.width {
			return Err(StageError::WidthMismatch {
				input: input.name.clone(),
				output: output.name.clone(),
				input_width: input.width,
				output_width: output.width,
			});
		}

		let reset_value = match (register.reset_value, reset) {
			(Some(value), Some(_)) => {
				let bits = Bits::new(value.into(), output.width.into())?;
				Some(f.literal(bits, FormatPreference::Hex))
			},
			(Some(_), None) => return Err(StageError::ResetValueWithoutReset(output.name.clone())),
			(None, _) => None,
		};

		let name = register_name(&output.name);
		debug!("Register '{}' <= '{}' ({} bits)", name, input.name, output.width);
		let data_type: DataType = f.data_type_of_width(output.width);
		let reg = match flavor {
			Flavor::Verilog => regs.add_reg(&name, data_type, None),
			Flavor::SystemVerilog => regs.add_logic(&name, data_type, None),
		};

		flop.add_register(reg, input_ref, reset_value);
		outputs.add_continuous_assignment(output_ref, reg);
	}

	Ok(f)
}

#[cfg(test)]
mod test {
	use super::*;

	fn port(direction: Direction, name: &str, width: u32) -> PortDescriptor {
		PortDescriptor {
			direction,
			name: name.into(),
			width,
		}
	}

	fn register(input: &str, output: &str, reset_value: Option<u64>) -> RegisterDescription {
		RegisterDescription {
			input: input.into(),
			output: output.into(),
			reset_value,
		}
	}

	fn simple_stage() -> StageDescription {
		StageDescription {
			module: "stage".into(),
			clock: "clk".into(),
			reset: None,
			ports: vec![port(Direction::Input, "d", 8), port(Direction::Output, "q", 8)],
			registers: vec![register("d", "q", None)],
		}
	}

	#[test]
	fn stage_without_reset() -> Result<(), StageError> {
		let f = build_stage(&simple_stage(), Flavor::Verilog)?;
		assert_eq!(
			f.emit(),
			"module stage(\n  input wire clk,\n  input wire [7:0] d,\n  output wire [7:0] q\n);\n  reg [7:0] q_reg;\n\n  always \
			 @ (posedge clk) begin\n    q_reg <= d;\n  end\n\n  assign q = q_reg;\nendmodule\n"
		);
		Ok(())
	}

	#[test]
	fn system_verilog_uses_logic() -> Result<(), StageError> {
		let f = build_stage(&simple_stage(), Flavor::SystemVerilog)?;
		assert!(f.emit().contains("  logic [7:0] q_reg;\n"));
		Ok(())
	}

	#[test]
	fn reset_port_follows_clock() -> Result<(), StageError> {
		let mut stage = simple_stage();
		stage.reset = Some(ResetDescription {
			signal: "rst_n".into(),
			active_low: true,
			asynchronous: true,
		});
		stage.registers[0].reset_value = Some(0x5a);

		let text = build_stage(&stage, Flavor::Verilog)?.emit();
		assert!(text.starts_with("module stage(\n  input wire clk,\n  input wire rst_n,\n  input wire [7:0] d,\n"));
		assert!(text.contains("always @ (posedge clk or negedge rst_n) begin\n    if (!rst_n) begin\n      q_reg <= 8'h5a;\n"));
		Ok(())
	}

	#[test]
	fn invalid_names_are_rejected() {
		let mut stage = simple_stage();
		stage.module = "1stage".into();
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::InvalidName(name)) if name == "1stage"
		));
	}

	#[test]
	fn register_errors() {
		let mut stage = simple_stage();
		stage.registers = vec![register("x", "q", None)];
		assert!(matches!(build_stage(&stage, Flavor::Verilog), Err(StageError::UnknownPort(..))));

		let mut stage = simple_stage();
		stage.registers = vec![register("q", "d", None)];
		assert!(matches!(build_stage(&stage, Flavor::Verilog), Err(StageError::NotAnOutput(..))));

		let mut stage = simple_stage();
		stage.ports[1].width = 4;
		assert!(matches!(build_stage(&stage, Flavor::Verilog), Err(StageError::WidthMismatch { .. })));

		let mut stage = simple_stage();
		stage.registers[0].reset_value = Some(1);
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::ResetValueWithoutReset(..))
		));

		let mut stage = simple_stage();
		stage.ports.push(port(Direction::Input, "clk", 1));
		assert!(matches!(build_stage(&stage, Flavor::Verilog), Err(StageError::DuplicatePort(..))));
	}

	#[test]
	fn generated_names_must_be_unique() {
		let mut stage = simple_stage();
		stage.ports.push(port(Direction::Input, "e", 8));
		stage.registers.push(register("e", "q", None));
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::DuplicateRegister(name)) if name == "q"
		));

		let mut stage = simple_stage();
		stage.ports.push(port(Direction::Input, "q_reg", 8));
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::DuplicatePort(name)) if name == "q_reg"
		));

		let mut stage = simple_stage();
		stage.reset = Some(ResetDescription {
			signal: "clk".into(),
			active_low: false,
			asynchronous: true,
		});
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::DuplicatePort(name)) if name == "clk"
		));
	}

	#[test]
	fn oversized_reset_value() {
		let mut stage = simple_stage();
		stage.reset = Some(ResetDescription {
			signal: "rst".into(),
			active_low: false,
			asynchronous: false,
		});
		stage.registers[0].reset_value = Some(256);
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::Vast(VastError::ValueDoesNotFit { .. }))
		));
	}

	#[test]
	fn zero_width_port() {
		let mut stage = simple_stage();
		stage.registers.clear();
		stage.ports.push(port(Direction::Input, "nothing", 0));
		assert!(matches!(
			build_stage(&stage, Flavor::Verilog),
			Err(StageError::Vast(VastError::ZeroWidthPort(..)))
		));
	}

	#[test]
	fn stage_from_json() {
		let stage: StageDescription = serde_json::from_str(
			r#"{
				"module": "pipe",
				"clock": "clk",
				"reset": {"signal": "rst"},
				"ports": [
					{"direction": "input", "name": "a", "width": 1},
					{"direction": "output", "name": "b", "width": 1}
				],
				"registers": [{"input": "a", "output": "b", "reset_value": 1}]
			}"#,
		)
		.unwrap();
		let reset = stage.reset.as_ref().unwrap();
		assert!(!reset.active_low);
		assert!(!reset.asynchronous);
		assert_eq!(stage.registers[0].reset_value, Some(1));
	}
}
