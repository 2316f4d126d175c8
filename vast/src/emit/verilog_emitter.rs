use super::indent::indent;
use super::{Codegen, EmitError};
use crate::ast::{
	Connection, DataType, DefId, FileCore, FileMember, Instantiation, LocalParamId, ModuleId, ModuleMember, SectionId,
	UnpackedArrayBound,
};
use log::debug;
use std::fmt;

/// Renders the nodes of one file as Verilog/SystemVerilog text
pub struct VerilogEmitter<'a> {
	pub(super) file: &'a FileCore,
}

impl<'a> VerilogEmitter<'a> {
	pub fn new(file: &'a FileCore) -> Self {
		Self { file }
	}

	/// Renders ` signed`, the `[W-1:0]` range and one range per packed dimension
	pub fn emit_data_type(&self, data_type: &DataType) -> String {
		let mut result = match data_type.is_signed {
			true => " signed".to_string(),
			false => String::new(),
		};

		if let Some(width) = data_type.width {
			result.push_str(&format!(" [{}:0]", self.width_to_limit(width)));
		}

		for dim in &data_type.packed_dims {
			result.push_str(&format!("[{}:0]", self.width_to_limit(*dim)));
		}
		result
	}

	/// Renders a declaration without unpacked bounds, initializer and semicolon,
	/// as used in port lists and function arguments
	pub fn emit_def_no_semi(&self, def: DefId) -> String {
		let def = self.file.def(def);
		format!("{}{} {}", def.kind.keyword(), self.emit_data_type(&def.data_type), def.name)
	}

	fn emit_unpacked_bounds(&self, bounds: &[UnpackedArrayBound]) -> String {
		bounds
			.iter()
			.map(|bound| match bound {
				UnpackedArrayBound::Size(size) => format!("[{}]", self.emit_expression(*size)),
				UnpackedArrayBound::Range(hi, lo) => {
					format!("[{}:{}]", self.emit_expression(*hi), self.emit_expression(*lo))
				},
			})
			.collect()
	}

	/// Renders a complete declaration statement
	pub fn emit_def(&self, id: DefId) -> String {
		let def = self.file.def(id);
		let mut result = self.emit_def_no_semi(id);
		result.push_str(&self.emit_unpacked_bounds(&def.unpacked_bounds));
		if let Some(init) = def.init {
			result.push_str(&format!(" = {}", self.emit_expression(init)));
		}
		result.push(';');
		result
	}

	fn emit_local_param(&self, id: LocalParamId) -> String {
		let items: Vec<String> = self
			.file
			.local_param(id)
			.items
			.iter()
			.map(|(name, value)| format!("{} = {}", name, self.emit_expression(*value)))
			.collect();

		match items.len() {
			0 => panic!("localparam declaration has no items"),
			1 => format!("localparam {};", items[0]),
			_ => format!("localparam\n{};", indent(&items.join(",\n"))),
		}
	}

	fn emit_connections(&self, connections: &[Connection]) -> String {
		connections
			.iter()
			.map(|conn| format!(".{}({})", conn.port_name, self.emit_expression(conn.expression)))
			.collect::<Vec<_>>()
			.join(",\n")
	}

	fn emit_instantiation(&self, inst: &Instantiation) -> String {
		let mut result = format!("{} ", inst.module_name);
		if !inst.parameters.is_empty() {
			result.push_str(&format!("#(\n{}\n) ", indent(&self.emit_connections(&inst.parameters))));
		}
		result.push_str(&format!(
			"{} (\n{}\n);",
			inst.instance_name,
			indent(&self.emit_connections(&inst.connections))
		));
		result
	}

	fn emit_module_member(&self, member: &ModuleMember) -> String {
		use ModuleMember::*;
		match member {
			Def(def) => self.emit_def(*def),
			Parameter { name, rhs } => format!("parameter {} = {};", name, self.emit_expression(*rhs)),
			LocalParam(id) => self.emit_local_param(*id),
			Instantiation(inst) => self.emit_instantiation(inst),
			ContinuousAssignment { lhs, rhs } => {
				format!("assign {} = {};", self.emit_expression(*lhs), self.emit_expression(*rhs))
			},
			Comment(text) => format!("// {}", text.replace('\n', "\n// ")),
			BlankLine => String::new(),
			Raw(text) => text.clone(),
			Procedure(procedure) => self.emit_procedure(procedure),
			AlwaysFlop(id) => self.emit_always_flop(*id),
			Function(id) => self.emit_function(*id),
			Section(id) => self.emit_section(*id),
		}
	}

	/// Renders the members of a section and all its nested sections, one per line
	pub fn emit_section(&self, id: SectionId) -> String {
		self.file
			.gather_members(id)
			.into_iter()
			.map(|member| self.emit_module_member(member))
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// Renders a module from `module` to `endmodule`
	pub fn render_module(&self, id: ModuleId) -> String {
		let module = self.file.module(id);
		debug!("Emitting module '{}'", module.name);

		let mut result = format!("module {}", module.name);
		if module.ports.is_empty() {
			result.push_str(";\n");
		}
		else {
			let ports = module
				.ports
				.iter()
				.map(|port| format!("{} {}", port.direction.keyword(), self.emit_def_no_semi(port.def)))
				.collect::<Vec<_>>()
				.join(",\n");
			result.push_str(&format!("(\n{}\n);\n", indent(&ports)));
		}

		result.push_str(&indent(&self.emit_section(module.top)));
		result.push_str("\nendmodule");
		result
	}

	/// Renders every file member in order, each followed by a newline
	pub fn render_file(&self) -> String {
		debug!("Emitting file with {} members", self.file.members().len());
		let mut result = String::new();
		for member in self.file.members() {
			match member {
				FileMember::Include(path) => result.push_str(&format!("`include \"{}\"", path)),
				FileMember::Module(id) => result.push_str(&self.render_module(*id)),
			}
			result.push('\n');
		}
		result
	}
}

impl<'a> Codegen for VerilogEmitter<'a> {
	fn emit_module(&mut self, w: &mut dyn fmt::Write, module: ModuleId) -> Result<(), EmitError> {
		if !self.file.has_module(module) {
			return Err(EmitError::InvalidModuleId(module));
		}
		writeln!(w, "{}", self.render_module(module))?;
		Ok(())
	}

	fn emit_file(&mut self, w: &mut dyn fmt::Write) -> Result<(), EmitError> {
		write!(w, "{}", self.render_file())?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ast::{Bits, DataKind, Def, Direction, Expression, FormatPreference, PortDescriptor, VastError, VerilogFile};

	#[test]
	fn module_with_ports() {
		let f = VerilogFile::new();
		let mut m = f.add_module("main");
		m.add_input("in", f.data_type_of_width(32));
		m.add_output("out", f.scalar_type());
		assert_eq!(
			f.emit(),
			"module main(\n  input wire [31:0] in,\n  output wire out\n);\n\nendmodule\n"
		);
	}

	#[test]
	fn module_without_ports() {
		let f = VerilogFile::new();
		f.add_module("empty");
		assert_eq!(f.emit(), "module empty;\n\nendmodule\n");
	}

	#[test]
	fn adder_port_order() {
		let f = VerilogFile::new();
		let mut m = f.add_module("adder");
		let a = m.add_input("a", f.data_type_of_width(8));
		let b = m.add_input("b", f.data_type_of_width(8));
		let sum = m.add_output("sum", f.data_type_of_width(8));
		let rhs = f.add(a, b);
		m.add_continuous_assignment(sum, rhs);

		assert_eq!(
			f.emit(),
			"module adder(\n  input wire [7:0] a,\n  input wire [7:0] b,\n  output wire [7:0] sum\n);\n  assign sum = a + \
			 b;\nendmodule\n"
		);
	}

	#[test]
	fn includes_and_modules_in_order() {
		let f = VerilogFile::new();
		f.add_include("defs.vh");
		f.add_module("a");
		f.add_module("b");
		assert_eq!(
			f.emit(),
			"`include \"defs.vh\"\nmodule a;\n\nendmodule\nmodule b;\n\nendmodule\n"
		);
	}

	#[test]
	fn declarations() {
		let f = VerilogFile::new();
		let m = f.add_module("decls");
		let mut top = m.top();
		let init = f.hex_literal(0xa5, 8);
		top.add_wire("w", f.bit_vector_type(1, false));
		top.add_reg("r", f.bit_vector_type(8, true), Some(init));
		top.add_logic("l", f.packed_array_type(8, &[4, 2], false), None);
		let width = f.macro_ref("WIDTH");
		top.add_wire("p", DataType::new(Some(width), false));

		assert_eq!(
			f.emit(),
			"module decls;\n  wire [0:0] w;\n  reg signed [7:0] r = 8'ha5;\n  logic [7:0][3:0][1:0] l;\n  wire [`WIDTH - \
			 1:0] p;\nendmodule\n"
		);
	}

	#[test]
	fn unpacked_arrays() {
		let f = VerilogFile::new();
		let m = f.add_module("mem");
		let mut top = m.top();
		let four = f.plain_literal(4);
		let eight = f.plain_literal(8);
		top.add_unpacked_array_reg(
			"sized",
			f.data_type_of_width(16),
			&[UnpackedArrayBound::Size(four), UnpackedArrayBound::Size(eight)],
			None,
		);

		let zero = f.plain_literal(0);
		let three = f.plain_literal(3);
		let seven = f.plain_literal(7);
		top.add_unpacked_array_wire(
			"ranged",
			f.data_type_of_width(16),
			&[
				UnpackedArrayBound::Range(zero, three),
				UnpackedArrayBound::Range(zero, seven),
			],
		);

		let text = f.emit();
		assert!(text.contains("  reg [15:0] sized[4][8];\n"));
		assert!(text.contains("  wire [15:0] ranged[0:3][0:7];\n"));
	}

	#[test]
	fn unpacked_array_element_select_is_not_scalar() {
		let f = VerilogFile::new();
		let m = f.add_module("mem");
		let four = f.plain_literal(4);
		let bits = m
			.top()
			.add_unpacked_array_reg("bits", f.scalar_type(), &[UnpackedArrayBound::Size(four)], None);
		assert_eq!(f.emit_expression(f.index_const(bits, 2)), "bits[2]");
	}

	#[test]
	fn parameters_and_local_params() {
		let f = VerilogFile::new();
		let mut m = f.add_module("params");
		let sixteen = f.plain_literal(16);
		let width = m.add_parameter("WIDTH", sixteen);

		let mut single = m.top().add_local_param();
		let one = f.plain_literal(1);
		single.add_item("ONE", one);

		let mut multi = m.top().add_local_param();
		let idle = multi.add_item("IDLE", f.bin_literal(0, 2));
		multi.add_item("BUSY", f.bin_literal(1, 2));

		let total = f.mul(width, f.plain_literal(2));
		m.add_wire("data", DataType::new(Some(total), false));
		m.add_reg("state", f.data_type_of_width(2), Some(idle));

		assert_eq!(
			f.emit(),
			"module params;\n  parameter WIDTH = 16;\n  localparam ONE = 1;\n  localparam\n    IDLE = 2'b00,\n    BUSY = \
			 2'b01;\n  wire [WIDTH * 2 - 1:0] data;\n  reg [1:0] state = IDLE;\nendmodule\n"
		);
	}

	#[test]
	fn comments_blank_lines_and_raw_text() {
		let f = VerilogFile::new();
		let m = f.add_module("c");
		let mut top = m.top();
		top.add_comment("first\nsecond");
		top.add_blank_line();
		top.add_raw("`default_nettype none");
		assert_eq!(
			f.emit(),
			"module c;\n  // first\n  // second\n\n  `default_nettype none\nendmodule\n"
		);
	}

	#[test]
	fn instantiation() {
		let f = VerilogFile::new();
		let mut m = f.add_module("top");
		let x = m.add_input("x", f.data_type_of_width(8));
		let y = m.add_output("y", f.data_type_of_width(8));
		let eight = f.plain_literal(8);
		m.add_instantiation(
			"child",
			"child_0",
			vec![Connection::new("WIDTH", eight)],
			vec![Connection::new("in", x), Connection::new("out", y)],
		);
		m.add_instantiation("leaf", "leaf_0", vec![], vec![Connection::new("in", x)]);

		let text = f.emit();
		assert!(text.contains("  child #(\n    .WIDTH(8)\n  ) child_0 (\n    .in(x),\n    .out(y)\n  );\n"));
		assert!(text.contains("  leaf leaf_0 (\n    .in(x)\n  );\n"));
	}

	#[test]
	fn sections_keep_placement() {
		let f = VerilogFile::new();
		let mut m = f.add_module("s");
		let mut decls = m.add_section();
		let mut logic = m.add_section();
		let mut nested = decls.add_section();

		let a = decls.add_wire("a", f.scalar_type());
		logic.add_comment("logic");
		let b = nested.add_wire("b", f.scalar_type());
		decls.add_wire("c", f.scalar_type());
		logic.add_continuous_assignment(a, b);

		assert_eq!(
			f.emit(),
			"module s;\n  wire b;\n  wire a;\n  wire c;\n  // logic\n  assign a = b;\nendmodule\n"
		);
	}

	#[test]
	fn codegen_trait_writes_to_sink() -> Result<(), EmitError> {
		let f = VerilogFile::new();
		let m = f.add_module("m");
		let core = f.borrow();
		let mut emitter = VerilogEmitter::new(&core);

		let mut out = String::new();
		emitter.emit_module(&mut out, m.id())?;
		assert_eq!(out, "module m;\n\nendmodule\n");

		let mut out = String::new();
		emitter.emit_file(&mut out)?;
		assert_eq!(out, "module m;\n\nendmodule\n");
		Ok(())
	}

	#[test]
	fn port_from_descriptor_emits_like_builder() -> Result<(), VastError> {
		let f = VerilogFile::new();
		let mut m = f.add_module("p");
		m.add_port(&PortDescriptor {
			direction: Direction::Input,
			name: "d".into(),
			width: 4,
		})?;
		m.add_port(&PortDescriptor {
			direction: Direction::Output,
			name: "q".into(),
			width: 1,
		})?;
		assert_eq!(
			f.emit(),
			"module p(\n  input wire [3:0] d,\n  output wire q\n);\n\nendmodule\n"
		);
		Ok(())
	}

	#[test]
	fn def_emission() {
		let f = VerilogFile::new();
		let init = f.literal(Bits::ubits(3, 4), FormatPreference::Decimal);
		let handle = f.handle();
		let def = {
			let mut core = handle.borrow_mut();
			let dt = DataType::new(Some(core.make_expr(Expression::MacroRef("W".into()))), false);
			let mut def = Def::new("x", DataKind::Logic, dt);
			def.init = Some(init);
			core.make_def(def)
		};
		let core = f.borrow();
		let emitter = VerilogEmitter::new(&core);
		assert_eq!(emitter.emit_def_no_semi(def), "logic [`W - 1:0] x");
		assert_eq!(emitter.emit_def(def), "logic [`W - 1:0] x = 4'd3;");
	}
}
