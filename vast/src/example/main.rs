extern crate vast;
use vast::ast::{CaseLabel, Connection, Direction, PortDescriptor, SensitivityListElement};
use std::error::Error;
use vast::{Codegen, Reset, VerilogEmitter, VerilogFile};

fn main() -> Result<(), Box<dyn Error>> {
	let f = VerilogFile::new();

	let mut counter = f.add_module("counter");
	let clk = counter.add_input("clk", f.scalar_type());
	let rst_n = counter.add_input("rst_n", f.scalar_type());
	let count = counter.add_output("count", f.data_type_of_width(8));
	let count_reg = counter.add_reg("count_reg", f.data_type_of_width(8), None);

	let mut flop = counter.add_always_flop(
		clk,
		Some(Reset {
			signal: rst_n,
			asynchronous: true,
			active_low: true,
		}),
	);
	let one = f.decimal_literal(1, 8);
	flop.add_register(count_reg, f.add(count_reg, one), Some(f.hex_literal(0, 8)));
	counter.add_continuous_assignment(count, count_reg);

	let mut top = f.add_module("top");
	let top_clk = top.add_input("clk", f.scalar_type());
	let top_rst_n = top.add_input("rst_n", f.scalar_type());
	let sel = top.add_port(&PortDescriptor {
		direction: Direction::Input,
		name: "sel".into(),
		width: 2,
	})?;
	let out = top.add_output("out", f.data_type_of_width(8));
	let value = top.add_wire("value", f.data_type_of_width(8));
	top.add_instantiation(
		"counter",
		"counter_0",
		vec![],
		vec![
			Connection::new("clk", top_clk),
			Connection::new("rst_n", top_rst_n),
			Connection::new("count", value),
		],
	);

	let out_reg = top.add_reg("out_reg", f.data_type_of_width(8), None);
	let mut comb = top.top().add_always(vec![SensitivityListElement::Implicit]);
	let mut case = comb.add_case(sel);
	case.add_arm(CaseLabel::Expression(f.bin_literal(0, 2)))
		.add_blocking_assignment(out_reg, value);
	case.add_arm(CaseLabel::Expression(f.bin_literal(1, 2)))
		.add_blocking_assignment(out_reg, f.bitwise_not(value));
	case.add_arm(CaseLabel::Default)
		.add_blocking_assignment(out_reg, f.hex_literal(0, 8));
	top.add_continuous_assignment(out, out_reg);

	let mut source = String::new();
	let core = f.borrow();
	let mut cg = VerilogEmitter::new(&core);
	cg.emit_file(&mut source)?;

	println!("{}", source);

	Ok(())
}
