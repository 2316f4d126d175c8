use super::VerilogEmitter;
use crate::ast::{precedence, ExprId, Expression};

fn paren_wrap(text: String) -> String {
	format!("({})", text)
}

impl<'a> VerilogEmitter<'a> {
	fn precedence_of(&self, expr: ExprId) -> i64 {
		self.file.expr(expr).precedence()
	}

	fn join_expressions(&self, exprs: &[ExprId]) -> String {
		exprs
			.iter()
			.map(|expr| self.emit_expression(*expr))
			.collect::<Vec<_>>()
			.join(", ")
	}

	/// Equal precedence operators associate to the left, so the left operand
	/// is wrapped only when it binds strictly looser than the operator.
	pub(super) fn emit_binary_lhs(&self, lhs: ExprId, op_precedence: i64) -> String {
		match self.precedence_of(lhs) < op_precedence {
			true => paren_wrap(self.emit_expression(lhs)),
			false => self.emit_expression(lhs),
		}
	}

	pub(super) fn emit_binary_rhs(&self, rhs: ExprId, op_precedence: i64) -> String {
		match self.precedence_of(rhs) <= op_precedence {
			true => paren_wrap(self.emit_expression(rhs)),
			false => self.emit_expression(rhs),
		}
	}

	fn emit_ternary_operand(&self, expr: ExprId) -> String {
		match self.precedence_of(expr) <= precedence::TERNARY {
			true => paren_wrap(self.emit_expression(expr)),
			false => self.emit_expression(expr),
		}
	}

	/// Selecting from a scalar is not valid Verilog, so a scalar subject
	/// may only be selected at bit zero and is rendered bare.
	fn emit_select(&self, subject: ExprId, bounds: &[ExprId], select: String) -> String {
		if self.file.is_scalar_subject(subject) {
			for bound in bounds {
				assert!(
					self.file.expr(*bound).is_literal_with_value(0),
					"scalar '{}' selected with non-zero bound: {}{}",
					self.emit_expression(subject),
					self.emit_expression(subject),
					select
				);
			}
			return self.emit_expression(subject);
		}
		format!("{}{}", self.emit_expression(subject), select)
	}

	/// Renders an expression with the minimal parenthesization
	/// that preserves its tree structure
	pub fn emit_expression(&self, expr: ExprId) -> String {
		use Expression::*;
		match self.file.expr(expr) {
			Literal(literal) => literal.emit(),
			LogicRef(def) => self.file.def(*def).name.clone(),
			ParameterRef(name) | LocalParamItemRef(name) => name.clone(),
			MacroRef(name) => format!("`{}", name),

			// Nested unary operators are always wrapped, `--x` confuses some tools
			Unary { op, arg } => {
				let arg_text = self.emit_expression(*arg);
				let arg_expr = self.file.expr(*arg);
				match arg_expr.precedence() < precedence::UNARY || arg_expr.is_unary() {
					true => format!("{}{}", op.symbol(), paren_wrap(arg_text)),
					false => format!("{}{}", op.symbol(), arg_text),
				}
			},

			BinaryInfix { op, lhs, rhs } => format!(
				"{} {} {}",
				self.emit_binary_lhs(*lhs, op.precedence()),
				op.symbol(),
				self.emit_binary_rhs(*rhs, op.precedence())
			),

			Ternary {
				test,
				consequent,
				alternate,
			} => format!(
				"{} ? {} : {}",
				self.emit_ternary_operand(*test),
				self.emit_ternary_operand(*consequent),
				self.emit_ternary_operand(*alternate)
			),

			Concat { replication, args } => {
				let args_text = format!("{{{}}}", self.join_expressions(args));
				match replication {
					Some(count) => format!("{{{}{}}}", self.emit_expression(*count), args_text),
					None => args_text,
				}
			},

			Slice { subject, hi, lo } => self.emit_select(
				*subject,
				&[*hi, *lo],
				format!("[{}:{}]", self.emit_expression(*hi), self.emit_expression(*lo)),
			),

			PartSelect { subject, start, width } => format!(
				"{}[{} +: {}]",
				self.emit_expression(*subject),
				self.emit_expression(*start),
				self.emit_expression(*width)
			),

			Index { subject, index } => {
				self.emit_select(*subject, &[*index], format!("[{}]", self.emit_expression(*index)))
			},

			ArrayAssignmentPattern(args) => format!("'{{{}}}", self.join_expressions(args)),
			QuotedString(text) => format!("\"{}\"", text),

			SystemFunctionCall { name, args } => match args {
				Some(args) => format!("${}({})", name, self.join_expressions(args)),
				None => format!("${}", name),
			},

			FunctionCall { function, args } => format!(
				"{}({})",
				self.file.function(*function).name,
				self.join_expressions(args)
			),

			PosEdge(expr) => format!("posedge {}", self.emit_expression(*expr)),
			NegEdge(expr) => format!("negedge {}", self.emit_expression(*expr)),
			XSentinel { width } => format!("{}'dx", width),
		}
	}

	/// Renders `width - 1`, folding the subtraction for literal widths
	pub(super) fn width_to_limit(&self, width: ExprId) -> String {
		if let Some(literal) = self.file.expr(width).as_literal() {
			if let Ok(value) = literal.bits.to_u64() {
				if value > 0 {
					return (value - 1).to_string();
				}
			}
		}
		format!("{} - 1", self.emit_binary_lhs(width, precedence::ADDITIVE))
	}
}

#[cfg(test)]
mod test {
	use crate::ast::{Bits, Expression, FormatPreference, UnaryOp, VerilogFile};
	use rstest::rstest;

	#[test]
	fn right_nested_subtraction_is_wrapped() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let a = m.add_input("a", f.data_type_of_width(8));
		let b = m.add_input("b", f.data_type_of_width(8));
		let c = m.add_input("c", f.data_type_of_width(8));

		let right = f.sub(b, c);
		let expr = f.sub(a, right);
		assert_eq!(f.emit_expression(expr), "a - (b - c)");

		let left = f.sub(a, b);
		let expr = f.sub(left, c);
		assert_eq!(f.emit_expression(expr), "a - b - c");
	}

	#[test]
	fn mixed_precedence() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let a = m.add_input("a", f.data_type_of_width(8));
		let b = m.add_input("b", f.data_type_of_width(8));
		let c = m.add_input("c", f.data_type_of_width(8));

		let sum = f.add(a, b);
		assert_eq!(f.emit_expression(f.mul(sum, c)), "(a + b) * c");

		let product = f.mul(a, b);
		assert_eq!(f.emit_expression(f.add(product, c)), "a * b + c");
		assert_eq!(f.emit_expression(f.add(c, product)), "c + a * b");

		let lt = f.less_than(a, b);
		let eq = f.equals(c, a);
		assert_eq!(f.emit_expression(f.logical_and(lt, eq)), "a < b && c == a");

		let or = f.bitwise_or(a, b);
		assert_eq!(f.emit_expression(f.bitwise_and(or, c)), "(a | b) & c");
	}

	#[test]
	fn nested_unary_is_wrapped() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let x = m.add_input("x", f.data_type_of_width(4));

		let neg = f.negate(x);
		assert_eq!(f.emit_expression(neg), "-x");
		assert_eq!(f.emit_expression(f.negate(neg)), "-(-x)");
		assert_eq!(f.emit_expression(f.unary(UnaryOp::LogicalNot, f.and_reduce(x))), "!(&x)");

		let sum = f.add(x, x);
		assert_eq!(f.emit_expression(f.bitwise_not(sum)), "~(x + x)");
	}

	#[test]
	fn ternary_operands() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let s = m.add_input("s", f.scalar_type());
		let t = m.add_input("t", f.scalar_type());
		let a = m.add_input("a", f.data_type_of_width(8));
		let b = m.add_input("b", f.data_type_of_width(8));

		let sum = f.add(a, b);
		let inner = f.ternary(t, a, b);
		let outer = f.ternary(s, sum, inner);
		assert_eq!(f.emit_expression(outer), "s ? a + b : (t ? a : b)");

		let test = f.logical_or(s, t);
		assert_eq!(f.emit_expression(f.ternary(test, a, b)), "s || t ? a : b");
	}

	#[test]
	fn scalar_selects_render_bare() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let bit = m.add_input("bit", f.scalar_type());
		let word = m.add_input("word", f.data_type_of_width(8));

		assert_eq!(f.emit_expression(f.index_const(bit, 0)), "bit");
		assert_eq!(f.emit_expression(f.slice_const(bit, 0, 0)), "bit");
		assert_eq!(f.emit_expression(f.index_const(word, 0)), "word[0]");
		assert_eq!(f.emit_expression(f.slice_const(word, 7, 4)), "word[7:4]");

		let start = f.plain_literal(2);
		let width = f.plain_literal(3);
		assert_eq!(f.emit_expression(f.part_select(word, start, width)), "word[2 +: 3]");
	}

	#[test]
	#[should_panic(expected = "non-zero bound")]
	fn scalar_index_at_one_panics() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let bit = m.add_input("bit", f.scalar_type());
		f.emit_expression(f.index_const(bit, 1));
	}

	#[test]
	#[should_panic(expected = "non-zero bound")]
	fn scalar_slice_above_zero_panics() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let bit = m.add_input("bit", f.scalar_type());
		f.emit_expression(f.slice_const(bit, 1, 0));
	}

	#[test]
	fn primaries() {
		let f = VerilogFile::new();
		let mut m = f.add_module("m");
		let a = m.add_input("a", f.data_type_of_width(8));
		let b = m.add_input("b", f.data_type_of_width(8));
		let three = f.plain_literal(3);

		assert_eq!(f.emit_expression(f.concat(&[a, b])), "{a, b}");
		assert_eq!(f.emit_expression(f.replicated_concat(three, &[a, b])), "{3{a, b}}");
		assert_eq!(f.emit_expression(f.array_assignment_pattern(&[a, b])), "'{a, b}");
		assert_eq!(f.emit_expression(f.x_sentinel(8)), "8'dx");
		assert_eq!(f.emit_expression(f.quoted_string("hello")), "\"hello\"");
		assert_eq!(f.emit_expression(f.macro_ref("WIDTH")), "`WIDTH");
		assert_eq!(f.emit_expression(f.system_function_call("time", None)), "$time");
		assert_eq!(f.emit_expression(f.system_function_call("signed", Some(&[a]))), "$signed(a)");
		assert_eq!(f.emit_expression(f.posedge(a)), "posedge a");
		assert_eq!(f.emit_expression(f.negedge(b)), "negedge b");
	}

	#[rstest]
	#[case(FormatPreference::Hex, true, "8'hff")]
	#[case(FormatPreference::Binary, true, "8'b11111111")]
	#[case(FormatPreference::Decimal, true, "8'd255")]
	#[case(FormatPreference::Decimal, false, "255")]
	fn literal_expressions(#[case] format: FormatPreference, #[case] bit_count: bool, #[case] expected: &str) {
		let f = VerilogFile::new();
		let literal = f.literal_with_bit_count(Bits::ubits(255, 8), format, bit_count);
		assert_eq!(f.emit_expression(literal), expected);
	}

	#[test]
	fn width_limits() {
		let f = VerilogFile::new();
		let emitter_text = |width| {
			let core = f.borrow();
			super::VerilogEmitter::new(&core).width_to_limit(width)
		};

		assert_eq!(emitter_text(f.plain_literal(32)), "31");
		assert_eq!(emitter_text(f.macro_ref("WIDTH")), "`WIDTH - 1");

		let n = f.make_expr(Expression::ParameterRef("N".into()));
		let two = f.plain_literal(2);
		assert_eq!(emitter_text(f.mul(n, two)), "N * 2 - 1");
		assert_eq!(emitter_text(f.add(n, two)), "N + 2 - 1");
		assert_eq!(emitter_text(f.shll(n, two)), "(N << 2) - 1");
	}
}
