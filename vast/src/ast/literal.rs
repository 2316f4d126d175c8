use super::Bits;

/// Preferred radix of a rendered literal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatPreference {
	/// Bare decimal numeral without a width prefix. Only legal up to 32 bits.
	Default,
	Decimal,
	Binary,
	Hex,
}

/// Numeric literal
#[derive(Clone, Debug)]
pub struct Literal {
	pub bits: Bits,
	pub format: FormatPreference,
	pub emit_bit_count: bool,
}

impl Literal {
	pub fn new(bits: Bits, format: FormatPreference, emit_bit_count: bool) -> Self {
		Self {
			bits,
			format,
			emit_bit_count,
		}
	}

	pub fn is_literal_with_value(&self, target: i64) -> bool {
		self.bits.to_i64() == Some(target)
	}

	/// Renders the literal text.
	///
	/// # Panics
	///
	/// Panics when a default-format literal is wider than 32 bits.
	pub fn emit(&self) -> String {
		let width = self.bits.width();
		match self.format {
			FormatPreference::Default => {
				assert!(
					width <= 32,
					"default-format literal must be at most 32 bits wide, got {} bits",
					width
				);
				self.bits.to_decimal_string()
			},
			FormatPreference::Decimal => match self.emit_bit_count {
				true => format!("{}'d{}", width, self.bits.to_decimal_string()),
				false => self.bits.to_decimal_string(),
			},

			// Padded digits without a radix would read as decimal, so the prefix stays
			FormatPreference::Binary => format!("{}'b{}", width, self.bits.to_binary_digits()),
			FormatPreference::Hex => format!("{}'h{}", width, self.bits.to_hex_digits()),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(42, 8, FormatPreference::Default, true, "42")]
	#[case(42, 8, FormatPreference::Decimal, true, "8'd42")]
	#[case(42, 8, FormatPreference::Decimal, false, "42")]
	#[case(5, 8, FormatPreference::Binary, true, "8'b00000101")]
	#[case(5, 8, FormatPreference::Hex, true, "8'h05")]
	#[case(0x1f, 13, FormatPreference::Hex, true, "13'h001f")]
	#[case(0, 1, FormatPreference::Binary, true, "1'b0")]
	#[case(5, 4, FormatPreference::Binary, false, "4'b0101")]
	#[case(5, 12, FormatPreference::Hex, false, "12'h005")]
	#[case(0xdead_beef, 32, FormatPreference::Hex, true, "32'hdeadbeef")]
	#[case(0xdead_beef, 32, FormatPreference::Default, true, "3735928559")]
	fn literal_text(
		#[case] value: u64,
		#[case] width: u64,
		#[case] format: FormatPreference,
		#[case] emit_bit_count: bool,
		#[case] expected: &str,
	) {
		let literal = Literal::new(Bits::ubits(value, width), format, emit_bit_count);
		assert_eq!(literal.emit(), expected);
	}

	#[test]
	fn negative_values_render_as_twos_complement() {
		let literal = Literal::new(Bits::sbits(-3, 8), FormatPreference::Hex, true);
		assert_eq!(literal.emit(), "8'hfd");
	}

	#[test]
	#[should_panic(expected = "at most 32 bits")]
	fn wide_default_literal_is_fatal() {
		Literal::new(Bits::ubits(1, 33), FormatPreference::Default, false).emit();
	}

	#[test]
	fn literal_value_check() {
		let literal = Literal::new(Bits::ubits(0, 4), FormatPreference::Default, false);
		assert!(literal.is_literal_with_value(0));
		assert!(!literal.is_literal_with_value(1));
	}
}
