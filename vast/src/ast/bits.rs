use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use super::VastError;

/// Fixed-width bit pattern backing literals
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bits {
	value: BigUint,
	width: u64,
}

impl Bits {
	/// Creates a bit pattern, checking that the value fits in `width` bits
	pub fn new(value: BigUint, width: u64) -> Result<Self, VastError> {
		if value.bits() > width {
			return Err(VastError::ValueDoesNotFit {
				value: value.to_string(),
				width,
			});
		}
		Ok(Self { value, width })
	}

	/// Unsigned value of the given width.
	///
	/// # Panics
	///
	/// Panics if `value` needs more than `width` bits.
	pub fn ubits(value: u64, width: u64) -> Self {
		assert!(
			u64::BITS as u64 - value.leading_zeros() as u64 <= width,
			"value {} does not fit in {} bits",
			value,
			width
		);
		Self {
			value: value.into(),
			width,
		}
	}

	/// Two's complement pattern of a signed value.
	///
	/// # Panics
	///
	/// Panics if `value` is not representable as a `width`-bit signed number.
	pub fn sbits(value: i64, width: u64) -> Self {
		match Self::from_signed(&BigInt::from(value), width) {
			Ok(bits) => bits,
			Err(err) => panic!("{}", err),
		}
	}

	/// Two's complement pattern of an arbitrary-precision signed value
	pub fn from_signed(value: &BigInt, width: u64) -> Result<Self, VastError> {
		let out_of_range = || VastError::ValueDoesNotFit {
			value: value.to_string(),
			width,
		};

		if width == 0 {
			return if value.is_zero() {
				Ok(Self::zero(0))
			}
			else {
				Err(out_of_range())
			};
		}

		let modulus = BigInt::from(1) << width;
		let half = BigInt::from(1) << (width - 1);
		if *value >= half || *value < -half {
			return Err(out_of_range());
		}

		let pattern = if value.sign() == Sign::Minus {
			modulus + value
		}
		else {
			value.clone()
		};

		match pattern.to_biguint() {
			Some(value) => Ok(Self { value, width }),
			None => Err(out_of_range()),
		}
	}

	pub fn zero(width: u64) -> Self {
		Self {
			value: BigUint::zero(),
			width,
		}
	}

	pub fn width(&self) -> u64 {
		self.width
	}

	pub fn value(&self) -> &BigUint {
		&self.value
	}

	pub fn to_u64(&self) -> Result<u64, VastError> {
		self.value.to_u64().ok_or(VastError::ValueTooLarge {
			value: self.value.to_string(),
		})
	}

	/// Value interpreted as unsigned, if it fits in an `i64`
	pub fn to_i64(&self) -> Option<i64> {
		self.value.to_i64()
	}

	pub fn to_decimal_string(&self) -> String {
		self.value.to_str_radix(10)
	}

	/// Binary digits, zero-padded to the full width
	pub fn to_binary_digits(&self) -> String {
		let digits = self.value.to_str_radix(2);
		pad_left(digits, self.width as usize)
	}

	/// Hexadecimal digits, zero-padded to cover the full width
	pub fn to_hex_digits(&self) -> String {
		let digits = self.value.to_str_radix(16);
		pad_left(digits, self.width.div_ceil(4) as usize)
	}
}

fn pad_left(digits: String, len: usize) -> String {
	if digits.len() >= len {
		digits
	}
	else {
		format!("{}{}", "0".repeat(len - digits.len()), digits)
	}
}
