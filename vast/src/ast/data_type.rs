use super::{ExprId, FileCore, Literal, VastError};
use crate::emit::VerilogEmitter;

fn literal_as_i64(literal: &Literal) -> Result<i64, VastError> {
	let value = literal.bits.to_u64()?;
	i64::try_from(value).map_err(|_| VastError::ValueTooLarge {
		value: value.to_string(),
	})
}

/// Shape of a declared signal: bit width, signedness and packed dimensions
#[derive(Clone, Debug, Default)]
pub struct DataType {
	/// Bit width. `None` means a single-bit (scalar) signal.
	pub width: Option<ExprId>,

	pub is_signed: bool,

	/// Packed array dimensions, outermost first
	pub packed_dims: Vec<ExprId>,
}

impl DataType {
	/// Single-bit type
	pub fn scalar() -> Self {
		Self::default()
	}

	pub fn new(width: Option<ExprId>, is_signed: bool) -> Self {
		Self {
			width,
			is_signed,
			packed_dims: vec![],
		}
	}

	pub fn with_packed_dims(width: ExprId, packed_dims: Vec<ExprId>, is_signed: bool) -> Self {
		Self {
			width: Some(width),
			is_signed,
			packed_dims,
		}
	}

	pub fn is_scalar(&self) -> bool {
		self.width.is_none() && self.packed_dims.is_empty()
	}

	/// Resolves the width to an integer. Only literal widths can be resolved.
	pub fn width_as_int64(&self, file: &FileCore) -> Result<i64, VastError> {
		let width = match self.width {
			None => return Ok(1),
			Some(width) => width,
		};

		match file.expr(width).as_literal() {
			Some(literal) => literal_as_i64(literal),
			None => Err(VastError::NonLiteralWidth(VerilogEmitter::new(file).emit_expression(width))),
		}
	}

	/// Total number of bits including all packed dimensions
	pub fn flat_bit_count_as_int64(&self, file: &FileCore) -> Result<i64, VastError> {
		let mut bit_count = self.width_as_int64(file)?;
		for dim in &self.packed_dims {
			let dim_size = match file.expr(*dim).as_literal() {
				Some(literal) => literal_as_i64(literal)?,
				None => return Err(VastError::NonLiteralDimension(VerilogEmitter::new(file).emit_expression(*dim))),
			};
			bit_count = bit_count.checked_mul(dim_size).ok_or(VastError::BitCountOverflow)?;
		}
		Ok(bit_count)
	}
}
