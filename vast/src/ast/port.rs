use serde::{Deserialize, Serialize};

use super::{Bits, DataType, Def, DefId, Expression, FileCore, FormatPreference, Literal, VastError};

/// Port direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Input,
	Output,
}

impl Direction {
	pub fn keyword(self) -> &'static str {
		match self {
			Direction::Input => "input",
			Direction::Output => "output",
		}
	}
}

/// Port description exchanged with other compiler stages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
	pub direction: Direction,
	pub name: String,
	pub width: u32,
}

/// Module port: a direction plus the wire declaration naming and typing it
#[derive(Clone, Copy, Debug)]
pub struct Port {
	pub direction: Direction,
	pub def: DefId,
}

impl Port {
	/// Declares the wire described by `descriptor`.
	/// One bit wide ports become scalar wires.
	pub fn from_descriptor(descriptor: &PortDescriptor, core: &mut FileCore) -> Result<Self, VastError> {
		let data_type = match descriptor.width {
			0 => return Err(VastError::ZeroWidthPort(descriptor.name.clone())),
			1 => DataType::scalar(),
			width => {
				let width = core.make_expr(Expression::Literal(Literal::new(
					Bits::ubits(width.into(), 32),
					FormatPreference::Default,
					false,
				)));
				DataType::new(Some(width), false)
			},
		};

		let def = core.make_def(Def::wire(&descriptor.name, data_type));
		Ok(Self {
			direction: descriptor.direction,
			def,
		})
	}

	/// Describes the port. Fails when its width is not a literal.
	pub fn to_descriptor(&self, core: &FileCore) -> Result<PortDescriptor, VastError> {
		let def = core.def(self.def);
		let width = def.data_type.flat_bit_count_as_int64(core)?;
		Ok(PortDescriptor {
			direction: self.direction,
			name: def.name.clone(),
			width: u32::try_from(width).map_err(|_| VastError::ValueTooLarge {
				value: width.to_string(),
			})?,
		})
	}

	pub fn name<'a>(&self, core: &'a FileCore) -> &'a str {
		&core.def(self.def).name
	}
}

fn bits_for_direction(ports: &[Port], direction: Direction, core: &FileCore) -> Result<i64, VastError> {
	let mut result: i64 = 0;
	for port in ports.iter().filter(|port| port.direction == direction) {
		let bits = core.def(port.def).data_type.flat_bit_count_as_int64(core)?;
		result = result.checked_add(bits).ok_or(VastError::BitCountOverflow)?;
	}
	Ok(result)
}

/// Total width of all input ports
pub fn get_input_bits(ports: &[Port], core: &FileCore) -> Result<i64, VastError> {
	bits_for_direction(ports, Direction::Input, core)
}

/// Total width of all output ports
pub fn get_output_bits(ports: &[Port], core: &FileCore) -> Result<i64, VastError> {
	bits_for_direction(ports, Direction::Output, core)
}
