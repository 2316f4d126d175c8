use super::{DataType, ExprId};

/// Declaration keyword
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataKind {
	Wire,
	Reg,
	Logic,
}

impl DataKind {
	pub fn keyword(self) -> &'static str {
		match self {
			DataKind::Wire => "wire",
			DataKind::Reg => "reg",
			DataKind::Logic => "logic",
		}
	}
}

/// Bound of one unpacked array dimension
#[derive(Clone, Copy, Debug)]
pub enum UnpackedArrayBound {
	/// `[size]`
	Size(ExprId),

	/// `[hi:lo]`
	Range(ExprId, ExprId),
}

/// Named signal declaration
#[derive(Clone, Debug)]
pub struct Def {
	pub name: String,
	pub kind: DataKind,
	pub data_type: DataType,

	/// Initial value (`= expr`). Only meaningful for `reg` and `logic`.
	pub init: Option<ExprId>,

	/// Unpacked array dimensions, outermost first
	pub unpacked_bounds: Vec<UnpackedArrayBound>,
}

impl Def {
	pub fn new(name: &str, kind: DataKind, data_type: DataType) -> Self {
		Self {
			name: name.into(),
			kind,
			data_type,
			init: None,
			unpacked_bounds: vec![],
		}
	}

	pub fn wire(name: &str, data_type: DataType) -> Self {
		Self::new(name, DataKind::Wire, data_type)
	}

	pub fn reg(name: &str, data_type: DataType, init: Option<ExprId>) -> Self {
		Self {
			init,
			..Self::new(name, DataKind::Reg, data_type)
		}
	}

	pub fn logic(name: &str, data_type: DataType, init: Option<ExprId>) -> Self {
		Self {
			init,
			..Self::new(name, DataKind::Logic, data_type)
		}
	}

	pub fn unpacked_array(name: &str, kind: DataKind, data_type: DataType, bounds: &[UnpackedArrayBound]) -> Self {
		assert!(!bounds.is_empty(), "unpacked array '{}' needs at least one bound", name);
		Self {
			unpacked_bounds: bounds.to_vec(),
			..Self::new(name, kind, data_type)
		}
	}
}
