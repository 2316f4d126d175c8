use super::{DefId, ExprId, FunctionId, Literal};

/// Operator precedence levels. Higher values bind tighter.
pub mod precedence {
	pub const MAX: i64 = 13;
	pub const UNARY: i64 = 12;
	pub const POWER: i64 = 11;
	pub const MULTIPLICATIVE: i64 = 10;
	pub const ADDITIVE: i64 = 9;
	pub const SHIFT: i64 = 8;
	pub const RELATIONAL: i64 = 7;
	pub const EQUALITY: i64 = 6;
	pub const BITWISE_AND: i64 = 5;
	pub const BITWISE_XOR: i64 = 4;
	pub const BITWISE_OR: i64 = 3;
	pub const LOGICAL_AND: i64 = 2;
	pub const LOGICAL_OR: i64 = 1;
	pub const TERNARY: i64 = 0;
}

/// Unary operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
	Negate,
	LogicalNot,
	BitwiseNot,
	ReductionAnd,
	ReductionOr,
	ReductionXor,
}

impl UnaryOp {
	pub fn symbol(self) -> &'static str {
		use UnaryOp::*;
		match self {
			Negate => "-",
			LogicalNot => "!",
			BitwiseNot => "~",
			ReductionAnd => "&",
			ReductionOr => "|",
			ReductionXor => "^",
		}
	}
}

/// Binary infix operators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
	Power,
	Multiply,
	Divide,
	Modulo,
	Add,
	Subtract,
	ShiftLeft,
	ShiftRightLogical,
	ShiftRightArithmetic,
	Less,
	LessEqual,
	Greater,
	GreaterEqual,
	Equal,
	NotEqual,
	BitwiseAnd,
	BitwiseXor,
	BitwiseOr,
	LogicalAnd,
	LogicalOr,
}

impl BinaryOp {
	pub fn symbol(self) -> &'static str {
		use BinaryOp::*;
		match self {
			Power => "**",
			Multiply => "*",
			Divide => "/",
			Modulo => "%",
			Add => "+",
			Subtract => "-",
			ShiftLeft => "<<",
			ShiftRightLogical => ">>",
			ShiftRightArithmetic => ">>>",
			Less => "<",
			LessEqual => "<=",
			Greater => ">",
			GreaterEqual => ">=",
			Equal => "==",
			NotEqual => "!=",
			BitwiseAnd => "&",
			BitwiseXor => "^",
			BitwiseOr => "|",
			LogicalAnd => "&&",
			LogicalOr => "||",
		}
	}

	pub fn precedence(self) -> i64 {
		use BinaryOp::*;
		match self {
			Power => precedence::POWER,
			Multiply | Divide | Modulo => precedence::MULTIPLICATIVE,
			Add | Subtract => precedence::ADDITIVE,
			ShiftLeft | ShiftRightLogical | ShiftRightArithmetic => precedence::SHIFT,
			Less | LessEqual | Greater | GreaterEqual => precedence::RELATIONAL,
			Equal | NotEqual => precedence::EQUALITY,
			BitwiseAnd => precedence::BITWISE_AND,
			BitwiseXor => precedence::BITWISE_XOR,
			BitwiseOr => precedence::BITWISE_OR,
			LogicalAnd => precedence::LOGICAL_AND,
			LogicalOr => precedence::LOGICAL_OR,
		}
	}
}

/// Expression node
#[derive(Clone, Debug)]
pub enum Expression {
	Literal(Literal),

	/// Reference to a wire/reg/logic declaration
	LogicRef(DefId),

	/// Reference to a module parameter by name
	ParameterRef(String),

	/// Reference to a single localparam item by name
	LocalParamItemRef(String),

	/// Preprocessor macro reference (`` `NAME``)
	MacroRef(String),

	Unary {
		op: UnaryOp,
		arg: ExprId,
	},

	BinaryInfix {
		op: BinaryOp,
		lhs: ExprId,
		rhs: ExprId,
	},

	Ternary {
		test: ExprId,
		consequent: ExprId,
		alternate: ExprId,
	},

	/// `{a, b}` or `{n{a, b}}`
	Concat {
		replication: Option<ExprId>,
		args: Vec<ExprId>,
	},

	/// `subject[hi:lo]`
	Slice {
		subject: ExprId,
		hi: ExprId,
		lo: ExprId,
	},

	/// `subject[start +: width]`
	PartSelect {
		subject: ExprId,
		start: ExprId,
		width: ExprId,
	},

	/// `subject[index]`
	Index {
		subject: ExprId,
		index: ExprId,
	},

	/// `'{a, b, c}`
	ArrayAssignmentPattern(Vec<ExprId>),

	QuotedString(String),

	/// `$name(args)`, or `$name` when there is no argument list
	SystemFunctionCall {
		name: String,
		args: Option<Vec<ExprId>>,
	},

	/// Call of a function defined in some module of the file
	FunctionCall {
		function: FunctionId,
		args: Vec<ExprId>,
	},

	PosEdge(ExprId),
	NegEdge(ExprId),

	/// Unknown value of the given width (`<width>'dx`)
	XSentinel {
		width: u64,
	},
}

impl Expression {
	pub fn precedence(&self) -> i64 {
		match self {
			Expression::Unary { .. } => precedence::UNARY,
			Expression::BinaryInfix { op, .. } => op.precedence(),
			Expression::Ternary { .. } => precedence::TERNARY,
			_ => precedence::MAX,
		}
	}

	pub fn is_literal(&self) -> bool {
		matches!(self, Expression::Literal(..))
	}

	pub fn is_unary(&self) -> bool {
		matches!(self, Expression::Unary { .. })
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Expression::Literal(literal) => Some(literal),
			_ => None,
		}
	}

	/// Checks if the expression is a literal equal to `value`
	pub fn is_literal_with_value(&self, value: i64) -> bool {
		match self {
			Expression::Literal(literal) => literal.is_literal_with_value(value),
			_ => false,
		}
	}
}
