use super::{BlockHandle, BlockId, Conditional, ExprId, Expression, FileCore, FileHandle, FlopId, Statement, UnaryOp};

/// Entry of an `always` sensitivity list
#[derive(Clone, Copy, Debug)]
pub enum SensitivityListElement {
	/// `*`
	Implicit,
	PosEdge(ExprId),
	NegEdge(ExprId),
}

/// Flavour of a structured procedure
#[derive(Clone, Debug)]
pub enum ProcedureKind {
	Always(Vec<SensitivityListElement>),
	AlwaysFf(Vec<SensitivityListElement>),
	AlwaysComb,
	Initial,
}

impl ProcedureKind {
	pub fn keyword(&self) -> &'static str {
		match self {
			ProcedureKind::Always(..) => "always",
			ProcedureKind::AlwaysFf(..) => "always_ff",
			ProcedureKind::AlwaysComb => "always_comb",
			ProcedureKind::Initial => "initial",
		}
	}
}

/// `always`/`always_ff`/`always_comb`/`initial` block
#[derive(Clone, Debug)]
pub struct StructuredProcedure {
	pub kind: ProcedureKind,
	pub block: BlockId,
}

/// Reset signal of a register block
#[derive(Clone, Copy, Debug)]
pub struct Reset {
	pub signal: ExprId,
	pub asynchronous: bool,
	pub active_low: bool,
}

/// Clock-edge triggered block of registers with an optional reset
#[derive(Clone, Debug)]
pub struct AlwaysFlop {
	pub clk: ExprId,
	pub reset: Option<Reset>,
	pub top_block: BlockId,

	/// Block executed while reset is asserted. `None` without a reset.
	pub reset_block: Option<BlockId>,

	/// Block holding the next-value assignments
	pub assignment_block: BlockId,
}

impl AlwaysFlop {
	/// Builds the block skeleton. With a reset, the top block holds a single
	/// `if (reset) ... else ...` whose branches are the reset and assignment blocks.
	pub fn new(core: &mut FileCore, clk: ExprId, reset: Option<Reset>) -> Self {
		let top_block = core.make_block();
		match reset {
			Some(rst) => {
				let condition = if rst.active_low {
					core.make_expr(Expression::Unary {
						op: UnaryOp::LogicalNot,
						arg: rst.signal,
					})
				}
				else {
					rst.signal
				};

				let reset_block = core.make_block();
				let assignment_block = core.make_block();
				core.push_stmt(
					top_block,
					Statement::Conditional(Conditional {
						condition,
						consequent: reset_block,
						alternates: vec![(None, assignment_block)],
					}),
				);

				Self {
					clk,
					reset,
					top_block,
					reset_block: Some(reset_block),
					assignment_block,
				}
			},
			None => Self {
				clk,
				reset,
				top_block,
				reset_block: None,
				assignment_block: top_block,
			},
		}
	}
}

/// Builder handle for a register block
#[derive(Clone)]
pub struct AlwaysFlopHandle {
	file: FileHandle,
	id: FlopId,
}

impl AlwaysFlopHandle {
	pub(crate) fn new(file: FileHandle, id: FlopId) -> Self {
		Self { file, id }
	}

	pub fn id(&self) -> FlopId {
		self.id
	}

	/// Registers `reg <= next` and, with a reset value, `reg <= reset_value` in the reset branch.
	///
	/// # Panics
	///
	/// Panics if a reset value is given but the block was built without a reset.
	pub fn add_register(&mut self, reg: ExprId, next: ExprId, reset_value: Option<ExprId>) {
		let (reset_block, assignment_block) = {
			let core = self.file.borrow();
			let flop = core.flop(self.id);
			(flop.reset_block, flop.assignment_block)
		};

		let mut core = self.file.borrow_mut();
		if let Some(value) = reset_value {
			let reset_block = match reset_block {
				Some(block) => block,
				None => panic!("reset value given for a register in a block without reset"),
			};
			core.push_stmt(reset_block, Statement::NonblockingAssignment { lhs: reg, rhs: value });
		}
		core.push_stmt(assignment_block, Statement::NonblockingAssignment { lhs: reg, rhs: next });
	}

	/// Top-level statement block, e.g. for adding comments
	pub fn top_block(&self) -> BlockHandle {
		let block = self.file.borrow().flop(self.id).top_block;
		BlockHandle::new(self.file.clone(), block)
	}

	pub fn reset_block(&self) -> Option<BlockHandle> {
		let block = self.file.borrow().flop(self.id).reset_block;
		block.map(|block| BlockHandle::new(self.file.clone(), block))
	}

	pub fn assignment_block(&self) -> BlockHandle {
		let block = self.file.borrow().flop(self.id).assignment_block;
		BlockHandle::new(self.file.clone(), block)
	}
}
