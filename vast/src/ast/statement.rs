use super::{BlockId, ExprId, FileHandle, StmtId};

/// Ordered `begin ... end` group of statements
#[derive(Clone, Debug, Default)]
pub struct StatementBlock {
	pub statements: Vec<StmtId>,
}

/// `if`/`else if`/`else` chain
#[derive(Clone, Debug)]
pub struct Conditional {
	pub condition: ExprId,
	pub consequent: BlockId,

	/// Alternates in order. A `None` condition is the final `else`.
	pub alternates: Vec<(Option<ExprId>, BlockId)>,
}

impl Conditional {
	/// Checks whether an unconditional `else` has already been added
	pub fn has_else(&self) -> bool {
		matches!(self.alternates.last(), Some((None, _)))
	}
}

/// Label of a case arm
#[derive(Clone, Copy, Debug)]
pub enum CaseLabel {
	Expression(ExprId),
	Default,
}

#[derive(Clone, Debug)]
pub struct CaseArm {
	pub label: CaseLabel,
	pub block: BlockId,
}

/// `case` statement
#[derive(Clone, Debug)]
pub struct Case {
	pub subject: ExprId,
	pub arms: Vec<CaseArm>,
}

/// Procedural statement
#[derive(Clone, Debug)]
pub enum Statement {
	/// `lhs = rhs;`
	BlockingAssignment { lhs: ExprId, rhs: ExprId },

	/// `lhs <= rhs;`
	NonblockingAssignment { lhs: ExprId, rhs: ExprId },

	Conditional(Conditional),
	Case(Case),

	While { condition: ExprId, body: BlockId },

	/// `repeat (count) statement;` - the body is a single, non-block statement
	Repeat { count: ExprId, statement: StmtId },

	Forever(StmtId),

	/// `@(event);`
	EventControl(ExprId),

	/// `#delay;` or `#delay statement`
	Delay { delay: ExprId, statement: Option<StmtId> },

	/// `wait(event);`
	Wait(ExprId),

	/// `$name(args);`
	SystemTaskCall { name: String, args: Option<Vec<ExprId>> },

	/// `assert (condition) else $fatal(0, "message");`
	Assert { condition: ExprId, message: String },

	Comment(String),
	BlankLine,

	/// Verbatim text
	Raw(String),

	/// Nested `begin ... end`
	Block(BlockId),
}

/// Builder handle for a statement block
#[derive(Clone)]
pub struct BlockHandle {
	file: FileHandle,
	id: BlockId,
}

impl BlockHandle {
	pub(crate) fn new(file: FileHandle, id: BlockId) -> Self {
		Self { file, id }
	}

	pub fn id(&self) -> BlockId {
		self.id
	}

	/// Number of statements in the block
	pub fn len(&self) -> usize {
		self.file.borrow().block(self.id).statements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends a statement
	pub fn add(&mut self, stmt: Statement) -> StmtId {
		self.file.borrow_mut().push_stmt(self.id, stmt)
	}

	pub fn add_blocking_assignment(&mut self, lhs: ExprId, rhs: ExprId) -> StmtId {
		self.add(Statement::BlockingAssignment { lhs, rhs })
	}

	pub fn add_nonblocking_assignment(&mut self, lhs: ExprId, rhs: ExprId) -> StmtId {
		self.add(Statement::NonblockingAssignment { lhs, rhs })
	}

	pub fn add_comment(&mut self, text: &str) -> StmtId {
		self.add(Statement::Comment(text.into()))
	}

	pub fn add_blank_line(&mut self) -> StmtId {
		self.add(Statement::BlankLine)
	}

	pub fn add_raw(&mut self, text: &str) -> StmtId {
		self.add(Statement::Raw(text.into()))
	}

	/// Adds an `if` statement and returns a handle for filling in its branches
	pub fn add_conditional(&mut self, condition: ExprId) -> ConditionalHandle {
		let mut core = self.file.borrow_mut();
		let consequent = core.make_block();
		let stmt = core.push_stmt(
			self.id,
			Statement::Conditional(Conditional {
				condition,
				consequent,
				alternates: vec![],
			}),
		);
		drop(core);
		ConditionalHandle::new(self.file.clone(), stmt)
	}

	pub fn add_case(&mut self, subject: ExprId) -> CaseHandle {
		let stmt = self
			.file
			.borrow_mut()
			.push_stmt(self.id, Statement::Case(Case { subject, arms: vec![] }));
		CaseHandle::new(self.file.clone(), stmt)
	}

	/// Adds a `while` loop and returns its body
	pub fn add_while(&mut self, condition: ExprId) -> BlockHandle {
		let mut core = self.file.borrow_mut();
		let body = core.make_block();
		core.push_stmt(self.id, Statement::While { condition, body });
		drop(core);
		BlockHandle::new(self.file.clone(), body)
	}

	/// Adds a `repeat` loop around a single statement.
	///
	/// # Panics
	///
	/// Panics if `statement` is a block.
	pub fn add_repeat(&mut self, count: ExprId, statement: StmtId) -> StmtId {
		assert!(
			!matches!(self.file.borrow().stmt(statement), Statement::Block(..)),
			"repeat body must be a single statement, not a block"
		);
		self.add(Statement::Repeat { count, statement })
	}

	pub fn add_forever(&mut self, statement: StmtId) -> StmtId {
		self.add(Statement::Forever(statement))
	}

	pub fn add_event_control(&mut self, event: ExprId) -> StmtId {
		self.add(Statement::EventControl(event))
	}

	pub fn add_delay(&mut self, delay: ExprId, statement: Option<StmtId>) -> StmtId {
		self.add(Statement::Delay { delay, statement })
	}

	pub fn add_wait(&mut self, event: ExprId) -> StmtId {
		self.add(Statement::Wait(event))
	}

	pub fn add_system_task_call(&mut self, name: &str, args: Option<&[ExprId]>) -> StmtId {
		self.add(Statement::SystemTaskCall {
			name: name.into(),
			args: args.map(|args| args.to_vec()),
		})
	}

	pub fn add_assert(&mut self, condition: ExprId, message: &str) -> StmtId {
		self.add(Statement::Assert {
			condition,
			message: message.into(),
		})
	}

	/// Adds a nested `begin ... end` block
	pub fn add_block(&mut self) -> BlockHandle {
		let mut core = self.file.borrow_mut();
		let block = core.make_block();
		core.push_stmt(self.id, Statement::Block(block));
		drop(core);
		BlockHandle::new(self.file.clone(), block)
	}
}

/// Builder handle for an `if` statement
#[derive(Clone)]
pub struct ConditionalHandle {
	file: FileHandle,
	stmt: StmtId,
}

impl ConditionalHandle {
	pub(crate) fn new(file: FileHandle, stmt: StmtId) -> Self {
		Self { file, stmt }
	}

	pub fn stmt(&self) -> StmtId {
		self.stmt
	}

	/// Block executed when the condition holds
	pub fn consequent(&self) -> BlockHandle {
		let block = match self.file.borrow().stmt(self.stmt) {
			Statement::Conditional(conditional) => conditional.consequent,
			_ => unreachable!("conditional handle must point to a conditional"),
		};
		BlockHandle::new(self.file.clone(), block)
	}

	/// Adds an `else if (condition)` branch
	pub fn add_else_if(&mut self, condition: ExprId) -> BlockHandle {
		self.add_alternate(Some(condition))
	}

	/// Adds the final `else` branch
	pub fn add_else(&mut self) -> BlockHandle {
		self.add_alternate(None)
	}

	/// # Panics
	///
	/// Panics if an unconditional `else` has already been added.
	pub fn add_alternate(&mut self, condition: Option<ExprId>) -> BlockHandle {
		let mut core = self.file.borrow_mut();
		let block = core.make_block();
		match core.stmt_mut(self.stmt) {
			Statement::Conditional(conditional) => {
				assert!(
					!conditional.has_else(),
					"cannot add an alternate after the unconditional else"
				);
				conditional.alternates.push((condition, block));
			},
			_ => unreachable!("conditional handle must point to a conditional"),
		}
		drop(core);
		BlockHandle::new(self.file.clone(), block)
	}
}

/// Builder handle for a `case` statement
#[derive(Clone)]
pub struct CaseHandle {
	file: FileHandle,
	stmt: StmtId,
}

impl CaseHandle {
	pub(crate) fn new(file: FileHandle, stmt: StmtId) -> Self {
		Self { file, stmt }
	}

	pub fn stmt(&self) -> StmtId {
		self.stmt
	}

	/// Adds an arm and returns its statement block
	pub fn add_arm(&mut self, label: CaseLabel) -> BlockHandle {
		let mut core = self.file.borrow_mut();
		let block = core.make_block();
		match core.stmt_mut(self.stmt) {
			Statement::Case(case) => case.arms.push(CaseArm { label, block }),
			_ => unreachable!("case handle must point to a case statement"),
		}
		drop(core);
		BlockHandle::new(self.file.clone(), block)
	}
}
