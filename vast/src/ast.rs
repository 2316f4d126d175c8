pub mod bits;
pub mod data_type;
pub mod def;
pub mod expression;
pub mod literal;
pub mod module;
pub mod port;
pub mod procedure;
pub mod statement;
pub mod utils;
pub mod vast_error;

pub use bits::Bits;
pub use data_type::DataType;
pub use def::{DataKind, Def, UnpackedArrayBound};
pub use expression::{precedence, BinaryOp, Expression, UnaryOp};
pub use literal::{FormatPreference, Literal};
pub use module::{
	Connection, Function, FunctionHandle, Instantiation, LocalParam, LocalParamHandle, Module, ModuleHandle,
	ModuleMember, Section, SectionHandle,
};
pub use port::{get_input_bits, get_output_bits, Direction, Port, PortDescriptor};
pub use procedure::{AlwaysFlop, AlwaysFlopHandle, ProcedureKind, Reset, SensitivityListElement, StructuredProcedure};
pub use statement::{
	BlockHandle, Case, CaseArm, CaseHandle, CaseLabel, Conditional, ConditionalHandle, Statement, StatementBlock,
};
pub use utils::{is_identifier_valid, sanitize_identifier};
pub use vast_error::VastError;

use log::trace;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::arena::{define_id, Arena, ArenaId};
use crate::emit::VerilogEmitter;

define_id!(
	/// References an expression in a file
	ExprId
);
define_id!(
	/// References a statement in a file
	StmtId
);
define_id!(
	/// References a statement block in a file
	BlockId
);
define_id!(
	/// References a wire/reg/logic declaration in a file
	DefId
);
define_id!(
	/// References a module section in a file
	SectionId
);
define_id!(
	/// References a module in a file
	ModuleId
);
define_id!(
	/// References a clocked register block in a file
	FlopId
);
define_id!(
	/// References a localparam declaration in a file
	LocalParamId
);
define_id!(
	/// References a function definition in a file
	FunctionId
);

/// Top-level member of a file
#[derive(Clone, Debug)]
pub enum FileMember {
	/// `` `include "path"``
	Include(String),
	Module(ModuleId),
}

/// Storage for every node of one output file.
///
/// Nodes are created once and live as long as the file does.
#[derive(Debug, Default)]
pub struct FileCore {
	exprs: Arena<ExprId, Expression>,
	stmts: Arena<StmtId, Statement>,
	blocks: Arena<BlockId, StatementBlock>,
	defs: Arena<DefId, Def>,
	sections: Arena<SectionId, Section>,
	modules: Arena<ModuleId, Module>,
	flops: Arena<FlopId, AlwaysFlop>,
	local_params: Arena<LocalParamId, LocalParam>,
	functions: Arena<FunctionId, Function>,
	members: Vec<FileMember>,
}

impl FileCore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn make_expr(&mut self, expr: Expression) -> ExprId {
		let id = self.exprs.alloc(expr);
		trace!("New expression {:?}", id);
		id
	}

	pub fn make_stmt(&mut self, stmt: Statement) -> StmtId {
		self.stmts.alloc(stmt)
	}

	pub fn make_block(&mut self) -> BlockId {
		self.blocks.alloc(StatementBlock::default())
	}

	pub fn make_def(&mut self, def: Def) -> DefId {
		trace!("New declaration '{}'", def.name);
		self.defs.alloc(def)
	}

	pub fn make_section(&mut self) -> SectionId {
		self.sections.alloc(Section::default())
	}

	pub fn make_flop(&mut self, flop: AlwaysFlop) -> FlopId {
		self.flops.alloc(flop)
	}

	pub fn make_local_param(&mut self) -> LocalParamId {
		self.local_params.alloc(LocalParam::default())
	}

	pub fn make_function(&mut self, function: Function) -> FunctionId {
		self.functions.alloc(function)
	}

	pub fn make_module(&mut self, name: &str) -> ModuleId {
		let top = self.make_section();
		let id = self.modules.alloc(Module::new(name, top));
		self.members.push(FileMember::Module(id));
		id
	}

	pub fn add_include(&mut self, path: &str) {
		self.members.push(FileMember::Include(path.into()));
	}

	/// Creates a reference expression to a declaration
	pub fn logic_ref(&mut self, def: DefId) -> ExprId {
		self.make_expr(Expression::LogicRef(def))
	}

	pub fn expr(&self, id: ExprId) -> &Expression {
		self.exprs.get(id)
	}

	pub fn stmt(&self, id: StmtId) -> &Statement {
		self.stmts.get(id)
	}

	pub fn stmt_mut(&mut self, id: StmtId) -> &mut Statement {
		self.stmts.get_mut(id)
	}

	pub fn block(&self, id: BlockId) -> &StatementBlock {
		self.blocks.get(id)
	}

	pub fn block_mut(&mut self, id: BlockId) -> &mut StatementBlock {
		self.blocks.get_mut(id)
	}

	pub fn def(&self, id: DefId) -> &Def {
		self.defs.get(id)
	}

	pub fn section(&self, id: SectionId) -> &Section {
		self.sections.get(id)
	}

	pub fn section_mut(&mut self, id: SectionId) -> &mut Section {
		self.sections.get_mut(id)
	}

	pub fn module(&self, id: ModuleId) -> &Module {
		self.modules.get(id)
	}

	pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
		self.modules.get_mut(id)
	}

	pub fn has_module(&self, id: ModuleId) -> bool {
		id.index() < self.modules.len()
	}

	pub fn flop(&self, id: FlopId) -> &AlwaysFlop {
		self.flops.get(id)
	}

	pub fn local_param(&self, id: LocalParamId) -> &LocalParam {
		self.local_params.get(id)
	}

	pub fn local_param_mut(&mut self, id: LocalParamId) -> &mut LocalParam {
		self.local_params.get_mut(id)
	}

	pub fn function(&self, id: FunctionId) -> &Function {
		self.functions.get(id)
	}

	pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
		self.functions.get_mut(id)
	}

	pub fn members(&self) -> &[FileMember] {
		&self.members
	}

	/// Appends a statement to a block
	pub fn push_stmt(&mut self, block: BlockId, stmt: Statement) -> StmtId {
		let id = self.make_stmt(stmt);
		self.block_mut(block).statements.push(id);
		id
	}

	/// Checks if the expression refers to a single-bit, non-array declaration.
	/// Only such subjects get the scalar indexing treatment.
	pub fn is_scalar_subject(&self, expr: ExprId) -> bool {
		match self.expr(expr) {
			Expression::LogicRef(def) => {
				let def = self.def(*def);
				def.data_type.is_scalar() && def.unpacked_bounds.is_empty()
			},
			_ => false,
		}
	}
}

/// Shared handle to the storage of one file
pub type FileHandle = Rc<RefCell<FileCore>>;

/// A Verilog/SystemVerilog source file under construction.
///
/// All nodes are created through the file (or through handles obtained from it)
/// and are released together when the last handle is dropped.
#[derive(Clone, Default)]
pub struct VerilogFile {
	handle: FileHandle,
}

impl VerilogFile {
	pub fn new() -> Self {
		Self {
			handle: Rc::new(RefCell::new(FileCore::new())),
		}
	}

	pub fn handle(&self) -> FileHandle {
		self.handle.clone()
	}

	pub fn borrow(&self) -> Ref<FileCore> {
		self.handle.borrow()
	}

	fn borrow_mut(&self) -> RefMut<FileCore> {
		self.handle.borrow_mut()
	}

	/// Adds a module at the end of the file and returns a handle to it
	pub fn add_module(&self, name: &str) -> ModuleHandle {
		let id = self.borrow_mut().make_module(name);
		ModuleHandle::new(self.handle(), id)
	}

	/// Returns a handle to a module previously added to this file
	pub fn module(&self, id: ModuleId) -> ModuleHandle {
		ModuleHandle::new(self.handle(), id)
	}

	pub fn add_include(&self, path: &str) {
		self.borrow_mut().add_include(path)
	}

	pub fn make_expr(&self, expr: Expression) -> ExprId {
		self.borrow_mut().make_expr(expr)
	}

	/// Creates a free-standing statement, e.g. the body of `forever` or `repeat`
	pub fn make_statement(&self, stmt: Statement) -> StmtId {
		self.borrow_mut().make_stmt(stmt)
	}

	/// Creates a free-standing statement block
	pub fn make_block(&self) -> BlockHandle {
		let id = self.borrow_mut().make_block();
		BlockHandle::new(self.handle(), id)
	}

	pub fn literal(&self, bits: Bits, format: FormatPreference) -> ExprId {
		self.literal_with_bit_count(bits, format, true)
	}

	pub fn literal_with_bit_count(&self, bits: Bits, format: FormatPreference, emit_bit_count: bool) -> ExprId {
		self.make_expr(Expression::Literal(Literal::new(bits, format, emit_bit_count)))
	}

	/// 32-bit literal rendered as a bare decimal numeral
	pub fn plain_literal(&self, value: u32) -> ExprId {
		self.literal_with_bit_count(Bits::ubits(value.into(), 32), FormatPreference::Default, false)
	}

	pub fn decimal_literal(&self, value: u64, width: u64) -> ExprId {
		self.literal(Bits::ubits(value, width), FormatPreference::Decimal)
	}

	pub fn hex_literal(&self, value: u64, width: u64) -> ExprId {
		self.literal(Bits::ubits(value, width), FormatPreference::Hex)
	}

	pub fn bin_literal(&self, value: u64, width: u64) -> ExprId {
		self.literal(Bits::ubits(value, width), FormatPreference::Binary)
	}

	pub fn x_sentinel(&self, width: u64) -> ExprId {
		self.make_expr(Expression::XSentinel { width })
	}

	pub fn quoted_string(&self, text: &str) -> ExprId {
		self.make_expr(Expression::QuotedString(text.into()))
	}

	pub fn macro_ref(&self, name: &str) -> ExprId {
		self.make_expr(Expression::MacroRef(name.into()))
	}

	pub fn unary(&self, op: UnaryOp, arg: ExprId) -> ExprId {
		self.make_expr(Expression::Unary { op, arg })
	}

	pub fn binary(&self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.make_expr(Expression::BinaryInfix { op, lhs, rhs })
	}

	pub fn negate(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::Negate, arg)
	}

	pub fn logical_not(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::LogicalNot, arg)
	}

	pub fn bitwise_not(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::BitwiseNot, arg)
	}

	pub fn and_reduce(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::ReductionAnd, arg)
	}

	pub fn or_reduce(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::ReductionOr, arg)
	}

	pub fn xor_reduce(&self, arg: ExprId) -> ExprId {
		self.unary(UnaryOp::ReductionXor, arg)
	}

	pub fn add(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Add, lhs, rhs)
	}

	pub fn sub(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Subtract, lhs, rhs)
	}

	pub fn mul(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Multiply, lhs, rhs)
	}

	pub fn div(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Divide, lhs, rhs)
	}

	pub fn modulo(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Modulo, lhs, rhs)
	}

	pub fn power(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Power, lhs, rhs)
	}

	pub fn shll(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::ShiftLeft, lhs, rhs)
	}

	pub fn shrl(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::ShiftRightLogical, lhs, rhs)
	}

	pub fn shra(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::ShiftRightArithmetic, lhs, rhs)
	}

	pub fn equals(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Equal, lhs, rhs)
	}

	pub fn not_equals(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::NotEqual, lhs, rhs)
	}

	pub fn less_than(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Less, lhs, rhs)
	}

	pub fn less_than_equal(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::LessEqual, lhs, rhs)
	}

	pub fn greater_than(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::Greater, lhs, rhs)
	}

	pub fn greater_than_equal(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::GreaterEqual, lhs, rhs)
	}

	pub fn bitwise_and(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::BitwiseAnd, lhs, rhs)
	}

	pub fn bitwise_or(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::BitwiseOr, lhs, rhs)
	}

	pub fn bitwise_xor(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::BitwiseXor, lhs, rhs)
	}

	pub fn logical_and(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::LogicalAnd, lhs, rhs)
	}

	pub fn logical_or(&self, lhs: ExprId, rhs: ExprId) -> ExprId {
		self.binary(BinaryOp::LogicalOr, lhs, rhs)
	}

	pub fn ternary(&self, test: ExprId, consequent: ExprId, alternate: ExprId) -> ExprId {
		self.make_expr(Expression::Ternary {
			test,
			consequent,
			alternate,
		})
	}

	pub fn concat(&self, args: &[ExprId]) -> ExprId {
		self.make_expr(Expression::Concat {
			replication: None,
			args: args.to_vec(),
		})
	}

	/// `{count{args...}}`
	pub fn replicated_concat(&self, count: ExprId, args: &[ExprId]) -> ExprId {
		self.make_expr(Expression::Concat {
			replication: Some(count),
			args: args.to_vec(),
		})
	}

	pub fn array_assignment_pattern(&self, args: &[ExprId]) -> ExprId {
		self.make_expr(Expression::ArrayAssignmentPattern(args.to_vec()))
	}

	pub fn slice(&self, subject: ExprId, hi: ExprId, lo: ExprId) -> ExprId {
		self.make_expr(Expression::Slice { subject, hi, lo })
	}

	/// Slice with plain literal bounds
	pub fn slice_const(&self, subject: ExprId, hi: u32, lo: u32) -> ExprId {
		let hi = self.plain_literal(hi);
		let lo = self.plain_literal(lo);
		self.slice(subject, hi, lo)
	}

	pub fn part_select(&self, subject: ExprId, start: ExprId, width: ExprId) -> ExprId {
		self.make_expr(Expression::PartSelect { subject, start, width })
	}

	pub fn index(&self, subject: ExprId, index: ExprId) -> ExprId {
		self.make_expr(Expression::Index { subject, index })
	}

	/// Index with a plain literal
	pub fn index_const(&self, subject: ExprId, index: u32) -> ExprId {
		let index = self.plain_literal(index);
		self.index(subject, index)
	}

	pub fn system_function_call(&self, name: &str, args: Option<&[ExprId]>) -> ExprId {
		self.make_expr(Expression::SystemFunctionCall {
			name: name.into(),
			args: args.map(|args| args.to_vec()),
		})
	}

	pub fn function_call(&self, function: FunctionId, args: &[ExprId]) -> ExprId {
		self.make_expr(Expression::FunctionCall {
			function,
			args: args.to_vec(),
		})
	}

	pub fn posedge(&self, expr: ExprId) -> ExprId {
		self.make_expr(Expression::PosEdge(expr))
	}

	pub fn negedge(&self, expr: ExprId) -> ExprId {
		self.make_expr(Expression::NegEdge(expr))
	}

	pub fn scalar_type(&self) -> DataType {
		DataType::scalar()
	}

	/// Unsigned type of the given width. One bit wide types are scalar.
	///
	/// # Panics
	///
	/// Panics if `bit_count` is zero.
	pub fn data_type_of_width(&self, bit_count: u32) -> DataType {
		assert!(bit_count > 0, "data type width must be positive");
		if bit_count == 1 {
			DataType::scalar()
		}
		else {
			DataType::new(Some(self.plain_literal(bit_count)), false)
		}
	}

	/// Bit vector type with an explicit width, even for one bit
	pub fn bit_vector_type(&self, bit_count: u32, is_signed: bool) -> DataType {
		DataType::new(Some(self.plain_literal(bit_count)), is_signed)
	}

	/// Packed array of `dims` (outermost first) with elements `element_width` bits wide
	pub fn packed_array_type(&self, element_width: u32, dims: &[u32], is_signed: bool) -> DataType {
		let width = self.plain_literal(element_width);
		let dims = dims.iter().map(|dim| self.plain_literal(*dim)).collect();
		DataType::with_packed_dims(width, dims, is_signed)
	}

	/// Renders the complete file
	pub fn emit(&self) -> String {
		VerilogEmitter::new(&self.borrow()).render_file()
	}

	/// Renders a single expression, mostly useful for diagnostics
	pub fn emit_expression(&self, expr: ExprId) -> String {
		VerilogEmitter::new(&self.borrow()).emit_expression(expr)
	}

	pub fn emit_block(&self, block: BlockId) -> String {
		VerilogEmitter::new(&self.borrow()).emit_block(block)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn file_members_keep_insertion_order() {
		let f = VerilogFile::new();
		f.add_include("defs.vh");
		let a = f.add_module("a");
		f.add_include("more.vh");
		let b = f.add_module("b");

		let core = f.borrow();
		let members = core.members();
		assert_eq!(members.len(), 4);
		assert!(matches!(&members[0], FileMember::Include(path) if path == "defs.vh"));
		assert!(matches!(&members[1], FileMember::Module(id) if *id == a.id()));
		assert!(matches!(&members[2], FileMember::Include(path) if path == "more.vh"));
		assert!(matches!(&members[3], FileMember::Module(id) if *id == b.id()));
	}

	#[test]
	fn data_type_of_width_one_is_scalar() {
		let f = VerilogFile::new();
		assert!(f.data_type_of_width(1).is_scalar());
		assert!(!f.data_type_of_width(2).is_scalar());
		assert!(!f.bit_vector_type(1, false).is_scalar());
	}

	#[test]
	fn literal_widths_resolve() -> Result<(), VastError> {
		let f = VerilogFile::new();
		let ty = f.packed_array_type(8, &[3, 4], false);
		assert_eq!(ty.width_as_int64(&f.borrow())?, 8);
		assert_eq!(ty.flat_bit_count_as_int64(&f.borrow())?, 96);
		assert_eq!(f.scalar_type().flat_bit_count_as_int64(&f.borrow())?, 1);
		Ok(())
	}

	#[test]
	fn widths_beyond_i64_are_rejected() {
		let f = VerilogFile::new();
		let ty = DataType::new(Some(f.hex_literal(u64::MAX, 64)), false);
		assert!(matches!(
			ty.width_as_int64(&f.borrow()),
			Err(VastError::ValueTooLarge { ref value }) if value == "18446744073709551615"
		));
		assert!(matches!(
			ty.flat_bit_count_as_int64(&f.borrow()),
			Err(VastError::ValueTooLarge { .. })
		));
	}

	#[test]
	fn flat_bit_count_overflow_is_an_error() {
		let f = VerilogFile::new();
		let ty = f.packed_array_type(u32::MAX, &[u32::MAX, u32::MAX], false);
		assert_eq!(ty.flat_bit_count_as_int64(&f.borrow()), Err(VastError::BitCountOverflow));
	}

	#[test]
	fn symbolic_widths_do_not_resolve() {
		let f = VerilogFile::new();
		let width = f.macro_ref("WIDTH");
		let ty = DataType::new(Some(width), false);
		let err = ty.width_as_int64(&f.borrow());
		assert!(matches!(err, Err(VastError::NonLiteralWidth(ref text)) if text == "`WIDTH"));

		let dim = f.macro_ref("DEPTH");
		let eight = f.plain_literal(8);
		let ty = DataType::with_packed_dims(eight, vec![dim], false);
		assert_eq!(ty.width_as_int64(&f.borrow()).ok(), Some(8));
		assert!(matches!(
			ty.flat_bit_count_as_int64(&f.borrow()),
			Err(VastError::NonLiteralDimension(..))
		));
	}
}
