mod arena;
pub mod ast;
pub mod emit;

pub use ast::{
	BlockHandle, DataType, Direction, ExprId, ModuleHandle, ModuleId, PortDescriptor, Reset, SectionHandle, VastError,
	VerilogFile,
};
pub use emit::{Codegen, EmitError, VerilogEmitter};
