mod indent;
pub mod verilog_emitter;
mod verilog_expr;
mod verilog_stmt;

pub use verilog_emitter::VerilogEmitter;

use crate::ast::ModuleId;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum EmitError {
	#[error(transparent)]
	FormatError(#[from] fmt::Error),

	#[error("Invalid module ID")]
	InvalidModuleId(ModuleId),
}

/// Renders modules and files into a text sink
pub trait Codegen {
	fn emit_module(&mut self, w: &mut dyn fmt::Write, module: ModuleId) -> Result<(), EmitError>;
	fn emit_file(&mut self, w: &mut dyn fmt::Write) -> Result<(), EmitError>;
}
