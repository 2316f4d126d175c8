use super::indent::indent;
use super::VerilogEmitter;
use crate::ast::{
	precedence, BlockId, CaseLabel, FlopId, FunctionId, ProcedureKind, SensitivityListElement, Statement, StmtId,
	StructuredProcedure,
};

impl<'a> VerilogEmitter<'a> {
	/// Renders `begin ... end` with the statements indented one level
	pub fn emit_block(&self, id: BlockId) -> String {
		let statements = &self.file.block(id).statements;
		if statements.is_empty() {
			return "begin end".into();
		}

		let lines = statements
			.iter()
			.map(|stmt| self.emit_statement(*stmt))
			.collect::<Vec<_>>()
			.join("\n");
		format!("begin\n{}\nend", indent(&lines))
	}

	pub fn emit_statement(&self, id: StmtId) -> String {
		use Statement::*;
		match self.file.stmt(id) {
			BlockingAssignment { lhs, rhs } => {
				format!("{} = {};", self.emit_expression(*lhs), self.emit_expression(*rhs))
			},
			NonblockingAssignment { lhs, rhs } => {
				format!("{} <= {};", self.emit_expression(*lhs), self.emit_expression(*rhs))
			},

			Conditional(conditional) => {
				let mut result = format!(
					"if ({}) {}",
					self.emit_expression(conditional.condition),
					self.emit_block(conditional.consequent)
				);
				for (condition, block) in &conditional.alternates {
					result.push_str(" else ");
					if let Some(condition) = condition {
						result.push_str(&format!("if ({}) ", self.emit_expression(*condition)));
					}
					result.push_str(&self.emit_block(*block));
				}
				result
			},

			Case(case) => {
				let mut result = format!("case ({})\n", self.emit_expression(case.subject));
				for arm in &case.arms {
					let label = match arm.label {
						CaseLabel::Expression(expr) => self.emit_expression(expr),
						CaseLabel::Default => "default".into(),
					};
					result.push_str(&indent(&format!("{}: {}", label, self.emit_block(arm.block))));
					result.push('\n');
				}
				result.push_str("endcase");
				result
			},

			While { condition, body } => {
				format!("while ({}) {}", self.emit_expression(*condition), self.emit_block(*body))
			},
			Repeat { count, statement } => {
				format!("repeat ({}) {}", self.emit_expression(*count), self.emit_statement(*statement))
			},
			Forever(statement) => format!("forever {}", self.emit_statement(*statement)),
			EventControl(event) => format!("@({});", self.emit_expression(*event)),

			Delay { delay, statement } => {
				let delay_text = match self.file.expr(*delay).precedence() < precedence::MAX {
					true => format!("({})", self.emit_expression(*delay)),
					false => self.emit_expression(*delay),
				};
				match statement {
					Some(statement) => format!("#{} {}", delay_text, self.emit_statement(*statement)),
					None => format!("#{};", delay_text),
				}
			},

			Wait(event) => format!("wait({});", self.emit_expression(*event)),

			SystemTaskCall { name, args } => match args {
				Some(args) => format!(
					"${}({});",
					name,
					args.iter()
						.map(|arg| self.emit_expression(*arg))
						.collect::<Vec<_>>()
						.join(", ")
				),
				None => format!("${};", name),
			},

			// The first `$fatal` argument is the finish number
			Assert { condition, message } => {
				let message = match message.is_empty() {
					true => String::new(),
					false => format!(", \"{}\"", message),
				};
				format!("assert ({}) else $fatal(0{});", self.emit_expression(*condition), message)
			},

			Comment(text) => format!("// {}", text.replace('\n', "\n// ")),
			BlankLine => String::new(),
			Raw(text) => text.clone(),
			Block(block) => self.emit_block(*block),
		}
	}

	fn emit_sensitivity_list(&self, list: &[SensitivityListElement]) -> String {
		list.iter()
			.map(|element| match element {
				SensitivityListElement::Implicit => "*".to_string(),
				SensitivityListElement::PosEdge(expr) => format!("posedge {}", self.emit_expression(*expr)),
				SensitivityListElement::NegEdge(expr) => format!("negedge {}", self.emit_expression(*expr)),
			})
			.collect::<Vec<_>>()
			.join(" or ")
	}

	pub fn emit_procedure(&self, procedure: &StructuredProcedure) -> String {
		match &procedure.kind {
			ProcedureKind::Always(list) | ProcedureKind::AlwaysFf(list) => format!(
				"{} @ ({}) {}",
				procedure.kind.keyword(),
				self.emit_sensitivity_list(list),
				self.emit_block(procedure.block)
			),
			ProcedureKind::AlwaysComb | ProcedureKind::Initial => {
				format!("{} {}", procedure.kind.keyword(), self.emit_block(procedure.block))
			},
		}
	}

	/// Only asynchronous resets join the sensitivity list
	pub fn emit_always_flop(&self, id: FlopId) -> String {
		let flop = self.file.flop(id);
		let mut sensitivity = format!("posedge {}", self.emit_expression(flop.clk));
		if let Some(reset) = flop.reset.filter(|reset| reset.asynchronous) {
			sensitivity.push_str(&format!(
				" or {} {}",
				if reset.active_low { "negedge" } else { "posedge" },
				self.emit_expression(reset.signal)
			));
		}
		format!("always @ ({}) {}", sensitivity, self.emit_block(flop.top_block))
	}

	pub fn emit_function(&self, id: FunctionId) -> String {
		let function = self.file.function(id);
		let return_type = &self.file.def(function.return_def).data_type;

		let arguments = function
			.arguments
			.iter()
			.map(|arg| format!("input {}", self.emit_def_no_semi(*arg)))
			.collect::<Vec<_>>()
			.join(", ");

		let mut lines: Vec<String> = function.block_reg_defs.iter().map(|def| self.emit_def(*def)).collect();
		lines.push(self.emit_block(function.body));

		format!(
			"function automatic{} {} ({});\n{}\nendfunction",
			self.emit_data_type(return_type),
			function.name,
			arguments,
			indent(&lines.join("\n"))
		)
	}
}
