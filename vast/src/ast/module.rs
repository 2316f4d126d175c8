use log::debug;

use super::{
	AlwaysFlop, AlwaysFlopHandle, BlockHandle, BlockId, DataKind, DataType, Def, DefId, Direction, ExprId, Expression,
	FileCore, FileHandle, FlopId, FunctionId, LocalParamId, ModuleId, Port, PortDescriptor, ProcedureKind, Reset,
	SectionId, SensitivityListElement, StructuredProcedure, UnpackedArrayBound, VastError,
};

/// Named binding of a port or parameter in an instantiation (`.name(expr)`)
#[derive(Clone, Debug)]
pub struct Connection {
	pub port_name: String,
	pub expression: ExprId,
}

impl Connection {
	pub fn new(port_name: &str, expression: ExprId) -> Self {
		Self {
			port_name: port_name.into(),
			expression,
		}
	}
}

/// Instance of another module
#[derive(Clone, Debug)]
pub struct Instantiation {
	pub module_name: String,
	pub instance_name: String,
	pub parameters: Vec<Connection>,
	pub connections: Vec<Connection>,
}

/// `localparam` declaration with one or more items
#[derive(Clone, Debug, Default)]
pub struct LocalParam {
	pub items: Vec<(String, ExprId)>,
}

/// `function automatic` definition
#[derive(Clone, Debug)]
pub struct Function {
	pub name: String,

	/// Declaration named after the function holding its return value
	pub return_def: DefId,

	pub arguments: Vec<DefId>,

	/// Local `reg` declarations emitted before the body
	pub block_reg_defs: Vec<DefId>,

	pub body: BlockId,
}

/// Item of a module body
#[derive(Clone, Debug)]
pub enum ModuleMember {
	Def(DefId),
	Parameter { name: String, rhs: ExprId },
	LocalParam(LocalParamId),
	Instantiation(Instantiation),
	ContinuousAssignment { lhs: ExprId, rhs: ExprId },
	Comment(String),
	BlankLine,
	Raw(String),
	Procedure(StructuredProcedure),
	AlwaysFlop(FlopId),
	Function(FunctionId),
	Section(SectionId),
}

/// Ordered group of module members. Sections may nest; they only
/// control placement and disappear in the emitted text.
#[derive(Clone, Debug, Default)]
pub struct Section {
	pub members: Vec<ModuleMember>,
}

/// Hardware module
#[derive(Clone, Debug)]
pub struct Module {
	pub name: String,
	pub ports: Vec<Port>,
	pub top: SectionId,
}

impl Module {
	pub fn new(name: &str, top: SectionId) -> Self {
		Self {
			name: name.into(),
			ports: vec![],
			top,
		}
	}
}

impl FileCore {
	/// Collects the members of a section, flattening nested sections depth-first
	pub fn gather_members(&self, section: SectionId) -> Vec<&ModuleMember> {
		let mut members = vec![];
		for member in &self.section(section).members {
			match member {
				ModuleMember::Section(nested) => members.extend(self.gather_members(*nested)),
				_ => members.push(member),
			}
		}
		members
	}
}

/// Builder handle for a section of a module body
#[derive(Clone)]
pub struct SectionHandle {
	file: FileHandle,
	id: SectionId,
}

impl SectionHandle {
	pub(crate) fn new(file: FileHandle, id: SectionId) -> Self {
		Self { file, id }
	}

	pub fn id(&self) -> SectionId {
		self.id
	}

	/// Appends a member to the section
	pub fn add(&mut self, member: ModuleMember) {
		self.file.borrow_mut().section_mut(self.id).members.push(member);
	}

	fn add_def(&mut self, def: Def) -> ExprId {
		let mut core = self.file.borrow_mut();
		let def = core.make_def(def);
		core.section_mut(self.id).members.push(ModuleMember::Def(def));
		core.logic_ref(def)
	}

	/// Declares a wire and returns a reference to it
	pub fn add_wire(&mut self, name: &str, data_type: DataType) -> ExprId {
		self.add_def(Def::wire(name, data_type))
	}

	/// Declares a reg with an optional initial value
	pub fn add_reg(&mut self, name: &str, data_type: DataType, init: Option<ExprId>) -> ExprId {
		self.add_def(Def::reg(name, data_type, init))
	}

	/// Declares a SystemVerilog `logic` variable with an optional initial value
	pub fn add_logic(&mut self, name: &str, data_type: DataType, init: Option<ExprId>) -> ExprId {
		self.add_def(Def::logic(name, data_type, init))
	}

	/// Declares a reg unpacked array, e.g. `reg [7:0] mem[16];`
	pub fn add_unpacked_array_reg(
		&mut self,
		name: &str,
		data_type: DataType,
		bounds: &[UnpackedArrayBound],
		init: Option<ExprId>,
	) -> ExprId {
		let mut def = Def::unpacked_array(name, DataKind::Reg, data_type, bounds);
		def.init = init;
		self.add_def(def)
	}

	/// Declares a wire unpacked array
	pub fn add_unpacked_array_wire(&mut self, name: &str, data_type: DataType, bounds: &[UnpackedArrayBound]) -> ExprId {
		self.add_def(Def::unpacked_array(name, DataKind::Wire, data_type, bounds))
	}

	/// Adds `parameter name = rhs;` and returns a reference to the parameter
	pub fn add_parameter(&mut self, name: &str, rhs: ExprId) -> ExprId {
		let mut core = self.file.borrow_mut();
		core.section_mut(self.id).members.push(ModuleMember::Parameter { name: name.into(), rhs });
		core.make_expr(Expression::ParameterRef(name.into()))
	}

	/// Adds an empty `localparam` declaration to be filled with items
	pub fn add_local_param(&mut self) -> LocalParamHandle {
		let mut core = self.file.borrow_mut();
		let id = core.make_local_param();
		core.section_mut(self.id).members.push(ModuleMember::LocalParam(id));
		drop(core);
		LocalParamHandle::new(self.file.clone(), id)
	}

	pub fn add_continuous_assignment(&mut self, lhs: ExprId, rhs: ExprId) {
		self.add(ModuleMember::ContinuousAssignment { lhs, rhs })
	}

	pub fn add_comment(&mut self, text: &str) {
		self.add(ModuleMember::Comment(text.into()))
	}

	pub fn add_blank_line(&mut self) {
		self.add(ModuleMember::BlankLine)
	}

	pub fn add_raw(&mut self, text: &str) {
		self.add(ModuleMember::Raw(text.into()))
	}

	pub fn add_instantiation(
		&mut self,
		module_name: &str,
		instance_name: &str,
		parameters: Vec<Connection>,
		connections: Vec<Connection>,
	) {
		self.add(ModuleMember::Instantiation(Instantiation {
			module_name: module_name.into(),
			instance_name: instance_name.into(),
			parameters,
			connections,
		}))
	}

	fn add_procedure(&mut self, kind: ProcedureKind) -> BlockHandle {
		let mut core = self.file.borrow_mut();
		let block = core.make_block();
		core.section_mut(self.id)
			.members
			.push(ModuleMember::Procedure(StructuredProcedure { kind, block }));
		drop(core);
		BlockHandle::new(self.file.clone(), block)
	}

	/// Adds `always @ (sensitivity)` and returns its body
	pub fn add_always(&mut self, sensitivity: Vec<SensitivityListElement>) -> BlockHandle {
		self.add_procedure(ProcedureKind::Always(sensitivity))
	}

	/// Adds `always_ff @ (sensitivity)` and returns its body
	pub fn add_always_ff(&mut self, sensitivity: Vec<SensitivityListElement>) -> BlockHandle {
		self.add_procedure(ProcedureKind::AlwaysFf(sensitivity))
	}

	pub fn add_always_comb(&mut self) -> BlockHandle {
		self.add_procedure(ProcedureKind::AlwaysComb)
	}

	pub fn add_initial(&mut self) -> BlockHandle {
		self.add_procedure(ProcedureKind::Initial)
	}

	/// Adds a register block clocked on the rising edge of `clk`
	pub fn add_always_flop(&mut self, clk: ExprId, reset: Option<Reset>) -> AlwaysFlopHandle {
		let mut core = self.file.borrow_mut();
		let flop = AlwaysFlop::new(&mut core, clk, reset);
		let id = core.make_flop(flop);
		core.section_mut(self.id).members.push(ModuleMember::AlwaysFlop(id));
		drop(core);
		AlwaysFlopHandle::new(self.file.clone(), id)
	}

	/// Adds a function definition whose return value has type `result_type`
	pub fn add_function(&mut self, name: &str, result_type: DataType) -> FunctionHandle {
		let mut core = self.file.borrow_mut();
		let return_def = core.make_def(Def::reg(name, result_type, None));
		let body = core.make_block();
		let id = core.make_function(Function {
			name: name.into(),
			return_def,
			arguments: vec![],
			block_reg_defs: vec![],
			body,
		});
		core.section_mut(self.id).members.push(ModuleMember::Function(id));
		drop(core);
		FunctionHandle::new(self.file.clone(), id)
	}

	/// Adds a nested section at the current position
	pub fn add_section(&mut self) -> SectionHandle {
		let mut core = self.file.borrow_mut();
		let nested = core.make_section();
		core.section_mut(self.id).members.push(ModuleMember::Section(nested));
		drop(core);
		SectionHandle::new(self.file.clone(), nested)
	}
}

/// Builder handle for a module
#[derive(Clone)]
pub struct ModuleHandle {
	file: FileHandle,
	id: ModuleId,
}

impl ModuleHandle {
	pub(crate) fn new(file: FileHandle, id: ModuleId) -> Self {
		Self { file, id }
	}

	pub fn id(&self) -> ModuleId {
		self.id
	}

	pub fn name(&self) -> String {
		self.file.borrow().module(self.id).name.clone()
	}

	pub fn ports(&self) -> Vec<Port> {
		self.file.borrow().module(self.id).ports.clone()
	}

	/// Top-level section of the module body
	pub fn top(&self) -> SectionHandle {
		let top = self.file.borrow().module(self.id).top;
		SectionHandle::new(self.file.clone(), top)
	}

	fn add_port_def(&mut self, direction: Direction, def: Def) -> ExprId {
		debug!("Module '{}': {} port '{}'", self.name(), direction.keyword(), def.name);
		let mut core = self.file.borrow_mut();
		let def = core.make_def(def);
		core.module_mut(self.id).ports.push(Port { direction, def });
		core.logic_ref(def)
	}

	pub fn add_input(&mut self, name: &str, data_type: DataType) -> ExprId {
		self.add_port_def(Direction::Input, Def::wire(name, data_type))
	}

	pub fn add_output(&mut self, name: &str, data_type: DataType) -> ExprId {
		self.add_port_def(Direction::Output, Def::wire(name, data_type))
	}

	/// Adds a port from its external description
	pub fn add_port(&mut self, descriptor: &PortDescriptor) -> Result<ExprId, VastError> {
		let mut core = self.file.borrow_mut();
		let port = Port::from_descriptor(descriptor, &mut core)?;
		core.module_mut(self.id).ports.push(port);
		Ok(core.logic_ref(port.def))
	}

	pub fn add_wire(&mut self, name: &str, data_type: DataType) -> ExprId {
		self.top().add_wire(name, data_type)
	}

	pub fn add_reg(&mut self, name: &str, data_type: DataType, init: Option<ExprId>) -> ExprId {
		self.top().add_reg(name, data_type, init)
	}

	pub fn add_logic(&mut self, name: &str, data_type: DataType, init: Option<ExprId>) -> ExprId {
		self.top().add_logic(name, data_type, init)
	}

	pub fn add_parameter(&mut self, name: &str, rhs: ExprId) -> ExprId {
		self.top().add_parameter(name, rhs)
	}

	pub fn add_continuous_assignment(&mut self, lhs: ExprId, rhs: ExprId) {
		self.top().add_continuous_assignment(lhs, rhs)
	}

	pub fn add_instantiation(
		&mut self,
		module_name: &str,
		instance_name: &str,
		parameters: Vec<Connection>,
		connections: Vec<Connection>,
	) {
		self.top()
			.add_instantiation(module_name, instance_name, parameters, connections)
	}

	pub fn add_always_flop(&mut self, clk: ExprId, reset: Option<Reset>) -> AlwaysFlopHandle {
		self.top().add_always_flop(clk, reset)
	}

	pub fn add_section(&mut self) -> SectionHandle {
		self.top().add_section()
	}
}

/// Builder handle for a `localparam` declaration
#[derive(Clone)]
pub struct LocalParamHandle {
	file: FileHandle,
	id: LocalParamId,
}

impl LocalParamHandle {
	pub(crate) fn new(file: FileHandle, id: LocalParamId) -> Self {
		Self { file, id }
	}

	/// Adds `name = value` and returns a reference to the new item
	pub fn add_item(&mut self, name: &str, value: ExprId) -> ExprId {
		let mut core = self.file.borrow_mut();
		core.local_param_mut(self.id).items.push((name.into(), value));
		core.make_expr(Expression::LocalParamItemRef(name.into()))
	}
}

/// Builder handle for a function definition
#[derive(Clone)]
pub struct FunctionHandle {
	file: FileHandle,
	id: FunctionId,
}

impl FunctionHandle {
	pub(crate) fn new(file: FileHandle, id: FunctionId) -> Self {
		Self { file, id }
	}

	pub fn id(&self) -> FunctionId {
		self.id
	}

	/// Adds an input argument and returns a reference usable in the body
	pub fn add_argument(&mut self, name: &str, data_type: DataType) -> ExprId {
		let mut core = self.file.borrow_mut();
		let def = core.make_def(Def::reg(name, data_type, None));
		core.function_mut(self.id).arguments.push(def);
		core.logic_ref(def)
	}

	/// Declares a local reg inside the function
	pub fn add_reg_def(&mut self, name: &str, data_type: DataType) -> ExprId {
		let mut core = self.file.borrow_mut();
		let def = core.make_def(Def::reg(name, data_type, None));
		core.function_mut(self.id).block_reg_defs.push(def);
		core.logic_ref(def)
	}

	/// Reference to the return value, assigned to produce the result
	pub fn return_value_ref(&self) -> ExprId {
		let mut core = self.file.borrow_mut();
		let def = core.function(self.id).return_def;
		core.logic_ref(def)
	}

	pub fn body(&self) -> BlockHandle {
		let body = self.file.borrow().function(self.id).body;
		BlockHandle::new(self.file.clone(), body)
	}
}
