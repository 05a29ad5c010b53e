//! The budget-bounded expression evaluator.
//!
//! Same inputs, same outputs, on every node: no wall clock, no randomness,
//! no floating point. Every step subtracts from the complexity budget; when
//! the budget runs out evaluation stops with `ComplexityLimitExceeded`, the
//! log accumulated so far and a consumed complexity equal to the limit.
//!
//! `let` bindings are lazy: a binding is evaluated at most once, at its
//! first reference, and its `(name, value)` pair is appended to the log at
//! that point. Pre-bound context values are logged the first time a script
//! forces them.

use crate::{
	ast::{
		CallableFunction, ConstLimit, DAppScript, Declaration, Expr, ExpressionScript,
		FunctionHeader,
	},
	constructors::constructor_fields,
	context::EvaluationContext,
	costs::native_cost,
	error::ExecutionError,
	func_ids::NativeFunction,
	log::ExecutionLog,
	natives::call_native,
	value::Value,
};
use std::collections::HashMap;

/// Maximum nesting of evaluation frames (blocks, calls, branches).
pub const MAX_EVALUATION_DEPTH: usize = 100;

const CONST_COST: u64 = 1;
const REF_COST: u64 = 1;
const IF_COST: u64 = 1;
const GETTER_COST: u64 = 1;
const LET_FORCE_COST: u64 = 5;
const USER_CALL_COST: u64 = 1;

/// The outcome of one evaluation: the log and consumed complexity are
/// meaningful even when the result is an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
	pub log: ExecutionLog,
	pub spent_complexity: u64,
	pub result: Result<Value, ExecutionError>,
}

/// Evaluate a pure expression script (asset script or account verifier).
pub fn evaluate_expression(
	script: &ExpressionScript,
	context: &EvaluationContext,
	limit: u64,
	complete: bool,
) -> Evaluation {
	let mut evaluator = Evaluator::new(context, limit, complete);
	let scope = evaluator.root_scope();
	let result = evaluator.eval(&script.expr, scope, 0);
	evaluator.finish(result)
}

/// Evaluate a dApp function (callable or verifier) with pre-evaluated
/// arguments. Top-level declarations are visible to the body; arguments are
/// bound eagerly and logged.
pub fn evaluate_dapp_function(
	script: &DAppScript,
	function: &CallableFunction,
	args: Vec<Value>,
	context: &EvaluationContext,
	limit: u64,
	complete: bool,
) -> Evaluation {
	let mut evaluator = Evaluator::new(context, limit, complete);
	let root = evaluator.root_scope();
	let declarations = evaluator.declarations_scope(&script.declarations, root);

	if function.arg_names.len() != args.len() {
		return evaluator.finish(Err(ExecutionError::WrongArgumentCount {
			name: function.name.clone(),
			expected: function.arg_names.len(),
			actual: args.len(),
		}))
	}
	let frame = evaluator.new_scope(Some(declarations));
	for (name, value) in function.arg_names.iter().zip(args) {
		evaluator.bind_logged(frame, name.clone(), value);
	}
	let result = evaluator.eval(&function.body, frame, 0);
	evaluator.finish(result)
}

#[derive(Debug, Clone)]
enum LetState {
	Lazy { expr: Expr, defined_in: usize },
	Forced(Value),
}

#[derive(Debug, Clone)]
struct LetEntry {
	state: LetState,
	logged: bool,
}

#[derive(Debug, Clone)]
struct UserFunction {
	arg_names: Vec<String>,
	body: Expr,
	defined_in: usize,
}

#[derive(Debug, Default)]
struct Scope {
	parent: Option<usize>,
	lets: HashMap<String, LetEntry>,
	functions: HashMap<String, UserFunction>,
}

struct Evaluator<'a> {
	context: &'a EvaluationContext,
	scopes: Vec<Scope>,
	spent: u64,
	limit: u64,
	complete: bool,
	log: ExecutionLog,
}

impl<'a> Evaluator<'a> {
	fn new(context: &'a EvaluationContext, limit: u64, complete: bool) -> Self {
		Evaluator { context, scopes: Vec::new(), spent: 0, limit, complete, log: Vec::new() }
	}

	/// Scope 0: the pre-bound context environment.
	fn root_scope(&mut self) -> usize {
		let root = self.new_scope(None);
		for (name, value) in &self.context.bindings {
			self.scopes[root].lets.insert(
				name.clone(),
				LetEntry { state: LetState::Forced(value.clone()), logged: false },
			);
		}
		root
	}

	fn declarations_scope(&mut self, declarations: &[Declaration], parent: usize) -> usize {
		let scope = self.new_scope(Some(parent));
		for declaration in declarations {
			self.declare(declaration, scope);
		}
		scope
	}

	fn new_scope(&mut self, parent: Option<usize>) -> usize {
		self.scopes.push(Scope { parent, ..Default::default() });
		self.scopes.len() - 1
	}

	fn declare(&mut self, declaration: &Declaration, scope: usize) {
		match declaration {
			Declaration::Let { name, value } => {
				self.scopes[scope].lets.insert(
					name.clone(),
					LetEntry {
						state: LetState::Lazy { expr: (**value).clone(), defined_in: scope },
						logged: false,
					},
				);
			},
			Declaration::Func { name, args, body } => {
				self.scopes[scope].functions.insert(
					name.clone(),
					UserFunction {
						arg_names: args.clone(),
						body: (**body).clone(),
						defined_in: scope,
					},
				);
			},
		}
	}

	fn bind_logged(&mut self, scope: usize, name: String, value: Value) {
		self.log.push((name.clone(), value.clone()));
		self.scopes[scope]
			.lets
			.insert(name, LetEntry { state: LetState::Forced(value), logged: true });
	}

	fn charge(&mut self, cost: u64) -> Result<(), ExecutionError> {
		self.spent = self.spent.saturating_add(cost);
		if self.spent > self.limit {
			return Err(ExecutionError::ComplexityLimitExceeded)
		}
		Ok(())
	}

	fn finish(mut self, result: Result<Value, ExecutionError>) -> Evaluation {
		// A complete evaluation accounts for the whole limit on exhaustion;
		// the incomplete mode reports the true cost of the step that crossed
		// the boundary.
		let spent = if self.complete {
			match &result {
				Err(ExecutionError::ComplexityLimitExceeded) => self.limit,
				_ => self.spent.min(self.limit),
			}
		} else {
			self.spent
		};
		Evaluation { log: std::mem::take(&mut self.log), spent_complexity: spent, result }
	}

	fn eval(&mut self, expr: &Expr, scope: usize, depth: usize) -> Result<Value, ExecutionError> {
		if depth > MAX_EVALUATION_DEPTH {
			return Err(ExecutionError::StackOverflow(MAX_EVALUATION_DEPTH))
		}
		match expr {
			Expr::ConstLong(n) => {
				self.charge(CONST_COST)?;
				Ok(Value::Long(*n))
			},
			Expr::ConstByteStr(bytes, limit) => {
				self.charge(CONST_COST)?;
				match limit {
					ConstLimit::Checked => Value::byte_str(bytes.clone()),
					ConstLimit::NoLimit => Ok(Value::ByteStr(bytes.clone())),
				}
			},
			Expr::ConstString(s, limit) => {
				self.charge(CONST_COST)?;
				match limit {
					ConstLimit::Checked => Value::string(s.clone()),
					ConstLimit::NoLimit => Ok(Value::String(s.clone())),
				}
			},
			Expr::True => {
				self.charge(CONST_COST)?;
				Ok(Value::Bool(true))
			},
			Expr::False => {
				self.charge(CONST_COST)?;
				Ok(Value::Bool(false))
			},
			Expr::Ref(name) => {
				self.charge(REF_COST)?;
				self.force_binding(name, scope, depth)
			},
			Expr::Block(declaration, body) => {
				let inner = self.new_scope(Some(scope));
				self.declare(declaration, inner);
				self.eval(body, inner, depth + 1)
			},
			Expr::If { cond, then, otherwise } => {
				self.charge(IF_COST)?;
				if self.eval(cond, scope, depth + 1)?.as_bool()? {
					self.eval(then, scope, depth + 1)
				} else {
					self.eval(otherwise, scope, depth + 1)
				}
			},
			Expr::FunctionCall { function, args } => match function {
				FunctionHeader::Native(id) => {
					let native = NativeFunction::from_id(*id)
						.ok_or(ExecutionError::FunctionNotFound(*id))?;
					self.charge(native_cost(native, self.context.stdlib_version))?;
					let mut evaluated = Vec::with_capacity(args.len());
					for arg in args {
						evaluated.push(self.eval(arg, scope, depth + 1)?);
					}
					call_native(native, evaluated, self.context)
				},
				FunctionHeader::User(name) => self.call_user(name, args, scope, depth),
			},
			Expr::GetField { object, field } => {
				self.charge(GETTER_COST)?;
				let object = self.eval(object, scope, depth + 1)?;
				self.get_field(&object, field)
			},
		}
	}

	fn force_binding(
		&mut self,
		name: &str,
		scope: usize,
		depth: usize,
	) -> Result<Value, ExecutionError> {
		let mut current = Some(scope);
		while let Some(index) = current {
			let found = self.scopes[index]
				.lets
				.get(name)
				.map(|entry| (entry.state.clone(), entry.logged));
			if let Some((state, logged)) = found {
				let (value, needs_log) = match state {
					LetState::Forced(value) => (value, !logged),
					LetState::Lazy { expr, defined_in } => {
						self.charge(LET_FORCE_COST)?;
						let value = self.eval(&expr, defined_in, depth + 1)?;
						(value, true)
					},
				};
				if needs_log {
					self.log.push((name.to_owned(), value.clone()));
				}
				let entry = self.scopes[index].lets.get_mut(name).expect("entry exists");
				entry.state = LetState::Forced(value.clone());
				entry.logged = true;
				return Ok(value)
			}
			current = self.scopes[index].parent;
		}
		Err(ExecutionError::MissingBinding(name.to_owned()))
	}

	fn call_user(
		&mut self,
		name: &str,
		args: &[Expr],
		scope: usize,
		depth: usize,
	) -> Result<Value, ExecutionError> {
		self.charge(USER_CALL_COST)?;
		let Some(function) = self.lookup_function(name, scope) else {
			// Not a declared function: a case-object constructor, maybe.
			let fields = constructor_fields(name)
				.ok_or_else(|| ExecutionError::UserFunctionNotFound(name.to_owned()))?;
			if fields.len() != args.len() {
				return Err(ExecutionError::WrongArgumentCount {
					name: name.to_owned(),
					expected: fields.len(),
					actual: args.len(),
				})
			}
			let mut evaluated = Vec::with_capacity(args.len());
			for arg in args {
				evaluated.push(self.eval(arg, scope, depth + 1)?);
			}
			return Ok(Value::case(
				name,
				fields.iter().map(|f| f.to_string()).zip(evaluated).collect(),
			))
		};
		if function.arg_names.len() != args.len() {
			return Err(ExecutionError::WrongArgumentCount {
				name: name.to_owned(),
				expected: function.arg_names.len(),
				actual: args.len(),
			})
		}
		let mut evaluated = Vec::with_capacity(args.len());
		for arg in args {
			evaluated.push(self.eval(arg, scope, depth + 1)?);
		}
		// Lexical scoping: the body sees the function's defining scope, not
		// the caller's.
		let frame = self.new_scope(Some(function.defined_in));
		for (arg_name, value) in function.arg_names.iter().zip(evaluated) {
			self.bind_logged(frame, arg_name.clone(), value);
		}
		self.eval(&function.body, frame, depth + 1)
	}

	fn lookup_function(&self, name: &str, scope: usize) -> Option<UserFunction> {
		let mut current = Some(scope);
		while let Some(index) = current {
			if let Some(function) = self.scopes[index].functions.get(name) {
				return Some(function.clone())
			}
			current = self.scopes[index].parent;
		}
		None
	}

	fn get_field(&self, object: &Value, field: &str) -> Result<Value, ExecutionError> {
		match object {
			Value::CaseObject(obj) => obj.field(field).cloned().ok_or_else(|| {
				ExecutionError::FieldNotFound {
					type_name: obj.type_name.clone(),
					field: field.to_owned(),
				}
			}),
			Value::Tuple(elements) => field
				.strip_prefix('_')
				.and_then(|n| n.parse::<usize>().ok())
				.and_then(|n| n.checked_sub(1))
				.and_then(|i| elements.get(i))
				.cloned()
				.ok_or_else(|| ExecutionError::FieldNotFound {
					type_name: "Tuple".to_owned(),
					field: field.to_owned(),
				}),
			other => Err(ExecutionError::type_mismatch("CaseObject", other)),
		}
	}
}
