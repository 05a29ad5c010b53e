//! Static worst-case complexity of a compiled expression.
//!
//! The estimate is independent of runtime values: conditionals count the
//! more expensive branch, every `let` counts as if it were forced, user
//! functions are inlined so their cost lands at the call site. Recursive
//! user functions cannot be estimated and are rejected.

use crate::{
	ast::{CallableFunction, DAppScript, Declaration, Expr, ExpressionScript, FunctionHeader},
	constructors::constructor_fields,
	costs::native_cost,
	error::EstimationError,
	func_ids::NativeFunction,
	version::{EstimatorVersion, StdLibVersion},
};
use std::collections::BTreeMap;

struct NodeCosts {
	literal: u64,
	reference: u64,
	conditional: u64,
	let_declaration: u64,
	getter: u64,
	user_call: u64,
}

fn node_costs(version: EstimatorVersion) -> NodeCosts {
	match version {
		EstimatorVersion::V1 | EstimatorVersion::V2 => NodeCosts {
			literal: 1,
			reference: 1,
			conditional: 1,
			let_declaration: 5,
			getter: 2,
			user_call: 1,
		},
		EstimatorVersion::V3 => NodeCosts {
			literal: 1,
			reference: 1,
			conditional: 1,
			let_declaration: 1,
			getter: 1,
			user_call: 1,
		},
	}
}

/// Worst-case cost of a pure expression script.
pub fn estimate_expression(
	script: &ExpressionScript,
	estimator: EstimatorVersion,
) -> Result<u64, EstimationError> {
	Estimator::new(script.stdlib_version, estimator).cost(&script.expr, &Functions::default())
}

/// Worst-case cost per callable, with top-level declarations in scope.
pub fn estimate_dapp_callables(
	script: &DAppScript,
	estimator: EstimatorVersion,
) -> Result<BTreeMap<String, u64>, EstimationError> {
	let mut estimator = Estimator::new(script.stdlib_version, estimator);
	let functions = Functions::from_declarations(&script.declarations);
	let declaration_cost = estimator.declarations_cost(&script.declarations, &functions)?;
	script
		.callables
		.iter()
		.map(|callable| {
			let cost = estimator.function_cost(callable, &functions)?;
			Ok((
				callable.name.clone(),
				declaration_cost.checked_add(cost).ok_or(EstimationError::Overflow)?,
			))
		})
		.collect()
}

/// Worst-case cost of the dApp verifier, if one is declared.
pub fn estimate_dapp_verifier(
	script: &DAppScript,
	estimator: EstimatorVersion,
) -> Result<Option<u64>, EstimationError> {
	let Some(verifier) = &script.verifier else { return Ok(None) };
	let mut estimator = Estimator::new(script.stdlib_version, estimator);
	let functions = Functions::from_declarations(&script.declarations);
	let declaration_cost = estimator.declarations_cost(&script.declarations, &functions)?;
	let cost = estimator.function_cost(verifier, &functions)?;
	Ok(Some(declaration_cost.checked_add(cost).ok_or(EstimationError::Overflow)?))
}

/// User functions visible at some point of the walk. Immutable chain so that
/// inner declarations shadow outer ones without mutation.
#[derive(Default, Clone)]
struct Functions<'e> {
	entries: Vec<(&'e str, &'e [String], &'e Expr)>,
}

impl<'e> Functions<'e> {
	fn from_declarations(declarations: &'e [Declaration]) -> Self {
		let mut functions = Functions::default();
		for declaration in declarations {
			if let Declaration::Func { name, args, body } = declaration {
				functions.entries.push((name, args, body));
			}
		}
		functions
	}

	fn with(&self, name: &'e str, args: &'e [String], body: &'e Expr) -> Self {
		let mut next = self.clone();
		next.entries.push((name, args, body));
		next
	}

	fn lookup(&self, name: &str) -> Option<(&'e [String], &'e Expr)> {
		self.entries
			.iter()
			.rev()
			.find(|(n, _, _)| *n == name)
			.map(|(_, args, body)| (*args, *body))
	}
}

struct Estimator {
	stdlib_version: StdLibVersion,
	version: EstimatorVersion,
	costs: NodeCosts,
	inlining: Vec<String>,
}

impl Estimator {
	fn new(stdlib_version: StdLibVersion, version: EstimatorVersion) -> Self {
		Estimator { stdlib_version, version, costs: node_costs(version), inlining: Vec::new() }
	}

	fn function_cost<'e>(
		&mut self,
		function: &'e CallableFunction,
		functions: &Functions<'e>,
	) -> Result<u64, EstimationError> {
		// Arguments arrive pre-evaluated; each binding costs one reference.
		let args = (function.arg_names.len() as u64)
			.checked_mul(self.costs.reference)
			.ok_or(EstimationError::Overflow)?;
		let body = self.cost(&function.body, functions)?;
		args.checked_add(body).ok_or(EstimationError::Overflow)
	}

	fn declarations_cost<'e>(
		&mut self,
		declarations: &'e [Declaration],
		functions: &Functions<'e>,
	) -> Result<u64, EstimationError> {
		let mut total: u64 = 0;
		for declaration in declarations {
			let cost = match declaration {
				Declaration::Let { value, .. } => self
					.costs
					.let_declaration
					.checked_add(self.cost(value, functions)?)
					.ok_or(EstimationError::Overflow)?,
				// The first estimator charged every declared function body
				// up front; later versions charge at the call site only.
				Declaration::Func { body, .. } => match self.version {
					EstimatorVersion::V1 => self.cost(body, functions)?,
					EstimatorVersion::V2 | EstimatorVersion::V3 => 0,
				},
			};
			total = total.checked_add(cost).ok_or(EstimationError::Overflow)?;
		}
		Ok(total)
	}

	fn cost<'e>(
		&mut self,
		expr: &'e Expr,
		functions: &Functions<'e>,
	) -> Result<u64, EstimationError> {
		match expr {
			Expr::ConstLong(_) |
			Expr::ConstByteStr(_, _) |
			Expr::ConstString(_, _) |
			Expr::True |
			Expr::False => Ok(self.costs.literal),
			Expr::Ref(_) => Ok(self.costs.reference),
			Expr::Block(declaration, body) => {
				let (declaration_cost, functions) = match declaration {
					Declaration::Let { value, .. } => (
						self.costs
							.let_declaration
							.checked_add(self.cost(value, functions)?)
							.ok_or(EstimationError::Overflow)?,
						functions.clone(),
					),
					Declaration::Func { name, args, body } => {
						let cost = match self.version {
							EstimatorVersion::V1 => self.cost(body, functions)?,
							EstimatorVersion::V2 | EstimatorVersion::V3 => 0,
						};
						(cost, functions.with(name, args, body))
					},
				};
				declaration_cost
					.checked_add(self.cost(body, &functions)?)
					.ok_or(EstimationError::Overflow)
			},
			Expr::If { cond, then, otherwise } => {
				let cond = self.cost(cond, functions)?;
				let branch = self.cost(then, functions)?.max(self.cost(otherwise, functions)?);
				self.costs
					.conditional
					.checked_add(cond)
					.and_then(|c| c.checked_add(branch))
					.ok_or(EstimationError::Overflow)
			},
			Expr::FunctionCall { function, args } => {
				let mut total: u64 = 0;
				for arg in args {
					total = total
						.checked_add(self.cost(arg, functions)?)
						.ok_or(EstimationError::Overflow)?;
				}
				let call = match function {
					FunctionHeader::Native(id) => {
						let native = NativeFunction::from_id(*id)
							.filter(|f| f.available_since() <= self.stdlib_version)
							.ok_or(EstimationError::FunctionNotFound(*id))?;
						native_cost(native, self.stdlib_version)
					},
					FunctionHeader::User(name) => {
						let Some((_, body)) = functions.lookup(name) else {
							// A case-object constructor costs one call.
							if constructor_fields(name).is_some() {
								return total
									.checked_add(self.costs.user_call)
									.ok_or(EstimationError::Overflow)
							}
							return Err(EstimationError::UserFunctionNotFound(name.clone()))
						};
						if self.inlining.iter().any(|n| n == name) {
							return Err(EstimationError::RecursiveFunction(name.clone()))
						}
						self.inlining.push(name.clone());
						// Inline: the body cost lands at this call site;
						// argument expressions were charged above, references
						// to them inside the body cost one lookup each.
						let body_cost = self
							.cost(body, functions)?
							.checked_add(self.costs.user_call)
							.ok_or(EstimationError::Overflow)?;
						self.inlining.pop();
						body_cost
					},
				};
				total.checked_add(call).ok_or(EstimationError::Overflow)
			},
			Expr::GetField { object, field: _ } => self
				.costs
				.getter
				.checked_add(self.cost(object, functions)?)
				.ok_or(EstimationError::Overflow),
		}
	}
}
