//! The compiled expression tree the evaluator and estimator consume.
//!
//! Parsing and type checking happen upstream; by the time an expression
//! reaches this crate it is structurally well formed. Constants above the
//! value-size caps may still appear and are rejected at evaluation time
//! unless the node was compiled with `ConstLimit::NoLimit`.

use crate::version::StdLibVersion;
use waves_primitives::ByteStr;

/// Whether a constant node is subject to the standard value-size caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstLimit {
	Checked,
	NoLimit,
}

/// A function being called: a built-in identified by its stable id, or a
/// user function resolved by name against enclosing declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionHeader {
	Native(u16),
	User(String),
}

/// A declaration introduced by a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
	Let { name: String, value: Box<Expr> },
	Func { name: String, args: Vec<String>, body: Box<Expr> },
}

impl Declaration {
	pub fn name(&self) -> &str {
		match self {
			Declaration::Let { name, .. } | Declaration::Func { name, .. } => name,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	ConstLong(i64),
	ConstByteStr(ByteStr, ConstLimit),
	ConstString(String, ConstLimit),
	True,
	False,
	Ref(String),
	Block(Declaration, Box<Expr>),
	If { cond: Box<Expr>, then: Box<Expr>, otherwise: Box<Expr> },
	FunctionCall { function: FunctionHeader, args: Vec<Expr> },
	GetField { object: Box<Expr>, field: String },
}

impl Expr {
	pub fn bytes(bytes: impl Into<ByteStr>) -> Expr {
		Expr::ConstByteStr(bytes.into(), ConstLimit::Checked)
	}

	pub fn string(s: impl Into<String>) -> Expr {
		Expr::ConstString(s.into(), ConstLimit::Checked)
	}

	pub fn reference(name: impl Into<String>) -> Expr {
		Expr::Ref(name.into())
	}

	pub fn native(id: u16, args: Vec<Expr>) -> Expr {
		Expr::FunctionCall { function: FunctionHeader::Native(id), args }
	}

	pub fn user_call(name: impl Into<String>, args: Vec<Expr>) -> Expr {
		Expr::FunctionCall { function: FunctionHeader::User(name.into()), args }
	}

	pub fn let_in(name: impl Into<String>, value: Expr, body: Expr) -> Expr {
		Expr::Block(
			Declaration::Let { name: name.into(), value: Box::new(value) },
			Box::new(body),
		)
	}

	pub fn if_else(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
		Expr::If { cond: Box::new(cond), then: Box::new(then), otherwise: Box::new(otherwise) }
	}

	pub fn get_field(object: Expr, field: impl Into<String>) -> Expr {
		Expr::GetField { object: Box::new(object), field: field.into() }
	}
}

/// A pure expression script: asset scripts and account verifiers. Evaluates
/// to a boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionScript {
	pub stdlib_version: StdLibVersion,
	pub expr: Expr,
}

/// A named dApp entry point. The body evaluates to the list of callable
/// actions.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableFunction {
	pub name: String,
	pub arg_names: Vec<String>,
	pub body: Expr,
}

/// A dApp script: shared declarations, callables, an optional verifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DAppScript {
	pub stdlib_version: StdLibVersion,
	pub declarations: Vec<Declaration>,
	pub callables: Vec<CallableFunction>,
	pub verifier: Option<CallableFunction>,
	/// Whether this dApp may appear twice on one synchronous call stack.
	pub allow_reentrancy: bool,
}

impl DAppScript {
	pub fn callable(&self, name: &str) -> Option<&CallableFunction> {
		self.callables.iter().find(|c| c.name == name)
	}
}

/// Any account- or asset-attached script.
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
	Expression(ExpressionScript),
	DApp(DAppScript),
}

impl Script {
	pub fn stdlib_version(&self) -> StdLibVersion {
		match self {
			Script::Expression(script) => script.stdlib_version,
			Script::DApp(script) => script.stdlib_version,
		}
	}

	pub fn as_dapp(&self) -> Option<&DAppScript> {
		match self {
			Script::Expression(_) => None,
			Script::DApp(script) => Some(script),
		}
	}
}
