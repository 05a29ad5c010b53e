use super::context;
use crate::{
	ast::{CallableFunction, DAppScript, Declaration, Expr},
	error::EstimationError,
	estimator::{estimate_dapp_callables, estimate_dapp_verifier, estimate_expression},
	evaluator::evaluate_expression,
	func_ids::NativeFunction,
	version::{EstimatorVersion, StdLibVersion},
	ExpressionScript,
};

fn expression(expr: Expr) -> ExpressionScript {
	ExpressionScript { stdlib_version: StdLibVersion::V5, expr }
}

fn sum(a: Expr, b: Expr) -> Expr {
	Expr::native(NativeFunction::SumLong.id(), vec![a, b])
}

#[test]
fn conditionals_count_the_expensive_branch() {
	let cheap_then = expression(Expr::if_else(
		Expr::True,
		Expr::ConstLong(1),
		Expr::native(NativeFunction::SigVerify.id(), vec![
			Expr::bytes([0u8; 4]),
			Expr::bytes([0u8; 64]),
			Expr::bytes([0u8; 32]),
		]),
	));
	let cheap_else = expression(Expr::if_else(
		Expr::False,
		Expr::native(NativeFunction::SigVerify.id(), vec![
			Expr::bytes([0u8; 4]),
			Expr::bytes([0u8; 64]),
			Expr::bytes([0u8; 32]),
		]),
		Expr::ConstLong(1),
	));
	// The estimate is value-independent: both orderings cost the same.
	assert_eq!(
		estimate_expression(&cheap_then, EstimatorVersion::V3),
		estimate_expression(&cheap_else, EstimatorVersion::V3),
	);
}

#[test]
fn estimate_bounds_actual_consumption() {
	let samples = [
		expression(sum(Expr::ConstLong(1), sum(Expr::ConstLong(2), Expr::ConstLong(3)))),
		expression(Expr::let_in(
			"x",
			sum(Expr::ConstLong(1), Expr::ConstLong(2)),
			sum(Expr::reference("x"), Expr::reference("x")),
		)),
		// The unused let is charged by the estimator but never at runtime.
		expression(Expr::let_in("unused", Expr::ConstLong(1), Expr::ConstLong(2))),
		expression(Expr::if_else(Expr::True, Expr::ConstLong(1), Expr::ConstLong(2))),
	];
	for script in samples {
		let estimate = estimate_expression(&script, EstimatorVersion::V1).expect("estimable");
		let run = evaluate_expression(&script, &context(StdLibVersion::V5), 10_000, true);
		assert!(run.result.is_ok());
		assert!(
			run.spent_complexity <= estimate,
			"runtime {} exceeded estimate {estimate}",
			run.spent_complexity
		);
	}
}

#[test]
fn user_function_cost_lands_at_each_call_site() {
	let body_cost = {
		let body = expression(sum(Expr::reference("n"), Expr::reference("n")));
		estimate_expression(&body, EstimatorVersion::V3).unwrap()
	};
	let once = expression(Expr::Block(
		Declaration::Func {
			name: "double".to_owned(),
			args: vec!["n".to_owned()],
			body: Box::new(sum(Expr::reference("n"), Expr::reference("n"))),
		},
		Box::new(Expr::user_call("double", vec![Expr::ConstLong(1)])),
	));
	let twice = expression(Expr::Block(
		Declaration::Func {
			name: "double".to_owned(),
			args: vec!["n".to_owned()],
			body: Box::new(sum(Expr::reference("n"), Expr::reference("n"))),
		},
		Box::new(sum(
			Expr::user_call("double", vec![Expr::ConstLong(1)]),
			Expr::user_call("double", vec![Expr::ConstLong(2)]),
		)),
	));
	let once = estimate_expression(&once, EstimatorVersion::V3).unwrap();
	let twice = estimate_expression(&twice, EstimatorVersion::V3).unwrap();
	// Inlining: the second call pays the body again.
	assert!(twice >= once + body_cost);
}

#[test]
fn first_estimator_charges_declared_functions_up_front() {
	let script = expression(Expr::Block(
		Declaration::Func {
			name: "unused".to_owned(),
			args: vec![],
			body: Box::new(Expr::native(NativeFunction::SigVerify.id(), vec![
				Expr::bytes([0u8; 4]),
				Expr::bytes([0u8; 64]),
				Expr::bytes([0u8; 32]),
			])),
		},
		Box::new(Expr::ConstLong(1)),
	));
	let v1 = estimate_expression(&script, EstimatorVersion::V1).unwrap();
	let v2 = estimate_expression(&script, EstimatorVersion::V2).unwrap();
	assert!(v1 > v2);
}

#[test]
fn recursion_is_rejected() {
	let script = expression(Expr::Block(
		Declaration::Func {
			name: "loop".to_owned(),
			args: vec![],
			body: Box::new(Expr::user_call("loop", vec![])),
		},
		Box::new(Expr::user_call("loop", vec![])),
	));
	assert_eq!(
		estimate_expression(&script, EstimatorVersion::V3),
		Err(EstimationError::RecursiveFunction("loop".to_owned()))
	);
}

#[test]
fn callables_include_shared_declaration_cost() {
	let script = DAppScript {
		stdlib_version: StdLibVersion::V5,
		declarations: vec![Declaration::Let {
			name: "shared".to_owned(),
			value: Box::new(sum(Expr::ConstLong(1), Expr::ConstLong(2))),
		}],
		callables: vec![
			CallableFunction {
				name: "cheap".to_owned(),
				arg_names: vec![],
				body: Expr::ConstLong(1),
			},
			CallableFunction {
				name: "uses_shared".to_owned(),
				arg_names: vec![],
				body: sum(Expr::reference("shared"), Expr::ConstLong(1)),
			},
		],
		verifier: Some(CallableFunction {
			name: "verify".to_owned(),
			arg_names: vec!["tx".to_owned()],
			body: Expr::True,
		}),
		allow_reentrancy: false,
	};
	let costs = estimate_dapp_callables(&script, EstimatorVersion::V3).unwrap();
	assert_eq!(costs.len(), 2);
	assert!(costs["uses_shared"] > costs["cheap"]);

	let verifier = estimate_dapp_verifier(&script, EstimatorVersion::V3).unwrap();
	assert!(verifier.is_some());
}

#[test]
fn unknown_native_is_rejected() {
	let script = expression(Expr::native(0xdead, vec![]));
	assert_eq!(
		estimate_expression(&script, EstimatorVersion::V3),
		Err(EstimationError::FunctionNotFound(0xdead))
	);
}
