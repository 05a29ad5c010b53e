use super::context;
use crate::{
	ast::{CallableFunction, DAppScript, Declaration, Expr},
	error::ExecutionError,
	evaluator::{evaluate_dapp_function, evaluate_expression, MAX_EVALUATION_DEPTH},
	func_ids::NativeFunction,
	value::Value,
	version::StdLibVersion,
	ExpressionScript,
};

fn expression(version: StdLibVersion, expr: Expr) -> ExpressionScript {
	ExpressionScript { stdlib_version: version, expr }
}

fn sum(a: Expr, b: Expr) -> Expr {
	Expr::native(NativeFunction::SumLong.id(), vec![a, b])
}

#[test]
fn unreferenced_let_is_never_evaluated() {
	// let unused = throw("boom"); 42
	let script = expression(
		StdLibVersion::V5,
		Expr::let_in(
			"unused",
			Expr::native(NativeFunction::Throw.id(), vec![Expr::string("boom")]),
			Expr::ConstLong(42),
		),
	);
	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), 1000, true);
	assert_eq!(evaluation.result, Ok(Value::Long(42)));
	assert!(evaluation.log.is_empty());
}

#[test]
fn let_is_forced_once_and_logged_once() {
	// let x = 1 + 2; x + x
	let script = expression(
		StdLibVersion::V5,
		Expr::let_in(
			"x",
			sum(Expr::ConstLong(1), Expr::ConstLong(2)),
			sum(Expr::reference("x"), Expr::reference("x")),
		),
	);
	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), 1000, true);
	assert_eq!(evaluation.result, Ok(Value::Long(6)));
	assert_eq!(evaluation.log, vec![("x".to_owned(), Value::Long(3))]);
}

#[test]
fn context_binding_logged_on_first_use() {
	let ctx = context(StdLibVersion::V5).bind("height", Value::Long(100));
	let script = expression(
		StdLibVersion::V5,
		sum(Expr::reference("height"), Expr::reference("height")),
	);
	let evaluation = evaluate_expression(&script, &ctx, 1000, true);
	assert_eq!(evaluation.result, Ok(Value::Long(200)));
	assert_eq!(evaluation.log, vec![("height".to_owned(), Value::Long(100))]);
}

#[test]
fn budget_exhaustion_reports_the_limit_and_keeps_the_log() {
	// let x = 1; if (x == 1) then <expensive chain> else 0 — the binding is
	// forced (and logged) before the chain blows the budget.
	let mut chain = Expr::ConstLong(0);
	for _ in 0..50 {
		chain = sum(chain, Expr::ConstLong(1));
	}
	let script = expression(
		StdLibVersion::V5,
		Expr::let_in(
			"x",
			Expr::ConstLong(1),
			Expr::if_else(
				Expr::native(
					NativeFunction::Eq.id(),
					vec![Expr::reference("x"), Expr::ConstLong(1)],
				),
				chain,
				Expr::ConstLong(0),
			),
		),
	);

	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), 20, true);
	assert_eq!(evaluation.result, Err(ExecutionError::ComplexityLimitExceeded));
	assert_eq!(evaluation.spent_complexity, 20);
	assert_eq!(evaluation.log, vec![("x".to_owned(), Value::Long(1))]);
}

#[test]
fn consumed_complexity_never_exceeds_the_limit() {
	for limit in [0, 1, 5, 50, 500] {
		let script = expression(
			StdLibVersion::V5,
			sum(sum(Expr::ConstLong(1), Expr::ConstLong(2)), Expr::ConstLong(3)),
		);
		let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), limit, true);
		assert!(evaluation.spent_complexity <= limit);
	}
}

#[test]
fn evaluation_is_reproducible() {
	let script = expression(
		StdLibVersion::V5,
		Expr::let_in(
			"x",
			Expr::native(NativeFunction::ToBase58.id(), vec![Expr::bytes([7u8; 8])]),
			Expr::if_else(
				Expr::native(
					NativeFunction::Eq.id(),
					vec![Expr::reference("x"), Expr::string("no")],
				),
				Expr::string("eq"),
				Expr::reference("x"),
			),
		),
	);
	let first = evaluate_expression(&script, &context(StdLibVersion::V5), 1000, true);
	let second = evaluate_expression(&script, &context(StdLibVersion::V5), 1000, true);
	assert_eq!(first, second);
}

#[test]
fn only_the_taken_branch_is_charged() {
	let cheap = expression(
		StdLibVersion::V5,
		Expr::if_else(Expr::True, Expr::ConstLong(1), sum(Expr::ConstLong(1), Expr::ConstLong(2))),
	);
	let expensive = expression(
		StdLibVersion::V5,
		Expr::if_else(Expr::False, Expr::ConstLong(1), sum(Expr::ConstLong(1), Expr::ConstLong(2))),
	);
	let cheap_run = evaluate_expression(&cheap, &context(StdLibVersion::V5), 1000, true);
	let expensive_run = evaluate_expression(&expensive, &context(StdLibVersion::V5), 1000, true);
	assert!(cheap_run.spent_complexity < expensive_run.spent_complexity);
}

#[test]
fn recursive_user_function_hits_the_depth_bound() {
	// func loop() = loop(); loop()
	let script = expression(
		StdLibVersion::V5,
		Expr::Block(
			Declaration::Func {
				name: "loop".to_owned(),
				args: vec![],
				body: Box::new(Expr::user_call("loop", vec![])),
			},
			Box::new(Expr::user_call("loop", vec![])),
		),
	);
	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), u64::MAX, true);
	assert_eq!(evaluation.result, Err(ExecutionError::StackOverflow(MAX_EVALUATION_DEPTH)));
}

#[test]
fn user_function_args_are_bound_and_logged() {
	let script = DAppScript {
		stdlib_version: StdLibVersion::V5,
		declarations: vec![Declaration::Func {
			name: "double".to_owned(),
			args: vec!["n".to_owned()],
			body: Box::new(sum(Expr::reference("n"), Expr::reference("n"))),
		}],
		callables: vec![CallableFunction {
			name: "call".to_owned(),
			arg_names: vec!["amount".to_owned()],
			body: Expr::user_call("double", vec![Expr::reference("amount")]),
		}],
		verifier: None,
		allow_reentrancy: false,
	};
	let callable = script.callable("call").expect("declared");
	let evaluation = evaluate_dapp_function(
		&script,
		callable,
		vec![Value::Long(21)],
		&context(StdLibVersion::V5),
		1000,
		true,
	);
	assert_eq!(evaluation.result, Ok(Value::Long(42)));
	assert_eq!(
		evaluation.log,
		vec![
			("amount".to_owned(), Value::Long(21)),
			("n".to_owned(), Value::Long(21)),
		]
	);
}

#[test]
fn missing_reference_is_reported() {
	let script = expression(StdLibVersion::V5, Expr::reference("ghost"));
	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), 1000, true);
	assert_eq!(evaluation.result, Err(ExecutionError::MissingBinding("ghost".to_owned())));
}

#[test]
fn get_field_reads_case_objects_and_tuples() {
	let ctx = context(StdLibVersion::V5).bind(
		"tx",
		Value::case("TransferTransaction", vec![("amount".to_owned(), Value::Long(7))]),
	);
	let script = expression(StdLibVersion::V5, Expr::get_field(Expr::reference("tx"), "amount"));
	assert_eq!(evaluate_expression(&script, &ctx, 1000, true).result, Ok(Value::Long(7)));

	let ctx = context(StdLibVersion::V5)
		.bind("pair", Value::Tuple(vec![Value::Long(1), Value::Bool(true)]));
	let script = expression(StdLibVersion::V5, Expr::get_field(Expr::reference("pair"), "_2"));
	assert_eq!(evaluate_expression(&script, &ctx, 1000, true).result, Ok(Value::Bool(true)));
}

#[test]
fn incomplete_mode_reports_true_cost_of_the_crossing_step() {
	let script = expression(
		StdLibVersion::V5,
		Expr::native(NativeFunction::SigVerify.id(), vec![
			Expr::bytes([0u8; 4]),
			Expr::bytes([0u8; 64]),
			Expr::bytes([0u8; 32]),
		]),
	);
	// SigVerify costs 181 at V5; the budget of 100 is crossed by that step.
	let evaluation = evaluate_expression(&script, &context(StdLibVersion::V5), 100, false);
	assert_eq!(evaluation.result, Err(ExecutionError::ComplexityLimitExceeded));
	assert!(evaluation.spent_complexity > 100);
}
