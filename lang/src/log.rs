use crate::value::Value;

/// Variable bindings in evaluation order. Part of every evaluation result,
/// success or failure.
pub type ExecutionLog = Vec<(String, Value)>;

/// Deterministic textual form used in validation-error messages: one line
/// per entry, `\t<name> = <value>`.
pub fn render_log(log: &[(String, Value)]) -> String {
	log.iter()
		.map(|(name, value)| format!("\t{name} = {value}"))
		.collect::<Vec<_>>()
		.join("\n")
}
