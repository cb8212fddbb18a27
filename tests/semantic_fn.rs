#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use semfn::{CompileErrorType, Options, RuntimeErrorType, ScanErrorType, SemanticFn, Value, build_semantic_fn};
	use serde_json::json;

	fn call(descriptor: &str, options: Options, args: Vec<Value>) -> Value { SemanticFn::build(descriptor, options).call(args) }

	fn args(names: &[&str]) -> Options { Options::new().with_args(names.iter().copied()) }

	#[test]
	fn test_expressions() {
		let cases = [
			("1 + 5 === 6", Options::new(), vec![], Value::Bool(true)),
			("10 + 10 * 2", Options::new(), vec![], Value::from(30)),
			("10 - 5 - 3", Options::new(), vec![], Value::from(2)),
			("true", Options::new(), vec![], Value::Bool(true)),
			("false", Options::new(), vec![], Value::Bool(false)),
			("null", Options::new(), vec![], Value::Null),
			("undefined", Options::new(), vec![], Value::Undefined),
			("toBool 0", Options::new(), vec![], Value::Bool(false)),
			("name === \"Jack\"", args(&["name"]), vec![Value::from("Jack")], Value::Bool(true)),
			("age == \"20\"", args(&["age"]), vec![Value::from(20)], Value::Bool(true)),
			("age === \"20\"", args(&["age"]), vec![Value::from(20)], Value::Bool(false)),
		];
		for (descriptor, options, arguments, expected) in cases {
			assert_eq!(call(descriptor, options, arguments), expected, "evaluating {descriptor:?}");
		}
	}

	#[test]
	fn test_host_values() {
		let person = || Value::from(json!({ "age": 20, "name": "Jack" }));
		let cases = [
			("person.age > 20", vec![person()], Value::Bool(false)),
			("person.age + 20", vec![person()], Value::from(40)),
			("toString person.age", vec![person()], Value::from("20")),
			("person.name === name", vec![person(), Value::from("Jack")], Value::Bool(true)),
			("person.age greater than 20 or toBool 0", vec![person()], Value::Bool(false)),
		];
		for (descriptor, arguments, expected) in cases {
			assert_eq!(call(descriptor, args(&["person", "name"]), arguments), expected, "evaluating {descriptor:?}");
		}
	}

	#[test]
	fn test_short_circuit() {
		assert_eq!(call("true and \"x\"", Options::new(), vec![]), Value::from("x"));
		assert_eq!(call("false and \"x\"", Options::new(), vec![]), Value::Bool(false));
		assert_eq!(call("true or \"x\"", Options::new(), vec![]), Value::Bool(true));
		assert_eq!(call("false or \"x\"", Options::new(), vec![]), Value::from("x"));
	}

	#[test]
	fn test_deterministic() {
		let semantic_fn = build_semantic_fn("[1 + 2, %{a: toString 3}]", Options::new());
		assert_eq!(semantic_fn.call([]), semantic_fn.call([]));
		assert_eq!(semantic_fn.call([]).to_json(), json!([3, { "a": "3" }]));
	}

	#[test]
	fn test_multi_line() {
		let descriptor = "
			let a = 1 + 2
			let b = 2 + 3
			b = 1
			a + b
		";
		assert_eq!(call(descriptor, Options::new(), vec![]), Value::from(4));
	}

	#[test]
	fn test_scopes() {
		let descriptor = "
			let a = 1
			let b = 1
			let shadowed = 10

			{
				let a = 5
				b = a
			}

			globalArg + fnArg + a + b + shadowed
		";
		let options =
			Options::new().with_args(["fnArg", "shadowed"]).with_global("globalArg", 100).with_global("shadowed", 500);
		assert_eq!(call(descriptor, options, vec![Value::from(50), Value::from(200)]), Value::from(166));
	}

	#[test]
	fn test_last_statement_value() {
		let cases = [
			("{\n1 + 2\n}", Value::from(3)),
			("let a = 1", Value::from(1)),
			("1 + 5", Value::from(6)),
			("if (true) \"true\" \n else \"false\"", Value::from("true")),
			("if (false) \"true\" \n else \"false\"", Value::from("false")),
			("if (false) \"true\"", Value::Undefined),
			("if true, do: \"true\", else: \"false\"", Value::from("true")),
			("if false, do: \"true\", else: \"false\"", Value::from("false")),
			("if true, do: \"true\"", Value::from("true")),
			("if false, do: \"true\"", Value::Undefined),
		];
		for (descriptor, expected) in cases {
			assert_eq!(call(descriptor, Options::new(), vec![]), expected, "evaluating {descriptor:?}");
		}
	}

	#[test]
	fn test_readonly_arguments() {
		let semantic_fn = SemanticFn::build("let b = a = 3\n[a, b]", args(&["a"]));

		let evaluation = semantic_fn.call_with_report([Value::from(1)]);
		assert_eq!(evaluation.value, Value::array([Value::from(1), Value::from(1)]));
		assert_eq!(evaluation.runtime_errors.len(), 1);
		assert_eq!(evaluation.runtime_errors[0].kind, RuntimeErrorType::Readonly("a".to_string()));
	}

	#[test]
	fn test_readonly_globals() {
		let settings = Value::from(json!({ "limit": 10 }));
		let options = Options::new().with_global("settings", settings.clone()).with_global("limit", 5);
		let semantic_fn = SemanticFn::build("settings.limit = 20\nlimit = 1\n[settings.limit, limit]", options);

		let evaluation = semantic_fn.call_with_report([]);
		assert_eq!(evaluation.value, Value::array([Value::from(10), Value::from(5)]));
		let messages: Vec<String> = evaluation.runtime_errors.iter().map(ToString::to_string).collect();
		assert_eq!(messages, ["line 1: Trying to update a readonly variable.", "line 2: limit is readonly."]);
		assert_eq!(settings.to_json(), json!({ "limit": 10 }));
	}

	#[test]
	fn test_containers() {
		let value = call("let arr=[1,1+2,[3,4],%{a:1}]; arr[0]=4; arr[2][1]=8; arr[3].a=2; arr", Options::new(), vec![]);
		assert_eq!(value.to_json(), json!([4, 3, [3, 8], { "a": 2 }]));
	}

	#[test]
	fn test_self_referencing_array() {
		let evaluation = SemanticFn::build("let a = [1]\na[0] = a\na + 1", Options::new()).call_with_report([]);
		assert_eq!(evaluation.value, Value::from(1));
		assert!(!evaluation.has_errors());

		let value = call("let a = [1, 2]\na[2] = a\na", Options::new(), vec![]);
		assert_eq!(value.to_string(), "1,2,");
		assert_eq!(value.to_json(), json!([1, 2, null]));
	}

	#[test]
	fn test_array_growth_is_bounded() {
		let evaluation = SemanticFn::build("let a = []\na[4294967294] = 1\na.length", Options::new()).call_with_report([]);
		assert_eq!(evaluation.value, Value::from(0));
		assert_eq!(evaluation.runtime_errors.len(), 1);
		assert_eq!(evaluation.runtime_errors[0].kind, RuntimeErrorType::IndexTooFar(4_294_967_294));
	}

	#[test]
	fn test_deep_nesting_falls_back_to_default() {
		let descriptor = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
		let semantic_fn = SemanticFn::build(&descriptor, Options::new().with_default("too deep"));

		assert_eq!(semantic_fn.call([]), Value::from("too deep"));
		assert_eq!(semantic_fn.compile_errors().len(), 1);
		assert_eq!(semantic_fn.compile_errors()[0].kind.to_string(), "Descriptor nested too deeply.");
	}

	#[test]
	fn test_compile_error_default() {
		let semantic_fn = SemanticFn::build("\"unterminated", Options::new().with_default(false));

		assert_eq!(semantic_fn.call([]), Value::Bool(false));
		let errors = semantic_fn.compile_errors();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].line, 1);
		assert_eq!(errors[0].kind, CompileErrorType::Scan(ScanErrorType::UnterminatedString));
		assert_eq!(errors[0].kind.to_string(), "Unterminated string");
	}

	#[test]
	fn test_compile_errors_are_collected() {
		let semantic_fn = SemanticFn::build("let = 1\n1 +\n3.4.5\nok", Options::new());

		let lines: Vec<usize> = semantic_fn.compile_errors().iter().map(|error| error.line).collect();
		assert_eq!(lines, [3, 1, 2]);
		assert_eq!(semantic_fn.call([]), Value::Undefined);
	}
}
