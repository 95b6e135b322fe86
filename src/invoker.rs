//! Parameter binding, coercion and panic-safe handler execution
//!
//! Every invocation produces exactly one envelope: binding failures stop
//! before the handler runs, handler faults (including panics) become
//! `ExecutionError`, and normal returns are wrapped as `Success`.

use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Number, Value};

use crate::envelope::Envelope;
use crate::errors::DispatchError;
use crate::registry::{ParamKind, ParamSpec, ResourceDescriptor, ToolDescriptor};

pub fn invoke_tool(descriptor: &ToolDescriptor, parameters: &Map<String, Value>) -> Envelope {
    let bound = match bind_parameters(&descriptor.params, parameters) {
        Ok(bound) => bound,
        Err(err) => return Envelope::from(err),
    };

    execute(|| (descriptor.handler)(&bound))
}

pub fn invoke_resource(descriptor: &ResourceDescriptor) -> Envelope {
    execute(|| (descriptor.handler)())
}

fn execute<F>(call: F) -> Envelope
where
    F: FnOnce() -> Result<Value, crate::errors::HandlerError>,
{
    // A panicking handler must not tear down the request task; it is
    // reported as an ExecutionError like any other handler fault.
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Envelope::success(value),
        Ok(Err(fault)) => Envelope::from(DispatchError::execution(fault.message())),
        Err(payload) => Envelope::from(DispatchError::execution(panic_message(&payload))),
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("handler panicked: {message}")
    } else {
        "handler panicked".to_string()
    }
}

/// Bind supplied parameters against the declared spec.
///
/// Unknown supplied keys are ignored; absent optional parameters are left
/// unbound so handlers observe the key as missing.
pub fn bind_parameters(
    spec: &[ParamSpec],
    supplied: &Map<String, Value>,
) -> Result<Map<String, Value>, DispatchError> {
    let mut bound = Map::new();

    for param in spec {
        match supplied.get(param.name) {
            Some(value) => {
                bound.insert(param.name.to_string(), coerce(param, value)?);
            }
            None if param.required => {
                return Err(DispatchError::validation(format!(
                    "missing parameter {}",
                    param.name
                )));
            }
            None => {}
        }
    }

    Ok(bound)
}

/// Coerce a wire value to the declared kind.
///
/// The table is deliberately narrow: numeric strings are accepted for
/// numeric kinds, `"true"`/`"false"` for booleans, and nothing else is
/// converted across types.
fn coerce(param: &ParamSpec, value: &Value) -> Result<Value, DispatchError> {
    let coerced = match param.kind {
        ParamKind::String => value.as_str().map(|text| Value::String(text.to_string())),
        ParamKind::Integer => coerce_integer(value),
        ParamKind::Number => coerce_number(value),
        ParamKind::Boolean => coerce_boolean(value),
        ParamKind::NumberList => coerce_number_list(value),
    };

    coerced.ok_or_else(|| {
        DispatchError::validation(format!(
            "invalid parameter {}: expected {}",
            param.name,
            param.kind.as_str()
        ))
    })
}

fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        // JSON numbers keep their original representation, so integer
        // inputs stay integers on the way back out.
        Value::Number(number) => Some(Value::Number(number.clone())),
        Value::String(text) => parse_number(text.trim()),
        _ => None,
    }
}

fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                return Some(Value::Number(number.clone()));
            }
            let float = number.as_f64()?;
            if float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64 {
                return Some(Value::from(float as i64));
            }
            None
        }
        Value::String(text) => text.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn coerce_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(flag) => Some(Value::Bool(*flag)),
        Value::String(text) => match text.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_number_list(value: &Value) -> Option<Value> {
    let items = value.as_array()?;
    let coerced = items
        .iter()
        .map(coerce_number)
        .collect::<Option<Vec<_>>>()?;
    Some(Value::Array(coerced))
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Value::from(integer));
    }
    let float = text.parse::<f64>().ok()?;
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, HandlerError};
    use crate::registry::{ParamKind, ParamSpec, ToolDescriptor};
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().expect("test params object").clone()
    }

    fn spec() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("a", ParamKind::Number),
            ParamSpec::required("b", ParamKind::Number),
            ParamSpec::optional("note", ParamKind::String),
        ]
    }

    #[test]
    fn missing_required_parameter_is_validation_error() {
        let err = bind_parameters(&spec(), &params(json!({"a": 15})))
            .expect_err("missing b must fail");

        assert_eq!(err, DispatchError::validation("missing parameter b"));
    }

    #[test]
    fn absent_optional_parameter_stays_unbound() {
        let bound =
            bind_parameters(&spec(), &params(json!({"a": 1, "b": 2}))).expect("binding succeeds");

        assert!(!bound.contains_key("note"));
    }

    #[test]
    fn unknown_supplied_keys_are_dropped() {
        let bound = bind_parameters(&spec(), &params(json!({"a": 1, "b": 2, "extra": true})))
            .expect("binding succeeds");

        assert!(!bound.contains_key("extra"));
    }

    #[test]
    fn numeric_strings_coerce_for_numeric_kinds() {
        let bound = bind_parameters(&spec(), &params(json!({"a": "15", "b": "2.5"})))
            .expect("binding succeeds");

        assert_eq!(bound["a"], json!(15));
        assert_eq!(bound["b"], json!(2.5));
    }

    #[test]
    fn integer_inputs_keep_integer_representation() {
        let bound =
            bind_parameters(&spec(), &params(json!({"a": 15, "b": 27}))).expect("binding succeeds");

        assert_eq!(bound["a"], json!(15));
        assert_eq!(bound["b"], json!(27));
    }

    #[test]
    fn non_numeric_input_for_number_is_rejected() {
        let err = bind_parameters(&spec(), &params(json!({"a": "fifteen", "b": 2})))
            .expect_err("non-numeric string must fail");

        assert_eq!(
            err,
            DispatchError::validation("invalid parameter a: expected number")
        );
    }

    #[test]
    fn integer_kind_rejects_fractional_values() {
        let spec = vec![ParamSpec::required("user_id", ParamKind::Integer)];

        let err = bind_parameters(&spec, &params(json!({"user_id": 1.5})))
            .expect_err("fractional id must fail");
        assert_eq!(
            err,
            DispatchError::validation("invalid parameter user_id: expected integer")
        );

        let bound =
            bind_parameters(&spec, &params(json!({"user_id": 2.0}))).expect("whole float binds");
        assert_eq!(bound["user_id"], json!(2));
    }

    #[test]
    fn string_kind_rejects_numbers() {
        let spec = vec![ParamSpec::required("title", ParamKind::String)];

        let err = bind_parameters(&spec, &params(json!({"title": 42})))
            .expect_err("number for string must fail");
        assert_eq!(
            err,
            DispatchError::validation("invalid parameter title: expected string")
        );
    }

    #[test]
    fn boolean_kind_accepts_literal_strings_only() {
        let spec = vec![ParamSpec::required("debug", ParamKind::Boolean)];

        let bound =
            bind_parameters(&spec, &params(json!({"debug": "true"}))).expect("literal binds");
        assert_eq!(bound["debug"], json!(true));

        let err = bind_parameters(&spec, &params(json!({"debug": "yes"})))
            .expect_err("non-literal must fail");
        assert_eq!(
            err,
            DispatchError::validation("invalid parameter debug: expected boolean")
        );
    }

    #[test]
    fn number_list_coerces_each_element() {
        let spec = vec![ParamSpec::required("numbers", ParamKind::NumberList)];

        let bound = bind_parameters(&spec, &params(json!({"numbers": [1, "2", 3.5]})))
            .expect("list binds");
        assert_eq!(bound["numbers"], json!([1, 2, 3.5]));

        let err = bind_parameters(&spec, &params(json!({"numbers": [1, "two"]})))
            .expect_err("bad element must fail");
        assert_eq!(
            err,
            DispatchError::validation("invalid parameter numbers: expected number list")
        );
    }

    #[test]
    fn handler_fault_becomes_execution_failure() {
        let descriptor = ToolDescriptor {
            name: "broken".to_string(),
            params: vec![],
            handler: Box::new(|_| Err(HandlerError::new("user 9 not found"))),
        };

        let envelope = invoke_tool(&descriptor, &Map::new());
        assert_eq!(
            envelope,
            Envelope::failure(ErrorKind::Execution, "user 9 not found")
        );
    }

    #[test]
    fn handler_panic_becomes_execution_failure() {
        let descriptor = ToolDescriptor {
            name: "panicky".to_string(),
            params: vec![],
            handler: Box::new(|_| panic!("arithmetic went sideways")),
        };

        let envelope = invoke_tool(&descriptor, &Map::new());
        assert_eq!(
            envelope,
            Envelope::failure(
                ErrorKind::Execution,
                "handler panicked: arithmetic went sideways"
            )
        );
    }

    #[test]
    fn handler_is_not_invoked_when_binding_fails() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_handler = Arc::clone(&calls);
        let descriptor = ToolDescriptor {
            name: "counted".to_string(),
            params: vec![ParamSpec::required("title", ParamKind::String)],
            handler: Box::new(move |_| {
                calls_in_handler.fetch_add(1, Ordering::SeqCst);
                Ok(json!({}))
            }),
        };

        let envelope = invoke_tool(&descriptor, &Map::new());
        assert_eq!(
            envelope,
            Envelope::failure(ErrorKind::Validation, "missing parameter title")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn normal_return_is_wrapped_as_success() {
        let descriptor = ToolDescriptor {
            name: "ok".to_string(),
            params: vec![],
            handler: Box::new(|_| Ok(json!({"result": 42}))),
        };

        let envelope = invoke_tool(&descriptor, &Map::new());
        assert_eq!(envelope, Envelope::success(json!({"result": 42})));
    }
}
