//! Sample tool handlers
//!
//! Arithmetic, statistics and user/task management tools, registered with
//! their parameter specs. Handlers receive parameters already bound and
//! coerced by the invoker and report domain failures as [`HandlerError`].

use std::sync::Arc;

use serde_json::{json, Map, Number, Value};

use crate::errors::{HandlerError, RegistryError};
use crate::registry::{ParamKind, ParamSpec, Registry};

use super::store::DataStore;

pub fn register_tools(registry: &mut Registry, store: Arc<DataStore>) -> Result<(), RegistryError> {
    registry.register_tool(
        "add_numbers",
        vec![
            ParamSpec::required("a", ParamKind::Number),
            ParamSpec::required("b", ParamKind::Number),
        ],
        Box::new(|params| {
            let a = require_f64(params, "a")?;
            let b = require_f64(params, "b")?;
            Ok(json!({
                "operation": "addition",
                "a": params["a"],
                "b": params["b"],
                "result": json_number(a + b),
            }))
        }),
    )?;

    registry.register_tool(
        "multiply_numbers",
        vec![
            ParamSpec::required("a", ParamKind::Number),
            ParamSpec::required("b", ParamKind::Number),
        ],
        Box::new(|params| {
            let a = require_f64(params, "a")?;
            let b = require_f64(params, "b")?;
            Ok(json!({
                "operation": "multiplication",
                "a": params["a"],
                "b": params["b"],
                "result": json_number(a * b),
            }))
        }),
    )?;

    registry.register_tool(
        "calculate_statistics",
        vec![ParamSpec::required("numbers", ParamKind::NumberList)],
        Box::new(|params| {
            let numbers = require_f64_list(params, "numbers")?;
            if numbers.is_empty() {
                return Err(HandlerError::new("empty list provided"));
            }

            let count = numbers.len();
            let sum: f64 = numbers.iter().sum();
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            Ok(json!({
                "count": count,
                "sum": json_number(sum),
                "mean": json_number(sum / count as f64),
                "min": json_number(min),
                "max": json_number(max),
            }))
        }),
    )?;

    let user_store = Arc::clone(&store);
    registry.register_tool(
        "get_user",
        vec![ParamSpec::required("user_id", ParamKind::Integer)],
        Box::new(move |params| {
            let user_id = require_i64(params, "user_id")?;
            let user = u64::try_from(user_id)
                .ok()
                .and_then(|id| user_store.find_user(id))
                .ok_or_else(|| HandlerError::new(format!("user {user_id} not found")))?;

            Ok(json!({ "user": user }))
        }),
    )?;

    let user_store = Arc::clone(&store);
    registry.register_tool(
        "list_users",
        vec![],
        Box::new(move |_| {
            let users = user_store.users();
            Ok(json!({
                "count": users.len(),
                "users": users,
            }))
        }),
    )?;

    let task_store = Arc::clone(&store);
    registry.register_tool(
        "get_tasks",
        vec![ParamSpec::optional("filter_status", ParamKind::String)],
        Box::new(move |params| {
            let filter = params.get("filter_status").and_then(Value::as_str);
            let tasks: Vec<_> = task_store
                .tasks_snapshot()
                .into_iter()
                .filter(|task| match filter {
                    Some(status) => status_label(task.status) == status,
                    None => true,
                })
                .collect();

            Ok(json!({
                "count": tasks.len(),
                "tasks": tasks,
            }))
        }),
    )?;

    registry.register_tool(
        "create_task",
        vec![
            ParamSpec::required("title", ParamKind::String),
            ParamSpec::required("assigned_to", ParamKind::Integer),
        ],
        Box::new(move |params| {
            let title = require_str(params, "title")?;
            let assigned_to = require_i64(params, "assigned_to")?;
            let assignee = u64::try_from(assigned_to)
                .ok()
                .filter(|id| store.find_user(*id).is_some())
                .ok_or_else(|| HandlerError::new(format!("user {assigned_to} not found")))?;

            let task = store.append_task(title.to_string(), assignee);
            Ok(json!({
                "message": "Task created successfully",
                "task": task,
            }))
        }),
    )?;

    Ok(())
}

fn status_label(status: super::store::TaskStatus) -> &'static str {
    match status {
        super::store::TaskStatus::Completed => "completed",
        super::store::TaskStatus::InProgress => "in_progress",
        super::store::TaskStatus::Pending => "pending",
    }
}

/// Emit whole results as JSON integers, matching the inputs callers sent.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

fn require_f64(params: &Map<String, Value>, key: &str) -> Result<f64, HandlerError> {
    params
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| HandlerError::new(format!("parameter {key} is not bound as a number")))
}

fn require_i64(params: &Map<String, Value>, key: &str) -> Result<i64, HandlerError> {
    params
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| HandlerError::new(format!("parameter {key} is not bound as an integer")))
}

fn require_str<'a>(params: &'a Map<String, Value>, key: &str) -> Result<&'a str, HandlerError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| HandlerError::new(format!("parameter {key} is not bound as a string")))
}

fn require_f64_list(params: &Map<String, Value>, key: &str) -> Result<Vec<f64>, HandlerError> {
    params
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).collect::<Vec<_>>())
        .ok_or_else(|| HandlerError::new(format!("parameter {key} is not bound as a number list")))
}
