//! Sample resource handlers
//!
//! Parameterless reads over the shared store, registered by path.

use std::sync::Arc;

use serde_json::json;

use crate::errors::RegistryError;
use crate::registry::Registry;

use super::store::{DataStore, TaskStatus};

pub const USERS_RESOURCE: &str = "users/list";
pub const CONFIG_RESOURCE: &str = "config";
pub const SUMMARY_RESOURCE: &str = "summary";

pub fn register_resources(
    registry: &mut Registry,
    store: Arc<DataStore>,
) -> Result<(), RegistryError> {
    let users_store = Arc::clone(&store);
    registry.register_resource(
        USERS_RESOURCE,
        Box::new(move || {
            let users = users_store.users();
            Ok(json!({
                "count": users.len(),
                "users": users,
            }))
        }),
    )?;

    let config_store = Arc::clone(&store);
    registry.register_resource(
        CONFIG_RESOURCE,
        Box::new(move || Ok(json!(config_store.config()))),
    )?;

    registry.register_resource(
        SUMMARY_RESOURCE,
        Box::new(move || {
            let tasks = store.tasks_snapshot();
            let by_status = |status: TaskStatus| tasks.iter().filter(|task| task.status == status).count();

            Ok(json!({
                "users_count": store.users().len(),
                "tasks_count": tasks.len(),
                "completed_tasks": by_status(TaskStatus::Completed),
                "pending_tasks": by_status(TaskStatus::Pending),
                "in_progress_tasks": by_status(TaskStatus::InProgress),
                "application": store.config().app_name,
            }))
        }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::invoker::invoke_resource;

    fn read(registry: &Registry, path: &str) -> Envelope {
        let descriptor = registry.lookup_resource(path).expect("registered resource");
        invoke_resource(descriptor)
    }

    fn registry_with_store() -> (Registry, Arc<DataStore>) {
        let store = Arc::new(DataStore::with_sample_data());
        let mut registry = Registry::new();
        register_resources(&mut registry, Arc::clone(&store)).expect("sample resources register");
        (registry, store)
    }

    #[test]
    fn users_resource_lists_all_users() {
        let (registry, _) = registry_with_store();

        let Envelope::Success(data) = read(&registry, USERS_RESOURCE) else {
            panic!("expected success");
        };
        assert_eq!(data["count"], json!(3));
        assert_eq!(data["users"][0]["name"], json!("Alice"));
    }

    #[test]
    fn config_resource_returns_app_config() {
        let (registry, _) = registry_with_store();

        assert_eq!(
            read(&registry, CONFIG_RESOURCE),
            Envelope::success(json!({
                "app_name": "Toolwire Sample Application",
                "version": "1.0.0",
                "debug": true,
            }))
        );
    }

    #[test]
    fn summary_resource_counts_tasks_by_status() {
        let (registry, _) = registry_with_store();

        assert_eq!(
            read(&registry, SUMMARY_RESOURCE),
            Envelope::success(json!({
                "users_count": 3,
                "tasks_count": 3,
                "completed_tasks": 1,
                "pending_tasks": 1,
                "in_progress_tasks": 1,
                "application": "Toolwire Sample Application",
            }))
        );
    }

    #[test]
    fn summary_resource_tracks_store_mutation() {
        let (registry, store) = registry_with_store();

        store.append_task("Another".to_string(), 2);

        let Envelope::Success(data) = read(&registry, SUMMARY_RESOURCE) else {
            panic!("expected success");
        };
        assert_eq!(data["tasks_count"], json!(4));
        assert_eq!(data["pending_tasks"], json!(2));
    }

    #[test]
    fn repeated_read_without_mutation_is_identical() {
        let (registry, _) = registry_with_store();

        assert_eq!(
            read(&registry, SUMMARY_RESOURCE),
            read(&registry, SUMMARY_RESOURCE)
        );
    }
}
