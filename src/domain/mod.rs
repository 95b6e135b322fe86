//! Sample business handlers registered with the dispatch core
//!
//! Provides the in-memory users/tasks store and the tool and resource
//! registrations exercising the dispatch protocol.

pub mod resources;
pub mod store;
pub mod tools;

use std::sync::Arc;

use crate::errors::RegistryError;
use crate::registry::Registry;

use store::DataStore;

/// Build the registry with every sample tool and resource, executed once
/// during process initialization.
pub fn build_registry(store: Arc<DataStore>) -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    tools::register_tools(&mut registry, Arc::clone(&store))?;
    resources::register_resources(&mut registry, store)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_with_all_sample_targets() {
        let registry = build_registry(Arc::new(DataStore::with_sample_data()))
            .expect("sample registration has no duplicates");

        assert_eq!(
            registry.tool_names(),
            vec![
                "add_numbers",
                "calculate_statistics",
                "create_task",
                "get_tasks",
                "get_user",
                "list_users",
                "multiply_numbers",
            ]
        );
        assert_eq!(
            registry.resource_paths(),
            vec!["config", "summary", "users/list"]
        );
    }
}
