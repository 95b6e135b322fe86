//! Shared in-memory users/tasks store
//!
//! Users and app config are fixed after startup; tasks are mutable and sit
//! behind a mutex so concurrent create calls allocate distinct ids. Reads
//! hand out snapshots, so they never observe a half-applied append.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub assigned_to: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub app_name: String,
    pub version: String,
    pub debug: bool,
}

#[derive(Debug)]
pub struct DataStore {
    users: Vec<User>,
    tasks: Mutex<Vec<Task>>,
    config: AppConfig,
}

impl DataStore {
    pub fn new(users: Vec<User>, tasks: Vec<Task>, config: AppConfig) -> Self {
        Self {
            users,
            tasks: Mutex::new(tasks),
            config,
        }
    }

    pub fn with_sample_data() -> Self {
        Self::new(
            vec![
                sample_user(1, "Alice", "alice@example.com", "admin"),
                sample_user(2, "Bob", "bob@example.com", "user"),
                sample_user(3, "Charlie", "charlie@example.com", "user"),
            ],
            vec![
                Task {
                    id: 1,
                    title: "Implement server".to_string(),
                    status: TaskStatus::Completed,
                    assigned_to: 1,
                },
                Task {
                    id: 2,
                    title: "Create client".to_string(),
                    status: TaskStatus::InProgress,
                    assigned_to: 2,
                },
                Task {
                    id: 3,
                    title: "Write tests".to_string(),
                    status: TaskStatus::Pending,
                    assigned_to: 3,
                },
            ],
            AppConfig {
                app_name: "Toolwire Sample Application".to_string(),
                version: "1.0.0".to_string(),
                debug: true,
            },
        )
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tasks_snapshot(&self) -> Vec<Task> {
        self.tasks.lock().expect("task store poisoned").clone()
    }

    /// Append a new pending task, allocating the next id under the lock so
    /// concurrent creates cannot duplicate or skip identifiers.
    pub fn append_task(&self, title: String, assigned_to: u64) -> Task {
        let mut tasks = self.tasks.lock().expect("task store poisoned");
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        let task = Task {
            id: next_id,
            title,
            status: TaskStatus::Pending,
            assigned_to,
        };
        tasks.push(task.clone());
        task
    }
}

fn sample_user(id: u64, name: &str, email: &str, role: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_data_matches_seed() {
        let store = DataStore::with_sample_data();

        assert_eq!(store.users().len(), 3);
        assert_eq!(store.find_user(1).map(|user| user.name.as_str()), Some("Alice"));
        assert!(store.find_user(99).is_none());
        assert_eq!(store.tasks_snapshot().len(), 3);
        assert!(store.config().debug);
    }

    #[test]
    fn append_task_allocates_next_id() {
        let store = DataStore::with_sample_data();

        let task = store.append_task("Setup testing environment".to_string(), 1);
        assert_eq!(task.id, 4);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(store.tasks_snapshot().len(), 4);
    }

    #[test]
    fn concurrent_appends_allocate_distinct_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let store = Arc::new(DataStore::with_sample_data());
        let handles: Vec<_> = (0..50)
            .map(|index| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.append_task(format!("task {index}"), 1).id)
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .map(|handle| handle.join().expect("appender thread"))
            .collect();

        assert_eq!(ids.len(), 50);
        assert_eq!(store.tasks_snapshot().len(), 53);
        assert_eq!(ids.iter().max(), Some(&53));
    }

    #[test]
    fn task_status_serializes_snake_case() {
        let wire = serde_json::to_value(TaskStatus::InProgress).expect("serialize");
        assert_eq!(wire, serde_json::json!("in_progress"));
    }
}
