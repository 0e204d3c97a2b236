//! Task CRUD operations.

use chrono::Utc;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::{DaydeskError, DaydeskResult};
use crate::logger;
use crate::store::collections::TASKS;
use crate::store::{Document, DocumentStore, QueryFilter};
use crate::task::{NewTask, Task, TaskPatch};

/// All tasks owned by `user`, newest first. Fail-soft: a store failure
/// is logged and yields an empty vec.
pub async fn get_tasks<S: DocumentStore>(store: &S, user: &AuthUser) -> Vec<Task> {
    let filter = QueryFilter::for_user(&user.uid);

    match store.query(TASKS, &filter).await {
        Ok(docs) => docs.into_iter().filter_map(task_from_document).collect(),
        Err(err) => {
            logger::error("Error getting tasks", Some(&err));
            Vec::new()
        }
    }
}

fn task_from_document(doc: Document) -> Option<Task> {
    match serde_json::from_value::<Task>(doc.fields) {
        Ok(mut task) => {
            task.id = doc.id;
            Some(task)
        }
        Err(err) => {
            logger::warn(&format!("Skipping malformed task document {}: {err}", doc.id));
            None
        }
    }
}

/// Write a new task owned by `user`. Stamps the creation time, returns
/// the merged record including the store-assigned id.
pub async fn add_task<S: DocumentStore>(
    store: &S,
    user: &AuthUser,
    task: NewTask,
) -> DaydeskResult<Task> {
    let created_at = Utc::now();

    let mut fields = serde_json::to_value(&task)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;
    if let Some(obj) = fields.as_object_mut() {
        obj.insert("userId".to_string(), json!(user.uid));
        obj.insert("createdAt".to_string(), json!(created_at));
    }

    match store.add(TASKS, fields).await {
        Ok(id) => Ok(task.into_task(id, user.uid.clone(), created_at)),
        Err(err) => {
            logger::error("Error adding task", Some(&err));
            Err(err)
        }
    }
}

/// Write only the supplied fields onto an existing task.
pub async fn update_task<S: DocumentStore>(
    store: &S,
    task_id: &str,
    patch: &TaskPatch,
) -> DaydeskResult<bool> {
    let fields = serde_json::to_value(patch)
        .map_err(|e| DaydeskError::Serialization(e.to_string()))?;

    match store.update(TASKS, task_id, fields).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error updating task", Some(&err));
            Err(err)
        }
    }
}

/// Remove a task by id.
pub async fn delete_task<S: DocumentStore>(store: &S, task_id: &str) -> DaydeskResult<bool> {
    match store.delete(TASKS, task_id).await {
        Ok(()) => Ok(true),
        Err(err) => {
            logger::error("Error deleting task", Some(&err));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing::instrument::WithSubscriber;

    use super::*;
    use crate::store::testing::MemoryStore;
    use crate::task::Priority;

    fn user() -> AuthUser {
        AuthUser {
            uid: "user-1".to_string(),
            email: Some("user@example.com".to_string()),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_get_returns_record_with_assigned_id() {
        let store = MemoryStore::new();

        let added = add_task(&store, &user(), NewTask::new("Write report"))
            .await
            .unwrap();
        assert!(!added.id.is_empty());
        assert_eq!(added.user_id, "user-1");

        let tasks = get_tasks(&store, &user()).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, added.id);
        assert_eq!(tasks[0].title, "Write report");
    }

    #[tokio::test]
    async fn test_get_tasks_is_scoped_to_the_caller() {
        let store = MemoryStore::new();
        add_task(&store, &user(), NewTask::new("Mine")).await.unwrap();

        let other = AuthUser {
            uid: "user-2".to_string(),
            email: None,
            display_name: None,
        };
        assert!(get_tasks(&store, &other).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_tasks_orders_newest_first() {
        let store = MemoryStore::new();
        let me = user();
        add_task(&store, &me, NewTask::new("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        add_task(&store, &me, NewTask::new("second")).await.unwrap();

        let tasks = get_tasks(&store, &me).await;
        assert_eq!(tasks[0].title, "second");
        assert_eq!(tasks[1].title, "first");
    }

    #[tokio::test]
    async fn test_get_tasks_fails_soft() {
        let store = MemoryStore::new();
        store.fail_next_calls();

        let tasks = get_tasks(&store, &user()).await;
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_writes_propagate_store_failures() {
        let store = MemoryStore::new();
        let added = add_task(&store, &user(), NewTask::new("t")).await.unwrap();

        store.fail_next_calls();
        assert!(add_task(&store, &user(), NewTask::new("x")).await.is_err());
        assert!(
            update_task(&store, &added.id, &TaskPatch::default())
                .await
                .is_err()
        );
        assert!(delete_task(&store, &added.id).await.is_err());
    }

    /// Subscriber that counts ERROR events, for asserting on the error
    /// log path.
    struct ErrorCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for ErrorCounter {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[tokio::test]
    async fn test_failed_read_logs_error_exactly_once() {
        let store = MemoryStore::new();
        store.fail_next_calls();

        let errors = Arc::new(AtomicUsize::new(0));
        let tasks = get_tasks(&store, &user())
            .with_subscriber(ErrorCounter(errors.clone()))
            .await;

        assert!(tasks.is_empty());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_write_logs_error_exactly_once() {
        let store = MemoryStore::new();
        store.fail_next_calls();

        let errors = Arc::new(AtomicUsize::new(0));
        let outcome = add_task(&store, &user(), NewTask::new("x"))
            .with_subscriber(ErrorCounter(errors.clone()))
            .await;

        assert!(outcome.is_err());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_writes_only_supplied_fields() {
        let store = MemoryStore::new();
        let me = user();
        let mut new = NewTask::new("Refactor parser");
        new.priority = Some(Priority::High);
        let added = add_task(&store, &me, new).await.unwrap();

        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert!(update_task(&store, &added.id, &patch).await.unwrap());

        let tasks = get_tasks(&store, &me).await;
        assert!(tasks[0].completed);
        // Untouched fields survive the partial write.
        assert_eq!(tasks[0].priority, Some(Priority::High));
        assert_eq!(tasks[0].title, "Refactor parser");
    }

    #[tokio::test]
    async fn test_delete_removes_the_record() {
        let store = MemoryStore::new();
        let me = user();
        let added = add_task(&store, &me, NewTask::new("gone soon")).await.unwrap();

        assert!(delete_task(&store, &added.id).await.unwrap());
        assert!(get_tasks(&store, &me).await.is_empty());
    }
}
