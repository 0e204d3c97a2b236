use anyhow::Result;
use daydesk_core::data::{add_task, delete_task, get_tasks, update_task};
use daydesk_core::{NewTask, Priority, TaskPatch};

use crate::render::Render;

pub async fn list() -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let tasks = get_tasks(&remote, &user).await;

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for task in &tasks {
        println!("{}", task.render());
    }

    Ok(())
}

pub async fn add(
    title: String,
    due: Option<&str>,
    priority: Option<&str>,
    category: Option<String>,
) -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let mut task = NewTask::new(title);
    if let Some(due) = due {
        task.due_date = Some(super::parse_instant(due)?);
    }
    if let Some(priority) = priority {
        task.priority = Some(Priority::from_str_opt(priority).ok_or_else(|| {
            anyhow::anyhow!("Invalid priority '{priority}'. Expected low, medium or high")
        })?);
    }
    task.category = category;

    let task = add_task(&remote, &user, task).await?;
    println!("{}", task.render());

    Ok(())
}

pub async fn done(id: &str) -> Result<()> {
    let remote = super::remote();
    super::require_user(&remote).await?;

    let patch = TaskPatch {
        completed: Some(true),
        progress: Some(100.0),
        ..Default::default()
    };
    update_task(&remote, id, &patch).await?;
    println!("Task {id} completed.");

    Ok(())
}

pub async fn rm(id: &str) -> Result<()> {
    let remote = super::remote();
    super::require_user(&remote).await?;

    delete_task(&remote, id).await?;
    println!("Task {id} deleted.");

    Ok(())
}
