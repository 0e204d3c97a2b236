use anyhow::Result;
use daydesk_core::NewNote;
use daydesk_core::data::{add_note, delete_note, get_notes};

use crate::render::Render;

pub async fn list() -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let notes = get_notes(&remote, &user).await;

    if notes.is_empty() {
        println!("No notes.");
        return Ok(());
    }

    for (i, note) in notes.iter().enumerate() {
        println!("{}", note.render());

        if i < notes.len() - 1 {
            println!();
        }
    }

    Ok(())
}

pub async fn add(title: String, content: String, color: String) -> Result<()> {
    let remote = super::remote();
    let user = super::require_user(&remote).await?;

    let note = add_note(&remote, &user, NewNote::new(title, content, color)).await?;
    println!("{}", note.render());

    Ok(())
}

pub async fn rm(id: &str) -> Result<()> {
    let remote = super::remote();
    super::require_user(&remote).await?;

    delete_note(&remote, id).await?;
    println!("Note {id} deleted.");

    Ok(())
}
