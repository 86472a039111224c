use anyhow::{Result, bail};
use checkin_core::checkin::{NotePrivacy, NoteUpdate};

use super::{App, ensure_applied, resolve_id, short_id};

fn resolve_note(app: &App, input: &str) -> Result<String> {
    let session = app.active_session()?;
    resolve_id(input, session.draft_notes.iter().map(|n| n.id.as_str()))
}

fn ensure_category_selected(app: &App, category: &str) -> Result<()> {
    if !app.active_session()?.is_selected(category) {
        bail!("'{}' is not a selected topic", category);
    }
    Ok(())
}

pub fn add(
    app: &mut App,
    content: String,
    privacy: NotePrivacy,
    category: Option<String>,
) -> Result<()> {
    app.active_session()?;
    if let Some(category) = category.as_deref() {
        ensure_category_selected(app, category)?;
    }

    match app.engine.add_draft_note(content, privacy, category) {
        Some(note) => println!("Added draft note {}", short_id(&note.id)),
        None => bail!("Rejected: note was not added"),
    }
    Ok(())
}

pub fn edit(
    app: &mut App,
    id: &str,
    content: Option<String>,
    privacy: Option<NotePrivacy>,
    category: Option<Option<String>>,
) -> Result<()> {
    let note_id = resolve_note(app, id)?;
    if let Some(Some(category)) = category.as_ref() {
        ensure_category_selected(app, category)?;
    }

    let update = NoteUpdate {
        content,
        privacy,
        category_id: category,
    };
    if update == NoteUpdate::default() {
        bail!("Nothing to update: pass --content, --privacy, --category or --detach");
    }

    ensure_applied(
        app.engine.update_draft_note(&note_id, update),
        "note not found",
    )?;
    println!("Updated draft note {}", short_id(&note_id));
    Ok(())
}

pub fn remove(app: &mut App, id: &str) -> Result<()> {
    let note_id = resolve_note(app, id)?;
    ensure_applied(app.engine.remove_draft_note(&note_id), "note not found")?;
    println!("Removed draft note {}", short_id(&note_id));
    Ok(())
}
