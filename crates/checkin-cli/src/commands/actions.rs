use anyhow::{Result, bail};
use checkin_core::checkin::{ActionItemUpdate, Priority};

use super::{App, ensure_applied, resolve_id, short_id};

fn resolve_item(app: &App, input: &str) -> Result<String> {
    let session = app.active_session()?;
    resolve_id(input, session.action_items().iter().map(|i| i.id.as_str()))
}

pub fn add(
    app: &mut App,
    title: String,
    priority: Priority,
    assigned_to: Option<String>,
) -> Result<()> {
    app.active_session()?;
    if title.trim().is_empty() {
        bail!("Action item title must not be empty");
    }
    if let Some(partner) = assigned_to.as_deref() {
        app.ensure_known_partner(partner)?;
    }

    match app.engine.add_action_item(title, priority, assigned_to) {
        Some(item) => println!("Added action item {}", short_id(&item.id)),
        None => bail!("Rejected: action item was not added"),
    }
    Ok(())
}

pub fn edit(
    app: &mut App,
    id: &str,
    title: Option<String>,
    priority: Option<Priority>,
    assigned_to: Option<Option<String>>,
) -> Result<()> {
    let item_id = resolve_item(app, id)?;
    if let Some(Some(partner)) = assigned_to.as_ref() {
        app.ensure_known_partner(partner)?;
    }

    let update = ActionItemUpdate {
        title,
        priority,
        assigned_to,
    };
    if update == ActionItemUpdate::default() {
        bail!("Nothing to update: pass --title, --priority, --assign or --unassign");
    }

    ensure_applied(
        app.engine.update_action_item(&item_id, update),
        "action item not found",
    )?;
    println!("Updated action item {}", short_id(&item_id));
    Ok(())
}

pub fn toggle(app: &mut App, id: &str) -> Result<()> {
    let item_id = resolve_item(app, id)?;
    ensure_applied(
        app.engine.toggle_action_item(&item_id),
        "action item not found",
    )?;

    let done = app
        .active_session()?
        .action_item(&item_id)
        .is_some_and(|i| i.completed);
    println!(
        "Action item {} is now {}",
        short_id(&item_id),
        if done { "done" } else { "open" }
    );
    Ok(())
}

pub fn remove(app: &mut App, id: &str) -> Result<()> {
    let item_id = resolve_item(app, id)?;
    ensure_applied(
        app.engine.remove_action_item(&item_id),
        "action item not found",
    )?;
    println!("Removed action item {}", short_id(&item_id));
    Ok(())
}
