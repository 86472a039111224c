use anyhow::{Result, bail};
use checkin_core::catalog::CategoryCatalog;
use checkin_core::checkin::{
    CheckIn, CheckInRepository, CheckInSession, CheckInStep, FinishedCheckIn,
};

use super::{App, short_id};

pub fn categories(app: &App) {
    for category in app.catalog.categories() {
        println!("{} {:<14} {}", category.icon, category.id, category.name);
        for prompt in &category.prompts {
            println!("      - {}", prompt);
        }
    }
}

pub fn start(app: &mut App, categories: Vec<String>) -> Result<()> {
    if let Some(session) = app.engine.session() {
        bail!(
            "A check-in is already in progress (step '{}'). Finish it with `checkin complete` or `checkin abandon`.",
            session.progress.current_step
        );
    }
    app.ensure_known_categories(&categories)?;

    let session = app.engine.start_check_in(categories);
    println!("Started check-in {}", short_id(session.check_in_id()));
    print_session(session);
    Ok(())
}

pub fn status(app: &App, json: bool) -> Result<()> {
    let session = app.active_session()?;
    if json {
        println!("{}", serde_json::to_string_pretty(session)?);
    } else {
        print_session(session);
    }
    Ok(())
}

/// Fails when the finished record never reached the history. The session is
/// already gone, so the record is printed for the user to keep.
fn ensure_stored(finished: &FinishedCheckIn) -> Result<()> {
    if !finished.stored {
        eprintln!("{}", serde_json::to_string_pretty(&finished.record)?);
        bail!(
            "Check-in {} ended but could not be saved to history; its contents are printed above",
            short_id(&finished.record.id)
        );
    }
    Ok(())
}

pub fn complete(app: &mut App) -> Result<()> {
    app.active_session()?;
    if let Some(finished) = app.engine.complete_check_in() {
        ensure_stored(&finished)?;
        println!(
            "Check-in completed: {} notes saved, {} action items.",
            finished.record.committed_notes.len(),
            finished.record.action_items.len()
        );
    }
    Ok(())
}

pub fn abandon(app: &mut App) -> Result<()> {
    app.active_session()?;
    if let Some(finished) = app.engine.abandon_check_in() {
        ensure_stored(&finished)?;
        println!(
            "Check-in abandoned. Draft notes discarded; {} action items kept.",
            finished.record.action_items.len()
        );
    }
    Ok(())
}

pub fn history(app: &App) -> Result<()> {
    let records = app.history.list_all()?;
    if records.is_empty() {
        println!("No past check-ins.");
        return Ok(());
    }
    for record in &records {
        print_record(record);
    }
    Ok(())
}

fn print_record(record: &CheckIn) {
    println!(
        "{}  {}  {:<11} topics: {}  notes: {}  actions: {}",
        short_id(&record.id),
        record.started_at.format("%Y-%m-%d %H:%M"),
        record.status,
        record.categories.join(", "),
        record.committed_notes.len(),
        record.action_items.len()
    );
}

pub(crate) fn print_session(session: &CheckInSession) {
    let progress = &session.progress;
    println!(
        "Step {}/{}: {} ({}%)",
        progress.current_step.index() + 1,
        progress.total_steps,
        progress.current_step.title(),
        progress.percentage
    );

    let steps: Vec<String> = CheckInStep::ALL
        .iter()
        .map(|step| {
            let mark = if *step == progress.current_step {
                ">"
            } else if progress.completed_steps.contains(step) {
                "x"
            } else {
                " "
            };
            format!("[{}] {}", mark, step)
        })
        .collect();
    println!("  {}", steps.join("  "));

    if session.category_progress.is_empty() {
        println!("Topics: none selected");
    } else {
        println!("Topics:");
        for entry in &session.category_progress {
            println!(
                "  [{}] {:<14} {}s{}",
                if entry.is_completed { "x" } else { " " },
                entry.category_id,
                entry.time_spent,
                if entry.notes.is_empty() {
                    String::new()
                } else {
                    format!("  \"{}\"", entry.notes)
                }
            );
        }
    }

    if !session.draft_notes.is_empty() {
        println!("Draft notes:");
        for note in &session.draft_notes {
            println!(
                "  {} ({}{}) {}",
                short_id(&note.id),
                note.privacy,
                note.category_id
                    .as_deref()
                    .map(|c| format!(", {}", c))
                    .unwrap_or_default(),
                note.content
            );
        }
    }

    let items = session.action_items();
    if !items.is_empty() {
        println!("Action items:");
        for item in items {
            println!(
                "  {} [{}] {} ({}{})",
                short_id(&item.id),
                if item.completed { "x" } else { " " },
                item.title,
                item.priority,
                item.assigned_to
                    .as_deref()
                    .map(|a| format!(", {}", a))
                    .unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(stored: bool) -> FinishedCheckIn {
        let record: CheckIn = serde_json::from_str(
            r#"{
                "id": "5b1d7c3e-0000-4000-8000-000000000002",
                "coupleId": "alex-and-sam",
                "participants": ["alex", "sam"],
                "startedAt": "2025-03-01T19:00:00Z",
                "completedAt": "2025-03-01T19:40:00Z",
                "status": "completed",
                "categories": ["communication"],
                "committedNotes": [],
                "actionItems": []
            }"#,
        )
        .unwrap();
        FinishedCheckIn { record, stored }
    }

    #[test]
    fn test_unsaved_record_fails_the_command() {
        assert!(ensure_stored(&finished(true)).is_ok());

        let err = ensure_stored(&finished(false)).unwrap_err();
        assert!(err.to_string().contains("could not be saved"));
        assert!(err.to_string().contains("5b1d7c3e"));
    }
}
