use anyhow::{Result, bail};
use checkin_core::checkin::{CategoryProgressUpdate, CheckInStep, can_advance_to, can_proceed};

use super::session::print_session;
use super::{App, ensure_applied};

/// Why leaving `step` forward is blocked.
fn blocked_reason(step: CheckInStep) -> String {
    match step {
        CheckInStep::CategorySelection => {
            "select at least one topic first (`checkin select` or `checkin toggle`)".to_string()
        }
        CheckInStep::Completion => {
            "this is the last step; run `checkin complete` to finish".to_string()
        }
        other => format!("cannot leave '{}' yet", other),
    }
}

pub fn next(app: &mut App) -> Result<()> {
    let session = app.active_session()?;
    let current = session.progress.current_step;
    let reason = if can_proceed(current, session) {
        format!("'{}' is already complete", current)
    } else {
        blocked_reason(current)
    };

    ensure_applied(app.engine.next_step(), reason)?;
    print_session(app.active_session()?);
    Ok(())
}

pub fn back(app: &mut App) -> Result<()> {
    app.active_session()?;
    ensure_applied(app.engine.previous_step(), "already on the first step")?;
    print_session(app.active_session()?);
    Ok(())
}

pub fn goto(app: &mut App, step: CheckInStep) -> Result<()> {
    let session = app.active_session()?;
    let current = session.progress.current_step;
    if step == current {
        println!("Already on '{}'.", step);
        return Ok(());
    }
    let reason = if step.index() == current.index() + 1 && !can_advance_to(step, session) {
        blocked_reason(current)
    } else {
        format!("'{}' is not reachable from '{}'", step, current)
    };

    ensure_applied(app.engine.go_to_step(step), reason)?;
    print_session(app.active_session()?);
    Ok(())
}

pub fn select(app: &mut App, categories: Vec<String>) -> Result<()> {
    app.active_session()?;
    app.ensure_known_categories(&categories)?;
    ensure_applied(
        app.engine.select_categories(categories),
        "topics can only be changed on the welcome or topic selection step",
    )?;
    print_session(app.active_session()?);
    Ok(())
}

pub fn toggle(app: &mut App, category: &str) -> Result<()> {
    app.active_session()?;
    app.ensure_known_categories(&[category.to_string()])?;
    ensure_applied(
        app.engine.toggle_category(category),
        "topics can only be changed on the welcome or topic selection step",
    )?;
    print_session(app.active_session()?);
    Ok(())
}

pub fn progress(
    app: &mut App,
    category: &str,
    complete: bool,
    notes: Option<String>,
    time: Option<u64>,
) -> Result<()> {
    let session = app.active_session()?;
    if !session.is_selected(category) {
        bail!("Rejected: '{}' is not a selected topic", category);
    }

    let update = CategoryProgressUpdate {
        is_completed: complete.then_some(true),
        notes,
        time_spent: None,
    };
    if update.is_empty() && time.is_none() {
        bail!("Nothing to update: pass --complete, --notes or --time");
    }

    if !update.is_empty() {
        ensure_applied(
            app.engine.set_category_progress(category, update),
            format!("could not update '{}'", category),
        )?;
    }
    if let Some(seconds) = time {
        ensure_applied(
            app.engine.record_time_spent(category, seconds),
            format!("could not record time on '{}'", category),
        )?;
    }

    print_session(app.active_session()?);
    Ok(())
}
