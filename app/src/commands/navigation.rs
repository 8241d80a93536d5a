//! Navigation commands
//!
//! Run navigations through the real interceptor against the in-process
//! browser, using the persisted whitelist.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use always_private_core::{Decision, NavigationEvent};

use crate::state::AppState;

/// Decide a single top-level navigation to `url`
pub fn check(state: &AppState, url: &str, out: &mut impl Write) -> Result<Decision> {
    let decision = state
        .extension()
        .handle_navigation(&NavigationEvent::main_frame(url, None));

    writeln!(out, "{}", serde_json::to_string(&decision)?)?;
    Ok(decision)
}

/// Replay a JSON array of recorded request details
pub fn simulate(state: &AppState, events_file: &Path, out: &mut impl Write) -> Result<Vec<Decision>> {
    let text = std::fs::read_to_string(events_file)
        .with_context(|| format!("Could not read {}", events_file.display()))?;
    let events: Vec<NavigationEvent> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a list of navigation events", events_file.display()))?;

    let mut decisions = Vec::with_capacity(events.len());
    for event in &events {
        let decision = state.extension().handle_navigation(event);
        writeln!(out, "{}", serde_json::to_string(&decision)?)?;
        decisions.push(decision);
    }

    let browser = state.browser();
    let private_windows = browser.windows().iter().filter(|w| w.incognito).count();
    writeln!(
        out,
        "{} event(s), {} cancelled, {} private window(s), {} private tab(s)",
        events.len(),
        decisions.iter().filter(|d| d.cancels()).count(),
        private_windows,
        browser.private_tabs().len()
    )?;

    Ok(decisions)
}
