//! Whitelist commands

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;

use always_private_core::{normalize_domain, Management};

use crate::state::AppState;

pub fn list(state: &AppState, out: &mut impl Write) -> Result<()> {
    for domain in state.extension().management().list()? {
        writeln!(out, "{}", domain)?;
    }
    Ok(())
}

pub fn add(state: &AppState, domains: &[String], out: &mut impl Write) -> Result<()> {
    let management = state.extension().management();
    for domain in domains {
        let added = management
            .add_domain(domain)
            .with_context(|| format!("Could not add '{}'", domain))?;
        let host = normalize_domain(domain).unwrap_or_else(|| domain.trim().to_string());
        if added {
            writeln!(out, "added {}", host)?;
        } else {
            writeln!(out, "unchanged {}", host)?;
        }
    }
    Ok(())
}

pub fn remove(state: &AppState, domain: &str, out: &mut impl Write) -> Result<()> {
    if state.extension().management().remove_domain(domain)? {
        writeln!(out, "removed {}", domain.trim())?;
    } else {
        writeln!(out, "not whitelisted {}", domain.trim())?;
    }
    Ok(())
}

/// Export to `output`, or to `out` when no target is given
pub fn export(state: &AppState, output: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let management = state.extension().management();
    match output {
        Some(target) => {
            let path = management.export_to(target)?;
            writeln!(out, "exported to {}", path.display())?;
        }
        None => {
            writeln!(out, "{}", management.export_json()?)?;
        }
    }
    Ok(())
}

pub fn import(state: &AppState, file: &Path, out: &mut impl Write) -> Result<()> {
    match state.extension().management().import_file(file) {
        Ok(summary) => {
            writeln!(
                out,
                "imported {} new domain(s), {} total",
                summary.added, summary.total
            )?;
            Ok(())
        }
        Err(e) => bail!(Management::import_error_message(&e)),
    }
}
