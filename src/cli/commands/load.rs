//! Load command - resolve units by name

use crate::cli::args::{LoadArgs, OutputFormat};
use crate::error::{StrataError, StrataResult};
use crate::loader::{LoadedUnit, UnitLoader};
use crate::ui::{Status, Ui};
use std::sync::Arc;

/// Execute the load command
pub async fn execute(args: LoadArgs, loader: &UnitLoader) -> StrataResult<()> {
    let mut results = Vec::with_capacity(args.names.len());
    let mut first_miss = None;

    for name in &args.names {
        match loader.load_unit_with(name, args.resolve) {
            Ok(unit) => results.push((name.as_str(), Some(unit))),
            Err(StrataError::UnitNotFound(miss)) => {
                first_miss.get_or_insert(miss);
                results.push((name.as_str(), None));
            }
            Err(e) => return Err(e),
        }
    }

    match args.format {
        OutputFormat::Table => print_table(&results),
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Plain => print_plain(&results),
    }

    match first_miss {
        Some(miss) => Err(StrataError::UnitNotFound(miss)),
        None => Ok(()),
    }
}

fn print_table(results: &[(&str, Option<Arc<LoadedUnit>>)]) {
    let ui = Ui::detect();
    ui.heading("Units");

    for (name, unit) in results {
        match unit {
            Some(unit) => {
                ui.status(Status::Ok, name);
                ui.field("origin", &unit.origin().to_string());
                ui.field("domain", &unit.domain().to_string());
                ui.field("size", &format!("{} bytes", unit.bytes().len()));
                ui.field("sha256", unit.digest());
            }
            None => ui.status(Status::Error, &format!("{} (not found)", name)),
        }
    }
}

fn print_json(results: &[(&str, Option<Arc<LoadedUnit>>)]) -> StrataResult<()> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, unit)| match unit {
            Some(unit) => serde_json::json!({
                "name": name,
                "found": true,
                "origin": unit.origin().to_string(),
                "domain": unit.domain().origin,
                "package": unit.domain().metadata,
                "size": unit.bytes().len(),
                "sha256": unit.digest(),
            }),
            None => serde_json::json!({ "name": name, "found": false }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn print_plain(results: &[(&str, Option<Arc<LoadedUnit>>)]) {
    for (name, unit) in results {
        match unit {
            Some(unit) => println!("{}\t{}", name, unit.origin()),
            None => println!("{}\t-", name),
        }
    }
}
