//! Sources command - show registered sources

use crate::cli::args::{OutputFormat, SourcesArgs};
use crate::error::StrataResult;
use crate::loader::{SourceInfo, SourceKind, UnitLoader};
use crate::ui::{Status, Ui};
use console::style;

/// Execute the sources command
pub async fn execute(args: SourcesArgs, loader: &UnitLoader) -> StrataResult<()> {
    let sources = loader.sources();

    if sources.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                Ui::detect().status(Status::Info, "No sources registered");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&sources),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sources)?),
        OutputFormat::Plain => {
            for source in &sources {
                println!("{}", source.location);
            }
        }
    }

    Ok(())
}

fn print_table(sources: &[SourceInfo]) {
    Ui::detect().heading("Sources");

    println!(
        "{:<10} {:<8} {:<8} {}",
        style("KIND").bold(),
        style("UNITS").bold(),
        style("ACTIVE").bold(),
        style("LOCATION").bold()
    );
    println!("{}", "-".repeat(60));

    for source in sources {
        let kind = match source.kind {
            SourceKind::Directory => style("dir").cyan(),
            SourceKind::Archive => style("archive").magenta(),
        };
        println!(
            "{:<10} {:<8} {:<8} {}",
            kind, source.units, source.indexed, source.location
        );
    }

    println!();
    println!("{} source(s)", sources.len());
}
