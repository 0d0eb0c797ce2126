//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::StrataResult;
use crate::ui::{Status, Ui};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> StrataResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> StrataResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> StrataResult<()> {
    let ui = Ui::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui.status(
            Status::Warn,
            &format!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            ),
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui.status(
        Status::Ok,
        &format!("Configuration initialized at {}", path.display()),
    );

    Ok(())
}
