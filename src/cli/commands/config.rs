use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::check_config_file;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration ({}):\n", path.display());
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("{}", yaml);
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; run `campusledger init` first.",
                    path.display()
                ));
            } else {
                let added = check_config_file(&path)?;
                if added.is_empty() {
                    success("Configuration is complete.");
                } else {
                    success(format!("Added missing fields: {}", added.join(", ")));
                }
            }
            // surface an unusable timezone right away
            cfg.reference_tz()?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            info(format!("Configuration file edited: {}", path.display()));
        }
    }

    Ok(())
}
