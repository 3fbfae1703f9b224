use clap::Subcommand;
use cycletrack_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "estimator.variation_cap_days", "display.json")
        key: String,
    },
    /// Set a config value and print the section it belongs to
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            print!("{}", section_after_set(&config, &key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// The saved table holding `key`, so a change to one estimator constant is
/// shown next to the values it was validated against.
fn section_after_set(config: &Config, key: &str) -> Result<String, toml::ser::Error> {
    let (table, body) = match key.split_once('.') {
        Some(("estimator", _)) => ("estimator", toml::to_string_pretty(&config.estimator)?),
        Some(("display", _)) => ("display", toml::to_string_pretty(&config.display)?),
        _ => return Ok(format!("{key} = {}\n", config.get(key).unwrap_or_default())),
    };
    Ok(format!("[{table}]\n{body}"))
}
