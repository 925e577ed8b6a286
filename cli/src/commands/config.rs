//! Inspect or initialize the configuration file.

use anyhow::{Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::output::Output;

pub fn run_config(action: ConfigAction) -> Result<()> {
    let out = Output::new();
    let path = Config::config_path()?;

    match action {
        ConfigAction::Path => out.print(path.display()),
        ConfigAction::Show => {
            if !path.exists() {
                out.dim(format!("# {} does not exist, showing defaults", path.display()));
            }
            out.print(Config::load_from(&path)?.to_toml()?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default().save_to(&path)?;
            out.success(format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}
