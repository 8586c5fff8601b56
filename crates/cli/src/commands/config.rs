//! Show the effective configuration

use anyhow::{Context, Result};
use minibank_bank::BankConfig;

pub fn show(config: &BankConfig) -> Result<()> {
    let text = config
        .to_toml()
        .context("failed to render configuration")?;
    print!("{}", text);
    Ok(())
}
