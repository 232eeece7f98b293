use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{Strategy, resolve_strategy, time::parse_timezone};

use crate::state::{ensure_taskrank_home, taskrank_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Strategy used when neither the request nor `--strategy` names one.
    pub default_strategy: String,
    /// IANA timezone that decides what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            default_strategy: Strategy::default().to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_strategy(&self) -> Result<Strategy> {
        resolve_strategy(Some(&self.analysis.default_strategy))
            .context("config.toml [analysis].default_strategy")
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.analysis.timezone).context("config.toml [analysis].timezone")
    }

    /// Fail early on values that would otherwise only surface per request.
    pub fn validate(&self) -> Result<()> {
        self.default_strategy()?;
        self.timezone()?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(taskrank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = ensure_taskrank_home()?.join("config.toml");
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
