//! Demo runtime configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one demo run.
#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub data_dir: PathBuf,
    pub owner_name: String,
    pub tick_seconds: f64,
    pub total_seconds: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            owner_name: "hero".to_string(),
            tick_seconds: 1.0,
            total_seconds: 8.0,
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STAT_DATA_DIR` - Directory holding `stats.ron` and `config.toml` (default: bundled data)
    /// - `DEMO_OWNER` - Name of the demo character (default: hero)
    /// - `DEMO_TICK_SECONDS` - Simulated seconds per step (default: 1.0)
    /// - `DEMO_TOTAL_SECONDS` - Simulated seconds to run (default: 8.0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("STAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(owner) = env::var("DEMO_OWNER") {
            config.owner_name = owner;
        }
        if let Some(tick) = read_env::<f64>("DEMO_TICK_SECONDS").filter(|t| *t > 0.0) {
            config.tick_seconds = tick;
        }
        if let Some(total) = read_env::<f64>("DEMO_TOTAL_SECONDS").filter(|t| *t >= 0.0) {
            config.total_seconds = total;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
