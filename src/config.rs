use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_bits")]
    pub bits: u32,
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    #[serde(default = "default_thresh_min")]
    pub thresh_min: f64,
    #[serde(default = "default_thresh_max")]
    pub thresh_max: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    pub xml: Option<PathBuf>,
    pub plot_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bits: default_bits(),
            frame_size: default_frame_size(),
            hop_length: default_hop_length(),
            thresh_min: default_thresh_min(),
            thresh_max: default_thresh_max(),
        }
    }
}

fn default_bits() -> u32 { 16 }
fn default_frame_size() -> usize { 1024 }
fn default_hop_length() -> usize { 512 }
fn default_thresh_min() -> f64 { 0.2 }
fn default_thresh_max() -> f64 { 0.9 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Option<Config> {
    match toml::from_str(content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Invalid config: {}", err);
            None
        }
    }
}

/// Explicit path, else ./descriptors.toml, else the per-user config file.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("descriptors.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("descriptors").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("descriptors").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.analysis.bits, 16);
        assert_eq!(cfg.analysis.frame_size, 1024);
        assert_eq!(cfg.analysis.hop_length, 512);
        assert_eq!(cfg.analysis.thresh_min, 0.2);
        assert_eq!(cfg.analysis.thresh_max, 0.9);
        assert!(cfg.output.xml.is_none());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = parse_config(
            r#"
            [analysis]
            bits = 24
            thresh_max = 0.8

            [output]
            plot_dir = "plots"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.bits, 24);
        assert_eq!(cfg.analysis.thresh_max, 0.8);
        assert_eq!(cfg.analysis.hop_length, 512);
        assert_eq!(cfg.output.plot_dir, Some(PathBuf::from("plots")));
    }

    #[test]
    fn malformed_config_is_ignored() {
        assert!(parse_config("[analysis]\nbits = \"sixteen\"").is_none());
    }
}
