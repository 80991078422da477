mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use audio_descriptors::export::{plot, xml};
use audio_descriptors::{
    analyze, load_signal, Analysis, AnalysisParams, AttackThresholds, Descriptor, Framing,
};
use cli::Cli;

#[derive(Serialize)]
struct JsonSummary {
    sample_rate: u32,
    samples: usize,
    duration: f64,
    audio_spectrum_centroid: Option<f64>,
    audio_spectrum_spread: Option<f64>,
    audio_spectrum_flatness: Option<f64>,
    log_attack_time: Option<f64>,
    errors: Vec<String>,
}

impl JsonSummary {
    fn new(analysis: &Analysis) -> Self {
        let report = &analysis.report;
        let errors = Descriptor::ALL
            .iter()
            .filter_map(|&d| report.get(d).as_ref().err().map(|e| format!("{}: {}", d, e)))
            .collect();
        Self {
            sample_rate: analysis.signal.sample_rate(),
            samples: analysis.signal.len(),
            duration: analysis.signal.duration(),
            audio_spectrum_centroid: report.value(Descriptor::Centroid),
            audio_spectrum_spread: report.value(Descriptor::Spread),
            audio_spectrum_flatness: report.value(Descriptor::Flatness),
            log_attack_time: report.value(Descriptor::LogAttackTime),
            errors,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    if let Some(ref path) = config::find_config(cli.config.as_deref()) {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.bits == 16 { cli.bits = cfg.analysis.bits; }
            if cli.frame_size == 1024 { cli.frame_size = cfg.analysis.frame_size; }
            if cli.hop_length == 512 { cli.hop_length = cfg.analysis.hop_length; }
            if cli.thresh_min == 0.2 { cli.thresh_min = cfg.analysis.thresh_min; }
            if cli.thresh_max == 0.9 { cli.thresh_max = cfg.analysis.thresh_max; }
            if cli.xml.is_none() { cli.xml = cfg.output.xml; }
            if cli.plot.is_none() { cli.plot = cfg.output.plot_dir; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let params = AnalysisParams {
        framing: Framing::new(cli.frame_size, cli.hop_length)?,
        thresholds: AttackThresholds::new(cli.thresh_min, cli.thresh_max)?,
    };

    log::info!("Input: {} ({}-bit)", cli.input.display(), cli.bits);
    let signal = load_signal(&cli.input, cli.bits)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;

    let analysis = analyze(signal, &params)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&JsonSummary::new(&analysis))?);
    } else {
        print!("{}", analysis.summary());
    }

    if let Some(ref dir) = cli.plot {
        plot::plot_analysis(&analysis, dir)
            .with_context(|| format!("Failed to plot into {}", dir.display()))?;
    }

    if let Some(ref path) = cli.xml {
        let set = analysis
            .report
            .complete()
            .context("Cannot export XML: a descriptor is undefined for this clip")?;
        xml::write_descriptors(path, &set)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
