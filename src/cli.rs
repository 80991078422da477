use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "descriptors",
    about = "Spectral centroid, spread, flatness and log attack time of a mono WAV clip"
)]
pub struct Cli {
    /// Input audio file (mono, integer PCM WAV)
    pub input: PathBuf,

    /// PCM bit depth used for normalization
    #[arg(short, long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=32))]
    pub bits: u32,

    /// Envelope frame size in samples
    #[arg(long, default_value_t = 1024)]
    pub frame_size: usize,

    /// Envelope hop length in samples
    #[arg(long, default_value_t = 512)]
    pub hop_length: usize,

    /// Lower attack threshold, as a fraction of the envelope peak
    #[arg(long, default_value_t = 0.2)]
    pub thresh_min: f64,

    /// Upper attack threshold, as a fraction of the envelope peak
    #[arg(long, default_value_t = 0.9)]
    pub thresh_max: f64,

    /// Export descriptors to this XML file (overwritten)
    #[arg(short, long)]
    pub xml: Option<PathBuf>,

    /// Write spectrum.svg and envelope.svg into this directory
    #[arg(short, long)]
    pub plot: Option<PathBuf>,

    /// Print a JSON summary instead of key/value lines
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to ./descriptors.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
