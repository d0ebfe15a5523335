use crate::prediction::{
    BindingSitePredictor, FixedSitesPredictor, HlaClass, SlidingWindowPredictor,
};
use crate::sequence_stylizing::score_tiers::{
    TierThresholds, DEFAULT_HIGH_THRESHOLD, DEFAULT_MEDIUM_THRESHOLD,
};
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_GROUP_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PredictorKind {
    /// Hard-coded example sites
    Fixed,
    /// Fixed-length peptide windows along the sequence
    Window,
}

#[derive(Debug, Args, Clone)]
pub struct ViewerArgs {
    /// Scores at or above this are shown as high affinity.
    #[clap(long, default_value_t = DEFAULT_HIGH_THRESHOLD)]
    pub high_threshold: f64,

    /// Scores at or above this (and below the high threshold) are shown as medium affinity.
    #[clap(long, default_value_t = DEFAULT_MEDIUM_THRESHOLD)]
    pub medium_threshold: f64,

    /// Binding-site predictor to run on submission.
    #[clap(long, value_enum, default_value_t = PredictorKind::Fixed)]
    pub predictor: PredictorKind,

    /// HLA class the window predictor generates peptides for.
    #[clap(long, value_enum, default_value_t = HlaClass::I)]
    pub hla_class: HlaClass,

    /// Peptide length for the window predictor (defaults by HLA class).
    #[clap(long)]
    pub peptide_length: Option<usize>,

    /// Step between peptide windows.
    #[clap(long, default_value_t = 1)]
    pub stride: usize,

    /// Seed for reproducible scores.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Residues per line in the sequence view.
    #[clap(long, default_value_t = DEFAULT_GROUP_WIDTH)]
    pub group_width: usize,

    /// Directory CSV exports are written to.
    #[clap(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Directory for log files (interactive mode only).
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level, e.g. error, info, debug.
    #[clap(long, default_value = "info")]
    pub log_level: String,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub thresholds: TierThresholds,
    pub predictor: PredictorKind,
    pub hla_class: HlaClass,
    pub peptide_length: Option<usize>,
    pub stride: usize,
    pub seed: Option<u64>,
    pub group_width: usize,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl ViewerConfig {
    pub fn from_args(args: &ViewerArgs) -> Result<Self> {
        let thresholds = TierThresholds::new(args.high_threshold, args.medium_threshold)?;
        if args.group_width == 0 {
            bail!("group-width must be at least 1");
        }

        let config = ViewerConfig {
            thresholds,
            predictor: args.predictor,
            hla_class: args.hla_class,
            peptide_length: args.peptide_length,
            stride: args.stride,
            seed: args.seed,
            group_width: args.group_width,
            export_dir: args.export_dir.clone(),
            log_dir: args
                .log_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("epiview-logs")),
            log_level: args.log_level.clone(),
        };
        // surface predictor option errors before any UI starts
        config.build_predictor()?;
        Ok(config)
    }

    pub fn build_predictor(&self) -> Result<Box<dyn BindingSitePredictor>> {
        Ok(match self.predictor {
            PredictorKind::Fixed => Box::new(FixedSitesPredictor::new(self.seed)),
            PredictorKind::Window => Box::new(SlidingWindowPredictor::new(
                self.hla_class,
                self.peptide_length,
                self.stride,
                self.seed,
            )?),
        })
    }

    /// Options for logging
    pub fn describe(&self) -> String {
        format!(
            "predictor={:?}, hla_class={}, thresholds=({}, {}), group_width={}, export_dir={}",
            self.predictor,
            self.hla_class,
            self.thresholds.high,
            self.thresholds.medium,
            self.group_width,
            self.export_dir.display()
        )
    }
}
