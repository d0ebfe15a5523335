//! Placeholder predictors. Scores are random; only the shape of the output
//! (valid, labeled intervals) is meaningful.

use crate::prediction::{Annotation, BindingSitePredictor};
use crate::sequence::ProteinSequence;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Example binding regions, 0-based and inclusive.
pub const FIXED_SITES: [(usize, usize); 3] = [(10, 29), (45, 64), (120, 139)];

/// Windows scoring below this are not reported as epitopes.
pub const EPITOPE_PROBABILITY_THRESHOLD: f64 = 0.5;

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Hard-coded sites with scores drawn uniformly from `[0.5, 1.0)`.
#[derive(Debug)]
pub struct FixedSitesPredictor {
    sites: Vec<(usize, usize)>,
    rng: StdRng,
}

impl FixedSitesPredictor {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_sites(FIXED_SITES.to_vec(), seed)
    }

    pub fn with_sites(sites: Vec<(usize, usize)>, seed: Option<u64>) -> Self {
        Self {
            sites,
            rng: new_rng(seed),
        }
    }
}

impl BindingSitePredictor for FixedSitesPredictor {
    fn name(&self) -> &'static str {
        "fixed-sites"
    }

    fn predict(&mut self, sequence: &ProteinSequence) -> Vec<Annotation> {
        let last = sequence.len() - 1;
        let mut ret = Vec::with_capacity(self.sites.len());
        for (index, &(start, end)) in self.sites.iter().enumerate() {
            // draw even for skipped sites so a seed gives the same score per site
            let score = self.rng.gen_range(0.5..1.0);
            if start > last || start > end {
                log::debug!("site {start}..={end} lies past the sequence end, skipped");
                continue;
            }
            if let Ok(annotation) =
                Annotation::new(index as u32 + 1, sequence, start, end.min(last), score)
            {
                ret.push(annotation);
            }
        }
        ret
    }
}

/// MHC molecule class the peptides are predicted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HlaClass {
    #[value(name = "1", alias = "I")]
    I,
    #[value(name = "2", alias = "II")]
    II,
}

impl HlaClass {
    /// Peptide lengths accepted for this class
    pub fn peptide_lengths(&self) -> RangeInclusive<usize> {
        match self {
            HlaClass::I => 8..=14,
            HlaClass::II => 13..=21,
        }
    }

    pub fn default_peptide_length(&self) -> usize {
        match self {
            HlaClass::I => 9,
            HlaClass::II => 15,
        }
    }

    pub fn validate_peptide_length(&self, length: usize) -> Result<()> {
        let range = self.peptide_lengths();
        if !range.contains(&length) {
            bail!(
                "HLA class {} peptides must be between {} and {} amino acids, got {}",
                self,
                range.start(),
                range.end(),
                length
            );
        }
        Ok(())
    }
}

impl std::fmt::Display for HlaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HlaClass::I => write!(f, "I"),
            HlaClass::II => write!(f, "II"),
        }
    }
}

/// Fixed-length peptide windows, each scored uniformly from `[0, 1)`; windows
/// below [`EPITOPE_PROBABILITY_THRESHOLD`] are dropped.
#[derive(Debug)]
pub struct SlidingWindowPredictor {
    peptide_length: usize,
    stride: usize,
    rng: StdRng,
}

impl SlidingWindowPredictor {
    pub fn new(
        hla_class: HlaClass,
        peptide_length: Option<usize>,
        stride: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        let peptide_length = peptide_length.unwrap_or(hla_class.default_peptide_length());
        hla_class.validate_peptide_length(peptide_length)?;
        if stride == 0 {
            bail!("stride must be at least 1");
        }
        Ok(Self {
            peptide_length,
            stride,
            rng: new_rng(seed),
        })
    }
}

impl BindingSitePredictor for SlidingWindowPredictor {
    fn name(&self) -> &'static str {
        "sliding-window"
    }

    fn predict(&mut self, sequence: &ProteinSequence) -> Vec<Annotation> {
        if sequence.len() < self.peptide_length {
            return Vec::new();
        }
        let mut ret = Vec::new();
        let mut id = 1;
        for start in (0..=sequence.len() - self.peptide_length).step_by(self.stride) {
            let score: f64 = self.rng.gen_range(0.0..1.0);
            if score < EPITOPE_PROBABILITY_THRESHOLD {
                continue;
            }
            if let Ok(annotation) =
                Annotation::new(id, sequence, start, start + self.peptide_length - 1, score)
            {
                ret.push(annotation);
                id += 1;
            }
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_sequence(len: usize) -> ProteinSequence {
        let alphabet = crate::sequence::AMINO_ACIDS;
        let s: String = (0..len).map(|i| alphabet[i % 20] as char).collect();
        ProteinSequence::parse(&s).unwrap()
    }

    #[test]
    fn test_fixed_sites_on_long_sequence() {
        let seq = long_sequence(200);
        let annotations = FixedSitesPredictor::new(Some(1)).predict(&seq);
        assert_eq!(annotations.len(), 3);
        for (a, (start, end)) in annotations.iter().zip(FIXED_SITES) {
            assert_eq!((a.start, a.end), (start, end));
            assert_eq!(a.label.len(), 20);
            assert!((0.5..1.0).contains(&a.score));
            assert!(a.is_consistent_with(&seq));
        }
        assert_eq!(
            annotations.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_fixed_sites_clipped_to_sequence() {
        let seq = long_sequence(50);
        let annotations = FixedSitesPredictor::new(Some(1)).predict(&seq);
        assert_eq!(annotations.len(), 2);
        assert_eq!((annotations[1].start, annotations[1].end), (45, 49));
        assert!(annotations.iter().all(|a| a.is_consistent_with(&seq)));

        let short = long_sequence(10);
        assert!(FixedSitesPredictor::new(None).predict(&short).is_empty());
    }

    #[test]
    fn test_fixed_sites_seed_is_reproducible() {
        let seq = long_sequence(150);
        let a = FixedSitesPredictor::new(Some(42)).predict(&seq);
        let b = FixedSitesPredictor::new(Some(42)).predict(&seq);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hla_class_lengths() {
        assert!(HlaClass::I.validate_peptide_length(8).is_ok());
        assert!(HlaClass::I.validate_peptide_length(14).is_ok());
        assert!(HlaClass::I.validate_peptide_length(15).is_err());
        assert!(HlaClass::II.validate_peptide_length(12).is_err());
        assert!(HlaClass::II.validate_peptide_length(21).is_ok());
        assert!(HlaClass::I.peptide_lengths().contains(&HlaClass::I.default_peptide_length()));
        assert!(HlaClass::II.peptide_lengths().contains(&HlaClass::II.default_peptide_length()));
    }

    #[test]
    fn test_sliding_window_rejects_bad_config() {
        assert!(SlidingWindowPredictor::new(HlaClass::I, Some(20), 1, None).is_err());
        assert!(SlidingWindowPredictor::new(HlaClass::II, None, 0, None).is_err());
    }

    #[test]
    fn test_sliding_window_output() {
        let seq = long_sequence(120);
        let mut predictor = SlidingWindowPredictor::new(HlaClass::I, None, 3, Some(7)).unwrap();
        let annotations = predictor.predict(&seq);
        assert!(!annotations.is_empty());
        for (i, a) in annotations.iter().enumerate() {
            assert_eq!(a.id as usize, i + 1);
            assert_eq!(a.width(), 9);
            assert_eq!(a.start % 3, 0);
            assert!(a.score >= EPITOPE_PROBABILITY_THRESHOLD && a.score < 1.0);
            assert!(a.is_consistent_with(&seq));
        }
    }

    #[test]
    fn test_sliding_window_short_sequence() {
        let seq = long_sequence(5);
        let mut predictor = SlidingWindowPredictor::new(HlaClass::I, Some(8), 1, Some(1)).unwrap();
        assert!(predictor.predict(&seq).is_empty());
    }
}
