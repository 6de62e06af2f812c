use std::fmt;

use rand::prelude::Rng;
use rand_distr::{Distribution, WeightedAliasIndex};

use crate::common::ChromNumber;
use crate::error::Error;
use crate::reference::{CentromereReference, ChromosomeReference};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArmSide {
    /// Between coordinate 0 and the centromere
    Start,
    /// Between the centromere and the chromosome end
    End,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arm {
    pub side: ArmSide,
    pub len: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArmLengths {
    pub long_arm: Arm,
    pub short_arm: Arm,
}

impl ArmLengths {
    /// Ties go to the start-side arm.
    pub fn from_reference(reference: &ChromosomeReference) -> Self {
        let end_side = Arm {
            side: ArmSide::End,
            len: reference.end.saturating_sub(reference.cent_end),
        };
        let start_side = Arm {
            side: ArmSide::Start,
            len: reference.cent_start,
        };
        if end_side.len > start_side.len {
            Self {
                long_arm: end_side,
                short_arm: start_side,
            }
        } else {
            Self {
                long_arm: start_side,
                short_arm: end_side,
            }
        }
    }
}

fn squared(i: usize) -> f64 {
    let x = i as f64;
    x * x
}

/// Unnormalized crossover weights, one per bin in `0..=end`.
///
/// Layout is the start-side arm (squared distance to the centromere,
/// reaching zero at `cent_start`), `cent_size` zeros, then a profile
/// growing with squared distance past the centromere, sized by the
/// long arm. The result is cut or zero-padded to `end + 1` entries.
/// Bins `cent_start..=cent_end` are always zero, even when `cent_size`
/// is smaller than the span.
fn crossover_weights(reference: &ChromosomeReference, arms: ArmLengths) -> Vec<f64> {
    let num_bins = reference.end + 1;
    let mut weights = Vec::with_capacity(reference.cent_start + 1 + reference.cent_size + arms.long_arm.len);
    weights.extend((0..=reference.cent_start).rev().map(squared));
    weights.extend(std::iter::repeat(0.0).take(reference.cent_size));
    weights.extend((0..arms.long_arm.len).map(squared));
    weights.resize(num_bins, 0.0);
    weights[reference.cent_start..=reference.cent_end].fill(0.0);
    weights
}

/// Per-bin crossover probabilities for one chromosome.
///
/// Immutable after construction, so one model can be shared
/// by every replicate and worker thread simulating the chromosome.
pub struct CrossoverModel {
    chrom: ChromNumber,
    reference: ChromosomeReference,
    arms: ArmLengths,
    weights: Vec<f64>,
    sampler: WeightedAliasIndex<f64>,
}

impl CrossoverModel {
    pub fn from_reference<R>(reference: &R, chrom: ChromNumber) -> Result<Self, Error>
    where
        R: CentromereReference + ?Sized,
    {
        Self::new(chrom, reference.reference(chrom)?)
    }

    pub fn new(chrom: ChromNumber, reference: ChromosomeReference) -> Result<Self, Error> {
        if reference.cent_start > reference.cent_end || reference.cent_end > reference.end {
            return Err(Error::invalid(format!(
                "chromosome {chrom}: centromere {}..{} does not fit in 0..{}",
                reference.cent_start, reference.cent_end, reference.end
            )));
        }
        let arms = ArmLengths::from_reference(&reference);
        let mut weights = crossover_weights(&reference, arms);

        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::DegenerateModel {
                chrom,
                reason: format!("total crossover weight is {total}"),
            });
        }
        weights.iter_mut().for_each(|w| *w /= total);

        // Sites come from 0..end: a switch at the last bin is not a crossover.
        let sampler = WeightedAliasIndex::new(weights[..reference.end].to_vec()).map_err(|e| {
            Error::DegenerateModel {
                chrom,
                reason: format!("no crossover sites before bin {}: {e}", reference.end),
            }
        })?;
        log::debug!(
            "chromosome {chrom}: {} bins, long arm {:?}, short arm {:?}",
            weights.len(),
            arms.long_arm,
            arms.short_arm
        );

        Ok(Self {
            chrom,
            reference,
            arms,
            weights,
            sampler,
        })
    }

    pub fn chrom(&self) -> ChromNumber {
        self.chrom
    }

    /// Last bin index of the chromosome.
    pub fn end(&self) -> usize {
        self.reference.end
    }

    pub fn num_bins(&self) -> usize {
        self.weights.len()
    }

    pub fn reference(&self) -> &ChromosomeReference {
        &self.reference
    }

    pub fn arms(&self) -> ArmLengths {
        self.arms
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Draw one crossover site in `0..end`.
    pub fn sample_site<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }
}

impl fmt::Debug for CrossoverModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossoverModel")
            .field("chrom", &self.chrom)
            .field("reference", &self.reference)
            .field("arms", &self.arms)
            .finish_non_exhaustive()
    }
}
