use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::meiosis::MeiosisConfig;
use crate::simulate::SimConfig;

/// Width of one chromosome bin, in bp.
pub const BIN_SIZE: u64 = 1_000_000;

pub type ChromNumber = u32;

/// Identifier of the founder that contributed a segment.
///
/// Bins of a chromosome share the founder's allocation,
/// so copying segments between generations is cheap.
pub type DonorLabel = Arc<str>;

#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PopulationType {
    /// Funnel-cross every founder in the pool
    Magic,
    /// Cross two founders drawn from the pool
    Ril,
}

impl PopulationType {
    pub fn sample_prefix(&self) -> &'static str {
        match self {
            PopulationType::Magic => "M",
            PopulationType::Ril => "R",
        }
    }
}

impl fmt::Display for PopulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulationType::Magic => write!(f, "magic"),
            PopulationType::Ril => write!(f, "ril"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Simulate MAGIC or RIL populations from a set of founders")]
pub struct SimParams {
    /// File containing names of parents to build lines from (one per line)
    #[arg(short, long)]
    pub founders: PathBuf,
    /// Number of lines to produce
    #[arg(short = 'n', long = "num-lines")]
    pub num_lines: usize,
    #[arg(short = 't', long = "population", value_enum)]
    pub population: PopulationType,
    /// Tab-delimited centromere table
    #[arg(short, long, default_value = "B73v4centromeres.txt")]
    pub centromeres: PathBuf,
    #[arg(long = "chrom", default_values_t = vec![10])]
    pub chromosomes: Vec<ChromNumber>,
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,
    #[arg(short, long, default_value = "simulated_lines.txt")]
    pub out: PathBuf,
    #[arg(long, default_value_t = 40)]
    pub min_separation: usize,
    #[arg(long = "two-crossover-prob", default_value_t = 0.4)]
    pub two_crossover_prob: f64,
}

impl SimParams {
    pub fn to_config(&self) -> SimConfig {
        SimConfig {
            population: self.population,
            num_lines: self.num_lines,
            chromosomes: self.chromosomes.clone(),
            seed: self.seed,
            meiosis: MeiosisConfig {
                two_crossover_prob: self.two_crossover_prob,
                min_separation: self.min_separation,
                ..MeiosisConfig::default()
            },
        }
    }
}

/// Donor-of-origin for each 1 Mb bin of one haploid chromosome.
///
/// Never mutated once built: each generation makes new chromosomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chromosome {
    bins: Vec<DonorLabel>,
}

impl Chromosome {
    pub fn uniform(donor: DonorLabel, num_bins: usize) -> Self {
        Self {
            bins: vec![donor; num_bins],
        }
    }

    pub fn from_bins(bins: Vec<DonorLabel>) -> Self {
        Self { bins }
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            bins: labels.into_iter().map(|s| Arc::from(s.as_ref())).collect(),
        }
    }

    pub fn bins(&self) -> &[DonorLabel] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Distinct donors, in order of first appearance.
    pub fn donors(&self) -> Vec<DonorLabel> {
        let mut rv: Vec<DonorLabel> = vec![];
        for d in &self.bins {
            if !rv.contains(d) {
                rv.push(d.clone());
            }
        }
        rv
    }
}
