use rand::prelude::Rng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::common::{ChromNumber, Chromosome, PopulationType};
use crate::crossing::{make_magic, make_ril};
use crate::error::Error;
use crate::founders::{founder_population, FounderSet};
use crate::meiosis::{Meiosis, MeiosisConfig};
use crate::probability::CrossoverModel;
use crate::reference::CentromereReference;

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub population: PopulationType,
    pub num_lines: usize,
    pub chromosomes: Vec<ChromNumber>,
    pub seed: u64,
    pub meiosis: MeiosisConfig,
}

impl SimConfig {
    pub fn validate(self) -> Result<Self, Error> {
        if self.num_lines == 0 {
            return Err(Error::invalid("number of lines must be at least 1"));
        }
        if self.chromosomes.is_empty() {
            return Err(Error::invalid("no chromosomes to simulate"));
        }
        self.meiosis.validate()?;
        Ok(self)
    }
}

/// One homozygous line: a simulated chromosome per requested number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedLine {
    pub sample: String,
    pub chromosomes: Vec<(ChromNumber, Chromosome)>,
}

fn check_pool(population: PopulationType, pool: &FounderSet) -> Result<(), Error> {
    match population {
        PopulationType::Magic if pool.len() < 2 || !pool.len().is_power_of_two() => {
            Err(Error::invalid(format!(
                "magic lines need a power-of-two number of founders, got {}",
                pool.len()
            )))
        }
        PopulationType::Ril if pool.len() < 2 => Err(Error::invalid(format!(
            "ril lines need at least 2 founders, got {}",
            pool.len()
        ))),
        _ => Ok(()),
    }
}

fn simulate_line<R: Rng + ?Sized>(
    sample: String,
    population: PopulationType,
    pool: &FounderSet,
    meioses: &[Meiosis<'_>],
    rng: &mut R,
) -> Result<SimulatedLine, Error> {
    let founders = match population {
        PopulationType::Magic => {
            // same funnel order on every chromosome of the line
            let mut founders = pool.select(pool.len(), rng)?;
            founders.shuffle(rng);
            founders
        }
        PopulationType::Ril => pool.select(2, rng)?,
    };
    let mut chromosomes = Vec::with_capacity(meioses.len());
    for meiosis in meioses {
        let model = meiosis.model();
        let parents = founder_population(&founders, model);
        let mut offspring = match population {
            PopulationType::Magic => make_magic(meiosis, &parents, 1, rng)?,
            PopulationType::Ril => make_ril(meiosis, (&parents[0], &parents[1]), 1, rng)?,
        };
        let chromosome = offspring
            .pop()
            .ok_or_else(|| Error::invalid("cross produced no offspring"))?;
        chromosomes.push((model.chrom(), chromosome));
    }
    Ok(SimulatedLine {
        sample,
        chromosomes,
    })
}

/// Simulate `num_lines` independent lines.
///
/// Lines run in parallel, each with its own generator seeded from
/// `config.seed`, so output does not depend on thread scheduling.
pub fn simulate_lines<C>(
    config: &SimConfig,
    pool: &FounderSet,
    reference: &C,
) -> Result<Vec<SimulatedLine>, Error>
where
    C: CentromereReference + ?Sized,
{
    let config = config.clone().validate()?;
    check_pool(config.population, pool)?;

    let models = config
        .chromosomes
        .iter()
        .map(|c| CrossoverModel::from_reference(reference, *c))
        .collect::<Result<Vec<_>, Error>>()?;
    let meioses = models
        .iter()
        .map(|m| Meiosis::new(m, config.meiosis))
        .collect::<Result<Vec<_>, Error>>()?;

    log::info!(
        "Simulating {} {} lines from {} founders on chromosomes {:?}",
        config.num_lines,
        config.population,
        pool.len(),
        config.chromosomes
    );

    let mut seeder = rand::rngs::StdRng::seed_from_u64(config.seed);
    let seeds = (0..config.num_lines)
        .map(|_| seeder.gen::<u64>())
        .collect::<Vec<_>>();

    let lines = seeds
        .into_par_iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let sample = format!("{}{}", config.population.sample_prefix(), i + 1);
            simulate_line(sample, config.population, pool, &meioses, &mut rng)
        })
        .collect::<Result<Vec<_>, Error>>()?;

    log::info!("Simulated {} lines", lines.len());
    Ok(lines)
}
