use rand::distributions::{Bernoulli, Uniform};
use rand::prelude::Rng;

use crate::common::Chromosome;
use crate::error::Error;
use crate::probability::CrossoverModel;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeiosisConfig {
    /// Chance of two crossovers rather than one.
    pub two_crossover_prob: f64,
    /// Minimum distance, in bins, between paired crossovers.
    pub min_separation: usize,
    pub max_separation_retries: usize,
}

impl Default for MeiosisConfig {
    fn default() -> Self {
        Self {
            two_crossover_prob: 0.4,
            min_separation: 40,
            max_separation_retries: 10_000,
        }
    }
}

impl MeiosisConfig {
    pub fn validate(self) -> Result<Self, Error> {
        if !self.two_crossover_prob.is_finite() || !(0.0..=1.0).contains(&self.two_crossover_prob)
        {
            return Err(Error::invalid(format!(
                "two-crossover probability must be in [0, 1], got {}",
                self.two_crossover_prob
            )));
        }
        if self.min_separation == 0 {
            return Err(Error::invalid("minimum crossover separation must be at least 1"));
        }
        Ok(self)
    }
}

/// One pairwise cross producing `n` offspring chromosomes.
pub trait Cross {
    fn cross<R: Rng + ?Sized>(
        &self,
        n: usize,
        parents: (&Chromosome, &Chromosome),
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, Error>;
}

/// Copy segments from alternating parents, switching at each site.
///
/// `sites` must be sorted. A site `d` gives the offspring bins
/// before `d` from the current donor and bins from `d` on from
/// the other parent.
pub fn recombine(
    parents: (&Chromosome, &Chromosome),
    start_with_second: bool,
    sites: &[usize],
) -> Chromosome {
    debug_assert!(sites.windows(2).all(|w| w[0] <= w[1]));
    let (mut current, mut other) = if start_with_second {
        (parents.1, parents.0)
    } else {
        parents
    };
    let mut bins = Vec::with_capacity(current.len());
    let mut start = 0;
    for &site in sites {
        let site = site.clamp(start, current.len());
        bins.extend_from_slice(&current.bins()[start..site]);
        start = site;
        std::mem::swap(&mut current, &mut other);
    }
    bins.extend_from_slice(&current.bins()[start..]);
    Chromosome::from_bins(bins)
}

#[derive(Debug)]
pub struct Meiosis<'a> {
    model: &'a CrossoverModel,
    config: MeiosisConfig,
    u01: Uniform<f64>,
    two_crossovers: Bernoulli,
}

impl<'a> Meiosis<'a> {
    pub fn new(model: &'a CrossoverModel, config: MeiosisConfig) -> Result<Self, Error> {
        let config = config.validate()?;
        let two_crossovers = Bernoulli::new(config.two_crossover_prob)
            .map_err(|e| Error::invalid(e.to_string()))?;
        Ok(Self {
            model,
            config,
            u01: Uniform::new(0., 1.),
            two_crossovers,
        })
    }

    pub fn model(&self) -> &CrossoverModel {
        self.model
    }

    pub fn config(&self) -> MeiosisConfig {
        self.config
    }

    fn check_parents(&self, parents: (&Chromosome, &Chromosome)) -> Result<(), Error> {
        let expected = self.model.num_bins();
        for p in [parents.0, parents.1] {
            if p.len() != expected {
                return Err(Error::invalid(format!(
                    "parent has {} bins, chromosome {} has {}",
                    p.len(),
                    self.model.chrom(),
                    expected
                )));
            }
        }
        Ok(())
    }

    /// Sorted crossover sites for one offspring.
    fn draw_sites<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<usize>, Error> {
        let first = self.model.sample_site(rng);
        if !rng.sample(self.two_crossovers) {
            return Ok(vec![first]);
        }
        let mut second = self.model.sample_site(rng);
        let mut retries = 0;
        while first.abs_diff(second) < self.config.min_separation {
            if retries == self.config.max_separation_retries {
                return Err(Error::NonConvergence {
                    retries,
                    min_separation: self.config.min_separation,
                });
            }
            retries += 1;
            log::trace!("redrawing crossover {second}: too close to {first}");
            second = self.model.sample_site(rng);
        }
        let mut sites = vec![first, second];
        sites.sort_unstable();
        Ok(sites)
    }

    pub fn crossover<R: Rng + ?Sized>(
        &self,
        n: usize,
        parents: (&Chromosome, &Chromosome),
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, Error> {
        if n == 0 {
            return Err(Error::invalid("number of offspring must be at least 1"));
        }
        self.check_parents(parents)?;
        let mut rv = Vec::with_capacity(n);
        for _ in 0..n {
            let start_with_second = rng.sample(self.u01) >= 0.5;
            let sites = self.draw_sites(rng)?;
            log::debug!(
                "chromosome {}: crossovers at {:?}",
                self.model.chrom(),
                sites
            );
            rv.push(recombine(parents, start_with_second, &sites));
        }
        Ok(rv)
    }
}

impl Cross for Meiosis<'_> {
    fn cross<R: Rng + ?Sized>(
        &self,
        n: usize,
        parents: (&Chromosome, &Chromosome),
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, Error> {
        self.crossover(n, parents, rng)
    }
}
