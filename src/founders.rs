use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use rand::prelude::Rng;
use rand::seq::SliceRandom;

use crate::common::{Chromosome, DonorLabel};
use crate::error::Error;
use crate::probability::CrossoverModel;

/// Ordered pool of distinct founder names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FounderSet {
    founders: Vec<DonorLabel>,
}

impl FounderSet {
    pub fn new<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut founders: Vec<DonorLabel> = vec![];
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(Error::invalid("founder names cannot be empty"));
            }
            if founders.iter().any(|f| f.as_ref() == name) {
                return Err(Error::invalid(format!("founder '{name}' listed twice")));
            }
            founders.push(Arc::from(name));
        }
        Ok(Self { founders })
    }

    /// One founder per line; blank lines and `#` comments are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut names = vec![];
        for line in reader.lines() {
            let line = line?;
            let name = line.trim();
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            names.push(name.to_string());
        }
        Self::new(names)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(e, path))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| e.at_path(path))
    }

    pub fn founders(&self) -> &[DonorLabel] {
        &self.founders
    }

    pub fn len(&self) -> usize {
        self.founders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.founders.is_empty()
    }

    /// Pick `pnum` founders without replacement.
    ///
    /// The whole pool, in order, when `pnum` equals its size.
    pub fn select<R: Rng + ?Sized>(&self, pnum: usize, rng: &mut R) -> Result<Vec<DonorLabel>, Error> {
        if pnum == 0 {
            return Err(Error::invalid("cannot select zero founders"));
        }
        if pnum > self.founders.len() {
            return Err(Error::invalid(format!(
                "cannot select {pnum} founders from a pool of {}",
                self.founders.len()
            )));
        }
        if pnum == self.founders.len() {
            return Ok(self.founders.clone());
        }
        Ok(self.founders.choose_multiple(rng, pnum).cloned().collect())
    }
}

/// One uniform-donor chromosome per founder, in founder order.
pub fn founder_population(founders: &[DonorLabel], model: &CrossoverModel) -> Vec<Chromosome> {
    founders
        .iter()
        .map(|f| Chromosome::uniform(f.clone(), model.num_bins()))
        .collect()
}

pub fn initialize_population<R: Rng + ?Sized>(
    pool: &FounderSet,
    pnum: usize,
    model: &CrossoverModel,
    rng: &mut R,
) -> Result<Vec<Chromosome>, Error> {
    let founders = pool.select(pnum, rng)?;
    Ok(founder_population(&founders, model))
}
