use rand::prelude::Rng;

use crate::common::Chromosome;
use crate::error::Error;
use crate::meiosis::Cross;

/// Funnel-cross a population down to a single lineage.
///
/// Adjacent pairs are crossed into one offspring each, halving the
/// population every round. The last two-parent cross yields `n`
/// offspring. The population size must be a power of two.
pub fn make_magic<C, R>(
    cross: &C,
    population: &[Chromosome],
    n: usize,
    rng: &mut R,
) -> Result<Vec<Chromosome>, Error>
where
    C: Cross,
    R: Rng + ?Sized,
{
    if population.len() < 2 || !population.len().is_power_of_two() {
        return Err(Error::invalid(format!(
            "funnel crossing needs a power-of-two population of at least 2, got {}",
            population.len()
        )));
    }
    if population.len() == 2 {
        return cross.cross(n, (&population[0], &population[1]), rng);
    }
    let mut next_round = Vec::with_capacity(population.len() / 2);
    for pair in population.chunks_exact(2) {
        next_round.extend(cross.cross(1, (&pair[0], &pair[1]), rng)?);
    }
    make_magic(cross, &next_round, n, rng)
}

/// A single two-founder cross.
pub fn make_ril<C, R>(
    cross: &C,
    parents: (&Chromosome, &Chromosome),
    n: usize,
    rng: &mut R,
) -> Result<Vec<Chromosome>, Error>
where
    C: Cross,
    R: Rng + ?Sized,
{
    cross.cross(n, parents, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::common::DonorLabel;
    use crate::founders::founder_population;
    use crate::meiosis::{Meiosis, MeiosisConfig};
    use crate::probability::CrossoverModel;
    use crate::reference::ChromosomeReference;
    use rand::SeedableRng;

    // Takes the first half from one parent and the rest
    // from the other, and remembers every request.
    #[derive(Default)]
    struct HalfAndHalf {
        calls: RefCell<Vec<usize>>,
    }

    impl Cross for HalfAndHalf {
        fn cross<R: Rng + ?Sized>(
            &self,
            n: usize,
            parents: (&Chromosome, &Chromosome),
            _rng: &mut R,
        ) -> Result<Vec<Chromosome>, Error> {
            self.calls.borrow_mut().push(n);
            let mid = parents.0.len() / 2;
            let mut bins = parents.0.bins()[..mid].to_vec();
            bins.extend_from_slice(&parents.1.bins()[mid..]);
            Ok(vec![Chromosome::from_bins(bins); n])
        }
    }

    fn labels(names: &[&str]) -> Vec<DonorLabel> {
        names.iter().map(|n| DonorLabel::from(*n)).collect()
    }

    fn model() -> CrossoverModel {
        CrossoverModel::new(
            10,
            ChromosomeReference {
                end: 150,
                cent_start: 50,
                cent_end: 53,
                cent_size: 3,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_four_founders_three_crosses() {
        let cross = HalfAndHalf::default();
        let pop = (0..4)
            .map(|i| Chromosome::from_labels(vec![format!("F{i}"); 8]))
            .collect::<Vec<_>>();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let lines = make_magic(&cross, &pop, 1, &mut rng).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(*cross.calls.borrow(), vec![1, 1, 1]);
        // F0 x F1 -> F0|F1 and F2 x F3 -> F2|F3, then F0|F3
        assert_eq!(
            lines[0],
            Chromosome::from_labels(["F0", "F0", "F0", "F0", "F3", "F3", "F3", "F3"])
        );
    }

    #[test]
    fn test_replicates_only_in_final_cross() {
        let cross = HalfAndHalf::default();
        let pop = (0..8)
            .map(|i| Chromosome::from_labels(vec![format!("F{i}"); 8]))
            .collect::<Vec<_>>();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let lines = make_magic(&cross, &pop, 5, &mut rng).unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(*cross.calls.borrow(), vec![1, 1, 1, 1, 1, 1, 5]);
    }

    #[test]
    fn test_two_founders_is_a_single_cross() {
        let cross = HalfAndHalf::default();
        let pop = vec![
            Chromosome::from_labels(["A", "A"]),
            Chromosome::from_labels(["B", "B"]),
        ];
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let lines = make_magic(&cross, &pop, 3, &mut rng).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(*cross.calls.borrow(), vec![3]);

        let ril = make_ril(&cross, (&pop[0], &pop[1]), 2, &mut rng).unwrap();
        assert_eq!(ril.len(), 2);
        assert_eq!(ril[0], Chromosome::from_labels(["A", "B"]));
    }

    #[test]
    fn test_reject_non_power_of_two() {
        let cross = HalfAndHalf::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        for size in [0, 1, 3, 6, 12] {
            let pop = vec![Chromosome::from_labels(["A"]); size];
            assert!(matches!(
                make_magic(&cross, &pop, 1, &mut rng),
                Err(Error::InvalidInput(_))
            ));
        }
        assert!(cross.calls.borrow().is_empty());
    }

    #[test]
    fn test_magic_with_meiosis() {
        let model = model();
        let meiosis = Meiosis::new(&model, MeiosisConfig::default()).unwrap();
        let founders = labels(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let pop = founder_population(&founders, &model);
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let lines = make_magic(&meiosis, &pop, 2, &mut rng).unwrap();
            assert_eq!(lines.len(), 2);
            for line in &lines {
                assert_eq!(line.len(), model.num_bins());
                assert!(line.donors().iter().all(|d| founders.contains(d)));
            }
        }
    }
}
