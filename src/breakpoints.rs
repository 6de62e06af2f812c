use crate::common::{ChromNumber, Chromosome, DonorLabel, BIN_SIZE};
use crate::error::Error;

/// A contiguous run of bins inherited from one donor, in bp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakpointRecord {
    pub chrom: ChromNumber,
    pub start: u64,
    pub end: u64,
    pub donor: DonorLabel,
}

/// Compress a chromosome into donor runs covering every bin.
///
/// A run that ends because the donor changes at bin `i` closes at
/// `i * BIN_SIZE - 1`. The last run closes at the start of the last
/// bin, `(len - 1) * BIN_SIZE`.
pub fn locations(chromosome: &Chromosome, chrom: ChromNumber) -> Vec<BreakpointRecord> {
    let bins = chromosome.bins();
    let Some(first) = bins.first() else {
        return vec![];
    };
    let mut rv = vec![];
    let mut owner = first;
    let mut run_start = 0_u64;
    for (i, donor) in bins.iter().enumerate().skip(1) {
        if donor != owner {
            let change = i as u64 * BIN_SIZE;
            rv.push(BreakpointRecord {
                chrom,
                start: run_start,
                end: change - 1,
                donor: owner.clone(),
            });
            run_start = change;
            owner = donor;
        }
    }
    rv.push(BreakpointRecord {
        chrom,
        start: run_start,
        end: (bins.len() as u64 - 1) * BIN_SIZE,
        donor: owner.clone(),
    });
    rv
}

/// Expand records back into per-bin donors.
///
/// Records must be in order and leave no gaps.
pub fn reconstruct(records: &[BreakpointRecord]) -> Result<Chromosome, Error> {
    let mut bins: Vec<DonorLabel> = vec![];
    for r in records {
        let first_bin = (r.start / BIN_SIZE) as usize;
        let last_bin = (r.end / BIN_SIZE) as usize;
        if r.start % BIN_SIZE != 0 || first_bin != bins.len() || r.end < r.start {
            return Err(Error::invalid(format!(
                "record {}:{}-{} does not continue at bin {}",
                r.chrom,
                r.start,
                r.end,
                bins.len()
            )));
        }
        bins.extend(std::iter::repeat(r.donor.clone()).take(last_bin - first_bin + 1));
    }
    Ok(Chromosome::from_bins(bins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(chrom: ChromNumber, start: u64, end: u64, donor: &str) -> BreakpointRecord {
        BreakpointRecord {
            chrom,
            start,
            end,
            donor: DonorLabel::from(donor),
        }
    }

    #[test]
    fn test_two_runs() {
        let c = Chromosome::from_labels(["A", "A", "B", "B", "B"]);
        assert_eq!(
            locations(&c, 3),
            vec![record(3, 0, 1999999, "A"), record(3, 2000000, 4000000, "B")]
        );
    }

    #[test]
    fn test_single_donor() {
        let c = Chromosome::from_labels(vec!["B73"; 151]);
        assert_eq!(locations(&c, 10), vec![record(10, 0, 150_000_000, "B73")]);
    }

    #[test]
    fn test_donor_returns() {
        let c = Chromosome::from_labels(["A", "B", "A"]);
        assert_eq!(
            locations(&c, 1),
            vec![
                record(1, 0, 999999, "A"),
                record(1, 1000000, 1999999, "B"),
                record(1, 2000000, 2000000, "A"),
            ]
        );
    }

    #[test]
    fn test_empty_chromosome() {
        assert!(locations(&Chromosome::from_bins(vec![]), 1).is_empty());
    }

    #[test]
    fn test_reconstruct_rejects_gap() {
        let records = vec![record(3, 0, 999999, "A"), record(3, 2000000, 4000000, "B")];
        assert!(matches!(reconstruct(&records), Err(Error::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn test_round_trip(labels in proptest::collection::vec(0..4_u8, 1..300)) {
            let c = Chromosome::from_labels(labels.iter().map(|l| format!("F{l}")));
            let records = locations(&c, 5);
            prop_assert!(records.windows(2).all(|w| w[0].end + 1 == w[1].start));
            prop_assert!(records.windows(2).all(|w| w[0].donor != w[1].donor));
            prop_assert_eq!(reconstruct(&records).unwrap(), c);
        }
    }
}
