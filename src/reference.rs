use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::ChromNumber;
use crate::error::Error;

/// Centromere placement for one chromosome, in bins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChromosomeReference {
    pub end: usize,
    pub cent_start: usize,
    pub cent_end: usize,
    pub cent_size: usize,
}

/// Source of per-chromosome centromere coordinates.
pub trait CentromereReference {
    fn reference(&self, chrom: ChromNumber) -> Result<ChromosomeReference, Error>;
}

#[derive(Clone, Debug, Default)]
pub struct CentromereTable {
    entries: HashMap<ChromNumber, ChromosomeReference>,
}

const CHROM_COLUMN: &str = "chr";
const END_COLUMN: &str = "v3chr.end";
const START_COLUMN: &str = "v3start";
const CENT_END_COLUMN: &str = "v3end";
const SIZE_COLUMN: &str = "v3size";

struct ColumnIndexes {
    chrom: usize,
    end: usize,
    cent_start: usize,
    cent_end: usize,
    cent_size: usize,
}

impl ColumnIndexes {
    fn from_header(header: &str) -> Result<Self, Error> {
        let columns = header.split('\t').map(str::trim).collect::<Vec<_>>();
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or_else(|| Error::Parse {
                    line: 1,
                    msg: format!("missing column '{name}'"),
                })
        };
        Ok(Self {
            chrom: find(CHROM_COLUMN)?,
            end: find(END_COLUMN)?,
            cent_start: find(START_COLUMN)?,
            cent_end: find(CENT_END_COLUMN)?,
            cent_size: find(SIZE_COLUMN)?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(fields: &[&str], index: usize, line: usize) -> Result<T, Error> {
    let raw = fields.get(index).ok_or_else(|| Error::Parse {
        line,
        msg: format!("expected at least {} fields, found {}", index + 1, fields.len()),
    })?;
    raw.trim().parse::<T>().map_err(|_| Error::Parse {
        line,
        msg: format!("cannot parse '{raw}'"),
    })
}

fn parse_non_negative(fields: &[&str], index: usize, line: usize) -> Result<f64, Error> {
    let value: f64 = parse_field(fields, index, line)?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Parse {
            line,
            msg: format!("expected a non-negative value, found {value}"),
        });
    }
    Ok(value)
}

/// Coordinates keep their whole bin: 136.77 is bin 136.
fn parse_coordinate(fields: &[&str], index: usize, line: usize) -> Result<usize, Error> {
    Ok(parse_non_negative(fields, index, line)?.trunc() as usize)
}

/// Sizes round to the nearest bin.
fn parse_size(fields: &[&str], index: usize, line: usize) -> Result<usize, Error> {
    Ok(parse_non_negative(fields, index, line)?.round() as usize)
}

impl CentromereTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chrom: ChromNumber, reference: ChromosomeReference) {
        self.entries.insert(chrom, reference);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(Error::Parse {
                    line: 1,
                    msg: "empty centromere table".to_string(),
                })
            }
        };
        let columns = ColumnIndexes::from_header(&header)?;

        let mut table = Self::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            let line_num = i + 2;
            if line.trim().is_empty() {
                continue;
            }
            let fields = line.split('\t').collect::<Vec<_>>();
            let chrom: ChromNumber = parse_field(&fields, columns.chrom, line_num)?;
            let reference = ChromosomeReference {
                end: parse_coordinate(&fields, columns.end, line_num)?,
                cent_start: parse_coordinate(&fields, columns.cent_start, line_num)?,
                cent_end: parse_coordinate(&fields, columns.cent_end, line_num)?,
                cent_size: parse_size(&fields, columns.cent_size, line_num)?,
            };
            if table.entries.insert(chrom, reference).is_some() {
                return Err(Error::Parse {
                    line: line_num,
                    msg: format!("duplicate entry for chromosome {chrom}"),
                });
            }
        }
        log::debug!("Loaded centromere positions for {} chromosomes", table.len());
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(e, path))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| e.at_path(path))
    }
}

impl CentromereReference for CentromereTable {
    fn reference(&self, chrom: ChromNumber) -> Result<ChromosomeReference, Error> {
        self.entries
            .get(&chrom)
            .copied()
            .ok_or(Error::Lookup { chrom })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "chr\tv3start\tv3end\tv3size\tv3chr.end\n\
                         1\t133\t137\t3.8\t307\n\
                         10\t50\t53\t2.6\t150\n";

    #[test]
    fn test_parse_table() {
        let table = CentromereTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        let r = table.reference(10).unwrap();
        assert_eq!(
            r,
            ChromosomeReference {
                end: 150,
                cent_start: 50,
                cent_end: 53,
                cent_size: 3,
            }
        );
    }

    #[test]
    fn test_fractional_coordinates_truncate() {
        let table = "chr\tv3start\tv3end\tv3size\tv3chr.end\n\
                     1\t136.77\t137.12\t0.35\t307.04\n";
        let table = CentromereTable::from_reader(table.as_bytes()).unwrap();
        assert_eq!(
            table.reference(1).unwrap(),
            ChromosomeReference {
                end: 307,
                cent_start: 136,
                cent_end: 137,
                cent_size: 0,
            }
        );
    }

    #[test]
    fn test_negative_value() {
        let bad = "chr\tv3start\tv3end\tv3size\tv3chr.end\n1\t-2\t3\t1\t10\n";
        assert!(matches!(
            CentromereTable::from_reader(bad.as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_chromosome() {
        let table = CentromereTable::from_reader(TABLE.as_bytes()).unwrap();
        assert!(matches!(table.reference(3), Err(Error::Lookup { chrom: 3 })));
    }

    #[test]
    fn test_missing_column() {
        let bad = "chr\tv3start\tv3end\n1\t2\t3\n";
        assert!(matches!(
            CentromereTable::from_reader(bad.as_bytes()),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_row() {
        let bad = "chr\tv3start\tv3end\tv3size\tv3chr.end\n1\tx\t3\t1\t10\n";
        assert!(matches!(
            CentromereTable::from_reader(bad.as_bytes()),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_row() {
        let bad = "chr\tv3start\tv3end\tv3size\tv3chr.end\n1\t2\t3\t1\t10\n1\t2\t3\t1\t10\n";
        assert!(matches!(
            CentromereTable::from_reader(bad.as_bytes()),
            Err(Error::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("centromeres.txt");
        std::fs::write(&path, TABLE).unwrap();
        let table = CentromereTable::from_path(&path).unwrap();
        assert_eq!(table.reference(1).unwrap().end, 307);

        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            CentromereTable::from_path(missing),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_read_error_names_path() {
        // a directory opens, then fails on the first read
        let dir = tempfile::tempdir().unwrap();
        match CentromereTable::from_path(dir.path()) {
            Err(Error::Io { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
