use indexmap::IndexMap;
use std::collections::BTreeMap;

use crate::libs::cigar::AlignmentRecord;
use crate::libs::error::ScaffoldError;

/// All candidate alignments of one piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceCandidates {
    pub piece: usize,
    /// Expected gap to the next piece
    pub gap: usize,
    pub records: Vec<AlignmentRecord>,
}

impl PieceCandidates {
    fn with(record: AlignmentRecord) -> Self {
        Self {
            piece: record.fragment.piece,
            gap: record.fragment.gap,
            records: vec![record],
        }
    }
}

/// The pieces of one scaffold, in piece order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldCandidates {
    pub scaffold: String,
    pub pieces: Vec<PieceCandidates>,
    /// Some piece index was skipped, so no combination covers the scaffold
    pub missing_piece: bool,
}

impl ScaffoldCandidates {
    pub fn new(scaffold: &str) -> Self {
        Self {
            scaffold: scaffold.to_string(),
            pieces: vec![],
            missing_piece: false,
        }
    }

    /// Adds a record, assuming records arrive in ascending piece order.
    ///
    /// A piece index that skips ahead marks the scaffold as missing a piece
    /// the aligner reported nothing for. A piece index that goes backwards breaks
    /// the ordering assumption; the record then starts a new set anyway.
    pub fn push(&mut self, record: AlignmentRecord) {
        let piece = record.fragment.piece;
        let last_piece = self.pieces.last().map(|p| p.piece);

        match last_piece {
            Some(last) if last == piece => {
                if let Some(current) = self.pieces.last_mut() {
                    current.records.push(record);
                }
            }
            Some(last) if last > piece => {
                tracing::warn!(
                    "Report is not sorted: {} piece {} after piece {}",
                    self.scaffold,
                    piece,
                    last
                );
                self.pieces.push(PieceCandidates::with(record));
            }
            _ => {
                let next = last_piece.map_or(1, |p| p.saturating_add(1));
                if piece > next {
                    tracing::debug!(
                        "{}: no alignment for pieces {} to {}",
                        self.scaffold,
                        next,
                        piece - 1
                    );
                    self.missing_piece = true;
                }
                self.pieces.push(PieceCandidates::with(record));
            }
        }
    }

    /// Every piece has at least one candidate
    pub fn is_complete(&self) -> bool {
        !self.missing_piece
            && !self.pieces.is_empty()
            && self.pieces.iter().all(|p| !p.records.is_empty())
    }

    pub fn candidate_lists(&self) -> Vec<&[AlignmentRecord]> {
        self.pieces.iter().map(|p| p.records.as_slice()).collect()
    }
}

/// Groups a report stream by change of scaffold name.
///
/// The stream must already be ordered by scaffold and piece, as ssaha2 emits
/// queries in input order. Interleaved scaffolds come out as several partial
/// groups; use [`group_sorted`] when that cannot be guaranteed.
pub struct Grouper<I> {
    records: I,
    current: Option<ScaffoldCandidates>,
    done: bool,
}

impl<I> Grouper<I> {
    pub fn new(records: I) -> Self {
        Self {
            records,
            current: None,
            done: false,
        }
    }
}

impl<I> Iterator for Grouper<I>
where
    I: Iterator<Item = Result<AlignmentRecord, ScaffoldError>>,
{
    type Item = Result<ScaffoldCandidates, ScaffoldError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let record = match self.records.next() {
                None => {
                    self.done = true;
                    return self.current.take().map(Ok);
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(record)) => record,
            };

            let same_scaffold = self
                .current
                .as_ref()
                .is_some_and(|g| g.scaffold == record.fragment.scaffold);

            if same_scaffold {
                if let Some(group) = self.current.as_mut() {
                    group.push(record);
                }
            } else {
                let mut group = ScaffoldCandidates::new(&record.fragment.scaffold);
                group.push(record);
                if let Some(finished) = self.current.replace(group) {
                    return Some(Ok(finished));
                }
            }
        }
    }
}

/// Two-pass grouping that does not depend on report order.
///
/// Scaffolds keep the order of their first appearance; pieces are sorted by
/// index and candidates keep report order. Holds the whole report in memory.
pub fn group_sorted<I>(records: I) -> Result<Vec<ScaffoldCandidates>, ScaffoldError>
where
    I: IntoIterator<Item = Result<AlignmentRecord, ScaffoldError>>,
{
    let mut by_scaffold: IndexMap<String, BTreeMap<usize, Vec<AlignmentRecord>>> =
        IndexMap::new();

    for record in records {
        let record = record?;
        by_scaffold
            .entry(record.fragment.scaffold.clone())
            .or_default()
            .entry(record.fragment.piece)
            .or_default()
            .push(record);
    }

    let groups = by_scaffold
        .into_iter()
        .map(|(scaffold, pieces)| {
            let mut group = ScaffoldCandidates::new(&scaffold);
            for record in pieces.into_values().flatten() {
                group.push(record);
            }
            group
        })
        .collect();

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(q_name: &str, t_start: i64) -> Result<AlignmentRecord, ScaffoldError> {
        let line = format!(
            "cigar::99 {} 1 100 + chr1 {} {} + 100 M 100",
            q_name,
            t_start,
            t_start + 99
        );
        Ok(line.parse().unwrap())
    }

    fn shape(groups: &[ScaffoldCandidates]) -> Vec<(String, Vec<(usize, usize)>)> {
        groups
            .iter()
            .map(|g| {
                (
                    g.scaffold.clone(),
                    g.pieces.iter().map(|p| (p.piece, p.records.len())).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_group_ordered_stream() {
        let records = vec![
            rec("scf1_1_10", 100),
            rec("scf1_1_10", 5000),
            rec("scf1_2_20", 210),
            rec("scf1_3_0", 400),
            rec("scf_2_1_0", 900),
        ];
        let groups: Vec<_> = Grouper::new(records.into_iter())
            .map(|g| g.unwrap())
            .collect();

        assert_eq!(
            shape(&groups),
            vec![
                ("scf1".to_string(), vec![(1, 2), (2, 1), (3, 1)]),
                ("scf_2".to_string(), vec![(1, 1)]),
            ]
        );
        assert_eq!(groups[0].pieces[0].gap, 10);
        assert_eq!(groups[0].pieces[1].gap, 20);
        assert_eq!(groups[0].pieces[2].gap, 0);
        assert!(groups[0].is_complete());
    }

    #[test]
    fn test_group_missing_piece() {
        let records = vec![rec("scf1_1_10", 100), rec("scf1_3_0", 400)];
        let groups: Vec<_> = Grouper::new(records.into_iter())
            .map(|g| g.unwrap())
            .collect();

        assert_eq!(
            shape(&groups),
            vec![("scf1".to_string(), vec![(1, 1), (3, 1)])]
        );
        assert!(groups[0].missing_piece);
        assert!(!groups[0].is_complete());

        let groups = group_sorted(vec![rec("scf1_3_0", 400), rec("scf1_1_10", 100)]).unwrap();
        assert_eq!(
            shape(&groups),
            vec![("scf1".to_string(), vec![(1, 1), (3, 1)])]
        );
        assert!(!groups[0].is_complete());
    }

    #[test]
    fn test_group_huge_piece_index() {
        let mut group = ScaffoldCandidates::new("scf1");
        group.push(rec("scf1_1_10", 100).unwrap());
        group.push(rec(&format!("scf1_{}_0", usize::MAX / 2), 400).unwrap());

        assert_eq!(group.pieces.len(), 2);
        assert!(!group.is_complete());

        let mut first = ScaffoldCandidates::new("scf2");
        first.push(rec("scf2_20000000_0", 100).unwrap());
        assert_eq!(first.pieces.len(), 1);
        assert!(!first.is_complete());
    }

    #[test]
    fn test_group_empty_stream() {
        let none: Vec<Result<AlignmentRecord, ScaffoldError>> = vec![];
        let groups: Vec<_> = Grouper::new(none.into_iter()).collect();
        assert!(groups.is_empty());

        let none: Vec<Result<AlignmentRecord, ScaffoldError>> = vec![];
        assert!(group_sorted(none).unwrap().is_empty());
    }

    #[test]
    fn test_group_propagates_errors() {
        let records = vec![
            rec("scf1_1_0", 100),
            Err(ScaffoldError::Io(std::io::Error::other("broken pipe"))),
        ];
        let groups: Vec<_> = Grouper::new(records.into_iter()).collect();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_err());
    }

    fn unordered() -> Vec<Result<AlignmentRecord, ScaffoldError>> {
        vec![
            rec("scf1_2_0", 210),
            rec("scf2_1_0", 900),
            rec("scf1_1_10", 100),
        ]
    }

    // With the ordering precondition broken the streaming grouper splits and
    // misorders scaffolds; the two-pass grouper recovers them.
    #[test]
    fn test_unordered_stream_streaming() {
        let groups: Vec<_> = Grouper::new(unordered().into_iter())
            .map(|g| g.unwrap())
            .collect();

        assert_eq!(
            shape(&groups),
            vec![
                ("scf1".to_string(), vec![(2, 1)]),
                ("scf2".to_string(), vec![(1, 1)]),
                ("scf1".to_string(), vec![(1, 1)]),
            ]
        );
        assert!(!groups[0].is_complete());
        assert!(groups[2].is_complete());
    }

    #[test]
    fn test_unordered_stream_sorted() {
        let groups = group_sorted(unordered()).unwrap();

        assert_eq!(
            shape(&groups),
            vec![
                ("scf1".to_string(), vec![(1, 1), (2, 1)]),
                ("scf2".to_string(), vec![(1, 1)]),
            ]
        );
        assert!(groups.iter().all(|g| g.is_complete()));
    }

    #[test]
    fn test_descending_piece_within_scaffold() {
        let mut group = ScaffoldCandidates::new("scf1");
        group.push(rec("scf1_2_0", 210).unwrap());
        group.push(rec("scf1_1_10", 100).unwrap());

        let pieces: Vec<_> = group.pieces.iter().map(|p| p.piece).collect();
        assert_eq!(pieces, vec![1, 2, 1]);
    }
}
