use itertools::Itertools;
use std::fmt;
use std::io::{BufRead, Write};

use crate::libs::cigar::{AlignmentRecord, CigarRecords};
use crate::libs::combo::CartesianProduct;
use crate::libs::error::ScaffoldError;
use crate::libs::group::{group_sorted, Grouper, ScaffoldCandidates};
use crate::libs::score::{observed_gap, score, Verdict};

/// The best scoring combination of a scaffold.
#[derive(Debug, Clone)]
pub struct Placement<'a> {
    pub scaffold: &'a str,
    pub verdict: Verdict,
    pub records: Vec<&'a AlignmentRecord>,
}

/// Summary line: score, then each piece as `<strand><start,end>` preceded by
/// `(observed/expected)` gaps, then the scaffold name.
///
/// ```text
/// 0.962231	+<100,199> (20/10) +<219,400> scf1
/// ```
impl fmt::Display for Placement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strand = match self.records.first() {
            Some(first) => first.q_strand,
            None => return write!(f, "{}\t{}", self.verdict, self.scaffold),
        };

        let first = self.records[0].placement();
        let rest = self.records.iter().tuple_windows().map(|(prev, next)| {
            format!(
                "({}/{}) {}",
                observed_gap(prev, next, strand),
                prev.fragment.gap,
                next.placement()
            )
        });
        let pieces = std::iter::once(first).chain(rest).join(" ");

        write!(f, "{}\t{} {}", self.verdict, pieces, self.scaffold)
    }
}

/// Scores every combination of a scaffold's candidates and keeps the best.
///
/// Ties go to the combination enumerated first. Returns `None` when some
/// piece has no candidate, as no combination exists.
pub fn best_combination(group: &ScaffoldCandidates) -> Option<Placement<'_>> {
    if !group.is_complete() {
        return None;
    }

    let product = CartesianProduct::new(group.candidate_lists());
    tracing::debug!(
        "{}: {} pieces, {} combinations",
        group.scaffold,
        group.pieces.len(),
        product.total()
    );

    let mut best: Option<(Verdict, Vec<&AlignmentRecord>)> = None;
    for combination in product {
        let verdict = score(&combination);
        if best.as_ref().map_or(true, |(b, _)| verdict > *b) {
            best = Some((verdict, combination));
        }
    }

    best.map(|(verdict, records)| Placement {
        scaffold: &group.scaffold,
        verdict,
        records,
    })
}

/// Writes one summary line per scaffold group. Returns the number of lines.
pub fn resolve<I, W>(groups: I, writer: &mut W) -> Result<usize, ScaffoldError>
where
    I: IntoIterator<Item = Result<ScaffoldCandidates, ScaffoldError>>,
    W: Write,
{
    let mut lines = 0;
    for group in groups {
        let group = group?;
        match best_combination(&group) {
            Some(placement) => {
                writeln!(writer, "{}", placement)?;
                lines += 1;
            }
            None => tracing::debug!(
                "Skipping {}: a piece has no candidate alignment",
                group.scaffold
            ),
        }
    }

    Ok(lines)
}

/// Runs a whole cigar report through grouping, scoring and selection.
///
/// With `sorted` the report is grouped in two passes and may come in any
/// order; otherwise it is streamed and must be ordered by scaffold and piece.
pub fn resolve_report<R, W>(report: R, sorted: bool, writer: &mut W) -> Result<usize, ScaffoldError>
where
    R: BufRead,
    W: Write,
{
    let records = CigarRecords::new(report);
    if sorted {
        resolve(group_sorted(records)?.into_iter().map(Ok), writer)
    } else {
        resolve(Grouper::new(records), writer)
    }
}
