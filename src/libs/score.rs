use std::cmp::Ordering;
use std::fmt;

use crate::libs::cigar::{AlignmentRecord, Strand};

/// Error function, Abramowitz & Stegun formula 7.1.26.
///
/// Maximum absolute error is 1.5e-7, enough to rank combinations.
pub fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Outcome of scoring one combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Product of the junction factors, in (0, 1]
    Valid(f64),
    /// Pieces aligned to different strands
    StrandMismatch,
    /// Target starts not strictly monotone for the given strand
    OrderViolation(Strand),
}

impl Verdict {
    /// Numeric view: the score itself, or -1 / -2 / -3 for the
    /// disqualifications, so that any valid verdict outranks them all.
    pub fn value(&self) -> f64 {
        match self {
            Verdict::Valid(s) => *s,
            Verdict::StrandMismatch => -1.0,
            Verdict::OrderViolation(Strand::Forward) => -2.0,
            Verdict::OrderViolation(Strand::Reverse) => -3.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid(_))
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid(s) => write!(f, "{:.6}", s),
            _ => write!(f, "{}", self.value()),
        }
    }
}

/// Distance on the target between two consecutive pieces.
///
/// On the reverse strand piece `next` lies to the left of `prev`, so the
/// gap is measured from the end of `next` to the start of `prev`.
pub fn observed_gap(prev: &AlignmentRecord, next: &AlignmentRecord, strand: Strand) -> i64 {
    match strand {
        Strand::Forward => next.t_start.saturating_sub(prev.t_end),
        Strand::Reverse => prev.t_start.saturating_sub(next.t_end),
    }
}

/// Plausibility of an observed gap given the expected one, in (0, 1].
///
/// `erf(-|observed/expected - 1| / 3) + 1`; 1 for an exact match.
pub fn junction_factor(observed: i64, expected: usize) -> f64 {
    if expected == 0 {
        return if observed == 0 { 1.0 } else { 0.0 };
    }
    let y = -((observed as f64 / expected as f64) - 1.0).abs() / 3.0;
    erf(y) + 1.0
}

/// Scores one candidate per piece, given in piece order.
pub fn score(combination: &[&AlignmentRecord]) -> Verdict {
    let strand = match combination.first() {
        Some(first) => first.q_strand,
        None => return Verdict::Valid(1.0),
    };

    if combination.iter().any(|r| r.q_strand != strand) {
        return Verdict::StrandMismatch;
    }

    let monotone = combination.windows(2).all(|w| match strand {
        Strand::Forward => w[0].t_start < w[1].t_start,
        Strand::Reverse => w[0].t_start > w[1].t_start,
    });
    if !monotone {
        return Verdict::OrderViolation(strand);
    }

    let s: f64 = combination
        .windows(2)
        .map(|w| junction_factor(observed_gap(w[0], w[1], strand), w[0].fragment.gap))
        .product();

    Verdict::Valid(s)
}
