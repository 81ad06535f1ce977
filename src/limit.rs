use std::cmp::Ordering;
use std::fmt;

/// A count bound that is either a finite value or unbounded.
///
/// Used for the concurrency limit and both depth bounds. Displays as the
/// bare number, or `Infinity` when unbounded — the validation messages
/// interpolate this.
///
/// Ordering places every finite value below [`Limit::Unbounded`], and a
/// `Limit` compares directly against `usize` so guards read like the
/// quantities they bound:
///
/// ```rust
/// use scour::Limit;
///
/// let depth_cap = Limit::Finite(3);
/// assert!(depth_cap > 2);
/// assert!(!(depth_cap > 3));
/// assert!(Limit::Unbounded > usize::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Limit {
    /// An exact count.
    Finite(usize),

    /// No bound.
    Unbounded,
}

impl Limit {
    /// Whether this limit is a usable count — any finite non-zero value,
    /// or unbounded. Zero is the one rejected value.
    pub fn is_positive(self) -> bool {
        !matches!(self, Limit::Finite(0))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Finite(n) => write!(f, "{n}"),
            Limit::Unbounded => write!(f, "Infinity"),
        }
    }
}

impl From<usize> for Limit {
    fn from(n: usize) -> Self {
        Limit::Finite(n)
    }
}

impl PartialEq<usize> for Limit {
    fn eq(&self, other: &usize) -> bool {
        matches!(self, Limit::Finite(n) if n == other)
    }
}

impl PartialOrd<usize> for Limit {
    fn partial_cmp(&self, other: &usize) -> Option<Ordering> {
        match self {
            Limit::Finite(n) => n.partial_cmp(other),
            Limit::Unbounded => Some(Ordering::Greater),
        }
    }
}
