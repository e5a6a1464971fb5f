//! Scalar-or-per-frequency arguments
//!
//! Rotation angles and static-shift factors may be given once for all
//! frequencies or once per frequency index. The broadcast rule is
//! explicit: a scalar (or a length-1 sequence) applies to every index,
//! a longer sequence must have length exactly N.

/// Per-frequency argument: one value broadcast to every index, or an
/// explicit per-index sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PerFreq {
    /// One value applied at every frequency index.
    Scalar(f64),
    /// One value per frequency index; length must be N or 1.
    PerIndex(Vec<f64>),
}

impl PerFreq {
    /// Expand to exactly `n` values. Length-1 sequences broadcast like
    /// scalars; any other length mismatch yields `None`.
    pub fn resolve(&self, n: usize) -> Option<Vec<f64>> {
        match self {
            PerFreq::Scalar(v) => Some(vec![*v; n]),
            PerFreq::PerIndex(vs) if vs.len() == 1 => Some(vec![vs[0]; n]),
            PerFreq::PerIndex(vs) if vs.len() == n => Some(vs.clone()),
            PerFreq::PerIndex(_) => None,
        }
    }

    /// Number of supplied values (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            PerFreq::Scalar(_) => 1,
            PerFreq::PerIndex(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<f64> for PerFreq {
    fn from(v: f64) -> Self {
        PerFreq::Scalar(v)
    }
}

impl From<Vec<f64>> for PerFreq {
    fn from(vs: Vec<f64>) -> Self {
        PerFreq::PerIndex(vs)
    }
}

impl From<&[f64]> for PerFreq {
    fn from(vs: &[f64]) -> Self {
        PerFreq::PerIndex(vs.to_vec())
    }
}
