use num_traits::identities::one;
use num_traits::identities::zero;
use num_traits::NumCast;
use std::any::TypeId;

/// Numeric trait shared by flows, costs and potentials.
///
/// Only signed types implement it: the simplex arithmetic negates flows and
/// reduced costs freely, so unsigned instantiations are rejected at compile
/// time instead of at run time.
pub trait CloneableNum:
    num_traits::Num
    + num_traits::NumCast
    + num_traits::bounds::Bounded
    + PartialOrd
    + Clone
    + Copy
    + PartialEq
    + std::fmt::Debug
    + std::ops::AddAssign
    + std::ops::SubAssign
    + Send
    + Sync
    + 'static
{
}

impl CloneableNum for i8 {}
impl CloneableNum for i16 {}
impl CloneableNum for i32 {}
impl CloneableNum for i64 {}
impl CloneableNum for i128 {}
impl CloneableNum for isize {}

impl CloneableNum for f32 {}
impl CloneableNum for f64 {}

/// Outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Infeasible,
    Optimal,
    Unbounded,
    TimeLimit,
}

/// Sizing mode for the arc arrays at construction.
///
/// `Full` reserves room for the whole instance up front; `Empty` reserves the
/// smaller column-generation footprint and expects arcs to arrive through
/// `add_arc`/`update_arcs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitMode {
    Full,
    Empty,
}

/// Progress emission. No effect on the computed solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Silent,
    Info,
    Debug,
}

/// Candidate arc handed to `update_arcs` during column generation.
#[derive(Clone, Copy, Debug)]
pub struct ArcVar<NUM: CloneableNum> {
    pub a: usize,
    pub b: usize,
    pub c: NUM,
}

impl<NUM: CloneableNum> ArcVar<NUM> {
    pub fn new(a: usize, b: usize, c: NUM) -> Self {
        ArcVar { a, b, c }
    }
}

/// Spanning-tree basis arrays, indexed by node id (root included at id N).
#[derive(Clone, Debug)]
pub struct Nodes<NUM: CloneableNum> {
    pub supply: Vec<NUM>,
    pub potential: Vec<NUM>,
    pub parent: Vec<Option<usize>>,
    pub pred: Vec<usize>,
    pub pred_dir: Vec<NUM>,
    pub thread: Vec<usize>,
    pub rev_thread: Vec<usize>,
    pub succ_num: Vec<usize>,
    pub last_succ: Vec<usize>,
}

/// Arc arrays, artificial arcs first (ids 0..N), real arcs after.
#[derive(Clone, Debug)]
pub struct Arcs<NUM: CloneableNum> {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
    pub cost: Vec<NUM>,
    pub flow: Vec<NUM>,
    pub state: Vec<NUM>,
}

// Arc state multipliers: a tree arc contributes nothing to pricing, an arc
// at its lower bound contributes its plain reduced cost.
#[inline]
pub(crate) fn state_tree<NUM: CloneableNum>() -> NUM {
    zero()
}

#[inline]
pub(crate) fn state_lower<NUM: CloneableNum>() -> NUM {
    one()
}

// Predecessor-arc orientation: UP points from the node toward its parent.
#[inline]
pub(crate) fn dir_up<NUM: CloneableNum>() -> NUM {
    one()
}

#[inline]
pub(crate) fn dir_down<NUM: CloneableNum>() -> NUM {
    zero::<NUM>() - one::<NUM>()
}

#[inline]
pub(crate) fn is_float<NUM: CloneableNum>() -> bool {
    TypeId::of::<NUM>() == TypeId::of::<f32>() || TypeId::of::<NUM>() == TypeId::of::<f64>()
}

/// Infinite residual for the uncapacitated cycle walk: the float infinity
/// when the type has one, the largest finite value otherwise.
#[inline]
pub(crate) fn inf<NUM: CloneableNum>() -> NUM {
    if is_float::<NUM>() {
        NumCast::from(f64::INFINITY).unwrap()
    } else {
        NUM::max_value()
    }
}

/// Cast a f64 tolerance into the working numeric type. Integer types
/// truncate toward zero, turning the tolerance into an exact comparison.
#[inline]
pub(crate) fn tol<NUM: CloneableNum>(t: f64) -> NUM {
    NumCast::from(t).unwrap_or_else(zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_detection_matches_types() {
        assert!(is_float::<f32>());
        assert!(is_float::<f64>());
        assert!(!is_float::<i32>());
        assert!(!is_float::<i64>());
    }

    #[test]
    fn tolerances_truncate_for_integers() {
        assert_eq!(tol::<i64>(-1e-6), 0);
        assert_eq!(tol::<i32>(1e-9), 0);
        assert!(tol::<f64>(-1e-6) < 0.0);
    }

    #[test]
    fn infinite_residual_is_absorbing() {
        assert_eq!(inf::<i64>(), i64::MAX);
        assert!(inf::<f64>().is_infinite());
    }
}
