use crate::basetypes::*;

/// Entering-arc selection strategy requested through `run`/`re_run`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PivotRule {
    BlockSearch,
}

/// One pricing pass: hand back an improving non-basic arc, or `None` when
/// the current basis prices out.
pub trait EnteringArcSearch<NUM: CloneableNum> {
    fn find_entering_arc(&mut self, arcs: &Arcs<NUM>, potential: &[NUM]) -> Option<usize>;
}

/// Block search over the real arcs: scan blocks of ~sqrt(M) arcs from a
/// circular cursor and commit the best candidate of the first block that
/// contains one.
pub struct BlockSearchPivotRule<NUM: CloneableNum> {
    dummy_arc: usize,
    arc_num: usize,
    next_arc: usize,
    block_size: usize,
    negeps: NUM,
}

const BLOCK_SIZE_FACTOR: f64 = 1.0;
const MIN_BLOCK_SIZE: usize = 20;

impl<NUM: CloneableNum> BlockSearchPivotRule<NUM> {
    pub fn new(dummy_arc: usize, arc_num: usize, next_arc: usize, opt_tolerance: f64) -> Self {
        let search_num = (arc_num - dummy_arc) as f64;
        let block_size = ((BLOCK_SIZE_FACTOR * search_num.sqrt()).ceil() as usize).max(MIN_BLOCK_SIZE);
        BlockSearchPivotRule {
            dummy_arc,
            arc_num,
            next_arc,
            block_size,
            negeps: tol(next_toward_zero(-opt_tolerance)),
        }
    }
}

impl<NUM: CloneableNum> EnteringArcSearch<NUM> for BlockSearchPivotRule<NUM> {
    fn find_entering_arc(&mut self, arcs: &Arcs<NUM>, potential: &[NUM]) -> Option<usize> {
        let mut min = self.negeps;
        let mut in_arc = self.arc_num;
        let mut cnt = self.block_size;

        for e in (self.next_arc..self.arc_num).chain(self.dummy_arc..self.next_arc) {
            // state folds tree arcs to zero, so only lower-bound arcs price in
            let c = unsafe {
                *arcs.state.get_unchecked(e)
                    * (*arcs.cost.get_unchecked(e)
                        + *potential.get_unchecked(*arcs.source.get_unchecked(e))
                        - *potential.get_unchecked(*arcs.target.get_unchecked(e)))
            };
            if c < min {
                min = c;
                in_arc = e;
            }
            cnt -= 1;
            if cnt == 0 {
                if min < self.negeps {
                    break;
                }
                cnt = self.block_size;
            }
        }

        if min < self.negeps {
            self.next_arc = in_arc + 1;
            Some(in_arc)
        } else {
            None
        }
    }
}

/// `nextafter(x, -0.0)` for negative `x`: one ulp toward zero, so the
/// pricing comparison stays strict under round-off.
pub(crate) fn next_toward_zero(x: f64) -> f64 {
    if x == 0.0 {
        return x;
    }
    f64::from_bits(x.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::identities::zero;

    fn arcs_of(triples: &[(usize, usize, f64)]) -> Arcs<f64> {
        Arcs {
            source: triples.iter().map(|t| t.0).collect(),
            target: triples.iter().map(|t| t.1).collect(),
            cost: triples.iter().map(|t| t.2).collect(),
            flow: vec![zero(); triples.len()],
            state: vec![state_lower(); triples.len()],
        }
    }

    #[test]
    fn block_size_floors_at_twenty() {
        let rule = BlockSearchPivotRule::<f64>::new(4, 4 + 9, 4, 1e-6);
        assert_eq!(rule.block_size, 20);
        let rule = BlockSearchPivotRule::<f64>::new(0, 10_000, 0, 1e-6);
        assert_eq!(rule.block_size, 100);
    }

    #[test]
    fn threshold_moves_one_ulp_toward_zero() {
        let x = next_toward_zero(-1e-6);
        assert!(x > -1e-6 && x < 0.0);
        assert_eq!(next_toward_zero(0.0), 0.0);
    }

    #[test]
    fn picks_most_negative_arc_and_advances_cursor() {
        // two nodes, flat potentials: reduced cost is the raw cost
        let arcs = arcs_of(&[(0, 1, 3.0), (0, 1, -2.0), (1, 0, -5.0), (0, 1, 1.0)]);
        let pi = vec![0.0, 0.0];
        let mut rule = BlockSearchPivotRule::<f64>::new(0, 4, 0, 1e-6);
        assert_eq!(rule.find_entering_arc(&arcs, &pi), Some(2));
        assert_eq!(rule.next_arc, 3);
    }

    #[test]
    fn tree_arcs_never_price_in() {
        let mut arcs = arcs_of(&[(0, 1, -4.0)]);
        arcs.state[0] = state_tree();
        let pi = vec![0.0, 0.0];
        let mut rule = BlockSearchPivotRule::<f64>::new(0, 1, 0, 1e-6);
        assert_eq!(rule.find_entering_arc(&arcs, &pi), None);
    }
}
