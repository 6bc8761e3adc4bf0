use debug_print::debug_println;
use itertools::Itertools;
use num_traits::identities::one;
use num_traits::identities::zero;
use num_traits::NumCast;
use petgraph::prelude::*;
use std::time::Instant;

pub mod basetypes;
pub mod pivotrules;

pub use basetypes::{ArcVar, CloneableNum, InitMode, Status, Verbosity};
pub use pivotrules::PivotRule;

use basetypes::*;
use pivotrules::{BlockSearchPivotRule, EnteringArcSearch};

const FEASIBILITY_TOL: f64 = 1e-9;
const PRIC_TOL: f64 = 1e-9;

/// Primal network simplex over an uncapacitated min-cost flow instance.
///
/// Node ids are `0..node_num`; an artificial root lives at id `node_num`.
/// Arc ids `0..node_num` are the artificial arcs tying each node to the
/// root, real arcs follow from id `node_num` on. The basis is a spanning
/// tree over all nodes kept in parallel arrays and patched in place at each
/// pivot, never rebuilt.
///
/// A fresh solve goes through `run`; `re_run` resumes on the current basis,
/// which is what the column-generation loop around `update_arcs` wants.
pub struct NetSimplex<NUM: CloneableNum> {
    node_num: usize,
    dummy_arc: usize,
    arc_num: usize,
    root: usize,
    next_arc: usize,

    nodes: Nodes<NUM>,
    arcs: Arcs<NUM>,

    sum_supply: NUM,

    // scratch reused by update_tree_structure
    dirty_revs: Vec<usize>,

    // current pivot
    in_arc: usize,
    join: usize,
    u_in: usize,
    v_in: usize,
    u_out: usize,
    delta: NUM,

    timelimit: f64,
    opt_tolerance: f64,
    verbosity: Verbosity,
    n_it_log: u64,
    num_threads: usize,
    selfcheck: bool,

    runtime_ms: f64,
    iterations: u64,
}

impl<NUM: CloneableNum> NetSimplex<NUM> {
    /// `arc_num` is a sizing hint for the real arcs; `InitMode::Empty`
    /// ignores it and reserves the smaller column-generation footprint.
    pub fn new(mode: InitMode, node_num: usize, arc_num: usize) -> Self {
        let all_node_num = node_num + 1;
        let max_arc_num = match mode {
            InitMode::Full => 2 * node_num + arc_num + 1,
            InitMode::Empty => 4 * node_num + 1,
        };

        let mut source = Vec::with_capacity(max_arc_num);
        let mut target = Vec::with_capacity(max_arc_num);
        let mut cost = Vec::with_capacity(max_arc_num);
        let mut flow = Vec::with_capacity(max_arc_num);
        let mut state = Vec::with_capacity(max_arc_num);
        source.resize(node_num, 0);
        target.resize(node_num, 0);
        cost.resize(node_num, zero());
        flow.resize(node_num, zero());
        state.resize(node_num, state_lower());

        NetSimplex {
            node_num,
            dummy_arc: node_num,
            arc_num: node_num,
            root: node_num,
            next_arc: node_num,
            nodes: Nodes {
                supply: vec![zero(); all_node_num],
                potential: vec![zero(); all_node_num],
                parent: vec![None; all_node_num],
                pred: vec![0; all_node_num],
                pred_dir: vec![dir_up(); all_node_num],
                thread: vec![0; all_node_num],
                rev_thread: vec![0; all_node_num],
                succ_num: vec![0; all_node_num],
                last_succ: vec![0; all_node_num],
            },
            arcs: Arcs {
                source,
                target,
                cost,
                flow,
                state,
            },
            sum_supply: zero(),
            dirty_revs: Vec::new(),
            in_arc: 0,
            join: 0,
            u_in: 0,
            v_in: 0,
            u_out: 0,
            delta: zero(),
            timelimit: f64::MAX,
            opt_tolerance: 1e-6,
            verbosity: Verbosity::Info,
            n_it_log: 10_000_000,
            num_threads: 1,
            selfcheck: false,
            runtime_ms: 0.0,
            iterations: 0,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.node_num
    }

    /// Number of real arcs currently loaded.
    pub fn num_arcs(&self) -> usize {
        self.arc_num - self.dummy_arc
    }

    pub fn add_node(&mut self, i: usize, b: NUM) {
        self.nodes.supply[i] = b;
    }

    /// Append a real arc and return its absolute id.
    pub fn add_arc(&mut self, a: usize, b: usize, c: NUM) -> usize {
        let idx = self.arcs.source.len();
        self.arcs.source.push(a);
        self.arcs.target.push(b);
        self.arcs.cost.push(c);
        self.arcs.flow.push(zero());
        self.arcs.state.push(state_lower());
        self.arc_num += 1;
        idx
    }

    /// Activate the pre-sized slot at logical index `idx` (see
    /// `resize_arc_memory`); slots are expected to be filled densely from 0.
    pub fn set_arc(&mut self, idx: usize, a: usize, b: usize, c: NUM) {
        let e = self.dummy_arc + idx;
        self.arcs.source[e] = a;
        self.arcs.target[e] = b;
        self.arcs.cost[e] = c;
        self.arcs.flow[e] = zero();
        self.arcs.state[e] = state_lower();
        self.arc_num += 1;
    }

    /// Overwrite the cost of the real arc at logical index `idx`.
    pub fn set_arc_cost(&mut self, idx: usize, c: NUM) {
        self.arcs.cost[self.dummy_arc + idx] = c;
    }

    pub fn reserve_arc_memory(&mut self, extra: usize) {
        self.arcs.source.reserve(extra);
        self.arcs.target.reserve(extra);
        self.arcs.cost.reserve(extra);
        self.arcs.flow.reserve(extra);
        self.arcs.state.reserve(extra);
    }

    pub fn resize_arc_memory(&mut self, extra: usize) {
        let len = self.arcs.source.len() + extra;
        self.arcs.source.resize(len, 0);
        self.arcs.target.resize(len, 0);
        self.arcs.cost.resize(len, zero());
        self.arcs.flow.resize(len, zero());
        self.arcs.state.resize(len, state_lower());
    }

    /// Column-generation entry: recycle the slots of non-basic arcs whose
    /// reduced cost is strictly positive (they cannot improve the current
    /// basis, so overwriting them leaves it intact), then append whatever
    /// candidates are left. Returns the number of candidates installed and
    /// points the pricing cursor at the first slot written.
    pub fn update_arcs(&mut self, vars: &[ArcVar<NUM>]) -> usize {
        let pric_tol: NUM = tol(PRIC_TOL);
        let mut new_arc = 0;
        let mut idx = 0;

        let mut e = self.dummy_arc;
        let e_max = self.arc_num;

        while idx < vars.len() {
            while e < e_max {
                let rc = self.arcs.cost[e] + self.nodes.potential[self.arcs.source[e]]
                    - self.nodes.potential[self.arcs.target[e]];
                if self.arcs.state[e] == state_lower::<NUM>() && rc > pric_tol {
                    break;
                }
                e += 1;
            }
            if e >= e_max {
                break;
            }
            self.arcs.source[e] = vars[idx].a;
            self.arcs.target[e] = vars[idx].b;
            self.arcs.cost[e] = vars[idx].c;
            if new_arc == 0 {
                self.next_arc = e;
            }
            new_arc += 1;
            idx += 1;
        }

        while idx < vars.len() {
            if new_arc == 0 {
                self.next_arc = e;
            }
            self.add_arc(vars[idx].a, vars[idx].b, vars[idx].c);
            new_arc += 1;
            idx += 1;
        }

        debug_println!("update_arcs: {} candidates, {} installed", vars.len(), new_arc);
        new_arc
    }

    /// Fresh solve: reset all arc flows and states, rebuild the Big-M star
    /// basis, then pivot to optimality.
    pub fn run(&mut self, rule: PivotRule) -> Status {
        self.runtime_ms = 0.0;
        self.iterations = 0;

        for e in 0..self.arc_num {
            self.arcs.state[e] = state_lower();
            self.arcs.flow[e] = zero();
        }

        if !self.init() {
            return Status::Infeasible;
        }
        self.start(rule)
    }

    /// Resume pivoting on the current basis. Only meaningful after a `run`.
    pub fn re_run(&mut self, rule: PivotRule) -> Status {
        self.start(rule)
    }

    /// Cost of the real arcs only; artificial flow contributes nothing.
    pub fn total_cost(&self) -> NUM {
        let mut c = zero();
        for e in self.dummy_arc..self.arc_num {
            if self.arcs.source[e] != self.root && self.arcs.target[e] != self.root {
                c += self.arcs.flow[e] * self.arcs.cost[e];
            }
        }
        c
    }

    pub fn total_flow(&self) -> NUM {
        let mut f = zero();
        for e in self.dummy_arc..self.arc_num {
            if self.arcs.source[e] != self.root && self.arcs.target[e] != self.root {
                f += self.arcs.flow[e];
            }
        }
        f
    }

    /// Dual value of node `n`.
    pub fn potential(&self, n: usize) -> NUM {
        self.nodes.potential[n]
    }

    /// Flow on the real arc at logical index `idx`.
    pub fn flow(&self, idx: usize) -> NUM {
        self.arcs.flow[self.dummy_arc + idx]
    }

    /// Residual flow on the artificial arc of node `u`; nonzero at
    /// termination means the instance is infeasible.
    pub fn dummy_flow(&self, u: usize) -> NUM {
        self.arcs.flow[u]
    }

    /// Milliseconds spent pivoting since the last `run`.
    pub fn runtime(&self) -> f64 {
        self.runtime_ms
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn set_timelimit(&mut self, t: f64) {
        self.timelimit = t;
        if self.verbosity != Verbosity::Silent {
            println!("INFO: change <timelimit> to {}", t);
        }
    }

    pub fn set_opt_tolerance(&mut self, o: f64) {
        self.opt_tolerance = o;
        if self.verbosity != Verbosity::Silent {
            println!("INFO: change <opt_tolerance> to {}", o);
        }
    }

    pub fn set_verbosity(&mut self, v: Verbosity) {
        self.verbosity = v;
        self.n_it_log = match v {
            Verbosity::Silent => 0,
            Verbosity::Info => 10_000_000,
            Verbosity::Debug => 100_000,
        };
    }

    /// With more than one thread the two cycle halves of each flow
    /// augmentation run under `rayon::join`.
    pub fn set_num_threads(&mut self, n: usize) {
        self.num_threads = n.max(1);
    }

    /// Re-verify the basis arrays after every pivot. Expensive; meant for
    /// tests on small instances.
    pub fn set_selfcheck(&mut self, on: bool) {
        self.selfcheck = on;
    }

    /// Post-run scan of the artificial arcs: any residual flow there means
    /// no feasible flow exists on the real arcs.
    pub fn check_feasibility(&self) -> Status {
        let feas_tol: NUM = tol(FEASIBILITY_TOL);
        for e in 0..self.dummy_arc {
            let f = self.arcs.flow[e];
            let f = if f < zero() { zero::<NUM>() - f } else { f };
            if f > feas_tol {
                return Status::Infeasible;
            }
        }
        Status::Optimal
    }

    // Big-M star basis: every node hangs off the artificial root through its
    // artificial arc, oriented by supply sign.
    fn init(&mut self) -> bool {
        if self.node_num == 0 {
            return false;
        }

        self.sum_supply = zero();
        for i in 0..self.node_num {
            self.sum_supply += self.nodes.supply[i];
        }
        // a nonzero sum is tolerated: the root absorbs the imbalance

        let mut art_cost: NUM;
        if is_float::<NUM>() {
            art_cost = zero();
            for e in self.dummy_arc..self.arc_num {
                if self.arcs.cost[e] > art_cost {
                    art_cost = self.arcs.cost[e];
                }
            }
            art_cost = (art_cost + one()) * NumCast::from(self.node_num).unwrap();
        } else {
            art_cost = NUM::max_value() / (one::<NUM>() + one::<NUM>()) + one::<NUM>();
        }

        let root = self.root;
        self.nodes.parent[root] = None;
        self.nodes.thread[root] = 0;
        self.nodes.rev_thread[0] = root;
        self.nodes.succ_num[root] = self.node_num + 1;
        self.nodes.last_succ[root] = root - 1;
        self.nodes.supply[root] = zero::<NUM>() - self.sum_supply;
        self.nodes.potential[root] = zero();
        // the root's pred/pred_dir slots stay unused

        for u in 0..self.node_num {
            let e = u;
            self.nodes.parent[u] = Some(root);
            self.nodes.pred[u] = e;
            self.nodes.thread[u] = u + 1;
            self.nodes.rev_thread[u + 1] = u;
            self.nodes.succ_num[u] = 1;
            self.nodes.last_succ[u] = u;
            self.arcs.state[e] = state_tree();
            if self.nodes.supply[u] >= zero() {
                self.nodes.pred_dir[u] = dir_up();
                self.nodes.potential[u] = zero();
                self.arcs.source[e] = u;
                self.arcs.target[e] = root;
                self.arcs.flow[e] = self.nodes.supply[u];
                self.arcs.cost[e] = zero();
            } else {
                self.nodes.pred_dir[u] = dir_down();
                self.nodes.potential[u] = art_cost;
                self.arcs.source[e] = root;
                self.arcs.target[e] = u;
                self.arcs.flow[e] = zero::<NUM>() - self.nodes.supply[u];
                self.arcs.cost[e] = art_cost;
            }
        }

        debug_println!("init: {} nodes, {} real arcs", self.node_num, self.num_arcs());
        true
    }

    fn start(&mut self, rule: PivotRule) -> Status {
        match rule {
            PivotRule::BlockSearch => {
                let pivot = BlockSearchPivotRule::new(
                    self.dummy_arc,
                    self.arc_num,
                    self.next_arc,
                    self.opt_tolerance,
                );
                self.pivot_loop(pivot)
            }
        }
    }

    fn pivot_loop<R: EnteringArcSearch<NUM>>(&mut self, mut pivot: R) -> Status {
        let start_t = Instant::now();

        loop {
            match pivot.find_entering_arc(&self.arcs, &self.nodes.potential) {
                Some(e) => self.in_arc = e,
                None => break,
            }

            self.find_join_node();
            if !self.find_leaving_arc() {
                // nothing on the cycle bounds the augmentation; unreachable
                // with the Big-M star but kept as a safety net
                self.runtime_ms += start_t.elapsed().as_secs_f64() * 1000.0;
                return Status::Unbounded;
            }
            self.change_flow();
            self.update_tree_structure();
            self.update_potential();

            if self.selfcheck {
                assert!(self.basis_coherent(), "basis arrays out of sync after pivot");
            }

            self.iterations += 1;
            if self.n_it_log > 0 && self.iterations % self.n_it_log == 0 {
                let elapsed = start_t.elapsed().as_secs_f64();
                if elapsed > self.timelimit {
                    self.runtime_ms += elapsed * 1000.0;
                    return Status::TimeLimit;
                }
                if self.verbosity == Verbosity::Debug {
                    println!(
                        "simplex inner loop | it: {}, cost: {:?}, runtime: {:.4}",
                        self.iterations,
                        self.total_cost(),
                        elapsed
                    );
                }
            }
        }

        self.runtime_ms += start_t.elapsed().as_secs_f64() * 1000.0;
        self.check_feasibility()
    }

    // Lowest common ancestor of the entering arc's endpoints: walk the
    // smaller subtree up, O(tree depth).
    fn find_join_node(&mut self) {
        let mut u = self.arcs.source[self.in_arc];
        let mut v = self.arcs.target[self.in_arc];
        while u != v {
            if self.nodes.succ_num[u] < self.nodes.succ_num[v] {
                u = self.nodes.parent[u].unwrap();
            } else {
                v = self.nodes.parent[v].unwrap();
            }
        }
        self.join = u;
    }

    // Minimum residual around the cycle closed by the entering arc. The
    // strict `<` on the first leg against `<=` on the second is Cunningham's
    // anti-cycling tie-break; degenerate (delta = 0) pivots still move the
    // leaving arc deterministically around the cycle.
    fn find_leaving_arc(&mut self) -> bool {
        let first = self.arcs.source[self.in_arc];
        let second = self.arcs.target[self.in_arc];

        self.delta = NUM::max_value();
        let mut result = 0;
        let mut u_out = 0;

        let mut u = first;
        while u != self.join {
            let e = self.nodes.pred[u];
            let mut d = self.arcs.flow[e];
            if self.nodes.pred_dir[u] == dir_down::<NUM>() {
                d = inf::<NUM>() - d;
            }
            if d < self.delta {
                self.delta = d;
                u_out = u;
                result = 1;
            }
            u = self.nodes.parent[u].unwrap();
        }

        let mut u = second;
        while u != self.join {
            let e = self.nodes.pred[u];
            let mut d = self.arcs.flow[e];
            if self.nodes.pred_dir[u] == dir_up::<NUM>() {
                d = inf::<NUM>() - d;
            }
            if d <= self.delta {
                self.delta = d;
                u_out = u;
                result = 2;
            }
            u = self.nodes.parent[u].unwrap();
        }

        if result == 1 {
            self.u_in = first;
            self.v_in = second;
        } else {
            self.u_in = second;
            self.v_in = first;
        }
        self.u_out = u_out;

        result != 0 && self.delta < NUM::max_value()
    }

    // Augment along the cycle. The two legs touch disjoint predecessor arcs,
    // so they may run on two workers.
    fn change_flow(&mut self) {
        if self.delta > zero() {
            let delta = self.delta;
            self.arcs.flow[self.in_arc] += delta;
            let first = self.arcs.source[self.in_arc];
            let second = self.arcs.target[self.in_arc];
            let join = self.join;

            if self.num_threads > 1 {
                let nodes = &self.nodes;
                let flow = FlowPtr(self.arcs.flow.as_mut_ptr());
                rayon::join(
                    move || {
                        let flow = flow;
                        let mut u = first;
                        while u != join {
                            unsafe {
                                *flow.0.add(nodes.pred[u]) -= nodes.pred_dir[u] * delta;
                            }
                            u = nodes.parent[u].unwrap();
                        }
                    },
                    move || {
                        let flow = flow;
                        let mut u = second;
                        while u != join {
                            unsafe {
                                *flow.0.add(nodes.pred[u]) += nodes.pred_dir[u] * delta;
                            }
                            u = nodes.parent[u].unwrap();
                        }
                    },
                );
            } else {
                let mut u = first;
                while u != join {
                    self.arcs.flow[self.nodes.pred[u]] -= self.nodes.pred_dir[u] * delta;
                    u = self.nodes.parent[u].unwrap();
                }
                let mut u = second;
                while u != join {
                    self.arcs.flow[self.nodes.pred[u]] += self.nodes.pred_dir[u] * delta;
                    u = self.nodes.parent[u].unwrap();
                }
            }
        }

        self.arcs.state[self.in_arc] = state_tree();
        self.arcs.state[self.nodes.pred[self.u_out]] = state_lower();
    }

    // Splice the subtree hanging off the leaving arc onto the entering arc.
    // Thread and rev_thread are patched along the stem (the path u_in ..
    // u_out whose parent pointers flip), then succ_num and last_succ are
    // repaired on both cycle legs. O(depth + stem length).
    fn update_tree_structure(&mut self) {
        let u_in = self.u_in;
        let v_in = self.v_in;
        let u_out = self.u_out;
        let join = self.join;

        let old_rev_thread = self.nodes.rev_thread[u_out];
        let old_succ_num = self.nodes.succ_num[u_out];
        let old_last_succ = self.nodes.last_succ[u_out];
        let v_out = self.nodes.parent[u_out].unwrap();

        if u_in == u_out {
            // entering and leaving arcs share their basis endpoint: only
            // reparent u_in, no stem to flip
            self.nodes.parent[u_in] = Some(v_in);
            self.nodes.pred[u_in] = self.in_arc;
            self.nodes.pred_dir[u_in] = if u_in == self.arcs.source[self.in_arc] {
                dir_up()
            } else {
                dir_down()
            };

            if self.nodes.thread[v_in] != u_out {
                // splice u_out's subtree right after v_in in the thread
                let mut after = self.nodes.thread[old_last_succ];
                self.nodes.thread[old_rev_thread] = after;
                self.nodes.rev_thread[after] = old_rev_thread;
                after = self.nodes.thread[v_in];
                self.nodes.thread[v_in] = u_out;
                self.nodes.rev_thread[u_out] = v_in;
                self.nodes.thread[old_last_succ] = after;
                self.nodes.rev_thread[after] = old_last_succ;
            }
        } else {
            // when old_rev_thread == v_in, join and v_out coincide and the
            // thread continues after the old subtree instead
            let thread_continue = if old_rev_thread == v_in {
                self.nodes.thread[old_last_succ]
            } else {
                self.nodes.thread[v_in]
            };

            let mut stem = u_in;
            let mut par_stem = v_in;
            let mut last = self.nodes.last_succ[u_in];
            let mut after = self.nodes.thread[last];
            self.nodes.thread[v_in] = u_in;
            self.dirty_revs.clear();
            self.dirty_revs.push(v_in);
            while stem != u_out {
                // hook the next stem node in after the current one's subtree
                let next_stem = self.nodes.parent[stem].unwrap();
                self.nodes.thread[last] = next_stem;
                self.dirty_revs.push(last);

                // unlink the current stem subtree from its old position
                let before = self.nodes.rev_thread[stem];
                self.nodes.thread[before] = after;
                self.nodes.rev_thread[after] = before;

                self.nodes.parent[stem] = Some(par_stem);
                par_stem = stem;
                stem = next_stem;

                last = if self.nodes.last_succ[stem] == self.nodes.last_succ[par_stem] {
                    self.nodes.rev_thread[par_stem]
                } else {
                    self.nodes.last_succ[stem]
                };
                after = self.nodes.thread[last];
            }
            self.nodes.parent[u_out] = Some(par_stem);
            self.nodes.thread[last] = thread_continue;
            self.nodes.rev_thread[thread_continue] = last;
            self.nodes.last_succ[u_out] = last;

            if old_rev_thread != v_in {
                self.nodes.thread[old_rev_thread] = after;
                self.nodes.rev_thread[after] = old_rev_thread;
            }

            for i in 0..self.dirty_revs.len() {
                let u = self.dirty_revs[i];
                self.nodes.rev_thread[self.nodes.thread[u]] = u;
            }

            // flip pred/pred_dir and rebuild succ_num/last_succ along the
            // stem, walking the freshly reversed parent pointers
            let mut tmp_sc = 0;
            let tmp_ls = self.nodes.last_succ[u_out];
            let mut u = u_out;
            while u != u_in {
                let p = self.nodes.parent[u].unwrap();
                self.nodes.pred[u] = self.nodes.pred[p];
                self.nodes.pred_dir[u] = zero::<NUM>() - self.nodes.pred_dir[p];
                tmp_sc += self.nodes.succ_num[u] - self.nodes.succ_num[p];
                self.nodes.succ_num[u] = tmp_sc;
                self.nodes.last_succ[p] = tmp_ls;
                u = p;
            }
            self.nodes.pred[u_in] = self.in_arc;
            self.nodes.pred_dir[u_in] = if u_in == self.arcs.source[self.in_arc] {
                dir_up()
            } else {
                dir_down()
            };
            self.nodes.succ_num[u_in] = old_succ_num;
        }

        // last_succ from v_in toward the root
        let up_limit_out = if self.nodes.last_succ[join] == v_in {
            Some(join)
        } else {
            None
        };
        let last_succ_out = self.nodes.last_succ[u_out];

        let mut u = Some(v_in);
        while let Some(x) = u {
            if self.nodes.last_succ[x] != v_in {
                break;
            }
            self.nodes.last_succ[x] = last_succ_out;
            u = self.nodes.parent[x];
        }

        // last_succ from v_out toward the root, bounded by up_limit_out
        if join != old_rev_thread && v_in != old_rev_thread {
            let mut u = Some(v_out);
            while u != up_limit_out {
                let x = u.unwrap();
                if self.nodes.last_succ[x] != old_last_succ {
                    break;
                }
                self.nodes.last_succ[x] = old_rev_thread;
                u = self.nodes.parent[x];
            }
        } else if last_succ_out != old_last_succ {
            let mut u = Some(v_out);
            while u != up_limit_out {
                let x = u.unwrap();
                if self.nodes.last_succ[x] != old_last_succ {
                    break;
                }
                self.nodes.last_succ[x] = last_succ_out;
                u = self.nodes.parent[x];
            }
        }

        // the moved subtree changes the counts on both cycle legs
        let mut u = v_in;
        while u != join {
            self.nodes.succ_num[u] += old_succ_num;
            u = self.nodes.parent[u].unwrap();
        }
        let mut u = v_out;
        while u != join {
            self.nodes.succ_num[u] -= old_succ_num;
            u = self.nodes.parent[u].unwrap();
        }
    }

    // Shift the moved subtree's potentials by the entering arc's residual
    // reduced cost; every other tree arc keeps its zero reduced cost.
    fn update_potential(&mut self) {
        let sigma = self.nodes.potential[self.v_in] - self.nodes.potential[self.u_in]
            - self.nodes.pred_dir[self.u_in] * self.arcs.cost[self.in_arc];
        let end = self.nodes.thread[self.nodes.last_succ[self.u_in]];
        let mut u = self.u_in;
        while u != end {
            self.nodes.potential[u] += sigma;
            u = self.nodes.thread[u];
        }
    }

    /// Full audit of the basis arrays against each other. Quadratic; used by
    /// the per-pivot selfcheck and the invariant tests.
    pub fn basis_coherent(&self) -> bool {
        let all = self.node_num + 1;

        if !(0..all).map(|u| self.nodes.thread[u]).sorted().eq(0..all) {
            return false;
        }
        for u in 0..all {
            if self.nodes.rev_thread[self.nodes.thread[u]] != u {
                return false;
            }
        }
        if self.nodes.parent[self.root].is_some() || self.nodes.succ_num[self.root] != all {
            return false;
        }

        for u in 0..self.node_num {
            let mut v = u;
            let mut steps = 0;
            while let Some(p) = self.nodes.parent[v] {
                if self.nodes.succ_num[p] <= self.nodes.succ_num[v] {
                    return false;
                }
                v = p;
                steps += 1;
                if steps > all {
                    return false;
                }
            }
            if v != self.root {
                return false;
            }

            let e = self.nodes.pred[u];
            let p = self.nodes.parent[u].unwrap();
            let up = self.nodes.pred_dir[u] == dir_up::<NUM>();
            let endpoints = (self.arcs.source[e], self.arcs.target[e]);
            if up && endpoints != (u, p) {
                return false;
            }
            if !up && endpoints != (p, u) {
                return false;
            }
            if self.arcs.state[e] != state_tree::<NUM>() {
                return false;
            }
        }

        // each subtree must be a contiguous thread segment of succ_num[u]
        // nodes ending at last_succ[u]
        for u in 0..all {
            let mut v = u;
            for _ in 1..self.nodes.succ_num[u] {
                v = self.nodes.thread[v];
                let mut w = v;
                let mut inside = false;
                loop {
                    if w == u {
                        inside = true;
                        break;
                    }
                    match self.nodes.parent[w] {
                        Some(p) => w = p,
                        None => break,
                    }
                }
                if !inside {
                    return false;
                }
            }
            if self.nodes.last_succ[u] != v {
                return false;
            }
        }

        true
    }
}

#[derive(Clone, Copy)]
struct FlowPtr<NUM>(*mut NUM);

unsafe impl<NUM: Send> Send for FlowPtr<NUM> {}
unsafe impl<NUM: Sync> Sync for FlowPtr<NUM> {}

/// Solve a min-cost flow instance given as a petgraph digraph with node
/// weights holding supplies (positive = source, negative = sink) and edge
/// weights holding per-unit costs.
///
/// Returns the final status, the flow per edge (in edge-index order) and the
/// node potentials certifying optimality.
pub fn min_cost<NUM: CloneableNum>(
    graph: &DiGraph<NUM, NUM>,
    rule: PivotRule,
    num_threads: usize,
) -> (Status, Vec<NUM>, Vec<NUM>) {
    let mut solver = NetSimplex::new(InitMode::Full, graph.node_count(), graph.edge_count());
    solver.set_verbosity(Verbosity::Silent);
    solver.set_num_threads(num_threads);

    for u in graph.node_indices() {
        solver.add_node(u.index(), *graph.node_weight(u).unwrap());
    }
    for e in graph.edge_references() {
        solver.add_arc(e.source().index(), e.target().index(), *e.weight());
    }

    let status = solver.run(rule);
    let flows = (0..graph.edge_count()).map(|i| solver.flow(i)).collect();
    let potentials = (0..graph.node_count()).map(|n| solver.potential(n)).collect();
    (status, flows, potentials)
}
