use petgraph::graph::{DiGraph, NodeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ticino::{min_cost, InitMode, NetSimplex, PivotRule, Status, Verbosity};

#[test]
fn trivial_transportation() {
    let mut solver = NetSimplex::<i64>::new(InitMode::Full, 2, 1);
    solver.set_verbosity(Verbosity::Silent);
    solver.add_node(0, 1);
    solver.add_node(1, -1);
    solver.add_arc(0, 1, 7);

    assert_eq!(solver.run(PivotRule::BlockSearch), Status::Optimal);
    assert_eq!(solver.flow(0), 1);
    assert_eq!(solver.total_cost(), 7);
    assert_eq!(solver.total_flow(), 1);
    // the shipping arc is basic, so its reduced cost vanishes
    assert_eq!(7 + solver.potential(0) - solver.potential(1), 0);
}

#[test]
fn two_source_two_sink() {
    let mut graph = DiGraph::<i64, i64>::new();
    let n0 = graph.add_node(3);
    let n1 = graph.add_node(2);
    let n2 = graph.add_node(-1);
    let n3 = graph.add_node(-4);
    graph.add_edge(n0, n2, 1);
    graph.add_edge(n0, n3, 4);
    graph.add_edge(n1, n2, 2);
    graph.add_edge(n1, n3, 3);

    let (status, flows, potentials) = min_cost(&graph, PivotRule::BlockSearch, 1);
    assert_eq!(status, Status::Optimal);

    let costs = [1i64, 4, 2, 3];
    let cost: i64 = flows.iter().zip(costs.iter()).map(|(f, c)| f * c).sum();
    assert_eq!(cost, 15);

    // flow conservation against the supplies
    let arcs = [(0usize, 2usize), (0, 3), (1, 2), (1, 3)];
    let mut balance = vec![0i64; 4];
    for (i, &(a, b)) in arcs.iter().enumerate() {
        assert!(flows[i] >= 0);
        balance[a] += flows[i];
        balance[b] -= flows[i];
    }
    assert_eq!(balance, vec![3, 2, -1, -4]);

    // dual certificate
    for (i, &(a, b)) in arcs.iter().enumerate() {
        let rc = costs[i] + potentials[a] - potentials[b];
        if flows[i] > 0 {
            assert_eq!(rc, 0);
        } else {
            assert!(rc >= 0);
        }
    }
}

#[test]
fn two_source_two_sink_float() {
    let mut graph = DiGraph::<f64, f64>::new();
    let n0 = graph.add_node(3.0);
    let n1 = graph.add_node(2.0);
    let n2 = graph.add_node(-1.0);
    let n3 = graph.add_node(-4.0);
    graph.add_edge(n0, n2, 1.0);
    graph.add_edge(n0, n3, 4.0);
    graph.add_edge(n1, n2, 2.0);
    graph.add_edge(n1, n3, 3.0);

    let (status, flows, potentials) = min_cost(&graph, PivotRule::BlockSearch, 1);
    assert_eq!(status, Status::Optimal);

    let costs = [1.0f64, 4.0, 2.0, 3.0];
    let cost: f64 = flows.iter().zip(costs.iter()).map(|(f, c)| f * c).sum();
    assert!((cost - 15.0).abs() < 1e-6);

    let arcs = [(0usize, 2usize), (0, 3), (1, 2), (1, 3)];
    for (i, &(a, b)) in arcs.iter().enumerate() {
        let rc = costs[i] + potentials[a] - potentials[b];
        assert!(rc >= -1e-6);
        if flows[i] > 1e-9 {
            assert!(rc.abs() < 1e-6);
        }
    }
}

#[test]
fn infeasible_without_real_arcs() {
    let mut solver = NetSimplex::<i64>::new(InitMode::Full, 2, 0);
    solver.set_verbosity(Verbosity::Silent);
    solver.add_node(0, 1);
    solver.add_node(1, -1);

    assert_eq!(solver.run(PivotRule::BlockSearch), Status::Infeasible);
    assert_eq!(solver.check_feasibility(), Status::Infeasible);
    // the artificial arc of node 0 keeps carrying its unit of supply
    assert_eq!(solver.dummy_flow(0), 1);
    assert_eq!(solver.dummy_flow(1), 1);
    assert_eq!(solver.total_cost(), 0);
}

#[test]
fn degenerate_cycle_stays_at_zero() {
    let mut solver = NetSimplex::<i64>::new(InitMode::Full, 4, 4);
    solver.set_verbosity(Verbosity::Silent);
    for u in 0..4 {
        solver.add_node(u, 0);
    }
    solver.add_arc(0, 1, 1);
    solver.add_arc(1, 2, 1);
    solver.add_arc(2, 3, 1);
    solver.add_arc(3, 0, 1);

    assert_eq!(solver.run(PivotRule::BlockSearch), Status::Optimal);
    assert_eq!(solver.total_cost(), 0);
    assert_eq!(solver.iterations(), 0);
    for idx in 0..4 {
        assert_eq!(solver.flow(idx), 0);
    }
}

#[test]
fn large_random_instance_certifies_optimal() {
    let n = 500usize;
    let m = 2500usize;
    let mut rng = StdRng::seed_from_u64(42);

    let mut supply = vec![0i64; n];
    for i in 0..n / 2 {
        let s = rng.gen_range(1..20);
        supply[i] += s;
        supply[n - 1 - i] -= s;
    }

    // a two-way chain keeps the instance connected and feasible, random
    // cheap arcs fill in the rest
    let mut arcs: Vec<(usize, usize, i64)> = Vec::new();
    for u in 0..n - 1 {
        arcs.push((u, u + 1, 100));
        arcs.push((u + 1, u, 100));
    }
    while arcs.len() < m {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            arcs.push((a, b, rng.gen_range(1..=100)));
        }
    }

    let mut solver = NetSimplex::<i64>::new(InitMode::Full, n, arcs.len());
    solver.set_verbosity(Verbosity::Silent);
    for (i, &s) in supply.iter().enumerate() {
        solver.add_node(i, s);
    }
    for &(a, b, c) in &arcs {
        solver.add_arc(a, b, c);
    }

    assert_eq!(solver.run(PivotRule::BlockSearch), Status::Optimal);
    assert!(solver.basis_coherent());
    assert!(solver.iterations() <= (n * arcs.len()) as u64);

    let mut balance = vec![0i64; n];
    for (i, &(a, b, _)) in arcs.iter().enumerate() {
        let f = solver.flow(i);
        assert!(f >= 0);
        balance[a] += f;
        balance[b] -= f;
    }
    assert_eq!(balance, supply);

    for (i, &(a, b, c)) in arcs.iter().enumerate() {
        let rc = c + solver.potential(a) - solver.potential(b);
        if solver.flow(i) > 0 {
            assert_eq!(rc, 0);
        } else {
            assert!(rc >= 0);
        }
    }

    let recomputed: i64 = arcs
        .iter()
        .enumerate()
        .map(|(i, &(_, _, c))| solver.flow(i) * c)
        .sum();
    assert_eq!(recomputed, solver.total_cost());
}

#[test]
fn parallel_flow_update_matches_sequential() {
    let n = 60usize;
    let mut rng = StdRng::seed_from_u64(7);

    let mut graph = DiGraph::<i64, i64>::new();
    for i in 0..n {
        let b = if i == 0 {
            25
        } else if i == n - 1 {
            -25
        } else {
            0
        };
        graph.add_node(b);
    }
    for u in 0..n - 1 {
        graph.add_edge(NodeIndex::new(u), NodeIndex::new(u + 1), rng.gen_range(1..50));
    }
    for _ in 0..3 * n {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a != b {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), rng.gen_range(1..50));
        }
    }

    let (st1, flows1, _) = min_cost(&graph, PivotRule::BlockSearch, 1);
    let (st2, flows2, _) = min_cost(&graph, PivotRule::BlockSearch, 2);
    assert_eq!(st1, Status::Optimal);
    assert_eq!(st2, Status::Optimal);
    assert_eq!(flows1, flows2);
}
