use petgraph::dot::Dot;
use petgraph::graph::*;
use std::time::SystemTime;
use ticino::{min_cost, PivotRule};

fn main() {
    let mut graph = DiGraph::<i64, i64>::new();
    let n0 = graph.add_node(8);
    let n1 = graph.add_node(0);
    let n2 = graph.add_node(0);
    let n3 = graph.add_node(0);
    let n4 = graph.add_node(0);
    let n5 = graph.add_node(-8);
    graph.add_edge(n0, n1, 1);
    graph.add_edge(n0, n3, 2);
    graph.add_edge(n1, n2, 1);
    graph.add_edge(n1, n4, 3);
    graph.add_edge(n3, n2, 2);
    graph.add_edge(n3, n4, 1);
    graph.add_edge(n2, n5, 1);
    graph.add_edge(n4, n5, 2);

    let start = SystemTime::now();
    let (status, flows, potentials) = min_cost(&graph, PivotRule::BlockSearch, 1);
    match start.elapsed() {
        Ok(elapsed) => {
            println!("time = {}", elapsed.as_micros());
        }
        Err(e) => {
            println!("Error: {e:?}");
        }
    }

    let cost: i64 = flows
        .iter()
        .zip(graph.edge_references())
        .map(|(f, e)| f * e.weight())
        .sum();
    println!("status = {:?}, cost = {:?}", status, cost);
    println!("flows = {:?}", flows);
    println!("potentials = {:?}", potentials);
    println!("{:?}", Dot::new(&graph));
}
