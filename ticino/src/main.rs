use std::time::SystemTime;
use ticino::{min_cost, PivotRule};

use crate::parser::parsed_graph;
mod parser;

fn main() {
    let graph = parsed_graph::<i64>();

    println!(
        "node nb = {:?}, edge nb = {:?}",
        graph.node_count(),
        graph.edge_count()
    );

    let start = SystemTime::now();
    let (status, flows, _potentials) = min_cost(&graph, PivotRule::BlockSearch, 1);
    match start.elapsed() {
        Ok(elapsed) => {
            println!("time = {:?}", (elapsed.as_millis() as f64 / 1000f64) as f64);
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
}
