use rand::Rng;
use std::time::SystemTime;
use ticino::{ArcVar, InitMode, NetSimplex, PivotRule, Verbosity};

const NODE_NUMBER: usize = 1000;

// Column-generation style solve: start from the empty basis with a single
// expensive direct arc, then stream the cheap chain in batches and warm
// restart after each one.
fn main() {
    let mut rng = rand::thread_rng();

    let mut solver = NetSimplex::<i64>::new(InitMode::Empty, NODE_NUMBER, 0);
    solver.set_verbosity(Verbosity::Silent);
    solver.add_node(0, 1);
    solver.add_node(NODE_NUMBER - 1, -1);

    solver.update_arcs(&[ArcVar::new(0, NODE_NUMBER - 1, 10 * NODE_NUMBER as i64)]);
    let mut status = solver.run(PivotRule::BlockSearch);
    println!(
        "direct arc only: status = {:?}, cost = {:?}",
        status,
        solver.total_cost()
    );

    let start = SystemTime::now();
    let mut batch: Vec<ArcVar<i64>> = Vec::new();
    for u in 0..NODE_NUMBER - 1 {
        batch.push(ArcVar::new(u, u + 1, rng.gen_range(1..10)));
        if batch.len() == 100 || u == NODE_NUMBER - 2 {
            solver.update_arcs(&batch);
            batch.clear();
            status = solver.re_run(PivotRule::BlockSearch);
        }
    }
    match start.elapsed() {
        Ok(elapsed) => {
            println!("time = {}", elapsed.as_micros());
        }
        Err(e) => {
            println!("Error: {e:?}");
        }
    }
    println!(
        "status = {:?}, cost = {:?}, iterations = {:?}",
        status,
        solver.total_cost(),
        solver.iterations()
    );
}
