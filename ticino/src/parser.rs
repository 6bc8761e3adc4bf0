use num_traits::identities::zero;
use num_traits::NumCast;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;
use std::env;
use std::fs;
use ticino::CloneableNum;

/// Read a DIMACS min-cost-flow file (path in argv[1]) into a digraph with
/// supplies as node weights and costs as edge weights. Lower bounds and
/// capacities on `a` lines are ignored, the solver is uncapacitated.
pub fn parsed_graph<NUM: CloneableNum>() -> DiGraph<NUM, NUM> {
    println!("starting parser...");
    let args: Vec<String> = env::args().collect();
    let file_path = &args[1];

    let contents = fs::read_to_string(file_path).expect("Should have been able to read the file");

    let mut graph = DiGraph::<NUM, NUM>::new();

    contents.lines().for_each(|x| {
        match x.chars().next() {
            Some('p') => {
                let line = x.split_whitespace().collect::<Vec<&str>>();
                let node_nb = line[2].parse::<usize>().unwrap();
                for _ in 0..node_nb {
                    graph.add_node(zero());
                }
            }
            Some('n') => {
                // DIMACS node ids are 1-based
                let line = x.split_whitespace().collect::<Vec<&str>>();
                let id = line[1].parse::<usize>().unwrap() - 1;
                let supply = line[2].parse::<i64>().unwrap();
                *graph.node_weight_mut(NodeIndex::new(id)).unwrap() =
                    NumCast::from(supply).unwrap();
            }
            Some('a') => {
                let line = x.split_whitespace().collect::<Vec<&str>>();
                let source = line[1].parse::<usize>().unwrap() - 1;
                let target = line[2].parse::<usize>().unwrap() - 1;
                let cost = line[5].parse::<i64>().unwrap();
                graph.add_edge(
                    NodeIndex::new(source),
                    NodeIndex::new(target),
                    NumCast::from(cost).unwrap(),
                );
            }
            _ => {}
        };
    });
    graph
}
