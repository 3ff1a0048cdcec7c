use grid_routing::network::RoadNetwork;

// Routes across a small street network stored as node-link JSON. Weights are in the same unit
// as the coordinates, so A* can use the straight-line distance scaled by the cheapest road.

const NETWORK: &str = include_str!("data/network.json");

fn main() {
    env_logger::init();
    let mut network = RoadNetwork::from_json(NETWORK).unwrap();
    println!(
        "{} junctions, {} directed roads",
        network.node_count(),
        network.edge_count()
    );
    for (from, to) in [("w1", "e2"), ("n1", "s2")] {
        for run in [
            network.dijkstra(from, to).unwrap(),
            network.astar(from, to).unwrap(),
        ] {
            match run.path.cost() {
                Some(cost) => println!(
                    "{}: {} -> {} costs {:.1} via {}, {} junctions explored",
                    run.algorithm,
                    from,
                    to,
                    cost as f64 / 10.0,
                    network.labels(run.path.nodes()).join(" > "),
                    run.explored()
                ),
                None => println!("{}: no route from {} to {}", run.algorithm, from, to),
            }
        }
    }

    // Drop the western districts, keeping everything at least as far east as the central square
    network.retain_from_min_x(&["c"]).unwrap();
    println!(
        "After trimming: {} junctions, {} directed roads",
        network.node_count(),
        network.edge_count()
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&network.to_document()).unwrap()
    );
}
