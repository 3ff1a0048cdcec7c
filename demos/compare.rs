use std::thread;
use std::time::{Duration, Instant};

use grid_routing::{Adjacency, Algorithm, Grid, Visualizer, VisualizerConfig};

// Replays Dijkstra and A* side by side on the grid
//  __________
// |..........|
// |..#####...|
// |S...#....G|
// |....#.....|
// |..........|
//  __________
// where
// - # marks a wall
// - S marks the start
// - G marks the goal
//
// Cells have a 4-neighborhood. Run with RUST_LOG=info to see what the engine logs.

const LAYOUT: &str = "\
..........
..#####...
S...#....G
....#.....
..........
";

fn print_lanes(vis: &Visualizer) {
    let dijkstra = vis.render_lane(Algorithm::Dijkstra);
    let astar = vis.render_lane(Algorithm::Astar);
    for (left, right) in dijkstra.lines().zip(astar.lines()) {
        println!("{:<48} {}", left, right);
    }
    println!();
}

fn main() {
    env_logger::init();
    let grid = Grid::parse(LAYOUT, Adjacency::Four).unwrap();
    let mut vis = Visualizer::with_grid(VisualizerConfig::default(), grid);
    vis.set_interval(Algorithm::Astar, Duration::from_millis(40));
    vis.run(Instant::now()).unwrap();
    let frame = Duration::from_millis(16);
    let mut shown = 0;
    while vis.is_playing() {
        if vis.tick(Instant::now()) {
            shown += 1;
            if shown % 10 == 0 {
                print_lanes(&vis);
            }
        }
        thread::sleep(frame);
    }
    print_lanes(&vis);
}
