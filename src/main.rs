//! Grid Prospector CLI - Search a digit grid for the best connected grouping.

use std::fs;
use std::path::PathBuf;

use grid_prospector::{
    render::render_grouping,
    schema::{GridSpec, SearchConfig},
    search::{GridGraph, SearchEngine},
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    // Grid source: a file of digit rows, or --random WxH.
    let (spec, config_arg) = if args[1] == "--random" {
        let dims = args.get(2).unwrap_or_else(|| {
            eprintln!("--random requires dimensions, e.g. --random 50x20");
            std::process::exit(1);
        });
        let spec = random_spec(dims);
        (spec, args.get(3))
    } else {
        let grid_path = PathBuf::from(&args[1]);
        let grid_str = fs::read_to_string(&grid_path).unwrap_or_else(|e| {
            eprintln!("Error reading grid file: {}", e);
            std::process::exit(1);
        });
        let spec: GridSpec = grid_str.parse().unwrap_or_else(|e| {
            eprintln!("Error parsing grid: {}", e);
            std::process::exit(1);
        });
        (spec, args.get(2))
    };

    let config: SearchConfig = match config_arg {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => SearchConfig::default(),
    };

    println!("Grid Prospector");
    println!("===============");
    println!("Grid: {}x{}", spec.width(), spec.height());
    println!(
        "Grouping size: {}  population: {}  adjacency: {}",
        config.grouping_size,
        config.population_size,
        if config.diagonals {
            "8-connected"
        } else {
            "4-connected"
        }
    );
    println!();

    let graph = GridGraph::from_spec(&spec, config.diagonals);
    // The engine owns the graph; keep a copy for progress rendering.
    let render_graph = graph.clone();
    let report_count = config.report_count;

    let mut engine = SearchEngine::new(config, graph).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let result = engine
        .run_with_callback(|progress, population| {
            println!(
                "generation: {}  top fitness: {}  lowest pass: {}",
                progress.generation, progress.top_fitness, progress.cutoff_fitness
            );
            println!("{}", render_grouping(&render_graph, population.best()));
        })
        .unwrap_or_else(|e| {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        });

    println!(
        "Converged after {} generations ({:.2}s), top {} groupings:",
        result.stats.generations,
        result.stats.elapsed_seconds,
        report_count.min(result.top.len())
    );
    for grouping in &result.top {
        println!("grouping {} {:?}", grouping.fitness, grouping.members);
    }
}

fn random_spec(dims: &str) -> GridSpec {
    let (width, height) = dims
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .unwrap_or_else(|| {
            eprintln!("Invalid dimensions '{}', expected WIDTHxHEIGHT", dims);
            std::process::exit(1);
        });

    GridSpec::random(width, height, &mut rand::thread_rng()).unwrap_or_else(|e| {
        eprintln!("Error generating grid: {}", e);
        std::process::exit(1);
    })
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <grid.txt> [config.json]", program);
    eprintln!("       {} --random WxH [config.json]", program);
    eprintln!();
    eprintln!("Search a digit grid for the maximal-product connected grouping.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  grid.txt     Rectangular block of ASCII digit rows");
    eprintln!("  --random WxH Generate a uniformly random WxH digit grid");
    eprintln!("  config.json  Search configuration (defaults apply per field)");
    eprintln!();
    eprintln!("Example configuration is printed with --example.");
}

fn print_example_config() {
    let config = SearchConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
