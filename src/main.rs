use log::info;
use symmetry_plane::config::load_config;
use symmetry_plane::diagnostics::{PipelineTiming, SearchReport};
use symmetry_plane::search::{EvaluationRecord, ExhaustiveSearch};
use symmetry_plane::volume::io::{load_volume, save_volume, write_json_file, write_trace_csv};
use symmetry_plane::SymmetryMetric;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let mut timing = PipelineTiming::default();

    let input = timing.measure("load", || load_volume(&config.input))?;
    info!("loaded {} ({:?})", config.input.display(), input.dims());

    let working = config
        .preprocess
        .apply_timed(&input, &mut timing)
        .map_err(|e| format!("Failed to prepare working volume: {e}"))?;
    info!("working volume {:?}", working.dims());

    let search = ExhaustiveSearch::new(config.search.clone());
    let initial_score = timing.measure("initial", || {
        search.metric().evaluate(&working, &config.initial)
    });

    let mut trace: Vec<EvaluationRecord> = Vec::new();
    let result = timing
        .measure("search", || {
            search.search(&working, config.initial, initial_score, Some(&mut trace))
        })
        .map_err(|e| e.to_string())?;

    println!(
        "Optimize parameters by exhaustive search: {}",
        result.best.params
    );
    println!(
        "Optimize metric value by exhaustive search: {}",
        result.best.score
    );
    println!(
        "  evaluated {} candidates ({} degenerate) in {:.1} ms",
        result.evaluations, result.degenerate, result.latency_ms
    );

    if let Some(path) = &config.output.trace_csv {
        write_trace_csv(path, &trace)?;
        println!("Trace written to {}", path.display());
    }
    if let Some(path) = &config.output.working_volume {
        save_volume(path, &working)?;
        println!("Working volume written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        let report = SearchReport::new(&working, &result, timing);
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: symmetry_search <config.json>".to_string()
}
