//! History Export
//!
//! This example records a run on boolean chromosomes, streams every
//! generation to a JSON-lines log, then saves the in-memory history as JSON,
//! binary and a readable text dump and loads it back.

use std::fs::File;
use std::io::BufWriter;

use evo_min::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== History Export ===\n");

    let mut rng = StdRng::seed_from_u64(3);
    let dir = std::env::temp_dir().join("evo-min-history");
    std::fs::create_dir_all(&dir)?;

    let log = BufWriter::new(File::create(dir.join("generations.jsonl"))?);

    let mut engine = Engine::builder()
        .bounds_table(&[[0.0, 1.0]; 12], "bool")
        .fitness(CountOnes)
        .stop_fitness(0)
        .population_size(20)
        .max_iterations(60)
        .recorder(JsonLinesRecorder::new(log))
        .build()?;

    let summary = engine.run_with_rng(&mut rng)?;
    println!("Run finished after {} iterations: {}", summary.iterations, summary.best);

    let history = engine.history();

    let json_path = dir.join("history.json");
    history.save(&json_path, HistoryFormat::Json)?;
    let bin_path = dir.join("history.bin");
    history.save(&bin_path, HistoryFormat::Binary)?;
    let text_path = dir.join("history.txt");
    history.export_text(&text_path)?;

    let from_json = History::<usize>::load(&json_path)?;
    let from_bin = History::<usize>::load(&bin_path)?;

    println!("\nSaved to {}", dir.display());
    println!("  Generations (json):   {}", from_json.len());
    println!("  Generations (binary): {}", from_bin.len());
    println!("  Genomes evaluated:    {}", from_bin.fitness_entries().len());
    println!(
        "  JSON size: {} bytes, binary size: {} bytes",
        std::fs::metadata(&json_path)?.len(),
        std::fs::metadata(&bin_path)?.len()
    );

    println!("\nBest fitness per generation:");
    for (i, best) in from_json.best().iter().enumerate() {
        println!("  {:>3}: {}", i + 1, best);
    }

    Ok(())
}
