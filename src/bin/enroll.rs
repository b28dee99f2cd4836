//! Dataset enrollment binary for Smart Sign Trainer
//!
//! Merges labeled feature captures into the trained example store.
//! Usage: cargo run --bin enroll -- --captures captures/ --data-dir data

use clap::Parser;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// Feature row length the app trains and predicts with.
const FEATURE_DIM: usize = 63;

#[derive(Parser, Debug)]
#[command(name = "Smart Sign Trainer - Dataset Enrollment")]
#[command(about = "Merge labeled feature captures into the trained example store")]
struct Args {
    /// Directory of capture files, one <label>.json per sign
    #[arg(short, long)]
    captures: String,

    /// Data directory holding the example store
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    /// Replace stored examples instead of appending
    #[arg(long)]
    replace: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Example matrix record, matching what the app stores per label
#[derive(serde::Serialize, serde::Deserialize)]
struct StoredTensor {
    data: Vec<f32>,
    /// (example rows, feature columns)
    shape: (usize, usize),
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    println!("🤟 Smart Sign Trainer - Dataset Enrollment");
    println!("==========================================\n");

    // Scan capture files: one JSON array of feature rows per label
    println!("📚 Scanning captures in: {}", args.captures);
    let mut captures: Vec<(String, Vec<Vec<f32>>)> = Vec::new();
    for entry in fs::read_dir(&args.captures)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let label = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => continue,
        };

        let content = fs::read_to_string(&path)?;
        let rows: Vec<Vec<f32>> = match serde_json::from_str(&content) {
            Ok(rows) => rows,
            Err(e) => {
                eprintln!("⚠️  Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let total = rows.len();
        let kept: Vec<Vec<f32>> = rows
            .into_iter()
            .filter(|row| row.len() == FEATURE_DIM)
            .collect();
        if kept.len() < total {
            eprintln!(
                "⚠️  {}: dropped {} rows with the wrong length",
                label,
                total - kept.len()
            );
        }
        if args.verbose {
            println!("   {}: {} usable rows", label, kept.len());
        }
        captures.push((label, kept));
    }
    captures.sort_by(|a, b| a.0.cmp(&b.0));

    let usable: usize = captures.iter().map(|(_, rows)| rows.len()).sum();
    println!("   Found {} labels, {} usable rows", captures.len(), usable);
    if usable == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("no usable feature rows in {}", args.captures),
        ));
    }

    // Load the existing store record unless replacing
    let store_path = Path::new(&args.data_dir).join("knn_dataset.json");
    let mut dataset: FxHashMap<String, StoredTensor> = if args.replace {
        println!("\n🧹 Replacing the stored examples");
        FxHashMap::default()
    } else {
        match fs::read_to_string(&store_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => FxHashMap::default(),
        }
    };

    // Merge rows label by label
    println!("\n🧠 Merging examples...");
    for (label, rows) in &captures {
        if rows.is_empty() {
            continue;
        }
        let entry = dataset.entry(label.clone()).or_insert_with(|| StoredTensor {
            data: Vec::new(),
            shape: (0, FEATURE_DIM),
        });
        // A stale record with the wrong width cannot be appended to
        if entry.shape.1 != FEATURE_DIM {
            *entry = StoredTensor {
                data: Vec::new(),
                shape: (0, FEATURE_DIM),
            };
        }
        for row in rows {
            entry.data.extend_from_slice(row);
            entry.shape.0 += 1;
        }
        println!("   {}: +{} rows ({} total)", label, rows.len(), entry.shape.0);
    }

    // Write back in the exact record schema the app reads
    fs::create_dir_all(&args.data_dir)?;
    let serialized = serde_json::to_string_pretty(&dataset)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    fs::write(&store_path, serialized)?;

    println!("\n✅ Enrollment complete!");
    println!(
        "📊 Summary:\n   - Labels: {}\n   - Store: {}",
        dataset.len(),
        store_path.display()
    );

    Ok(())
}
