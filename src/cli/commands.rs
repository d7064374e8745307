use crate::config::StoreConfig;
use crate::domain::error::ClipError;
use crate::ClipStore;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipstore", about = "Keyed CLIP feature store with cosine top-K matching")]
pub struct Cli {
    /// Feature database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Storage backend: memory, snapshot or sqlite
    #[arg(long, global = true)]
    pub backend: Option<String>,
    /// Embedding dimension
    #[arg(long, global = true)]
    pub dimension: Option<usize>,
    /// Device: host or accelerator
    #[arg(long, global = true)]
    pub device: Option<String>,
    /// Accelerator card index
    #[arg(long, global = true)]
    pub device_id: Option<u8>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List execution devices with memory and load figures
    Devices,
    /// Add a feature vector under a key
    Add {
        key: String,
        /// JSON array of floats
        vector: String,
        /// Replace the vector if the key exists
        #[arg(long)]
        overwrite: bool,
    },
    /// Remove a key
    Remove { key: String },
    /// Check whether a key is stored
    Contains { key: String },
    /// Print the stored vector of a key
    Get { key: String },
    /// Rank stored features against a query vector
    Match {
        /// JSON array of floats
        vector: String,
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        top_k: i64,
    },
    /// List keys in insertion order
    List,
    /// Show store statistics
    Stats,
    /// Export every entry as JSON
    Export,
}

/// Signed CLI input to a positive `top_k`.
pub fn parse_top_k(top_k: i64) -> Result<usize, ClipError> {
    usize::try_from(top_k)
        .ok()
        .filter(|k| *k > 0)
        .ok_or_else(|| ClipError::InvalidArgument(format!("top_k must be positive, got {top_k}")))
}

pub fn parse_vector(json: &str) -> Result<Vec<f32>, ClipError> {
    serde_json::from_str(json).map_err(|e| ClipError::InvalidArgument(format!("vector must be a JSON array of numbers: {e}")))
}

/// Runs a store command, writing its output to `out`. `Devices` needs no store
/// and is handled by the binary before a session opens.
pub fn run_command(
    store: &ClipStore,
    config: &StoreConfig,
    cmd: Commands,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Devices => {
            return Err(ClipError::InvalidArgument("devices does not operate on a store".into()).into());
        }
        Commands::Add { key, vector, overwrite } => {
            let vector = parse_vector(&vector)?;
            let added = if overwrite {
                store.upsert_feature(&key, vector)?
            } else {
                store.add_feature(&key, vector)?
            };
            if added {
                writeln!(out, "Added {key}")?;
            } else if overwrite {
                writeln!(out, "Replaced {key}")?;
            } else {
                writeln!(out, "{key} already exists, skipped")?;
            }
        }
        Commands::Remove { key } => {
            if store.remove(&key)? {
                writeln!(out, "Removed {key}")?;
            } else {
                writeln!(out, "{key} not found")?;
            }
        }
        Commands::Contains { key } => {
            writeln!(out, "{}", store.contains(&key)?)?;
        }
        Commands::Get { key } => {
            let feature = store.feature_of(&key)?;
            writeln!(out, "{}", serde_json::to_string(&feature)?)?;
        }
        Commands::Match { vector, top_k } => {
            let top_k = parse_top_k(top_k)?;
            let vector = parse_vector(&vector)?;
            let results = store.match_feature(&vector, top_k)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
        }
        Commands::List => {
            for key in store.keys()? {
                writeln!(out, "{key}")?;
            }
        }
        Commands::Stats => {
            let stats = serde_json::json!({
                "entries": store.size()?,
                "dimension": store.dimension(),
                "backend": config.effective_backend().to_string(),
                "index": format!("{:?}", config.index).to_lowercase(),
                "model_family": config.model_family.to_string(),
                "db_path": config.db_path,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        }
        Commands::Export => {
            let entries = store.entries()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_must_be_positive() {
        assert_eq!(parse_top_k(5).unwrap(), 5);
        assert!(parse_top_k(0).unwrap_err().is_invalid_argument());
        assert!(parse_top_k(-3).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn vectors_parse_from_json() {
        assert_eq!(parse_vector("[1, 0.5, -2]").unwrap(), vec![1.0, 0.5, -2.0]);
        assert!(parse_vector("[1, \"x\"]").is_err());
    }

    #[test]
    fn cli_parses_match() {
        let cli = Cli::try_parse_from(["clipstore", "--db", "feat.db", "match", "[1,0]", "--top-k", "2"]).unwrap();
        match cli.command {
            Commands::Match { vector, top_k } => {
                assert_eq!(vector, "[1,0]");
                assert_eq!(top_k, 2);
            }
            _ => panic!("expected match"),
        }
        assert_eq!(cli.db.unwrap(), PathBuf::from("feat.db"));
    }
}
