use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fin_data::{ShuffleOptions, StoreError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

/// Tooling for fin training-data files: inspect, convert, combine, shuffle.
#[derive(Parser)]
#[command(name = "fin-tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the record count of each file.
    Counts {
        /// Files to read.
        files: Vec<PathBuf>,
    },
    /// Convert text records ({fen} {wdl} {score} lines) into a fin file.
    Convert {
        /// Output file name.
        #[arg(short, long)]
        output: PathBuf,
        /// Files to convert.
        files: Vec<PathBuf>,
    },
    /// Combine many fin files into one. Refuses to overwrite the output.
    Combine {
        /// Output file name.
        #[arg(short, long)]
        output: PathBuf,
        /// Files to combine.
        files: Vec<PathBuf>,
    },
    /// Shuffle fin files together.
    Shuffle {
        /// Output file name.
        #[arg(short, long)]
        output: PathBuf,
        /// Temporary directory for bucket files during shuffling.
        #[arg(short, long, default_value = "/tmp")]
        tmp: PathBuf,
        /// Fixed bucket count (default: derived from the corpus size).
        #[arg(short, long)]
        buckets: Option<u64>,
        /// Files to shuffle.
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Counts { files } => {
            for file in &files {
                match fin_data::inspect(file) {
                    Ok(count) => println!("{}: {count}", file.display()),
                    Err(e @ (StoreError::NotFound { .. } | StoreError::NotAFile { .. })) => {
                        warn!("{e}, skipping");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Command::Convert { output, files } => {
            let report = fin_data::convert(&files, &output)?;
            println!(
                "converted {} file(s) into {} ({} records, {} bad lines)",
                report.files_read,
                output.display(),
                report.records,
                report.bad_lines
            );
        }
        Command::Combine { output, files } => {
            let report = fin_data::combine(&files, &output)?;
            println!(
                "combined {} file(s) into {} ({} records)",
                report.files_read,
                output.display(),
                report.records
            );
        }
        Command::Shuffle {
            output,
            tmp,
            buckets,
            files,
        } => {
            let options = ShuffleOptions {
                bucket_count: buckets,
                ..ShuffleOptions::default()
            };
            // Fresh entropy per run; repeated runs give different orders.
            let mut rng = StdRng::from_entropy();
            let report = fin_data::shuffle(&files, &tmp, &output, &options, &mut rng)?;
            println!(
                "shuffled {} file(s) into {} ({} records, {} buckets)",
                report.files_read,
                output.display(),
                report.records,
                report.buckets
            );
        }
    }

    Ok(())
}
