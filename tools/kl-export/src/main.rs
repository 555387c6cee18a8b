//! kl-export - segment Karhunen-Loeve mode export tool
//!
//! Converts the segment mode archive (`segKLmat.npz`) to per-unit bincode
//! data files (M2S1.bin .. M2S7.bin) read by the error budget simulation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kl_common::{Asm, KarhunenLoeve};
use std::path::PathBuf;

use kl_export::{archive::ModeArchive, export};

#[derive(Parser)]
#[command(name = "kl-export")]
#[command(about = "Segment Karhunen-Loeve mode export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every unit of the mode archive to bincode data files
    Export {
        /// Path to the mode archive
        #[arg(default_value = export::DEFAULT_ARCHIVE)]
        archive: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Write bare records instead of unit-tagged ones
        #[arg(long)]
        plain: bool,

        /// Expected number of modes per unit (errors if the archive disagrees)
        #[arg(long)]
        n_mode: Option<usize>,
    },

    /// Validate the mode archive without writing anything
    Check {
        /// Path to the mode archive
        #[arg(default_value = export::DEFAULT_ARCHIVE)]
        archive: PathBuf,
    },

    /// Decode an exported data file and print the record dimensions
    Inspect {
        /// Path to a .bin data file
        input: PathBuf,

        /// Decode a bare record instead of a unit-tagged one
        #[arg(long)]
        plain: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            archive,
            output,
            plain,
            n_mode,
        } => {
            tracing::info!("Exporting {:?} -> {:?}", archive, output);
            let paths = export::export_archive(&archive, &output, n_mode, !plain)?;
            tracing::info!("Exported {} units", paths.len());
        }

        Commands::Check { archive } => {
            tracing::info!("Checking {:?}", archive);
            let arch = ModeArchive::open(&archive)?;
            println!("units:  {}", arch.n_unit());
            println!("points: {}", arch.n_point());
            println!("modes:  {}", arch.n_mode());
            for sid in 1..=arch.n_unit() {
                let record = arch.record(sid)?;
                println!(
                    "unit {sid}: {} of {} points in mask",
                    record.n_in_mask(),
                    record.n_point()
                );
            }
            tracing::info!("Archive is valid!");
        }

        Commands::Inspect { input, plain } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let record = if plain {
                KarhunenLoeve::decode(&bytes)?
            } else {
                let asm = Asm::decode(&bytes)?;
                println!("unit:   {}", asm.tag());
                asm.into_segment()
            };
            println!("modes:  {}", record.n_mode);
            println!("points: {}", record.n_point());
            println!("mask:   {} of {} points active", record.n_in_mask(), record.mask.len());
        }
    }

    Ok(())
}
