use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use snapshot_reader::snapshot::utils;
use snapshot_reader::{
    Fragment, ParseOptions, Result, SnapshotError, SnapshotReader, SnapshotWriter, Tally,
    pack_directory,
};

#[derive(Parser)]
#[command(name = "snapshot")]
#[command(about = "Inspect, verify, extract and pack concatenated source snapshots", long_about = None)]
struct Cli {
    /// Keep content before the first header and conflicting duplicate paths
    #[arg(long, global = true)]
    lenient: bool,

    /// Encoding of paths in header lines (any ASCII-compatible label)
    #[arg(long, global = true, default_value = "utf-8")]
    encoding: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List fragments with their line and byte counts
    ///
    /// Streams the snapshot with --lenient; otherwise loads it whole so
    /// orphan content and conflicting duplicates are rejected first.
    List {
        snapshot: PathBuf,

        /// Also print Adler-32 and RIPEMD-128 of each fragment
        #[arg(long)]
        digest: bool,
    },
    /// Write fragments out as files
    Extract {
        snapshot: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Only extract these paths
        #[arg(long)]
        only: Vec<String>,
    },
    /// Pack a directory into a snapshot
    Pack {
        dir: PathBuf,

        /// Output snapshot file
        #[arg(short, long)]
        output: PathBuf,

        /// Include files and directories whose names start with '.'
        #[arg(long)]
        hidden: bool,
    },
    /// Check header uniqueness, round-tripping and line totals
    Verify {
        snapshot: PathBuf,

        /// Expected total line count across all fragments
        #[arg(long)]
        expect_lines: Option<u64>,
    },
    /// Show the license family and copyright holders of each fragment
    Licenses { snapshot: PathBuf },
    /// Summarise fragments by extension, license and path group
    Stats {
        snapshot: PathBuf,

        /// Number of leading path components used for grouping
        #[arg(long, default_value_t = 2)]
        depth: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

/// Runs one subcommand; `Ok(false)` means verification failed.
fn run(cli: Cli) -> Result<bool> {
    let options = ParseOptions {
        strict: !cli.lenient,
        encoding: utils::parse_encoding(&cli.encoding)?,
    };

    match cli.command {
        Command::List { snapshot, digest } => {
            if options.strict {
                // Strict checks need the whole stream before anything is printed.
                let reader = SnapshotReader::open(&snapshot, options)?;
                for fragment in reader.iter() {
                    print_fragment(fragment, digest);
                }
            } else {
                for fragment in SnapshotReader::stream(&snapshot, options)? {
                    print_fragment(&fragment?, digest);
                }
            }
        }
        Command::Extract { snapshot, output, only } => {
            let reader = SnapshotReader::open(&snapshot, options)?;
            let written = reader.extract_to(&output, &only)?;
            println!("Extracted {} files to {}", written, output.display());
        }
        Command::Pack { dir, output, hidden } => {
            let mut writer = SnapshotWriter::new(BufWriter::new(File::create(&output)?));
            pack_directory(&dir, &mut writer, hidden, Some(output.as_path()))?;
            let (_, count) = writer.finish()?;
            println!("Packed {} files into {}", count, output.display());
        }
        Command::Verify { snapshot, expect_lines } => {
            let reader = SnapshotReader::open(&snapshot, options)?;
            let report = reader.verify(expect_lines);

            println!("Fragments:   {}", report.fragments);
            println!("Total lines: {}", report.total_lines);
            println!("Round trip:  {}", if report.roundtrip_ok { "ok" } else { "FAILED" });
            if report.preamble_bytes > 0 {
                println!("Preamble:    {} bytes before the first header", report.preamble_bytes);
            }
            for path in &report.identical_duplicates {
                println!("Duplicate:   {} (identical content)", path);
            }
            for path in &report.conflicts {
                println!("Conflict:    {}", path);
            }
            if let Some(expected) = report.expected_lines
                && expected != report.total_lines
            {
                eprintln!(
                    "ERROR: {}",
                    SnapshotError::LineCountMismatch {
                        expected,
                        found: report.total_lines,
                    }
                );
            }
            return Ok(report.is_ok());
        }
        Command::Licenses { snapshot } => {
            let reader = SnapshotReader::open(&snapshot, options)?;
            for (path, header) in reader.licenses() {
                println!("{}\t{}\t{}", path, header.license, header.holders().join("; "));
            }
        }
        Command::Stats { snapshot, depth } => {
            let reader = SnapshotReader::open(&snapshot, options)?;
            let stats = reader.stats(depth);
            println!(
                "Total: {} files, {} lines",
                stats.total.fragments, stats.total.lines
            );
            println!("\nBy extension:");
            for (key, tally) in &stats.by_extension {
                print_tally("  ", key, tally);
            }
            println!("\nBy license:");
            for (key, tally) in &stats.by_license {
                print_tally("  ", key, tally);
            }
            println!("\nBy path (depth {}):", depth);
            for (key, tally) in &stats.by_group {
                print_tally("  ", key, tally);
            }
        }
    }
    Ok(true)
}

fn print_fragment(fragment: &Fragment, digest: bool) {
    if digest {
        println!(
            "{}\t{}\t{}\t{:08x}\t{}",
            fragment.path(),
            fragment.line_count(),
            fragment.content().len(),
            utils::checksum(fragment.content()),
            utils::digest_hex(fragment.content())
        );
    } else {
        println!(
            "{}\t{}\t{}",
            fragment.path(),
            fragment.line_count(),
            fragment.content().len()
        );
    }
}

fn print_tally(prefix: &str, key: &str, tally: &Tally) {
    println!("{}{:<40} {:>6} files {:>9} lines", prefix, key, tally.fragments, tally.lines);
}
