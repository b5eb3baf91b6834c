use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use quarry_tools::{format_hex, inspect_batch, pack_position, unpack_position, InspectReport};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "quarry-tools",
    version,
    about = "quarry protocol inspection tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect batch captures and list their packets.
    Inspect {
        /// Path to a batch capture, or a directory of captures.
        batch_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected captures.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected captures (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Pack or unpack block positions.
    Position {
        #[command(subcommand)]
        action: PositionAction,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum PositionAction {
    /// Pack x, y and z into a single value.
    Pack {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Unpack a packed value into coordinates.
    Unpack {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Serialize)]
struct CaptureReport {
    path: PathBuf,
    #[serde(flatten)]
    report: InspectReport,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            batch_path,
            glob,
            sort,
            limit,
            format,
        } => {
            let paths = if batch_path.is_dir() {
                let mut entries = collect_capture_entries(&batch_path, glob.as_deref(), sort)?;
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                entries.into_iter().map(|entry| entry.path).collect()
            } else {
                vec![batch_path]
            };

            let reports = paths
                .into_iter()
                .map(|path| inspect_capture(&path).map(|report| CaptureReport { path, report }))
                .collect::<Result<Vec<_>>>()?;

            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&reports).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => {
                    for capture in &reports {
                        println!(
                            "== {} ({} bytes) ==",
                            capture.path.display(),
                            capture.report.batch_len
                        );
                        print_inspect_report(&capture.report);
                    }
                }
            }
        }
        Command::Position { action, format } => {
            let report = match action {
                PositionAction::Pack { x, y, z } => pack_position(x, y, z),
                PositionAction::Unpack { value } => unpack_position(value),
            };
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => {
                    println!("position: ({}, {}, {})", report.x, report.y, report.z);
                    println!("packed: {} (0x{:016x})", report.packed, report.packed);
                    println!("varint: {}", format_hex(&report.varint_bytes));
                    if !report.representable {
                        println!("warning: coordinates out of range, packing truncates them");
                    }
                }
            }
        }
    }
    Ok(())
}

fn inspect_capture(path: &Path) -> Result<InspectReport> {
    let bytes = fs::read(path).with_context(|| format!("read batch {}", path.display()))?;
    inspect_batch(&bytes, &wire::Limits::default())
        .with_context(|| format!("decode batch {}", path.display()))
}

struct CaptureEntry {
    path: PathBuf,
    size: u64,
}

/// Lists the files in `dir` matching `glob`, by path or by size (largest first).
fn collect_capture_entries(
    dir: &Path,
    glob: Option<&str>,
    sort: Option<InspectSort>,
) -> Result<Vec<CaptureEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(CaptureEntry { path, size });
    }
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => entries.sort_by(|a, b| a.path.cmp(&b.path)),
    }
    Ok(entries)
}

fn print_inspect_report(report: &InspectReport) {
    println!(
        "packets: {} body: {} bytes framing: {} bytes",
        report.packets.len(),
        report.body_bytes(),
        report.framing_bytes()
    );
    for (index, packet) in report.packets.iter().enumerate() {
        println!(
            "  [{index}] id 0x{:02x}: {} bytes ({} body)",
            packet.id, packet.entry_len, packet.body_len
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.bin"), [0u8; 8]).unwrap();
        fs::write(dir.path().join("a.bin"), [0u8; 2]).unwrap();
        fs::write(dir.path().join("c.bin"), [0u8; 8]).unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        dir
    }

    fn names(entries: &[CaptureEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|entry| entry.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn entries_sorted_by_path_by_default() {
        let dir = capture_dir();
        let entries = collect_capture_entries(dir.path(), Some("*.bin"), None).unwrap();
        assert_eq!(names(&entries), ["a.bin", "b.bin", "c.bin"]);
    }

    #[test]
    fn size_sort_puts_largest_first_with_path_tiebreak() {
        let dir = capture_dir();
        let entries =
            collect_capture_entries(dir.path(), Some("*.bin"), Some(InspectSort::Size)).unwrap();
        assert_eq!(names(&entries), ["b.bin", "c.bin", "a.bin"]);
    }
}
