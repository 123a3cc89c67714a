//! Main entry point for the bsavfs CLI application.
//!
//! This binary mounts a base archive set plus optional data paths and lists
//! or extracts the entries visible through the overlay.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bsavfs::vfs::is_plain_name;
use bsavfs::{Cli, ListedEntry, SubStream, Vfs};

/// Application entry point.
///
/// Parses command-line arguments, builds the VFS and dispatches to listing
/// or extraction.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = cli.vfs_config();
    let vfs = Vfs::from_config(&config)
        .with_context(|| format!("Failed to initialize VFS at {}", config.base_path.display()))?;

    // List mode: display visible entries and exit
    if cli.list || cli.verbose {
        return list_entries(&vfs, cli.verbose);
    }

    for &id in &cli.arch_ids {
        let stream = vfs
            .open_architecture_by_id(id)?
            .with_context(|| format!("No architecture entry with id {id}"))?;
        extract_stream(stream, &format!("ARCH3D_{id}.bin"), &cli)?;
    }
    for &id in &cli.sound_ids {
        let stream = vfs
            .open_sound_by_id(id)?
            .with_context(|| format!("No sound entry with id {id}"))?;
        extract_stream(stream, &format!("SOUND_{id}.bin"), &cli)?;
    }
    if cli.ids_only() {
        return Ok(());
    }

    // Apply filters to determine which entries to extract:
    // 1. If specific names are requested, only include matching entries
    // 2. Exclude entries matching the exclusion patterns
    let entries = vfs.list()?;
    let selected: Vec<_> = entries
        .iter()
        .filter(|e| {
            if !cli.names.is_empty() && !cli.names.iter().any(|n| glob_match(n, &e.name)) {
                return false;
            }
            !cli
                .exclude
                .iter()
                .any(|x| e.name.contains(x.as_str()) || glob_match(x, &e.name))
        })
        .collect();

    if selected.is_empty() && !cli.names.is_empty() {
        bail!("No entries match {:?}", cli.names);
    }

    let multiple = cli.pipe && selected.len() > 1;
    for entry in selected {
        if multiple {
            io::stdout().write_all(format!("--- {} ---\n", entry.name).as_bytes())?;
        }
        let stream = vfs
            .open(&entry.name)?
            .with_context(|| format!("{} vanished from the overlay", entry.name))?;
        extract_stream(stream, &entry.name, &cli)?;
    }

    Ok(())
}

/// List entries visible through the overlay.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just names, one per line
/// - Verbose format (`-v`): Table with size, window and providing archive
///
/// # Arguments
///
/// * `vfs` - The initialized overlay
/// * `verbose` - If true, display detailed information in table format
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if a loose directory cannot be read.
fn list_entries(vfs: &Vfs, verbose: bool) -> Result<()> {
    let entries = vfs.list()?;

    if !verbose {
        for entry in &entries {
            println!("{}", entry.name);
        }
        return Ok(());
    }

    println!(
        "{:>10}  {:>10}  {:>10}  {:<12}  Source",
        "Length", "Start", "End", "Name"
    );
    println!("{}", "-".repeat(70));

    let mut total = 0u64;
    for entry in &entries {
        print_entry(entry);
        total += entry.size();
    }

    println!("{}", "-".repeat(70));
    println!(
        "{:>10}  {:>24}  {} entries ({})",
        total,
        "",
        entries.len(),
        format_size(total)
    );

    let (arch, sound) = (vfs.architecture(), vfs.sound());
    println!("{:>10}  ids in {}", arch.ids().count(), arch.path().display());
    println!("{:>10}  ids in {}", sound.ids().count(), sound.path().display());

    Ok(())
}

/// Print one row of the verbose listing.
fn print_entry(entry: &ListedEntry) {
    println!(
        "{:>10}  {:>10}  {:>10}  {:<12}  {}",
        entry.size(),
        entry.start,
        entry.end,
        entry.name,
        entry.source.display()
    );
}

/// Write one opened entry to stdout or to disk.
///
/// Handles pipe mode (`-p`), the output directory (`-d`) and the overwrite
/// options (`-n`, `-o`). Entry names that are not a plain file name are
/// skipped with a warning.
///
/// # Arguments
///
/// * `stream` - The opened entry
/// * `name` - Entry name, used as the output file name
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` on success or skip, or an error if writing fails.
fn extract_stream(mut stream: SubStream<File>, name: &str, cli: &Cli) -> Result<()> {
    if cli.pipe {
        let mut stdout = io::stdout().lock();
        io::copy(&mut stream, &mut stdout)?;
        return Ok(());
    }

    let Some(output_path) = output_path(cli.extract_dir.as_deref(), name) else {
        warn!(name, "Skipping entry with unsafe name");
        return Ok(());
    };

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {name} (file exists)");
            }
            return Ok(());
        }
        if !cli.overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {name} (use -o to overwrite)");
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  extracting: {name}");
    }

    write_file(&mut stream, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))
}

/// Resolve where an entry called `name` is written.
///
/// # Arguments
///
/// * `extract_dir` - Output directory from `-d`, or `None` for the current directory
/// * `name` - Entry name taken from the archive footer
///
/// # Returns
///
/// The output path, or `None` if `name` could escape the output directory
/// (absolute paths, `..`, separators).
fn output_path(extract_dir: Option<&Path>, name: &str) -> Option<PathBuf> {
    if !is_plain_name(name) {
        return None;
    }
    Some(match extract_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    })
}

/// Copy `reader` into a new file, creating parent directories as needed.
///
/// # Arguments
///
/// * `reader` - Source of the file contents
/// * `output_path` - Destination file, truncated if it exists
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the file cannot be written.
fn write_file<R: Read>(reader: &mut R, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(output_path)?;
    io::copy(reader, &mut file)?;
    Ok(())
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// A pattern without wildcards is an exact match.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            // Star matches zero or more characters
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
