use std::path::PathBuf;

use clap::Parser;

use crate::config::VfsConfig;

#[derive(Parser, Debug)]
#[command(name = "bsavfs")]
#[command(version)]
#[command(about = "List and extract entries from overlaid BSA archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  bsavfs ARENA2 -l                         list every visible name\n  \
  bsavfs ARENA2 -a mods -p 'MAP*'          print mod-aware MAP entries to stdout\n  \
  bsavfs ARENA2 --sound 12 -d out          extract sound 12 into out/")]
pub struct Cli {
    /// Directory holding the base archive set
    #[arg(value_name = "ROOT", env = "BSAVFS_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Entries to extract (default: all)
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// Extra archive or directory overriding earlier ones (repeatable)
    #[arg(short = 'a', long = "data-path", value_name = "PATH")]
    pub data_paths: Vec<PathBuf>,

    /// List visible names (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely, with sizes, offsets and sources
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract entries to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract entries into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Exclude entries that follow
    #[arg(short = 'x', value_name = "NAME", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Extract an architecture model by id (repeatable)
    #[arg(long = "arch", value_name = "ID")]
    pub arch_ids: Vec<u32>,

    /// Extract a sound by id (repeatable)
    #[arg(long = "sound", value_name = "ID")]
    pub sound_ids: Vec<u32>,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Whether only id extraction was requested
    pub fn ids_only(&self) -> bool {
        self.names.is_empty() && !(self.arch_ids.is_empty() && self.sound_ids.is_empty())
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_level(&self) -> &'static str {
        if self.is_very_quiet() {
            "off"
        } else if self.is_quiet() {
            "error"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn vfs_config(&self) -> VfsConfig {
        VfsConfig {
            base_path: self.root.clone(),
            data_paths: self.data_paths.clone(),
        }
    }
}
