//! Command-line interface module for sortdir.
//!
//! Turns parsed arguments and the optional configuration file into
//! [`SortOptions`], runs the sort and prints the outcome.

use crate::config::{ConflictPolicy, SortConfig};
use crate::file_organizer::{FileOrganizer, SortOptions};
use crate::output::OutputFormatter;
use crate::report::SortReport;
use clap::Parser;
use std::path::PathBuf;

/// Sort a folder into images/, video/, documents/, audio/, archives/ and others/.
#[derive(Debug, Clone, Parser)]
#[command(name = "sortdir", version, about)]
pub struct Args {
    /// Folder to sort. Its files are moved out and empty subfolders removed.
    pub source: PathBuf,

    /// Where to create the category folders [default: current directory]
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Configuration file [default: .sortdirrc.toml, then ~/.config/sortdir/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to do when a sorted file name is already taken
    #[arg(long, value_enum)]
    pub on_conflict: Option<ConflictPolicy>,

    /// Print the report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,

    /// Do not show the progress spinner
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every action to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merges command-line overrides into the loaded configuration.
    fn apply_to(&self, config: &mut SortConfig) {
        if let Some(dest) = &self.dest {
            config.sorting.destination = Some(dest.clone());
        }
        if let Some(policy) = self.on_conflict {
            config.sorting.on_conflict = policy;
        }
    }
}

/// Runs a sort for the given arguments.
///
/// Loads the configuration, sorts, and prints either the summary or the JSON
/// report. Errors come back as printable messages.
pub fn run_cli(args: &Args) -> Result<SortReport, String> {
    let mut config = SortConfig::load(args.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    args.apply_to(&mut config);

    let options = SortOptions::from_config(&config)
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let interactive = !args.json && !args.quiet && !args.verbose;
    if !args.json {
        OutputFormatter::info(&format!(
            "Sorting {} into {}",
            args.source.display(),
            options.destination.display()
        ));
    }

    let mut organizer = FileOrganizer::new(&args.source, &options).map_err(|e| e.to_string())?;
    if interactive {
        organizer = organizer.with_progress(OutputFormatter::create_spinner());
    }
    let report = organizer.run().map_err(|e| e.to_string())?;

    if args.json {
        let json = report
            .to_json()
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
    } else {
        for dir in &report.removed_reserved_dirs {
            OutputFormatter::warning(&format!(
                "Deleted {}: folder name is reserved for sorted output",
                dir.display()
            ));
        }
        OutputFormatter::summary(&report);
        OutputFormatter::success("Done.");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::try_parse_from(["sortdir", "Downloads"]).unwrap();
        assert_eq!(args.source, PathBuf::from("Downloads"));
        assert!(args.dest.is_none());
        assert!(args.on_conflict.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_missing_source_is_an_error() {
        assert!(Args::try_parse_from(["sortdir"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "sortdir",
            "in",
            "--dest",
            "out",
            "--on-conflict",
            "overwrite",
        ])
        .unwrap();

        let mut config = SortConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.sorting.destination, Some(PathBuf::from("out")));
        assert_eq!(config.sorting.on_conflict, ConflictPolicy::Overwrite);
    }

    #[test]
    fn test_run_cli_reports_missing_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = temp_dir.path().join("sortdir.toml");
        std::fs::write(&config, "").unwrap();

        let args = Args {
            source: temp_dir.path().join("missing"),
            dest: Some(temp_dir.path().join("out")),
            config: Some(config),
            on_conflict: None,
            json: true,
            quiet: true,
            verbose: false,
        };

        let err = run_cli(&args).unwrap_err();
        assert!(err.contains("Invalid source directory"));
    }
}
