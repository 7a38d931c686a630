//! Console output: colored messages, the progress spinner and the run summary.

use crate::file_category::Category;
use crate::report::SortReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::time::Duration;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Creates a spinner that counts sorted files and shows the current one.
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// let spinner = OutputFormatter::create_spinner();
    /// spinner.set_message("photo.jpg");
    /// spinner.inc(1);
    /// spinner.finish_and_clear();
    /// ```
    pub fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {pos} files sorted {msg}")
                .expect("Invalid spinner template"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Prints the per-category file lists and the extension sets.
    pub fn summary(report: &SortReport) {
        print!("{}", Self::render_summary(report));
    }

    /// Renders the summary block printed by [`OutputFormatter::summary`].
    pub fn render_summary(report: &SortReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "SUMMARY".bold());

        for category in Category::ALL {
            let files = report.files(category);
            let _ = writeln!(
                out,
                "{} ({}): {}\n",
                category.label().bold(),
                files.len().to_string().green(),
                join_or_dash(files.iter().map(String::as_str))
            );
        }

        let _ = writeln!(
            out,
            "{}: {}\n",
            "Known Extensions".bold(),
            join_set(&report.known_extensions)
        );
        let _ = writeln!(
            out,
            "{}: {}",
            "Unknown Extensions".bold(),
            join_set(&report.unknown_extensions)
        );

        if !report.skipped_archives.is_empty() {
            let _ = writeln!(out, "\n{}", "Archives not extracted:".yellow());
            for skipped in &report.skipped_archives {
                let _ = writeln!(out, "  - {}: {}", skipped.name, skipped.reason);
            }
        }

        if !report.excluded.is_empty() {
            let _ = writeln!(
                out,
                "\n{} {} left in place by filters",
                report.excluded.len(),
                if report.excluded.len() == 1 {
                    "file"
                } else {
                    "files"
                }
            );
        }

        let _ = writeln!(
            out,
            "\n{} {} sorted, {} empty {} removed",
            report.total_files().to_string().green().bold(),
            if report.total_files() == 1 {
                "file"
            } else {
                "files"
            },
            report.pruned_dirs.len(),
            if report.pruned_dirs.len() == 1 {
                "folder"
            } else {
                "folders"
            }
        );
        out
    }
}

fn join_set(set: &BTreeSet<String>) -> String {
    join_or_dash(set.iter().map(String::as_str))
}

fn join_or_dash<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SkippedArchive;

    #[test]
    fn test_render_summary_lists_original_names() {
        colored::control::set_override(false);

        let mut report = SortReport::new();
        report.record(Category::Image, "Фото.JPG", "jpg");
        report.record(Category::Other, "notes.xyz", "xyz");

        let summary = OutputFormatter::render_summary(&report);

        assert!(summary.contains("Images (1): Фото.JPG"));
        assert!(summary.contains("Video (0): -"));
        assert!(summary.contains("Others (1): notes.xyz"));
        assert!(summary.contains("Known Extensions: jpg"));
        assert!(summary.contains("Unknown Extensions: xyz"));
        assert!(summary.contains("2 files sorted, 0 empty folders removed"));
    }

    #[test]
    fn test_render_summary_lists_skipped_archives_once() {
        colored::control::set_override(false);

        let mut report = SortReport::new();
        report.record(Category::Archive, "backup.tar.gz", "gz");
        report.skipped_archives.push(SkippedArchive {
            name: "backup.tar.gz".to_string(),
            reason: "Not a valid zip file (content is application/gzip)".to_string(),
        });

        let summary = OutputFormatter::render_summary(&report);

        assert!(summary.contains("Archives not extracted:"));
        assert_eq!(
            summary
                .matches("backup.tar.gz: Not a valid zip file (content is application/gzip)")
                .count(),
            1
        );
    }
}
