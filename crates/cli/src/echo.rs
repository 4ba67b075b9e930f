use std::path::Path;
use std::time::Duration;

use folio_core::CrawlSummary;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Folio".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Harvest book records and find similar books\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print crawl counters and where the tables went
pub fn print_crawl_summary(summary: &CrawlSummary, elapsed: Duration, tsv: &Path, csv: &Path) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Crawl Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    print_detail("List pages", &summary.pages_fetched.to_string());
    if summary.pages_failed > 0 {
        print_detail("List pages failed", &summary.pages_failed.to_string().bright_red().to_string());
    }
    print_detail("Books found", &summary.books_discovered.to_string());
    print_detail("Books extracted", &summary.books_extracted.to_string());
    if summary.books_skipped > 0 {
        print_detail("Books skipped", &summary.books_skipped.to_string());
    }
    if summary.books_failed > 0 {
        print_detail("Books failed", &summary.books_failed.to_string().bright_red().to_string());
    }
    print_detail("Elapsed", &format_duration(elapsed));
    print_detail("TSV", &tsv.display().to_string());
    print_detail("CSV", &csv.display().to_string());
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a run time as seconds or minutes
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 60.0 { format!("{}m {:02}s", secs as u64 / 60, secs as u64 % 60) } else { format!("{:.1}s", secs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 05s");
    }
}
