//! Terminal output for folioctl

use folio_shared::{ExperienceSnapshot, LevelRange, Progression, TimelineEntry};
use owo_colors::OwoColorize;

pub const HR: &str = "------------------------------------------------------------";

const KEY_WIDTH: usize = 14;

fn print_kv(key: &str, value: &str) {
    println!("{:width$} {}", key, value, width = KEY_WIDTH);
}

pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", HR.dimmed());
}

/// `[=====-----]` bar for a 0-100 percentage
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("[{}{}]", "=".repeat(filled), "-".repeat(width - filled))
}

pub fn level_row(range: &LevelRange) {
    let state = if range.active {
        "active".green().to_string()
    } else {
        "inactive".dimmed().to_string()
    };
    println!(
        "  {:12} {:>12}  {:8} {:10} {}",
        range.label.bold(),
        range.range_text(),
        range.color,
        range.icon,
        state
    );
}

pub fn level_detail(range: &LevelRange) {
    print_kv("level", &range.label.bold().to_string());
    print_kv("range", &format!("{} years", range.range_text()));
    print_kv("color", &range.color);
    print_kv("icon", &range.icon);
    print_kv("description", &range.description);
}

pub fn progression(progression: &Progression) {
    match &progression.current_level {
        Some(level) => print_kv("level", &level.label.bold().to_string()),
        None => print_kv("level", &"none".yellow().to_string()),
    }

    match progression.next_step() {
        Some(step) => {
            print_kv("next", &step.label);
            print_kv(
                "remaining",
                &format!("{:.1} years (at {})", step.years_remaining, step.years_needed),
            );
        }
        None if progression.current_level.is_some() => {
            print_kv("next", &"top level reached".green().to_string())
        }
        None => {}
    }

    print_kv(
        "progress",
        &format!(
            "{} {}%",
            progress_bar(progression.progress_percent, 30),
            progression.progress_percent
        ),
    );
}

pub fn snapshot(snapshot: &ExperienceSnapshot) {
    print_kv("started", &snapshot.start_date.format("%Y-%m-%d").to_string());
    print_kv("experience", &format!("{:.1} years", snapshot.years));
    print_kv("level", &snapshot.level_label().bold().to_string());

    if let Some(step) = &snapshot.next_level {
        print_kv("next", &step.label);
        print_kv("remaining", &format!("{:.1} years", step.years_remaining));
    }

    print_kv(
        "progress",
        &format!(
            "{} {}%",
            progress_bar(snapshot.progress_percent, 30),
            snapshot.progress_percent
        ),
    );
}

pub fn timeline_row(entry: &TimelineEntry) {
    let label = entry
        .level
        .as_ref()
        .map(|l| l.label.as_str())
        .unwrap_or("-");
    println!("  {}  {:>5.1}  {}", entry.year.cyan(), entry.years, label);
}

pub fn ok(message: &str) {
    println!("{} {}", "[OK]".bright_green(), message);
}

pub fn error_line(message: &str) {
    println!("  {} {}", "x".bright_red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]");
        assert_eq!(progress_bar(50, 10), "[=====-----]");
        assert_eq!(progress_bar(100, 10), "[==========]");
        assert_eq!(progress_bar(250, 4), "[====]");
    }
}
