use chrono::{DateTime, Utc};
use colored::Colorize;
use timeago::Formatter;
use todoz::model::Todo;
use todoz::view::{TodoStats, index_todos};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const DONE_MARKER: &str = "[x]";
const OPEN_MARKER: &str = "[ ]";

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub(super) fn render_list(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return format!(
            "{}\n",
            "No todos yet. Add one with `todoz add <text>`.".dimmed()
        );
    }

    let mut out = String::new();
    for dt in index_todos(todos) {
        let idx_str = format!("{:>4}. ", dt.index);
        let marker = if dt.todo.completed {
            DONE_MARKER
        } else {
            OPEN_MARKER
        };
        let time_ago = format_time_ago(dt.todo.created_at_utc());

        let fixed_width = idx_str.width() + marker.width() + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let text: String = dt.todo.text.replace(['\n', '\r'], " ");
        let text_display = truncate_to_width(&text, available);
        let padding = available.saturating_sub(text_display.width());

        let (marker, text_display) = if dt.todo.completed {
            (marker.green(), text_display.strikethrough().dimmed())
        } else {
            (marker.normal(), text_display.normal())
        };

        out.push_str(&format!(
            "{}{} {}{}{}\n",
            idx_str.yellow(),
            marker,
            text_display,
            " ".repeat(padding),
            time_ago.dimmed()
        ));
    }
    out
}

pub(super) fn render_stats(stats: &TodoStats) -> String {
    format!(
        "{} total · {} completed · {} pending\n",
        stats.total.to_string().bold(),
        stats.completed.to_string().green(),
        stats.pending.to_string().blue()
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(created_at: Option<DateTime<Utc>>) -> String {
    let time_str = match created_at {
        Some(timestamp) => {
            let duration = Utc::now().signed_duration_since(timestamp);
            Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        None => "unknown".to_string(),
    };
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn empty_list_shows_hint() {
        plain();
        assert!(render_list(&[]).contains("No todos yet"));
    }

    #[test]
    fn list_is_numbered_newest_first() {
        plain();
        let mut old = Todo::new("Old task");
        old.created_at -= 60_000;
        let mut new = Todo::new("New task");
        new.completed = true;

        let out = render_list(&[old, new]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1. [x] New task"));
        assert!(lines[1].contains("2. [ ] Old task"));
    }

    #[test]
    fn long_text_is_truncated() {
        plain();
        let out = render_list(&[Todo::new("x".repeat(300))]);
        assert!(out.contains('…'));
        assert!(out.trim_end().width() <= LINE_WIDTH);
    }

    #[test]
    fn stats_line() {
        plain();
        let stats = TodoStats {
            total: 3,
            completed: 1,
            pending: 2,
        };
        assert_eq!(
            render_stats(&stats),
            "3 total · 1 completed · 2 pending\n"
        );
    }

    #[test]
    fn truncation_keeps_short_text() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
    }
}
