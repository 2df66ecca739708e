use chrono::{DateTime, Utc};
use console::Style;
use curatorapp::commands::{CmdMessage, MessageLevel};
use curatorapp::model::{Item, ItemId, Module};
use once_cell::sync::Lazy;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const PIN_MARKER: &str = "⚲";
const FEATURE_MARKER: &str = "★";

static INFO: Lazy<Style> = Lazy::new(|| Style::new().dim());
static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow());
static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red());
static INDEX: Lazy<Style> = Lazy::new(|| Style::new().yellow());
static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(246).italic());

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        let style = match message.level {
            MessageLevel::Info => &*INFO,
            MessageLevel::Success => &*SUCCESS,
            MessageLevel::Warning => &*WARNING,
            MessageLevel::Error => &*ERROR,
        };
        println!("{}", style.apply_to(&message.content));
    }
}

/// One listing row: the item plus the markers to show beside it.
pub(super) struct ListRow {
    pub item: Item,
    pub pinned: bool,
    pub featured: bool,
}

pub(super) fn print_items(rows: &[ListRow]) {
    if rows.is_empty() {
        println!("No items found.");
        return;
    }

    for row in rows {
        let left_prefix = if row.pinned {
            format!("  {} ", PIN_MARKER)
        } else {
            "    ".to_string()
        };
        let idx_str = format!("{}. ", row.item.id);
        let right_suffix = if row.featured {
            format!("{} ", FEATURE_MARKER)
        } else {
            "  ".to_string()
        };

        let fixed_width = left_prefix.width() + idx_str.width() + right_suffix.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = if row.item.is_published() {
            row.item.title.clone()
        } else {
            format!("{} [{}]", row.item.title, row.item.status)
        };
        let title_display = truncate_to_width(&label, available);
        let padding = available.saturating_sub(title_display.width());

        println!(
            "{}{}{}{}{}{}",
            left_prefix,
            INDEX.apply_to(idx_str),
            title_display,
            " ".repeat(padding),
            right_suffix,
            TIME.apply_to(format_time_ago(row.item.created_at))
        );
    }
}

pub(super) fn print_item(
    item: &Item,
    related: Option<ItemId>,
    states: &[(Module, bool)],
    size: Option<&str>,
) {
    println!(
        "{} {}",
        INDEX.apply_to(format!("{}.", item.id)),
        TITLE.apply_to(&item.title)
    );
    println!("--------------------------------");
    println!("type:    {}", item.item_type);
    println!("status:  {}", item.status);
    println!("rank:    {}", item.menu_order);
    if let Some(related) = related {
        println!("related: {}", related);
    }
    for (module, on) in states {
        let mark = if *on { "x" } else { " " };
        println!("[{}] {}", mark, module);
    }
    if let Some(size) = size {
        println!("size:    {}", size);
    }
}

pub(super) fn print_pins(pins: &[ItemId]) {
    if pins.is_empty() {
        println!("No pinned items.");
        return;
    }
    for (i, id) in pins.iter().enumerate() {
        println!("p{}. {}", i + 1, id);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_wide_titles() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("日本語日本語", 5), "日本…");
    }
}
