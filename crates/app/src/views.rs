//! Text views for the terminal
//!
//! Each view renders into a `String` so the command layer decides where it
//! goes.

use std::fmt::Write;

use chrono::FixedOffset;
use leaddesk_core::{format_date, DayBucket, Event, LeadRow};

/// Lead table, one row per lead; stale rows are flagged with `!`
pub fn lead_table(rows: &[LeadRow], threshold_days: i64) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("No leads match the current filters.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<4} {:<20} {:<12} {:<13} {:<18} {:<32} {}",
        "ID", "Customer", "SKU", "Source", "Vehicle", "Tags", "Last edit"
    );
    for row in rows {
        let lead = &row.lead;
        let marker = if row.is_stale { "!" } else { " " };
        let name = if row.is_hot {
            format!("{} *", lead.customer_name)
        } else {
            lead.customer_name.clone()
        };
        let tags = lead.display_tags().collect::<Vec<_>>().join(", ");
        let _ = writeln!(
            out,
            "{} {:<4} {:<20} {:<12} {:<13} {:<18} {:<32} {} days ago",
            marker,
            lead.id,
            name,
            lead.sku,
            lead.source,
            lead.vehicle_description,
            tags,
            row.days_since_edit
        );
    }
    let _ = writeln!(
        out,
        "\n* hot lead   ! stale (not updated in more than {} days)",
        threshold_days
    );
    out
}

/// Plain list, one entry per line
pub fn name_list(title: &str, names: &[String]) -> String {
    let mut out = format!("{}:\n", title);
    if names.is_empty() {
        out.push_str("  (none)\n");
    }
    for name in names {
        let _ = writeln!(out, "  {}", name);
    }
    out
}

/// One line per event: date, time range, icon, title
pub fn event_line(event: &Event, offset: &FixedOffset) -> String {
    let local_start = event.start_time.with_timezone(offset);
    let mut line = format!(
        "{} {} {} {}",
        format_date(local_start.date_naive()),
        event.time_range(offset),
        event.kind.icon(),
        event.title
    );
    if let Some(notes) = &event.notes {
        let _ = write!(line, " ({})", notes);
    }
    line
}

/// Upcoming schedule grouped by day
pub fn schedule(buckets: &[DayBucket], offset: &FixedOffset) -> String {
    let mut out = String::new();
    if buckets.is_empty() {
        out.push_str("No upcoming events. Your schedule is clear.\n");
        return out;
    }

    for bucket in buckets {
        let _ = writeln!(out, "{}  ({})", bucket.label, bucket.subtitle());
        for event in &bucket.events {
            let _ = writeln!(
                out,
                "    {}  {} {}  - {} [{}]",
                event.time_range(offset),
                event.kind.icon(),
                event.title,
                event.lead_name,
                event.id
            );
            if let Some(notes) = &event.notes {
                let _ = writeln!(out, "        {}", notes);
            }
        }
    }
    out
}

/// Lead detail panel with the lead's events
pub fn lead_detail(row: &LeadRow, events: &[Event], offset: &FixedOffset) -> String {
    let lead = &row.lead;
    let mut out = String::new();
    let _ = writeln!(out, "{} (lead {})", lead.customer_name, lead.id);
    let _ = writeln!(out, "  Phone:      {}", lead.phone_number);
    let _ = writeln!(out, "  Vehicle:    {}", lead.vehicle_description);
    let _ = writeln!(out, "  SKU:        {}", lead.sku);
    let _ = writeln!(out, "  Source:     {}", lead.source);
    let _ = writeln!(out, "  Intention:  {}", lead.intention);
    let tags = lead.display_tags().collect::<Vec<_>>().join(", ");
    let _ = writeln!(out, "  Tags:       {}", tags);
    let _ = writeln!(
        out,
        "  Last edit:  {} days ago{}{}",
        row.days_since_edit,
        if row.is_stale { " (stale)" } else { "" },
        if row.is_hot { " (hot)" } else { "" }
    );

    out.push_str("\nEvents:\n");
    if events.is_empty() {
        out.push_str("  No events scheduled.\n");
    }
    for event in events {
        let _ = writeln!(out, "  {}", event_line(event, offset));
    }
    out
}
