//! Demo data for a fresh session
//!
//! There is no backend yet; the desk starts from this seed every run. Edit
//! times and bookings are relative to the start of the session.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use leaddesk_core::{
    next_available_hour, resolve_event_times, CrmConfig, EventDraft, EventKind, Lead, Result,
    TimeOfDay, Workspace, HOT_TAG,
};

fn demo_leads(now: DateTime<Utc>) -> Vec<Lead> {
    vec![
        Lead::new("1", "Page", now - Duration::days(5))
            .with_sku("SKU-476396")
            .with_source("Website")
            .with_intention("Within 1 week - owner - trading in for a newer car")
            .with_phone("097****977")
            .with_vehicle("Toyota Camry 2.5")
            .with_warehouse_link("Link")
            .with_tag("OTP")
            .with_tag("Returning customer")
            .with_tag(HOT_TAG),
        Lead::new("2", "Huynh Xuan Phong", now - Duration::days(1))
            .with_sku("SKU-162351")
            .with_source("Referral")
            .with_intention("N/A")
            .with_phone("096****914")
            .with_vehicle("Honda Civic 1.5")
            .with_warehouse_link("Link")
            .with_tag("OTP")
            .with_tag("Inspected"),
        Lead::new("3", "Nguyen Thi Hoa", now - Duration::days(4))
            .with_sku("SKU-579229")
            .with_source("Direct")
            .with_intention("N/A")
            .with_phone("077****701")
            .with_vehicle("Mercedes GLC 300")
            .with_warehouse_link("Link")
            .with_tag("OTP"),
        Lead::new("4", "Tran Van Nam", now - Duration::days(6))
            .with_sku("SKU-298347")
            .with_source("Exhibition")
            .with_intention("Looking for a luxury SUV - ready to buy within 2 weeks")
            .with_phone("090****234")
            .with_vehicle("BMW X5")
            .with_warehouse_link("Link")
            .with_tag("Inspected")
            .with_tag("Returning customer")
            .with_tag(HOT_TAG),
        Lead::new("5", "Le Minh Tuan", now - Duration::days(2))
            .with_sku("SKU-438901")
            .with_source("Social Media")
            .with_intention("First time buyer - needs financing options")
            .with_phone("098****567")
            .with_vehicle("Hyundai Accent")
            .with_warehouse_link("Link")
            .with_tag("OTP"),
    ]
}

/// Seed leads plus a few bookings spread over the coming days
pub fn demo_workspace(now: &DateTime<FixedOffset>, config: &CrmConfig) -> Result<Workspace> {
    let mut workspace = Workspace::new(demo_leads(now.with_timezone(&Utc)));
    let tz = now.timezone();
    let first_slot = next_available_hour(now);

    let bookings = [
        ("1", "Call about trade-in", EventKind::Call, 0),
        ("4", "Inspect BMW X5", EventKind::Inspection, 1),
        ("2", "Test drive", EventKind::Meeting, 3),
        ("3", "Follow-up call", EventKind::Call, 9),
    ];

    for (lead_id, title, kind, days_out) in bookings {
        let Some(lead) = workspace.find_lead(lead_id) else {
            continue;
        };
        let start = first_slot + Duration::days(days_out);
        let times = resolve_event_times(
            start.date_naive(),
            TimeOfDay::of(&start),
            config.default_event_minutes,
            &tz,
        )?;
        let draft = EventDraft::new(title, lead, times)
            .with_kind(kind)
            .with_reminder_offset(config.reminder_offset_minutes);
        workspace.add_event(draft)?;
    }

    Ok(workspace)
}
