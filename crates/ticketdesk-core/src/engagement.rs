// ── Registration flows ──
//
// Student-side event sign-up and recommendations, admin-side reminders,
// plus the catalog filter used on the student home screen.

use chrono::{Local, NaiveDateTime};
use ticketdesk_api::TicketClient;
use ticketdesk_api::models::{
    Event, EventIdRef, IdRef, NoticeCustomer, NoticeEvent, RecordId, Registration,
    RegistrationInput, RegistrationNotice,
};
use tracing::{info, warn};

use crate::entities::now_iso;
use crate::error::CoreError;
use crate::session::{Role, Session};

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Register the signed-in student for `event`.
///
/// The follow-ups (recommendation refresh and confirmation email) are
/// best effort: their failures are logged and do not fail the sign-up.
pub async fn register_for_event(
    client: &TicketClient,
    session: &Session,
    event: &Event,
) -> Result<String, CoreError> {
    let principal = session.require(Role::Student, "Registering for events")?;
    let customer_id = principal.id.ok_or(CoreError::NotAuthenticated)?;

    let input = RegistrationInput {
        customer: IdRef { id: customer_id },
        event: EventIdRef {
            event_id: event.event_id,
        },
        registration_time: now_iso(),
    };
    client
        .register_for_event(&input)
        .await
        .map_err(|e| CoreError::write(&e, || "Error registering for the event.".into()))?;
    info!(customer = customer_id, event = event.event_id, "registered for event");

    if let Err(e) = client.generate_recommendations(customer_id).await {
        warn!(error = %e, customer = customer_id, "recommendation refresh failed");
    }

    let first_name = principal
        .raw
        .get("firstName")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(principal.display_name.as_str())
        .to_owned();
    let notice = RegistrationNotice {
        customer: NoticeCustomer {
            email: principal.email.clone(),
            first_name,
        },
        event: NoticeEvent {
            event_name: event.event_name.clone(),
            event_date_time: event.event_date_time,
        },
    };
    if let Err(e) = client.send_registration_success(&notice).await {
        warn!(error = %e, customer = customer_id, "registration confirmation not sent");
    }

    Ok(format!("Registered for {}.", event.event_name))
}

/// Email a reminder for `registration`. Admin only.
pub async fn send_reminder(
    client: &TicketClient,
    session: &Session,
    registration: &Registration,
) -> Result<String, CoreError> {
    session.require(Role::Admin, "Sending reminders")?;
    client
        .send_reminder(registration)
        .await
        .map_err(|e| CoreError::write(&e, || "Failed to send reminder.".into()))?;
    let to = registration
        .customer
        .email
        .clone()
        .unwrap_or_else(|| registration.customer.full_name());
    info!(registration = registration.id, %to, "reminder sent");
    Ok(format!("Reminder sent to {to}"))
}

/// Look up one registration, e.g. before sending a reminder for it.
pub async fn registration(client: &TicketClient, id: RecordId) -> Result<Registration, CoreError> {
    Ok(client.registration(id).await?)
}

/// Recommended events for the signed-in student.
pub async fn recommendations(
    client: &TicketClient,
    session: &Session,
) -> Result<Vec<Event>, CoreError> {
    let principal = session.require(Role::Student, "Recommendations")?;
    let customer_id = principal.id.ok_or(CoreError::NotAuthenticated)?;
    client
        .recommendations(customer_id)
        .await
        .map_err(|e| CoreError::Fetch {
            entity: "recommendations",
            reason: e.to_string(),
        })
}

/// Whether the event has already taken place, relative to `now`.
pub fn is_past_at(event: &Event, now: NaiveDateTime) -> bool {
    event.event_date_time.is_some_and(|at| at < now)
}

pub fn is_past(event: &Event) -> bool {
    is_past_at(event, Local::now().naive_local())
}

/// Student catalog filter: name search plus a category name, where
/// [`ALL_CATEGORIES`] disables the category check.
pub fn filter_catalog<'a>(events: &'a [Event], search: &str, category: &str) -> Vec<&'a Event> {
    let needle = search.to_lowercase();
    events
        .iter()
        .filter(|e| needle.is_empty() || e.event_name.to_lowercase().contains(&needle))
        .filter(|e| {
            category.eq_ignore_ascii_case(ALL_CATEGORIES)
                || e.category_name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(category))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(id: RecordId, name: &str, category: &str, at: &str) -> Event {
        serde_json::from_value(json!({
            "eventId": id, "eventName": name, "category": category, "eventDateTime": at
        }))
        .unwrap()
    }

    #[test]
    fn past_events() {
        let now = ticketdesk_api::models::timestamp::parse("2025-06-01T12:00").unwrap();
        assert!(is_past_at(&event(1, "a", "x", "2025-05-31T23:00"), now));
        assert!(!is_past_at(&event(2, "b", "x", "2025-06-02T09:00"), now));
        let undated: Event =
            serde_json::from_value(json!({ "eventId": 3, "eventName": "c" })).unwrap();
        assert!(!is_past_at(&undated, now));
    }

    #[test]
    fn catalog_filter() {
        let events = vec![
            event(1, "Jazz Night", "Music", "2025-01-01T20:00"),
            event(2, "Sculpture Walk", "Art", "2025-01-02T10:00"),
            event(3, "Rock Fest", "Music", "2025-01-03T18:00"),
        ];
        let ids = |hits: Vec<&Event>| hits.iter().map(|e| e.event_id).collect::<Vec<_>>();
        assert_eq!(ids(filter_catalog(&events, "", ALL_CATEGORIES)), vec![1, 2, 3]);
        assert_eq!(ids(filter_catalog(&events, "", "music")), vec![1, 3]);
        assert_eq!(ids(filter_catalog(&events, "ROCK", "Music")), vec![3]);
        assert!(filter_catalog(&events, "jazz", "Art").is_empty());
    }
}
