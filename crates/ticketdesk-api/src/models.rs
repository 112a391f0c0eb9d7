// Wire models for the ticketing backend.
//
// Records mirror the backend's JSON (camelCase). Optional fields use
// `#[serde(default)]` liberally because the backend serializes nulls for
// anything the user never filled in. `*Input` types are request bodies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-assigned identifier, unique within one entity kind.
pub type RecordId = i64;

// ── Timestamps ───────────────────────────────────────────────────────

/// Lenient `LocalDateTime` decoding.
///
/// Depending on the backend's Jackson setup, timestamps arrive either as
/// ISO text (`"2025-03-01T18:30"`, with or without seconds) or as an array
/// of parts (`[2025, 3, 1, 18, 30, 0]`).
pub mod timestamp {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Parts(Vec<i64>),
    }

    /// Parse ISO-ish local timestamps the backend emits.
    pub fn parse(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        let text = text.strip_suffix('Z').unwrap_or(text);
        const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                chrono::DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }

    fn from_parts(parts: &[i64]) -> Option<NaiveDateTime> {
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(
            i32::try_from(part(0)).ok()?,
            u32::try_from(part(1)).ok()?,
            u32::try_from(part(2)).ok()?,
        )?;
        date.and_hms_nano_opt(
            u32::try_from(part(3)).ok()?,
            u32::try_from(part(4)).ok()?,
            u32::try_from(part(5)).ok()?,
            u32::try_from(part(6)).ok()?,
        )
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Raw::Text(text)) => parse(&text),
            Some(Raw::Parts(parts)) => from_parts(&parts),
            None => None,
        })
    }
}

// ── Category ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

// ── City ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(rename = "cityid")]
    pub id: RecordId,
    pub city_name: String,
    pub state_name: String,
    pub country_name: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInput {
    pub city_name: String,
    pub state_name: String,
    pub country_name: String,
}

// ── Event ────────────────────────────────────────────────────────────

/// An event's category as the backend sends it.
///
/// `/events/all` flattens it to the category name; embedded events (inside
/// registrations and recommendations) carry the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Record(Category),
}

impl CategoryRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Record(category) => &category.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: RecordId,
    pub event_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub event_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub registration_fee: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    /// Base64-encoded image, only present on `/events` responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_image: Option<String>,
}

impl Event {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(CategoryRef::name)
    }
}

/// `{ "id": … }` reference used when linking to another record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub event_name: String,
    pub description: String,
    /// Local date-time as entered, e.g. `2025-06-01T19:00`.
    pub event_date_time: String,
    pub organizer: String,
    pub category: IdRef,
    pub capacity: i64,
    pub registration_fee: f64,
    pub status: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub result: String,
}

/// Binary attachment sent alongside a multipart write.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

// ── Customer ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Base64-encoded by the backend; never displayed.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Left out of updates unless retyped; the backend re-encodes whatever
    /// it receives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub gender: String,
    pub phone_number: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

// ── Registration ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RecordId,
    pub customer: Customer,
    pub event: Event,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub registration_time: Option<NaiveDateTime>,
}

/// `{ "eventId": … }` reference used by registration requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventIdRef {
    pub event_id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub customer: IdRef,
    pub event: EventIdRef,
    /// ISO-8601 instant of the registration.
    pub registration_time: String,
}

/// Payload for the registration-success notice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationNotice {
    pub customer: NoticeCustomer,
    pub event: NoticeEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeCustomer {
    pub email: String,
    pub first_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeEvent {
    pub event_name: String,
    pub event_date_time: Option<NaiveDateTime>,
}

// ── Reminder ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: RecordId,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderInput {
    pub customer_name: String,
    pub event_name: String,
}

// ── Accounts ─────────────────────────────────────────────────────────

/// Body of `POST /users/register`. Field names follow the backend's
/// lowercase `firstname` / `lastname`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Body of `PUT /users/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub id: RecordId,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
