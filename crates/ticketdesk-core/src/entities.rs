// ── Entity descriptors ──
//
// Everything the list controller needs to know about one entity kind
// beyond its REST endpoints: what the search box matches, how a record
// becomes an editable form, and which form values are acceptable.

use chrono::{SecondsFormat, Utc};
use ticketdesk_api::Resource;
use ticketdesk_api::models::{
    Attachment, Category, CategoryInput, CategoryRef, City, CityInput, Customer, CustomerInput,
    Event, EventIdRef, EventInput, IdRef, Registration, RegistrationInput, Reminder,
    ReminderInput,
};

use crate::controller::EditMode;
use crate::error::CoreError;
use crate::validate::{ALL_FIELDS_REQUIRED, Checks, is_valid_email};

/// Reply the customer endpoint sends, sometimes with a 200, when the email
/// already belongs to someone.
pub const EMAIL_IN_USE: &str = "Email is already in use.";

/// A listable, editable entity kind.
pub trait Entity: Resource {
    /// Values a user edits in the create/update form.
    type Form: Clone + Default + std::fmt::Debug + Send + Sync + 'static;

    /// Capitalized singular for messages ("Category").
    const LABEL: &'static str;
    /// Plural for messages ("categories").
    const PLURAL: &'static str;

    /// Case-insensitive substring match. `needle` is already lowercased
    /// and never empty.
    fn matches(&self, needle: &str) -> bool;

    /// Prefill a form for editing this record.
    fn to_form(&self) -> Self::Form;

    fn validate(form: &Self::Form) -> Result<(), CoreError>;

    /// Validation for a form opened in `mode`. Most kinds check the same
    /// things either way.
    fn validate_for(form: &Self::Form, _mode: EditMode) -> Result<(), CoreError> {
        Self::validate(form)
    }

    fn to_input(form: &Self::Form) -> Self::Input;

    /// Multipart part name and file, when the form carries one.
    fn attachment(_form: &Self::Form) -> Option<(&'static str, &Attachment)> {
        None
    }

    /// Some endpoints report a rejection in a successful response body.
    fn rejection(_body: &str) -> Option<String> {
        None
    }
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

fn contains_opt(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| contains(f, needle))
}

// ── Category ─────────────────────────────────────────────────────────

impl Entity for Category {
    type Form = CategoryInput;
    const LABEL: &'static str = "Category";
    const PLURAL: &'static str = "categories";

    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains_opt(self.description.as_deref(), needle)
    }

    fn to_form(&self) -> CategoryInput {
        CategoryInput {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn validate(form: &CategoryInput) -> Result<(), CoreError> {
        let mut checks = Checks::new();
        if form.name.trim().is_empty() {
            checks.fail("name", "Category name is required.");
        }
        checks.finish()
    }

    fn to_input(form: &CategoryInput) -> CategoryInput {
        CategoryInput {
            name: form.name.trim().to_owned(),
            description: form.description.trim().to_owned(),
        }
    }
}

// ── City ─────────────────────────────────────────────────────────────

impl Entity for City {
    type Form = CityInput;
    const LABEL: &'static str = "City";
    const PLURAL: &'static str = "cities";

    fn matches(&self, needle: &str) -> bool {
        contains(&self.city_name, needle)
            || contains(&self.state_name, needle)
            || contains(&self.country_name, needle)
    }

    fn to_form(&self) -> CityInput {
        CityInput {
            city_name: self.city_name.clone(),
            state_name: self.state_name.clone(),
            country_name: self.country_name.clone(),
        }
    }

    fn validate(form: &CityInput) -> Result<(), CoreError> {
        let mut checks = Checks::new();
        for (field, value) in [
            ("cityName", form.city_name.as_str()),
            ("stateName", form.state_name.as_str()),
            ("countryName", form.country_name.as_str()),
        ] {
            if value.trim().is_empty() {
                checks.fail(field, "Enter City name, State, and Country");
            }
        }
        checks.finish()
    }

    fn to_input(form: &CityInput) -> CityInput {
        CityInput {
            city_name: form.city_name.trim().to_owned(),
            state_name: form.state_name.trim().to_owned(),
            country_name: form.country_name.trim().to_owned(),
        }
    }
}

// ── Event ────────────────────────────────────────────────────────────

/// Event form: the JSON fields plus an optional poster image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub fields: EventInput,
    pub image: Option<Attachment>,
}

impl Entity for Event {
    type Form = EventForm;
    const LABEL: &'static str = "Event";
    const PLURAL: &'static str = "events";

    fn matches(&self, needle: &str) -> bool {
        contains(&self.event_name, needle)
    }

    fn to_form(&self) -> EventForm {
        let category = match &self.category {
            Some(CategoryRef::Record(c)) => IdRef { id: c.id },
            // `/events/all` only sends the name; the user has to pick again.
            Some(CategoryRef::Name(_)) | None => IdRef::default(),
        };
        EventForm {
            fields: EventInput {
                event_name: self.event_name.clone(),
                description: self.description.clone().unwrap_or_default(),
                event_date_time: self
                    .event_date_time
                    .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
                    .unwrap_or_default(),
                organizer: self.organizer.clone().unwrap_or_default(),
                category,
                capacity: self.capacity,
                registration_fee: self.registration_fee,
                status: self.status.clone().unwrap_or_default(),
                contact_email: self.contact_email.clone().unwrap_or_default(),
                contact_phone: self.contact_phone.clone().unwrap_or_default(),
                result: self.result.clone().unwrap_or_default(),
            },
            image: None,
        }
    }

    fn validate(form: &EventForm) -> Result<(), CoreError> {
        let f = &form.fields;
        let mut checks = Checks::new();
        checks.required(&[
            ("eventName", f.event_name.as_str()),
            ("description", f.description.as_str()),
            ("eventDateTime", f.event_date_time.as_str()),
            ("organizer", f.organizer.as_str()),
            ("contactEmail", f.contact_email.as_str()),
            ("contactPhone", f.contact_phone.as_str()),
            ("status", f.status.as_str()),
            ("result", f.result.as_str()),
        ]);
        if f.category.id <= 0 {
            checks.fail("category", ALL_FIELDS_REQUIRED);
        }
        if !f.contact_email.trim().is_empty() && !is_valid_email(&f.contact_email) {
            checks.fail("contactEmail", "A valid Contact Email is required.");
        }
        if f.capacity < 0 {
            checks.fail("capacity", "Capacity cannot be negative.");
        }
        if f.registration_fee < 0.0 || f.registration_fee.is_nan() {
            checks.fail("registrationFee", "Registration Fee cannot be negative.");
        }
        checks.finish()
    }

    fn to_input(form: &EventForm) -> EventInput {
        let mut input = form.fields.clone();
        input.event_name = input.event_name.trim().to_owned();
        input.contact_email = input.contact_email.trim().to_owned();
        input
    }

    fn attachment(form: &EventForm) -> Option<(&'static str, &Attachment)> {
        form.image.as_ref().map(|image| ("event", image))
    }
}

// ── Customer ─────────────────────────────────────────────────────────

impl Entity for Customer {
    type Form = CustomerInput;
    const LABEL: &'static str = "Customer";
    const PLURAL: &'static str = "customers";

    fn matches(&self, needle: &str) -> bool {
        contains_opt(self.first_name.as_deref(), needle)
            || contains_opt(self.last_name.as_deref(), needle)
            || contains_opt(self.email.as_deref(), needle)
            || contains_opt(self.phone_number.as_deref(), needle)
    }

    fn to_form(&self) -> CustomerInput {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        CustomerInput {
            first_name: text(&self.first_name),
            last_name: text(&self.last_name),
            email: text(&self.email),
            password: None,
            gender: text(&self.gender),
            phone_number: text(&self.phone_number),
            city: text(&self.city),
            state: text(&self.state),
            country: text(&self.country),
        }
    }

    fn validate(form: &CustomerInput) -> Result<(), CoreError> {
        Self::validate_for(form, EditMode::Create)
    }

    /// A password is only required for new customers.
    fn validate_for(form: &CustomerInput, mode: EditMode) -> Result<(), CoreError> {
        let password = form.password.as_deref().unwrap_or_default();
        let mut checks = Checks::new();
        checks.required(&[
            ("firstName", form.first_name.as_str()),
            ("lastName", form.last_name.as_str()),
            ("email", form.email.as_str()),
            ("gender", form.gender.as_str()),
            ("phoneNumber", form.phone_number.as_str()),
            ("city", form.city.as_str()),
            ("state", form.state.as_str()),
            ("country", form.country.as_str()),
        ]);
        if mode == EditMode::Create {
            checks.required(&[("password", password)]);
        }
        if !form.email.trim().is_empty() && !is_valid_email(&form.email) {
            checks.fail("email", "A valid email is required.");
        }
        checks.finish()
    }

    fn to_input(form: &CustomerInput) -> CustomerInput {
        let mut input = form.clone();
        input.email = input.email.trim().to_owned();
        input.password = input.password.filter(|p| !p.is_empty());
        input
    }

    fn rejection(body: &str) -> Option<String> {
        (body.trim() == EMAIL_IN_USE).then(|| EMAIL_IN_USE.to_owned())
    }
}

// ── Registration ─────────────────────────────────────────────────────

impl Entity for Registration {
    type Form = RegistrationInput;
    const LABEL: &'static str = "Registration";
    const PLURAL: &'static str = "registrations";

    fn matches(&self, needle: &str) -> bool {
        contains(&self.event.event_name, needle)
    }

    fn to_form(&self) -> RegistrationInput {
        RegistrationInput {
            customer: IdRef {
                id: self.customer.id,
            },
            event: EventIdRef {
                event_id: self.event.event_id,
            },
            registration_time: self
                .registration_time
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
                .unwrap_or_default(),
        }
    }

    fn validate(form: &RegistrationInput) -> Result<(), CoreError> {
        let mut checks = Checks::new();
        if form.customer.id <= 0 {
            checks.fail("customer", ALL_FIELDS_REQUIRED);
        }
        if form.event.event_id <= 0 {
            checks.fail("event", ALL_FIELDS_REQUIRED);
        }
        checks.finish()
    }

    fn to_input(form: &RegistrationInput) -> RegistrationInput {
        let mut input = form.clone();
        if input.registration_time.trim().is_empty() {
            input.registration_time = now_iso();
        }
        input
    }
}

// ── Reminder ─────────────────────────────────────────────────────────

impl Entity for Reminder {
    type Form = ReminderInput;
    const LABEL: &'static str = "Reminder";
    const PLURAL: &'static str = "reminders";

    fn matches(&self, needle: &str) -> bool {
        let line = format!(
            "{} {}",
            self.customer_name.as_deref().unwrap_or_default(),
            self.event_name.as_deref().unwrap_or_default()
        );
        contains(&line, needle)
    }

    fn to_form(&self) -> ReminderInput {
        ReminderInput {
            customer_name: self.customer_name.clone().unwrap_or_default(),
            event_name: self.event_name.clone().unwrap_or_default(),
        }
    }

    fn validate(form: &ReminderInput) -> Result<(), CoreError> {
        let mut checks = Checks::new();
        checks.required(&[
            ("customerName", form.customer_name.as_str()),
            ("eventName", form.event_name.as_str()),
        ]);
        checks.finish()
    }

    fn to_input(form: &ReminderInput) -> ReminderInput {
        form.clone()
    }
}

/// Current instant as the backend's ISO-8601 text.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_fields(err: CoreError) -> (Vec<&'static str>, String) {
        match err {
            CoreError::Validation { fields, message } => (fields, message),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn category_requires_name() {
        let form = CategoryInput {
            name: "  ".into(),
            description: "x".into(),
        };
        let (fields, _) = validation_fields(Category::validate(&form).unwrap_err());
        assert_eq!(fields, vec!["name"]);
    }

    #[test]
    fn city_matches_any_place_name() {
        let city: City = serde_json::from_value(json!({
            "cityid": 1, "cityName": "Pune", "stateName": "Maharashtra", "countryName": "India"
        }))
        .unwrap();
        assert!(city.matches("mahar"));
        assert!(city.matches("ind"));
        assert!(!city.matches("goa"));
    }

    #[test]
    fn city_message() {
        let (fields, message) = validation_fields(City::validate(&CityInput::default()).unwrap_err());
        assert_eq!(fields.len(), 3);
        assert_eq!(message, "Enter City name, State, and Country");
    }

    fn valid_event() -> EventForm {
        EventForm {
            fields: EventInput {
                event_name: "Gig".into(),
                description: "Live".into(),
                event_date_time: "2025-06-01T19:00".into(),
                organizer: "Club".into(),
                category: IdRef { id: 2 },
                capacity: 100,
                registration_fee: 10.0,
                status: "Upcoming".into(),
                contact_email: "club@example.com".into(),
                contact_phone: "555".into(),
                result: "TBD".into(),
            },
            image: None,
        }
    }

    #[test]
    fn event_checks() {
        assert!(Event::validate(&valid_event()).is_ok());

        let mut form = valid_event();
        form.fields.contact_email = "club-at-example".into();
        let (_, message) = validation_fields(Event::validate(&form).unwrap_err());
        assert_eq!(message, "A valid Contact Email is required.");

        let mut form = valid_event();
        form.fields.capacity = -1;
        form.fields.registration_fee = -2.5;
        let (fields, message) = validation_fields(Event::validate(&form).unwrap_err());
        assert_eq!(fields, vec!["capacity", "registrationFee"]);
        assert_eq!(message, "Capacity cannot be negative.");

        let mut form = valid_event();
        form.fields.category = IdRef::default();
        let (fields, _) = validation_fields(Event::validate(&form).unwrap_err());
        assert_eq!(fields, vec!["category"]);
    }

    #[test]
    fn event_form_from_flat_record_needs_category() {
        let event: Event = serde_json::from_value(json!({
            "eventId": 4, "eventName": "Expo", "category": "Art",
            "eventDateTime": "2025-03-01T18:30:00"
        }))
        .unwrap();
        let form = event.to_form();
        assert_eq!(form.fields.category.id, 0);
        assert_eq!(form.fields.event_date_time, "2025-03-01T18:30");
    }

    #[test]
    fn event_attachment_uses_event_part() {
        let mut form = valid_event();
        assert!(Event::attachment(&form).is_none());
        form.image = Some(Attachment {
            file_name: "p.png".into(),
            content_type: None,
            bytes: vec![1],
        });
        assert_eq!(Event::attachment(&form).unwrap().0, "event");
    }

    #[test]
    fn customer_search_covers_phone() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 1, "firstName": "Ada", "lastName": "Lovelace",
            "email": "ada@example.com", "phoneNumber": "+44 20 7946"
        }))
        .unwrap();
        assert!(customer.matches("love"));
        assert!(customer.matches("7946"));
        assert!(!customer.matches("babbage"));
    }

    #[test]
    fn customer_password_required_only_on_create() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 5, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
            "password": "UGFzc3cwcmQh", "gender": "F", "phoneNumber": "555",
            "city": "London", "state": "LDN", "country": "UK"
        }))
        .unwrap();
        let form = customer.to_form();
        assert_eq!(form.password, None);
        assert!(Customer::validate_for(&form, EditMode::Update(5)).is_ok());

        let (fields, _) =
            validation_fields(Customer::validate_for(&form, EditMode::Create).unwrap_err());
        assert_eq!(fields, vec!["password"]);
    }

    #[test]
    fn customer_rejection_in_success_body() {
        assert_eq!(
            Customer::rejection("Email is already in use.").as_deref(),
            Some(EMAIL_IN_USE)
        );
        assert_eq!(Customer::rejection("Customer created"), None);
    }

    #[test]
    fn registration_time_filled_in() {
        let form = RegistrationInput {
            customer: IdRef { id: 1 },
            event: EventIdRef { event_id: 2 },
            registration_time: String::new(),
        };
        assert!(Registration::validate(&form).is_ok());
        let input = Registration::to_input(&form);
        assert!(input.registration_time.ends_with('Z'));
    }

    #[test]
    fn reminder_matches_joined_names() {
        let reminder = Reminder {
            id: 1,
            customer_name: Some("Ada".into()),
            event_name: Some("Jazz Night".into()),
            sent_at: None,
        };
        assert!(reminder.matches("ada jazz"));
        assert!(!reminder.matches("rock"));
    }
}
