// Endpoint descriptors for the backend's uniformly shaped collections.
//
// Every entity kind exposes `GET /{base}/all`, a create endpoint whose name
// varies per kind, and id-addressed update/delete. The per-kind quirks
// (customers delete under `/delete/{id}`, reminders are append-only,
// registrations can be listed per customer) live here so callers never
// build paths by hand.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{
    Category, CategoryInput, City, CityInput, Customer, CustomerInput, Event, EventInput,
    RecordId, Registration, RegistrationInput, Reminder, ReminderInput,
};

/// Which slice of a collection to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    /// The whole collection.
    #[default]
    All,
    /// Only records owned by this customer (where the backend supports it).
    Customer(RecordId),
}

/// REST endpoints and identity of one entity kind.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Request body for create and update.
    type Input: Serialize + Clone + Default + Send + Sync + 'static;

    /// Human-readable singular name, used in messages ("category").
    const NAME: &'static str;

    /// Base path segment (`categories` for `/categories/all`).
    const BASE: &'static str;

    /// The server-assigned identifier of this record.
    fn key(&self) -> RecordId;

    /// Collection path for the given scope.
    fn list_path(_scope: ListScope) -> String {
        format!("{}/all", Self::BASE)
    }

    fn create_path() -> String;

    /// `None` when the backend has no update endpoint for this kind.
    fn update_path(id: RecordId) -> Option<String> {
        Some(format!("{}/{id}", Self::BASE))
    }

    /// `None` when the backend has no delete endpoint for this kind.
    fn delete_path(id: RecordId) -> Option<String> {
        Some(format!("{}/{id}", Self::BASE))
    }
}

impl Resource for Category {
    type Input = CategoryInput;
    const NAME: &'static str = "category";
    const BASE: &'static str = "categories";

    fn key(&self) -> RecordId {
        self.id
    }

    fn create_path() -> String {
        "categories/addCategory".into()
    }
}

impl Resource for City {
    type Input = CityInput;
    const NAME: &'static str = "city";
    const BASE: &'static str = "cities";

    fn key(&self) -> RecordId {
        self.id
    }

    fn create_path() -> String {
        "cities/addCity".into()
    }
}

impl Resource for Event {
    type Input = EventInput;
    const NAME: &'static str = "event";
    const BASE: &'static str = "events";

    fn key(&self) -> RecordId {
        self.event_id
    }

    fn create_path() -> String {
        "events/addEvent".into()
    }
}

impl Resource for Customer {
    type Input = CustomerInput;
    const NAME: &'static str = "customer";
    const BASE: &'static str = "customers";

    fn key(&self) -> RecordId {
        self.id
    }

    fn create_path() -> String {
        "customers/create".into()
    }

    fn delete_path(id: RecordId) -> Option<String> {
        Some(format!("customers/delete/{id}"))
    }
}

impl Resource for Registration {
    type Input = RegistrationInput;
    const NAME: &'static str = "registration";
    const BASE: &'static str = "registered-events";

    fn key(&self) -> RecordId {
        self.id
    }

    fn list_path(scope: ListScope) -> String {
        match scope {
            ListScope::All => "registered-events/all".into(),
            ListScope::Customer(id) => format!("registered-events/student/{id}"),
        }
    }

    fn create_path() -> String {
        "registered-events/register".into()
    }
}

impl Resource for Reminder {
    type Input = ReminderInput;
    const NAME: &'static str = "reminder";
    const BASE: &'static str = "reminders";

    fn key(&self) -> RecordId {
        self.id
    }

    fn create_path() -> String {
        "reminders/save".into()
    }

    fn update_path(_id: RecordId) -> Option<String> {
        None
    }

    fn delete_path(_id: RecordId) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_paths() {
        assert_eq!(Category::list_path(ListScope::All), "categories/all");
        assert_eq!(City::create_path(), "cities/addCity");
        assert_eq!(Event::update_path(5).as_deref(), Some("events/5"));
        assert_eq!(Event::delete_path(5).as_deref(), Some("events/5"));
    }

    #[test]
    fn customer_delete_has_its_own_segment() {
        assert_eq!(Customer::delete_path(7).as_deref(), Some("customers/delete/7"));
        assert_eq!(Customer::update_path(7).as_deref(), Some("customers/7"));
    }

    #[test]
    fn registrations_scope_by_customer() {
        assert_eq!(
            Registration::list_path(ListScope::Customer(12)),
            "registered-events/student/12"
        );
        assert_eq!(Registration::list_path(ListScope::All), "registered-events/all");
    }

    #[test]
    fn reminders_are_append_only() {
        assert!(Reminder::update_path(1).is_none());
        assert!(Reminder::delete_path(1).is_none());
        // Reminders ignore scoping.
        assert_eq!(Reminder::list_path(ListScope::Customer(3)), "reminders/all");
    }
}
