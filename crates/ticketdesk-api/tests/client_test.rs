// Integration tests for `TicketClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticketdesk_api::models::{
    Attachment, Category, CategoryInput, City, CityInput, Customer, Event, EventInput, IdRef,
    Registration, Reminder,
};
use ticketdesk_api::{Credentials, Error, ListScope, TicketClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TicketClient) {
    let server = MockServer::start().await;
    let client = TicketClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_categories() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/categories/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Music", "description": "Live shows" },
            { "id": 2, "name": "Art", "description": null },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let categories: Vec<Category> = client.list(ListScope::All).await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name, "Music");
    assert_eq!(categories[1].description, None);
}

#[tokio::test]
async fn test_list_wraps_single_object() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/registered-events/student/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "customer": { "id": 4, "firstName": "Ada", "email": "ada@example.com" },
            "event": { "eventId": 3, "eventName": "Jazz Night",
                       "category": { "id": 1, "name": "Music" } },
            "registrationTime": "2025-02-01T10:00:00"
        })))
        .mount(&server)
        .await;

    let regs: Vec<Registration> = client.list(ListScope::Customer(4)).await.unwrap();

    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0].event.event_name, "Jazz Night");
    assert_eq!(regs[0].event.category_name(), Some("Music"));
}

#[tokio::test]
async fn test_list_reminders_with_array_timestamps() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reminders/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "customerName": "Ada", "eventName": "Expo",
              "sentAt": [2025, 1, 5, 9, 0, 0] },
        ])))
        .mount(&server)
        .await;

    let reminders: Vec<Reminder> = client.list(ListScope::All).await.unwrap();
    assert_eq!(reminders[0].sent_at.unwrap().to_string(), "2025-01-05 09:00:00");
}

#[tokio::test]
async fn test_list_garbage_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cities/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list::<City>(ListScope::All).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_city() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cities/addCity"))
        .and(body_json(json!({
            "cityName": "Pune", "stateName": "MH", "countryName": "India"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cityid": 9, "cityName": "Pune", "stateName": "MH", "countryName": "India"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = CityInput {
        city_name: "Pune".into(),
        state_name: "MH".into(),
        country_name: "India".into(),
    };
    client.create::<City>(&input).await.unwrap();
}

#[tokio::test]
async fn test_update_category() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/categories/5"))
        .and(body_json(json!({ "name": "Theatre", "description": "Plays" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let input = CategoryInput {
        name: "Theatre".into(),
        description: "Plays".into(),
    };
    client.update::<Category>(5, &input).await.unwrap();
}

#[tokio::test]
async fn test_create_customer_duplicate_email_surfaces_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/customers/create"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Email is already in use."))
        .mount(&server)
        .await;

    let err = client
        .create::<Customer>(&Default::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 400, .. }));
    assert_eq!(err.server_message().as_deref(), Some("Email is already in use."));
}

#[tokio::test]
async fn test_delete_customer_uses_delete_segment() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/customers/delete/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Customer deleted successfully."))
        .expect(1)
        .mount(&server)
        .await;

    client.delete::<Customer>(7).await.unwrap();
}

#[tokio::test]
async fn test_delete_event_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/events/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete::<Event>(3).await.unwrap();
}

#[tokio::test]
async fn test_delete_reminder_sends_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.delete::<Reminder>(1).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 405, .. }));
}

#[tokio::test]
async fn test_create_event_with_image_is_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/events/addEvent"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "eventId": 11, "eventName": "Gig", "category": "Music"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = EventInput {
        event_name: "Gig".into(),
        category: IdRef { id: 1 },
        ..Default::default()
    };
    let image = Attachment {
        file_name: "poster.png".into(),
        content_type: Some("image/png".into()),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    client
        .create_with_attachment::<Event>("event", &input, &image)
        .await
        .unwrap();
}

// ── Accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_login_plain_text_reply() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "email": "root@example.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Login successful!"))
        .mount(&server)
        .await;

    let reply = client
        .login_admin(&Credentials::new("root@example.com", "pw"))
        .await
        .unwrap();
    assert_eq!(reply, json!("Login successful!"));
}

#[tokio::test]
async fn test_customer_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/customers/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .login_customer(&Credentials::new("x@example.com", "bad"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_forgot_password_uses_query_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/users/forgot-password"))
        .and(query_param("email", "a+b@example.com"))
        .and(query_param("newPassword", "N3w!pass"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Password updated successfully."))
        .expect(1)
        .mount(&server)
        .await;

    let msg = client
        .forgot_password("a+b@example.com", &"N3w!pass".to_string().into())
        .await
        .unwrap();
    assert_eq!(msg, "Password updated successfully.");
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = TicketClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let err = client.list::<Category>(ListScope::All).await.unwrap_err();
    assert!(err.is_transport());
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeout_reports_configured_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cities/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_secs(1));
    let client = TicketClient::new(server.uri().parse().unwrap(), &transport).unwrap();
    let err = client.list::<City>(ListScope::All).await.unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_secs: 1 }), "{err:?}");
    assert!(err.is_transport());
    assert_eq!(err.to_string(), "Request timed out after 1s");
}
