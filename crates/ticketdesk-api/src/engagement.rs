// Registration side-channels: event sign-up, reminder and success
// notices, and recommendations.

use tracing::debug;

use crate::client::TicketClient;
use crate::error::Error;
use crate::models::{Event, RecordId, Registration, RegistrationInput, RegistrationNotice};

impl TicketClient {
    /// `POST /registered-events/register`.
    pub async fn register_for_event(&self, input: &RegistrationInput) -> Result<String, Error> {
        let url = self.url("registered-events/register")?;
        debug!(
            customer = input.customer.id,
            event = input.event.event_id,
            "registering for event"
        );
        self.post_json(url, input).await
    }

    /// `POST /recommendations/generate/{customerId}`.
    pub async fn generate_recommendations(&self, customer_id: RecordId) -> Result<(), Error> {
        let url = self.url(&format!("recommendations/generate/{customer_id}"))?;
        self.post_empty(url).await.map(|_| ())
    }

    /// `GET /recommendations/customer/{customerId}`.
    pub async fn recommendations(&self, customer_id: RecordId) -> Result<Vec<Event>, Error> {
        let url = self.url(&format!("recommendations/customer/{customer_id}"))?;
        self.get_list(url).await
    }

    /// `POST /registered-events/send-registration-success`.
    pub async fn send_registration_success(&self, notice: &RegistrationNotice) -> Result<(), Error> {
        let url = self.url("registered-events/send-registration-success")?;
        self.post_json(url, notice).await.map(|_| ())
    }

    /// `POST /registered-events/send-reminder` with the full registration.
    pub async fn send_reminder(&self, registration: &Registration) -> Result<String, Error> {
        let url = self.url("registered-events/send-reminder")?;
        debug!(registration = registration.id, "sending reminder");
        self.post_json(url, registration).await
    }

    /// `GET /registered-events/{id}`.
    pub async fn registration(&self, id: RecordId) -> Result<Registration, Error> {
        let url = self.url(&format!("registered-events/{id}"))?;
        self.get_json(url).await
    }
}
