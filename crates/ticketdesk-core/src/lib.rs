// ticketdesk-core: Session store, list controllers and account flows
// between ticketdesk-api and front-ends.

pub mod auth;
pub mod config;
pub mod controller;
pub mod engagement;
pub mod entities;
pub mod error;
pub mod nav;
pub mod notification;
pub mod session;
pub mod validate;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{ProfileChanges, ProfileOutcome, SignUp};
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE};
pub use controller::{CollectionPhase, DeleteState, EditMode, FormState, ListController};
pub use entities::{Entity, EventForm};
pub use error::CoreError;
pub use nav::{Screen, menu_for};
pub use notification::{Notification, Severity};
pub use session::{MemoryStorage, Principal, Role, Session, SessionStorage};
pub use view::{ListView, ViewState};

// Wire types consumers work with directly.
pub use ticketdesk_api::models::{
    Attachment, Category, CategoryInput, City, CityInput, Customer, CustomerInput, Event,
    EventIdRef, EventInput, IdRef, RecordId, Registration, RegistrationInput, Reminder,
    ReminderInput,
};
pub use ticketdesk_api::{Credentials, ListScope, Resource, TicketClient};
