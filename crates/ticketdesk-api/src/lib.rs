// ticketdesk-api: Async Rust client for the event-ticketing REST backend

pub mod auth;
pub mod client;
pub mod engagement;
pub mod error;
pub mod models;
pub mod resource;
pub mod transport;

pub use auth::Credentials;
pub use client::TicketClient;
pub use error::Error;
pub use resource::{ListScope, Resource};
pub use transport::TransportConfig;
