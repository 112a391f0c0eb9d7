//! Command dispatch.

pub mod auth;
pub mod categories;
pub mod cities;
pub mod config_cmd;
pub mod customers;
pub mod engagement;
pub mod events;
pub mod registrations;
pub mod reminders;
pub mod resource;
pub mod util;

use ticketdesk_core::{Screen, Session, TicketClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// What a backend-facing command needs.
pub struct Context {
    pub client: TicketClient,
    pub session: Session,
    /// Page size from the active profile.
    pub page_size: usize,
}

impl Context {
    /// Refuse early when the signed-in role has no business on `screen`.
    pub fn gate(&self, screen: Screen) -> Result<(), CliError> {
        if self.session.can_access(screen) {
            return Ok(());
        }
        match self.session.current_role() {
            None => Err(CliError::NotSignedIn),
            Some(role) => Err(CliError::Forbidden {
                message: format!("{} is not available to {role} accounts", screen.title()),
            }),
        }
    }
}

pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Register(args) => auth::register(ctx, args, global).await,
        Command::ResetPassword(args) => auth::reset_password(ctx, args, global).await,
        Command::Profile(args) => auth::profile(ctx, args, global).await,
        Command::Categories(args) => categories::handle(ctx, args, global).await,
        Command::Cities(args) => cities::handle(ctx, args, global).await,
        Command::Events(args) => events::handle(ctx, args, global).await,
        Command::Customers(args) => customers::handle(ctx, args, global).await,
        Command::Registrations(args) => registrations::handle(ctx, args, global).await,
        Command::Reminders(args) => reminders::handle(ctx, args, global).await,
        Command::Recommendations => engagement::recommendations(ctx, global).await,

        // Handled in main before a backend connection is built.
        Command::Logout
        | Command::Whoami
        | Command::Menu
        | Command::Config(_)
        | Command::Completions(_) => unreachable!("handled in main"),
    }
}
