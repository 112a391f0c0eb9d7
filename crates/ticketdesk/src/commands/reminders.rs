//! Reminder command handlers. Reminders are append-only.

use std::sync::Arc;

use tabled::Tabled;
use ticketdesk_core::{Reminder, ReminderInput, Screen};

use crate::cli::{GlobalOpts, RemindersArgs, RemindersCommand};
use crate::error::CliError;

use super::{Context, resource, util};

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Student")]
    customer: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Sent")]
    sent: String,
}

impl From<&Arc<Reminder>> for ReminderRow {
    fn from(r: &Arc<Reminder>) -> Self {
        Self {
            id: r.id,
            customer: util::or_dash(r.customer_name.as_deref()),
            event: util::or_dash(r.event_name.as_deref()),
            sent: util::fmt_time(r.sent_at),
        }
    }
}

pub async fn handle(
    ctx: &Context,
    args: RemindersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.gate(Screen::Reminders)?;

    match args.command {
        RemindersCommand::List(list) => {
            resource::list::<Reminder, _>(ctx, &list, global, |r| ReminderRow::from(r)).await
        }

        RemindersCommand::Create {
            customer_name,
            event_name,
        } => {
            let form = ReminderInput {
                customer_name,
                event_name,
            };
            resource::create::<Reminder>(ctx, form, global).await
        }
    }
}
