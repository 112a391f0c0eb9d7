//! Registration command handlers.
//!
//! Students see only their own registrations; everything else here is
//! admin work.

use std::sync::Arc;

use tabled::Tabled;
use ticketdesk_core::engagement;
use ticketdesk_core::{
    CoreError, EventIdRef, IdRef, RecordId, Registration, RegistrationInput, Role, Screen,
};

use crate::cli::{GlobalOpts, RegistrationsArgs, RegistrationsCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, resource, util};

#[derive(Tabled)]
struct RegistrationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Event date")]
    event_date: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

impl From<&Arc<Registration>> for RegistrationRow {
    fn from(r: &Arc<Registration>) -> Self {
        Self {
            id: r.id,
            student: r.customer.full_name(),
            email: util::or_dash(r.customer.email.as_deref()),
            event: r.event.event_name.clone(),
            event_date: util::fmt_time(r.event.event_date_time),
            registered: util::fmt_time(r.registration_time),
        }
    }
}

fn require_admin(ctx: &Context, action: &str) -> Result<(), CliError> {
    ctx.session.require(Role::Admin, action)?;
    Ok(())
}

async fn remind(ctx: &Context, id: RecordId) -> Result<String, CliError> {
    let registration = engagement::registration(&ctx.client, id)
        .await
        .map_err(|e| match e {
            CoreError::Api {
                status: Some(404), ..
            } => CliError::not_found("registration", id, "registrations list"),
            other => other.into(),
        })?;
    Ok(engagement::send_reminder(&ctx.client, &ctx.session, &registration).await?)
}

pub async fn handle(
    ctx: &Context,
    args: RegistrationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.gate(Screen::RegisteredEvents)?;

    match args.command {
        RegistrationsCommand::List(list) => {
            resource::list::<Registration, _>(ctx, &list, global, |r| RegistrationRow::from(r))
                .await
        }

        RegistrationsCommand::Create { customer, event } => {
            require_admin(ctx, "Registering students")?;
            let form = RegistrationInput {
                customer: IdRef { id: customer },
                event: EventIdRef { event_id: event },
                registration_time: String::new(),
            };
            resource::create::<Registration>(ctx, form, global).await
        }

        RegistrationsCommand::Update {
            id,
            customer,
            event,
        } => {
            require_admin(ctx, "Editing registrations")?;
            resource::update::<Registration>(ctx, id, "registrations list", global, |_, form| {
                util::set(&mut form.customer.id, customer);
                util::set(&mut form.event.event_id, event);
                Ok(())
            })
            .await
        }

        RegistrationsCommand::Delete(target) => {
            require_admin(ctx, "Deleting registrations")?;
            resource::delete::<Registration>(
                ctx,
                target.id,
                "registrations list",
                |r| format!("{} / {}", r.customer.full_name(), r.event.event_name),
                global,
            )
            .await
        }

        RegistrationsCommand::Remind(target) => {
            require_admin(ctx, "Sending reminders")?;
            let spinner = util::spinner("Sending reminder...", global);
            let result = remind(ctx, target.id).await;
            spinner.finish_and_clear();
            let message = result?;
            output::status(&message, global.quiet);
            Ok(())
        }
    }
}
