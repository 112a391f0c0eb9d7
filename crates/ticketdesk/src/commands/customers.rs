//! Student (customer) command handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tabled::Tabled;
use ticketdesk_core::{Customer, CustomerInput, Screen};

use crate::cli::{CustomerFields, CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;

use super::{Context, resource, util};

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl From<&Arc<Customer>> for CustomerRow {
    fn from(c: &Arc<Customer>) -> Self {
        Self {
            id: c.id,
            name: c.full_name(),
            email: util::or_dash(c.email.as_deref()),
            phone: util::or_dash(c.phone_number.as_deref()),
            city: util::or_dash(c.city.as_deref()),
            country: util::or_dash(c.country.as_deref()),
        }
    }
}

/// Copy given flags onto the form. The password is prompted for when
/// `ask_password` is set.
fn apply(
    form: &mut CustomerInput,
    fields: CustomerFields,
    ask_password: bool,
) -> Result<(), CliError> {
    util::set(&mut form.first_name, fields.first_name);
    util::set(&mut form.last_name, fields.last_name);
    util::set(&mut form.email, fields.email);
    util::set(&mut form.gender, fields.gender);
    util::set(&mut form.phone_number, fields.phone);
    util::set(&mut form.city, fields.city);
    util::set(&mut form.state, fields.state);
    util::set(&mut form.country, fields.country);
    if ask_password || fields.password {
        form.password = Some(util::prompt_password("Password")?.expose_secret().to_owned());
    }
    Ok(())
}

pub async fn handle(
    ctx: &Context,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.gate(Screen::Customers)?;

    match args.command {
        CustomersCommand::List(list) => {
            resource::list::<Customer, _>(ctx, &list, global, |c| CustomerRow::from(c)).await
        }

        CustomersCommand::Create(fields) => {
            let mut form = CustomerInput::default();
            apply(&mut form, fields, true)?;
            resource::create::<Customer>(ctx, form, global).await
        }

        CustomersCommand::Update { id, fields } => {
            resource::update::<Customer>(ctx, id, "customers list", global, |_, form| {
                apply(form, fields, false)
            })
            .await
        }

        CustomersCommand::Delete(target) => {
            resource::delete::<Customer>(
                ctx,
                target.id,
                "customers list",
                |c| {
                    let name = c.full_name();
                    if name.is_empty() {
                        c.id.to_string()
                    } else {
                        name
                    }
                },
                global,
            )
            .await
        }
    }
}
