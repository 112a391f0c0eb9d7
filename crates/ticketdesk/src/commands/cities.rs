//! City command handlers.

use std::sync::Arc;

use tabled::Tabled;
use ticketdesk_core::{City, CityInput, Screen};

use crate::cli::{CitiesArgs, CitiesCommand, GlobalOpts};
use crate::error::CliError;

use super::{Context, resource, util};

#[derive(Tabled)]
struct CityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Arc<City>> for CityRow {
    fn from(c: &Arc<City>) -> Self {
        Self {
            id: c.id,
            city: c.city_name.clone(),
            state: c.state_name.clone(),
            country: c.country_name.clone(),
            updated: util::fmt_time(c.updated_at.or(c.created_at)),
        }
    }
}

pub async fn handle(ctx: &Context, args: CitiesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.gate(Screen::Cities)?;

    match args.command {
        CitiesCommand::List(list) => {
            resource::list::<City, _>(ctx, &list, global, |c| CityRow::from(c)).await
        }

        CitiesCommand::Create {
            city,
            state,
            country,
        } => {
            let form = CityInput {
                city_name: city,
                state_name: state,
                country_name: country,
            };
            resource::create::<City>(ctx, form, global).await
        }

        CitiesCommand::Update {
            id,
            city,
            state,
            country,
        } => {
            resource::update::<City>(ctx, id, "cities list", global, |_, form| {
                util::set(&mut form.city_name, city);
                util::set(&mut form.state_name, state);
                util::set(&mut form.country_name, country);
                Ok(())
            })
            .await
        }

        CitiesCommand::Delete(target) => {
            resource::delete::<City>(
                ctx,
                target.id,
                "cities list",
                |c| format!("{}, {}", c.city_name, c.country_name),
                global,
            )
            .await
        }
    }
}
