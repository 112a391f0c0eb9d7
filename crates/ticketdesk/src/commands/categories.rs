//! Category command handlers.

use std::sync::Arc;

use tabled::Tabled;
use ticketdesk_core::{Category, CategoryInput, Screen};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;

use super::{Context, resource, util};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Category>> for CategoryRow {
    fn from(c: &Arc<Category>) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            description: util::or_dash(c.description.as_deref()),
        }
    }
}

pub async fn handle(
    ctx: &Context,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.gate(Screen::Categories)?;

    match args.command {
        CategoriesCommand::List(list) => {
            resource::list::<Category, _>(ctx, &list, global, |c| CategoryRow::from(c)).await
        }

        CategoriesCommand::Create { name, description } => {
            resource::create::<Category>(ctx, CategoryInput { name, description }, global).await
        }

        CategoriesCommand::Update {
            id,
            name,
            description,
        } => {
            resource::update::<Category>(ctx, id, "categories list", global, |_, form| {
                util::set(&mut form.name, name);
                util::set(&mut form.description, description);
                Ok(())
            })
            .await
        }

        CategoriesCommand::Delete(target) => {
            resource::delete::<Category>(
                ctx,
                target.id,
                "categories list",
                |c| c.name.clone(),
                global,
            )
            .await
        }
    }
}
