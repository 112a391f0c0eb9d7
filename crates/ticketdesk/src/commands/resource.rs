//! Generic list / create / update / delete over a `ListController`.
//!
//! Every entity command funnels through here so search, paging, the
//! two-step delete and notifications behave the same for all of them.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use ticketdesk_core::{Entity, ListController, Notification, RecordId};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

/// Controller for `E` with the collection loaded.
pub async fn loaded<E: Entity>(
    ctx: &Context,
    page_size: usize,
    global: &GlobalOpts,
) -> Result<ListController<E>, CliError> {
    let ctrl = ListController::<E>::new(ctx.client.clone(), ctx.session.clone(), ctx.page_size);
    ctrl.set_page_size(page_size)?;

    let spinner = util::spinner(&format!("Loading {}...", E::PLURAL), global);
    let result = ctrl.load().await;
    spinner.finish_and_clear();
    result?;
    Ok(ctrl)
}

/// Look up a loaded record or fail with a not-found pointing at `list`.
pub fn find<E: Entity>(
    ctrl: &ListController<E>,
    id: RecordId,
    list_command: &str,
) -> Result<Arc<E>, CliError> {
    ctrl.get(id)
        .ok_or_else(|| CliError::not_found(E::NAME, id, list_command))
}

/// Search, page and render a collection.
pub async fn list<E, R>(
    ctx: &Context,
    args: &ListArgs,
    global: &GlobalOpts,
    to_row: impl Fn(&Arc<E>) -> R,
) -> Result<(), CliError>
where
    E: Entity + Serialize,
    R: Tabled,
{
    let ctrl = loaded::<E>(ctx, args.page_size.unwrap_or(ctx.page_size), global).await?;
    if let Some(ref query) = args.search {
        ctrl.set_query(query.as_str());
    }
    if args.all {
        ctrl.set_page_size(ctrl.records().len().max(1))?;
    } else {
        let page = args.page.checked_sub(1).ok_or_else(|| CliError::Paging {
            message: "Pages start at 1".into(),
        })?;
        ctrl.set_page(page)?;
    }

    let view = ctrl.view();
    let out = output::render_list(&global.output, &view.rows, &to_row, |r| r.key().to_string())?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        let footer = if view.matching == 0 {
            format!("No {} found.", E::PLURAL)
        } else {
            format!(
                "Page {} of {} ({} of {} {})",
                view.page + 1,
                view.page_count,
                view.matching,
                view.total,
                E::PLURAL
            )
        };
        output::status(&footer, global.quiet);
    }
    Ok(())
}

/// Submit a new record.
pub async fn create<E: Entity>(
    ctx: &Context,
    values: E::Form,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctrl = ListController::<E>::new(ctx.client.clone(), ctx.session.clone(), ctx.page_size);
    ctrl.begin_create();
    submit(&ctrl, values, global).await
}

/// Edit an existing record. `edit` receives the record's current form
/// values and applies whatever flags were given.
pub async fn update<E: Entity>(
    ctx: &Context,
    id: RecordId,
    list_command: &str,
    global: &GlobalOpts,
    edit: impl FnOnce(&E, &mut E::Form) -> Result<(), CliError>,
) -> Result<(), CliError> {
    let ctrl = loaded::<E>(ctx, ctx.page_size, global).await?;
    let record = find(&ctrl, id, list_command)?;
    ctrl.begin_edit(&record)?;

    let mut values = record.to_form();
    edit(&record, &mut values)?;
    submit(&ctrl, values, global).await
}

async fn submit<E: Entity>(
    ctrl: &ListController<E>,
    values: E::Form,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = util::spinner(&format!("Saving {}...", E::NAME), global);
    let result = ctrl.submit(values).await;
    spinner.finish_and_clear();
    // Failures surface through the returned error; only success is echoed.
    result?;
    announce(ctrl.notification(), global);
    Ok(())
}

/// Two-step delete: confirm, then remove.
pub async fn delete<E: Entity>(
    ctx: &Context,
    id: RecordId,
    list_command: &str,
    describe: impl Fn(&E) -> String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctrl = loaded::<E>(ctx, ctx.page_size, global).await?;
    let record = find(&ctrl, id, list_command)?;
    ctrl.request_delete(&record)?;

    let prompt = format!("Delete {} '{}'?", E::NAME, describe(&record));
    if !util::confirm(&prompt, global)? {
        ctrl.cancel_delete();
        output::status("Cancelled.", global.quiet);
        return Ok(());
    }

    ctrl.confirm_delete().await?;
    announce(ctrl.notification(), global);
    Ok(())
}

pub fn announce(note: Option<Notification>, global: &GlobalOpts) {
    if let Some(note) = note {
        output::print_notification(&note, &global.color, global.quiet);
    }
}
