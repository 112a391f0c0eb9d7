//! Event command handlers: admin management plus the student catalog.

use std::sync::Arc;

use tabled::Tabled;
use ticketdesk_core::engagement::{self, ALL_CATEGORIES};
use ticketdesk_core::{
    Category, Event, EventForm, IdRef, ListController, Notification, Screen, Severity,
};

use crate::cli::{EventFields, EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Context, resource, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Capacity")]
    capacity: i64,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.event_id,
            name: e.event_name.clone(),
            when: util::fmt_time(e.event_date_time),
            category: util::or_dash(e.category_name()),
            capacity: e.capacity,
            fee: format!("{:.2}", e.registration_fee),
            status: util::or_dash(e.status.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Organizer")]
    organizer: String,
    #[tabled(rename = "")]
    badge: String,
}

impl From<&Event> for CatalogRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.event_id,
            name: e.event_name.clone(),
            when: util::fmt_time(e.event_date_time),
            category: util::or_dash(e.category_name()),
            organizer: util::or_dash(e.organizer.as_deref()),
            badge: if engagement::is_past(e) {
                "past".into()
            } else {
                String::new()
            },
        }
    }
}

fn detail(e: &Event) -> String {
    output::detail_lines(&[
        ("ID", e.event_id.to_string()),
        ("Name", e.event_name.clone()),
        ("Description", e.description.clone().unwrap_or_default()),
        ("When", util::fmt_time(e.event_date_time)),
        ("Organizer", e.organizer.clone().unwrap_or_default()),
        ("Category", e.category_name().unwrap_or_default().to_owned()),
        ("Capacity", e.capacity.to_string()),
        ("Fee", format!("{:.2}", e.registration_fee)),
        ("Status", e.status.clone().unwrap_or_default()),
        ("Contact", e.contact_email.clone().unwrap_or_default()),
        ("Phone", e.contact_phone.clone().unwrap_or_default()),
        ("Result", e.result.clone().unwrap_or_default()),
    ])
}

// ── Form helpers ────────────────────────────────────────────────────

/// Resolve `--category` given as an id or a (case-insensitive) name.
fn resolve_category(categories: &[Arc<Category>], wanted: &str) -> Result<IdRef, CliError> {
    if let Ok(id) = wanted.trim().parse::<i64>() {
        return Ok(IdRef { id });
    }
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(wanted.trim()))
        .map(|c| IdRef { id: c.id })
        .ok_or_else(|| CliError::NotFound {
            resource_type: "category".into(),
            identifier: wanted.into(),
            list_command: "categories list".into(),
        })
}

fn apply(
    form: &mut EventForm,
    fields: EventFields,
    categories: &[Arc<Category>],
) -> Result<(), CliError> {
    let f = &mut form.fields;
    util::set(&mut f.event_name, fields.name);
    util::set(&mut f.description, fields.description);
    util::set(&mut f.event_date_time, fields.date);
    util::set(&mut f.organizer, fields.organizer);
    util::set(&mut f.capacity, fields.capacity);
    util::set(&mut f.registration_fee, fields.fee);
    util::set(&mut f.status, fields.status);
    util::set(&mut f.contact_email, fields.contact_email);
    util::set(&mut f.contact_phone, fields.contact_phone);
    util::set(&mut f.result, fields.result);
    if let Some(ref wanted) = fields.category {
        f.category = resolve_category(categories, wanted)?;
    }
    if let Some(ref path) = fields.image {
        form.image = Some(util::read_attachment(path)?);
    }
    Ok(())
}

async fn categories(
    ctx: &Context,
    global: &GlobalOpts,
) -> Result<Arc<Vec<Arc<Category>>>, CliError> {
    let ctrl = resource::loaded::<Category>(ctx, ctx.page_size, global).await?;
    Ok(ctrl.records())
}

async fn catalog(ctx: &Context, global: &GlobalOpts) -> Result<Vec<Event>, CliError> {
    let ctrl: ListController<Event> = resource::loaded(ctx, ctx.page_size, global).await?;
    Ok(ctrl.records().iter().map(|e| Event::clone(e)).collect())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List(list) => {
            ctx.gate(Screen::Events)?;
            resource::list::<Event, _>(ctx, &list, global, |e| EventRow::from(e.as_ref())).await
        }

        EventsCommand::Get(target) => {
            ctx.gate(Screen::Events)?;
            let ctrl = resource::loaded::<Event>(ctx, ctx.page_size, global).await?;
            let event = resource::find(&ctrl, target.id, "events list")?;
            let out = output::render_single(&global.output, event.as_ref(), detail, |e| {
                e.event_id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Browse { search, category } => {
            ctx.gate(Screen::StudentHome)?;
            let events = catalog(ctx, global).await?;
            let hits: Vec<Event> = engagement::filter_catalog(&events, &search, &category)
                .into_iter()
                .cloned()
                .collect();
            let out = output::render_list(&global.output, &hits, |e| CatalogRow::from(e), |e| {
                e.event_id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            if hits.is_empty() && category != ALL_CATEGORIES {
                output::status(&format!("No events in category '{category}'."), global.quiet);
            }
            Ok(())
        }

        EventsCommand::Create(fields) => {
            ctx.gate(Screen::Events)?;
            let known = categories(ctx, global).await?;
            let mut form = EventForm::default();
            apply(&mut form, fields, &known)?;
            resource::create::<Event>(ctx, form, global).await
        }

        EventsCommand::Update { id, fields } => {
            ctx.gate(Screen::Events)?;
            let known = categories(ctx, global).await?;
            resource::update::<Event>(ctx, id, "events list", global, |event, form| {
                // The list endpoint only names the category; map it back to an id.
                if form.fields.category.id == 0 {
                    if let Some(name) = event.category_name() {
                        if let Ok(found) = resolve_category(&known, name) {
                            form.fields.category = found;
                        }
                    }
                }
                apply(form, fields, &known)
            })
            .await
        }

        EventsCommand::Delete(target) => {
            ctx.gate(Screen::Events)?;
            resource::delete::<Event>(
                ctx,
                target.id,
                "events list",
                |e| e.event_name.clone(),
                global,
            )
            .await
        }

        EventsCommand::Register(target) => {
            ctx.gate(Screen::StudentHome)?;
            let events = catalog(ctx, global).await?;
            let event = events
                .iter()
                .find(|e| e.event_id == target.id)
                .ok_or_else(|| CliError::not_found("event", target.id, "events browse"))?;
            let message =
                engagement::register_for_event(&ctx.client, &ctx.session, event).await?;
            let note = Notification {
                message,
                severity: Severity::Success,
                seq: 0,
            };
            output::print_notification(&note, &global.color, global.quiet);
            Ok(())
        }
    }
}
