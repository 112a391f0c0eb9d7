//! Student recommendations.

use tabled::Tabled;
use ticketdesk_core::engagement;
use ticketdesk_core::{Event, Screen};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Event")]
    name: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Fee")]
    fee: String,
}

impl From<&Event> for RecommendationRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.event_id,
            name: e.event_name.clone(),
            when: util::fmt_time(e.event_date_time),
            category: util::or_dash(e.category_name()),
            fee: format!("{:.2}", e.registration_fee),
        }
    }
}

pub async fn recommendations(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.gate(Screen::Recommendations)?;

    let spinner = util::spinner("Loading recommendations...", global);
    let result = engagement::recommendations(&ctx.client, &ctx.session).await;
    spinner.finish_and_clear();
    let events = result?;

    let out = output::render_list(
        &global.output,
        &events,
        |e| RecommendationRow::from(e),
        |e| e.event_id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    if events.is_empty() {
        output::status(
            "No recommendations yet. Register for an event to get some.",
            global.quiet,
        );
    }
    Ok(())
}
