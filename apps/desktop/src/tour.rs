use std::fmt::Write;

use anyhow::Result;
use client_core::Dashboard;
use shared::domain::Location;
use tracing::info;

use crate::render;

/// Renders the mounted dashboard, then switches through `switches` one
/// location at a time, then asks each question in `questions`.
pub async fn walk(
    dashboard: &Dashboard,
    switches: &[Location],
    questions: &[String],
) -> Result<String> {
    let mut out = String::new();
    render_views(&mut out, dashboard).await?;

    for location in switches {
        let (recommendations, deals) = dashboard.select_location(location.clone()).await;
        info!("desktop: switched location={location} recommendations={recommendations:?} deals={deals:?}");
        writeln!(out, "\n== {location} ==")?;
        render_views(&mut out, dashboard).await?;
    }

    if !questions.is_empty() {
        for question in questions {
            dashboard.submit_chat(question).await;
        }
        writeln!(out)?;
        render::transcript(&mut out, &dashboard.conversation.view().await)?;
    }
    Ok(out)
}

async fn render_views(out: &mut String, dashboard: &Dashboard) -> Result<()> {
    render::recommendations(
        out,
        &dashboard.recommendations.view().await,
        dashboard.recommendations.current_time(),
    )?;
    writeln!(out)?;
    render::deals(out, &dashboard.deals.view().await)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/tour_tests.rs"]
mod tests;
