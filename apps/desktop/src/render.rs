use std::fmt::{self, Write};

use chrono::{DateTime, Local};
use client_core::{
    conversation::ConversationView,
    deals::{DealView, EmptyDeals},
    recommendations::RecommendationView,
    Sender, CHAT_DEMO_NOTICE, DEALS_FALLBACK_NOTICE, RECOMMENDATIONS_DEMO_NOTICE,
};

pub fn recommendations(
    out: &mut impl Write,
    view: &RecommendationView,
    now: DateTime<Local>,
) -> fmt::Result {
    let city = view.display_city().unwrap_or("unknown");
    writeln!(out, "Recommendations for {city} ({})", now.format("%H:%M:%S"))?;
    if view.demo_mode {
        writeln!(out, "{RECOMMENDATIONS_DEMO_NOTICE}")?;
    }
    if let Some(error) = &view.error {
        return writeln!(out, "{error}");
    }
    for warning in &view.warnings {
        writeln!(out, "note: {warning}")?;
    }
    if let Some(weather) = &view.context.weather {
        writeln!(
            out,
            "Weather: {} {:.1}°C, humidity {:.0}%",
            weather.condition, weather.temperature_c, weather.humidity
        )?;
    }
    if !view.context.festivals.is_empty() {
        let names: Vec<_> = view.context.festivals.iter().map(|f| f.name.as_str()).collect();
        writeln!(out, "Festivals: {}", names.join(", "))?;
    }
    writeln!(out)?;
    for recommendation in &view.recommendations {
        writeln!(
            out,
            "* {} ({}) {}% match [{}]",
            recommendation.dish_name,
            recommendation.cuisine,
            recommendation.confidence_percent(),
            recommendation.headline_tags().join(", ")
        )?;
        writeln!(out, "    {}", recommendation.display_text())?;
    }
    Ok(())
}

pub fn deals(out: &mut impl Write, view: &DealView) -> fmt::Result {
    if let Some(summary) = &view.summary {
        writeln!(
            out,
            "Savings: ₹{:.0}  High priority: {}  Avg rating: {:.1}  Updated: {}",
            summary.total_savings,
            summary.high_priority_count,
            summary.average_rating,
            summary.last_updated.with_timezone(&Local).format("%H:%M:%S")
        )?;
    }
    if !view.active_filters.is_empty() {
        let labels: Vec<_> = view.active_filters.iter().map(|t| t.label()).collect();
        writeln!(out, "Filters: {}", labels.join(" | "))?;
    }
    writeln!(out)?;
    match view.empty_reason() {
        Some(EmptyDeals::Loading) => writeln!(out, "Loading deals...")?,
        Some(EmptyDeals::NoDeals) => writeln!(out, "No deals available right now.")?,
        Some(EmptyDeals::NoMatches) => writeln!(out, "No deals match the selected filters.")?,
        None => {
            for deal in &view.visible_deals {
                write!(
                    out,
                    "* {} - {} [{} / {}]",
                    deal.restaurant, deal.deal_text, deal.deal_type, deal.urgency
                )?;
                if let Some((original, discounted)) = deal.price_pair() {
                    write!(out, " ₹{original:.0} -> ₹{discounted:.0}")?;
                }
                if let Some(expires_in) = &deal.expires_in {
                    write!(out, " (ends in {expires_in})")?;
                }
                writeln!(out)?;
            }
        }
    }
    for idea in &view.marketing_ideas {
        writeln!(out, "idea: {idea}")?;
    }
    if view.error.is_some() {
        writeln!(out, "\n{DEALS_FALLBACK_NOTICE}")?;
    }
    Ok(())
}

pub fn transcript(out: &mut impl Write, view: &ConversationView) -> fmt::Result {
    if view.demo_mode {
        writeln!(out, "{CHAT_DEMO_NOTICE}\n")?;
    }
    for message in &view.messages {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant if message.is_error => "assistant (error)",
            Sender::Assistant => "assistant",
        };
        writeln!(
            out,
            "[{}] {who}: {}",
            message.created_at.with_timezone(&Local).format("%H:%M"),
            message.text
        )?;
    }
    Ok(())
}
