use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use shared::{
    domain::{Deal, DealType, Location, Urgency},
    protocol::{DealRequest, DealResponse},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    api::SharedFoodApi,
    error::FetchError,
    fallback::fallback_deals,
    fetch::{DataSource, FetchPhase, LoadingTracker},
};

#[derive(Debug, Clone, PartialEq)]
pub struct DealSummary {
    pub total_savings: f64,
    pub high_priority_count: u32,
    pub average_rating: f64,
    pub last_updated: DateTime<Utc>,
}

impl DealSummary {
    /// Derives every statistic from the deal list alone.
    pub fn derive(deals: &[Deal], last_updated: DateTime<Utc>) -> Self {
        Self {
            total_savings: total_savings(deals),
            high_priority_count: high_priority_count(deals),
            average_rating: average_rating(deals),
            last_updated,
        }
    }

    /// Takes whatever the server computed and fills each missing field from
    /// the deal list independently.
    pub fn reconcile(response: &DealResponse, settled_at: DateTime<Utc>) -> Self {
        let deals = &response.deals;
        Self {
            total_savings: response
                .total_savings
                .unwrap_or_else(|| total_savings(deals)),
            high_priority_count: response
                .high_priority_count
                .unwrap_or_else(|| high_priority_count(deals)),
            average_rating: response
                .average_rating
                .unwrap_or_else(|| average_rating(deals)),
            last_updated: response.parsed_timestamp().unwrap_or(settled_at),
        }
    }
}

pub fn total_savings(deals: &[Deal]) -> f64 {
    deals.iter().map(Deal::savings).sum()
}

pub fn high_priority_count(deals: &[Deal]) -> u32 {
    deals
        .iter()
        .filter(|deal| deal.urgency == Urgency::High)
        .count() as u32
}

/// Mean over deals that carry a rating; 0 when none do.
pub fn average_rating(deals: &[Deal]) -> f64 {
    let (sum, count) = deals
        .iter()
        .filter_map(|deal| deal.rating)
        .fold((0.0, 0u32), |(sum, count), rating| (sum + rating, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// One selectable deal filter. A token names either an urgency or a deal
/// type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterToken {
    Urgency(Urgency),
    Type(DealType),
}

impl FilterToken {
    pub const VOCABULARY: [FilterToken; 5] = [
        FilterToken::Urgency(Urgency::High),
        FilterToken::Urgency(Urgency::Medium),
        FilterToken::Type(DealType::Clearance),
        FilterToken::Type(DealType::ClosingSoon),
        FilterToken::Type(DealType::Innovative),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgency(urgency) => urgency.as_str(),
            Self::Type(deal_type) => deal_type.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Urgency(Urgency::High) => "High Urgency",
            Self::Urgency(Urgency::Medium) => "Medium Urgency",
            Self::Urgency(Urgency::Low) => "Low Urgency",
            Self::Urgency(Urgency::Other) => "Other Urgency",
            Self::Type(DealType::Clearance) => "Clearance",
            Self::Type(DealType::ClosingSoon) => "Closing Soon",
            Self::Type(DealType::SlowSales) => "Slow Sales",
            Self::Type(DealType::Innovative) => "Innovative",
            Self::Type(DealType::Other) => "Other",
        }
    }

    pub fn matches(self, deal: &Deal) -> bool {
        match self {
            Self::Urgency(urgency) => deal.urgency == urgency,
            Self::Type(deal_type) => deal.deal_type == deal_type,
        }
    }
}

impl fmt::Display for FilterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown deal filter '{0}'")]
pub struct UnknownFilter(pub String);

impl FromStr for FilterToken {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let urgency = Urgency::from_wire(s);
        if urgency != Urgency::Other {
            return Ok(Self::Urgency(urgency));
        }
        let deal_type = DealType::from_wire(s);
        if deal_type != DealType::Other {
            return Ok(Self::Type(deal_type));
        }
        Err(UnknownFilter(s.trim().to_string()))
    }
}

/// A deal is visible when no filter is active, or when its urgency or its
/// type is among the active filters.
pub fn filter_deals<'a>(deals: &'a [Deal], active: &[FilterToken]) -> Vec<&'a Deal> {
    deals
        .iter()
        .filter(|deal| active.is_empty() || active.iter().any(|token| token.matches(deal)))
        .collect()
}

/// Why the filtered list came out empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyDeals {
    Loading,
    NoDeals,
    NoMatches,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealView {
    pub location: Option<Location>,
    pub deals: Vec<Deal>,
    pub visible_deals: Vec<Deal>,
    pub active_filters: Vec<FilterToken>,
    pub marketing_ideas: Vec<String>,
    pub summary: Option<DealSummary>,
    pub error: Option<String>,
    pub demo_mode: bool,
    pub source: Option<DataSource>,
    pub is_loading: bool,
    pub phase: FetchPhase,
}

impl DealView {
    pub fn empty_reason(&self) -> Option<EmptyDeals> {
        if !self.visible_deals.is_empty() {
            return None;
        }
        Some(if self.is_loading {
            EmptyDeals::Loading
        } else if self.deals.is_empty() {
            EmptyDeals::NoDeals
        } else {
            EmptyDeals::NoMatches
        })
    }
}

#[derive(Debug, Default)]
struct DealState {
    location: Option<Location>,
    deals: Vec<Deal>,
    marketing_ideas: Vec<String>,
    summary: Option<DealSummary>,
    active_filters: Vec<FilterToken>,
    error: Option<String>,
    demo_mode: bool,
    source: Option<DataSource>,
}

impl DealState {
    fn apply_success(&mut self, response: DealResponse, settled_at: DateTime<Utc>) {
        self.summary = Some(DealSummary::reconcile(&response, settled_at));
        self.demo_mode = response.demo_mode.unwrap_or(false);
        self.deals = response.deals;
        self.marketing_ideas = response.marketing_ideas;
        self.error = None;
        self.source = Some(DataSource::Live);
    }

    fn apply_failure(&mut self, err: &FetchError, settled_at: DateTime<Utc>) {
        let deals = fallback_deals();
        self.summary = Some(DealSummary::derive(&deals, settled_at));
        self.deals = deals;
        self.marketing_ideas.clear();
        self.error = Some(err.user_message());
        self.demo_mode = true;
        self.source = Some(DataSource::Fallback);
    }
}

/// Time-sensitive deals for one location, their aggregate statistics, and
/// a client-side filter over them.
pub struct DealController {
    api: SharedFoodApi,
    state: Mutex<DealState>,
    loading: LoadingTracker,
}

impl DealController {
    pub fn new(api: SharedFoodApi) -> Self {
        Self {
            api,
            state: Mutex::new(DealState::default()),
            loading: LoadingTracker::new(),
        }
    }

    /// Runs one fetch for `location`. On failure the sample deals are shown
    /// with statistics derived the same way as for a live list.
    pub async fn refresh(&self, location: &Location) -> DataSource {
        let _loading = self.loading.begin();
        {
            let mut state = self.state.lock().await;
            state.error = None;
            state.location = Some(location.clone());
        }
        info!("deals: fetching location={location}");

        let result = self
            .api
            .deals(DealRequest {
                location: location.clone(),
            })
            .await;

        let settled_at = Utc::now();
        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                state.apply_success(response, settled_at);
                info!(
                    "deals: fetched count={} location={location}",
                    state.deals.len()
                );
                DataSource::Live
            }
            Err(err) => {
                warn!("deals: fetch failed location={location} error={err}; showing sample deals");
                state.apply_failure(&err, settled_at);
                DataSource::Fallback
            }
        }
    }

    /// Adds the token when inactive, removes it when active. Never refetches.
    pub async fn toggle_filter(&self, token: FilterToken) -> Vec<FilterToken> {
        let mut state = self.state.lock().await;
        if let Some(position) = state.active_filters.iter().position(|t| *t == token) {
            state.active_filters.remove(position);
        } else {
            state.active_filters.push(token);
        }
        debug!("deals: filters={:?}", state.active_filters);
        state.active_filters.clone()
    }

    pub async fn clear_filters(&self) {
        self.state.lock().await.active_filters.clear();
    }

    pub async fn active_filters(&self) -> Vec<FilterToken> {
        self.state.lock().await.active_filters.clone()
    }

    pub async fn visible_deals(&self) -> Vec<Deal> {
        let state = self.state.lock().await;
        filter_deals(&state.deals, &state.active_filters)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn view(&self) -> DealView {
        let state = self.state.lock().await;
        let is_loading = self.loading.is_loading();
        DealView {
            location: state.location.clone(),
            deals: state.deals.clone(),
            visible_deals: filter_deals(&state.deals, &state.active_filters)
                .into_iter()
                .cloned()
                .collect(),
            active_filters: state.active_filters.clone(),
            marketing_ideas: state.marketing_ideas.clone(),
            summary: state.summary.clone(),
            error: state.error.clone(),
            demo_mode: state.demo_mode,
            source: state.source,
            is_loading,
            phase: FetchPhase::resolve(is_loading, state.source),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }
}

#[cfg(test)]
#[path = "tests/deals_tests.rs"]
mod tests;
