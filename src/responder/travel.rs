//! Trip planning across the calendar, expense and weather agents

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    discovery::PeerClient,
    profile::{CALENDAR_AGENT, EXPENSE_AGENT, WEATHER_AGENT},
    protocol::A2AError,
};

use super::{keyword::mentions_any, Reply, Responder, ResponderContext};

/// Phrases that ask for a whole trip to be planned
pub const TRIP_PHRASES: &[&str] = &[
    "plan a trip",
    "plan trip",
    "plan my trip",
    "book a trip",
    "book trip",
    "business trip",
    "plan a vacation",
    "book a vacation",
    "organize a trip",
];

pub const DEFAULT_DESTINATION: &str = "your destination";
pub const DEFAULT_DURATION_DAYS: u32 = 3;

/// Longest trip that gets planned; longer requests are capped to it
pub const MAX_TRIP_DAYS: u32 = 365;

/// Capitalised words in a follow-up that never name a place
const NOT_A_PLACE: &[&str] = &[
    "i", "i'm", "i'd", "i'll", "we", "we're", "my", "our", "let's", "please", "yes", "no",
    "ok", "okay", "sure", "maybe", "thanks", "the", "a", "an", "how", "what", "somewhere",
];

const FLIGHT_COST: u32 = 800;
const HOTEL_COST_PER_NIGHT: u32 = 400;

fn clean(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Capitalised word following "to", e.g. `Rome` in "a trip to Rome"
pub fn parse_destination(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .windows(2)
        .filter(|pair| clean(pair[0]).eq_ignore_ascii_case("to"))
        .map(|pair| clean(pair[1]))
        .find(|word| is_capitalized(word))
        .map(str::to_string)
}

/// Place named in a reply to "Where would you like to go?"
///
/// "to <Place>" wins; otherwise the first capitalised word that is not a
/// pronoun or filler word, so "I want Rome" and "Lisbon please" both work.
pub fn parse_follow_up_destination(text: &str) -> Option<String> {
    parse_destination(text).or_else(|| {
        text.split_whitespace()
            .map(clean)
            .filter(|word| is_capitalized(word))
            .find(|word| !NOT_A_PLACE.contains(&word.to_lowercase().as_str()))
            .map(str::to_string)
    })
}

/// Number of days, from "5 days" or "5-day", capped at [`MAX_TRIP_DAYS`]
pub fn parse_duration(text: &str) -> Option<u32> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| clean(word).to_lowercase())
        .collect();

    let days = words.iter().enumerate().find_map(|(i, word)| {
        if let Some((number, unit)) = word.split_once('-') {
            if unit.starts_with("day") {
                return parse_count(number);
            }
        }
        if word.starts_with("day") && i > 0 {
            return parse_count(&words[i - 1]);
        }
        None
    })?;
    Some(days.min(MAX_TRIP_DAYS))
}

/// A run of digits too long for `u32` still counts as "very many"
fn parse_count(number: &str) -> Option<u32> {
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(number.parse().unwrap_or(u32::MAX))
}

/// Rough cost of a trip: one flight plus a hotel night per day
pub fn estimate_cost(days: u32) -> u32 {
    HOTEL_COST_PER_NIGHT
        .saturating_mul(days)
        .saturating_add(FLIGHT_COST)
}

/// Travel agent behaviour
///
/// Trip-planning requests are answered by asking the calendar, expense and
/// weather agents in parallel. Everything else goes to `inner`.
pub struct TravelResponder {
    peers: PeerClient,
    inner: Arc<dyn Responder>,
}

impl TravelResponder {
    pub fn new(peers: PeerClient, inner: Arc<dyn Responder>) -> Self {
        Self { peers, inner }
    }

    async fn plan_trip(&self, destination: &str, days: u32, context_id: &str) -> String {
        let cost = estimate_cost(days);
        info!(%destination, days, "coordinating trip plan");

        let calendar_question = format!(
            "What dates are available for a {}-day trip in the next month?",
            days
        );
        let budget_question = format!(
            "What's the available budget for a trip to {}? Estimated cost: ${}",
            destination, cost
        );
        let weather_question = format!(
            "What's the weather forecast for {} in the next month?",
            destination
        );

        let context = Some(context_id).filter(|id| !id.is_empty());
        let (calendar, budget, weather) = futures::join!(
            self.peers.ask(CALENDAR_AGENT, &calendar_question, context),
            self.peers.ask(EXPENSE_AGENT, &budget_question, context),
            self.peers.ask(WEATHER_AGENT, &weather_question, context),
        );

        format!(
            "TRIP PLAN: {destination}, {days} days\n\n\
             AVAILABILITY ({CALENDAR_AGENT}):\n{calendar}\n\n\
             BUDGET ({EXPENSE_AGENT}):\n{budget}\n\n\
             WEATHER ({WEATHER_AGENT}):\n{weather}\n\n\
             SUMMARY:\n\
             - Destination: {destination}\n\
             - Duration: {days} days\n\
             - Estimated cost: ${cost} (flight ${FLIGHT_COST}, hotel ${HOTEL_COST_PER_NIGHT}/night x {days})"
        )
    }
}

#[async_trait]
impl Responder for TravelResponder {
    async fn respond(&self, text: &str, context: &ResponderContext) -> Result<Reply, A2AError> {
        if context.resuming {
            let original = context
                .history
                .first()
                .map(|message| message.text())
                .unwrap_or_default();
            let destination = parse_follow_up_destination(text)
                .unwrap_or_else(|| DEFAULT_DESTINATION.to_string());
            let days = parse_duration(text)
                .or_else(|| parse_duration(&original))
                .unwrap_or(DEFAULT_DURATION_DAYS);

            let plan = self.plan_trip(&destination, days, &context.context_id).await;
            return Ok(Reply::Done(plan));
        }

        if !mentions_any(text, TRIP_PHRASES) {
            return self.inner.respond(text, context).await;
        }

        match parse_destination(text) {
            Some(destination) => {
                let days = parse_duration(text).unwrap_or(DEFAULT_DURATION_DAYS);
                let plan = self.plan_trip(&destination, days, &context.context_id).await;
                Ok(Reply::Done(plan))
            }
            None => Ok(Reply::NeedsInput(
                "Where would you like to go? Reply with the destination and I'll check \
                 availability, budget and weather."
                    .to_string(),
            )),
        }
    }
}
