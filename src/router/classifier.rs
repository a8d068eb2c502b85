//! Intent classification for the interface agent

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    profile::{is_trip_request, CALENDAR_AGENT, EXPENSE_AGENT, TRAVEL_AGENT, WEATHER_AGENT},
    protocol::A2AError,
    responder::{keyword::mentions_any, TextGenerator},
};

const TRAVEL_WORDS: &[&str] = &[
    "trip",
    "travel",
    "flight",
    "flights",
    "hotel",
    "vacation",
    "getaway",
    "visit",
    "destination",
];
const CALENDAR_WORDS: &[&str] = &[
    "available",
    "availability",
    "schedule",
    "calendar",
    "meeting",
    "free",
    "dates",
    "reschedule",
];
const EXPENSE_WORDS: &[&str] = &[
    "budget", "cost", "expense", "afford", "spend", "price", "approval", "money",
];
const WEATHER_WORDS: &[&str] = &[
    "weather",
    "forecast",
    "rain",
    "temperature",
    "pack",
    "climate",
    "sunny",
];

/// Specialist agents a request can be routed to, in routing order
pub const SPECIALISTS: [&str; 4] = [TRAVEL_AGENT, CALENDAR_AGENT, EXPENSE_AGENT, WEATHER_AGENT];

/// Routing decision for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub intent_type: String,
    pub requires_coordination: bool,
    pub agents_needed: Vec<String>,
    pub primary_agent: String,
    #[serde(default)]
    pub reasoning: String,
}

impl Intent {
    fn single(intent_type: &str, agent: &str, reasoning: impl Into<String>) -> Self {
        Self {
            intent_type: intent_type.to_string(),
            requires_coordination: false,
            agents_needed: vec![agent.to_string()],
            primary_agent: agent.to_string(),
            reasoning: reasoning.into(),
        }
    }

    fn coordinated(reasoning: impl Into<String>) -> Self {
        Self {
            intent_type: "trip_planning".to_string(),
            requires_coordination: true,
            agents_needed: SPECIALISTS.iter().map(|a| a.to_string()).collect(),
            primary_agent: TRAVEL_AGENT.to_string(),
            reasoning: reasoning.into(),
        }
    }

    /// Agents other than the primary
    pub fn supporting_agents(&self) -> Vec<&str> {
        self.agents_needed
            .iter()
            .map(String::as_str)
            .filter(|agent| *agent != self.primary_agent)
            .collect()
    }

    fn is_routable(&self) -> bool {
        SPECIALISTS.contains(&self.primary_agent.as_str())
            && !self.agents_needed.is_empty()
            && self
                .agents_needed
                .iter()
                .all(|agent| SPECIALISTS.contains(&agent.as_str()))
    }
}

/// Decides which agents should handle a request
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Intent;
}

/// Keyword classifier over four topic buckets
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn classify_text(&self, text: &str) -> Intent {
        if is_trip_request(text) {
            return Intent::coordinated("explicit trip-planning request");
        }

        let travel = mentions_any(text, TRAVEL_WORDS);
        let calendar = mentions_any(text, CALENDAR_WORDS);
        let expense = mentions_any(text, EXPENSE_WORDS);
        let weather = mentions_any(text, WEATHER_WORDS);

        if travel && (calendar || expense || weather) {
            return Intent::coordinated("travel request touching other topics");
        }

        if travel {
            Intent::single("travel", TRAVEL_AGENT, "travel keywords")
        } else if calendar {
            Intent::single("calendar", CALENDAR_AGENT, "calendar keywords")
        } else if expense {
            Intent::single("expense", EXPENSE_AGENT, "expense keywords")
        } else if weather {
            Intent::single("weather", WEATHER_AGENT, "weather keywords")
        } else {
            Intent::single("general", TRAVEL_AGENT, "no topic matched, defaulting to travel")
        }
    }
}

#[async_trait]
impl Classifier for RuleBasedClassifier {
    async fn classify(&self, text: &str) -> Intent {
        self.classify_text(text)
    }
}

pub const ROUTING_PROMPT: &str = "You are the routing brain of a multi-agent travel system. \
Available agents:\n\
- TravelAgent: trip planning, flights, hotels, coordination\n\
- CalendarAgent: availability, scheduling, calendar blocking\n\
- ExpenseAgent: budgets, costs, expense approval\n\
- WeatherAgent: forecasts, packing advice\n\n\
Reply with JSON only, in this shape:\n\
{\"type\": \"<intent>\", \"requires_coordination\": true|false, \
\"agents_needed\": [\"AgentName\", ...], \"primary_agent\": \"AgentName\", \
\"reasoning\": \"<one sentence>\"}";

/// Classifies with a text-generation model, falling back to keyword rules
pub struct RemoteModelClassifier {
    generator: Arc<dyn TextGenerator>,
    fallback: RuleBasedClassifier,
}

impl RemoteModelClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            fallback: RuleBasedClassifier,
        }
    }

    async fn ask_model(&self, text: &str) -> Result<Intent, A2AError> {
        let reply = self.generator.generate(text, ROUTING_PROMPT).await?;
        let intent = parse_intent(&reply)?;
        if !intent.is_routable() {
            return Err(A2AError::Validation(format!(
                "model routed to unknown agent {}",
                intent.primary_agent
            )));
        }
        Ok(intent)
    }
}

#[async_trait]
impl Classifier for RemoteModelClassifier {
    async fn classify(&self, text: &str) -> Intent {
        match self.ask_model(text).await {
            Ok(intent) => {
                debug!(primary = %intent.primary_agent, "model classified request");
                intent
            }
            Err(e) => {
                warn!(error = %e, "model classification failed, using keyword rules");
                self.fallback.classify_text(text)
            }
        }
    }
}

/// Parse the JSON object between the first `{` and the last `}`
pub fn parse_intent(reply: &str) -> Result<Intent, A2AError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str(&reply[start..=end]).map_err(A2AError::from)
        }
        _ => Err(A2AError::Parse("no JSON object in model reply".into())),
    }
}

#[cfg(test)]
mod tests {
    use crate::responder::model::MockTextGenerator;

    use super::*;

    #[test]
    fn test_weather_only_routes_to_weather() {
        let intent = RuleBasedClassifier.classify_text("What's the forecast for Tokyo?");
        assert!(!intent.requires_coordination);
        assert_eq!(intent.primary_agent, WEATHER_AGENT);
    }

    #[test]
    fn test_trip_phrase_needs_every_specialist() {
        let intent = RuleBasedClassifier.classify_text("book a trip to Rome for 5 days");
        assert!(intent.requires_coordination);
        assert_eq!(intent.primary_agent, TRAVEL_AGENT);
        for agent in SPECIALISTS {
            assert!(intent.agents_needed.iter().any(|a| a == agent));
        }
        assert_eq!(intent.supporting_agents().len(), 3);
    }

    #[test]
    fn test_travel_plus_other_topic_coordinates() {
        let intent = RuleBasedClassifier.classify_text("Can I afford a flight to Oslo?");
        assert!(intent.requires_coordination);
    }

    #[test]
    fn test_single_buckets_and_default() {
        let classifier = RuleBasedClassifier;
        assert_eq!(
            classifier.classify_text("Am I free next Tuesday?").primary_agent,
            CALENDAR_AGENT
        );
        assert_eq!(
            classifier.classify_text("What is my budget?").primary_agent,
            EXPENSE_AGENT
        );
        let intent = classifier.classify_text("hello there");
        assert_eq!(intent.primary_agent, TRAVEL_AGENT);
        assert!(!intent.requires_coordination);
    }

    #[test]
    fn test_parse_intent_from_chatty_reply() {
        let reply = "Sure! {\"type\": \"weather\", \"requires_coordination\": false, \
                     \"agents_needed\": [\"WeatherAgent\"], \"primary_agent\": \"WeatherAgent\", \
                     \"reasoning\": \"asks about rain\"} Hope that helps.";
        let intent = parse_intent(reply).unwrap();
        assert_eq!(intent.primary_agent, WEATHER_AGENT);
        assert!(parse_intent("no json here").is_err());
    }

    #[tokio::test]
    async fn test_model_classifier_uses_model() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(1).returning(|_, _| {
            Ok(r#"{"type":"expense","requires_coordination":false,"agents_needed":["ExpenseAgent"],"primary_agent":"ExpenseAgent","reasoning":"money"}"#.to_string())
        });

        let intent = RemoteModelClassifier::new(Arc::new(generator))
            .classify("is this affordable")
            .await;
        assert_eq!(intent.primary_agent, EXPENSE_AGENT);
        assert_eq!(intent.reasoning, "money");
    }

    #[tokio::test]
    async fn test_model_classifier_falls_back() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(A2AError::Timeout));
        let intent = RemoteModelClassifier::new(Arc::new(generator))
            .classify("What's the forecast for Tokyo?")
            .await;
        assert_eq!(intent.primary_agent, WEATHER_AGENT);

        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_, _| {
            Ok(r#"{"type":"x","requires_coordination":false,"agents_needed":["PizzaAgent"],"primary_agent":"PizzaAgent"}"#.to_string())
        });
        let intent = RemoteModelClassifier::new(Arc::new(generator))
            .classify("What's the forecast for Tokyo?")
            .await;
        assert_eq!(intent.primary_agent, WEATHER_AGENT);
    }
}
