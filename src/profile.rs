//! Built-in agent profiles
//!
//! A profile fixes an agent's name, default port, card and the keyword
//! rules it answers with when no model is configured.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    protocol::{AgentCapabilities, AgentCard, AgentInterface},
    responder::{
        travel::{parse_destination, TRIP_PHRASES},
        KeywordResponder, Rule,
    },
};

pub const SIMPLE_AGENT: &str = "SimpleA2AAgent";
pub const INTERFACE_AGENT: &str = "InterfaceAgent";
pub const TRAVEL_AGENT: &str = "TravelAgent";
pub const CALENDAR_AGENT: &str = "CalendarAgent";
pub const EXPENSE_AGENT: &str = "ExpenseAgent";
pub const WEATHER_AGENT: &str = "WeatherAgent";

const AVAILABLE_BUDGET: u32 = 5_000;
const DEFAULT_TRIP_COST: u32 = 2_000;

/// Which agent to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// Standalone demo agent with no peers
    Simple,
    /// Routes requests to the specialist agents
    Interface,
    Travel,
    Calendar,
    Expense,
    Weather,
}

impl AgentKind {
    /// The agents started together by `mesh`, router first
    pub const MESH: [AgentKind; 5] = [
        AgentKind::Interface,
        AgentKind::Travel,
        AgentKind::Calendar,
        AgentKind::Expense,
        AgentKind::Weather,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Simple => SIMPLE_AGENT,
            AgentKind::Interface => INTERFACE_AGENT,
            AgentKind::Travel => TRAVEL_AGENT,
            AgentKind::Calendar => CALENDAR_AGENT,
            AgentKind::Expense => EXPENSE_AGENT,
            AgentKind::Weather => WEATHER_AGENT,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [AgentKind::Simple]
            .into_iter()
            .chain(Self::MESH)
            .find(|kind| kind.name() == name)
    }

    pub fn default_port(self) -> u16 {
        match self {
            AgentKind::Simple | AgentKind::Interface => 8000,
            AgentKind::Travel => 8001,
            AgentKind::Calendar => 8002,
            AgentKind::Expense => 8003,
            AgentKind::Weather => 8004,
        }
    }

    /// What the agent is about, as a single word
    pub fn topic(self) -> &'static str {
        match self {
            AgentKind::Simple => "demo",
            AgentKind::Interface => "routing",
            AgentKind::Travel => "travel",
            AgentKind::Calendar => "calendar",
            AgentKind::Expense => "expense",
            AgentKind::Weather => "weather",
        }
    }

    pub fn description(self) -> String {
        match self {
            AgentKind::Simple => "A demonstration A2A protocol agent".to_string(),
            AgentKind::Interface => {
                "Routes natural-language requests to the right specialist agents".to_string()
            }
            _ => format!(
                "A specialized {} agent for multi-agent collaboration",
                self.topic()
            ),
        }
    }

    /// Capability tags advertised in the card
    pub fn capabilities(self) -> &'static [&'static str] {
        match self {
            AgentKind::Simple => &["text_processing", "task_management", "simple_calculations"],
            AgentKind::Interface => &["natural_language_routing", "coordination"],
            AgentKind::Travel => &[
                "trip_planning",
                "flight_booking",
                "hotel_booking",
                "coordination",
            ],
            AgentKind::Calendar => &[
                "schedule_management",
                "availability_checking",
                "calendar_blocking",
            ],
            AgentKind::Expense => &[
                "budget_management",
                "expense_tracking",
                "policy_validation",
            ],
            AgentKind::Weather => &[
                "weather_forecasting",
                "travel_recommendations",
                "packing_advice",
            ],
        }
    }

    /// Agent card served at `/.well-known/agent.json`
    pub fn card(self, base_url: &str) -> AgentCard {
        let mut capabilities = AgentCapabilities::new().with_text_generation();
        if self != AgentKind::Simple {
            capabilities = capabilities.with_real_time_interaction();
        }

        self.capabilities()
            .iter()
            .fold(
                AgentCard::new(self.name(), self.description()),
                |card, tag| card.with_capability(*tag),
            )
            .with_capabilities(capabilities)
            .with_interface(AgentInterface::a2a(base_url))
    }

    /// System prompt for model-backed replies
    pub fn persona(self) -> String {
        match self {
            AgentKind::Simple => {
                "You are a friendly demo agent. Keep answers to one or two sentences.".to_string()
            }
            AgentKind::Interface => {
                "You route requests between travel, calendar, expense and weather agents."
                    .to_string()
            }
            _ => format!(
                "You are the {}, {}. Answer concisely and stay within your specialty: {}.",
                self.name(),
                self.description().to_lowercase(),
                self.capabilities().join(", ").replace('_', " ")
            ),
        }
    }

    /// Deterministic keyword responder for this agent
    pub fn keyword_responder(self) -> KeywordResponder {
        KeywordResponder::new(self.rules(), self.fallback())
    }

    fn rules(self) -> Vec<Rule> {
        match self {
            AgentKind::Simple => vec![
                Rule::new(&["hello", "hi"], |_| {
                    "Hello! I'm a simple A2A agent. I can help with basic tasks, calculations, or just chat!"
                        .to_string()
                }),
                Rule::new(
                    &["calculate", "math", "2+2", "2 + 2", "10*5", "10 * 5"],
                    simple_math,
                ),
                Rule::new(&["time"], |_| {
                    format!(
                        "Current time is: {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
                    )
                }),
                Rule::new(&["joke"], |_| {
                    "Why did the AI cross the road? To get to the other protocol!".to_string()
                }),
                Rule::new(&["help"], |_| {
                    "I can help with:\n\
                     - Greetings (say hello!)\n\
                     - Simple math (ask me to calculate 2+2)\n\
                     - Current time\n\
                     - Tell jokes\n\
                     - General conversation"
                        .to_string()
                }),
            ],
            AgentKind::Interface => Vec::new(),
            AgentKind::Travel => vec![
                Rule::new(&["hello", "hi"], |_| {
                    "Hello! I'm the Travel Agent. I can help you plan and book trips. \
                     Try asking me to 'book a trip to London for 3 days'."
                        .to_string()
                }),
                Rule::new(&["trip", "travel", "flight", "hotel", "vacation"], |_| {
                    "I can plan the whole trip, checking calendar, budget and weather with the \
                     other agents. Try 'book a trip to London for 3 days'."
                        .to_string()
                }),
            ],
            AgentKind::Calendar => vec![
                Rule::new(
                    &["available", "availability", "dates", "schedule", "trip"],
                    |_| availability_report(),
                ),
                Rule::new(&["block", "reserve"], |_| {
                    "Calendar blocked successfully. Meeting invites sent to stakeholders."
                        .to_string()
                }),
                Rule::new(&["hello", "hi"], |_| {
                    "Hello! I'm the Calendar Agent. I manage schedules and check availability \
                     for trips and meetings."
                        .to_string()
                }),
            ],
            AgentKind::Expense => vec![
                Rule::new(&["budget", "cost", "expense", "trip"], budget_analysis),
                Rule::new(&["approve", "approval"], |_| {
                    "Expense approved! Reference number: EXP-2024-0415-001".to_string()
                }),
                Rule::new(&["hello", "hi"], |_| {
                    "Hello! I'm the Expense Agent. I manage budgets, validate costs, and ensure \
                     policy compliance."
                        .to_string()
                }),
            ],
            AgentKind::Weather => vec![
                Rule::new(&["weather", "forecast", "trip"], weather_forecast),
                Rule::new(&["pack", "packing", "clothing"], |_| {
                    "Pack layers, a waterproof jacket, business attire, and comfortable shoes \
                     for mild spring weather!"
                        .to_string()
                }),
                Rule::new(&["hello", "hi"], |_| {
                    "Hello! I'm the Weather Agent. I provide weather forecasts and travel \
                     packing recommendations."
                        .to_string()
                }),
            ],
        }
    }

    fn fallback(self) -> fn(&str) -> String {
        match self {
            AgentKind::Simple => |text: &str| {
                format!(
                    "I received your message: '{}'. I'm a simple demo agent, so my responses \
                     are limited. Try asking for help!",
                    text
                )
            },
            AgentKind::Interface => |text: &str| {
                format!(
                    "I'm the Interface Agent. I route requests to the travel, calendar, expense \
                     and weather agents. You said: '{}'",
                    text
                )
            },
            AgentKind::Travel => |text: &str| {
                format!(
                    "I'm the Travel Agent. I can help with trip planning and booking. You said: '{}'",
                    text
                )
            },
            AgentKind::Calendar => |text: &str| {
                format!(
                    "I'm the Calendar Agent. I can check availability and manage schedules. \
                     You asked: '{}'",
                    text
                )
            },
            AgentKind::Expense => |text: &str| {
                format!(
                    "I'm the Expense Agent. I handle budget and expense management. \
                     You mentioned: '{}'",
                    text
                )
            },
            AgentKind::Weather => |text: &str| {
                format!(
                    "I'm the Weather Agent. I can help with weather forecasts and packing \
                     advice. You asked: '{}'",
                    text
                )
            },
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn simple_math(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains("2+2") {
        "2 + 2 = 4".to_string()
    } else if compact.contains("10*5") {
        "10 * 5 = 50".to_string()
    } else {
        "I can do simple math! Try asking me '2+2' or '10*5'".to_string()
    }
}

fn availability_report() -> String {
    "CALENDAR AVAILABILITY REPORT:\n\n\
     2024-04-15 to 2024-04-17\n   Conflicts: none\n   Confidence: high\n\n\
     2024-05-08 to 2024-05-10\n   Conflicts: minor meeting (moveable)\n   Confidence: medium\n\n\
     Recommendation: April 15-17 looks perfect with no conflicts!"
        .to_string()
}

/// First `$amount` in the text, e.g. `$2800`
fn dollar_amount(text: &str) -> Option<u32> {
    text.split_whitespace()
        .filter_map(|word| word.strip_prefix('$'))
        .find_map(|amount| {
            let digits: String = amount
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == ',')
                .filter(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        })
}

fn budget_analysis(text: &str) -> String {
    let cost = dollar_amount(text).unwrap_or(DEFAULT_TRIP_COST);
    let status = if cost <= AVAILABLE_BUDGET {
        "APPROVED"
    } else {
        "NEEDS REVIEW"
    };

    format!(
        "BUDGET ANALYSIS REPORT:\n\n\
         Available Budget: ${AVAILABLE_BUDGET}\n\
         Estimated Cost: ${cost}\n\
         Status: {status}\n\n\
         Policy Compliance:\n  \
         - Within daily limits ($300/day)\n  \
         - Business class flight approved\n  \
         - 4-star hotel approved\n  \
         - Expense category: Business Travel\n\n\
         Recommendations:\n  \
         - Remaining budget after trip: ${remaining}\n  \
         - Pre-approval code: BT-2024-0415",
        remaining = AVAILABLE_BUDGET.saturating_sub(cost)
    )
}

/// Capitalised place named after "to", "for" or "in"
fn place(text: &str) -> Option<String> {
    parse_destination(text).or_else(|| {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .windows(2)
            .filter(|pair| matches!(pair[0].to_lowercase().as_str(), "for" | "in"))
            .map(|pair| pair[1].trim_matches(|c: char| !c.is_alphanumeric()))
            .find(|word| word.chars().next().is_some_and(char::is_uppercase))
            .map(str::to_string)
    })
}

fn weather_forecast(text: &str) -> String {
    let place = place(text).unwrap_or_else(|| "DESTINATION".to_string());
    format!(
        "{} WEATHER FORECAST:\n\n\
         Next available window:\n  \
         Day 1: Partly cloudy, 16°C (61°F)\n  \
         Day 2: Light rain, 14°C (57°F)\n  \
         Day 3: Sunny, 18°C (64°F)\n\n\
         PACKING RECOMMENDATIONS:\n  \
         - Light waterproof jacket (rain expected)\n  \
         - Business attire for meetings\n  \
         - Comfortable walking shoes\n  \
         - Umbrella (essential for Day 2)\n  \
         - Layers (temperatures vary)\n\n\
         Overall: mild temperatures with possible rain.",
        place.to_uppercase()
    )
}

/// Whether `text` asks for a whole trip to be planned
pub fn is_trip_request(text: &str) -> bool {
    crate::responder::keyword::mentions_any(text, TRIP_PHRASES)
}
