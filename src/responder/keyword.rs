//! Keyword-rule responder

use std::collections::HashSet;

use async_trait::async_trait;

use crate::protocol::A2AError;

use super::{Reply, Responder, ResponderContext};

/// Builds a reply from the original message text
pub type ReplyFn = fn(&str) -> String;

/// One keyword rule
///
/// Plain keywords match whole words, so `hi` does not fire on `this`.
/// Keywords containing anything but letters and digits (`book a trip`,
/// `2+2`) match as substrings of the lowercased text.
#[derive(Clone)]
pub struct Rule {
    keywords: Vec<&'static str>,
    reply: ReplyFn,
}

impl Rule {
    pub fn new(keywords: &[&'static str], reply: ReplyFn) -> Self {
        Self {
            keywords: keywords.to_vec(),
            reply,
        }
    }

    fn matches(&self, lowered: &str, words: &HashSet<&str>) -> bool {
        self.keywords.iter().any(|keyword| {
            if keyword.chars().all(char::is_alphanumeric) {
                words.contains(keyword)
            } else {
                lowered.contains(keyword)
            }
        })
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("keywords", &self.keywords)
            .finish()
    }
}

/// Split lowercased text into its alphanumeric words
pub fn words(lowered: &str) -> HashSet<&str> {
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Whether `text` contains any of `keywords`, using the same matching as [`Rule`]
pub fn mentions_any(text: &str, keywords: &[&'static str]) -> bool {
    let lowered = text.to_lowercase();
    Rule::new(keywords, |_| String::new()).matches(&lowered, &words(&lowered))
}

/// Answers with the first rule that matches, in declaration order
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    rules: Vec<Rule>,
    fallback: ReplyFn,
}

impl KeywordResponder {
    pub fn new(rules: Vec<Rule>, fallback: ReplyFn) -> Self {
        Self { rules, fallback }
    }

    /// Deterministic reply for `text`
    pub fn reply_for(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let words = words(&lowered);

        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered, &words))
            .map_or_else(|| (self.fallback)(text), |rule| (rule.reply)(text))
    }
}

#[async_trait]
impl Responder for KeywordResponder {
    async fn respond(&self, text: &str, _context: &ResponderContext) -> Result<Reply, A2AError> {
        Ok(Reply::Done(self.reply_for(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> KeywordResponder {
        KeywordResponder::new(
            vec![
                Rule::new(&["hello", "hi"], |_| "greeting".to_string()),
                Rule::new(&["2+2", "calculate"], |_| "math".to_string()),
                Rule::new(&["plan a trip"], |_| "trip".to_string()),
            ],
            |text| format!("echo: {}", text),
        )
    }

    #[test]
    fn test_whole_word_matching() {
        let responder = responder();
        assert_eq!(responder.reply_for("Hi there"), "greeting");
        assert_eq!(responder.reply_for("Hello!"), "greeting");
        assert_eq!(responder.reply_for("this is it"), "echo: this is it");
    }

    #[test]
    fn test_phrase_matching() {
        let responder = responder();
        assert_eq!(responder.reply_for("what is 2+2?"), "math");
        assert_eq!(responder.reply_for("Please PLAN A TRIP for me"), "trip");
    }

    #[test]
    fn test_rules_in_declaration_order() {
        assert_eq!(responder().reply_for("hi, calculate 2+2"), "greeting");
    }

    #[test]
    fn test_mentions_any() {
        assert!(mentions_any("What's the forecast?", &["forecast"]));
        assert!(!mentions_any("forecasting", &["forecast"]));
        assert!(mentions_any("I want to book a trip", &["book a trip"]));
    }

    #[tokio::test]
    async fn test_respond_is_done() {
        let reply = responder()
            .respond("hello", &ResponderContext::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Done("greeting".to_string()));
    }
}
