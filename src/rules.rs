// 🏷️ Extraction Rules - Rules as Data
// Priority-ranked pattern matchers for free-text fields (reference number, person name)

use regex::Regex;

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Which part of a regex match a rule yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// The whole matched text
    Whole,
    /// A numbered capture group
    Group(usize),
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Rule ID for tracking
    pub id: String,

    /// Pattern searched for anywhere in the text
    pub pattern: Regex,

    /// Part of the first match that becomes the value
    pub capture: Capture,

    /// The trimmed value must be strictly longer than this (in characters)
    pub min_len: usize,

    /// Priority (higher = tried first)
    pub priority: i32,
}

impl PatternRule {
    pub fn new(id: &str, pattern: &str, capture: Capture) -> Result<Self, regex::Error> {
        Ok(PatternRule {
            id: id.to_string(),
            pattern: Regex::new(pattern)?,
            capture,
            min_len: 0,
            priority: 0,
        })
    }

    /// Builder pattern: require values longer than `min_len` characters
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Builder pattern: set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Apply the rule to the first match in `text`.
    ///
    /// Only the first match is considered. If its captured value is too short
    /// the rule yields nothing; later matches of the same pattern are not tried.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let m = match self.capture {
            Capture::Whole => caps.get(0),
            Capture::Group(i) => caps.get(i),
        }?;

        let value = m.as_str().trim();
        if value.is_empty() || value.chars().count() <= self.min_len {
            return None;
        }
        Some(value.to_string())
    }
}

// ============================================================================
// RULE MATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub value: String,
    pub rule_id: String,
}

// ============================================================================
// RULE ENGINE
// ============================================================================

/// Ordered rule list: the first rule that yields a value wins.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<PatternRule>,
}

impl RuleEngine {
    /// Create a new empty rule engine
    pub fn new() -> Self {
        RuleEngine { rules: Vec::new() }
    }

    /// Create engine from a list of rules
    ///
    /// Rules with equal priority keep their given order.
    pub fn from_rules(mut rules: Vec<PatternRule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        RuleEngine { rules }
    }

    /// Add a single rule
    pub fn add_rule(&mut self, rule: PatternRule) {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Run rules in priority order and return the first value produced
    pub fn first_match(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| {
            rule.apply(text).map(|value| RuleMatch {
                value,
                rule_id: rule.id.clone(),
            })
        })
    }

    /// Rule IDs in evaluation order
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
