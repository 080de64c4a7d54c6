use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::models::Entry;

const BACK_MATTER_SECTIONS: &[&str] = &[
    "see also",
    "notes",
    "references",
    "further reading",
    "bibliography",
    "external links",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Keep,
    Drop { rule: &'static str, reason: String },
}

impl FilterDecision {
    pub fn is_keep(&self) -> bool {
        matches!(self, FilterDecision::Keep)
    }
}

/// One exclusion heuristic. Every variant is a drop-rule; an entry that
/// no rule drops is kept.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Section heading path mentions animation.
    AnimationSection(Regex),
    /// Article furniture after the lists (references, external links, ...).
    BackMatter(Vec<String>),
    /// Entry text names a one-off special or TV movie (lowercase keywords).
    StandaloneSpecial(Vec<String>),
    /// No air-date year could be inferred.
    MissingYear,
}

impl Rule {
    pub fn animation_section() -> anyhow::Result<Self> {
        Ok(Rule::AnimationSection(Regex::new(
            r"(?i)\b(animation|animated)\b",
        )?))
    }

    pub fn back_matter() -> Self {
        Rule::BackMatter(BACK_MATTER_SECTIONS.iter().map(|s| s.to_string()).collect())
    }

    pub fn standalone_special<S: AsRef<str>>(keywords: &[S]) -> Self {
        Rule::StandaloneSpecial(
            keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::AnimationSection(_) => "animation-section",
            Rule::BackMatter(_) => "back-matter",
            Rule::StandaloneSpecial(_) => "standalone-special",
            Rule::MissingYear => "missing-year",
        }
    }

    pub fn evaluate(&self, entry: &Entry) -> FilterDecision {
        let reason = match self {
            Rule::AnimationSection(re) => re
                .is_match(&entry.section)
                .then(|| format!("section \"{}\" is animated", entry.section)),
            Rule::BackMatter(sections) => {
                let top = entry
                    .section
                    .split(" > ")
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                sections
                    .iter()
                    .any(|s| *s == top)
                    .then(|| format!("section \"{}\" is not part of the list", entry.section))
            }
            Rule::StandaloneSpecial(keywords) => {
                let text = entry.text.to_lowercase();
                keywords
                    .iter()
                    .find(|k| text.contains(k.as_str()))
                    .map(|k| format!("text mentions \"{k}\""))
            }
            Rule::MissingYear => entry
                .year
                .is_none()
                .then(|| "no air-date year".to_string()),
        };

        match reason {
            Some(reason) => FilterDecision::Drop {
                rule: self.name(),
                reason,
            },
            None => FilterDecision::Keep,
        }
    }
}

/// Ordered rules; the first rule that drops an entry decides.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(vec![
            Rule::animation_section()?,
            Rule::back_matter(),
            Rule::standalone_special(config.specials_keywords.as_slice()),
            Rule::MissingYear,
        ]))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn decide(&self, entry: &Entry) -> FilterDecision {
        self.rules
            .iter()
            .map(|rule| rule.evaluate(entry))
            .find(|decision| !decision.is_keep())
            .unwrap_or(FilterDecision::Keep)
    }

    /// Keep entries no rule drops, in their original order.
    pub fn apply(&self, entries: &[Entry]) -> Vec<Entry> {
        let mut dropped: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut kept = Vec::new();

        for entry in entries {
            match self.decide(entry) {
                FilterDecision::Keep => kept.push(entry.clone()),
                FilterDecision::Drop { rule, reason } => {
                    debug!(raw = %entry.raw, "Dropped [{rule}] {reason}: {}", entry.text);
                    *dropped.entry(rule).or_default() += 1;
                }
            }
        }

        for (rule, count) in &dropped {
            info!("Rule {rule} dropped {count} entries");
        }
        info!("Entries after filtering: {} of {}", kept.len(), entries.len());
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, year: Option<u16>, section: &str) -> Entry {
        Entry {
            text: text.to_string(),
            year,
            section: section.to_string(),
            raw: format!("<li>{text}</li>"),
        }
    }

    fn rules() -> RuleSet {
        RuleSet::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_animated_section_dropped_regardless_of_text() {
        let e = entry("The Office: \"Christmas Party\" (2005)", Some(2005), "Animated (list)");
        match rules().decide(&e) {
            FilterDecision::Drop { rule, .. } => assert_eq!(rule, "animation-section"),
            FilterDecision::Keep => panic!("animated entry was kept"),
        }
    }

    #[test]
    fn test_nested_animation_heading_dropped() {
        let e = entry("Marge Be Not Proud (1995)", Some(1995), "Animation > The Simpsons");
        assert!(!rules().decide(&e).is_keep());
    }

    #[test]
    fn test_standalone_special_dropped() {
        let e = entry("A Christmas Carol (1951 TV special)", Some(1951), "Live-action");
        assert_eq!(
            rules().decide(&e),
            FilterDecision::Drop {
                rule: "standalone-special",
                reason: "text mentions \"tv special\"".to_string(),
            }
        );
    }

    #[test]
    fn test_series_episode_kept() {
        let e = entry(
            "The Office \u{2014} 'Christmas Party' (2005)",
            Some(2005),
            "Live-action > Sitcoms",
        );
        assert_eq!(rules().decide(&e), FilterDecision::Keep);
    }

    #[test]
    fn test_missing_year_dropped() {
        let e = entry("Undated entry", None, "Live-action");
        match rules().decide(&e) {
            FilterDecision::Drop { rule, .. } => assert_eq!(rule, "missing-year"),
            FilterDecision::Keep => panic!("undated entry was kept"),
        }
    }

    #[test]
    fn test_back_matter_dropped() {
        let e = entry("Smith, J. (2010). Holiday TV.", Some(2010), "References");
        match rules().decide(&e) {
            FilterDecision::Drop { rule, .. } => assert_eq!(rule, "back-matter"),
            FilterDecision::Keep => panic!("reference entry was kept"),
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Matches every rule; the animation rule comes first
        let e = entry("Holiday special", None, "Animated");
        match rules().decide(&e) {
            FilterDecision::Drop { rule, .. } => assert_eq!(rule, "animation-section"),
            FilterDecision::Keep => panic!("entry was kept"),
        }

        let reordered = RuleSet::new(vec![
            Rule::MissingYear,
            Rule::animation_section().unwrap(),
        ]);
        match reordered.decide(&e) {
            FilterDecision::Drop { rule, .. } => assert_eq!(rule, "missing-year"),
            FilterDecision::Keep => panic!("entry was kept"),
        }
    }

    #[test]
    fn test_custom_keywords_are_case_insensitive() {
        let set = RuleSet::new(vec![Rule::standalone_special(&["  One-Off  ", ""])]);
        assert!(!set.decide(&entry("A ONE-OFF musical (1960)", Some(1960), "")).is_keep());
        assert!(set.decide(&entry("Bewitched (1964)", Some(1964), "")).is_keep());
    }

    #[test]
    fn test_apply_is_subset_deterministic_and_idempotent() {
        let entries = vec![
            entry("Cheers (1982)", Some(1982), "Live-action"),
            entry("Rudolph (1964 TV special)", Some(1964), "Live-action"),
            entry("Frosty (1969)", Some(1969), "Animated"),
            entry("Undated", None, "Live-action"),
            entry("Frasier (1998)", Some(1998), "Live-action"),
        ];
        let set = rules();

        let once = set.apply(&entries);
        assert_eq!(
            once.iter().map(|e| e.text.as_str()).collect::<Vec<_>>(),
            vec!["Cheers (1982)", "Frasier (1998)"]
        );
        assert!(once.iter().all(|e| entries.contains(e)));
        assert!(once.iter().all(|e| e.year.is_some()));
        assert_eq!(set.apply(&entries), once);
        assert_eq!(set.apply(&once), once);
    }
}
