//! Keyword-based categorization of bank statement descriptions

/// Category used when no keyword group matches
pub const FALLBACK_CATEGORY: &str = "Misc";

/// Keyword groups in priority order; the first group with a match wins
const KEYWORD_GROUPS: [(&str, &[&str]); 5] = [
    (
        "Membership",
        &[
            "tidyhq",
            "auscycling",
            "life membership",
            "membership fee",
            "affiliation",
        ],
    ),
    ("Reimbursement", &["reimburse"]),
    ("Sponsorship", &["lake health group", "spons"]),
    (
        "Equipment",
        &[
            "troph",
            "engraving",
            "weed killer",
            "star outdoor",
            "electrical services",
            "asr electrical",
            "flowers",
        ],
    ),
    (
        "Event Fee",
        &[
            "entryboss",
            "square",
            "race entry",
            "entry",
            "permits",
            "raffle",
        ],
    ),
];

/// Classify a transaction description.
///
/// Case-insensitive substring match; pure and deterministic.
pub fn categorize(description: &str) -> &'static str {
    let value = description.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| value.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_groups() {
        assert_eq!(categorize("TidyHQ payout 1234"), "Membership");
        assert_eq!(categorize("Reimbursement - J Smith"), "Reimbursement");
        assert_eq!(categorize("Sponsorship ABC"), "Sponsorship");
        assert_eq!(categorize("Trophy shop"), "Equipment");
        assert_eq!(categorize("EntryBoss settlement"), "Event Fee");
        assert_eq!(categorize("Bank fee"), "Misc");
        assert_eq!(categorize(""), "Misc");
    }

    #[test]
    fn test_first_group_wins() {
        // matches both Membership ("affiliation") and Event Fee ("entry")
        assert_eq!(categorize("Affiliation entry"), "Membership");
        // matches both Sponsorship and Equipment
        assert_eq!(categorize("Sponsor trophies"), "Sponsorship");
    }

    #[test]
    fn test_is_stable() {
        let description = "Square deposit";
        assert_eq!(categorize(description), categorize(description));
        assert_eq!(categorize(description), "Event Fee");
    }
}
