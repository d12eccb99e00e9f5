//! Quiz scoring.
//!
//! Pure functions: each participant's stored answer is compared against the
//! item's canonical answer with exact string equality. Participants are
//! scored independently against the same ground truth, not against each
//! other; there is no partial credit.

use std::collections::HashMap;

use crate::domain::models::{ParticipantId, QuizItem};

/// Per-participant correctness for one item.
pub fn score_item(
    item: &QuizItem,
    participants: &[ParticipantId; 2],
) -> HashMap<ParticipantId, bool> {
    participants
        .iter()
        .map(|p| (*p, item.answered_correctly(*p)))
        .collect()
}

/// Aggregate totals: for each participant, the count of items where their
/// answer equals the canonical answer.
pub fn aggregate(
    items: &[QuizItem],
    participants: &[ParticipantId; 2],
) -> HashMap<ParticipantId, u32> {
    let mut totals: HashMap<ParticipantId, u32> =
        participants.iter().map(|p| (*p, 0)).collect();
    for item in items {
        for participant in participants {
            if item.answered_correctly(*participant) {
                *totals.entry(*participant).or_insert(0) += 1;
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::QuizItemSpec;
    use proptest::prelude::*;

    fn item(correct: &str, answers: &[(ParticipantId, &str)]) -> QuizItem {
        let mut item = QuizItem::from_spec(QuizItemSpec::new(
            "What should we eat?",
            vec![
                "Tacos".to_string(),
                "Pizza".to_string(),
                "Sushi".to_string(),
            ],
            correct,
        ))
        .unwrap();
        for (p, a) in answers {
            item.responses.insert(*p, (*a).to_string());
        }
        item
    }

    #[test]
    fn test_score_item_exact_match() {
        let alice = ParticipantId::new();
        let ben = ParticipantId::new();
        let item = item("Tacos", &[(alice, "Tacos"), (ben, "Pizza")]);

        let result = score_item(&item, &[alice, ben]);
        assert!(result[&alice]);
        assert!(!result[&ben]);
    }

    #[test]
    fn test_aggregate_counts_matches() {
        let alice = ParticipantId::new();
        let ben = ParticipantId::new();
        let participants = [alice, ben];
        let items = vec![
            item("Tacos", &[(alice, "Tacos"), (ben, "Pizza")]),
            item("Pizza", &[(alice, "Pizza"), (ben, "Pizza")]),
            item("Sushi", &[(alice, "Tacos"), (ben, "Sushi")]),
        ];

        let totals = aggregate(&items, &participants);
        assert_eq!(totals[&alice], 2);
        assert_eq!(totals[&ben], 2);
    }

    #[test]
    fn test_unanswered_items_score_zero() {
        let alice = ParticipantId::new();
        let ben = ParticipantId::new();
        let items = vec![item("Tacos", &[(alice, "Tacos")])];

        let totals = aggregate(&items, &[alice, ben]);
        assert_eq!(totals[&alice], 1);
        assert_eq!(totals[&ben], 0);
    }

    proptest! {
        /// Totals always equal a straight count of matching answers, and
        /// never exceed the item count.
        #[test]
        fn prop_aggregate_matches_manual_count(choices in proptest::collection::vec((0usize..3, 0usize..3), 1..8)) {
            let options = ["Tacos", "Pizza", "Sushi"];
            let alice = ParticipantId::new();
            let ben = ParticipantId::new();
            let items: Vec<QuizItem> = choices
                .iter()
                .map(|(a, b)| item("Tacos", &[(alice, options[*a]), (ben, options[*b])]))
                .collect();

            let totals = aggregate(&items, &[alice, ben]);
            let alice_expected = choices.iter().filter(|(a, _)| *a == 0).count() as u32;
            let ben_expected = choices.iter().filter(|(_, b)| *b == 0).count() as u32;
            prop_assert_eq!(totals[&alice], alice_expected);
            prop_assert_eq!(totals[&ben], ben_expected);
            prop_assert!(totals[&alice] as usize <= items.len());
        }
    }
}
