//! Per-word sign ordinals.
//!
//! Rows are grouped by word unit, so a sign's position inside its word is its
//! position inside the current run of rows sharing a word-unit id. The state
//! is carried in the job state from one chunk to the next.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    pub last_word_unit_id: Option<String>,
    pub sign_counter: u32,
}

impl Default for SequenceState {
    fn default() -> Self {
        Self {
            last_word_unit_id: None,
            sign_counter: 1,
        }
    }
}

impl SequenceState {
    /// Sign sequence for the next row of `word_unit_id`.
    ///
    /// Starting a different word unit resets the counter to 1.
    pub fn begin(&mut self, word_unit_id: Option<&str>) -> u32 {
        if self.last_word_unit_id.as_deref() != word_unit_id {
            self.sign_counter = 1;
        }
        self.sign_counter
    }

    /// Record the outcome of the row started with [`begin`](Self::begin).
    ///
    /// Only a successful row consumes a position.
    pub fn finish(&mut self, word_unit_id: Option<&str>, succeeded: bool) {
        if succeeded {
            self.sign_counter += 1;
        }
        self.last_word_unit_id = word_unit_id.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(rows: &[(&str, bool)]) -> Vec<u32> {
        let mut state = SequenceState::default();
        rows.iter()
            .map(|(unit, ok)| {
                let seq = state.begin(Some(unit));
                state.finish(Some(unit), *ok);
                seq
            })
            .collect()
    }

    #[test]
    fn restarts_for_each_word_unit() {
        let seqs = run(&[
            ("7", true),
            ("7", true),
            ("7", true),
            ("8", true),
            ("8", true),
        ]);
        assert_eq!(seqs, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn failed_row_does_not_consume_a_position() {
        let seqs = run(&[("7", true), ("7", false), ("7", true)]);
        assert_eq!(seqs, vec![1, 2, 2]);
    }

    #[test]
    fn failed_first_row_still_marks_the_word_unit() {
        let seqs = run(&[("7", false), ("7", true), ("8", false), ("8", true)]);
        assert_eq!(seqs, vec![1, 1, 1, 1]);
    }

    #[test]
    fn state_survives_a_serialization_boundary() {
        let mut state = SequenceState::default();
        state.begin(Some("7"));
        state.finish(Some("7"), true);

        let json = serde_json::to_string(&state).unwrap();
        let mut resumed: SequenceState = serde_json::from_str(&json).unwrap();
        assert_eq!(resumed.begin(Some("7")), 2);
    }

    proptest! {
        #[test]
        fn successful_sequences_count_up_from_one(
            groups in proptest::collection::vec(1usize..6, 1..20)
        ) {
            let mut state = SequenceState::default();
            for (idx, len) in groups.iter().enumerate() {
                let unit = idx.to_string();
                let seqs: Vec<u32> = (0..*len)
                    .map(|_| {
                        let seq = state.begin(Some(unit.as_str()));
                        state.finish(Some(unit.as_str()), true);
                        seq
                    })
                    .collect();
                let expected: Vec<u32> = (1..=*len as u32).collect();
                prop_assert_eq!(seqs, expected);
            }
        }

        #[test]
        fn sequences_never_skip_within_a_word(outcomes in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut state = SequenceState::default();
            let mut successes = 0u32;
            for ok in outcomes {
                let seq = state.begin(Some("w"));
                prop_assert_eq!(seq, successes + 1);
                state.finish(Some("w"), ok);
                if ok {
                    successes += 1;
                }
            }
        }
    }
}
