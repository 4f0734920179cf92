/// Scoring rules for submitted words.
///
/// All functions are deterministic and side-effect free; the room engine is
/// the only caller that turns their output into state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringSystem;

// Length tiers: reaching a threshold grants the paired bonus.
const LENGTH_BONUS_TIERS: [(usize, i32); 7] =
    [(4, 1), (5, 2), (6, 3), (7, 5), (8, 8), (9, 11), (10, 15)];

// Rare letters worth a flat bonus when the word contains any of them.
const RARE_LETTERS: [char; 4] = ['q', 'z', 'x', 'j'];
const RARE_LETTER_BONUS: i32 = 5;

fn letter_score(c: char) -> i32 {
    match c {
        'a' | 'e' | 'i' | 'l' | 'n' | 'o' | 'r' | 's' | 't' | 'u' => 1,
        'd' | 'g' => 2,
        'b' | 'c' | 'm' | 'p' => 3,
        'f' | 'h' | 'v' | 'w' | 'y' => 4,
        'k' => 5,
        'j' | 'x' => 8,
        'q' | 'z' => 10,
        _ => 0,
    }
}

impl ScoringSystem {
    pub fn new() -> Self {
        ScoringSystem
    }

    /// Score for a word: per-letter base values, plus a length tier bonus,
    /// plus a flat bonus if the word uses any rare letter.
    pub fn score(&self, word: &str) -> i32 {
        let clean: String = word.trim().to_lowercase();

        let base: i32 = clean.chars().map(letter_score).sum();
        let length_bonus = length_bonus(clean.chars().count());
        let rare_bonus = if clean.chars().any(|c| RARE_LETTERS.contains(&c)) {
            RARE_LETTER_BONUS
        } else {
            0
        };

        base + length_bonus + rare_bonus
    }

    /// Bonus for submitting early: zero past the half-way point of the round,
    /// otherwise proportional to how much of the round was left.
    pub fn time_bonus(&self, elapsed_seconds: u64, round_duration_seconds: u64) -> i32 {
        if round_duration_seconds == 0 || elapsed_seconds > round_duration_seconds / 2 {
            return 0;
        }

        let time_ratio = 1.0 - (elapsed_seconds as f64 / round_duration_seconds as f64);
        (time_ratio * 10.0) as i32
    }

    /// Flat bonus at streak thresholds of consecutive valid submissions.
    pub fn streak_bonus(&self, streak: u32) -> i32 {
        match streak {
            s if s >= 5 => 10,
            s if s >= 3 => 5,
            _ => 0,
        }
    }

    /// Penalty for invalid submissions, for modes that discourage guessing.
    #[allow(dead_code)]
    pub fn penalty(&self) -> i32 {
        -2
    }
}

fn length_bonus(length: usize) -> i32 {
    LENGTH_BONUS_TIERS
        .iter()
        .filter(|(threshold, _)| length >= *threshold)
        .map(|(_, bonus)| *bonus)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_deterministic() {
        let scoring = ScoringSystem::new();
        assert_eq!(scoring.score("quartz"), scoring.score("quartz"));
        assert_eq!(scoring.score("  Quartz "), scoring.score("quartz"));
    }

    #[test]
    fn longer_words_never_score_less() {
        let scoring = ScoringSystem::new();
        // Each step appends a letter, so base and length bonus only grow.
        let words = ["te", "tea", "teas", "tease", "teased"];
        for pair in words.windows(2) {
            assert!(
                scoring.score(pair[1]) >= scoring.score(pair[0]),
                "{} scored below {}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn rare_letters_grant_flat_bonus() {
        let scoring = ScoringSystem::new();
        // "jo" = 8 + 1 base, no length tier, plus the rare bonus.
        assert_eq!(scoring.score("jo"), 9 + RARE_LETTER_BONUS);
        // "to" has no rare letter.
        assert_eq!(scoring.score("to"), 2);
    }

    #[test]
    fn length_tiers_apply_highest_reached() {
        assert_eq!(length_bonus(3), 0);
        assert_eq!(length_bonus(4), 1);
        assert_eq!(length_bonus(8), 8);
        assert_eq!(length_bonus(12), 15);
    }

    #[test]
    fn time_bonus_zero_after_half_round() {
        let scoring = ScoringSystem::new();
        assert_eq!(scoring.time_bonus(31, 60), 0);
        assert_eq!(scoring.time_bonus(60, 60), 0);
        assert!(scoring.time_bonus(0, 60) > scoring.time_bonus(20, 60));
        assert_eq!(scoring.time_bonus(0, 60), 10);
    }

    #[test]
    fn streak_bonus_thresholds() {
        let scoring = ScoringSystem::new();
        assert_eq!(scoring.streak_bonus(0), 0);
        assert_eq!(scoring.streak_bonus(2), 0);
        assert_eq!(scoring.streak_bonus(3), 5);
        assert_eq!(scoring.streak_bonus(4), 5);
        assert_eq!(scoring.streak_bonus(5), 10);
        assert_eq!(scoring.streak_bonus(9), 10);
    }
}
