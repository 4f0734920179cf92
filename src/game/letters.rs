use rand::Rng;
use rand::seq::SliceRandom;

/// Generates random letter pools for game rounds with a realistic
/// vowel/consonant distribution.
///
/// Generation accepts any [`Rng`], so tests can drive it with a seeded
/// generator while the server uses the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterGenerator;

// Letter frequency weights for English.
const VOWEL_WEIGHTS: [(char, u32); 5] = [('a', 8), ('e', 12), ('i', 7), ('o', 8), ('u', 3)];

const CONSONANT_WEIGHTS: [(char, u32); 21] = [
    ('b', 2),
    ('c', 3),
    ('d', 4),
    ('f', 2),
    ('g', 2),
    ('h', 2),
    ('j', 1),
    ('k', 1),
    ('l', 4),
    ('m', 3),
    ('n', 6),
    ('p', 2),
    ('q', 1),
    ('r', 6),
    ('s', 6),
    ('t', 9),
    ('v', 1),
    ('w', 2),
    ('x', 1),
    ('y', 2),
    ('z', 1),
];

// Chance of admitting one more copy of a letter already drawn twice.
const EXTRA_REPEAT_CHANCE: f64 = 0.2;

impl LetterGenerator {
    pub fn new() -> Self {
        LetterGenerator
    }

    /// Generate `count` letters with a good mix of vowels and consonants,
    /// using the thread RNG.
    pub fn generate(&self, count: usize) -> String {
        self.generate_with(&mut rand::rng(), count)
    }

    /// Generate `count` letters from the provided randomness source.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> String {
        if count == 0 {
            return String::new();
        }
        if count == 1 {
            return select_letters(rng, &VOWEL_WEIGHTS, 1).into_iter().collect();
        }

        // At least 2 vowels for pools of 6+, otherwise at least 1.
        let min_vowels = if count >= 6 { 2 } else { 1 };
        let max_vowels = ((count as f64 * 0.4) as usize).clamp(min_vowels, count - min_vowels);
        let vowel_count = rng.random_range(min_vowels..=max_vowels);
        let consonant_count = count - vowel_count;

        let mut letters = select_letters(rng, &VOWEL_WEIGHTS, vowel_count);
        letters.extend(select_letters(rng, &CONSONANT_WEIGHTS, consonant_count));
        letters.shuffle(rng);
        letters.into_iter().collect()
    }
}

/// Draw `count` letters from a weight table, soft-capping each letter at two
/// occurrences with a small residual chance of a further repeat.
fn select_letters<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[(char, u32)],
    count: usize,
) -> Vec<char> {
    let mut selected: Vec<char> = Vec::with_capacity(count);

    while selected.len() < count {
        let letter = weighted_choice(rng, weights);
        let occurrences = selected.iter().filter(|&&c| c == letter).count();
        if occurrences < 2 || rng.random_bool(EXTRA_REPEAT_CHANCE) {
            selected.push(letter);
        }
    }

    selected
}

fn weighted_choice<R: Rng + ?Sized>(rng: &mut R, weights: &[(char, u32)]) -> char {
    let total: u32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);

    for &(letter, weight) in weights {
        if roll < weight {
            return letter;
        }
        roll -= weight;
    }

    // Unreachable: the roll is bounded by the weight sum.
    weights[0].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn vowel_count(letters: &str) -> usize {
        letters.chars().filter(|c| "aeiou".contains(*c)).count()
    }

    #[test]
    fn generates_requested_length() {
        let generator = LetterGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);
        for count in [1, 2, 5, 8, 12] {
            assert_eq!(generator.generate_with(&mut rng, count).chars().count(), count);
        }
    }

    #[test]
    fn same_seed_same_pool() {
        let generator = LetterGenerator::new();
        let a = generator.generate_with(&mut StdRng::seed_from_u64(42), 8);
        let b = generator.generate_with(&mut StdRng::seed_from_u64(42), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn respects_vowel_minimum() {
        let generator = LetterGenerator::new();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = generator.generate_with(&mut rng, 8);
            assert!(
                vowel_count(&pool) >= 2,
                "pool {:?} from seed {} has fewer than 2 vowels",
                pool,
                seed
            );
            let small = generator.generate_with(&mut rng, 4);
            assert!(vowel_count(&small) >= 1, "pool {:?} has no vowel", small);
        }
    }

    #[test]
    fn repeats_stay_rare() {
        let generator = LetterGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut fourth_repeats = 0;
        for _ in 0..200 {
            let pool = generator.generate_with(&mut rng, 8);
            for c in pool.chars() {
                if pool.chars().filter(|&x| x == c).count() >= 4 {
                    fourth_repeats += 1;
                }
            }
        }
        // A fourth copy needs two consecutive 20% rolls; it should be rare.
        assert!(fourth_repeats < 20, "too many heavy repeats: {}", fourth_repeats);
    }

    #[test]
    fn only_lowercase_ascii_letters() {
        let generator = LetterGenerator::new();
        let pool = generator.generate_with(&mut StdRng::seed_from_u64(11), 10);
        assert!(pool.chars().all(|c| c.is_ascii_lowercase()));
    }
}
