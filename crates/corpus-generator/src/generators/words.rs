//! Random words and sentences.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "access", "agent", "alpha", "amber", "anchor", "apex", "arrow", "atlas", "audit", "aurora",
    "badge", "basin", "beacon", "birch", "blade", "bloom", "bolt", "breeze", "bridge", "cable",
    "canyon", "carbon", "cedar", "cipher", "cloud", "cobalt", "comet", "coral", "crane", "crystal",
    "delta", "desert", "drift", "ember", "engine", "falcon", "fern", "field", "flint", "forge",
    "frost", "galaxy", "garnet", "glacier", "grove", "harbor", "hawk", "helix", "horizon", "island",
    "ivory", "jasper", "kernel", "lagoon", "lantern", "ledger", "lotus", "lunar", "maple", "marble",
    "matrix", "meadow", "meteor", "mirror", "nebula", "needle", "nimbus", "nova", "oasis", "onyx",
    "orbit", "otter", "pebble", "pilot", "pixel", "prism", "pulse", "quartz", "quiver", "radar",
    "raven", "reef", "ridge", "river", "rocket", "saddle", "sage", "shadow", "signal", "socket",
    "solar", "spark", "spruce", "summit", "tango", "thunder", "timber", "token", "torch", "tundra",
    "valley", "vector", "velvet", "vertex", "willow", "window", "zenith", "zephyr",
];

/// A random lower-case word.
pub fn random_word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("word")
}

/// `count` distinct words, or every word if `count` exceeds the list.
pub fn distinct_words<R: Rng>(rng: &mut R, count: usize) -> Vec<&'static str> {
    WORDS.choose_multiple(rng, count).copied().collect()
}

/// A short sentence of 3 to 8 words, capitalized and ending with a period.
pub fn sentence<R: Rng>(rng: &mut R) -> String {
    let count = rng.gen_range(3..=8);
    let mut out = String::with_capacity(count * 8);
    for i in 0..count {
        let word = random_word(rng);
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_word_is_lowercase() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let word = random_word(&mut rng);
            assert!(!word.is_empty());
            assert!(word.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_distinct_words_count() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let words = distinct_words(&mut rng, 5);
            assert_eq!(words.len(), 5, "seed {seed}");
            let unique: std::collections::HashSet<_> = words.iter().collect();
            assert_eq!(unique.len(), 5, "seed {seed}");
        }

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(distinct_words(&mut rng, WORDS.len() + 10).len(), WORDS.len());
    }

    #[test]
    fn test_sentence_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let s = sentence(&mut rng);
            assert!(s.ends_with('.'));
            assert!(s.chars().next().unwrap().is_ascii_uppercase());
            let words = s.trim_end_matches('.').split(' ').count();
            assert!((3..=8).contains(&words));
        }
    }
}
