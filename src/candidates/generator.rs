//! Random username generator

use std::collections::HashSet;

use rand::Rng;

use super::ALPHABET;

/// Draws random fixed-length usernames and drops duplicates
#[derive(Debug, Clone)]
pub struct UsernameGenerator {
    length: usize,
    attempts: usize,
}

impl UsernameGenerator {
    /// Create a generator making `attempts` draws of `length` characters
    pub fn new(length: usize, attempts: usize) -> Self {
        Self {
            length,
            attempts,
        }
    }

    /// Generate candidates with the thread-local RNG
    pub fn generate(&self) -> Vec<String> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate candidates from the given RNG.
    ///
    /// Output keeps first-seen order and never holds the same name twice, so
    /// it may be shorter than the number of attempts.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut seen = HashSet::with_capacity(self.attempts);
        let mut names = Vec::with_capacity(self.attempts);

        for _ in 0..self.attempts {
            let name: String = (0..self.length)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
                .collect();
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }

        names
    }
}

impl Default for UsernameGenerator {
    fn default() -> Self {
        Self::new(5, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_names_have_fixed_length_and_charset() {
        let gen = UsernameGenerator::default();
        let names = gen.generate_with(&mut StdRng::seed_from_u64(7));
        assert!(!names.is_empty());
        for name in &names {
            assert_eq!(name.len(), 5);
            assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_names_are_unique() {
        // 26^2 = 676 possible names, so 2000 draws must collide
        let gen = UsernameGenerator::new(2, 2000);
        let names = gen.generate_with(&mut StdRng::seed_from_u64(42));
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.len() <= 676);
    }

    #[test]
    fn test_same_seed_same_names() {
        let gen = UsernameGenerator::new(5, 50);
        let first = gen.generate_with(&mut StdRng::seed_from_u64(1));
        let second = gen.generate_with(&mut StdRng::seed_from_u64(1));
        assert_eq!(first, second);
    }
}
