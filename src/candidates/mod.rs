//! Candidate username generation
//!
//! Candidates are fixed-length strings drawn at random from the lowercase
//! alphabet and deduplicated before the run starts.

mod generator;

pub use generator::UsernameGenerator;

/// Characters a candidate username is made of
pub const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
