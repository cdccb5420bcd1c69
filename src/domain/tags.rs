//! Display tags: the color a renderer paints a node with.
//!
//! Tags are assigned exactly once, when a node is built. Layout never reads
//! them.

use std::fmt;

use sha2::{Digest, Sha256};

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.0, self.1, self.2]))
    }
}

/// Chooses the display tag of a freshly built node.
pub trait TagAssigner {
    fn assign(&mut self, label: &str) -> Rgb;
}

impl<F> TagAssigner for F
where
    F: FnMut(&str) -> Rgb,
{
    fn assign(&mut self, label: &str) -> Rgb {
        self(label)
    }
}

/// Derives colors from a SHA-256 digest of seed and label.
///
/// The same dataset built twice with the same seed gets the same colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedPalette {
    pub seed: u64,
}

impl HashedPalette {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl TagAssigner for HashedPalette {
    fn assign(&mut self, label: &str) -> Rgb {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        Rgb(digest[0], digest[1], digest[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_rgb_when_displaying_then_hex_triplet() {
        assert_eq!(Rgb(255, 0, 16).to_string(), "#ff0010");
    }

    #[test]
    fn given_same_seed_and_label_when_assigning_then_same_color() {
        let mut a = HashedPalette::new(7);
        let mut b = HashedPalette::new(7);
        assert_eq!(a.assign("docs"), b.assign("docs"));
    }

    #[test]
    fn given_different_seeds_when_assigning_then_colors_differ() {
        let mut a = HashedPalette::new(1);
        let mut b = HashedPalette::new(2);
        assert_ne!(a.assign("docs"), b.assign("docs"));
    }

    #[test]
    fn given_closure_when_assigning_then_closure_decides() {
        let mut grey = |_: &str| Rgb(128, 128, 128);
        assert_eq!(grey.assign("anything"), Rgb(128, 128, 128));
    }
}
