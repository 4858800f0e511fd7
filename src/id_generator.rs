use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Single static counter for all strokes
static NEXT_STROKE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of a committed stroke. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(u64);

impl StrokeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub fn generate_id() -> StrokeId {
    StrokeId(NEXT_STROKE_ID.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
