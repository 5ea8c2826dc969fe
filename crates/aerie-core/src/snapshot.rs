use std::fmt;
use std::sync::Arc;

/// Rendered text summary of all tracked record collections at a point in time.
///
/// Immutable once built; cloning shares the underlying buffer, so every
/// concurrent request can hold the same cache entry without copying it. A
/// refresh builds a wholly new `Snapshot` and swaps it in; an entry is never
/// mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Arc::from(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_text() {
        let snap = Snapshot::new("Total Drones: 0\nDrones:\n");
        assert_eq!(snap.as_str(), "Total Drones: 0\nDrones:\n");
        assert_eq!(snap.to_string(), snap.as_str());
    }

    #[test]
    fn clones_compare_equal() {
        let a = Snapshot::new("same");
        let b = a.clone();
        assert_eq!(a, b);
    }
}
