use amptune::data::SeismicGrid;

/// Maximum number of snapshots kept; the oldest is dropped first.
pub const MAX_ENTRIES: usize = 20;

/// One snapshot of the section and what produced it.
#[derive(Debug, Clone)]
pub struct Entry {
    pub description: String,
    pub data: SeismicGrid,
}

/// Linear undo/redo stack of full-section snapshots.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Entry>,
    current: usize,
}

impl History {
    /// Start over with a single entry.
    pub fn reset(&mut self, description: impl Into<String>, data: SeismicGrid) {
        self.entries.clear();
        self.entries.push(Entry {
            description: description.into(),
            data,
        });
        self.current = 0;
    }

    /// Append after the current entry, discarding any redo tail.
    pub fn push(&mut self, description: impl Into<String>, data: SeismicGrid) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.current + 1);
        }
        self.entries.push(Entry {
            description: description.into(),
            data,
        });
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
        self.current = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use amptune::data::Shape;

    use super::*;

    fn grid(v: f32) -> SeismicGrid {
        SeismicGrid::filled(Shape::new(1, 1), v)
    }

    fn value(h: &History) -> f32 {
        h.current().unwrap().data[(0, 0)]
    }

    #[test]
    fn undo_redo_walks_the_stack() {
        let mut h = History::default();
        assert!(h.current().is_none());
        h.reset("Original data loaded", grid(0.0));
        h.push("a", grid(1.0));
        h.push("b", grid(2.0));

        assert!(h.undo());
        assert_eq!(value(&h), 1.0);
        assert!(h.undo());
        assert!(!h.undo());
        assert_eq!(value(&h), 0.0);
        assert!(h.redo() && h.redo());
        assert!(!h.redo());
        assert_eq!(value(&h), 2.0);
    }

    #[test]
    fn push_after_undo_drops_redo_tail() {
        let mut h = History::default();
        h.reset("start", grid(0.0));
        h.push("a", grid(1.0));
        h.push("b", grid(2.0));
        h.undo();
        h.push("c", grid(3.0));
        assert!(!h.can_redo());
        let names: Vec<&str> = h.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, ["start", "a", "c"]);
    }

    #[test]
    fn oldest_entries_are_dropped_at_capacity() {
        let mut h = History::default();
        h.reset("start", grid(0.0));
        for i in 1..=25 {
            h.push(format!("step {i}"), grid(i as f32));
        }
        assert_eq!(h.entries().len(), MAX_ENTRIES);
        assert_eq!(h.current_index(), MAX_ENTRIES - 1);
        assert_eq!(h.entries()[0].description, "step 6");
        assert_eq!(value(&h), 25.0);
    }

    #[test]
    fn reset_leaves_a_single_entry() {
        let mut h = History::default();
        h.reset("start", grid(0.0));
        h.push("a", grid(1.0));
        h.reset("Data reset to original", grid(0.0));
        assert_eq!(h.entries().len(), 1);
        assert!(!h.can_undo() && !h.can_redo());
    }
}
