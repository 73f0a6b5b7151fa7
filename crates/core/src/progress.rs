//! Linear gating of the training sections.

use std::collections::BTreeSet;

use crate::model::SectionId;

/// What a `complete` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The section was newly marked complete.
    Recorded,
    /// The section was already complete; nothing changed.
    AlreadyCompleted,
    /// The section is not visible yet; nothing changed.
    Locked,
}

/// Tracks which sections are revealed and which are acknowledged complete.
///
/// `current` is the 0-based index of the furthest revealed section. It only
/// ever moves forward, so a revealed section never becomes hidden again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionTracker {
    current: usize,
    completed: BTreeSet<SectionId>,
}

impl SectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a section complete and reveal the one after it.
    ///
    /// Completing the final section (the quiz) reveals nothing further.
    pub fn complete(&mut self, section: SectionId) -> Completion {
        if !self.is_visible(section) {
            return Completion::Locked;
        }
        if !self.completed.insert(section) {
            return Completion::AlreadyCompleted;
        }
        if section < SectionId::LAST {
            // section.number() is the 0-based index of the next section.
            self.current = self.current.max(usize::from(section.number()));
        }
        Completion::Recorded
    }

    #[must_use]
    pub fn is_visible(&self, section: SectionId) -> bool {
        section.index() <= self.current
    }

    #[must_use]
    pub fn is_completed(&self, section: SectionId) -> bool {
        self.completed.contains(&section)
    }

    /// The furthest revealed section.
    #[must_use]
    pub fn current(&self) -> SectionId {
        SectionId::ALL[self.current.min(SectionId::ALL.len() - 1)]
    }

    #[must_use]
    pub fn visible(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|s| self.is_visible(*s))
            .collect()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Display-only share of completed sections in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self) -> f64 {
        self.completed.len() as f64 / SectionId::ALL.len() as f64
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed.len() == SectionId::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_only_first_section_visible() {
        let t = SectionTracker::new();
        assert_eq!(t.visible(), vec![SectionId::Introduction]);
        assert_eq!(t.current(), SectionId::Introduction);
        assert_eq!(t.progress_fraction(), 0.0);
    }

    #[test]
    fn completing_reveals_next_section() {
        let mut t = SectionTracker::new();
        assert_eq!(t.complete(SectionId::Introduction), Completion::Recorded);
        assert!(t.is_visible(SectionId::Recognition));
        assert!(!t.is_visible(SectionId::Examples));
    }

    #[test]
    fn completion_is_idempotent() {
        let mut t = SectionTracker::new();
        t.complete(SectionId::Introduction);
        let before = t.clone();
        assert_eq!(t.complete(SectionId::Introduction), Completion::AlreadyCompleted);
        assert_eq!(t, before);
    }

    #[test]
    fn locked_sections_cannot_be_completed() {
        let mut t = SectionTracker::new();
        assert_eq!(t.complete(SectionId::Examples), Completion::Locked);
        assert!(!t.is_completed(SectionId::Examples));
        assert!(!t.is_visible(SectionId::Response));
    }

    #[test]
    fn next_section_never_visible_while_previous_incomplete() {
        // Every order of completion attempts keeps the gate intact.
        let orders: [[u8; 5]; 4] = [
            [5, 4, 3, 2, 1],
            [2, 1, 3, 5, 4],
            [1, 3, 2, 5, 4],
            [1, 2, 3, 4, 5],
        ];
        for order in orders {
            let mut t = SectionTracker::new();
            for n in order {
                t.complete(SectionId::from_number(n).unwrap());
                for k in 1..=4u8 {
                    let prev = SectionId::from_number(k).unwrap();
                    let next = SectionId::from_number(k + 1).unwrap();
                    if !t.is_completed(prev) {
                        assert!(!t.is_visible(next), "order {order:?}: {next:?} visible");
                    }
                }
            }
        }
    }

    #[test]
    fn revealed_sections_stay_visible() {
        let mut t = SectionTracker::new();
        t.complete(SectionId::Introduction);
        t.complete(SectionId::Recognition);
        t.complete(SectionId::Introduction);
        assert!(t.is_visible(SectionId::Examples));
    }

    #[test]
    fn terminal_state_after_quiz() {
        let mut t = SectionTracker::new();
        for s in SectionId::ALL {
            assert_eq!(t.complete(s), Completion::Recorded);
        }
        assert!(t.is_finished());
        assert_eq!(t.current(), SectionId::Quiz);
        assert!((t.progress_fraction() - 1.0).abs() < f64::EPSILON);
    }
}
