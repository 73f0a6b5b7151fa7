use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one of the five training sections, in curriculum order.
///
/// The set is closed: an out-of-range section cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionId {
    Introduction,
    Recognition,
    Examples,
    Response,
    Quiz,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Introduction,
        SectionId::Recognition,
        SectionId::Examples,
        SectionId::Response,
        SectionId::Quiz,
    ];

    /// The terminal gate of the curriculum.
    pub const LAST: SectionId = SectionId::Quiz;

    /// 1-based section number as shown to the learner.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            SectionId::Introduction => 1,
            SectionId::Recognition => 2,
            SectionId::Examples => 3,
            SectionId::Response => 4,
            SectionId::Quiz => 5,
        }
    }

    /// 0-based position in the curriculum.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SectionId::Introduction => "Contexte & Introduction",
            SectionId::Recognition => "Reconnaître un email de phishing",
            SectionId::Examples => "Exemples concrets & mise en situation",
            SectionId::Response => "Réagir correctement",
            SectionId::Quiz => "Quiz de fin",
        }
    }

    /// Expected time on the section, in minutes.
    #[must_use]
    pub fn duration_minutes(self) -> u32 {
        match self {
            SectionId::Recognition | SectionId::Examples => 15,
            SectionId::Introduction | SectionId::Response | SectionId::Quiz => 10,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_round_trip() {
        for s in SectionId::ALL {
            assert_eq!(SectionId::from_number(s.number()), Some(s));
        }
        assert_eq!(SectionId::from_number(0), None);
        assert_eq!(SectionId::from_number(6), None);
    }

    #[test]
    fn next_walks_curriculum_order() {
        assert_eq!(SectionId::Introduction.next(), Some(SectionId::Recognition));
        assert_eq!(SectionId::Response.next(), Some(SectionId::Quiz));
        assert_eq!(SectionId::Quiz.next(), None);
    }

    #[test]
    fn total_duration_is_one_hour() {
        let total: u32 = SectionId::ALL.iter().map(|s| s.duration_minutes()).sum();
        assert_eq!(total, 60);
    }
}
