use std::fmt;
use std::str::FromStr;

/// One of the two collections a painting can belong to.
///
/// Used both as the player's choice and as the classified ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Museum {
    Tretyakov,
    Russian,
}

impl Museum {
    pub const ALL: [Museum; 2] = [Museum::Tretyakov, Museum::Russian];

    /// Classify free-form museum text.
    ///
    /// Anything that does not mention the Tretyakov Gallery is treated as the
    /// Russian Museum; a third institution is misclassified rather than
    /// rejected.
    #[must_use]
    pub fn classify(museum: &str) -> Self {
        let lowered = museum.to_lowercase();
        if lowered.contains("третьяков") || lowered.contains("tretyakov") {
            Museum::Tretyakov
        } else {
            Museum::Russian
        }
    }

    /// Stable identifier used for choices coming from a front-end.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Museum::Tretyakov => "tretyakov",
            Museum::Russian => "rusmuseum",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Museum::Tretyakov => "Tretyakov Gallery",
            Museum::Russian => "Russian Museum",
        }
    }
}

impl fmt::Display for Museum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Museum {
    type Err = UnknownMuseum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Museum::ALL
            .into_iter()
            .find(|museum| museum.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMuseum(s.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown museum id: {0}")]
pub struct UnknownMuseum(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tretyakov_matches_case_insensitively() {
        assert_eq!(Museum::classify("Государственная Третьяковская галерея"), Museum::Tretyakov);
        assert_eq!(Museum::classify("ТРЕТЬЯКОВСКАЯ ГАЛЕРЕЯ"), Museum::Tretyakov);
        assert_eq!(Museum::classify("State Tretyakov Gallery"), Museum::Tretyakov);
    }

    #[test]
    fn everything_else_is_the_russian_museum() {
        assert_eq!(Museum::classify("Русский музей"), Museum::Russian);
        assert_eq!(Museum::classify(""), Museum::Russian);
        // Known gap: unrelated institutions land on the second museum.
        assert_eq!(Museum::classify("Hermitage"), Museum::Russian);
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        assert_eq!("tretyakov".parse::<Museum>(), Ok(Museum::Tretyakov));
        assert_eq!(" RusMuseum ".parse::<Museum>(), Ok(Museum::Russian));
        assert!("louvre".parse::<Museum>().is_err());
    }
}
