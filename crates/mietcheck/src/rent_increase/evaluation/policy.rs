use super::super::domain::Finding;
use serde::{Deserialize, Serialize};

/// Advice shown next to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    VerifyComparableRent,
    RefusalPossible,
}

impl Recommendation {
    pub const fn for_verdict(lawful: bool) -> Self {
        if lawful {
            Self::VerifyComparableRent
        } else {
            Self::RefusalPossible
        }
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::VerifyComparableRent => {
                "Die Mieterhöhung erscheint formal korrekt. Prüfen Sie dennoch die ortsübliche Vergleichsmiete."
            }
            Self::RefusalPossible => {
                "Die Mieterhöhung hat formale Fehler. Sie können die Zustimmung verweigern."
            }
        }
    }
}

/// An increase is lawful unless a finding with blocking severity exists.
pub(crate) fn decide_lawful(violations: &[Finding]) -> bool {
    !violations
        .iter()
        .any(|finding| finding.severity.blocks_lawfulness())
}
