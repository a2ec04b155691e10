//! Stable identifier newtypes.
//!
//! Every entity in the canonical model is keyed by an id that is stable for
//! the lifetime of a contest: a rejudge republishes the same `RunId`, and a
//! `RunUpdate` may only reference `TeamId`/`ProblemId` values already
//! established by an earlier info update.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identifier of a team, unique within one contest snapshot.
    TeamId
);
id_type!(
    /// Identifier of a problem, unique within one contest snapshot.
    ProblemId
);
id_type!(
    /// Identifier of a submission. Rejudges reuse the id of the original run.
    RunId
);
id_type!(
    /// Identifier of a team group (used for group-champion awards).
    GroupId
);
id_type!(
    /// Identifier of an organization (university, company, ...).
    OrganizationId
);
id_type!(
    /// Identifier of a programming language.
    LanguageId
);
id_type!(
    /// Identifier of a commentary message.
    CommentaryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_order() {
        let a = TeamId::from("alpha");
        let b = TeamId::from("beta");
        assert_eq!(a.to_string(), "alpha");
        assert!(a < b);
    }

    #[test]
    fn test_serde_transparent() {
        let id: RunId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id, RunId::from("42"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }
}
