//! Opaque surrogate identifiers for domain entities.
//!
//! Every entity carries a UUID v4 key behind its own newtype so a student
//! id can never be handed to an operation expecting a subject id. The
//! persistence layer stores the raw UUID and converts at the adapter
//! boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap a raw UUID read back from storage.
            pub const fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Identifier of an [`crate::domain::Identity`].
    IdentityId
);
entity_id!(
    /// Identifier of a [`crate::domain::Major`].
    MajorId
);
entity_id!(
    /// Identifier of a [`crate::domain::Classroom`].
    ClassroomId
);
entity_id!(
    /// Identifier of a [`crate::domain::Lecturer`].
    LecturerId
);
entity_id!(
    /// Identifier of a [`crate::domain::Student`].
    StudentId
);
entity_id!(
    /// Identifier of a [`crate::domain::Subject`].
    SubjectId
);
entity_id!(
    /// Identifier of a [`crate::domain::Schedule`].
    ScheduleId
);
entity_id!(
    /// Identifier of a [`crate::domain::Grade`].
    GradeId
);
entity_id!(
    /// Identifier of an [`crate::domain::Evaluation`].
    EvaluationId
);
entity_id!(
    /// Identifier of a [`crate::domain::Material`].
    MaterialId
);

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(StudentId::random(), StudentId::random());
    }

    #[test]
    fn uuid_round_trips_through_the_newtype() {
        let raw = Uuid::new_v4();
        let id = SubjectId::from_uuid(raw);
        assert_eq!(*id.as_uuid(), raw);
        assert_eq!(Uuid::from(id), raw);
    }

    #[test]
    fn display_matches_the_inner_uuid() {
        let raw = Uuid::new_v4();
        assert_eq!(LecturerId::from_uuid(raw).to_string(), raw.to_string());
    }
}
