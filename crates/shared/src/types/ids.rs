use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Type)]
        #[sqlx(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UserId, "Unique identifier for a user");
define_id!(ItemId, "Unique identifier for a rentable item");
define_id!(BookingId, "Unique identifier for a booking");
define_id!(ReviewId, "Unique identifier for a review");
define_id!(ConversationId, "Unique identifier for a conversation");
define_id!(MessageId, "Unique identifier for a message");

/// Category identifier. Unlike the other entities, categories use a small
/// integer identifier rather than an opaque UUID: the tree is small,
/// admin-managed, and referenced by slug far more often than by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct CategoryId(i32);

impl CategoryId {
    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Total order on user identifiers used to canonicalize conversation
/// participant pairs (lexicographic on the identifier's string form, per
/// the `p1 < p2` normalization rule).
pub fn order_user_pair(a: UserId, b: UserId) -> (UserId, UserId) {
    if a.to_string() <= b.to_string() {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id1 = UserId::new();
        let id2 = UserId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_id_display() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = BookingId::from_uuid(uuid);
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_id_parse() {
        let id: ItemId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_category_id_is_a_plain_integer() {
        let id = CategoryId::from_i32(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_order_user_pair_is_stable() {
        let a = UserId::new();
        let b = UserId::new();
        let (p1, p2) = order_user_pair(a, b);
        let (q1, q2) = order_user_pair(b, a);
        assert_eq!(p1, q1);
        assert_eq!(p2, q2);
        assert!(p1.to_string() <= p2.to_string());
    }
}
