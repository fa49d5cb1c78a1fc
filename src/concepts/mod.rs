//! Concepts: the organizing unit of Agora
//!
//! Each concept owns its collection(s) and exposes a narrow action API of
//! existence/ownership-checked store operations. Concepts never call each
//! other; composition happens in the route layer.

pub mod authentication;
pub mod friending;
pub mod labelling;
pub mod posting;
pub mod sorting;
pub mod sourcing;
pub mod templating;

pub use authentication::{Authentication, DELETED_USER};
pub use friending::Friending;
pub use labelling::Labelling;
pub use posting::Posting;
pub use sorting::Sorting;
pub use sourcing::Sourcing;
pub use templating::Templating;

use bson::oid::ObjectId;

use crate::types::{AgoraError, Result};

/// Parse an ObjectId hex string arriving at the API boundary
pub fn parse_object_id(id: &str, entity: &'static str) -> Result<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AgoraError::BadValues(format!("malformed {} id: {:?}", entity, id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_id_accepts_hex() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex(), "user").unwrap(), oid);
    }

    #[test]
    fn parse_object_id_rejects_garbage() {
        let err = parse_object_id("not-an-id", "user").unwrap_err();
        assert!(matches!(err, AgoraError::BadValues(_)));
    }
}
