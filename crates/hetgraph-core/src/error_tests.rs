//! Tests for the unified error type.

use crate::error::Error;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(Error::GraphExists("g".to_string()).code(), "HGRAPH-001");
    assert_eq!(Error::NodeNotFound(7).code(), "HGRAPH-003");
    assert_eq!(Error::UnresolvableNodeType.code(), "HGRAPH-007");
    assert_eq!(Error::Construction("bad".to_string()).code(), "HGRAPH-009");
}

#[test]
fn test_error_messages_contain_code() {
    let err = Error::NodeNotFound(42);
    assert!(err.to_string().contains("HGRAPH-003"));
    assert!(err.to_string().contains("42"));

    let err = Error::NodeTypeMismatch {
        id: 4,
        expected: "A".to_string(),
        actual: "B".to_string(),
    };
    assert!(err.to_string().contains("HGRAPH-006"));
    assert!(err.to_string().contains("'A'"));
    assert!(err.to_string().contains("'B'"));
}

#[test]
fn test_invalid_argument_classification() {
    assert!(Error::UnresolvableNodeType.is_invalid_argument());
    assert!(Error::MixedNodeTypes {
        first: "A".to_string(),
        second: "B".to_string(),
    }
    .is_invalid_argument());
    assert!(!Error::NodeNotFound(1).is_invalid_argument());
    assert!(!Error::Construction("x".to_string()).is_invalid_argument());
}

#[test]
fn test_not_found_classification() {
    assert!(Error::NodeNotFound(1).is_not_found());
    assert!(Error::NodeTypeNotFound("user".to_string()).is_not_found());
    assert!(Error::GraphNotFound("g".to_string()).is_not_found());
    assert!(!Error::UnresolvableNodeType.is_not_found());
}
