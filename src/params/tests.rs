//! Tests for params module

use super::*;
use crate::engine::EngineConfig;
use crate::error::Error;
use crate::types::LoadType;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_refresh_without_key() {
    let params = LoadParams::<usize>::refresh(None, 60, 20).unwrap();
    assert_eq!(params.load_type(), LoadType::Refresh);
    assert_eq!(params.key(), None);
    assert_eq!(params.load_size(), 60);
    assert_eq!(params.page_size(), 20);
}

#[test]
fn test_prepend_and_append_carry_key() {
    let prepend = LoadParams::prepend(20usize, 20, 20).unwrap();
    assert_eq!(prepend.load_type(), LoadType::Prepend);
    assert_eq!(prepend.key(), Some(&20));
    assert_eq!(prepend.load_key(), &LoadKey::Prepend(20));

    let append = LoadParams::append(40usize, 20, 20).unwrap();
    assert_eq!(append.load_type(), LoadType::Append);
    assert_eq!(append.key(), Some(&40));
}

#[test_case(LoadType::Prepend ; "prepend")]
#[test_case(LoadType::Append ; "append")]
fn test_dynamic_directional_without_key_is_rejected(load_type: LoadType) {
    let err = LoadParams::<usize>::new(load_type, None, 20, 20).unwrap_err();
    assert!(matches!(err, Error::MissingKey { load_type: t } if t == load_type));
    assert!(err.is_validation());
    assert!(!err.is_retryable());
}

#[test]
fn test_dynamic_refresh_without_key_is_allowed() {
    let params = LoadParams::<usize>::new(LoadType::Refresh, None, 20, 20).unwrap();
    assert_eq!(params.load_key(), &LoadKey::Refresh(None));
}

#[test_case(0, 20, "load_size" ; "zero load size")]
#[test_case(20, 0, "page_size" ; "zero page size")]
fn test_zero_sizes_are_rejected(load_size: usize, page_size: usize, field: &str) {
    let err = LoadParams::append(10usize, load_size, page_size).unwrap_err();
    match err {
        Error::InvalidLoadSize { field: f } => assert_eq!(f, field),
        other => panic!("Expected InvalidLoadSize, got {other:?}"),
    }
}

#[test]
fn test_initial_uses_engine_config() {
    let config = EngineConfig::new(20, 60).unwrap();
    let params = LoadParams::initial(Some(30usize), &config);
    assert_eq!(params.load_type(), LoadType::Refresh);
    assert_eq!(params.key(), Some(&30));
    assert_eq!(params.load_size(), 60);
    assert_eq!(params.page_size(), 20);
}

#[test]
fn test_params_are_comparable() {
    let a = LoadParams::append(20usize, 20, 20).unwrap();
    let b = LoadParams::append(20usize, 20, 20).unwrap();
    assert_eq!(a, b.clone());
    assert_ne!(a, LoadParams::append(21usize, 20, 20).unwrap());
}

// ============================================================================
// Serialization Tests
// ============================================================================

#[test]
fn test_params_serialize_flat() {
    let params = LoadParams::append(20usize, 20, 10).unwrap();
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(
        value,
        json!({"load_type": "append", "key": 20, "load_size": 20, "page_size": 10})
    );
}
