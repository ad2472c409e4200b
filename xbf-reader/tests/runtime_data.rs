//! Decoding tests for flags-driven custom runtime data payloads.

mod support;

use support::*;
use xbf_metadata::PropertyIndex;
use xbf_model::{
    CustomRuntimeData, SetterFlags, StreamOffsetToken, StyleRuntimeData, StyleVersion, Value,
};
use xbf_reader::{XbfDocument, XbfError, from_slice, wire};

const RESOLVED: u32 = SetterFlags::IS_PROPERTY_RESOLVED.bits();
const STRING: u32 = SetterFlags::HAS_STRING_VALUE.bits();
const CONTAINER: u32 = SetterFlags::HAS_CONTAINER_VALUE.bits();
const STATIC_RES: u32 = SetterFlags::HAS_STATIC_RESOURCE_VALUE.bits();
const MUTABLE: u32 = SetterFlags::IS_VALUE_MUTABLE.bits();

/// The style runtime data stored under `Setters` on the document root.
fn style_data(doc: &XbfDocument<'_>) -> StyleRuntimeData {
    let registry = registry();
    let setters = registry
        .property_by_index(PropertyIndex(PROP_SETTERS))
        .unwrap()
        .clone();
    match doc.root().borrow().get(&setters) {
        Some(Value::RuntimeData(CustomRuntimeData::Style(data))) => data.clone(),
        other => panic!("expected style runtime data, got {other:?}"),
    }
}

/// Header plus the opening of a style record whose `Setters` property is a
/// runtime data payload. The payload bytes follow.
fn style_stream(pool: &[&str], version: u32) -> StreamBuilder {
    let mut b = StreamBuilder::header(pool);
    b.record(STYLE, 0).members(1);
    b.property(PROP_SETTERS).value_runtime_data(version);
    b
}

// =============================================================================
// Value selection by flag
// =============================================================================

#[test]
fn token_flag_selects_a_resolvable_token() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V1);
    b.varint(1); // setter count
    b.varint((RESOLVED | STATIC_RES) as u64);
    b.varint(PROP_WIDTH as u64);
    // The deferred record follows the style record immediately.
    let target = b.len() + 1;
    b.token(Some(target as u64));
    assert_eq!(b.len(), target);
    b.record(BUTTON, 0).members(0);
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let data = style_data(&doc);
    assert_eq!(data.version, StyleVersion::V1);
    assert_eq!(data.setters.len(), 1);

    let setter = &data.setters[0];
    assert_eq!(setter.property.index(), PropertyIndex(PROP_WIDTH));
    assert!(setter.has_token_value());
    assert!(setter.string_value.is_none());
    assert!(setter.container_value.is_none());
    assert_eq!(setter.token, StreamOffsetToken::at(target as u64));

    let resolved = doc.resolve(setter.token).unwrap();
    assert_eq!(resolved.as_object().unwrap().borrow().ty().name(), "Button");
}

#[test]
fn string_flag_selects_an_inline_string() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V1);
    b.varint(1);
    b.varint((RESOLVED | STRING) as u64);
    b.varint(PROP_CONTENT as u64);
    b.inline_string("red"); // inline, not pooled
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let setter = style_data(&doc).setters[0].clone();
    assert_eq!(setter.string_value.as_deref(), Some("red"));
    assert!(setter.container_value.is_none());
    assert!(setter.token.is_none());
}

#[test]
fn container_flag_selects_a_pooled_constant() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&["SharedConstant"], wire::runtime_data::STYLE_V1);
    b.varint(1);
    b.varint((RESOLVED | CONTAINER) as u64);
    b.varint(PROP_CONTENT as u64);
    b.pool_ref(0);
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let setter = style_data(&doc).setters[0].clone();
    assert_eq!(setter.container_value.as_deref(), Some("SharedConstant"));
    assert!(setter.string_value.is_none());
}

#[test]
fn zero_value_flags_means_an_absent_value() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V1);
    b.varint(1);
    b.varint(RESOLVED as u64);
    b.varint(PROP_WIDTH as u64);
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let setter = style_data(&doc).setters[0].clone();
    assert!(setter.string_value.is_none());
    assert!(setter.container_value.is_none());
    assert!(setter.token.is_none());
    assert!(!setter.has_token_value());
}

// =============================================================================
// Late-bound setter properties
// =============================================================================

#[test]
fn late_bound_setter_is_promoted_to_resolved() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&["Width", "red"], wire::runtime_data::STYLE_V1);
    b.varint(1);
    b.varint(STRING as u64); // no IS_PROPERTY_RESOLVED
    b.varint(BUTTON as u64); // declaring type
    b.pool_ref(0); // property name
    b.inline_string("red");
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let setter = style_data(&doc).setters[0].clone();
    assert_eq!(setter.property.index(), PropertyIndex(PROP_WIDTH));
    // Consumers never see an unresolved entry.
    assert!(setter.flags.contains(SetterFlags::IS_PROPERTY_RESOLVED));
}

// =============================================================================
// Flag validation
// =============================================================================

#[test]
fn unknown_flag_bits_are_rejected() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V1);
    b.varint(1);
    let flags_offset = b.len();
    b.varint((RESOLVED | 1 << 9) as u64);
    let input = b.finish();

    let err = from_slice(&input, &registry).unwrap_err();
    assert_eq!(
        err,
        XbfError::InvalidFlagCombination {
            flags: RESOLVED | 1 << 9,
            offset: flags_offset,
        }
    );
}

#[test]
fn several_value_flags_at_once_are_rejected() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V1);
    b.varint(1);
    let flags_offset = b.len();
    b.varint((RESOLVED | STRING | CONTAINER) as u64);
    let input = b.finish();

    let err = from_slice(&input, &registry).unwrap_err();
    assert_eq!(
        err,
        XbfError::InvalidFlagCombination {
            flags: RESOLVED | STRING | CONTAINER,
            offset: flags_offset,
        }
    );
}

#[test]
fn mutable_setters_are_v2_only() {
    xbf_testhelpers::setup();
    let registry = registry();

    let encode = |version: u32| {
        let mut b = style_stream(&[], version);
        b.varint(1);
        b.varint((RESOLVED | MUTABLE) as u64);
        b.varint(PROP_WIDTH as u64);
        b.finish()
    };

    let v1_input = encode(wire::runtime_data::STYLE_V1);
    let err = from_slice(&v1_input, &registry).unwrap_err();
    assert!(matches!(err, XbfError::InvalidFlagCombination { flags, .. }
        if flags == (RESOLVED | MUTABLE)));

    let v2_input = encode(wire::runtime_data::STYLE_V2);
    let doc = from_slice(&v2_input, &registry).unwrap();
    let data = style_data(&doc);
    assert_eq!(data.version, StyleVersion::V2);
    assert!(data.setters[0].is_mutable());
}

// =============================================================================
// Resource dictionary deferral maps
// =============================================================================

#[test]
fn resource_dictionary_entries_decode_keys_and_tokens() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = StreamBuilder::header(&["accent", "base"]);
    b.record(RESOURCE_DICTIONARY, 0).members(1);
    b.property(PROP_CONTENT)
        .value_runtime_data(wire::runtime_data::RESOURCE_DICTIONARY_V1);
    b.varint(2);
    b.pool_ref(0).token(Some(90));
    b.pool_ref(1).token(None);
    b.varint(0); // dictionary entry count
    let input = b.finish();

    let doc = from_slice(&input, &registry).unwrap();
    let registry_prop = registry
        .property_by_index(PropertyIndex(PROP_CONTENT))
        .unwrap()
        .clone();
    let root = doc.root().borrow();
    let data = match root.get(&registry_prop) {
        Some(Value::RuntimeData(CustomRuntimeData::ResourceDictionary(data))) => data.clone(),
        other => panic!("expected resource dictionary runtime data, got {other:?}"),
    };

    assert_eq!(data.entries.len(), 2);
    assert_eq!(&*data.entries[0].key, "accent");
    assert_eq!(data.entries[0].token, StreamOffsetToken::at(90));
    assert_eq!(&*data.entries[1].key, "base");
    assert!(data.entries[1].token.is_none());
}

#[test]
fn unknown_runtime_data_version_is_rejected() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = StreamBuilder::header(&[]);
    b.record(STYLE, 0).members(1);
    b.property(PROP_SETTERS);
    b.u8(wire::tag::RUNTIME_DATA);
    let version_offset = b.len();
    b.varint(9);
    let input = b.finish();

    let err = from_slice(&input, &registry).unwrap_err();
    assert_eq!(
        err,
        XbfError::UnsupportedFormatVersion {
            version: 9,
            offset: version_offset,
        }
    );
}

#[test]
fn truncated_setter_list_is_end_of_stream() {
    xbf_testhelpers::setup();
    let registry = registry();

    let mut b = style_stream(&[], wire::runtime_data::STYLE_V2);
    b.varint(2); // claims two setters
    b.varint((RESOLVED | STRING) as u64);
    b.varint(PROP_CONTENT as u64);
    b.inline_string("only one");
    let input = b.finish();

    let err = from_slice(&input, &registry).unwrap_err();
    assert!(matches!(err, XbfError::UnexpectedEndOfStream { .. }));
}
