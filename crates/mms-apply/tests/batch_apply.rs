//! Batch apply transaction semantics

use mms_apply::{ApplyEngine, ItemOutcome, SkipReason};
use mms_client::{ImportResult, RecordingGuiLog};
use mms_model::{Element, LiteralValue, ValueObject};
use mms_test_utils::{import_payload, store_with};
use serde_json::json;
use std::sync::Arc;

fn engine_over(store: mms_model::ModelStore) -> (ApplyEngine, Arc<mms_model::ModelStore>, Arc<RecordingGuiLog>) {
    let store = Arc::new(store);
    let gui = Arc::new(RecordingGuiLog::new());
    (ApplyEngine::new(store.clone(), gui.clone()), store, gui)
}

#[test]
fn non_editable_item_is_skipped_and_the_batch_still_commits() {
    let store = store_with([
        Element::property("a", "alpha").with_editable(false),
        Element::property("b", "beta"),
    ]);
    let (engine, store, gui) = engine_over(store);

    let payload = import_payload([
        ("a", "LiteralInteger", vec![json!(1)]),
        ("b", "LiteralInteger", vec![json!(2)]),
    ]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into(), "b".into()]);

    assert!(!outcome.rolled_back());
    assert_eq!(outcome.applied_count(), 1);
    assert_eq!(outcome.skipped_count(), 1);
    assert_eq!(
        outcome.items()[0].1,
        ItemOutcome::Skipped(SkipReason::NotEditable)
    );

    // B committed, A untouched
    assert!(store.get(&"a".into()).unwrap().current_value().is_none());
    assert_eq!(
        store.get(&"b".into()).unwrap().current_value().unwrap().literal(),
        &LiteralValue::Integer(2)
    );
    assert_eq!(gui.error_count(), 1);
    assert!(gui.lines()[0].contains("alpha is not editable!"));
}

#[test]
fn unexpected_failure_rolls_back_the_whole_batch() {
    // "b" is targeted but does not exist in the store: the local-model call
    // fails mid-transaction
    let store = store_with([Element::property("a", "alpha")]);
    let (engine, store, gui) = engine_over(store);

    let payload = import_payload([
        ("a", "LiteralInteger", vec![json!(1)]),
        ("b", "LiteralInteger", vec![json!(2)]),
    ]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into(), "b".into()]);

    assert!(outcome.rolled_back());
    assert_eq!(outcome.items().last().unwrap().1, ItemOutcome::Failed);
    // A's applied change is not visible after the rollback
    assert!(store.get(&"a".into()).unwrap().current_value().is_none());
    assert_eq!(gui.error_count(), 1);
}

#[test]
fn validation_error_skips_one_item_but_keeps_the_rest() {
    let store = store_with([
        Element::property("a", "alpha"),
        Element::property("b", "beta"),
    ]);
    let (engine, store, gui) = engine_over(store);

    let payload = import_payload([
        ("a", "LiteralInteger", vec![json!(1), json!(2)]),
        ("b", "LiteralString", vec![json!("ok")]),
    ]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into(), "b".into()]);

    assert!(!outcome.rolled_back());
    assert_eq!(outcome.applied_count(), 1);
    assert!(store.get(&"a".into()).unwrap().current_value().is_none());
    assert_eq!(
        store.get(&"b".into()).unwrap().current_value().unwrap().literal(),
        &LiteralValue::String("ok".to_owned())
    );
    assert_eq!(gui.error_count(), 1);
}

#[test]
fn unknown_value_kind_is_a_per_item_skip() {
    let store = store_with([Element::property("a", "alpha")]);
    let (engine, store, gui) = engine_over(store);

    let payload = import_payload([("a", "LiteralDuration", vec![json!(1)])]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into()]);

    assert!(!outcome.rolled_back());
    assert_eq!(
        outcome.items()[0].1,
        ItemOutcome::Skipped(SkipReason::UnknownKind("LiteralDuration".to_owned()))
    );
    assert!(store.get(&"a".into()).unwrap().current_value().is_none());
    assert!(gui.lines()[0].contains("unsupported value type"));
}

#[test]
fn target_missing_from_payload_is_a_per_item_skip() {
    let store = store_with([
        Element::property("a", "alpha"),
        Element::property("b", "beta"),
    ]);
    let (engine, store, _gui) = engine_over(store);

    let payload = import_payload([("b", "LiteralBoolean", vec![json!(true)])]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into(), "b".into()]);

    assert!(!outcome.rolled_back());
    assert_eq!(
        outcome.items()[0].1,
        ItemOutcome::Skipped(SkipReason::MissingPayload)
    );
    assert_eq!(
        store.get(&"b".into()).unwrap().current_value().unwrap().literal(),
        &LiteralValue::Boolean(true)
    );
}

#[test]
fn in_place_update_preserves_value_identity_across_a_batch() {
    let existing = ValueObject::new(LiteralValue::Integer(1));
    let before = existing.id();
    let store = store_with([Element::property("a", "alpha").with_value(existing)]);
    let (engine, store, _gui) = engine_over(store);

    let payload = import_payload([("a", "LiteralUnlimitedNatural", vec![json!(3)])]);
    let result = ImportResult::from_body(&payload).unwrap();

    let outcome = engine.apply_batch(&result, &["a".into()]);

    assert!(!outcome.rolled_back());
    let value = store.get(&"a".into()).unwrap().current_value().unwrap().clone();
    assert_eq!(value.id(), before);
    assert_eq!(value.literal(), &LiteralValue::Integer(3));
}
