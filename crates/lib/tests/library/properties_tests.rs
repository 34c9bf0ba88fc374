//! Graph-level properties of the codec: attribute round trips, inclusion
//! deduplication, cycle termination, identity sharing, stubs, minimal
//! emission and deterministic output.

use std::collections::HashSet;
use std::rc::Rc;

use jsonapi_lib::{MultiDocument, ResourceKey, SingleDocument, UrlLinks};
use proptest::prelude::*;
use serde_json::Value;

use super::common::{Article, Comment, Metric, Person, article, comment, mapper, person, person_ref, registry};

fn metric_strategy() -> impl Strategy<Value = Metric> {
  (
    any::<u64>(),
    proptest::option::of(".{0,12}"),
    proptest::option::of(any::<i64>()),
    proptest::option::of((-4000i32..4000).prop_map(|n| f64::from(n) / 4.0)),
    proptest::option::of(any::<bool>()),
    proptest::option::of(proptest::collection::vec("[a-z]{1,6}", 0..4)),
  )
    .prop_map(|(id, name, value, ratio, enabled, labels)| Metric {
      id,
      name,
      value,
      ratio,
      enabled,
      labels,
    })
}

fn all_keys(resources: &[jsonapi_lib::document::ResourceObject]) -> Vec<ResourceKey> {
  resources.iter().filter_map(|r| r.key()).collect()
}

/// Fail if any object in `value` carries an empty `attributes` or
/// `relationships` map, or a `null` `links` or `meta`.
fn assert_minimal(value: &Value) {
  match value {
    Value::Object(map) => {
      for key in ["attributes", "relationships"] {
        if let Some(member) = map.get(key) {
          assert!(
            member.as_object().is_some_and(|m| !m.is_empty()),
            "empty {} in {}",
            key,
            value
          );
        }
      }
      for key in ["links", "meta"] {
        if let Some(member) = map.get(key) {
          assert!(!member.is_null(), "null {} in {}", key, value);
        }
      }
      map.values().for_each(assert_minimal);
    }
    Value::Array(items) => items.iter().for_each(assert_minimal),
    _ => {}
  }
}

// ============================================================================
// Round trips
// ============================================================================

proptest! {
  #[test]
  fn scalar_attributes_survive_a_text_round_trip(metric in metric_strategy()) {
    let mapper = mapper();
    let text = mapper.encode(&metric).unwrap().to_json_string().unwrap();
    let document: SingleDocument = text.parse().unwrap();
    let decoded: Metric = mapper.decode(&document).unwrap().unwrap();
    prop_assert_eq!(decoded, metric);
  }

  #[test]
  fn people_survive_a_round_trip(
    id in "[a-z0-9]{1,8}",
    first_name in proptest::option::of("[A-Za-z ]{0,10}"),
    last_name in proptest::option::of("\\PC{0,10}"),
  ) {
    let mapper = mapper();
    let original = Person { id: Some(id), first_name, last_name, self_ref: None };
    let decoded: Person = mapper.decode(&mapper.encode(&original).unwrap()).unwrap().unwrap();
    prop_assert_eq!(decoded, original);
  }

  #[test]
  fn shared_target_is_included_once_per_path_count(paths in 2usize..8) {
    let comments = (0..paths)
      .map(|i| comment(&format!("c{}", i), "body", person("1", "a", "b")))
      .collect();
    let source = Article { author: Some(person("1", "a", "b")), comments, ..article("1", "t") };

    let doc = mapper().encode(&source).unwrap();
    let people = doc.included.iter().filter(|r| r.resource_type == "people").count();
    prop_assert_eq!(people, 1);
    prop_assert_eq!(doc.included.len(), paths + 1);
  }

  #[test]
  fn encoding_is_deterministic(metrics in proptest::collection::vec(metric_strategy(), 0..5)) {
    let first = mapper().encode_many(&metrics).unwrap().to_json_string().unwrap();
    let second = mapper().encode_many(&metrics).unwrap().to_json_string().unwrap();
    prop_assert_eq!(first, second);
  }
}

// ============================================================================
// Cycles and identity
// ============================================================================

#[test]
fn mutual_cycle_emits_each_resource_once() {
  let a = person("1", "a", "a");
  let b = person("2", "b", "b");
  a.borrow_mut().self_ref = Some(b.clone());
  b.borrow_mut().self_ref = Some(a.clone());

  let single = mapper().encode(&*a.borrow()).unwrap();
  let many = mapper()
    .encode_many(&[a.borrow().clone(), b.borrow().clone()])
    .unwrap();
  a.borrow_mut().self_ref = None;

  let keys: Vec<_> = single
    .data
    .iter()
    .chain(single.included.iter())
    .filter_map(|r| r.key())
    .collect();
  assert_eq!(keys, vec![ResourceKey::new("people", "1"), ResourceKey::new("people", "2")]);

  assert_eq!(all_keys(&many.data).len(), 2);
  assert!(many.included.is_empty());
}

#[test]
fn long_cycle_terminates() {
  let people: Vec<_> = (0..50).map(|i| person(&i.to_string(), "n", "n")).collect();
  for (i, p) in people.iter().enumerate() {
    p.borrow_mut().self_ref = Some(people[(i + 1) % people.len()].clone());
  }

  let doc = mapper().encode(&*people[0].borrow()).unwrap();
  for p in &people {
    p.borrow_mut().self_ref = None;
  }

  let unique: HashSet<_> = all_keys(&doc.included).into_iter().collect();
  assert_eq!(doc.included.len(), 49);
  assert_eq!(unique.len(), 49);
  assert!(doc.linkage().is_valid());
}

#[test]
fn every_reference_to_an_included_resource_shares_one_record() {
  let document: MultiDocument = r#"{
    "data": [
      {"type": "comments", "id": "1", "relationships": {"author": {"data": {"type": "people", "id": "9"}}}},
      {"type": "comments", "id": "2", "relationships": {"author": {"data": {"type": "people", "id": "9"}}}},
      {"type": "comments", "id": "3", "relationships": {"author": {"data": {"type": "people", "id": "9"}}}}
    ],
    "included": [
      {"type": "people", "id": "9", "attributes": {"first-name": "n"},
       "relationships": {"self-ref": {"data": {"type": "people", "id": "9"}}}}
    ]
  }"#
  .parse()
  .unwrap();

  let comments: Vec<Comment> = mapper().decode_many(&document).unwrap();
  let authors: Vec<_> = comments.iter().map(|c| c.author.clone().unwrap()).collect();

  assert!(authors.iter().all(|a| Rc::ptr_eq(a, &authors[0])));
  let self_ref = authors[0].borrow().self_ref.clone().unwrap();
  assert!(Rc::ptr_eq(&self_ref, &authors[0]));

  authors[0].borrow_mut().self_ref = None;
}

#[test]
fn stubs_carry_only_their_id() {
  let document: SingleDocument = r#"{
    "data": {"type": "articles", "id": "1", "relationships": {
      "comments": {"data": [{"type": "comments", "id": "5"}, {"type": "comments", "id": "5"}]}
    }}
  }"#
  .parse()
  .unwrap();

  let decoded: Article = mapper().decode(&document).unwrap().unwrap();

  assert_eq!(decoded.comments.len(), 2);
  for stub in &decoded.comments {
    assert_eq!(
      *stub.borrow(),
      Comment {
        id: Some("5".to_string()),
        ..Default::default()
      }
    );
  }
  assert!(!Rc::ptr_eq(&decoded.comments[0], &decoded.comments[1]));
}

// ============================================================================
// Emission
// ============================================================================

#[test]
fn emitted_documents_are_minimal() {
  let source = Article {
    author: Some(person_ref("7")),
    comments: vec![comment("1", "b", person("2", "x", "y"))],
    ..article("1", "t")
  };
  let untitled = Article {
    title: None,
    ..article("2", "")
  };

  let linked = jsonapi_lib::JsonApiMapper::with_options(
    registry(),
    std::sync::Arc::new(UrlLinks::new("/api")),
    Default::default(),
  );

  for doc in [
    serde_json::to_value(mapper().encode(&source).unwrap()).unwrap(),
    serde_json::to_value(mapper().encode(&untitled).unwrap()).unwrap(),
    serde_json::to_value(linked.encode(&source).unwrap()).unwrap(),
    serde_json::to_value(mapper().encode_many::<Article>(&[]).unwrap()).unwrap(),
  ] {
    assert_minimal(&doc);
  }
}

#[test]
fn repeated_encoding_is_byte_identical() {
  let source = Article {
    author: Some(person("1", "a", "b")),
    comments: vec![
      comment("10", "first", person("1", "a", "b")),
      comment("20", "second", person("3", "c", "d")),
    ],
    ..article("1", "t")
  };

  let mapper = mapper();
  let first = mapper.encode(&source).unwrap().to_json_string().unwrap();
  for _ in 0..5 {
    assert_eq!(mapper.encode(&source).unwrap().to_json_string().unwrap(), first);
  }
}
