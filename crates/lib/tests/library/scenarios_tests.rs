//! End-to-end encode/decode scenarios over the blog model.

use std::rc::Rc;

use jsonapi_lib::{CodecError, Document, EncodeOptions, SingleDocument};
use serde_json::json;

use super::common::{Article, Comment, Person, article, comment, mapper, person, person_ref};

fn canonical_article() -> Article {
  let author = person("1", "a", "b");
  Article {
    comments: vec![
      comment("10", "first", author.clone()),
      comment("20", "lol", person_ref("2")),
    ],
    author: Some(author),
    ..article("1", "t")
  }
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn encode_single_with_nested_relationships() {
  let doc = mapper().encode(&canonical_article()).unwrap();

  assert_eq!(
    serde_json::to_value(&doc).unwrap(),
    json!({
      "data": {
        "type": "articles",
        "id": "1",
        "attributes": {"title": "t"},
        "relationships": {
          "author": {"data": {"type": "people", "id": "1"}},
          "comments": {"data": [{"type": "comments", "id": "10"}, {"type": "comments", "id": "20"}]}
        }
      },
      "included": [
        {
          "type": "people",
          "id": "1",
          "attributes": {"first-name": "a", "last-name": "b"},
          "relationships": {"self-ref": {"data": null}}
        },
        {
          "type": "comments",
          "id": "10",
          "attributes": {"body": "first"},
          "relationships": {"author": {"data": {"type": "people", "id": "1"}}}
        },
        {
          "type": "comments",
          "id": "20",
          "attributes": {"body": "lol"},
          "relationships": {"author": {"data": {"type": "people", "id": "2"}}}
        }
      ]
    })
  );
}

#[test]
fn empty_many_relationship_is_omitted() {
  let doc = mapper().encode(&article("1", "t")).unwrap();
  let data = doc.data.unwrap();

  assert!(!data.relationships.contains_key("comments"));
  assert!(data.relationships.contains_key("author"));
}

#[test]
fn null_one_relationship_is_emitted_as_null() {
  let text = mapper().encode(&article("1", "t")).unwrap().to_json_string().unwrap();
  assert_eq!(
    text,
    r#"{"data":{"type":"articles","id":"1","attributes":{"title":"t"},"relationships":{"author":{"data":null}}}}"#
  );
}

#[test]
fn encode_many_shares_one_included_pool() {
  let author = person("1", "a", "b");
  let first = Article {
    author: Some(author.clone()),
    ..article("1", "one")
  };
  let second = Article {
    author: Some(author),
    ..article("2", "two")
  };

  let doc = mapper().encode_many(&[first, second]).unwrap();

  assert_eq!(doc.data.len(), 2);
  assert_eq!(doc.included.len(), 1);
  assert!(doc.linkage().is_valid());
}

#[test]
fn encoding_without_inclusion_keeps_linkage_only() {
  let doc = mapper()
    .encode_with(&canonical_article(), EncodeOptions::without_included())
    .unwrap();

  assert!(doc.included.is_empty());
  let report = doc.linkage();
  assert_eq!(report.external.len(), 3);
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn round_trip_preserves_ids_attributes_and_links() {
  let mapper = mapper();
  let original = canonical_article();

  let text = mapper.encode(&original).unwrap().to_json_string().unwrap();
  let document: SingleDocument = text.parse().unwrap();
  let decoded: Article = mapper.decode(&document).unwrap().unwrap();

  assert_eq!(decoded.id, original.id);
  assert_eq!(decoded.title, original.title);

  let author = decoded.author.as_ref().unwrap().borrow();
  assert_eq!(author.id.as_deref(), Some("1"));
  assert_eq!(author.first_name.as_deref(), Some("a"));
  assert_eq!(author.last_name.as_deref(), Some("b"));

  let bodies: Vec<_> = decoded.comments.iter().map(|c| c.borrow().body.clone()).collect();
  assert_eq!(bodies, vec![Some("first".to_string()), Some("lol".to_string())]);

  let comment_authors: Vec<_> = decoded
    .comments
    .iter()
    .map(|c| c.borrow().author.as_ref().unwrap().borrow().id.clone())
    .collect();
  assert_eq!(comment_authors, vec![Some("1".to_string()), Some("2".to_string())]);
}

#[test]
fn bare_reference_decodes_to_stub() {
  let document: SingleDocument = r#"{
    "data": {
      "type": "articles", "id": "1",
      "attributes": {"title": "t"},
      "relationships": {"author": {"data": {"type": "people", "id": "99"}}}
    }
  }"#
  .parse()
  .unwrap();

  let decoded: Article = mapper().decode(&document).unwrap().unwrap();
  let author = decoded.author.unwrap();

  assert_eq!(
    *author.borrow(),
    Person {
      id: Some("99".to_string()),
      ..Default::default()
    }
  );
}

#[test]
fn cyclic_decode_shares_the_pooled_record() {
  let document: SingleDocument = r#"{
    "data": {
      "type": "articles", "id": "1",
      "relationships": {"author": {"data": {"type": "people", "id": "1"}}}
    },
    "included": [{
      "type": "people", "id": "1",
      "attributes": {"first-name": "a"},
      "relationships": {"self-ref": {"data": {"type": "people", "id": "1"}}}
    }]
  }"#
  .parse()
  .unwrap();

  let decoded: Article = mapper().decode(&document).unwrap().unwrap();
  let author = decoded.author.clone().unwrap();
  let self_ref = author.borrow().self_ref.clone().unwrap();

  assert!(Rc::ptr_eq(&author, &self_ref));
  assert_eq!(self_ref.borrow().first_name.as_deref(), Some("a"));

  author.borrow_mut().self_ref = None;
}

#[test]
fn decode_many_from_text() {
  let text = r#"{
    "data": [
      {"type": "comments", "id": "1", "attributes": {"body": "x"},
       "relationships": {"author": {"data": {"type": "people", "id": "5"}}}},
      {"type": "comments", "id": "2", "attributes": {"body": "y"},
       "relationships": {"author": {"data": {"type": "people", "id": "5"}}}}
    ],
    "included": [{"type": "people", "id": "5", "attributes": {"last-name": "z"}}]
  }"#;

  let document: Document = text.parse().unwrap();
  let comments: Vec<Comment> = mapper().decode_document(&document).unwrap();

  assert_eq!(comments.len(), 2);
  let first = comments[0].author.clone().unwrap();
  let second = comments[1].author.clone().unwrap();
  assert!(Rc::ptr_eq(&first, &second));
  assert_eq!(first.borrow().last_name.as_deref(), Some("z"));
}

#[test]
fn decoding_into_the_wrong_record_type_fails() {
  let document: SingleDocument = r#"{"data": {"type": "people", "id": "1"}}"#.parse().unwrap();
  let err = mapper().decode::<Article>(&document).unwrap_err();
  assert!(matches!(err, CodecError::MalformedDocument(_)));
}

#[test]
fn malformed_text_is_reported() {
  let err = r#"{"data": {"type": "articles", "id": "1", "relationships": {"author": 5}}}"#
    .parse::<SingleDocument>()
    .unwrap_err();
  assert!(matches!(err, CodecError::MalformedDocument(_)));
}
