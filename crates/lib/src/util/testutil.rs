//! Test fixtures for jsonapi-lib.
//!
//! A small blog model (articles written by people, with comments) and a
//! registry over it. `Person` has a to-one relationship to itself so cyclic
//! graphs can be built.

use std::sync::Arc;

use crate::registry::{Registry, ResourceDescriptor, Shared, shared};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
  pub id: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub twitter: Option<String>,
  pub self_ref: Option<Shared<Person>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Comment {
  pub id: Option<String>,
  pub body: Option<String>,
  pub author: Option<Shared<Person>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Article {
  pub id: Option<String>,
  pub title: Option<String>,
  pub author: Option<Shared<Person>>,
  pub comments: Vec<Shared<Comment>>,
}

pub fn sample_registry() -> Registry {
  Registry::builder()
    .resource(
      ResourceDescriptor::<Article>::new("articles")
        .id(|a| &a.id, |a| &mut a.id)
        .attribute("title", |a| &a.title, |a| &mut a.title)
        .to_one("author", |a| &a.author, |a| &mut a.author)
        .to_many("comments", |a| &a.comments, |a| &mut a.comments),
    )
    .resource(
      ResourceDescriptor::<Person>::new("people")
        .id(|p| &p.id, |p| &mut p.id)
        .attribute("firstName", |p| &p.first_name, |p| &mut p.first_name)
        .attribute("lastName", |p| &p.last_name, |p| &mut p.last_name)
        .attribute("twitter", |p| &p.twitter, |p| &mut p.twitter)
        .to_one("selfRef", |p| &p.self_ref, |p| &mut p.self_ref),
    )
    .resource(
      ResourceDescriptor::<Comment>::new("comments")
        .id(|c| &c.id, |c| &mut c.id)
        .attribute("body", |c| &c.body, |c| &mut c.body)
        .to_one("author", |c| &c.author, |c| &mut c.author),
    )
    .build()
    .expect("sample registry is valid")
}

pub fn sample_registry_arc() -> Arc<Registry> {
  Arc::new(sample_registry())
}

pub fn person(id: &str, first: &str, last: &str) -> Shared<Person> {
  shared(Person {
    id: Some(id.to_string()),
    first_name: Some(first.to_string()),
    last_name: Some(last.to_string()),
    ..Default::default()
  })
}

/// A person carrying only an id: a pure reference.
pub fn person_ref(id: &str) -> Shared<Person> {
  shared(Person {
    id: Some(id.to_string()),
    ..Default::default()
  })
}

pub fn comment(id: &str, body: &str, author: Option<Shared<Person>>) -> Shared<Comment> {
  shared(Comment {
    id: Some(id.to_string()),
    body: Some(body.to_string()),
    author,
  })
}

/// The article from the canonical encode example: author people/1, comments
/// 10 (by people/1) and 20 (by a bare reference to people/2).
pub fn sample_article() -> Article {
  let author = person("1", "a", "b");
  Article {
    id: Some("1".to_string()),
    title: Some("t".to_string()),
    author: Some(author.clone()),
    comments: vec![
      comment("10", "first", Some(author)),
      comment("20", "lol", Some(person_ref("2"))),
    ],
  }
}
