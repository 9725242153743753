// Unit tests for response-shape normalization.
//
// Every shape the upstream API has been seen to produce must collapse to
// the same canonical list, and junk must collapse to empty — never error.

use serde_json::{json, Value};

use sepia::booru::models::{Post, Tag};
use sepia::booru::normalize::{decode, records, Resource};

#[test]
fn null_body_is_zero_results() {
    assert!(records(Value::Null, Resource::Post).is_empty());
    assert!(records(Value::Null, Resource::Tag).is_empty());
}

#[test]
fn bare_list_is_the_result_list() {
    let body = json!([{"id": 1}, {"id": 2}]);
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, Some(1));
    assert_eq!(posts[1].id, Some(2));
}

#[test]
fn wrapped_list_unwraps() {
    let body = json!({"post": [{"id": 1}]});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, Some(1));
}

#[test]
fn single_object_under_key_becomes_one_element_list() {
    let body = json!({"post": {"id": 1}});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, Some(1));
}

#[test]
fn pluralized_key_aliases_to_expected_key() {
    let body = json!({"posts": [{"id": 3}, {"id": 4}]});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 2);

    let body = json!({"tags": [{"name": "cat"}]});
    let tags: Vec<Tag> = decode(body, Resource::Tag);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "cat");
}

#[test]
fn singular_key_wins_over_plural() {
    let body = json!({"post": [{"id": 1}], "posts": [{"id": 2}, {"id": 3}]});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, Some(1));
}

#[test]
fn object_without_resource_key_is_empty() {
    // Gelbooru wraps results with an @attributes envelope even when the
    // page is past the end and no post key is present at all.
    let body = json!({"@attributes": {"limit": 100, "offset": 0, "count": 0}});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert!(posts.is_empty());
}

#[test]
fn scalar_top_level_is_empty_not_error() {
    let posts: Vec<Post> = decode(json!("success"), Resource::Post);
    assert!(posts.is_empty());
    let posts: Vec<Post> = decode(json!(0), Resource::Post);
    assert!(posts.is_empty());
}

#[test]
fn scalar_under_resource_key_is_empty() {
    let body = json!({"post": "none"});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert!(posts.is_empty());
}

#[test]
fn undecodable_record_is_dropped_alone() {
    // id carries a nonsense type in the second record; the other two survive
    let body = json!({"post": [{"id": 1}, {"id": {"nested": true}}, {"id": 3}]});
    let posts: Vec<Post> = decode(body, Resource::Post);
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, Some(1));
    assert_eq!(posts[1].id, Some(3));
}

#[test]
fn comment_resource_normalizes_like_the_others() {
    let body = json!({"comment": {"post_id": 5, "body": "hi"}});
    let comments: Vec<sepia::booru::models::Comment> = decode(body, Resource::Comment);
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].post_id, Some(5));
}
