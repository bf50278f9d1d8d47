//! Tests for MCP integration functionality
//!
//! These drive the server through `call_tool`, `read_resource` and
//! `get_prompt` with a scripted sampling client and in-memory or failing
//! repositories.

use super::core::{CallToolResult, MIME_JSON, MIME_TEXT, UserMcpServer};
use crate::error::ProtocolError;
use crate::sampling::{SamplingClient, SamplingError, SamplingRequest, SamplingResponse};
use crate::storage::{InMemoryStorage, StorageError, UserRepository};
use crate::store::UserStore;
use crate::user::User;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sampling client that replays queued replies and counts calls.
#[derive(Default)]
struct ScriptedSampler {
    replies: Mutex<VecDeque<Result<SamplingResponse, SamplingError>>>,
    requests: Mutex<Vec<SamplingRequest>>,
}

impl ScriptedSampler {
    fn replying(text: &str) -> Self {
        let sampler = Self::default();
        sampler.push(Ok(SamplingResponse::text(text)));
        sampler
    }

    fn failing(error: SamplingError) -> Self {
        let sampler = Self::default();
        sampler.push(Err(error));
        sampler
    }

    fn push(&self, reply: Result<SamplingResponse, SamplingError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl SamplingClient for ScriptedSampler {
    async fn create_message(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResponse, SamplingError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(SamplingError::Disconnected))
    }
}

/// Repository whose loads and/or saves fail.
#[derive(Default)]
struct BrokenStorage {
    fail_load: bool,
    saves: AtomicUsize,
}

impl UserRepository for BrokenStorage {
    async fn load(&self) -> Result<Vec<User>, StorageError> {
        if self.fail_load {
            Err(StorageError::unavailable("disk unplugged"))
        } else {
            Ok(Vec::new())
        }
    }

    async fn save(&self, _users: &[User]) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::unavailable("read-only medium"))
    }
}

fn server(sampler: ScriptedSampler) -> UserMcpServer<InMemoryStorage, ScriptedSampler> {
    UserMcpServer::new(UserStore::new(InMemoryStorage::new()), sampler)
}

fn ada() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "address": "12 St James's Square, London",
        "phone": "+44 20 7946 0000"
    })
}

fn text_of(result: &CallToolResult) -> &str {
    result.first_text().expect("tool result has text")
}

async fn read_json<R: UserRepository, C: SamplingClient>(
    server: &UserMcpServer<R, C>,
    uri: &str,
) -> Value {
    let result = server.read_resource(uri).await.unwrap();
    assert_eq!(result.contents.len(), 1);
    assert_eq!(result.contents[0].uri, uri);
    assert_eq!(result.contents[0].mime_type, MIME_JSON);
    serde_json::from_str(&result.contents[0].text).unwrap()
}

#[tokio::test]
async fn test_create_user_assigns_sequential_ids() {
    let server = server(ScriptedSampler::default());

    let first = server.call_tool("create-user", ada()).await.unwrap();
    assert_eq!(text_of(&first), "User created with ID: 1");

    let mut grace = ada();
    grace["name"] = json!("Grace Hopper");
    grace["email"] = json!("grace@navy.mil");
    let second = server.call_tool("create-user", grace).await.unwrap();
    assert_eq!(text_of(&second), "User created with ID: 2");

    let users = read_json(&server, "users://all").await;
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[1]["id"], 2);
    assert_eq!(users[1]["name"], "Grace Hopper");
}

#[tokio::test]
async fn test_profile_returns_stored_fields() {
    let server = server(ScriptedSampler::default());
    server.call_tool("create-user", ada()).await.unwrap();

    let profile = read_json(&server, "users://1/profile").await;
    let mut expected = ada();
    expected["id"] = json!(1);
    assert_eq!(profile, expected);
}

#[tokio::test]
async fn test_listing_is_stable_without_writes() {
    let server = server(ScriptedSampler::default());
    server.call_tool("create-user", ada()).await.unwrap();

    let first = server.read_resource("users://all").await.unwrap();
    let second = server.read_resource("users://all").await.unwrap();
    assert_eq!(first.contents[0].text, second.contents[0].text);
}

#[tokio::test]
async fn test_listing_field_order() {
    let server = server(ScriptedSampler::default());
    server.call_tool("create-user", ada()).await.unwrap();

    let listing = server.read_resource("users://all").await.unwrap();
    assert!(
        listing.contents[0]
            .text
            .starts_with(r#"[{"id":1,"name":"Ada Lovelace","email":"#)
    );
}

#[tokio::test]
async fn test_empty_listing() {
    let server = server(ScriptedSampler::default());
    let listing = server.read_resource("users://all").await.unwrap();
    assert_eq!(listing.contents[0].text, "[]");
}

#[tokio::test]
async fn test_missing_profile_is_null() {
    let server = server(ScriptedSampler::default());
    server.call_tool("create-user", ada()).await.unwrap();

    for uri in ["users://99/profile", "users://abc/profile", "users://12abc/profile"] {
        let result = server.read_resource(uri).await.unwrap();
        assert_eq!(result.contents[0].mime_type, MIME_JSON, "{uri}");
        assert_eq!(result.contents[0].text, "null", "{uri}");
    }
}

#[tokio::test]
async fn test_profile_id_with_trailing_text() {
    let server = server(ScriptedSampler::default());
    server.call_tool("create-user", ada()).await.unwrap();

    for uri in ["users://1abc/profile", "users://1.5/profile", "users://+1/profile"] {
        let profile = read_json(&server, uri).await;
        assert_eq!(profile["id"], 1, "{uri}");
        assert_eq!(profile["name"], ada()["name"], "{uri}");
    }
}

#[tokio::test]
async fn test_random_user_from_fenced_output() {
    let sampler = ScriptedSampler::replying(
        "```json\n{\"name\":\"Bob\",\"email\":\"b@x.io\",\"address\":\"1 Main\",\"phone\":\"555\"}\n```",
    );
    let server = server(sampler);
    server.call_tool("create-user", ada()).await.unwrap();

    let result = server.call_tool("create-random-user", json!({})).await.unwrap();
    assert_eq!(text_of(&result), "Random user created with ID: 2");

    let profile = read_json(&server, "users://2/profile").await;
    assert_eq!(
        profile,
        json!({"id": 2, "name": "Bob", "email": "b@x.io", "address": "1 Main", "phone": "555"})
    );
}

#[tokio::test]
async fn test_random_user_sends_fixed_instruction() {
    let sampler = ScriptedSampler::replying(r#"{"name":"A","email":"a@b.co","address":"","phone":""}"#);
    let server = server(sampler).with_sampling_max_tokens(256);

    server.call_tool("create-random-user", json!({})).await.unwrap();

    let requests = server.sampler().requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        SamplingRequest::single_turn(super::handlers::user_tools::RANDOM_USER_INSTRUCTION, 256)
    );
}

#[tokio::test]
async fn test_random_user_fills_missing_fields() {
    let server = server(ScriptedSampler::replying(r#"{"name":"Only Name","phone":5550100}"#));

    let result = server.call_tool("create-random-user", json!({})).await.unwrap();
    assert_eq!(text_of(&result), "Random user created with ID: 1");

    let profile = read_json(&server, "users://1/profile").await;
    assert_eq!(profile["email"], "");
    assert_eq!(profile["address"], "");
    assert_eq!(profile["phone"], "5550100");
}

#[tokio::test]
async fn test_random_user_extra_keys_are_dropped() {
    let server = server(ScriptedSampler::replying(
        r#"{"id":42,"name":"Eve","email":"eve@example.com","address":"2 Side","phone":"555","role":"admin"}"#,
    ));

    let result = server.call_tool("create-random-user", json!({})).await.unwrap();
    assert_eq!(text_of(&result), "Random user created with ID: 1");

    let users = read_json(&server, "users://all").await;
    assert_eq!(
        users,
        json!([{"id": 1, "name": "Eve", "email": "eve@example.com", "address": "2 Side", "phone": "555"}])
    );
}

#[tokio::test]
async fn test_empty_generation_stores_nothing() {
    let server = server(ScriptedSampler::replying(""));

    let result = server.call_tool("create-random-user", json!({})).await.unwrap();
    assert_eq!(text_of(&result), "Failed to generate user");
    assert!(server.store().repository().is_empty().await);
}

#[tokio::test]
async fn test_sampling_failure_stores_nothing() {
    for error in [
        SamplingError::Unsupported,
        SamplingError::Disconnected,
        SamplingError::Rejected {
            code: -1,
            message: "User rejected sampling request".into(),
        },
    ] {
        let server = server(ScriptedSampler::failing(error));
        let result = server.call_tool("create-random-user", json!({})).await.unwrap();
        assert_eq!(text_of(&result), "Failed to generate user");
        assert!(server.store().repository().is_empty().await);
    }
}

#[tokio::test]
async fn test_unparseable_generation_stores_nothing() {
    for reply in ["not json", "```json\n[1, 2]\n```", "\"just a string\""] {
        let server = server(ScriptedSampler::replying(reply));
        let result = server.call_tool("create-random-user", json!({})).await.unwrap();
        assert_eq!(text_of(&result), "Failed to generate user data", "{reply}");
        assert!(server.store().repository().is_empty().await);
    }
}

#[tokio::test]
async fn test_storage_failures_are_generic_messages() {
    let server = UserMcpServer::new(
        UserStore::new(BrokenStorage::default()),
        ScriptedSampler::replying(r#"{"name":"A","email":"a@b.co","address":"x","phone":"1"}"#),
    );

    let result = server.call_tool("create-user", ada()).await.unwrap();
    assert_eq!(text_of(&result), "Error creating user");

    let result = server.call_tool("create-random-user", json!({})).await.unwrap();
    assert_eq!(text_of(&result), "Failed to generate user data");
    assert_eq!(server.store().repository().saves.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreadable_store_on_resources() {
    let server = UserMcpServer::new(
        UserStore::new(BrokenStorage {
            fail_load: true,
            ..Default::default()
        }),
        ScriptedSampler::default(),
    );

    let listing = server.read_resource("users://all").await.unwrap();
    assert_eq!(listing.contents[0].mime_type, MIME_TEXT);
    assert_eq!(listing.contents[0].text, "Error retrieving users");

    let profile = server.read_resource("users://7/profile").await.unwrap();
    assert_eq!(profile.contents[0].mime_type, MIME_TEXT);
    assert_eq!(
        profile.contents[0].text,
        "Error retrieving user detail of the id 7"
    );

    let result = server.call_tool("create-user", ada()).await.unwrap();
    assert_eq!(text_of(&result), "Error creating user");
    assert_eq!(server.store().repository().saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_arguments_are_protocol_errors() {
    let server = server(ScriptedSampler::default());

    let mut bad_email = ada();
    bad_email["email"] = json!("not-an-email");
    let missing_phone = json!({"name": "A", "email": "a@b.co", "address": "x"});
    let wrong_type = json!({"name": 1, "email": "a@b.co", "address": "x", "phone": "1"});

    for arguments in [bad_email, missing_phone, wrong_type, json!("nope")] {
        let err = server.call_tool("create-user", arguments).await.unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidInput(_)), "{err}");
    }
    assert!(server.store().repository().is_empty().await);
}

#[tokio::test]
async fn test_unknown_names_are_protocol_errors() {
    let server = server(ScriptedSampler::default());

    assert!(matches!(
        server.call_tool("delete-user", json!({})).await,
        Err(ProtocolError::UnknownTool(name)) if name == "delete-user"
    ));
    assert!(matches!(
        server.read_resource("users://").await,
        Err(ProtocolError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        server.get_prompt("create-real-user", &json!({"name": "x"})),
        Err(ProtocolError::UnknownPrompt(_))
    ));
    assert!(matches!(
        server.get_prompt("create-fake-user", &json!({})),
        Err(ProtocolError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_prompt_renders_name() {
    let server = server(ScriptedSampler::default());
    let prompt = server
        .get_prompt("create-fake-user", &json!({"name": "Linus"}))
        .unwrap();

    assert_eq!(prompt.messages.len(), 1);
    assert!(
        prompt.messages[0]
            .content
            .as_text()
            .starts_with("Create a fake user with the name Linus.")
    );
    assert_eq!(server.sampler().calls(), 0);
}

#[test]
fn test_discovery_listings() {
    let server = server(ScriptedSampler::default());

    let tools: Vec<Value> = server.list_tools();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, ["create-user", "create-random-user"]);

    let resources = server.list_resources();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "users://all");

    let templates = server.list_resource_templates();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0]["uriTemplate"], "users://{userId}/profile");
    assert!(
        resources
            .iter()
            .all(|r| r.get("uriTemplate").is_none())
    );

    let prompts = server.list_prompts();
    assert_eq!(prompts[0]["name"], "create-fake-user");
}
