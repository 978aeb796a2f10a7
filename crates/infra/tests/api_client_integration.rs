//! Integration tests for ApiClient against a local HTTP server
//!
//! **Coverage:**
//! - Session is acquired once and reused across calls
//! - Expired session triggers exactly one reacquisition
//! - Method URL layout with the access token last
//! - Error documents surface as remote API errors
//! - Integer-list, single-object and list-wrapper response shapes
//!
//! **Infrastructure:**
//! - WireMock HTTP server
//! - Real reqwest transport (blocking, driven through `spawn_blocking`)
//! - Scripted token acquirer

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use vknet_common::auth::{Permission, SessionToken};
use vknet_common::testing::MockTokenAcquirer;
use vknet_domain::{ListDocument, User, UserListResponse};
use vknet_infra::{
    ApiClient, ApiError, ApiErrorCategory, ApiRequest, IntegerList, ListWrapper, RawDocument,
    SingleObject,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRIENDS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<response list="true">
  <uid>1</uid>
  <uid>2</uid>
  <uid>3</uid>
</response>"#;

const PROFILES_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<response list="true">
  <user>
    <uid>1</uid>
    <first_name>Pavel</first_name>
    <last_name>Durov</last_name>
  </user>
  <user>
    <uid>6492</uid>
    <first_name>Andrew</first_name>
    <last_name>Rogozov</last_name>
  </user>
</response>"#;

const ERROR_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<error>
  <error_code>5</error_code>
  <error_msg>User authorization failed: invalid access_token.</error_msg>
</error>"#;

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/xml; charset=utf-8")
}

/// Must be called on a blocking thread.
fn client(uri: String, acquirer: Arc<MockTokenAcquirer>) -> ApiClient {
    ApiClient::builder()
        .base_url(uri)
        .app_id(2_951_857)
        .scopes([Permission::Friends, Permission::Offline])
        .acquirer(acquirer)
        .build()
        .expect("client should build")
}

/// Run `f` on a blocking thread; the blocking reqwest client must not be
/// created or dropped inside the async runtime.
async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task panicked")
}

#[tokio::test]
async fn session_is_acquired_once_and_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/friends.get.xml"))
        .and(query_param("access_token", "T"))
        .respond_with(xml(FRIENDS_XML))
        .expect(2)
        .mount(&server)
        .await;

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0)));
    let uri = server.uri();
    let shared = acquirer.clone();
    let calls = blocking(move || {
        let client = client(uri, shared);
        let request = ApiRequest::new("friends.get");
        let first = client.call::<IntegerList>(&request).expect("first call");
        let second = client.call::<IntegerList>(&request).expect("second call");
        (first, second)
    })
    .await;

    assert_eq!(calls.0, vec![1, 2, 3]);
    assert_eq!(calls.0, calls.1);
    assert_eq!(acquirer.calls(), 1);
    let request = &acquirer.requests()[0];
    assert_eq!(request.app_id, 2_951_857);
    assert_eq!(request.scopes, vec![Permission::Friends, Permission::Offline]);
}

#[tokio::test]
async fn expired_session_is_reacquired_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/friends.get.xml"))
        .and(query_param("access_token", "FRESH"))
        .respond_with(xml(FRIENDS_XML))
        .expect(2)
        .mount(&server)
        .await;

    let stale = SessionToken::issued_at(1, "STALE", 60, Utc::now() - ChronoDuration::hours(1));
    assert!(stale.is_expired());

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "FRESH", 86_400)));
    acquirer.push_result(Ok(stale));

    let uri = server.uri();
    let shared = acquirer.clone();
    blocking(move || {
        let client = client(uri, shared);

        // First acquisition hands out an already expired token; it is used
        // for nothing and replaced on the first call.
        let _ = client.user_id().expect("stale session");
        assert!(client.session().expect("cached").is_expired());

        client.call::<IntegerList>(&ApiRequest::new("friends.get")).expect("call with fresh token");
        client.call::<IntegerList>(&ApiRequest::new("friends.get")).expect("reuse fresh token");
        assert_eq!(client.session().expect("cached").token(), "FRESH");
    })
    .await;

    assert_eq!(acquirer.calls(), 2);
}

#[tokio::test]
async fn parameters_precede_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/getProfiles.xml"))
        .and(query_param("uids", "1,6492"))
        .and(query_param("fields", "first_name,last_name"))
        .and(query_param("access_token", "T"))
        .respond_with(xml(PROFILES_XML))
        .expect(1)
        .mount(&server)
        .await;

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0)));
    let uri = server.uri();
    let profiles = blocking(move || {
        let client = client(uri, acquirer);

        let request = ApiRequest::new("getProfiles")
            .with_param("uids", "1,6492")
            .with_param("fields", "first_name,last_name");
        client.call::<ListWrapper<UserListResponse>>(&request)
    })
    .await
    .expect("profiles");

    let received = server.received_requests().await.expect("recording enabled");
    let query = received[0].url.query().expect("query string");
    assert!(query.ends_with("access_token=T"), "access token must come last: {query}");
    assert!(query.starts_with("uids="));

    assert!(profiles.is_list);
    assert_eq!(profiles.items().len(), 2);
    assert_eq!(profiles.items()[1].full_name(), "Andrew Rogozov");
}

#[tokio::test]
async fn error_document_becomes_remote_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/getUserSettings.xml"))
        .respond_with(xml(ERROR_XML))
        .mount(&server)
        .await;

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0)));
    let uri = server.uri();
    let result = blocking(move || {
        let client = client(uri, acquirer);
        client.call::<RawDocument>(&ApiRequest::new("getUserSettings"))
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.remote_code(), Some(5));
    assert_eq!(err.category(), ApiErrorCategory::RemoteApi);
    assert!(matches!(err, ApiError::RemoteApi { message, .. } if message.contains("invalid access_token")));
}

#[tokio::test]
async fn single_object_decodes_first_child() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/method/getProfiles.xml"))
        .respond_with(xml(PROFILES_XML))
        .mount(&server)
        .await;

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0)));
    let uri = server.uri();
    let user = blocking(move || {
        let client = client(uri, acquirer);
        client.call::<SingleObject<User>>(&ApiRequest::new("getProfiles").with_param("uids", 1))
    })
    .await
    .expect("user");

    assert_eq!(user.id, 1);
    assert_eq!(user.first_name, "Pavel");
    assert!(user.nickname.is_empty());
}

#[tokio::test]
async fn server_error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let acquirer = Arc::new(MockTokenAcquirer::new(SessionToken::new(1, "T", 0)));
    let uri = server.uri();
    let result = blocking(move || {
        let client = client(uri, acquirer);
        client.call::<IntegerList>(&ApiRequest::new("friends.get"))
    })
    .await;

    assert_eq!(result.unwrap_err().category(), ApiErrorCategory::Transport);
}

#[tokio::test]
async fn failed_acquisition_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(xml(FRIENDS_XML)).expect(0).mount(&server).await;

    let acquirer = Arc::new(MockTokenAcquirer::failing());
    let uri = server.uri();
    let result = blocking(move || {
        let client = client(uri, acquirer);
        client.call::<IntegerList>(&ApiRequest::new("friends.get"))
    })
    .await;

    assert!(matches!(result, Err(ApiError::Auth(_))));
}
