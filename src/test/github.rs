use mockito::{Matcher, Mock, Server};

use deploy_keys::DeployKeyService;
use error::*;
use github::Github;
use types::{DeployKey, KeyId, RepositoryId};

const DEPLOY_KEY: &str = include_str!("data/deploy_key.json");
const DEPLOY_KEYS_PAGE1: &str = include_str!("data/deploy_keys_page1.json");
const DEPLOY_KEYS_PAGE2: &str = include_str!("data/deploy_keys_page2.json");

const KEYS_PATH: &str = "/repos/octocat/Hello-World/keys";

fn github(server: &Server) -> Github {
    Github::new_insecure(server.host_with_port(), "t").unwrap()
}

fn repo() -> RepositoryId {
    RepositoryId::new("octocat", "Hello-World")
}

fn with_api_headers(mock: Mock) -> Mock {
    mock.match_header("authorization", "token t")
        .match_header("accept", "application/vnd.github.v3+json")
        .match_header("user-agent", Matcher::Regex("^rust-github/".to_string()))
}

fn page_query(page: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".to_string(), page.to_string()),
        Matcher::UrlEncoded("per_page".to_string(), "100".to_string()),
    ])
}

#[test]
fn test_list_keys_follows_link_header() {
    let mut server = Server::new();
    let link = format!("<{}{}?page=2&per_page=100>; rel=\"next\", \
                        <{}{}?page=2&per_page=100>; rel=\"last\"",
                       server.url(), KEYS_PATH, server.url(), KEYS_PATH);
    let first = with_api_headers(server.mock("GET", KEYS_PATH))
        .match_query(page_query("1"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("link", &link)
        .with_body(DEPLOY_KEYS_PAGE1)
        .create();
    let second = with_api_headers(server.mock("GET", KEYS_PATH))
        .match_query(page_query("2"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DEPLOY_KEYS_PAGE2)
        .create();
    let api = github(&server);

    let keys = DeployKeyService::new(&api).list_keys(&repo()).unwrap();

    let titles = keys.iter()
        .map(|key| key.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["frontend-ci", "release-bot", "mirror"]);
    first.assert();
    second.assert();
}

#[test]
fn test_get_key_sends_api_headers() {
    let mut server = Server::new();
    let mock = with_api_headers(server.mock("GET", "/repos/octocat/Hello-World/keys/7"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DEPLOY_KEY)
        .create();
    let api = github(&server);

    let key = DeployKeyService::new(&api).get_key("octocat/Hello-World", KeyId::new(7)).unwrap();

    assert_eq!(key.id, Some(KeyId::new(7)));
    assert_eq!(key.title, "octocat@octomac");
    mock.assert();
}

#[test]
fn test_get_key_not_found() {
    let mut server = Server::new();
    let mock = server.mock("GET", "/repos/octocat/Hello-World/keys/8")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Not Found", "documentation_url": "https://docs.github.com/rest"}"#)
        .create();
    let api = github(&server);

    let err = DeployKeyService::new(&api).get_key(&repo(), KeyId::new(8)).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "github error (404): Not Found");
    mock.assert();
}

#[test]
fn test_create_key_posts_json() {
    let mut server = Server::new();
    let mock = with_api_headers(server.mock("POST", KEYS_PATH))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "title": "laptop",
            "key": "ssh-rsa AAAA...",
            "read_only": true,
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{
            "id": 42,
            "title": "laptop",
            "key": "ssh-rsa AAAA...",
            "read_only": true,
            "verified": true,
            "created_at": "2021-06-01T10:00:00Z"
        }"#)
        .create();
    let api = github(&server);

    let key = DeployKey::new("laptop", "ssh-rsa AAAA...").with_read_only(true);
    let created = DeployKeyService::new(&api).create_key(&repo(), &key).unwrap();

    assert_eq!(created.id, Some(KeyId::new(42)));
    assert_eq!(created.title, "laptop");
    assert_eq!(created.verified, Some(true));
    mock.assert();
}

#[test]
fn test_create_key_validation_failure() {
    let mut server = Server::new();
    let mock = server.mock("POST", KEYS_PATH)
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{
            "message": "Validation Failed",
            "errors": [
                {
                    "resource": "PublicKey",
                    "code": "custom",
                    "field": "key",
                    "message": "key is already in use"
                }
            ]
        }"#)
        .create();
    let api = github(&server);

    let key = DeployKey::new("laptop", "ssh-rsa AAAA...");
    let err = DeployKeyService::new(&api).create_key(&repo(), &key).unwrap_err();

    match *err.kind() {
        ErrorKind::Github(422, ref msg) => assert_eq!(msg, "Validation Failed: key is already in use"),
        ref kind => panic!("unexpected error kind: {:?}", kind),
    }
    mock.assert();
}

#[test]
fn test_edit_key_posts_to_key() {
    let mut server = Server::new();
    let mock = with_api_headers(server.mock("POST", "/repos/octocat/Hello-World/keys/7"))
        .match_body(Matcher::PartialJson(json!({
            "id": 7,
            "title": "octocat@octomac",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DEPLOY_KEY)
        .create();
    let api = github(&server);

    let key: DeployKey = ::serde_json::from_str(DEPLOY_KEY).unwrap();
    let edited = DeployKeyService::new(&api).edit_key(&repo(), &key).unwrap();

    assert_eq!(edited, key);
    mock.assert();
}

#[test]
fn test_delete_key_no_content() {
    let mut server = Server::new();
    let mock = with_api_headers(server.mock("DELETE", "/repos/octocat/Hello-World/keys/7"))
        .with_status(204)
        .create();
    let api = github(&server);

    DeployKeyService::new(&api).delete_key(&repo(), KeyId::new(7)).unwrap();

    mock.assert();
}

#[test]
fn test_error_without_json_body() {
    let mut server = Server::new();
    let mock = server.mock("DELETE", "/repos/octocat/Hello-World/keys/7")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Bad Gateway</body></html>")
        .create();
    let api = github(&server);

    let err = DeployKeyService::new(&api).delete_key(&repo(), KeyId::new(7)).unwrap_err();

    match *err.kind() {
        ErrorKind::Github(502, ref msg) => assert_eq!(msg, "unknown error"),
        ref kind => panic!("unexpected error kind: {:?}", kind),
    }
    mock.assert();
}
