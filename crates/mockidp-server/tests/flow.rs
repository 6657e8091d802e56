//! Integration tests for the full authorization-code flow over HTTP.
//!
//! Each test boots the server on an ephemeral port and drives it the way a
//! Relying Party would: discovery, authorize, login, token, and signature
//! verification against the published JWKS.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use mockidp_server::{AppConfig, build_router};
use serde_json::Value;
use tokio::task::JoinHandle;

const ISSUER: &str = "https://idp.test";
const CLIENT_ID: &str = "cid-1";

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.idp.issuer = ISSUER.to_string();
    config.idp.client_id = CLIENT_ID.to_string();
    config
}

async fn start_server(
    config: &AppConfig,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_router(config).expect("build router");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

/// Client that does not follow redirects, so the login 302 can be inspected.
fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Runs authorize + login for the given username and returns the code and
/// echoed state from the redirect.
async fn obtain_code(
    client: &reqwest::Client,
    base: &str,
    username: &str,
    state: &str,
    nonce: &str,
) -> (String, Option<String>) {
    let resp = client
        .get(format!(
            "{base}/authorize?redirect_uri=https://rp.test/cb&state={state}&nonce={nonce}"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let form = resp.text().await.unwrap();
    assert!(form.contains("name=\"username\""));

    let resp = client
        .post(format!("{base}/login"))
        .form(&[
            ("username", username),
            ("redirect_uri", "https://rp.test/cb"),
            ("state", state),
            ("nonce", nonce),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FOUND);

    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("login redirects")
        .to_string();
    let url = reqwest::Url::parse(&location).unwrap();
    assert_eq!(url.host_str(), Some("rp.test"));
    assert_eq!(url.path(), "/cb");

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .expect("redirect carries code");
    let echoed_state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned());
    (code, echoed_state)
}

/// Verifies an ID token against the server's JWKS endpoint, returning its
/// claims.
async fn verify_id_token(client: &reqwest::Client, base: &str, id_token: &str) -> Value {
    let jwks: Value = client
        .get(format!("{base}/jwks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let keys = jwks["keys"].as_array().expect("keys array");
    assert_eq!(keys.len(), 1);

    let header = jsonwebtoken::decode_header(id_token).unwrap();
    assert_eq!(header.alg, Algorithm::ES256);
    let kid = header.kid.expect("header carries kid");

    let jwk = keys
        .iter()
        .find(|k| k["kid"] == kid.as_str())
        .expect("kid resolves to a published key");
    assert_eq!(jwk["use"], "sig");
    assert_eq!(jwk["alg"], "ES256");
    assert_eq!(jwk["kty"], "EC");
    assert_eq!(jwk["crv"], "P-256");

    let decoding_key =
        DecodingKey::from_ec_components(jwk["x"].as_str().unwrap(), jwk["y"].as_str().unwrap())
            .unwrap();
    let mut validation = Validation::new(Algorithm::ES256);
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[CLIENT_ID]);

    jsonwebtoken::decode::<Value>(id_token, &decoding_key, &validation)
        .expect("id_token verifies against JWKS")
        .claims
}

#[tokio::test]
async fn authorization_code_flow_round_trip() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let (code, echoed_state) = obtain_code(&client, &base, "alice", "s1", "n1").await;
    assert_eq!(echoed_state.as_deref(), Some("s1"));

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("grant_type", "authorization_code"), ("code", code.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers().get(reqwest::header::CACHE_CONTROL).unwrap(),
        "no-store"
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 300);
    assert!(!body["access_token"].as_str().unwrap().is_empty());

    let claims = verify_id_token(&client, &base, body["id_token"].as_str().unwrap()).await;
    assert_eq!(claims["sub"], "alice");
    assert_eq!(claims["name"], "alice");
    assert_eq!(claims["email"], "alice");
    assert_eq!(claims["nonce"], "n1");
    assert_eq!(claims["aud"], CLIENT_ID);
    assert_eq!(claims["iss"], ISSUER);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn token_accepts_json_body() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let (code, _) = obtain_code(&client, &base, "bob", "s2", "n2").await;

    let resp = client
        .post(format!("{base}/token"))
        .json(&serde_json::json!({ "code": code }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let claims = verify_id_token(&client, &base, body["id_token"].as_str().unwrap()).await;
    assert_eq!(claims["sub"], "bob");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn codes_are_single_use() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let (code, _) = obtain_code(&client, &base, "alice", "s1", "n1").await;

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("code", code.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("code", code.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_grant");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn repeat_redemption_allowed_when_configured() {
    let mut config = test_config();
    config.idp.single_use_codes = false;
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let (code, _) = obtain_code(&client, &base, "alice", "s1", "n1").await;

    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/token"))
            .form(&[("code", code.as_str())])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unknown_code_is_invalid_grant() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("code", "never-issued")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_grant");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn missing_code_is_invalid_request() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("grant_type", "authorization_code")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unsupported_grant_type_rejected() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .post(format!("{base}/token"))
        .form(&[("grant_type", "client_credentials"), ("code", "whatever")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "unsupported_grant_type");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn authorize_without_redirect_uri_is_rejected() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .get(format!("{base}/authorize"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let resp = client
        .get(format!("{base}/authorize?redirect_uri="))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn login_form_escapes_pass_through_values() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .get(format!(
            "{base}/authorize?redirect_uri=https://rp.test/cb&state=%22%3E%3Cscript%3Ealert(1)%3C/script%3E"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let form = resp.text().await.unwrap();
    assert!(!form.contains("<script>"));
    assert!(form.contains("&lt;script&gt;"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn discovery_document_is_stable() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let first: Value = client
        .get(format!("{base}/.well-known/openid-configuration"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second: Value = client
        .get(format!("{base}/.well-known/openid-configuration"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first["issuer"], ISSUER);
    assert_eq!(first["authorization_endpoint"], format!("{ISSUER}/authorize"));
    assert_eq!(first["token_endpoint"], format!("{ISSUER}/token"));
    assert_eq!(first["jwks_uri"], format!("{ISSUER}/jwks"));
    assert_eq!(first["response_types_supported"][0], "code");
    assert_eq!(first["grant_types_supported"][0], "authorization_code");
    assert_eq!(first["id_token_signing_alg_values_supported"][0], "ES256");
    assert_eq!(first["scopes_supported"][0], "openid");
    assert_eq!(
        first["token_endpoint_auth_methods_supported"][0],
        "client_secret_post"
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn distinct_logins_produce_distinct_codes() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let (code_a, _) = obtain_code(&client, &base, "alice", "s1", "n1").await;
    let (code_b, _) = obtain_code(&client, &base, "bob", "s2", "n2").await;
    assert_ne!(code_a, code_b);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn login_without_state_omits_it_from_redirect() {
    let config = test_config();
    let (base, shutdown_tx, handle) = start_server(&config).await;
    let client = no_redirect_client();

    let resp = client
        .post(format!("{base}/login"))
        .form(&[
            ("username", "alice"),
            ("redirect_uri", "https://rp.test/cb"),
            ("state", ""),
            ("nonce", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::FOUND);

    let location = resp
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    let url = reqwest::Url::parse(location).unwrap();
    assert!(url.query_pairs().any(|(k, _)| k == "code"));
    assert!(!url.query_pairs().any(|(k, _)| k == "state"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
