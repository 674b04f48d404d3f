use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use sarrum_lexicon::{Dictionary, LexiconOrigin, LexiconSource};
use sarrum_server::{AppState, router};

const SAMPLE: &str = "\
§1 Nouns and Pronouns
awīlum,man;gentleman,n,nom;s;m
šarrum,king,n,nom;s;m
šarrim,king,n,gen(šarrum);s;m

§2 Verbs
parāsum,to cut off;to decide,v,inf;G
iprus,he cut off,v,pret(parāsum);G
";

fn make_state() -> AppState {
    let tempdir = tempfile::tempdir().unwrap();
    let path = tempdir.path().join("lexicon.txt");
    std::fs::write(&path, SAMPLE).unwrap();
    let source = LexiconSource {
        text: std::fs::read_to_string(&path).unwrap(),
        version: Some(3),
        origin: LexiconOrigin::Cached,
    };
    let dict = Dictionary::from_source(&source).unwrap();
    AppState {
        dict: Arc::new(dict),
        source: Arc::new(source),
        disable_cache: false,
    }
}

async fn get(uri: &str) -> axum::http::Response<Body> {
    let app = router(make_state());
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::http::Response<Body>) -> serde_json::Value {
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let response = get("/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn defn_endpoint_returns_entries() {
    let response = get("/v1/defn?word=king&lang=en").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["word"], "king");
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["grammar_kind"], "n");
    assert_eq!(entries[0]["section"], 1);
}

#[tokio::test]
async fn defn_endpoint_handles_diacritics() {
    // `šarrum` percent-encoded.
    let response = get("/v1/defn?word=%C5%A1arrum&lang=akk").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["defns"][0], "king");
    let relations = entries[0]["relations"].as_array().unwrap();
    assert!(
        relations
            .iter()
            .any(|rel| rel["kind"] == "HasGenitive" && rel["word"] == "šarrim")
    );
}

#[tokio::test]
async fn defn_endpoint_unknown_word_gives_empty_entries() {
    let response = get("/v1/defn?word=zzz&lang=en").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn defn_endpoint_rejects_invalid_lang() {
    let response = get("/v1/defn?word=king&lang=fr").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("invalid lang")
    );
}

#[tokio::test]
async fn search_endpoint_folds_akkadian_prefixes() {
    let response = get("/v1/search?query=sar&lang=akk").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let items = body["items"].as_array().unwrap();
    let words: Vec<&str> = items.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(words, ["šarrim", "šarrum"]);
}

#[tokio::test]
async fn search_endpoint_matches_english_substrings() {
    let response = get("/v1/search?query=cut&lang=en&limit=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let items = body["items"].as_array().unwrap();
    let words: Vec<&str> = items.iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(words, ["he cut off", "to cut off"]);
}

#[tokio::test]
async fn search_endpoint_rejects_empty_query() {
    let response = get("/v1/search?query=&lang=en").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("required")
    );
}

#[tokio::test]
async fn search_endpoint_rejects_zero_limit() {
    let response = get("/v1/search?query=king&lang=en&limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap_or_default().contains("limit"));
}

#[tokio::test]
async fn search_endpoint_honors_section_filter() {
    let response = get("/v1/search?query=sar&lang=akk&sections=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_endpoint_rejects_bad_section_number() {
    let response = get("/v1/search?query=sar&lang=akk&sections=1,abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("section")
    );
}

#[tokio::test]
async fn random_endpoint_returns_an_entry() {
    let response = get("/v1/random?lang=akk").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(!body["word"].as_str().unwrap().is_empty());
    assert!(body["entry"]["defns"].as_array().unwrap().len() >= 1);
}

#[tokio::test]
async fn random_endpoint_404_when_sections_empty() {
    let response = get("/v1/random?lang=akk&sections=99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sections_endpoint_lists_sections() {
    let response = get("/v1/sections").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let sections = body.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["num"], 1);
    assert_eq!(sections[0]["name"], "Nouns and Pronouns");
    assert_eq!(sections[0]["size"], 3);
    assert_eq!(sections[1]["size"], 2);
}

#[tokio::test]
async fn raw_lexicon_serves_original_text() {
    let response = get("/sarrum/dict").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("cache-control")
            .is_some_and(|v| v.to_str().unwrap().contains("max-age"))
    );
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    assert_eq!(std::str::from_utf8(&body_bytes).unwrap(), SAMPLE);
}

#[tokio::test]
async fn version_endpoint_reports_lexicon_version() {
    let response = get("/sarrum/version").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["version"], 3);
}
