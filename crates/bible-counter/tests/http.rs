use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use bible_counter::handlers::{AppState, router};
use bible_counter::search::LibraryIndex;
use bible_db::{FailurePolicy, Library, LoadMode, SourceSchema, VersionSpec};

const ACF: &str = r#"[
  {"abbrev": "gn", "chapters": [["No princípio criou Deus os céus e a terra.", "E disse Deus: Haja luz; e houve luz."]]},
  {"abbrev": "jo", "chapters": [["No princípio era o Verbo."], ["Porque Deus amou o mundo de tal maneira."]]}
]"#;

const GREEK: &str = r#"[
  {"abbrev": "jo", "chapters": [["Ἐν ἀρχῇ ἦν ὁ λόγος, καὶ ὁ λόγος ἦν πρὸς τὸν θεόν."]]}
]"#;

const HEBREW: &str = r#"[
  {"book": "בראשית", "chapter": "א", "content": "בְּרֵאשִׁית בָּרָא אֱלֹהִים"},
  {"book": "בראשית", "chapter": "א", "content": "וַיֹּאמֶר אֱלֹהִים יְהִי אוֹר"}
]"#;

fn make_state() -> AppState {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::write(tempdir.path().join("acf.json"), ACF).unwrap();
    std::fs::write(tempdir.path().join("greek.json"), GREEK).unwrap();
    std::fs::write(tempdir.path().join("hebrew.json"), HEBREW).unwrap();
    let specs = [
        VersionSpec::new("ACF", "acf.json", SourceSchema::Structured),
        VersionSpec::new("Grego", "greek.json", SourceSchema::Structured),
        VersionSpec::new("Hebraico", "hebrew.json", SourceSchema::HebrewVerses),
    ];
    let library =
        Library::load(tempdir.path(), &specs, LoadMode::Owned, FailurePolicy::Abort).unwrap();
    AppState {
        index: LibraryIndex::build(library),
        max_page_size: 500,
        disable_cache: false,
    }
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn healthz_ok() {
    let state = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn panel_is_served_with_cache_headers() {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::CACHE_CONTROL));
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(html.contains("Contador Bíblico"));
    assert!(!html.contains("__MAX_TERM_LEN__"));
    assert!(!html.contains("{{"));
}

#[tokio::test]
async fn no_cache_drops_cache_control() {
    let mut state = make_state();
    state.disable_cache = true;
    let response = router(state)
        .oneshot(
            Request::builder()
                .uri("/v1/counts?term=luz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::CACHE_CONTROL));
}

#[tokio::test]
async fn versions_endpoint_lists_loaded_versions() {
    let (status, body) = get_json("/v1/versions").await;
    assert_eq!(status, StatusCode::OK);
    let versions = body["versions"].as_array().unwrap();
    let names: Vec<_> = versions.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["ACF", "Grego", "Hebraico"]);
    assert_eq!(versions[0]["books"], 2);
    assert_eq!(versions[0]["verses"], 4);
    assert_eq!(versions[2]["books"], 1);
}

#[tokio::test]
async fn counts_endpoint_returns_catalog_table() {
    let (status, body) = get_json("/v1/counts?term=Deus&mode=exato").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "exact");
    assert_eq!(body["versions"].as_array().unwrap().len(), 3);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 66);
    assert_eq!(rows[0]["abbrev"], "gn");
    assert_eq!(rows[0]["counts"], serde_json::json!([2, 0, 0]));
    assert_eq!(body["totals"], serde_json::json!([3, 0, 0]));
    assert_eq!(body["max"], 2);
}

#[tokio::test]
async fn counts_endpoint_folds_greek_and_hebrew() {
    let (_, body) = get_json("/v1/counts?term=%CE%9B%CE%9F%CE%93%CE%9F%CE%A3").await;
    assert_eq!(body["totals"], serde_json::json!([0, 2, 0]));

    // pointed query against pointed text
    let (_, body) = get_json("/v1/counts?term=%D7%90%D6%B1%D7%9C%D6%B9%D7%94%D6%B4%D7%99%D7%9D").await;
    assert_eq!(body["totals"], serde_json::json!([0, 0, 2]));
}

#[tokio::test]
async fn counts_endpoint_rejects_bad_input() {
    let (status, body) = get_json("/v1/counts?term=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("required"));

    let (status, body) = get_json("/v1/counts?term=luz&mode=regex").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("regex"));

    let long = "a".repeat(bible_counter::MAX_TERM_LEN + 1);
    let (status, _) = get_json(&format!("/v1/counts?term={long}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn matches_endpoint_groups_by_version() {
    let (status, body) = get_json("/v1/matches?term=principio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "substring");
    let versions = body["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 3);
    assert_eq!(versions[0]["version"], "ACF");
    assert_eq!(versions[0]["total"], 2);
    let items = versions[0]["items"].as_array().unwrap();
    assert_eq!(items[0]["book"], "gn");
    assert_eq!(items[0]["name"], "Gênesis");
    assert_eq!(items[0]["chapter"], 1);
    assert_eq!(items[0]["verse"], 1);
    assert_eq!(items[1]["book"], "jo");
    assert_eq!(versions[1]["total"], 0);
}

#[tokio::test]
async fn matches_endpoint_paginates_per_version() {
    let (status, body) =
        get_json("/v1/matches?term=deus&version=ACF&page=2&page_size=1").await;
    assert_eq!(status, StatusCode::OK);
    let versions = body["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0]["total"], 3);
    assert_eq!(versions[0]["has_more"], true);
    let items = versions[0]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["verse"], 2);
}

#[tokio::test]
async fn matches_endpoint_rejects_invalid_params() {
    let (status, body) = get_json("/v1/matches?term=luz&page=0&page_size=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .to_lowercase()
            .contains("page")
    );
}

#[tokio::test]
async fn matches_endpoint_unknown_version_is_not_found() {
    let (status, body) = get_json("/v1/matches?term=luz&version=KJV").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap_or_default().contains("KJV"));
}
