//! API integration tests, driving the router in-process over the memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use library_catalog::{
    api, config::AppConfig, repository::CatalogStore, repository::MemoryStore, AppState,
};

fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(AppConfig::default(), Arc::new(store.clone()));
    (api::create_router(state), store)
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply {
        status,
        location,
        body,
    }
}

async fn get(app: &Router, uri: &str) -> Reply {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// POST an already urlencoded body
async fn post(app: &Router, uri: &str, form: &str) -> Reply {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// Submit a create form and return the new record's id
async fn create(app: &Router, key: &str, form: &str) -> String {
    let reply = post(app, &format!("/catalog/{}/create", key), form).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER, "{}", reply.body);
    let location = reply.location.unwrap();
    let prefix = format!("/catalog/{}/", key);
    location.strip_prefix(&prefix).unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();

    let reply = get(&app, "/api/v1/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "healthy");

    let reply = get(&app, "/api/v1/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ready");
}

#[tokio::test]
async fn test_genre_creation_is_idempotent_by_name() {
    let (app, store) = app();

    let first = create(&app, "genre", "name=Fantasy").await;
    let second = create(&app, "genre", "name=Fantasy").await;

    assert_eq!(first, second);
    assert_eq!(store.count_genres().await.unwrap(), 1);

    let reply = get(&app, "/catalog/genres").await;
    assert_eq!(reply.body["genre_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_book_is_redisplayed_escaped() {
    let (app, store) = app();
    let author = create(&app, "author", "first_name=Iain&family_name=Banks").await;

    let form = format!(
        "title=%3Cscript%3Ex%3C%2Fscript%3E&author={}&summary=Culture&isbn=",
        author
    );
    let reply = post(&app, "/catalog/book/create", &form).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["title"], "Create Book");
    assert_eq!(reply.body["errors"][0]["field"], "isbn");
    assert_eq!(
        reply.body["book"]["title"],
        "&lt;script&gt;x&lt;&#x2F;script&gt;"
    );
    assert!(!reply.body.to_string().contains("<script>"));
    assert_eq!(reply.body["authors"].as_array().unwrap().len(), 1);
    assert_eq!(store.count_books().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_title_and_isbn_are_both_reported() {
    let (app, _) = app();

    let reply = post(&app, "/catalog/book/create", "title=&author=&summary=s&isbn=").await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = reply.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["title", "author", "isbn"]);
}

#[tokio::test]
async fn test_catalog_lifecycle() {
    let (app, store) = app();

    let author = create(
        &app,
        "author",
        "first_name=Ursula&family_name=LeGuin&date_of_birth=1929-10-21&date_of_death=2018-01-22",
    )
    .await;
    let fantasy = create(&app, "genre", "name=Fantasy").await;
    let scifi = create(&app, "genre", "name=Science+Fiction").await;
    let book = create(
        &app,
        "book",
        &format!(
            "title=The+Dispossessed&author={}&summary=Anarres&isbn=9780061054884&genre={}&genre={}",
            author, fantasy, scifi
        ),
    )
    .await;
    let copy = create(
        &app,
        "bookinstance",
        &format!("book={}&imprint=Harper&status=Available&due_back=2026-12-01", book),
    )
    .await;

    // summary
    let reply = get(&app, "/catalog").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Local Library Home");
    assert_eq!(reply.body["data"]["book_count"], 1);
    assert_eq!(reply.body["data"]["book_instance_available_count"], 1);
    assert_eq!(reply.body["data"]["genre_count"], 2);

    // detail joins the book, its references and its copies
    let reply = get(&app, &format!("/catalog/book/{}", book)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["book"]["author"]["name"], "LeGuin, Ursula");
    assert_eq!(reply.body["book"]["genre"].as_array().unwrap().len(), 2);
    assert_eq!(reply.body["book_instances"][0]["id"], copy);

    // referenced records cannot be deleted
    for (key, id) in [("book", &book), ("author", &author), ("genre", &fantasy)] {
        let reply = post(&app, &format!("/catalog/{}/{}/delete", key, id), "").await;
        assert_eq!(reply.status, StatusCode::CONFLICT, "{} was deleted", key);
    }
    let reply = get(&app, &format!("/catalog/book/{}/delete", book)).await;
    assert_eq!(reply.body["title"], "Delete Book");
    assert_eq!(reply.body["book_instances"].as_array().unwrap().len(), 1);
    assert_eq!(store.count_books().await.unwrap(), 1);

    // bottom-up removal succeeds
    let reply = post(&app, &format!("/catalog/bookinstance/{}/delete", copy), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/bookinstances"));

    let reply = post(&app, &format!("/catalog/book/{}/delete", book), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/catalog/books"));

    let reply = get(&app, &format!("/catalog/book/{}", book)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], 5);

    let reply = post(&app, &format!("/catalog/author/{}/delete", author), "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_update_preserves_identity() {
    let (app, store) = app();
    let author = create(&app, "author", "first_name=Octavia&family_name=Butler").await;
    let book = create(
        &app,
        "book",
        &format!("title=Kindred&author={}&summary=Dana&isbn=1", author),
    )
    .await;

    let reply = get(&app, &format!("/catalog/book/{}/update", book)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "Update Book");
    assert_eq!(reply.body["book"]["title"], "Kindred");

    let reply = post(
        &app,
        &format!("/catalog/book/{}/update", book),
        &format!("title=Dawn&author={}&summary=Lilith&isbn=2", author),
    )
    .await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location, Some(format!("/catalog/book/{}", book)));

    let books = store.list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id.to_string(), book);
    assert_eq!(books[0].title, "Dawn");
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let (app, _) = app();
    let id = uuid::Uuid::new_v4();

    for uri in [
        format!("/catalog/author/{}", id),
        format!("/catalog/genre/{}/delete", id),
        format!("/catalog/bookinstance/{}", id),
        format!("/catalog/book/{}/update", id),
    ] {
        let reply = get(&app, &uri).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let reply = post(&app, &format!("/catalog/book/{}/delete", id), "").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}
