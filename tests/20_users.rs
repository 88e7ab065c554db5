mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn user_lifecycle_end_to_end() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.token("boss", true).await?;
    let reader = server.token("reader", false).await?;

    // Create
    let res = server
        .client
        .post(server.url("/api/users"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Ann", "hourRate": 25}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("created response carries a Location header");
    let body = res.json::<serde_json::Value>().await?;
    let id = body["id"].as_i64().expect("store assigns an id");
    assert_eq!(location, format!("/api/users/{id}"));

    // Round trip: the view reflects the input
    let res = server
        .client
        .get(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&reader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["hourRate"].as_f64(), Some(25.0));

    // Delete without the admin role: refused, record survives
    let res = server
        .client
        .delete(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&reader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .get(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&reader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Delete with the admin role, then the record is gone
    let res = server
        .client
        .delete(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .get(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&reader)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_overwrites_name_and_rate() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.token("boss", true).await?;

    let res = server
        .client
        .post(server.url("/api/users"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Ann", "hourRate": 25}))
        .send()
        .await?;
    let id = res.json::<serde_json::Value>().await?["id"].as_i64().unwrap();

    let res = server
        .client
        .put(server.url(&format!("/api/users/{id}")))
        .bearer_auth(&admin)
        .json(&json!({"name": "Ann B.", "hourRate": 37.5}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "Ann B.");
    assert_eq!(body["hourRate"].as_f64(), Some(37.5));

    let res = server
        .client
        .put(server.url("/api/users/9999"))
        .bearer_auth(&admin)
        .json(&json!({"name": "Ghost", "hourRate": 10}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn validation_failures_never_create_anything() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.token("boss", true).await?;

    for payload in [
        json!({"name": "", "hourRate": 25}),
        json!({"name": "Ann", "hourRate": 0}),
        json!({"name": "Ann", "hourRate": 1000}),
        json!({"name": "x".repeat(101), "hourRate": 25}),
    ] {
        let res = server
            .client
            .post(server.url("/api/users"))
            .bearer_auth(&admin)
            .json(&payload)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["title"], "Validation failed");
        assert!(body["errors"].is_object());
    }

    let reader = server.token("reader", false).await?;
    let res = server
        .client
        .get(server.url("/api/users"))
        .bearer_auth(&reader)
        .send()
        .await?;
    assert_eq!(res.json::<serde_json::Value>().await?["totalCount"], 0);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_keeps_the_metadata() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.token("boss", true).await?;

    for name in ["Ann", "Bob", "Cleo"] {
        let res = server
            .client
            .post(server.url("/api/users"))
            .bearer_auth(&admin)
            .json(&json!({"name": name, "hourRate": 25}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = server
        .client
        .get(server.url("/api/users?page=2&size=10"))
        .bearer_auth(&admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn paging_defaults_and_ceiling_division() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.token("boss", true).await?;

    for i in 0..11 {
        server
            .client
            .post(server.url("/api/users"))
            .bearer_auth(&admin)
            .json(&json!({"name": format!("user-{i}"), "hourRate": 25}))
            .send()
            .await?;
    }

    // Defaults: page 1, size 5. 11 items over size 5 is 3 pages.
    let res = server
        .client
        .get(server.url("/api/users"))
        .bearer_auth(&admin)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["totalCount"], 11);
    assert_eq!(body["totalPages"], 3);

    // Walking every page covers the collection exactly once.
    let mut seen = Vec::new();
    for page in 1..=3 {
        let res = server
            .client
            .get(server.url(&format!("/api/users?page={page}&size=5")))
            .bearer_auth(&admin)
            .send()
            .await?;
        let body = res.json::<serde_json::Value>().await?;
        for item in body["items"].as_array().unwrap() {
            seen.push(item["id"].as_i64().unwrap());
        }
    }
    assert_eq!(seen.len(), 11);
    seen.dedup();
    assert_eq!(seen.len(), 11);
    Ok(())
}
