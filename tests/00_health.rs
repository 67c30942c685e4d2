mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn root_describes_the_surface() -> Result<()> {
    let (app, _state) = common::test_app().await;

    let (status, body) = common::request(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Task Tracker API");
    Ok(())
}

#[tokio::test]
async fn health_reports_database_connectivity() -> Result<()> {
    let (app, state) = common::test_app().await;

    let (status, body) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");

    // with the pool closed the ping fails and the endpoint degrades to 503
    state.pool.close().await;
    let (status, body) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}
