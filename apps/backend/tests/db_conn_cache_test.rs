mod common;

use std::sync::Arc;

use actix_web::{test, web};
use backend::extractors::db_conn::resolve_conn;
use backend::test_support::FakeConn;
use backend::{build_state, AppState, DbRegistry, SharedConn};

async fn state_with_fake_primary() -> AppState {
    let conn: SharedConn = Arc::new(FakeConn::named("primary"));
    build_state()
        .with_conn(conn)
        .build()
        .await
        .expect("state build cannot fail with an injected connection")
}

#[actix_web::test]
async fn test_two_resolutions_in_one_request_share_the_handle() {
    let state = state_with_fake_primary().await;
    let req = test::TestRequest::default()
        .app_data(web::Data::new(state))
        .to_http_request();

    let first = resolve_conn(&req).expect("first resolution succeeds");
    let second = resolve_conn(&req).expect("second resolution succeeds");

    assert!(
        Arc::ptr_eq(first.handle(), second.handle()),
        "both resolutions must return the identical shared connection"
    );
}

#[actix_web::test]
async fn test_cache_hit_does_not_consult_the_registry() {
    let state = state_with_fake_primary().await;
    let req = test::TestRequest::default()
        .app_data(web::Data::new(state))
        .to_http_request();
    let cached = resolve_conn(&req).expect("populate the cache");

    // A request with no AppState at all can only succeed via the cache slot.
    let bare_req = test::TestRequest::default().to_http_request();
    {
        use actix_web::HttpMessage;
        bare_req.extensions_mut().insert(cached.clone());
    }

    let resolved = resolve_conn(&bare_req)
        .expect("cache hit must not look up the registry again");
    assert!(Arc::ptr_eq(resolved.handle(), cached.handle()));
}

#[actix_web::test]
async fn test_independent_requests_share_one_connection() {
    let data = web::Data::new(state_with_fake_primary().await);

    let req_a = test::TestRequest::default()
        .app_data(data.clone())
        .to_http_request();
    let req_b = test::TestRequest::default()
        .app_data(data.clone())
        .to_http_request();

    let conn_a = resolve_conn(&req_a).unwrap();
    let conn_b = resolve_conn(&req_b).unwrap();

    assert!(
        Arc::ptr_eq(conn_a.handle(), conn_b.handle()),
        "one process, one primary connection"
    );
}

#[actix_web::test]
async fn test_missing_registry_is_registry_unavailable() {
    let state = AppState::without_registry();
    let req = test::TestRequest::default()
        .app_data(web::Data::new(state))
        .to_http_request();

    let err = resolve_conn(&req).expect_err("no registry was ever initialized");
    assert_eq!(err.code(), "REGISTRY_UNAVAILABLE");
}

#[actix_web::test]
async fn test_missing_app_state_is_registry_unavailable() {
    let req = test::TestRequest::default().to_http_request();
    let err = resolve_conn(&req).expect_err("no app state at all");
    assert_eq!(err.code(), "REGISTRY_UNAVAILABLE");
}

#[actix_web::test]
async fn test_empty_registry_is_no_primary_database() {
    let state = AppState::new(DbRegistry::default());
    let req = test::TestRequest::default()
        .app_data(web::Data::new(state))
        .to_http_request();

    let err = resolve_conn(&req).expect_err("registry exists but holds nothing");
    assert_eq!(err.code(), "NO_PRIMARY_DATABASE");
}
