//! End-to-end tests for results notification passes, with mock servers
//! standing in for the job search and push notification APIs.

use std::sync::Arc;

use httpmock::Method::GET;
use httpmock::Method::POST;
use httpmock::MockServer;
use jobwatch::config::Config;
use jobwatch::database::Database;
use jobwatch::push::PushClient;
use jobwatch::search::JobSearchClient;
use jobwatch::service::alert_service::AlertService;
use jobwatch::service::cadence::Cadence;

mod common;

fn make_service(
    db: Arc<Database>,
    search_server: &MockServer,
    push_server: &MockServer,
) -> AlertService {
    let mut config = Config::new();
    config.notify_chunk_size = 100;
    let config = Arc::new(config);

    let search = Arc::new(JobSearchClient::new(&search_server.url("")));
    let push = Arc::new(PushClient::new(
        &push_server.url("/push"),
        "admin",
        "secret",
        false,
    ));
    AlertService::new(db, search, push, config)
}

#[tokio::test]
async fn test_shared_search_notifies_each_user_once_with_generic_payload() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u2", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u3", "Nurse", "Vancouver", "FR", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    let cook_mock = search_server.mock(|when, then| {
        when.method(GET)
            .query_param("jobTitle", "Cook")
            .query_param("location", "Victoria")
            .query_param("language", "EN")
            .query_param_exists("minimumPostedDate");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 2, "jobs": [{"JobId": "J1"}, {"JobId": "J2"}]}"#);
    });
    let nurse_mock = search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Nurse");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 0, "jobs": []}"#);
    });
    let push_mock = push_server.mock(|when, then| {
        when.method(POST).path("/push").body_contains("job-search");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");

    // One search per distinct tuple, never per subscription
    cook_mock.assert_hits(1);
    nurse_mock.assert_hits(1);
    // u1 and u2 notified, u3's search had nothing new
    push_mock.assert_hits(2);

    assert_eq!(summary.subscriptions, 3);
    assert_eq!(summary.distinct_queries, 2);
    assert_eq!(summary.failed_queries, 0);
    assert_eq!(summary.notified, 2);
    assert_eq!(summary.failed_notifications, 0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_single_new_posting_deep_links_to_detail_screen() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u2", "Cook", "Victoria", "EN", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Cook");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 1, "jobs": [{"JobId": "J1"}]}"#);
    });
    let detail_mock = push_server.mock(|when, then| {
        when.method(POST)
            .path("/push")
            .body_contains("job-details")
            .body_contains("J1");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");

    detail_mock.assert_hits(2);
    assert_eq!(summary.notified, 2);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_missing_job_id_falls_back_to_generic_payload() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Cook");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 1, "jobs": [{"Title": "no identifier"}]}"#);
    });
    let generic_mock = push_server.mock(|when, then| {
        when.method(POST).path("/push").body_contains("job-search");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");

    generic_mock.assert_hits(1);
    assert_eq!(summary.notified, 1);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_failed_search_does_not_block_other_queries() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u2", "Nurse", "Vancouver", "FR", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Cook");
        then.status(500);
    });
    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Nurse");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 1, "jobs": [{"JobId": "N1"}]}"#);
    });
    let push_mock = push_server.mock(|when, then| {
        when.method(POST).path("/push");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete despite a failed query");

    // Only the Nurse subscriber is notified; nobody from the failed
    // Cook query is marked notified
    push_mock.assert_hits(1);
    assert_eq!(summary.failed_queries, 1);
    assert_eq!(summary.notified, 1);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_malformed_search_response_is_treated_as_query_failure() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Cook");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"unexpected": "shape"}"#);
    });
    let push_mock = push_server.mock(|when, then| {
        when.method(POST).path("/push");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");

    push_mock.assert_hits(0);
    assert_eq!(summary.failed_queries, 1);
    assert_eq!(summary.notified, 0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_failed_delivery_does_not_block_other_users() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_user(&db, "u2", "Cook", "Victoria", "EN", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET).query_param("jobTitle", "Cook");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 2, "jobs": [{"JobId": "J1"}, {"JobId": "J2"}]}"#);
    });
    // u1's delivery fails, u2's succeeds
    push_server.mock(|when, then| {
        when.method(POST).path("/push").body_contains("token-u1");
        then.status(502);
    });
    push_server.mock(|when, then| {
        when.method(POST).path("/push").body_contains("token-u2");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete despite a failed delivery");

    assert_eq!(summary.notified, 1);
    assert_eq!(summary.failed_notifications, 1);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_user_with_multiple_matching_searches_notified_once() {
    let (db, db_path) = common::setup_db().await;
    common::seed_subscription(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;
    common::seed_subscription(&db, "u1", "Baker", "Victoria", "EN", Some("daily")).await;
    common::seed_token(&db, "u1", "token-u1", chrono::Utc::now()).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 1, "jobs": [{"JobId": "J1"}]}"#);
    });
    let push_mock = push_server.mock(|when, then| {
        when.method(POST).path("/push");
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");

    // Both searches had results, but the user gets exactly one push
    push_mock.assert_hits(1);
    assert_eq!(summary.distinct_queries, 2);
    assert_eq!(summary.notified, 1);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_repository_failure_aborts_before_external_calls() {
    let (db, db_path) = common::setup_db().await;
    db.drop_all_tables().await.expect("Failed to drop tables");

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    let search_mock = search_server.mock(|when, then| {
        when.method(GET);
        then.status(200).body(r#"{"new": 1, "jobs": []}"#);
    });
    let push_mock = push_server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    let service = make_service(db, &search_server, &push_server);
    let result = service.run_pass(Cadence::Daily).await;

    assert!(result.is_err());
    search_mock.assert_hits(0);
    push_mock.assert_hits(0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_empty_subscription_set_is_a_valid_noop_pass() {
    let (db, db_path) = common::setup_db().await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    let search_mock = search_server.mock(|when, then| {
        when.method(GET);
        then.status(200).body(r#"{"new": 0, "jobs": []}"#);
    });

    let service = make_service(db, &search_server, &push_server);
    let summary = service
        .run_pass(Cadence::Daily)
        .await
        .expect("Empty pass should complete");

    search_mock.assert_hits(0);
    assert_eq!(summary.subscriptions, 0);
    assert_eq!(summary.notified, 0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_dry_run_flag_is_forwarded() {
    let (db, db_path) = common::setup_db().await;
    common::seed_user(&db, "u1", "Cook", "Victoria", "EN", Some("daily")).await;

    let search_server = MockServer::start();
    let push_server = MockServer::start();

    search_server.mock(|when, then| {
        when.method(GET);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"new": 1, "jobs": [{"JobId": "J1"}]}"#);
    });
    let dry_run_mock = push_server.mock(|when, then| {
        when.method(POST)
            .path("/push")
            .json_body_partial(r#"{"dryRun": true}"#);
        then.status(200);
    });

    let mut config = Config::new();
    config.notify_chunk_size = 100;
    let search = Arc::new(JobSearchClient::new(&search_server.url("")));
    let push = Arc::new(PushClient::new(
        &push_server.url("/push"),
        "admin",
        "secret",
        true,
    ));
    let service = AlertService::new(db, search, push, Arc::new(config));

    service
        .run_pass(Cadence::Daily)
        .await
        .expect("Pass should complete");
    dry_run_mock.assert_hits(1);

    common::teardown_db(db_path).await;
}
