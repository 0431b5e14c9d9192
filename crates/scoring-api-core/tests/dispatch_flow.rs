//! End-to-end dispatcher tests against a mocked scoring oracle

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;
use mockall::predicate::eq;
use scoring_api_core::{
    account_token, admin_token, AuthSecrets, Dispatcher, ExecutionContext, FixedClock,
    OracleError, OracleResult, ResponseCode, ScoreQuery, ScoringOracle,
};
use serde_json::{json, Map, Value};

mock! {
    pub Oracle {}

    impl ScoringOracle for Oracle {
        fn get_score(&self, query: &ScoreQuery) -> OracleResult<f64>;
        fn get_interests(&self, client_id: u64) -> OracleResult<Vec<String>>;
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 7, 20)
        .unwrap()
        .and_hms_opt(12, 15, 0)
        .unwrap()
}

fn dispatcher(oracle: MockOracle) -> Dispatcher {
    Dispatcher::new(AuthSecrets::default(), Arc::new(oracle)).with_clock(Arc::new(FixedClock(now())))
}

fn body(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn user_request(method: &str, arguments: Value) -> Map<String, Value> {
    body(json!({
        "account": "horns&hoofs",
        "login": "h&f",
        "method": method,
        "token": account_token("horns&hoofs", "h&f", "Otus"),
        "arguments": arguments,
    }))
}

#[test]
fn online_score_invokes_oracle() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_get_score()
        .withf(|q| q.phone.as_deref() == Some("79175002040") && q.first_name.is_none())
        .times(1)
        .returning(|_| Ok(3.0));

    let mut ctx = ExecutionContext::new("req-1");
    let reply = dispatcher(oracle).handle(
        &user_request(
            "online_score",
            json!({"phone": "79175002040", "email": "a@b.ru"}),
        ),
        &mut ctx,
    );

    assert_eq!(reply.to_json(), json!({"response": 3.0, "code": 200}));
    assert_eq!(ctx.has, Some(vec!["email".to_string(), "phone".to_string()]));
    assert!(!ctx.is_admin);
}

#[test]
fn admin_online_score_is_bare_sentinel() {
    let mut oracle = MockOracle::new();
    oracle.expect_get_score().never();

    let request = body(json!({
        "account": "horns&hoofs",
        "login": "admin",
        "method": "online_score",
        "token": admin_token("42", now()),
        "arguments": {"phone": "79175002040", "email": "a@b.ru"},
    }));

    let mut ctx = ExecutionContext::new("req-8");
    let reply = dispatcher(oracle).handle(&request, &mut ctx);

    assert_eq!(reply.to_json(), json!({"response": 42, "code": 200}));
    assert!(ctx.is_admin);
}

#[test]
fn online_score_pair_rule_rejects_lone_first_name() {
    let mut oracle = MockOracle::new();
    oracle.expect_get_score().never();

    let mut ctx = ExecutionContext::new("req-2");
    let reply = dispatcher(oracle).handle(
        &user_request("online_score", json!({"first_name": "A"})),
        &mut ctx,
    );

    assert_eq!(reply.code, ResponseCode::InvalidRequest);
    assert!(reply.body.unwrap().as_str().unwrap().contains("last_name"));
}

#[test]
fn admin_clients_interests_within_hour() {
    let mut oracle = MockOracle::new();
    for client_id in 1..=4u64 {
        oracle
            .expect_get_interests()
            .with(eq(client_id))
            .times(1)
            .returning(|_| Ok(vec!["cars".to_string(), "pets".to_string()]));
    }

    let request = body(json!({
        "account": "horns&hoofs",
        "login": "admin",
        "method": "clients_interests",
        "token": admin_token("42", now()),
        "arguments": {"client_ids": [1, 2, 3, 4], "date": "20.07.2017"},
    }));

    let mut ctx = ExecutionContext::new("req-3");
    let reply = dispatcher(oracle).handle(&request, &mut ctx);

    assert_eq!(reply.code, ResponseCode::Ok);
    let response = reply.body.unwrap();
    for client_id in ["1", "2", "3", "4"] {
        assert_eq!(response[client_id], json!(["cars", "pets"]));
    }
    assert_eq!(ctx.nclients, Some(4));
    assert!(ctx.is_admin);
}

#[test]
fn stale_admin_token_is_forbidden() {
    let mut oracle = MockOracle::new();
    oracle.expect_get_interests().never();

    let an_hour_ago = now() - chrono::Duration::hours(1);
    let request = body(json!({
        "login": "admin",
        "method": "clients_interests",
        "token": admin_token("42", an_hour_ago),
        "arguments": {"client_ids": [1, 2, 3, 4]},
    }));

    let mut ctx = ExecutionContext::new("req-4");
    let reply = dispatcher(oracle).handle(&request, &mut ctx);
    assert_eq!(reply.to_json(), json!({"error": "Forbidden", "code": 403}));
}

#[test]
fn unknown_method_is_named() {
    let oracle = MockOracle::new();
    let mut ctx = ExecutionContext::new("req-5");
    let reply = dispatcher(oracle).handle(&user_request("foo", json!({})), &mut ctx);

    assert_eq!(reply.code, ResponseCode::InvalidRequest);
    assert_eq!(reply.to_json()["error"], json!("unknown method: foo"));
}

#[test]
fn oracle_failure_is_internal_error_without_detail() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_get_interests()
        .returning(|_| Err(OracleError::Unavailable("10.0.0.5:6379 refused".to_string())));

    let mut ctx = ExecutionContext::new("req-6");
    let reply = dispatcher(oracle).handle(
        &user_request("clients_interests", json!({"client_ids": [7]})),
        &mut ctx,
    );

    assert_eq!(
        reply.to_json(),
        json!({"error": "Internal Server Error", "code": 500})
    );
}

#[test]
fn invalid_envelope_skips_authentication() {
    let oracle = MockOracle::new();
    let mut ctx = ExecutionContext::new("req-7");
    let reply = dispatcher(oracle).handle(
        &body(json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "method": "online_score",
            "token": "wrong",
            "arguments": [1, 2]
        })),
        &mut ctx,
    );

    // Field errors win over the bad token
    assert_eq!(reply.code, ResponseCode::InvalidRequest);
    assert_eq!(
        reply.to_json()["error"]["arguments"],
        json!("expected object, got array")
    );
}
