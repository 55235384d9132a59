#![cfg(feature = "test-utils")]

use pg_session::test_utils::StubClient;
use pg_session::{ExecuteOutcome, ExecuteSpec, Session, SessionError, SqlType, SqlValue};

/// The statement lifecycle passes through the session untouched: the
/// prepared descriptor, the bind, and the raw positional execute rows all
/// reach the caller exactly as the client produced them.
#[tokio::test]
async fn prepare_bind_execute_pass_through_unchanged() -> Result<(), SessionError> {
    let client = StubClient::new().with_execute_result(Ok(ExecuteOutcome::Suspended(vec![
        vec![SqlValue::Int(1)],
        vec![SqlValue::Int(2)],
    ])));
    let log = client.log();
    let session = Session::spawn(client);

    let statement = session
        .prepare("s1", "SELECT n FROM t WHERE n > $1", vec![SqlType::Int8])
        .await?;
    assert_eq!(statement.name, "s1");
    assert_eq!(statement.param_types, vec![SqlType::Int8]);

    session.bind(&statement, "p1", vec![SqlValue::Int(0)]).await?;

    let outcome = session.execute(&statement, "p1", 2).await?;
    let ExecuteOutcome::Suspended(rows) = outcome else {
        panic!("a capped fetch with rows left behind must surface as suspended");
    };
    assert_eq!(
        rows,
        vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
        "portal rows are verbatim positional tuples, not normalized"
    );

    assert_eq!(log.ops(), ["prepare", "bind", "execute"]);
    session.stop().await
}

/// An extended query with no parameters takes the unparameterized client
/// path; with parameters it takes the binding path.
#[tokio::test]
async fn empty_params_take_the_unparameterized_path() -> Result<(), SessionError> {
    let client = StubClient::new();
    let log = client.log();
    let session = Session::spawn(client);

    session.extended_query("SELECT 1", Vec::new()).await?;
    session
        .extended_query("SELECT $1::int8", vec![SqlValue::Int(1)])
        .await?;

    assert_eq!(log.ops(), ["query", "query_with_params"]);
    session.stop().await
}

/// A row-less portal reports its affected count verbatim.
#[tokio::test]
async fn row_less_portal_reports_affected_count() -> Result<(), SessionError> {
    let client = StubClient::new().with_execute_result(Ok(ExecuteOutcome::Affected(5)));
    let session = Session::spawn(client);

    let statement = session
        .prepare("del", "DELETE FROM t WHERE n < $1", vec![SqlType::Int8])
        .await?;
    session.bind(&statement, "", vec![SqlValue::Int(10)]).await?;
    let outcome = session.execute(&statement, "", 0).await?;
    assert!(matches!(outcome, ExecuteOutcome::Affected(5)));

    session.stop().await
}

/// Batch outcomes come back one per item, in item order, with per-item
/// failures inline rather than collapsing the whole call.
#[tokio::test]
async fn batch_outcomes_keep_item_order_including_failures() -> Result<(), SessionError> {
    let client = StubClient::new().with_batch_result(Ok(vec![
        Ok(ExecuteOutcome::Complete(vec![vec![SqlValue::Int(1)]])),
        Err(SessionError::ExecutionError("division by zero".into())),
        Err(SessionError::ExecutionError(
            "batch aborted by an earlier failure".into(),
        )),
    ]));
    let log = client.log();
    let session = Session::spawn(client);

    let statement = session
        .prepare("s1", "SELECT 1 / $1", vec![SqlType::Int8])
        .await?;
    let items = vec![
        ExecuteSpec::new(statement.clone(), "p1", 0),
        ExecuteSpec::new(statement.clone(), "p2", 0),
        ExecuteSpec::new(statement, "p3", 0),
    ];
    let outcomes = session.execute_batch(items).await?;

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        outcomes[0],
        Ok(ExecuteOutcome::Complete(ref rows)) if rows == &vec![vec![SqlValue::Int(1)]]
    ));
    assert!(outcomes[1].is_err());
    assert!(outcomes[2].is_err());

    // The whole batch is one client exchange.
    assert_eq!(log.ops(), ["prepare", "execute_batch"]);
    session.stop().await
}
