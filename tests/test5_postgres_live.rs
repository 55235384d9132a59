#![cfg(feature = "postgres")]

//! Round trips against a live server. These need a local postgres matching
//! `SessionConfig::default()` (localhost:5432, user `user`, password
//! `pass`, database `test`); run them with
//! `cargo test --test test5_postgres_live -- --ignored`.

use pg_session::{
    CloseKind, ExecuteOutcome, QueryReply, Session, SessionConfig, SessionError, SqlType,
    SqlValue, StatementOutcome,
};

#[tokio::test]
#[ignore = "needs a postgres server matching SessionConfig::default()"]
async fn live_simple_and_extended_round_trip() -> Result<(), SessionError> {
    let session = Session::connect(&SessionConfig::default()).await?;

    let reply = session
        .simple_query(
            "DROP TABLE IF EXISTS session_smoke; \
             CREATE TABLE session_smoke (id BIGINT PRIMARY KEY, name TEXT, \
             rank INTEGER, score REAL)",
        )
        .await?;
    let QueryReply::Batch(outcomes) = reply else {
        panic!("two statements must come back as a batch");
    };
    assert_eq!(outcomes.len(), 2);

    // rank/score bind against server-inferred int4/float4 parameters, so
    // the values must narrow to the declared datum width on the wire.
    for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
        let outcome = session
            .extended_query(
                "INSERT INTO session_smoke (id, name, rank, score) \
                 VALUES ($1, $2, $3, $4)",
                vec![
                    SqlValue::Int(id),
                    SqlValue::Text(name.into()),
                    SqlValue::Int(id * 10),
                    SqlValue::Float(0.5),
                ],
            )
            .await?;
        assert_eq!(outcome.affected(), Some(1));
    }

    // Extended results are typed and normalized by column name.
    let outcome = session
        .extended_query(
            "SELECT id, name, rank, score FROM session_smoke \
             WHERE id > $1 ORDER BY id",
            vec![SqlValue::Int(1)],
        )
        .await?;
    let StatementOutcome::Rows(rows) = outcome else {
        panic!("select must produce rows");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows[0].get("id").unwrap().as_int(), Some(2));
    assert_eq!(rows.rows[0].get("rank").unwrap().as_int(), Some(20));
    assert_eq!(rows.rows[0].get("score").unwrap().as_float(), Some(0.5));
    assert_eq!(rows.rows[1].get("name").unwrap().as_text(), Some("c"));

    // Simple-protocol results arrive in text format.
    let reply = session
        .simple_query("SELECT id FROM session_smoke WHERE id = 1")
        .await?;
    let QueryReply::Single(StatementOutcome::Rows(rows)) = reply else {
        panic!("single select must stay single");
    };
    assert_eq!(rows.rows[0].get("id").unwrap().as_text(), Some("1"));

    session.simple_query("DROP TABLE session_smoke").await?;
    session.stop().await
}

#[tokio::test]
#[ignore = "needs a postgres server matching SessionConfig::default()"]
async fn live_portal_suspension_and_close() -> Result<(), SessionError> {
    let session = Session::connect(&SessionConfig::default()).await?;

    session
        .simple_query(
            "DROP TABLE IF EXISTS session_portal; \
             CREATE TABLE session_portal (n INTEGER); \
             INSERT INTO session_portal SELECT * FROM generate_series(1, 5)",
        )
        .await?;

    // An int4-typed prepare makes every portal bind narrow to 4 bytes.
    let statement = session
        .prepare(
            "portal_sel",
            "SELECT n FROM session_portal WHERE n >= $1 ORDER BY n",
            vec![SqlType::Int4],
        )
        .await?;
    assert_eq!(statement.param_types, vec![SqlType::Int4]);

    session.bind(&statement, "p_cap", vec![SqlValue::Int(1)]).await?;
    let outcome = session.execute(&statement, "p_cap", 2).await?;
    let ExecuteOutcome::Suspended(rows) = outcome else {
        panic!("a capped fetch over 5 rows must suspend");
    };
    assert_eq!(rows, vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]]);

    session.bind(&statement, "p_all", vec![SqlValue::Int(4)]).await?;
    let outcome = session.execute(&statement, "p_all", 0).await?;
    let ExecuteOutcome::Complete(rows) = outcome else {
        panic!("an uncapped fetch must complete");
    };
    assert_eq!(rows, vec![vec![SqlValue::Int(4)], vec![SqlValue::Int(5)]]);

    session.close(CloseKind::Portal, "p_cap").await?;
    session.close_named("portal", "p_all").await?;
    session.close_statement(&statement).await?;
    // Close is idempotent; a second close of the same name succeeds.
    session.close_named("statement", "portal_sel").await?;

    session.simple_query("DROP TABLE session_portal").await?;
    session.stop().await
}
