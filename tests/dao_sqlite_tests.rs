mod common;

use chrono::NaiveDate;
use common::{SqliteSession, USER_DDL, User};
use ezsql::query::{Condition, EzQuery, Page, column, field};
use ezsql::{DbType, EzConfig, EzDao, EzError, NamingPattern, Value};

fn dao() -> EzDao<SqliteSession> {
    EzDao::new(SqliteSession::new(USER_DDL), EzConfig::new(DbType::Sqlite))
}

fn people() -> Vec<User> {
    let created = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    vec![
        User {
            id: Some(1),
            name: Some("Alice".into()),
            age: Some(30),
            order: Some(7),
            active: Some(true),
            created_at: Some(created),
            note: String::new(),
        },
        User {
            id: Some(2),
            name: Some("Bob".into()),
            age: Some(25),
            order: None,
            active: Some(false),
            created_at: None,
            note: String::new(),
        },
        User::new(Some(3), "Carol", 41),
        User::new(Some(4), "Dave", 19),
    ]
}

async fn seeded() -> EzDao<SqliteSession> {
    let dao = dao();
    assert_eq!(dao.batch_save(&people()).await.unwrap(), 4);
    dao
}

#[tokio::test]
async fn test_batch_save_then_query_round_trip() {
    let dao = seeded().await;

    let all = dao
        .query(&EzQuery::<User>::new().order_by(field("id").asc()))
        .await
        .unwrap();
    assert_eq!(all, people());
}

#[tokio::test]
async fn test_generated_keys_are_left_to_the_database() {
    let dao = dao();
    dao.batch_save(&[User::new(None, "Eve", 22), User::new(None, "Finn", 23)])
        .await
        .unwrap();

    let insert = &dao.session().statements()[0];
    assert!(!insert.contains("(id,"), "{insert}");

    let eve = dao.get_one_by_field::<User>("name", "Eve").await.unwrap().unwrap();
    assert!(eve.id.is_some());
    assert_eq!(eve.age, Some(22));
}

#[tokio::test]
async fn test_lookups() {
    let dao = seeded().await;

    let bob = dao.get_by_id::<User>(2).await.unwrap().unwrap();
    assert_eq!(bob.name.as_deref(), Some("Bob"));
    assert!(dao.get_by_id::<User>(99).await.unwrap().is_none());

    let mut some = dao.get_by_ids::<User, _>([1, 3, 99]).await.unwrap();
    some.sort_by_key(|u| u.id);
    assert_eq!(some.iter().map(|u| u.id).collect::<Vec<_>>(), vec![Some(1), Some(3)]);

    let by_column = dao.get_by_column::<User>("user_name", "Carol").await.unwrap();
    assert_eq!(by_column.len(), 1);
    assert_eq!(by_column[0].age, Some(41));

    let missing = dao.get_one_by_column::<User>("user_name", "Nobody").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_sparse_update_keeps_unset_fields() {
    let dao = seeded().await;

    let patch = User {
        id: Some(1),
        age: Some(31),
        ..User::default()
    };
    assert_eq!(dao.update(&patch).await.unwrap(), 1);

    let alice = dao.get_by_id::<User>(1).await.unwrap().unwrap();
    assert_eq!(alice.age, Some(31));
    assert_eq!(alice.name.as_deref(), Some("Alice"));
    assert_eq!(alice.order, Some(7));
}

#[tokio::test]
async fn test_replace_overwrites_with_nulls() {
    let dao = seeded().await;

    let replacement = User {
        id: Some(1),
        name: Some("Alicia".into()),
        ..User::default()
    };
    assert_eq!(dao.replace(&replacement).await.unwrap(), 1);

    let alice = dao.get_by_id::<User>(1).await.unwrap().unwrap();
    assert_eq!(alice.name.as_deref(), Some("Alicia"));
    assert_eq!(alice.age, None);
    assert_eq!(alice.order, None);
}

#[tokio::test]
async fn test_batch_update_and_update_where() {
    let dao = seeded().await;

    let patches = vec![
        User {
            id: Some(3),
            age: Some(42),
            ..User::default()
        },
        User {
            id: Some(4),
            age: Some(20),
            ..User::default()
        },
    ];
    assert_eq!(dao.batch_update(&patches).await.unwrap(), 2);

    let retire = User {
        active: Some(false),
        ..User::default()
    };
    let touched = dao
        .update_where(&retire, field("age").ge(40))
        .await
        .unwrap();
    assert_eq!(touched, 1);

    let touched = dao
        .update_by_field(&retire, "name", "Dave")
        .await
        .unwrap();
    assert_eq!(touched, 1);

    let inactive = dao
        .query_count(&EzQuery::<User>::new().filter(field("active").eq(false)))
        .await
        .unwrap();
    assert_eq!(inactive, 3);
}

#[tokio::test]
async fn test_deletes() {
    let dao = seeded().await;

    assert_eq!(dao.delete_by_id::<User>(1).await.unwrap(), 1);
    assert_eq!(dao.delete_by_ids::<User, _>([2, 3]).await.unwrap(), 2);
    assert_eq!(dao.delete_by_field::<User>("name", "Nobody").await.unwrap(), 0);
    assert_eq!(dao.delete_by_column::<User>("user_name", "Dave").await.unwrap(), 1);

    let total = dao.query_count(&EzQuery::<User>::new()).await.unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_delete_models() {
    let dao = seeded().await;
    let everyone = people();

    assert_eq!(dao.delete(&everyone[0]).await.unwrap(), 1);
    assert_eq!(dao.batch_delete(&everyone[1..3]).await.unwrap(), 2);
    assert_eq!(dao.delete_where::<User>(field("age").lt(20)).await.unwrap(), 1);
}

#[tokio::test]
async fn test_data_and_count_agree() {
    let dao = seeded().await;

    let query = EzQuery::<User>::new()
        .filter(field("age").gt(20))
        .order_by(field("age").desc())
        .page(Page::new(1, 2));
    let page = dao.query_data_and_count(&query).await.unwrap();

    assert_eq!(page.total, 3);
    let names: Vec<_> = page.data.iter().map(|u| u.name.clone().unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);

    // Without a window the data query returns exactly `total` rows.
    let unpaged = EzQuery::<User>::new().filter(field("age").gt(20));
    let rows = dao.query(&unpaged).await.unwrap();
    assert_eq!(rows.len() as u64, dao.query_count(&unpaged).await.unwrap());
}

#[tokio::test]
async fn test_data_and_count_empty() {
    let dao = seeded().await;
    let before = dao.session().statements().len();

    let page = dao
        .query_data_and_count(&EzQuery::<User>::new().filter(field("age").gt(100)))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
    // only the count ran
    assert_eq!(dao.session().statements().len(), before + 1);
}

#[tokio::test]
async fn test_reserved_column_round_trip() {
    let dao = seeded().await;

    let rows = dao
        .query(&EzQuery::<User>::new().filter(field("order").eq(7)))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(
        dao.session()
            .statements()
            .last()
            .unwrap()
            .contains("\"order\" = ?")
    );
}

#[tokio::test]
async fn test_nested_conditions() {
    let dao = seeded().await;

    let query = EzQuery::<User>::new()
        .filter(Condition::any([
            field("name").like("A%"),
            Condition::all([field("age").between(18, 20), column("user_name").is_not_null()]),
        ]))
        .order_by(field("id").asc());
    let rows = dao.query(&query).await.unwrap();
    let ids: Vec<_> = rows.iter().map(|u| u.id.unwrap()).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[tokio::test]
async fn test_query_maps_rename_keys() {
    let dao = EzDao::new(
        SqliteSession::new(USER_DDL),
        EzConfig::new(DbType::Sqlite).map_ret_key_pattern(NamingPattern::Camel),
    );
    dao.save(&User::new(Some(1), "Alice", 30)).await.unwrap();

    let maps = dao
        .query_maps(&EzQuery::<User>::new().select([field("id"), field("name")]))
        .await
        .unwrap();
    assert_eq!(maps.len(), 1);
    assert_eq!(maps[0]["userName"], Value::from("Alice"));
    assert_eq!(maps[0]["id"], Value::Integer(1));
}

#[tokio::test]
async fn test_unknown_field_reaches_no_session() {
    let dao = seeded().await;
    let before = dao.session().statements().len();

    let err = dao.get_by_field::<User>("nickname", "Al").await.unwrap_err();
    assert!(matches!(err, EzError::UnresolvedIdentifier { .. }));
    assert_eq!(dao.session().statements().len(), before);
}

#[tokio::test]
async fn test_execution_errors_are_wrapped() {
    // the table does not exist
    let dao = EzDao::new(SqliteSession::new(""), EzConfig::new(DbType::Sqlite));
    let err = dao.query(&EzQuery::<User>::new()).await.unwrap_err();
    assert!(matches!(err, EzError::ExecutionFailure(_)));
    assert!(!err.is_compile_error());
}

fn crowd(n: i64) -> Vec<User> {
    (1..=n)
        .map(|i| User::new(Some(i), &format!("user{i}"), (i % 90) as i32))
        .collect()
}

#[tokio::test]
async fn test_large_batch_save_is_strategy_independent() {
    // 6000 rows of six columns is more than SQLite binds in one statement.
    let users = crowd(6000);

    let multi = dao();
    let single = EzDao::new(
        SqliteSession::without_multi_row(USER_DDL),
        EzConfig::new(DbType::Sqlite),
    );
    assert_eq!(multi.batch_save(&users).await.unwrap(), 6000);
    assert_eq!(single.batch_save(&users).await.unwrap(), 6000);
    assert!(multi.session().statements().len() > 1);

    let everyone = EzQuery::<User>::new();
    assert_eq!(multi.query_count(&everyone).await.unwrap(), 6000);
    assert_eq!(single.query_count(&everyone).await.unwrap(), 6000);
}

#[tokio::test]
async fn test_key_lists_beyond_the_bind_limit() {
    let users = crowd(33_000);
    let dao = dao();
    assert_eq!(dao.batch_save(&users).await.unwrap(), 33_000);

    let ids: Vec<i64> = (1..=33_000).collect();
    assert_eq!(dao.get_by_ids::<User, _>(ids.clone()).await.unwrap().len(), 33_000);

    assert_eq!(dao.batch_delete(&users[..32_900]).await.unwrap(), 32_900);
    assert_eq!(dao.delete_by_ids::<User, _>(ids).await.unwrap(), 100);
    assert_eq!(dao.query_count(&EzQuery::<User>::new()).await.unwrap(), 0);
}
