//! Builder, compiler and execution-bridge scenario tests.

use crate::clause::{ColumnRef, Direction, JoinType};
use crate::client::{Database, QueryOutput};
use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::param::ParamBind;
use crate::query::{Query, QueryKind};
use crate::row::{FromRow, Row, Rows};
use crate::value::{Operand, Value};
use crate::{delete, insert, select, select_columns, update};
use std::sync::Mutex;

/// Backend double: MySQL-style quoting, scripted rows, recorded SQL.
struct TestDb {
    rows: Vec<Row>,
    last: Mutex<Option<(QueryKind, String)>>,
}

impl TestDb {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            last: Mutex::new(None),
        }
    }

    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            last: Mutex::new(None),
        }
    }

    fn last_sql(&self) -> String {
        self.last
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, sql)| sql.clone())
            .unwrap_or_default()
    }
}

impl Database for TestDb {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn query(
        &self,
        kind: QueryKind,
        sql: &str,
    ) -> impl std::future::Future<Output = SqlResult<QueryOutput>> + Send {
        *self.last.lock().unwrap() = Some((kind, sql.to_string()));
        let output = match kind {
            QueryKind::Select => QueryOutput::Rows(Rows::new(self.rows.clone())),
            QueryKind::Insert => QueryOutput::InsertId(1),
            QueryKind::Update | QueryKind::Delete => {
                QueryOutput::Affected(self.rows.len() as u64)
            }
        };
        async move { Ok(output) }
    }
}

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
}

impl FromRow for User {
    fn from_row(row: &Row) -> SqlResult<Self> {
        Ok(Self {
            id: row.get_i64("id")?,
            name: row.get_str("name")?.to_string(),
        })
    }
}

// ==================== SELECT compilation ====================

#[test]
fn select_star_round_trip() {
    let db = TestDb::new();
    let mut query = select().from("users").and_where("id", "=", 5);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `users` WHERE `id` = 5"
    );
}

#[test]
fn clause_order_across_kinds_is_irrelevant() {
    let db = TestDb::new();
    let mut a = select().from("t").and_where("a", "=", 1).limit(5).offset(2);
    let mut b = select().limit(5).offset(2).and_where("a", "=", 1).from("t");
    assert_eq!(a.compile(&db).unwrap(), b.compile(&db).unwrap());
}

#[test]
fn compile_is_idempotent() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", 1)
        .or_where("b", "!=", "x")
        .order_by("a", Direction::Desc);
    let first = query.compile(&db).unwrap();
    let second = query.compile(&db).unwrap();
    assert_eq!(first, second);
    assert_eq!(query.last_sql(), Some(first.as_str()));
}

#[test]
fn distinct_flag_renders() {
    let db = TestDb::new();
    let mut query = select().distinct(true).from("t");
    assert_eq!(query.compile(&db).unwrap(), "SELECT DISTINCT * FROM `t`");
}

#[test]
fn select_columns_dedup_post_quote() {
    let db = TestDb::new();
    let mut query = select_columns(vec![
        ColumnRef::from("id"),
        ColumnRef::from("id"),
        ColumnRef::from(("name", "n")),
    ])
    .from("t");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT `id`, `name` AS `n` FROM `t`"
    );
}

#[test]
fn select_expression_alias() {
    let db = TestDb::new();
    let mut query = select_columns(vec![ColumnRef::alias(ColumnRef::expr("COUNT(*)"), "cnt")])
        .from("t");
    assert_eq!(query.compile(&db).unwrap(), "SELECT COUNT(*) AS `cnt` FROM `t`");
}

#[test]
fn from_tables_dedup_and_alias() {
    let db = TestDb::new();
    let mut query = select().from("t").from("t").from(("t", "x"));
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t`, `t` AS `x`");
}

#[test]
fn add_select_appends() {
    let db = TestDb::new();
    let mut query = select_columns(["id"]).add_select("name").from("t");
    assert_eq!(query.compile(&db).unwrap(), "SELECT `id`, `name` FROM `t`");
}

#[test]
fn limit_and_offset_render_in_order() {
    let db = TestDb::new();
    let mut query = select().from("t").limit(10).offset(20);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` LIMIT 10 OFFSET 20"
    );
}

// ==================== WHERE / HAVING trees ====================

#[test]
fn null_values_rewrite_equality_operators() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", Operand::null())
        .and_where("b", "!=", Operand::null());
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `a` IS NULL AND `b` IS NOT NULL"
    );
}

#[test]
fn null_values_keep_other_operators() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("a", "<", Operand::null());
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` < NULL");
}

#[test]
fn in_list_quotes_each_element() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("id", "in", vec![1, 2, 3]);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `id` IN (1, 2, 3)"
    );
}

#[test]
fn empty_in_list_renders_empty_parens() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("id", "IN", Vec::<i32>::new());
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `id` IN ()");
}

#[test]
fn between_joins_bounds_with_and() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("age", "between", vec![18, 65]);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `age` BETWEEN 18 AND 65"
    );
}

#[test]
fn string_literals_are_quoted() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("name", "=", "o'brien");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `name` = 'o\\'brien'"
    );
}

#[test]
fn connectors_render_between_predicates() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", 1)
        .or_where("b", "=", 2)
        .and_where("c", "=", 3);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `a` = 1 OR `b` = 2 AND `c` = 3"
    );
}

#[test]
fn groups_suppress_connector_after_open_paren() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", 1)
        .or_where_open()
        .and_where("b", "=", 2)
        .or_where("c", "=", 3)
        .end(false);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `a` = 1 OR (`b` = 2 OR `c` = 3)"
    );
}

#[test]
fn leading_group_has_no_connector() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where_open()
        .and_where("a", "=", 1)
        .end(false)
        .and_where("b", "=", 2);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE (`a` = 1) AND `b` = 2"
    );
}

#[test]
fn empty_group_is_elided() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", 1)
        .and_where_open()
        .end(true);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = 1");
}

#[test]
fn non_empty_group_survives_empty_check() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where_open()
        .and_where("a", "=", 1)
        .end(true);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE (`a` = 1)");
}

#[test]
fn end_without_open_group_is_a_noop() {
    let db = TestDb::new();
    let mut query = select().from("t").and_where("a", "=", 1).end(false);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = 1");
}

#[test]
fn interleaved_where_and_having_groups_close_correctly() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where_open()
        .and_where("a", "=", 1)
        .and_having_open()
        .and_having("b", "=", 2)
        .end(false)
        .end(false);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE (`a` = 1) HAVING (`b` = 2)"
    );
}

#[test]
fn where_all_appends_each_with_same_connector() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where_all([("a", "=", 1), ("b", "=", 2)]);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `a` = 1 AND `b` = 2"
    );
}

#[test]
fn filters_skip_blank_values() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_filter("a", "=", "")
        .and_filter("b", "=", "   ")
        .and_filter("c", "=", Operand::null())
        .and_filter("d", "IN", Vec::<i32>::new())
        .or_filter("e", "=", Value::Null)
        .and_filter("f", "=", "kept");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `f` = 'kept'"
    );
}

#[test]
fn where_alias_compares_against_expression() {
    let db = TestDb::new();
    let mut query = select().from("users").and_where(("users.email", "e"), "=", "x");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `users` WHERE `users`.`email` = 'x'"
    );
}

#[test]
fn having_renders_after_group_by() {
    let db = TestDb::new();
    let mut query = select_columns(["role"])
        .from("users")
        .group_by(["role"])
        .having("total", ">", 5)
        .or_having("role", "=", "admin");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT `role` FROM `users` GROUP BY `role` HAVING `total` > 5 OR `role` = 'admin'"
    );
}

#[test]
fn group_by_uses_the_alias_name() {
    let db = TestDb::new();
    let mut query = select()
        .from("users")
        .group_by(vec![ColumnRef::from(("users.email", "e"))]);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `users` GROUP BY `e`");
}

#[test]
fn order_by_directions_are_uppercased() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .order_by("name", None)
        .order_by("age", Direction::Desc);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` ORDER BY `name`, `age` DESC"
    );
}

// ==================== JOIN ====================

#[test]
fn join_renders_its_own_type() {
    let db = TestDb::new();
    let mut query = select()
        .from("a")
        .left_join("b")
        .on("a.id", "=", "b.a_id")
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `a` LEFT JOIN `b` ON (`a`.`id` = `b`.`a_id`)"
    );
}

#[test]
fn plain_join_without_type() {
    let db = TestDb::new();
    let mut query = select()
        .from("a")
        .join("b", None)
        .on("a.id", "=", "b.a_id")
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `a` JOIN `b` ON (`a`.`id` = `b`.`a_id`)"
    );
}

#[test]
fn using_takes_precedence_over_on() {
    let db = TestDb::new();
    let mut query = select()
        .from("a")
        .join("b", JoinType::Inner)
        .on("a.id", "=", "b.id")
        .unwrap()
        .using(["id"])
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `a` INNER JOIN `b` USING (`id`)"
    );
}

#[test]
fn multiple_on_conditions_join_with_and() {
    let db = TestDb::new();
    let mut query = select()
        .from("a")
        .inner_join("b")
        .on("a.id", "=", "b.a_id")
        .unwrap()
        .on("a.tag", "!=", "b.tag")
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `a` INNER JOIN `b` ON (`a`.`id` = `b`.`a_id` AND `a`.`tag` != `b`.`tag`)"
    );
}

#[test]
fn on_without_join_is_a_construction_error() {
    let err = select().from("a").on("a.id", "=", "b.id").unwrap_err();
    assert!(err.is_construction());
}

// ==================== UNION ====================

#[test]
fn union_all_wraps_both_sides() {
    let db = TestDb::new();
    let mut query = select().from("a").union(select().from("b"), true).unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "(SELECT * FROM `a`) UNION ALL (SELECT * FROM `b`)"
    );
}

#[test]
fn plain_union_omits_all() {
    let db = TestDb::new();
    let mut query = select().from("a").union(select().from("b"), false).unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "(SELECT * FROM `a`) UNION (SELECT * FROM `b`)"
    );
}

#[test]
fn nested_unions_compile_recursively() {
    let db = TestDb::new();
    let inner = select().from("b").union(select().from("c"), true).unwrap();
    let mut query = select().from("a").union(inner, false).unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "(SELECT * FROM `a`) UNION ((SELECT * FROM `b`) UNION ALL (SELECT * FROM `c`))"
    );
}

#[test]
fn union_rejects_non_select_branches() {
    let err = select().from("a").union(delete("b"), true).unwrap_err();
    assert!(err.is_construction());
}

// ==================== INSERT / UPDATE / DELETE ====================

#[test]
fn insert_values_round_trip() {
    let db = TestDb::new();
    let mut query = insert("t").columns(["a", "b"]).values([1, 2]).unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "INSERT INTO `t` (`a`, `b`) VALUES (1, 2)"
    );
}

#[test]
fn insert_multiple_value_groups() {
    let db = TestDb::new();
    let mut query = insert("t")
        .columns(["a", "b"])
        .values([1, 2])
        .unwrap()
        .values([3, 4])
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "INSERT INTO `t` (`a`, `b`) VALUES (1, 2), (3, 4)"
    );
}

#[test]
fn insert_select_appends_subquery() {
    let db = TestDb::new();
    let mut query = insert("t")
        .columns(["a"])
        .subselect(select_columns(["a"]).from("s"))
        .unwrap();
    assert_eq!(
        query.compile(&db).unwrap(),
        "INSERT INTO `t` (`a`) SELECT `a` FROM `s`"
    );
}

#[test]
fn values_after_subselect_is_a_construction_error() {
    let err = insert("t")
        .columns(["a"])
        .subselect(select_columns(["a"]).from("s"))
        .unwrap()
        .values([1])
        .unwrap_err();
    assert!(err.is_construction());
}

#[test]
fn subselect_rejects_non_select_queries() {
    let err = insert("t").subselect(update("s")).unwrap_err();
    assert!(err.is_construction());
}

#[test]
fn update_round_trip() {
    let db = TestDb::new();
    let mut query = update("users").set("name", "bob").and_where("id", "=", 1);
    assert_eq!(
        query.compile(&db).unwrap(),
        "UPDATE `users` SET `name` = 'bob' WHERE `id` = 1"
    );
}

#[test]
fn update_set_last_write_wins_per_column() {
    let db = TestDb::new();
    let mut query = update("t").set("a", 1).set("b", 2).set("a", 3);
    assert_eq!(query.compile(&db).unwrap(), "UPDATE `t` SET `a` = 3, `b` = 2");
}

#[test]
fn update_with_join_order_and_limit() {
    let db = TestDb::new();
    let mut query = update("t")
        .left_join("u")
        .on("t.id", "=", "u.t_id")
        .unwrap()
        .set("a", 1)
        .order_by("a", Direction::Asc)
        .limit(2);
    assert_eq!(
        query.compile(&db).unwrap(),
        "UPDATE `t` LEFT JOIN `u` ON (`t`.`id` = `u`.`t_id`) SET `a` = 1 ORDER BY `a` ASC LIMIT 2"
    );
}

#[test]
fn delete_round_trip() {
    let db = TestDb::new();
    let mut query = delete("t").and_where("id", "=", 1).limit(1);
    assert_eq!(
        query.compile(&db).unwrap(),
        "DELETE FROM `t` WHERE `id` = 1 LIMIT 1"
    );
}

// ==================== Parameters ====================

#[test]
fn params_substitute_quoted_values() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", ">", Operand::param(":min"))
        .param(":min", 10);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` > 10");
}

#[test]
fn longer_param_names_substitute_first() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", Operand::param(":id"))
        .and_where("b", "=", Operand::param(":id2"))
        .param(":id", 1)
        .param(":id2", 2);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `a` = 1 AND `b` = 2"
    );
}

#[test]
fn param_last_write_wins() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", Operand::param(":v"))
        .param(":v", 1)
        .param(":v", 2);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = 2");
}

#[test]
fn parameters_merge_with_new_values_winning() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", Operand::param(":v"))
        .param(":v", 1)
        .parameters([(":v", 9)]);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = 9");
}

#[test]
fn param_values_are_quoted_as_literals() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("name", "=", Operand::param(":name"))
        .param(":name", "it's");
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `name` = 'it\\'s'"
    );
}

#[test]
fn literal_that_looks_like_a_param_is_quoted() {
    let db = TestDb::new();
    // No parameter named ":min" is bound; the literal stays a literal.
    let mut query = select().from("t").and_where("a", "=", ":min");
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = ':min'");
}

#[test]
fn bind_resolves_at_compile_time() {
    let db = TestDb::new();
    let cell = ParamBind::new(1);
    let mut query = select()
        .from("t")
        .and_where("a", "=", Operand::param(":v"))
        .bind(":v", &cell);
    cell.set(42);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `a` = 42");
}

#[test]
fn param_refs_inside_lists_substitute() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where(
            "age",
            "BETWEEN",
            Operand::list([Operand::param(":min"), Operand::from(65)]),
        )
        .param(":min", 18);
    assert_eq!(
        query.compile(&db).unwrap(),
        "SELECT * FROM `t` WHERE `age` BETWEEN 18 AND 65"
    );
}

#[test]
fn raw_statements_skip_clause_rendering() {
    let db = TestDb::new();
    let mut query =
        Query::raw("SELECT * FROM `t` WHERE `id` = :id", QueryKind::Select).param(":id", 7);
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t` WHERE `id` = 7");
}

// ==================== State & reset ====================

#[test]
fn compile_without_kind_is_a_state_error() {
    let db = TestDb::new();
    let err = Query::new().compile(&db).unwrap_err();
    assert!(err.is_state());
}

#[test]
fn reset_clears_every_container() {
    let db = TestDb::new();
    let mut query = select()
        .from("t")
        .and_where("a", "=", 1)
        .group_by(["a"])
        .having("b", ">", 2)
        .order_by("a", None)
        .limit(3)
        .param(":x", 1)
        .index_by("a");
    query.compile(&db).unwrap();
    assert!(query.last_sql().is_some());

    let mut reused = query.reset().insert("fresh").columns(["a"]).values([1]).unwrap();
    assert_eq!(
        reused.compile(&db).unwrap(),
        "INSERT INTO `fresh` (`a`) VALUES (1)"
    );
}

#[test]
fn reset_clears_update_assignments() {
    let db = TestDb::new();
    let mut query = update("t")
        .set("a", 1)
        .reset()
        .update("t2")
        .set("b", 2);
    assert_eq!(query.compile(&db).unwrap(), "UPDATE `t2` SET `b` = 2");
}

#[test]
fn reset_clears_cached_sql_and_kind() {
    let db = TestDb::new();
    let mut query = select().from("t");
    query.compile(&db).unwrap();
    let query = query.reset();
    assert!(query.last_sql().is_none());
    assert!(query.kind().is_none());
}

// ==================== Execution bridge ====================

#[tokio::test]
async fn execute_shapes_output_by_kind() {
    let db = TestDb::with_rows(vec![Row::from_pairs([("id", 1i64)])]);

    let mut ins = insert("t").columns(["a"]).values([1]).unwrap();
    assert_eq!(ins.execute(&db).await.unwrap().insert_id(), Some(1));

    let mut upd = update("t").set("a", 1);
    assert_eq!(upd.execute(&db).await.unwrap().affected(), Some(1));
}

#[tokio::test]
async fn all_as_hydrates_rows() {
    let db = TestDb::with_rows(vec![
        Row::from_pairs::<_, _, Value>([("id", Value::Int(1)), ("name", Value::from("alice"))]),
        Row::from_pairs::<_, _, Value>([("id", Value::Int(2)), ("name", Value::from("bob"))]),
    ]);
    let mut query = select().from("users");
    let users: Vec<User> = query.all_as(&db).await.unwrap();
    assert_eq!(
        users,
        vec![
            User { id: 1, name: "alice".to_string() },
            User { id: 2, name: "bob".to_string() },
        ]
    );
}

#[tokio::test]
async fn one_limits_a_derived_copy() {
    let db = TestDb::with_rows(vec![
        Row::from_pairs([("id", 1i64)]),
        Row::from_pairs([("id", 2i64)]),
    ]);
    let mut query = select().from("t");

    let row = query.one(&db).await.unwrap();
    assert_eq!(row.and_then(|r| r.get("id").cloned()), Some(Value::Int(1)));
    assert_eq!(db.last_sql(), "SELECT * FROM `t` LIMIT 1");

    // The builder itself was not mutated.
    assert_eq!(query.compile(&db).unwrap(), "SELECT * FROM `t`");
}

#[tokio::test]
async fn count_derives_and_leaves_the_builder_untouched() {
    let db = TestDb::with_rows(vec![Row::from_pairs([("count", 3i64)])]);
    let query = select_columns(["name"]).from("t").order_by("name", None);

    assert_eq!(query.count(&db).await.unwrap(), 3);
    assert_eq!(db.last_sql(), "SELECT COUNT(*) AS `count` FROM `t`");

    // Original columns and ordering are intact.
    assert_eq!(
        query.compile_select(&db).unwrap(),
        "SELECT `name` FROM `t` ORDER BY `name`"
    );
}

#[tokio::test]
async fn count_distinct_uses_the_first_column() {
    let db = TestDb::with_rows(vec![Row::from_pairs([("count", 2i64)])]);
    let query = select_columns(["name"]).from("t").distinct(true);

    assert_eq!(query.count(&db).await.unwrap(), 2);
    assert_eq!(db.last_sql(), "SELECT COUNT(DISTINCT `name`) AS `count` FROM `t`");
    assert_eq!(query.compile_select(&db).unwrap(), "SELECT DISTINCT `name` FROM `t`");
}

#[tokio::test]
async fn get_applies_the_index_hint() {
    let db = TestDb::with_rows(vec![
        Row::from_pairs([("name", "alice"), ("role", "admin")]),
        Row::from_pairs([("name", "bob"), ("role", "user")]),
    ]);
    let mut query = select().from("users").index_by("name");
    let rows = query.get(&db).await.unwrap();
    assert_eq!(
        rows.by_key("bob").and_then(|r| r.get("role")),
        Some(&Value::Text("user".to_string()))
    );
}

#[tokio::test]
async fn get_on_a_mutation_is_a_state_error() {
    let db = TestDb::new();
    let mut query = update("t").set("a", 1);
    let err = query.get(&db).await.unwrap_err();
    assert!(err.is_state());
}
