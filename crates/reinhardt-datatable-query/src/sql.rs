//! SQL-backed [`QuerySource`].
//!
//! Query plans are compiled to `sea_query` statements and rendered for the
//! configured dialect. Execution is delegated to an [`SqlExecutor`], so this
//! module never owns a connection.

use crate::builder::{Query, SortDirection};
use crate::condition::{Condition, Operator};
use crate::error::{QueryError, QueryResult};
use crate::source::QuerySource;
use crate::value::Record;
use async_trait::async_trait;
use sea_query::{
	Alias, Asterisk, ColumnRef, Condition as SeaCondition, Expr, Func, IntoColumnRef, LikeExpr,
	MysqlQueryBuilder, Order, PostgresQueryBuilder, Query as SeaQuery, SelectStatement,
	SimpleExpr, SqliteQueryBuilder,
};
use serde_json::Value;
use std::collections::HashMap;

/// SQL flavour used when rendering statements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlDialect {
	#[default]
	Postgres,
	MySql,
	Sqlite,
}

impl SqlDialect {
	fn render(&self, statement: &SelectStatement) -> String {
		match self {
			Self::Postgres => statement.to_string(PostgresQueryBuilder),
			Self::MySql => statement.to_string(MysqlQueryBuilder),
			Self::Sqlite => statement.to_string(SqliteQueryBuilder),
		}
	}
}

/// Runs rendered SQL and returns rows as JSON objects
#[async_trait]
pub trait SqlExecutor: Send + Sync {
	async fn query(&self, sql: &str) -> QueryResult<Vec<Record>>;
}

/// How a named relation joins back to the base table
///
/// `related_table.related_key = base_table.local_key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
	pub table: String,
	pub related_key: String,
	pub local_key: String,
}

impl Relationship {
	pub fn new(
		table: impl Into<String>,
		related_key: impl Into<String>,
		local_key: impl Into<String>,
	) -> Self {
		Self {
			table: table.into(),
			related_key: related_key.into(),
			local_key: local_key.into(),
		}
	}
}

/// [`QuerySource`] that compiles plans to SQL
pub struct SqlSource<E> {
	executor: E,
	dialect: SqlDialect,
	relations: HashMap<String, Relationship>,
}

impl<E: SqlExecutor> SqlSource<E> {
	pub fn new(executor: E, dialect: SqlDialect) -> Self {
		Self {
			executor,
			dialect,
			relations: HashMap::new(),
		}
	}

	/// Register a relation so `Condition::Relation` on `name` can compile to `EXISTS`
	pub fn with_relation(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
		self.relations.insert(name.into(), relationship);
		self
	}

	pub fn executor(&self) -> &E {
		&self.executor
	}

	pub fn dialect(&self) -> SqlDialect {
		self.dialect
	}

	/// Render the `SELECT *` statement for a plan
	pub fn select_sql(&self, query: &Query, offset: u64, limit: Option<u64>) -> QueryResult<String> {
		let mut statement = SeaQuery::select()
			.from(Alias::new(query.table_name()))
			.column(Asterisk)
			.to_owned();

		if let Some(condition) = query.condition() {
			statement.cond_where(self.compile(&condition, query.table_name(), None)?);
		}

		for order in query.orders() {
			let direction = match order.direction {
				SortDirection::Asc => Order::Asc,
				SortDirection::Desc => Order::Desc,
			};
			statement.order_by(column_ref(&order.column, None), direction);
		}

		if let Some(limit) = limit {
			statement.limit(limit);
		}
		if offset > 0 {
			statement.offset(offset);
		}

		Ok(self.dialect.render(&statement))
	}

	/// Render the `COUNT(*)` statement for a plan; orders are irrelevant and dropped
	pub fn count_sql(&self, query: &Query) -> QueryResult<String> {
		let mut statement = SeaQuery::select()
			.from(Alias::new(query.table_name()))
			.expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
			.to_owned();

		if let Some(condition) = query.condition() {
			statement.cond_where(self.compile(&condition, query.table_name(), None)?);
		}

		Ok(self.dialect.render(&statement))
	}

	fn compile(
		&self,
		condition: &Condition,
		base_table: &str,
		scope: Option<&str>,
	) -> QueryResult<SeaCondition> {
		let compiled = match condition {
			Condition::All(conditions) => {
				let mut all = SeaCondition::all();
				for inner in conditions {
					all = all.add(self.compile(inner, base_table, scope)?);
				}
				all
			}
			Condition::Any(conditions) if conditions.is_empty() => {
				SeaCondition::all().add(Expr::cust("1 = 0"))
			}
			Condition::Any(conditions) => {
				let mut any = SeaCondition::any();
				for inner in conditions {
					any = any.add(self.compile(inner, base_table, scope)?);
				}
				any
			}
			Condition::Not(inner) => self.compile(inner, base_table, scope)?.not(),
			Condition::Relation {
				relation,
				condition,
			} => {
				let relationship = self.relations.get(relation).ok_or_else(|| {
					QueryError::InvalidQuery(format!("relation '{}' is not registered", relation))
				})?;
				let related = relationship.table.as_str();
				let subquery = SeaQuery::select()
					.expr(Expr::cust("1"))
					.from(Alias::new(related))
					.cond_where(
						SeaCondition::all()
							.add(
								Expr::col((
									Alias::new(related),
									Alias::new(relationship.related_key.as_str()),
								))
								.equals((
									Alias::new(base_table),
									Alias::new(relationship.local_key.as_str()),
								)),
							)
							.add(self.compile(condition, base_table, Some(related))?),
					)
					.to_owned();
				SeaCondition::all().add(Expr::exists(subquery))
			}
			leaf => SeaCondition::all().add(leaf_expr(leaf, scope, self.dialect)),
		};
		Ok(compiled)
	}
}

#[async_trait]
impl<E: SqlExecutor> QuerySource for SqlSource<E> {
	async fn fetch(
		&self,
		query: &Query,
		offset: u64,
		limit: Option<u64>,
	) -> QueryResult<Vec<Record>> {
		let sql = self.select_sql(query, offset, limit)?;
		tracing::debug!(sql = %sql, "executing datatable select");
		self.executor.query(&sql).await
	}

	async fn count(&self, query: &Query) -> QueryResult<u64> {
		let sql = self.count_sql(query)?;
		tracing::debug!(sql = %sql, "executing datatable count");
		let rows = self.executor.query(&sql).await?;

		let count = rows
			.first()
			.and_then(|row| row.get("count").or_else(|| row.values().next()))
			.ok_or_else(|| QueryError::Database("count query returned no rows".to_string()))?;

		match count {
			Value::Number(n) => n.as_u64(),
			Value::String(s) => s.parse().ok(),
			_ => None,
		}
		.ok_or_else(|| QueryError::Database(format!("unexpected count value: {}", count)))
	}
}

fn column_ref(field: &str, scope: Option<&str>) -> ColumnRef {
	match (field.split_once('.'), scope) {
		(Some((table, column)), _) => (Alias::new(table), Alias::new(column)).into_column_ref(),
		(None, Some(table)) => (Alias::new(table), Alias::new(field)).into_column_ref(),
		(None, None) => Alias::new(field).into_column_ref(),
	}
}

fn to_sea_value(value: &Value) -> sea_query::Value {
	match value {
		Value::Null => sea_query::Value::String(None),
		Value::Bool(b) => (*b).into(),
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				i.into()
			} else if let Some(u) = n.as_u64() {
				u.into()
			} else {
				n.as_f64().unwrap_or_default().into()
			}
		}
		Value::String(s) => s.clone().into(),
		other => other.to_string().into(),
	}
}

const LIKE_ESCAPE: char = '!';

/// Lowercased LIKE pattern matching `value` literally between `prefix` and `suffix`
fn like_pattern(prefix: &str, value: &Value, suffix: &str) -> LikeExpr {
	let text = match value {
		Value::String(s) => s.to_lowercase(),
		other => other.to_string().to_lowercase(),
	};
	let mut pattern = String::from(prefix);
	for c in text.chars() {
		if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
			pattern.push(LIKE_ESCAPE);
		}
		pattern.push(c);
	}
	pattern.push_str(suffix);
	LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// `LOWER(CAST(column AS text))`, so numeric and date columns can be searched too
fn lowered_text(field: &str, scope: Option<&str>, dialect: SqlDialect) -> SimpleExpr {
	let text_type = match dialect {
		SqlDialect::MySql => "CHAR",
		SqlDialect::Postgres | SqlDialect::Sqlite => "TEXT",
	};
	Func::lower(Func::cast_as(
		Expr::col(column_ref(field, scope)),
		Alias::new(text_type),
	))
	.into()
}

fn leaf_expr(condition: &Condition, scope: Option<&str>, dialect: SqlDialect) -> SimpleExpr {
	match condition {
		Condition::Compare { field, op, value } => {
			let col = Expr::col(column_ref(field, scope));
			match (op, value) {
				(Operator::Eq, Value::Null) => col.is_null(),
				(Operator::Ne, Value::Null) => col.is_not_null(),
				(Operator::Eq, v) => col.eq(to_sea_value(v)),
				(Operator::Ne, v) => col.ne(to_sea_value(v)),
				(Operator::Gt, v) => col.gt(to_sea_value(v)),
				(Operator::Gte, v) => col.gte(to_sea_value(v)),
				(Operator::Lt, v) => col.lt(to_sea_value(v)),
				(Operator::Lte, v) => col.lte(to_sea_value(v)),
				(Operator::Contains, v) => {
					lowered_text(field, scope, dialect).like(like_pattern("%", v, "%"))
				}
				(Operator::StartsWith, v) => {
					lowered_text(field, scope, dialect).like(like_pattern("", v, "%"))
				}
				(Operator::EndsWith, v) => {
					lowered_text(field, scope, dialect).like(like_pattern("%", v, ""))
				}
			}
		}
		Condition::In { field, values } => {
			Expr::col(column_ref(field, scope)).is_in(values.iter().map(to_sea_value))
		}
		Condition::Between { field, low, high } => {
			Expr::col(column_ref(field, scope)).between(to_sea_value(low), to_sea_value(high))
		}
		Condition::DateEquals { field, date } => Expr::expr(
			Func::cust(Alias::new("DATE")).arg(Expr::col(column_ref(field, scope))),
		)
		.eq(date.format("%Y-%m-%d").to_string()),
		Condition::IsNull(field) => Expr::col(column_ref(field, scope)).is_null(),
		Condition::NotNull(field) => Expr::col(column_ref(field, scope)).is_not_null(),
		// Groups and relations are handled by `SqlSource::compile`
		Condition::All(_) | Condition::Any(_) | Condition::Not(_) | Condition::Relation { .. } => {
			Expr::cust("1 = 1")
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use parking_lot::Mutex;
	use serde_json::json;

	#[derive(Default)]
	struct RecordingExecutor {
		statements: Mutex<Vec<String>>,
		rows: Vec<Record>,
	}

	#[async_trait]
	impl SqlExecutor for RecordingExecutor {
		async fn query(&self, sql: &str) -> QueryResult<Vec<Record>> {
			self.statements.lock().push(sql.to_string());
			Ok(self.rows.clone())
		}
	}

	fn source() -> SqlSource<RecordingExecutor> {
		SqlSource::new(RecordingExecutor::default(), SqlDialect::Postgres)
			.with_relation("author", Relationship::new("users", "id", "author_id"))
	}

	#[test]
	fn test_select_without_conditions() {
		let sql = source()
			.select_sql(&Query::table("posts"), 0, None)
			.unwrap();
		assert_eq!(sql, r#"SELECT * FROM "posts""#);
	}

	#[test]
	fn test_search_compiles_to_lowered_like() {
		let mut query = Query::table("posts");
		query.and_where_group(|group| {
			group
				.or_where(Condition::contains("title", "Rust"))
				.or_where(Condition::contains("body", "Rust"));
		});

		let sql = source().select_sql(&query, 20, Some(10)).unwrap();
		assert!(sql.contains(r#"LOWER(CAST("title" AS TEXT)) LIKE '%rust%'"#), "{}", sql);
		assert!(sql.contains(" OR "), "{}", sql);
		assert!(sql.contains(r#"LOWER(CAST("body" AS TEXT)) LIKE '%rust%'"#), "{}", sql);
		assert!(sql.ends_with("LIMIT 10 OFFSET 20"), "{}", sql);
	}

	#[test]
	fn test_search_matches_wildcards_literally() {
		let mut query = Query::table("products");
		query.and_where(Condition::contains("code", "50%_off!"));

		let sql = source().select_sql(&query, 0, None).unwrap();
		assert!(
			sql.contains(r#"LIKE '%50!%!_off!!%' ESCAPE '!'"#),
			"{}",
			sql
		);
	}

	#[test]
	fn test_search_casts_per_dialect() {
		let mut query = Query::table("posts");
		query.and_where(Condition::contains("id", "7"));

		let mysql = SqlSource::new(RecordingExecutor::default(), SqlDialect::MySql)
			.select_sql(&query, 0, None)
			.unwrap();
		assert!(mysql.contains("LOWER(CAST(`id` AS CHAR)) LIKE '%7%'"), "{}", mysql);

		let sqlite = SqlSource::new(RecordingExecutor::default(), SqlDialect::Sqlite)
			.select_sql(&query, 0, None)
			.unwrap();
		assert!(sqlite.contains(r#"LOWER(CAST("id" AS TEXT)) LIKE '%7%'"#), "{}", sqlite);
	}

	#[test]
	fn test_date_and_between() {
		let mut query = Query::table("posts");
		query
			.where_date("published_at", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
			.where_between("created_at", "2024-01-15 00:00:00", "2024-01-17 23:59:59");

		let sql = source().select_sql(&query, 0, None).unwrap();
		assert!(sql.contains(r#"DATE("published_at") = '2024-03-01'"#), "{}", sql);
		assert!(
			sql.contains(
				r#""created_at" BETWEEN '2024-01-15 00:00:00' AND '2024-01-17 23:59:59'"#
			),
			"{}",
			sql
		);
	}

	#[test]
	fn test_relation_compiles_to_exists() {
		let mut query = Query::table("posts");
		query.and_where(Condition::relation(
			"author",
			Condition::contains("name", "bob"),
		));

		let sql = source().select_sql(&query, 0, None).unwrap();
		assert!(sql.contains("EXISTS"), "{}", sql);
		assert!(sql.contains(r#""users"."id" = "posts"."author_id""#), "{}", sql);
		assert!(sql.contains(r#"LOWER(CAST("users"."name" AS TEXT)) LIKE '%bob%'"#), "{}", sql);
	}

	#[test]
	fn test_unknown_relation_is_rejected() {
		let mut query = Query::table("posts");
		query.and_where(Condition::relation("editor", Condition::eq("id", 1)));

		let result = source().select_sql(&query, 0, None);
		assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
	}

	#[test]
	fn test_order_by_and_count() {
		let mut query = Query::table("posts");
		query
			.and_where(Condition::is_in("id", [1, 2]))
			.order_by("title", SortDirection::Desc);

		let source = source();
		let select = source.select_sql(&query, 0, None).unwrap();
		assert!(select.contains(r#""id" IN (1, 2)"#), "{}", select);
		assert!(select.ends_with(r#"ORDER BY "title" DESC"#), "{}", select);

		let count = source.count_sql(&query).unwrap();
		assert!(count.starts_with(r#"SELECT COUNT(*) AS "count" FROM "posts""#), "{}", count);
		assert!(!count.contains("ORDER BY"), "{}", count);
	}

	#[tokio::test]
	async fn test_count_reads_count_column() {
		let executor = RecordingExecutor {
			statements: Mutex::new(Vec::new()),
			rows: vec![json!({"count": 7}).as_object().cloned().unwrap()],
		};
		let source = SqlSource::new(executor, SqlDialect::Sqlite);

		let total = source.count(&Query::table("posts")).await.unwrap();
		assert_eq!(total, 7);
		assert_eq!(source.executor().statements.lock().len(), 1);
	}
}
