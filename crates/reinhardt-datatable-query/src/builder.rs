//! Fluent query plan builder.
//!
//! A [`Query`] is an unexecuted description of "which rows, in which order"
//! for one table. It is cheap to clone, so a table definition can keep a base
//! query and hand out fresh copies to compose on.

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}

impl SortDirection {
	/// The opposite direction
	pub fn toggled(self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

impl fmt::Display for SortDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SortDirection {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"asc" => Ok(Self::Asc),
			"desc" => Ok(Self::Desc),
			other => Err(format!("unknown sort direction '{}'", other)),
		}
	}
}

/// One `ORDER BY` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
	pub column: String,
	pub direction: SortDirection,
}

/// How a where clause joins the clauses before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
	And,
	Or,
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
	boolean: Boolean,
	condition: Condition,
}

/// Unexecuted query plan over a single table
///
/// # Examples
///
/// ```
/// use reinhardt_datatable_query::{Condition, Query, SortDirection};
///
/// let mut query = Query::table("users");
/// query
///     .and_where(Condition::eq("active", true))
///     .and_where_group(|group| {
///         group
///             .or_where(Condition::contains("name", "ali"))
///             .or_where(Condition::contains("email", "ali"));
///     })
///     .order_by("name", SortDirection::Asc);
///
/// assert_eq!(query.orders().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
	table: String,
	clauses: Vec<Clause>,
	orders: Vec<OrderBy>,
}

impl Query {
	/// Start a query over `table` with no conditions
	pub fn table(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			clauses: Vec::new(),
			orders: Vec::new(),
		}
	}

	/// An empty plan on the same table, used for nested groups
	fn group(&self) -> Self {
		Self::table(self.table.clone())
	}

	pub fn table_name(&self) -> &str {
		&self.table
	}

	/// `... AND condition`
	pub fn and_where(&mut self, condition: Condition) -> &mut Self {
		self.push(Boolean::And, condition)
	}

	/// `... OR condition`
	pub fn or_where(&mut self, condition: Condition) -> &mut Self {
		self.push(Boolean::Or, condition)
	}

	/// `... AND ( group )`; an empty group adds nothing
	pub fn and_where_group<F>(&mut self, build: F) -> &mut Self
	where
		F: FnOnce(&mut Query),
	{
		let mut group = self.group();
		build(&mut group);
		match group.condition() {
			Some(condition) => self.push(Boolean::And, condition),
			None => self,
		}
	}

	/// `... OR ( group )`; an empty group adds nothing
	pub fn or_where_group<F>(&mut self, build: F) -> &mut Self
	where
		F: FnOnce(&mut Query),
	{
		let mut group = self.group();
		build(&mut group);
		match group.condition() {
			Some(condition) => self.push(Boolean::Or, condition),
			None => self,
		}
	}

	/// `... AND field BETWEEN low AND high`
	pub fn where_between(
		&mut self,
		field: impl Into<String>,
		low: impl Into<serde_json::Value>,
		high: impl Into<serde_json::Value>,
	) -> &mut Self {
		self.and_where(Condition::between(field, low, high))
	}

	/// `... AND DATE(field) = date`
	pub fn where_date(&mut self, field: impl Into<String>, date: chrono::NaiveDate) -> &mut Self {
		self.and_where(Condition::date_equals(field, date))
	}

	/// Append an ordering term
	pub fn order_by(&mut self, column: impl Into<String>, direction: SortDirection) -> &mut Self {
		self.orders.push(OrderBy {
			column: column.into(),
			direction,
		});
		self
	}

	pub fn orders(&self) -> &[OrderBy] {
		&self.orders
	}

	pub fn has_conditions(&self) -> bool {
		!self.clauses.is_empty()
	}

	/// Collapse the where clauses into one condition tree.
	///
	/// AND binds tighter than OR, as in SQL: `a AND b OR c` becomes
	/// `Any[All[a, b], c]`. Returns `None` when no clause was added.
	pub fn condition(&self) -> Option<Condition> {
		let mut disjuncts: Vec<Vec<Condition>> = Vec::new();

		for clause in &self.clauses {
			match (clause.boolean, disjuncts.last_mut()) {
				(Boolean::And, Some(current)) => current.push(clause.condition.clone()),
				_ => disjuncts.push(vec![clause.condition.clone()]),
			}
		}

		let mut groups: Vec<Condition> = disjuncts
			.into_iter()
			.map(|mut conjuncts| {
				if conjuncts.len() == 1 {
					conjuncts.remove(0)
				} else {
					Condition::All(conjuncts)
				}
			})
			.collect();

		match groups.len() {
			0 => None,
			1 => groups.pop(),
			_ => Some(Condition::Any(groups)),
		}
	}

	fn push(&mut self, boolean: Boolean, condition: Condition) -> &mut Self {
		self.clauses.push(Clause { boolean, condition });
		self
	}
}
