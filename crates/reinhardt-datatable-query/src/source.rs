//! Query execution capability.

use crate::builder::Query;
use crate::condition::Condition;
use crate::error::QueryResult;
use crate::value::{Record, RowId, values_equal};
use async_trait::async_trait;
use serde::Serialize;

/// One page of results plus the information needed to render a paginator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: u64,
	/// 1-based page number
	pub page: u64,
	pub per_page: u64,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
		Self {
			items,
			total,
			page: page.max(1),
			per_page: per_page.max(1),
		}
	}

	/// Number of the last page; an empty result still has one page
	pub fn last_page(&self) -> u64 {
		self.total.div_ceil(self.per_page).max(1)
	}

	pub fn has_more_pages(&self) -> bool {
		self.page < self.last_page()
	}

	/// 1-based index of the first item on this page, `None` when empty
	pub fn first_item(&self) -> Option<u64> {
		(!self.items.is_empty()).then(|| page_offset(self.page, self.per_page).saturating_add(1))
	}

	/// 1-based index of the last item on this page, `None` when empty
	pub fn last_item(&self) -> Option<u64> {
		self.first_item()
			.map(|first| first.saturating_add(self.items.len() as u64 - 1))
	}

	pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			page: self.page,
			per_page: self.per_page,
		}
	}
}

/// Rows skipped before page `page` (1-based); saturates instead of overflowing
pub fn page_offset(page: u64, per_page: u64) -> u64 {
	page.saturating_sub(1).saturating_mul(per_page)
}

/// Something that can execute a [`Query`] plan
///
/// Implementors provide [`fetch`](QuerySource::fetch) and
/// [`count`](QuerySource::count); pagination, single-row lookup and id
/// scoping are derived from those two.
#[async_trait]
pub trait QuerySource: Send + Sync {
	/// Rows matching `query`, in its order, skipping `offset` and taking at most `limit`
	async fn fetch(&self, query: &Query, offset: u64, limit: Option<u64>)
	-> QueryResult<Vec<Record>>;

	/// Number of rows matching `query`
	async fn count(&self, query: &Query) -> QueryResult<u64>;

	/// Fetch page `page` (1-based) of `per_page` rows
	async fn paginate(&self, query: &Query, page: u64, per_page: u64) -> QueryResult<Page<Record>> {
		let page = page.max(1);
		let per_page = per_page.max(1);
		let total = self.count(query).await?;
		let items = self
			.fetch(query, page_offset(page, per_page), Some(per_page))
			.await?;
		Ok(Page::new(items, total, page, per_page))
	}

	/// The row of `query` whose `key` equals `id`
	async fn find(&self, query: &Query, key: &str, id: &RowId) -> QueryResult<Option<Record>> {
		let mut scoped = query.clone();
		scoped.and_where(Condition::eq(key, id.clone()));
		Ok(self.fetch(&scoped, 0, Some(1)).await?.into_iter().next())
	}

	/// The subset of `ids` that `query` matches, in submission order
	async fn matching_ids(&self, query: &Query, key: &str, ids: &[RowId]) -> QueryResult<Vec<RowId>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut scoped = query.clone();
		scoped.and_where(Condition::is_in(key, ids.iter().cloned()));
		let rows = self.fetch(&scoped, 0, None).await?;

		Ok(ids
			.iter()
			.filter(|id| {
				rows.iter()
					.any(|row| row.get(key).is_some_and(|value| values_equal(value, id)))
			})
			.cloned()
			.collect())
	}
}
