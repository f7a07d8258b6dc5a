//! Exports of composed table queries

use reinhardt_datatable_core::{
	Column, Condition, DatatableSettings, ExportFormat, Filter, FilterOption, FilterValue,
	FilterValues, Query, QueryParams, RowAction, SortDirection, Table,
};
use reinhardt_datatable_export::{DatatableExporter, ExportError};
use reinhardt_datatable_query::MemorySource;
use rstest::*;
use serde_json::{Value, json};

#[fixture]
fn users() -> MemorySource {
	MemorySource::from_values(vec![
		json!({"id": 3, "name": "Zebra", "email": "zebra@example.com", "active": true}),
		json!({"id": 1, "name": "Apple", "email": "apple@example.com", "active": false}),
		json!({"id": 2, "name": "Mango", "email": "mango@example.org", "active": true}),
	])
}

#[fixture]
fn table() -> Table {
	Table::new(Query::table("users"))
		.with_columns(vec![
			Column::checkbox(),
			Column::make("name"),
			Column::actions().with_action(RowAction::make("edit")),
			Column::make("email"),
		])
		.with_filter(Filter::make("status").with_options(vec![
			FilterOption::make("active").query(|query, _| {
				query.and_where(Condition::eq("active", true));
			}),
		]))
		.with_export_name("users")
}

fn csv(data: &[u8]) -> String {
	String::from_utf8(data.to_vec()).unwrap()
}

#[rstest]
fn test_headers_skip_special_columns(table: Table) {
	assert_eq!(DatatableExporter::headers(&table), vec!["Name", "Email"]);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(1000)]
#[tokio::test]
async fn test_chunked_export_orders_by_primary_key(
	users: MemorySource,
	table: Table,
	#[case] chunk_size: u64,
) {
	let export = DatatableExporter::default()
		.with_chunk_size(chunk_size)
		.export(&table, &users, &QueryParams::new(), ExportFormat::Csv)
		.await
		.unwrap();

	assert_eq!(export.row_count, 3);
	assert_eq!(export.filename, "users.csv");
	assert_eq!(export.mime_type, "text/csv");
	assert_eq!(
		csv(&export.data),
		"Name,Email\nApple,apple@example.com\nMango,mango@example.org\nZebra,zebra@example.com\n"
	);
}

#[rstest]
#[tokio::test]
async fn test_export_follows_search_filters_and_sort(users: MemorySource, table: Table) {
	let mut filters = FilterValues::new();
	filters.insert("status".into(), FilterValue::list(["active"]));
	let params = QueryParams::new()
		.search("example")
		.filters(&filters)
		.sort("name", SortDirection::Desc);

	let export = DatatableExporter::default()
		.export(&table, &users, &params, ExportFormat::Csv)
		.await
		.unwrap();

	assert_eq!(
		csv(&export.data),
		"Name,Email\nZebra,zebra@example.com\nMango,mango@example.org\n"
	);
}

#[rstest]
#[case(1)]
#[case(2)]
#[tokio::test]
async fn test_sorted_export_breaks_ties_by_primary_key(table: Table, #[case] chunk_size: u64) {
	let twins = MemorySource::from_values(vec![
		json!({"id": 3, "name": "Twin", "email": "c@example.com"}),
		json!({"id": 1, "name": "Twin", "email": "a@example.com"}),
		json!({"id": 2, "name": "Twin", "email": "b@example.com"}),
	]);
	let params = QueryParams::new().sort("name", SortDirection::Asc);

	let query = DatatableExporter::query(&table, &params);
	let orders: Vec<_> = query
		.orders()
		.iter()
		.map(|order| (order.column.as_str(), order.direction))
		.collect();
	assert_eq!(orders, vec![("name", SortDirection::Asc), ("id", SortDirection::Asc)]);

	let export = DatatableExporter::default()
		.with_chunk_size(chunk_size)
		.export(&table, &twins, &params, ExportFormat::Csv)
		.await
		.unwrap();

	assert_eq!(
		csv(&export.data),
		"Name,Email\nTwin,a@example.com\nTwin,b@example.com\nTwin,c@example.com\n"
	);
}

#[rstest]
fn test_primary_key_sort_is_not_repeated(table: Table) {
	let table = table.with_primary_key("name");
	let params = QueryParams::new().sort("name", SortDirection::Desc);

	let query = DatatableExporter::query(&table, &params);

	assert_eq!(query.orders().len(), 1);
	assert_eq!(query.orders()[0].direction, SortDirection::Desc);
}

#[rstest]
#[tokio::test]
async fn test_export_value_transform(users: MemorySource) {
	let table = Table::new(Query::table("users")).with_columns(vec![
		Column::make("name").html(|_| "<b>hidden</b>".to_string()),
		Column::make("active").export_as(|record| {
			Value::from(if record["active"] == json!(true) { "yes" } else { "no" })
		}),
	]);

	let export = DatatableExporter::default()
		.export(&table, &users, &QueryParams::new(), ExportFormat::Csv)
		.await
		.unwrap();

	assert_eq!(csv(&export.data), "Name,Active\nApple,no\nMango,yes\nZebra,yes\n");
}

#[rstest]
#[tokio::test]
async fn test_disabled_export_is_refused(users: MemorySource, table: Table) {
	let err = DatatableExporter::default()
		.export(&table.exportable(false), &users, &QueryParams::new(), ExportFormat::Csv)
		.await
		.unwrap_err();

	assert!(matches!(err, ExportError::Configuration(_)));
}

#[rstest]
#[tokio::test]
async fn test_undeclared_format_is_refused(users: MemorySource, table: Table) {
	let table = table.with_export_formats(vec![ExportFormat::Xlsx]);
	let err = DatatableExporter::default()
		.export(&table, &users, &QueryParams::new(), ExportFormat::Csv)
		.await
		.unwrap_err();

	assert!(matches!(err, ExportError::Configuration(ref msg) if msg.contains("csv")));
}

#[cfg(not(feature = "xlsx"))]
#[rstest]
#[tokio::test]
async fn test_xlsx_without_writer_fails_before_streaming(users: MemorySource, table: Table) {
	let err = DatatableExporter::default()
		.export(&table, &users, &QueryParams::new(), ExportFormat::Xlsx)
		.await
		.unwrap_err();

	assert!(matches!(err, ExportError::Configuration(ref msg) if msg.contains("xlsx")));
}

#[cfg(feature = "xlsx")]
#[rstest]
#[tokio::test]
async fn test_xlsx_export(users: MemorySource, table: Table) {
	let export = DatatableExporter::default()
		.export(&table, &users, &QueryParams::new(), ExportFormat::Xlsx)
		.await
		.unwrap();

	assert_eq!(export.filename, "users.xlsx");
	assert_eq!(export.row_count, 3);
	assert!(export.data.starts_with(b"PK"));
}

#[test]
fn test_chunk_size_from_settings() {
	let settings = DatatableSettings::default().with_chunk_size(250);
	assert_eq!(DatatableExporter::new(&settings).chunk_size(), 250);
	assert_eq!(DatatableExporter::default().chunk_size(), 1000);
}
