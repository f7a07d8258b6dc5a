//! End-to-end flows through the facade: definition, interaction, data,
//! actions and export

use parking_lot::Mutex;
use reinhardt_datatable::prelude::*;
use reinhardt_datatable::query::Relationship;
use rstest::*;
use serde_json::json;
use std::sync::Arc;

fn animals() -> MemorySource {
	MemorySource::from_values(vec![
		json!({"id": 1, "name": "Zebra", "habitat": "savanna", "legs": 4, "seen_at": "2024-01-16 10:00:00"}),
		json!({"id": 2, "name": "Apple", "habitat": "orchard", "legs": 0, "seen_at": "2024-01-18 08:00:00"}),
		json!({"id": 3, "name": "Mango", "habitat": "orchard", "legs": 0, "seen_at": "2024-01-15 23:00:00"}),
	])
}

fn animals_table(archived: Arc<Mutex<Vec<RowId>>>) -> Table {
	Table::new(Query::table("animals"))
		.with_columns(vec![
			Column::checkbox(),
			Column::make("name"),
			Column::make("habitat"),
			Column::make("legs").export_as(|row| json!(format!("{} legs", row["legs"]))),
			Column::actions().with_action(RowAction::make("view").url_using(|row| {
				format!("/animals/{}", row["id"])
			})),
		])
		.with_filter(
			Filter::make("habitat")
				.multiple(true)
				.with_options(vec![
					FilterOption::make("savanna").with_count(1),
					FilterOption::make("orchard").with_count(2),
				])
				.query(|query, values| {
					query.and_where(Condition::is_in("habitat", values.iter().cloned()));
				}),
		)
		.with_filter(RangeFilter::make("seen_at"))
		.with_action(
			BulkAction::make("archive")
				.confirm(|ids| Confirmation::new().title(format!("Archive {} animals?", ids.len())))
				.handle(move |ids| {
					let archived = archived.clone();
					async move {
						archived.lock().extend(ids);
						ActionResult::success().with_message("Archived")
					}
				}),
		)
		.with_export_name("animals")
}

#[rstest]
#[case(SortDirection::Asc, vec!["Apple", "Mango", "Zebra"])]
#[case(SortDirection::Desc, vec!["Zebra", "Mango", "Apple"])]
#[tokio::test]
async fn test_sorted_listing(#[case] direction: SortDirection, #[case] expected: Vec<&str>) {
	let table = animals_table(Arc::default());
	let page = table
		.paginate(&animals(), &QueryParams::new().sort("name", direction), 1, 10)
		.await
		.unwrap();

	let names: Vec<_> = page.items.iter().map(|row| row["name"].clone()).collect();
	assert_eq!(names, expected.into_iter().map(|n| json!(n)).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_filter_select_confirm_and_export() {
	let archived = Arc::new(Mutex::new(Vec::new()));
	let datatable = Datatable::mount(|| animals_table(archived.clone()), animals()).unwrap();

	let state = datatable.initial_state();
	let state = datatable.toggle_filter(state, "habitat", "orchard");
	let state = datatable.update_filter(
		state,
		"seen_at",
		FilterValue::from(json!({"start": "2024-01-15", "end": "2024-01-16"})),
	);
	let state = datatable.sort_by(state, "name");

	let page = datatable.data(&state).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.items[0]["name"], "Mango");
	assert_eq!(datatable.active_filters_count(&state), 2);

	let state = datatable.select_page(state).await.unwrap();
	let transition = datatable
		.request_bulk_action(state, "archive", &[])
		.await
		.unwrap();
	assert!(transition.state.show_confirm_modal);
	assert!(archived.lock().is_empty());

	let transition = datatable.confirm(transition.state).await.unwrap();
	assert_eq!(*archived.lock(), vec![json!(3)]);
	assert!(transition.state.selected.is_empty());
	assert!(matches!(
		&transition.events[0],
		ComponentEvent::Notify(n) if n.kind == NotificationKind::Success && n.title == "Success"
	));

	let export = datatable.export(&transition.state, "csv").await.unwrap();
	assert_eq!(export.filename, "animals.csv");
	assert_eq!(
		String::from_utf8(export.data).unwrap(),
		"Name,Habitat,Legs\nMango,orchard,0 legs\n"
	);
}

#[test]
fn test_descriptor_for_presentation_layer() {
	let table = animals_table(Arc::default());
	let descriptor = table.to_json();

	assert_eq!(descriptor["columns"][0]["type"], "checkbox");
	assert_eq!(descriptor["columns"][4]["type"], "action");
	assert_eq!(descriptor["filters"][0]["options"][1]["count"], 2);
	assert_eq!(descriptor["filters"][1]["mode"], "range");
	assert_eq!(descriptor["actions"][0]["requiresConfirmation"], true);
	assert_eq!(descriptor["exportName"], "animals");

	let view = table.find_row_action("view").unwrap();
	let row = json!({"id": 7}).as_object().cloned().unwrap();
	assert_eq!(view.to_json()["url"], serde_json::Value::Null);
	assert_eq!(view.to_json_for(&row)["url"], "/animals/7");
}

#[derive(Default)]
struct RecordingExecutor {
	statements: Mutex<Vec<String>>,
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
	async fn query(&self, sql: &str) -> reinhardt_datatable::query::QueryResult<Vec<Record>> {
		self.statements.lock().push(sql.to_string());
		if sql.contains("COUNT(*)") {
			Ok(vec![json!({"count": 0}).as_object().cloned().unwrap_or_default()])
		} else {
			Ok(Vec::new())
		}
	}
}

#[tokio::test]
async fn test_composed_query_against_sql() {
	let table = Table::new(Query::table("posts")).with_columns(vec![
		Column::make("title"),
		Column::make("author.name").sortable(false),
	]);
	let source = SqlSource::new(RecordingExecutor::default(), SqlDialect::Postgres)
		.with_relation("author", Relationship::new("users", "id", "author_id"));

	let params = QueryParams::new()
		.search("Ferris")
		.sort("title", SortDirection::Desc);
	let page = table.paginate(&source, &params, 2, 25).await.unwrap();
	assert_eq!(page.total, 0);

	let statements = source.executor().statements.lock().clone();
	assert_eq!(statements.len(), 2);
	let select = &statements[1];
	assert!(select.contains(r#"LOWER(CAST("title" AS TEXT)) LIKE '%ferris%'"#), "{}", select);
	assert!(select.contains("EXISTS"), "{}", select);
	assert!(select.contains(r#"LOWER(CAST("users"."name" AS TEXT)) LIKE '%ferris%'"#), "{}", select);
	assert!(select.contains(r#"ORDER BY "title" DESC"#), "{}", select);
	assert!(select.ends_with("LIMIT 25 OFFSET 25"), "{}", select);
}
