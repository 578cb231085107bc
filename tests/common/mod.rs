#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use chrono::{DateTime, FixedOffset, NaiveDate};
use gridfilter::{
    BooleanFilter, Column, ColumnFilter, DateRangeFilter, EnumFilter, FieldSource,
    FilterChangeEvent, FilterModeController, FilterSettings, InstantRangeFilter, TextFilter,
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryTrait, Schema, Set,
};

pub mod task_entity;

use task_entity::{Priority, Task};

pub type TaskGrid = FilterModeController<task_entity::Model, task_entity::Entity>;

/// Route library logs to the test output, once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn instant(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

pub fn task(id: i32, title: &str, completed: bool, priority: Priority, due: NaiveDate) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed,
        priority,
        due,
        created_at: instant(&format!("{due}T09:00:00+00:00")),
    }
}

/// Four tasks spread over the 10th to the 13th of January 2024
pub fn sample_tasks() -> Vec<Task> {
    vec![
        task(1, "Foo report", false, Priority::High, date(2024, 1, 10)),
        task(2, "bar review", true, Priority::Low, date(2024, 1, 11)),
        task(3, "Food order", false, Priority::Urgent, date(2024, 1, 12)),
        task(4, "Release", true, Priority::Medium, date(2024, 1, 13)),
    ]
}

/// Grid with one unconfigured filter per task column, keyed by column name
pub fn task_grid(settings: &FilterSettings) -> TaskGrid {
    use task_entity::Column as TaskColumn;

    let zone = settings.time_zone().unwrap();
    TaskGrid::new(settings)
        .unwrap()
        .with_column(Column::new("id"))
        .with_column(Column::new("title").with_filter(ColumnFilter::text(
            TextFilter::new(FieldSource::column(TaskColumn::Title)),
            |t: &Task| t.title.clone(),
        )))
        .with_column(Column::new("completed").with_filter(ColumnFilter::boolean(
            BooleanFilter::new(FieldSource::column(TaskColumn::Completed)),
            |t: &Task| t.completed,
        )))
        .with_column(Column::new("priority").with_filter(ColumnFilter::enumerated(
            EnumFilter::new(FieldSource::column(TaskColumn::Priority)),
            |t: &Task| t.priority,
        )))
        .with_column(Column::new("due").with_filter(ColumnFilter::date_range(
            DateRangeFilter::new(FieldSource::column(TaskColumn::Due)),
            |t: &Task| t.due,
        )))
        .with_column(Column::new("created_at").with_filter(ColumnFilter::instant_range(
            InstantRangeFilter::new(FieldSource::column(TaskColumn::CreatedAt)).in_zone(zone),
            |t: &Task| t.created_at,
        )))
}

pub fn text_filter<'a>(
    grid: &'a mut TaskGrid,
    key: &str,
) -> &'a mut TextFilter<task_entity::Entity> {
    grid.column_mut(key)
        .and_then(Column::filter_mut)
        .and_then(ColumnFilter::as_text_mut)
        .unwrap()
}

pub fn boolean_filter<'a>(
    grid: &'a mut TaskGrid,
    key: &str,
) -> &'a mut BooleanFilter<task_entity::Entity> {
    grid.column_mut(key)
        .and_then(Column::filter_mut)
        .and_then(ColumnFilter::as_boolean_mut)
        .unwrap()
}

pub fn enum_filter<'a>(
    grid: &'a mut TaskGrid,
    key: &str,
) -> &'a mut EnumFilter<task_entity::Entity> {
    grid.column_mut(key)
        .and_then(Column::filter_mut)
        .and_then(ColumnFilter::as_enumerated_mut)
        .unwrap()
}

pub fn date_filter<'a>(
    grid: &'a mut TaskGrid,
    key: &str,
) -> &'a mut DateRangeFilter<task_entity::Entity> {
    grid.column_mut(key)
        .and_then(Column::filter_mut)
        .and_then(ColumnFilter::as_date_range_mut)
        .unwrap()
}

pub fn instant_filter<'a>(
    grid: &'a mut TaskGrid,
    key: &str,
) -> &'a mut InstantRangeFilter<task_entity::Entity> {
    grid.column_mut(key)
        .and_then(Column::filter_mut)
        .and_then(ColumnFilter::as_instant_range_mut)
        .unwrap()
}

/// Every event fired by `grid`, in order
pub fn record_events(grid: &TaskGrid) -> Rc<RefCell<Vec<FilterChangeEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    grid.add_filter_change_listener(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// WHERE clause of `SELECT ... FROM tasks` filtered by `condition`, rendered for Postgres
pub fn where_clause(condition: sea_orm::Condition) -> String {
    let sql = task_entity::Entity::find()
        .filter(condition)
        .build(DbBackend::Postgres)
        .to_string();
    sql.split_once(" WHERE ")
        .map(|(_, clause)| clause.to_string())
        .unwrap_or_default()
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(task_entity::Entity)))
        .await?;
    Ok(db)
}

pub async fn setup_test_db_with_tasks() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    for task in sample_tasks() {
        task_entity::ActiveModel {
            id: Set(task.id),
            title: Set(task.title),
            completed: Set(task.completed),
            priority: Set(task.priority),
            due: Set(task.due),
            created_at: Set(task.created_at),
        }
        .insert(&db)
        .await?;
    }
    Ok(db)
}
