use std::{cell::RefCell, rc::Rc};

use gridfilter::{
    ChannelFilter, ChannelKind, CriterionCombinator, DataSource, FilterChannel, FilterEnvelope,
    FilterError, FilterMode, FilterSettings, ListDataSource, QueryChannel, core::deliver,
};

mod common;
use common::{
    TaskGrid, boolean_filter, date, date_filter, enum_filter, init_tracing, record_events,
    sample_tasks,
    task_entity::{Entity as TaskEntity, Priority, Task},
    task_grid, text_filter, where_clause,
};

fn remote_settings() -> FilterSettings {
    FilterSettings {
        mode: FilterMode::Remote,
        source: "tasks".to_string(),
        ..FilterSettings::default()
    }
}

fn in_memory_settings() -> FilterSettings {
    FilterSettings {
        mode: FilterMode::InMemory,
        ..FilterSettings::default()
    }
}

/// Channel taking predicates, remembering every envelope it was given
#[derive(Clone, Default)]
struct EnvelopeChannel {
    received: Rc<RefCell<Vec<FilterEnvelope<Task>>>>,
}

impl FilterChannel<Task> for EnvelopeChannel {
    fn accepts(&self) -> ChannelKind {
        ChannelKind::Predicate
    }

    fn set_filter(&mut self, filter: ChannelFilter<Task>) {
        if let ChannelFilter::Predicate(envelope) = filter {
            self.received.borrow_mut().push(envelope);
        }
    }
}

fn remote_grid() -> (TaskGrid, QueryChannel<TaskEntity>) {
    let channel = QueryChannel::new();
    let mut grid = task_grid(&remote_settings());
    grid.attach_data_source(DataSource::channel(channel.clone()));
    (grid, channel)
}

// ============================================================================
// Remote mode
// ============================================================================

#[test]
fn test_remote_combines_only_non_empty_criteria() {
    let (mut grid, channel) = remote_grid();
    let events = record_events(&grid);

    boolean_filter(&mut grid, "completed").set_value(Some(false));
    enum_filter(&mut grid, "priority").set_members([Priority::High, Priority::Urgent]);
    grid.apply_filter();

    let expected = r#""tasks"."completed" = FALSE AND "tasks"."priority" IN ('High', 'Urgent')"#;
    assert!(grid.is_filtered());
    assert_eq!(where_clause(grid.current_remote_criterion().cloned().unwrap()), expected);
    assert_eq!(where_clause(channel.condition().unwrap()), expected);

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source(), "tasks");
    assert!(!events[0].is_from_user_interaction());
    assert_eq!(where_clause(events[0].criterion().cloned().unwrap()), expected);
}

#[test]
fn test_clear_all_filters_fires_exactly_one_inactive_event() {
    let (mut grid, channel) = remote_grid();
    boolean_filter(&mut grid, "completed").set_value(Some(true));
    text_filter(&mut grid, "title").set_text("Foo");
    grid.apply_filter();

    let events = record_events(&grid);
    grid.clear_all_filters();

    assert!(!grid.is_filtered());
    assert!(grid.current_remote_criterion().is_none());
    assert!(channel.condition().is_none());
    assert_eq!(events.borrow().len(), 1);
    assert!(events.borrow()[0].criterion().is_none());
    assert!(boolean_filter(&mut grid, "completed").value().is_none());
    assert_eq!(text_filter(&mut grid, "title").text(), "");
}

#[test]
fn test_inactive_to_inactive_fires_nothing() {
    let (mut grid, _channel) = remote_grid();
    let events = record_events(&grid);

    grid.apply_filter();
    grid.apply_filter();
    grid.clear_all_filters();

    assert!(events.borrow().is_empty());
}

#[test]
fn test_active_filter_notifies_on_every_apply() {
    let (mut grid, _channel) = remote_grid();
    let events = record_events(&grid);

    date_filter(&mut grid, "due").set_start(Some(date(2024, 1, 11)));
    grid.apply_filter();
    grid.apply_filter();

    let events = events.borrow();
    assert_eq!(events.len(), 2, "an unchanged active filter still notifies");
    assert_eq!(events[0], events[1]);
}

#[test]
fn test_blank_text_with_switch_is_filtered_but_contributes_nothing() {
    let (mut grid, channel) = remote_grid();
    let events = record_events(&grid);

    text_filter(&mut grid, "title").set_case_sensitive(true);
    grid.apply_filter();

    assert!(grid.is_filtered());
    assert!(channel.condition().is_none());
    assert!(events.borrow().is_empty());
}

#[test]
fn test_removed_listener_hears_nothing() {
    let (mut grid, _channel) = remote_grid();
    let heard = Rc::new(RefCell::new(0));
    let registration = {
        let heard = Rc::clone(&heard);
        grid.add_filter_change_listener(move |_| *heard.borrow_mut() += 1)
    };

    boolean_filter(&mut grid, "completed").set_value(Some(true));
    grid.apply_filter();
    assert!(registration.remove());
    grid.apply_filter();

    assert_eq!(*heard.borrow(), 1);
}

// ============================================================================
// In-memory mode
// ============================================================================

#[test]
fn test_in_memory_conjoins_column_predicates() {
    let list = ListDataSource::new(sample_tasks());
    let mut grid = task_grid(&in_memory_settings());
    grid.attach_data_source(DataSource::direct(list.clone()));
    let events = record_events(&grid);

    text_filter(&mut grid, "title").set_text("foo");
    boolean_filter(&mut grid, "completed").set_value(Some(false));
    grid.apply_filter();
    let ids: Vec<i32> = list.visible_items().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);

    enum_filter(&mut grid, "priority").set_members([Priority::Urgent]);
    grid.apply_filter();
    let ids: Vec<i32> = list.visible_items().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3]);

    assert!(events.borrow().is_empty(), "in-memory filtering never notifies");
    assert!(grid.current_remote_criterion().is_none());
}

#[test]
fn test_in_memory_without_criteria_shows_every_row() {
    let list = ListDataSource::new(sample_tasks());
    let mut grid = task_grid(&in_memory_settings());
    grid.attach_data_source(DataSource::direct(list.clone()));

    grid.apply_filter();

    assert!(list.has_filter());
    assert_eq!(list.visible_count(), list.len());
}

#[test]
fn test_in_memory_envelope_reaches_predicate_channel() {
    let channel = EnvelopeChannel::default();
    let mut grid = task_grid(&in_memory_settings());
    grid.attach_data_source(DataSource::channel(channel.clone()));

    boolean_filter(&mut grid, "completed").set_value(Some(true));
    grid.apply_filter();

    let received = channel.received.borrow();
    assert_eq!(received.len(), 1);
    let passing: Vec<i32> = sample_tasks()
        .into_iter()
        .filter(|t| received[0].test(t))
        .map(|t| t.id)
        .collect();
    assert_eq!(passing, vec![2, 4]);
}

#[test]
fn test_mode_switch_keeps_criteria() {
    let list = ListDataSource::new(sample_tasks());
    let mut grid = task_grid(&in_memory_settings());
    grid.attach_data_source(DataSource::direct(list.clone()));
    date_filter(&mut grid, "due").set_end(Some(date(2024, 1, 11)));
    grid.apply_filter();
    assert_eq!(list.visible_count(), 2);

    let channel = QueryChannel::<TaskEntity>::new();
    grid.set_mode(FilterMode::Remote);
    grid.attach_data_source(DataSource::channel(channel.clone()));
    grid.apply_filter();

    assert_eq!(grid.mode(), FilterMode::Remote);
    assert!(grid.is_filtered());
    let sql = where_clause(channel.condition().unwrap());
    assert_eq!(sql, r#""tasks"."due" <= '2024-01-11'"#);
}

// ============================================================================
// Channel mismatch
// ============================================================================

#[test]
fn test_remote_filter_into_predicate_channel_still_notifies() {
    init_tracing();
    let channel = EnvelopeChannel::default();
    let mut grid = task_grid(&remote_settings());
    grid.attach_data_source(DataSource::channel(channel.clone()));
    let events = record_events(&grid);

    boolean_filter(&mut grid, "completed").set_value(Some(true));
    grid.apply_filter();

    assert!(channel.received.borrow().is_empty());
    assert!(grid.current_remote_criterion().is_some());
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn test_in_memory_filter_into_condition_channel_is_dropped() {
    let channel = QueryChannel::<TaskEntity>::new();
    let mut grid = task_grid(&in_memory_settings());
    grid.attach_data_source(DataSource::channel(channel.clone()));

    boolean_filter(&mut grid, "completed").set_value(Some(true));
    grid.apply_filter();

    assert!(channel.condition().is_none());
}

#[test]
fn test_deliver_reports_mismatch() {
    let mut channel = EnvelopeChannel::default();
    let err = deliver(&mut channel, ChannelFilter::Condition(None)).unwrap_err();
    assert_eq!(
        err,
        FilterError::channel_mismatch(ChannelKind::Predicate, ChannelKind::Condition)
    );
    assert!(channel.received.borrow().is_empty());
}

#[test]
fn test_no_data_source_still_tracks_and_notifies() {
    let mut grid = task_grid(&remote_settings());
    let events = record_events(&grid);

    boolean_filter(&mut grid, "completed").set_value(Some(false));
    grid.apply_filter();

    assert!(grid.current_remote_criterion().is_some());
    assert_eq!(events.borrow().len(), 1);
    assert!(grid.detach_data_source().is_none());
}

// ============================================================================
// Combinator, settings and gates
// ============================================================================

#[test]
fn test_combinator_keeps_remote_state_during_in_memory_pass() {
    let mut grid = task_grid(&remote_settings());
    boolean_filter(&mut grid, "completed").set_value(Some(true));

    let mut combinator = CriterionCombinator::new();
    let remote = combinator.combine(FilterMode::Remote, grid.columns());
    assert!(remote.notify && remote.filter.is_active());
    assert_eq!(remote.filter.mode(), FilterMode::Remote);

    let in_memory = combinator.combine(FilterMode::InMemory, grid.columns());
    assert!(!in_memory.notify);
    assert!(in_memory.filter.is_active());
    assert!(in_memory.filter.condition().is_none());
    assert!(combinator.current().is_some());
}

#[test]
fn test_invalid_offset_is_rejected() {
    let settings = FilterSettings {
        utc_offset_seconds: 86_400,
        ..FilterSettings::default()
    };
    let err = TaskGrid::new(&settings).unwrap_err();
    assert_eq!(err, FilterError::invalid_time_zone(86_400));
}

#[test]
fn test_settings_from_json_configure_the_grid() {
    let settings =
        FilterSettings::from_json(r#"{"mode": "in_memory", "source": "backlog"}"#).unwrap();
    let grid = task_grid(&settings);
    assert_eq!(grid.mode(), FilterMode::InMemory);
    assert_eq!(grid.source(), "backlog");
    assert_eq!(grid.zone().local_minus_utc(), 0);
}

#[test]
fn test_row_gate_defaults_and_overrides() {
    let mut grid = task_grid(&remote_settings());
    let tasks = sample_tasks();
    assert!(tasks.iter().all(|t| grid.row_gate().can_select(t) && grid.row_gate().can_edit(t)));

    grid.row_gate_mut().set_selection_predicate(|t: &Task| !t.completed);
    grid.row_gate_mut().set_edit_predicate(|t: &Task| t.priority != Priority::Urgent);

    let selectable: Vec<i32> = grid.row_gate().selectable(&tasks).iter().map(|t| t.id).collect();
    assert_eq!(selectable, vec![1, 3]);
    assert!(!grid.row_gate().can_edit(&tasks[2]));
    assert!(grid.row_gate().can_edit(&tasks[1]));
}

#[test]
fn test_column_lookup() {
    let grid = task_grid(&remote_settings());
    assert_eq!(grid.columns().len(), 6);
    assert!(grid.column("id").is_some_and(|c| c.filter().is_none()));
    assert_eq!(grid.column("due").and_then(|c| c.filter()).map(|f| f.kind()), Some("date_range"));
    assert!(grid.column("missing").is_none());
}
