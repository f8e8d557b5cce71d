use scriptmap::{LifecycleEvent, RoutingTable, RoutingTableBuilder, ScriptRecord};

#[test]
fn test_reference_scenario() {
    let table = RoutingTable::from_records([
        ScriptRecord::doc_event("S1", "Invoice", LifecycleEvent::Validate),
        ScriptRecord::api("S2", "ping"),
    ]);

    assert_eq!(table.lifecycle_handlers_by_label("Invoice", "Before Save"), ["S1"]);
    assert_eq!(table.api_handler("ping"), Some("S2"));
    assert!(table.permission_queries().is_empty());
}

#[test]
fn test_every_event_routes_under_its_label() {
    let records: Vec<_> = LifecycleEvent::ALL
        .into_iter()
        .map(|event| ScriptRecord::doc_event(event.name(), "Task", event))
        .collect();
    let table = RoutingTable::from_records(records);

    for event in LifecycleEvent::ALL {
        assert_eq!(
            table.lifecycle_handlers_by_label("Task", event.label()),
            [event.name()]
        );
    }
    assert_eq!(table.handler_count(), LifecycleEvent::ALL.len());
    assert_eq!(table.doctypes().collect::<Vec<_>>(), ["Task"]);
}

#[test]
fn test_duplicate_api_keys_last_wins() {
    let mut builder = RoutingTableBuilder::new();
    builder
        .extend([ScriptRecord::api("a", "sync"), ScriptRecord::api("b", "sync")])
        .extend([ScriptRecord::api("c", "sync")]);
    let table = builder.build();

    assert_eq!(table.api_handler("sync"), Some("c"));
    assert_eq!(table.api_methods().len(), 1);
}
