use ride_search_analytics::analytics::aggregate::{analyze_window, DEFAULT_LIMIT};
use ride_search_analytics::parser::parse_events;

#[test]
fn test_full_pipeline() {
    let bytes = include_bytes!("fixtures/sample_search_logs.json");
    let events = parse_events(bytes).expect("Failed to parse search logs");
    assert_eq!(events.len(), 4);

    let report = analyze_window(&events, 30, DEFAULT_LIMIT);

    assert_eq!(report.window_days, 30);
    assert_eq!(report.kpis.total_searches, 4);
    assert_eq!(report.kpis.searches_without_results, 2);
    assert_eq!(report.kpis.converted_searches, 1);
    assert_eq!(report.kpis.unique_users, 2);
    assert_eq!(report.kpis.without_results_rate, 50.0);
    assert_eq!(report.kpis.conversion_rate, 25.0);

    // Bahía Blanca → Tres Arroyos: 3 searches, 2 with results, 1 converted
    let top = &report.top_routes[0];
    assert_eq!(top.origin_city, "Bahía Blanca");
    assert_eq!(top.dest_city, "Tres Arroyos");
    assert_eq!(top.search_count, 3);
    assert_eq!(top.results_rate, 66.67);
    assert_eq!(top.conversion_rate, 33.33);
    assert_eq!(top.avg_passengers, 2.3);

    let second = &report.top_routes[1];
    assert_eq!(second.dest_city, "Necochea");
    assert_eq!(second.search_count, 1);
    assert_eq!(second.results_rate, 0.0);

    // One failed search per route; the Necochea failure appears first in
    // the input so it wins the tie-break
    assert_eq!(report.unsatisfied_demand.len(), 2);
    assert_eq!(report.unsatisfied_demand[0].dest_city, "Necochea");
    assert_eq!(report.unsatisfied_demand[0].failed_searches, 1);
    assert_eq!(report.unsatisfied_demand[1].dest_city, "Tres Arroyos");
    assert_eq!(
        report.unsatisfied_demand[1].last_search_date.to_rfc3339(),
        "2025-03-12T19:05:00+00:00"
    );

    // Three distinct travel dates requested, ascending
    assert_eq!(report.by_day.len(), 3);
    assert_eq!(report.by_day[0].search_date.to_string(), "2025-03-15");
    assert_eq!(report.by_day[1].total_searches, 2);
}

#[test]
fn test_report_serializes_to_json() {
    let bytes = include_bytes!("fixtures/sample_search_logs.json");
    let events = parse_events(bytes).unwrap();

    let report = analyze_window(&events, 30, DEFAULT_LIMIT);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["kpis"]["total_searches"], 4);
    assert_eq!(json["top_routes"][0]["search_count"], 3);
    assert_eq!(json["unsatisfied_demand"][0]["dest_city"], "Necochea");
}
