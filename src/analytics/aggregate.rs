use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::analytics::types::{
    DailySearchCounts, KpiSummary, RouteAggregate, SearchAnalytics, UnsatisfiedDemandAggregate,
};
use crate::analytics::utility::{mean, pct, round1, round2};
use crate::events::SearchEvent;

/// Default number of routes kept in each ranked view.
pub const DEFAULT_LIMIT: usize = 10;

struct RouteBucket {
    origin_city: String,
    dest_city: String,
    searches: usize,
    with_results: usize,
    converted: usize,
    passengers_sum: f64,
    last_created_at: DateTime<Utc>,
}

/// Computes global KPIs over the full window.
///
/// Both rates are 0.0 for an empty window. Anonymous searches (no user id)
/// count toward every total except `unique_users`.
pub fn compute_kpis(events: &[SearchEvent]) -> KpiSummary {
    let total_searches = events.len();
    let searches_without_results = events.iter().filter(|e| !e.has_results).count();
    let converted_searches = events.iter().filter(|e| e.did_convert).count();
    let unique_users = events
        .iter()
        .filter_map(|e| e.user_id.as_deref())
        .collect::<HashSet<_>>()
        .len();

    KpiSummary {
        total_searches,
        searches_without_results,
        converted_searches,
        unique_users,
        without_results_rate: pct(searches_without_results, total_searches),
        conversion_rate: pct(converted_searches, total_searches),
    }
}

/// Ranks routes by search volume.
///
/// Events are grouped by the literal `(origin_city, dest_city)` pair with
/// no normalization. Ties in `search_count` keep the order in which each
/// route was first seen while scanning the input.
pub fn compute_top_routes(events: &[SearchEvent], limit: usize) -> Vec<RouteAggregate> {
    let buckets = group_by_route(events.iter());

    let mut routes: Vec<RouteAggregate> = buckets
        .into_iter()
        .map(|b| RouteAggregate {
            origin_city: b.origin_city,
            dest_city: b.dest_city,
            search_count: b.searches,
            results_rate: round2(pct(b.with_results, b.searches)),
            conversion_rate: round2(pct(b.converted, b.searches)),
            avg_passengers: round1(mean(b.passengers_sum, b.searches)),
        })
        .collect();

    // sort_by is stable, so equal counts retain first-seen order
    routes.sort_by(|a, b| b.search_count.cmp(&a.search_count));
    routes.truncate(limit);
    routes
}

/// Ranks routes whose searches found no rides at all.
///
/// Only events with `has_results == false` enter the grouping; sort and
/// tie-break rules mirror [`compute_top_routes`] with `failed_searches` as
/// the primary key. `last_search_date` is the maximum `created_at` within
/// the group, independent of input order.
pub fn compute_unsatisfied_demand(
    events: &[SearchEvent],
    limit: usize,
) -> Vec<UnsatisfiedDemandAggregate> {
    let buckets = group_by_route(events.iter().filter(|e| !e.has_results));

    let mut demand: Vec<UnsatisfiedDemandAggregate> = buckets
        .into_iter()
        .map(|b| UnsatisfiedDemandAggregate {
            origin_city: b.origin_city,
            dest_city: b.dest_city,
            failed_searches: b.searches,
            last_search_date: b.last_created_at,
            avg_passengers: round1(mean(b.passengers_sum, b.searches)),
        })
        .collect();

    demand.sort_by(|a, b| b.failed_searches.cmp(&a.failed_searches));
    demand.truncate(limit);
    demand
}

/// Counts searches per requested travel date, ascending by date.
pub fn compute_searches_by_day(events: &[SearchEvent]) -> Vec<DailySearchCounts> {
    let mut days: BTreeMap<chrono::NaiveDate, (usize, usize, usize)> = BTreeMap::new();

    for e in events {
        let entry = days.entry(e.search_date).or_default();
        entry.0 += 1;
        if e.has_results {
            entry.1 += 1;
        }
        if e.did_convert {
            entry.2 += 1;
        }
    }

    days.into_iter()
        .map(
            |(search_date, (total_searches, with_results, converted))| DailySearchCounts {
                search_date,
                total_searches,
                with_results,
                converted,
            },
        )
        .collect()
}

/// Runs the full aggregation pass over one window's events.
///
/// Pure function of its input: no I/O, no shared state, and two calls on
/// the same batch yield identical sections.
pub fn analyze_window(events: &[SearchEvent], days: u32, limit: usize) -> SearchAnalytics {
    SearchAnalytics {
        generated_at: Utc::now(),
        window_days: days,
        kpis: compute_kpis(events),
        top_routes: compute_top_routes(events, limit),
        unsatisfied_demand: compute_unsatisfied_demand(events, limit),
        by_day: compute_searches_by_day(events),
    }
}

fn group_by_route<'a>(events: impl Iterator<Item = &'a SearchEvent>) -> Vec<RouteBucket> {
    let mut buckets: Vec<RouteBucket> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for e in events {
        let key = (e.origin_city.as_str(), e.dest_city.as_str());
        let i = match index.get(&key) {
            Some(&i) => i,
            None => {
                buckets.push(RouteBucket {
                    origin_city: e.origin_city.clone(),
                    dest_city: e.dest_city.clone(),
                    searches: 0,
                    with_results: 0,
                    converted: 0,
                    passengers_sum: 0.0,
                    last_created_at: e.created_at,
                });
                index.insert(key, buckets.len() - 1);
                buckets.len() - 1
            }
        };

        let bucket = &mut buckets[i];
        bucket.searches += 1;
        if e.has_results {
            bucket.with_results += 1;
        }
        if e.did_convert {
            bucket.converted += 1;
        }
        bucket.passengers_sum += e.passengers as f64;
        if e.created_at > bucket.last_created_at {
            bucket.last_created_at = e.created_at;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(
        id: &str,
        user_id: Option<&str>,
        origin: &str,
        dest: &str,
        passengers: u32,
        results_found: u32,
        did_convert: bool,
        created_at: &str,
    ) -> SearchEvent {
        let created_at: DateTime<Utc> = created_at.parse().unwrap();
        SearchEvent {
            id: id.to_string(),
            user_id: user_id.map(str::to_string),
            origin_city: origin.to_string(),
            origin_lat: -38.7196,
            origin_lng: -62.2724,
            origin_text: origin.to_string(),
            dest_city: dest.to_string(),
            dest_lat: -38.3772,
            dest_lng: -60.2798,
            dest_text: dest.to_string(),
            search_date: created_at.date_naive(),
            passengers,
            results_found,
            has_results: results_found > 0,
            converted_to_request_id: did_convert.then(|| format!("req-{id}")),
            did_convert,
            converted_at: did_convert.then(|| created_at),
            created_at,
        }
    }

    fn scenario_events() -> Vec<SearchEvent> {
        vec![
            event(
                "s1",
                Some("u1"),
                "Bahía Blanca",
                "Tres Arroyos",
                2,
                5,
                true,
                "2025-03-10T10:00:00Z",
            ),
            event(
                "s2",
                Some("u2"),
                "Bahía Blanca",
                "Tres Arroyos",
                1,
                3,
                false,
                "2025-03-11T10:00:00Z",
            ),
            event(
                "s3",
                None,
                "Bahía Blanca",
                "Necochea",
                3,
                0,
                false,
                "2025-03-11T12:00:00Z",
            ),
            event(
                "s4",
                Some("u1"),
                "Bahía Blanca",
                "Tres Arroyos",
                4,
                0,
                false,
                "2025-03-12T09:00:00Z",
            ),
        ]
    }

    #[test]
    fn test_kpis_empty_window() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis, KpiSummary::default());
    }

    #[test]
    fn test_kpis_scenario() {
        let kpis = compute_kpis(&scenario_events());

        assert_eq!(kpis.total_searches, 4);
        assert_eq!(kpis.searches_without_results, 2);
        assert_eq!(kpis.converted_searches, 1);
        // u1 searched twice, u2 once, one anonymous search
        assert_eq!(kpis.unique_users, 2);
        assert_eq!(kpis.without_results_rate, 50.0);
        assert_eq!(kpis.conversion_rate, 25.0);
    }

    #[test]
    fn test_kpis_all_anonymous() {
        let events = vec![
            event("a1", None, "A", "B", 1, 2, false, "2025-03-10T10:00:00Z"),
            event("a2", None, "A", "B", 1, 0, false, "2025-03-10T11:00:00Z"),
        ];

        let kpis = compute_kpis(&events);
        assert_eq!(kpis.unique_users, 0);
        assert_eq!(kpis.total_searches, 2);
    }

    #[test]
    fn test_kpi_rates_within_bounds() {
        let events = scenario_events();
        let kpis = compute_kpis(&events);

        assert!((0.0..=100.0).contains(&kpis.without_results_rate));
        assert!((0.0..=100.0).contains(&kpis.conversion_rate));
    }

    #[test]
    fn test_top_routes_scenario() {
        let routes = compute_top_routes(&scenario_events(), DEFAULT_LIMIT);

        assert_eq!(routes.len(), 2);

        let first = &routes[0];
        assert_eq!(first.origin_city, "Bahía Blanca");
        assert_eq!(first.dest_city, "Tres Arroyos");
        assert_eq!(first.search_count, 3);
        assert_eq!(first.results_rate, 66.67);
        assert_eq!(first.conversion_rate, 33.33);
        assert_eq!(first.avg_passengers, 2.3);

        let second = &routes[1];
        assert_eq!(second.dest_city, "Necochea");
        assert_eq!(second.search_count, 1);
        assert_eq!(second.results_rate, 0.0);
        assert_eq!(second.conversion_rate, 0.0);
    }

    #[test]
    fn test_top_routes_empty_input() {
        assert!(compute_top_routes(&[], DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_top_routes_counts_cover_all_events() {
        let events = scenario_events();
        let routes = compute_top_routes(&events, usize::MAX);

        let total: usize = routes.iter().map(|r| r.search_count).sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn test_top_routes_case_sensitive_grouping() {
        let events = vec![
            event("c1", None, "bahía blanca", "Necochea", 1, 1, false, "2025-03-10T10:00:00Z"),
            event("c2", None, "Bahía Blanca", "Necochea", 1, 1, false, "2025-03-10T11:00:00Z"),
        ];

        let routes = compute_top_routes(&events, DEFAULT_LIMIT);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_top_routes_stable_tie_break() {
        // Two routes with one search each: first-seen route sorts first
        let events = vec![
            event("t1", None, "Azul", "Olavarría", 1, 1, false, "2025-03-10T10:00:00Z"),
            event("t2", None, "Tandil", "Ayacucho", 1, 1, false, "2025-03-10T09:00:00Z"),
        ];

        let routes = compute_top_routes(&events, DEFAULT_LIMIT);
        assert_eq!(routes[0].origin_city, "Azul");
        assert_eq!(routes[1].origin_city, "Tandil");
    }

    #[test]
    fn test_top_routes_limit_truncates() {
        let mut events = Vec::new();
        for i in 0..15 {
            events.push(event(
                &format!("l{i}"),
                None,
                &format!("Origin {i}"),
                "Dest",
                1,
                1,
                false,
                "2025-03-10T10:00:00Z",
            ));
        }

        assert_eq!(compute_top_routes(&events, DEFAULT_LIMIT).len(), 10);
        assert_eq!(compute_top_routes(&events, 3).len(), 3);
    }

    #[test]
    fn test_unsatisfied_demand_scenario() {
        let demand = compute_unsatisfied_demand(&scenario_events(), DEFAULT_LIMIT);

        // Both routes have one failed search; the Necochea failure appears
        // earlier in the input so it sorts first
        assert_eq!(demand.len(), 2);
        assert_eq!(demand[0].dest_city, "Necochea");
        assert_eq!(demand[0].failed_searches, 1);
        assert_eq!(demand[0].avg_passengers, 3.0);
        assert_eq!(demand[1].dest_city, "Tres Arroyos");
        assert_eq!(demand[1].failed_searches, 1);
    }

    #[test]
    fn test_unsatisfied_demand_only_failed_groups() {
        let events = scenario_events();
        let demand = compute_unsatisfied_demand(&events, usize::MAX);

        let failed: usize = demand.iter().map(|d| d.failed_searches).sum();
        let expected = events.iter().filter(|e| !e.has_results).count();
        assert_eq!(failed, expected);
    }

    #[test]
    fn test_unsatisfied_demand_last_search_date_is_max() {
        // Newest failure first in the input; the max must still win
        let events = vec![
            event("d1", None, "A", "B", 1, 0, false, "2025-03-12T10:00:00Z"),
            event("d2", None, "A", "B", 1, 0, false, "2025-03-10T10:00:00Z"),
            event("d3", None, "A", "B", 1, 0, false, "2025-03-11T10:00:00Z"),
        ];

        let demand = compute_unsatisfied_demand(&events, DEFAULT_LIMIT);
        assert_eq!(demand.len(), 1);
        assert_eq!(
            demand[0].last_search_date,
            Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_searches_by_day_sorted_ascending() {
        let events = scenario_events();
        let by_day = compute_searches_by_day(&events);

        assert_eq!(by_day.len(), 3);
        assert!(by_day.windows(2).all(|w| w[0].search_date < w[1].search_date));

        // 2025-03-11 saw one search with results and one without
        assert_eq!(by_day[1].total_searches, 2);
        assert_eq!(by_day[1].with_results, 1);
        assert_eq!(by_day[1].converted, 0);
    }

    #[test]
    fn test_analyze_window_is_idempotent() {
        let events = scenario_events();
        let a = analyze_window(&events, 30, DEFAULT_LIMIT);
        let b = analyze_window(&events, 30, DEFAULT_LIMIT);

        assert_eq!(a.kpis, b.kpis);
        assert_eq!(a.top_routes, b.top_routes);
        assert_eq!(a.unsatisfied_demand, b.unsatisfied_demand);
        assert_eq!(a.by_day, b.by_day);
    }

    #[test]
    fn test_analyze_window_empty() {
        let report = analyze_window(&[], 7, DEFAULT_LIMIT);

        assert_eq!(report.window_days, 7);
        assert_eq!(report.kpis, KpiSummary::default());
        assert!(report.top_routes.is_empty());
        assert!(report.unsatisfied_demand.is_empty());
        assert!(report.by_day.is_empty());
    }
}
