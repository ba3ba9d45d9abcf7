//! Workstep Scenarios
//!
//! End-to-end runs of the worksteps against small projects built through
//! the public API.

use chrono::{TimeZone, Utc};
use well_worksteps::attributes::{AttributeRole, AttributeScope};
use well_worksteps::host::{CoordinateTransform, HostError, PromptKind, RecordingPrompt};
use well_worksteps::types::{
    HistoryEntry, Horizon, Marker, Surface, TrajectoryRecord, VerticalDomain, WellSymbol,
};
use well_worksteps::workflow::{flatten_wells, ArgumentError, WellError};
use well_worksteps::worksteps::*;
use well_worksteps::{
    execute, AttributeDescriptor, AttributeKind, AttributeValue, Project, Well, WellCollection,
    WellId, WorkstepContext, WorkstepError, WorkstepReport,
};

// ============================================================================
// Helpers
// ============================================================================

fn tag_attribute() -> AttributeDescriptor {
    AttributeDescriptor::new("Active", AttributeScope::Well, AttributeRole::Discrete, AttributeKind::Integer)
}

fn add_vertical(project: &mut Project, name: &str, x: f64, y: f64, kb: f64, tag: i32) -> WellId {
    let mut well = Well::new(name, x, y, kb);
    well.trajectory = vec![
        TrajectoryRecord { md: 0.0, x, y, tvd: 0.0 },
        TrajectoryRecord { md: 3000.0, x, y, tvd: 3000.0 },
    ];
    well.attributes.insert("Active".into(), AttributeValue::Integer(tag));
    project.add_well(well)
}

/// Three wells in a nested tree: A and B 50 ft apart, C (tag 0) between them.
fn three_well_project() -> Project {
    let mut p = Project::new("Scenario");
    p.well_attributes.push(tag_attribute());
    let a = add_vertical(&mut p, "A", 0.0, 0.0, 80.0, 1);
    let c = add_vertical(&mut p, "C", 25.0, 0.0, 75.0, 0);
    let b = add_vertical(&mut p, "B", 50.0, 0.0, 70.0, 3);
    p.root = WellCollection::new("Wells")
        .with_wells([a])
        .with_collection(
            WellCollection::new("Pad 1")
                .with_wells([c])
                .with_collection(WellCollection::new("Sidetracks").with_wells([b])),
        );
    p
}

fn root() -> Option<String> {
    Some(String::new())
}

fn kb_shift_to_surface(project: &mut Project, surface: Surface) -> WorkstepReport<KbShiftResult> {
    project.horizons.push(
        Horizon::new("Top")
            .with_marker(Marker::new(WellId(0), 1000.0))
            .with_marker(Marker::new(WellId(2), 1100.0)),
    );
    let name = surface.name.clone();
    project.surfaces.push(surface);

    let mut prompt = RecordingPrompt::default();
    let mut ctx = WorkstepContext::new(project, &mut prompt);
    execute(
        &KbShift::new(KbShiftArgs {
            collection: root(),
            horizon: Some("Top".into()),
            surface: Some(name),
            ..Default::default()
        }),
        &mut ctx,
    )
    .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn filtered_well_is_excluded_from_close_pairs() {
    let mut p = three_well_project();
    let mut prompt = RecordingPrompt::default();
    let step = InterwellDistance::new(InterwellDistanceArgs {
        collection: root(),
        threshold: Some(100.0),
        filter: Some("Active".into()),
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(&step, &mut ctx).unwrap();

    let pairs: Vec<_> = report.successes().map(|(_, pair)| pair.clone()).collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].first_name.as_str(), pairs[0].second_name.as_str()), ("A", "B"));
    assert!((pairs[0].distance - 50.0).abs() < 1e-9);
    assert_eq!(report.failure_count(), 0);
}

#[test]
fn unfiltered_scan_never_pairs_a_well_with_itself() {
    let mut p = three_well_project();
    let mut prompt = RecordingPrompt::default();
    let step = InterwellDistance::new(InterwellDistanceArgs {
        collection: root(),
        threshold: Some(100.0),
        filter: None,
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(&step, &mut ctx).unwrap();

    let pairs: Vec<_> = report.successes().map(|(_, p)| (p.first, p.second)).collect();
    assert_eq!(pairs.len(), 3);
    for (i, (a, b)) in pairs.iter().enumerate() {
        assert_ne!(a, b);
        assert!(!pairs[i + 1..].iter().any(|(x, y)| (x, y) == (a, b) || (x, y) == (b, a)));
    }
}

#[test]
fn flatten_visits_parents_before_children() {
    let p = three_well_project();
    let names: Vec<_> = flatten_wells(&p.root)
        .into_iter()
        .map(|id| p.well_name(id).to_string())
        .collect();
    assert_eq!(names, vec!["A", "C", "B"]);
}

#[test]
fn zero_wells_reports_no_wells_and_changes_nothing() {
    let mut p = three_well_project();
    p.root.collections.push(WellCollection::new("Empty pad"));
    p.horizons.push(Horizon::new("Top").with_marker(Marker::new(WellId(0), 1000.0)));
    let before = p.clone();

    let mut prompt = RecordingPrompt::default();
    let step = KbShift::new(KbShiftArgs {
        collection: Some("Empty pad".into()),
        horizon: Some("Top".into()),
        zflat: Some(-900.0),
        ..Default::default()
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let err = execute(&step, &mut ctx).unwrap_err();

    assert_eq!(err, WorkstepError::NoWells);
    assert_eq!(prompt.messages(PromptKind::Warning), vec!["Wells not found"]);
    assert_eq!(p, before);
}

#[test]
fn kb_shift_puts_tops_on_the_plane() {
    let mut p = three_well_project();
    p.horizons.push(
        Horizon::new("Top")
            .with_marker(Marker::new(WellId(0), 1010.0))
            .with_marker(Marker::new(WellId(0), 1000.0))
            .with_marker(Marker::new(WellId(2), 1100.0)),
    );
    let mut prompt = RecordingPrompt::default();
    let step = KbShift::new(KbShiftArgs {
        collection: root(),
        horizon: Some("Top".into()),
        zflat: Some(-950.0),
        ..Default::default()
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(&step, &mut ctx).unwrap();
    assert_eq!(report.success_count(), 2);

    for (well, md) in [(WellId(0), 1000.0), (WellId(2), 1100.0)] {
        let z = p.point_at_md(well, md, VerticalDomain::Elevation).unwrap().z;
        assert!((z + 950.0).abs() < 1e-9, "{} top at {z}", p.well_name(well));
    }
    // C has no top and keeps its KB
    assert_eq!(p.wells[1].kelly_bushing, 75.0);
}

#[test]
fn history_returns_latest_matching_entry() {
    let mut p = three_well_project();
    let at = |s: i64| Utc.timestamp_opt(s, 0).unwrap();
    p.wells[0].history = vec![
        HistoryEntry::new("user1", "act1", at(1), "a"),
        HistoryEntry::new("user1", "act1", at(5), "b"),
        HistoryEntry::new("user2", "act1", at(9), "c"),
    ];

    let mut prompt = RecordingPrompt::default();
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let found = execute(
        &FindUserHistory::new(FindUserHistoryArgs {
            collection: root(),
            user: "user1".into(),
            action: "act1".into(),
        }),
        &mut ctx,
    )
    .unwrap();
    let hits: Vec<_> = found.successes().collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "A");
    assert_eq!(hits[0].1.began, at(5));
    assert_eq!(hits[0].1.arguments, "b");

    let none = execute(
        &FindUserHistory::new(FindUserHistoryArgs {
            collection: root(),
            user: "user1".into(),
            action: "act2".into(),
        }),
        &mut ctx,
    )
    .unwrap();
    assert_eq!(none.success_count(), 0);
}

#[test]
fn copy_attributes_then_set_color() {
    let mut p = three_well_project();
    p.horizons.push(
        Horizon::new("Top")
            .with_marker(Marker::new(WellId(0), 1000.0))
            .with_marker(Marker::new(WellId(2), 1100.0)),
    );
    p.wells[2].presentation.symbol = WellSymbol { id: 4, name: "Injector".into() };

    let mut prompt = RecordingPrompt::default();
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    execute(
        &CopyAttributes::new(CopyAttributesArgs {
            collection: root(),
            attribute: Some("Active".into()),
            horizon: Some("Top".into()),
            filter: None,
        }),
        &mut ctx,
    )
    .unwrap();
    execute(
        &SetPresentation::new(SetPresentationArgs {
            collection: root(),
            reference: Some("B".into()),
            set_color: Some(false),
            set_symbol: None,
            filter: Some("Active".into()),
        }),
        &mut ctx,
    )
    .unwrap();

    let created = p.marker_attribute("Active").unwrap();
    assert_eq!(created.kind, AttributeKind::Integer);
    assert_eq!(
        p.horizons[0].markers[1].attributes.get("Active"),
        Some(&AttributeValue::Integer(3))
    );
    assert_eq!(p.wells[0].presentation.symbol.id, 4);
    assert_eq!(p.wells[1].presentation.symbol.id, 0);
}

#[test]
fn continuous_filter_is_a_configuration_error() {
    let mut p = three_well_project();
    p.well_attributes.push(AttributeDescriptor::new(
        "Net pay",
        AttributeScope::Well,
        AttributeRole::Continuous,
        AttributeKind::Real,
    ));
    let before = p.clone();
    let mut prompt = RecordingPrompt::default();
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let err = execute(
        &SetPresentation::new(SetPresentationArgs {
            collection: root(),
            reference: Some("A".into()),
            filter: Some("Net pay".into()),
            ..Default::default()
        }),
        &mut ctx,
    )
    .unwrap_err();
    assert_eq!(
        err,
        WorkstepError::Argument(ArgumentError::FilterNotDiscrete("Net pay".into()))
    );
    assert_eq!(p, before);
}

// ============================================================================
// Per-Well Failures
// ============================================================================

#[test]
fn well_without_bottom_point_is_left_out_of_pairing() {
    let mut p = three_well_project();
    p.wells[1].trajectory = vec![TrajectoryRecord { md: -10.0, x: 25.0, y: 0.0, tvd: 0.0 }];
    let mut prompt = RecordingPrompt::default();
    let step = InterwellDistance::new(InterwellDistanceArgs {
        collection: root(),
        threshold: Some(100.0),
        filter: None,
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(&step, &mut ctx).unwrap();

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "C");
    assert!(matches!(
        failures[0].1,
        WellError::Host(HostError::OutsideTrajectory { .. })
    ));

    let pairs: Vec<_> = report
        .successes()
        .map(|(_, pair)| (pair.first_name.as_str(), pair.second_name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("A", "B")]);
    assert!(!report.changed);
}

#[test]
fn kb_shift_continues_past_a_top_below_the_trajectory() {
    let mut p = three_well_project();
    p.horizons.push(
        Horizon::new("Top")
            .with_marker(Marker::new(WellId(0), 5000.0))
            .with_marker(Marker::new(WellId(2), 1100.0)),
    );
    let mut prompt = RecordingPrompt::default();
    let step = KbShift::new(KbShiftArgs {
        collection: root(),
        horizon: Some("Top".into()),
        zflat: Some(-950.0),
        ..Default::default()
    });
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(&step, &mut ctx).unwrap();

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "A");
    assert!(matches!(
        failures[0].1,
        WellError::Host(HostError::OutsideTrajectory { .. })
    ));
    assert_eq!(report.success_count(), 1);
    assert!(report.changed);

    // A keeps its KB, B lands on the plane
    assert_eq!(p.wells[0].kelly_bushing, 80.0);
    let z = p.point_at_md(WellId(2), 1100.0, VerticalDomain::Elevation).unwrap().z;
    assert!((z + 950.0).abs() < 1e-9);
}

#[test]
fn kb_shift_malformed_surface_fails_every_well() {
    let mut p = three_well_project();
    let mut surface = Surface::flat("Broken", VerticalDomain::Tvdss, (-100.0, -100.0), 100.0, (3, 3), 900.0);
    surface.z.pop();
    let before: Vec<f64> = p.wells.iter().map(|w| w.kelly_bushing).collect();

    let report = kb_shift_to_surface(&mut p, surface);

    let failed: Vec<_> = report.failures().map(|(well, _)| well).collect();
    assert_eq!(failed, vec!["A", "B"]);
    assert!(report
        .failures()
        .all(|(_, e)| *e == WellError::Host(HostError::MalformedSurface("Broken".into()))));
    assert!(!report.changed);
    let after: Vec<f64> = p.wells.iter().map(|w| w.kelly_bushing).collect();
    assert_eq!(after, before);
}

#[test]
fn kb_shift_measured_depth_surface_fails_every_well() {
    let mut p = three_well_project();
    let surface = Surface::flat("MD picks", VerticalDomain::MeasuredDepth, (-100.0, -100.0), 100.0, (3, 3), 1050.0);
    let before: Vec<f64> = p.wells.iter().map(|w| w.kelly_bushing).collect();

    let report = kb_shift_to_surface(&mut p, surface);

    assert_eq!(report.success_count(), 0);
    assert_eq!(report.failure_count(), 2);
    for (_, e) in report.failures() {
        assert_eq!(
            *e,
            WellError::Host(HostError::UnsupportedConversion {
                from: VerticalDomain::Elevation,
                to: VerticalDomain::MeasuredDepth,
            })
        );
    }
    let after: Vec<f64> = p.wells.iter().map(|w| w.kelly_bushing).collect();
    assert_eq!(after, before);
}

// ============================================================================
// Change Tracking
// ============================================================================

#[test]
fn created_marker_attribute_counts_as_a_change() {
    let mut p = three_well_project();
    // Only C has a top, and C is filtered out
    p.horizons.push(Horizon::new("Top").with_marker(Marker::new(WellId(1), 1000.0)));
    let mut prompt = RecordingPrompt::default();
    let mut ctx = WorkstepContext::new(&mut p, &mut prompt);
    let report = execute(
        &CopyAttributes::new(CopyAttributesArgs {
            collection: root(),
            attribute: Some("Active".into()),
            horizon: Some("Top".into()),
            filter: Some("Active".into()),
        }),
        &mut ctx,
    )
    .unwrap();

    assert_eq!(report.success_count(), 0);
    assert!(report.changed);
    assert!(p.marker_attribute("Active").is_some());
}
