//! Shared test project

use crate::attributes::{
    AttributeDescriptor, AttributeKind, AttributeRole, AttributeScope, AttributeValue,
};
use crate::host::Project;
use crate::types::{
    Color, HistoryEntry, Horizon, Marker, Surface, TrajectoryRecord, VerticalDomain, Well,
    WellCollection, WellId, WellSymbol,
};
use chrono::{TimeZone, Utc};

pub(crate) const W1: WellId = WellId(0);
pub(crate) const W2: WellId = WellId(1);
pub(crate) const W3: WellId = WellId(2);
pub(crate) const W4: WellId = WellId(3);

fn vertical(x: f64, y: f64, depth: f64) -> Vec<TrajectoryRecord> {
    vec![
        TrajectoryRecord { md: 0.0, x, y, tvd: 0.0 },
        TrajectoryRecord { md: depth, x, y, tvd: depth },
    ]
}

fn well(name: &str, x: f64, y: f64, kb: f64, depth: f64, tag: Option<i32>) -> Well {
    let mut w = Well::new(name, x, y, kb);
    w.trajectory = vertical(x, y, depth);
    if let Some(tag) = tag {
        w.attributes.insert("Use".into(), AttributeValue::Integer(tag));
    }
    w
}

/// Four vertical wells:
///
/// | well | head      | KB | tag | tops on "Top"  |
/// |------|-----------|----|-----|----------------|
/// | W-1  | (0, 0)    | 30 | 1   | 1520, 1500     |
/// | W-2  | (50, 0)   | 25 | 1   | 1400           |
/// | W-3  | (1000, 0) | 20 | 0   | 1450           |
/// | W-4  | (0, 40)   | 10 | 1   | none           |
///
/// Tree: root holds W-1, `North` holds W-2 and W-3, `South` holds W-4.
pub(crate) fn field_project() -> Project {
    let mut p = Project::new("Field");
    p.add_well(well("W-1", 0.0, 0.0, 30.0, 2000.0, Some(1)));
    p.add_well(well("W-2", 50.0, 0.0, 25.0, 2000.0, Some(1)));
    p.add_well(well("W-3", 1000.0, 0.0, 20.0, 2000.0, Some(0)));
    p.add_well(well("W-4", 0.0, 40.0, 10.0, 1800.0, Some(1)));

    p.root = WellCollection::new("Wells")
        .with_wells([W1])
        .with_collection(WellCollection::new("North").with_wells([W2, W3]))
        .with_collection(WellCollection::new("South").with_wells([W4]));

    p.horizons.push(
        Horizon::new("Top")
            .with_marker(Marker::new(W1, 1520.0))
            .with_marker(Marker::new(W2, 1400.0))
            .with_marker(Marker::new(W1, 1500.0))
            .with_marker(Marker::new(W3, 1450.0)),
    );
    p.horizons.push(Horizon::new("Base"));

    p.surfaces.push(Surface::flat(
        "Top surface",
        VerticalDomain::Tvdss,
        (-100.0, -100.0),
        100.0,
        (20, 5),
        1450.0,
    ));

    p.well_attributes = vec![
        AttributeDescriptor::new("Use", AttributeScope::Well, AttributeRole::Discrete, AttributeKind::Integer),
        AttributeDescriptor::new("Porosity", AttributeScope::Well, AttributeRole::Continuous, AttributeKind::Real)
            .with_template("Porosity"),
        AttributeDescriptor::new("Zone", AttributeScope::Well, AttributeRole::Discrete, AttributeKind::Text),
        AttributeDescriptor::new("Facies", AttributeScope::Well, AttributeRole::Discrete, AttributeKind::Text),
    ];
    p.marker_attributes = vec![AttributeDescriptor::new(
        "Facies",
        AttributeScope::Marker,
        AttributeRole::Discrete,
        AttributeKind::Integer,
    )];

    p.wells[0].attributes.insert("Porosity".into(), AttributeValue::Real(0.21));
    p.wells[2].attributes.insert("Porosity".into(), AttributeValue::Real(0.18));
    p.wells[0].attributes.insert("Zone".into(), AttributeValue::Text("Z2".into()));
    p.wells[0].attributes.insert("Facies".into(), AttributeValue::Text(" 3 ".into()));
    p.wells[1].attributes.insert("Facies".into(), AttributeValue::Text("sand".into()));

    p.wells[0].presentation.color = Color::rgb(0xff, 0x80, 0x00);
    p.wells[0].presentation.symbol = WellSymbol { id: 7, name: "Oil producer".into() };

    let at = |h: u32| Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap();
    p.wells[1].history = vec![
        HistoryEntry::new("anna", "Edit KB", at(1), "a"),
        HistoryEntry::new("anna", "Edit KB", at(5), "b"),
        HistoryEntry::new("boris", "Edit KB", at(9), "c"),
    ];
    p.wells[3].history = vec![HistoryEntry::new("anna", "Edit KB", at(2), "d")];

    p
}
