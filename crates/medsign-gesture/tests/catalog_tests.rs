use medsign_gesture::{GestureCatalog, GestureDefinition, GestureError, GestureKind, Priority};

fn entries() -> Vec<(GestureKind, GestureDefinition)> {
    GestureKind::ALL
        .into_iter()
        .map(|kind| (kind, GestureDefinition::new(Priority::Low, 1, "test", 0.5)))
        .collect()
}

#[test]
fn test_medical_catalog_covers_every_gesture() {
    let catalog = GestureCatalog::medical();
    assert_eq!(catalog.len(), GestureKind::ALL.len());
    for kind in GestureKind::ALL {
        let def = catalog.definition(kind);
        assert!(def.urgency_score <= 10);
        assert!((0.0..=1.0).contains(&def.confidence_threshold));
        assert!(!def.description.is_empty());
    }
}

#[test]
fn test_medical_table_values() {
    let catalog = GestureCatalog::medical();
    assert_eq!(catalog.priority(GestureKind::Emergency), Priority::Critical);
    assert_eq!(catalog.urgency_score(GestureKind::Emergency), 10);
    assert!((catalog.threshold(GestureKind::Emergency) - 0.8).abs() < 1e-9);

    assert_eq!(catalog.priority(GestureKind::Help), Priority::Critical);
    assert_eq!(catalog.urgency_score(GestureKind::Help), 9);
    assert_eq!(catalog.priority(GestureKind::Pain), Priority::High);
    assert_eq!(catalog.priority(GestureKind::Medicine), Priority::High);
    assert_eq!(catalog.priority(GestureKind::Water), Priority::Medium);
    assert_eq!(catalog.priority(GestureKind::Yes), Priority::Low);
    assert_eq!(catalog.priority(GestureKind::No), Priority::Low);
    assert_eq!(catalog.definition(GestureKind::No).description, "Point downward");
}

#[test]
fn test_priority_order() {
    assert!(Priority::Low < Priority::Medium);
    assert!(Priority::Medium < Priority::High);
    assert!(Priority::High < Priority::Critical);
}

#[test]
fn test_urgency_follows_priority() {
    let catalog = GestureCatalog::medical();
    for a in GestureKind::ALL {
        for b in GestureKind::ALL {
            if catalog.priority(a) > catalog.priority(b) {
                assert!(catalog.urgency_score(a) > catalog.urgency_score(b), "{a} vs {b}");
            }
        }
    }
}

#[test]
fn test_gesture_labels_round_trip() {
    for kind in GestureKind::ALL {
        assert_eq!(kind.to_string().parse::<GestureKind>(), Ok(kind));
    }
    assert!("wave".parse::<GestureKind>().is_err());
    assert_eq!(Priority::Critical.to_string(), "critical");
}

#[test]
fn test_new_accepts_complete_table() {
    let catalog = GestureCatalog::new(entries()).unwrap();
    assert_eq!(catalog.urgency_score(GestureKind::Water), 1);
}

#[test]
fn test_new_rejects_missing_gesture() {
    let partial: Vec<_> = entries()
        .into_iter()
        .filter(|(kind, _)| *kind != GestureKind::Water)
        .collect();
    match GestureCatalog::new(partial) {
        Err(GestureError::Catalog(msg)) => assert!(msg.contains("water")),
        other => panic!("expected catalog error, got {other:?}"),
    }
}

#[test]
fn test_new_rejects_out_of_range_values() {
    let mut bad_urgency = entries();
    bad_urgency[0].1.urgency_score = 11;
    assert!(GestureCatalog::new(bad_urgency).is_err());

    let mut bad_threshold = entries();
    bad_threshold[2].1.confidence_threshold = 1.5;
    assert!(GestureCatalog::new(bad_threshold).is_err());
}
