use hansard_cloud::{
    layout, overlaps, ExportRenderer, LayoutOutcome, LayoutProfile, PlacedWord, WordItem,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn assert_valid(outcome: &LayoutOutcome, profile: &LayoutProfile) {
    let placed = &outcome.placed;
    for (i, p) in placed.iter().enumerate() {
        assert!(
            profile.contains(&p.bounds()),
            "{} escapes the profile shape: {:?}",
            p.text,
            p.bounds()
        );
        for q in &placed[i + 1..] {
            assert!(
                !overlaps(&p.bounds(), &q.bounds(), 0.0),
                "{} overlaps {}",
                p.text,
                q.text
            );
        }
    }
    for pair in placed.windows(2) {
        assert!(pair[0].value >= pair[1].value);
        assert!(pair[0].font_size >= pair[1].font_size);
    }
}

fn find<'a>(outcome: &'a LayoutOutcome, text: &str) -> &'a PlacedWord {
    outcome
        .placed
        .iter()
        .find(|w| w.text == text)
        .unwrap_or_else(|| panic!("{text} was not placed"))
}

fn distance_from_center(word: &PlacedWord, profile: &LayoutProfile) -> f32 {
    let (x, y) = word.center();
    (x - profile.center_x).hypot(y - profile.center_y)
}

const SPEECH: [(&str, f32); 16] = [
    ("nhs", 100.0),
    ("tax", 90.0),
    ("economy", 80.0),
    ("housing", 70.0),
    ("schools", 60.0),
    ("energy", 50.0),
    ("police", 40.0),
    ("growth", 30.0),
    ("farmers", 25.0),
    ("trade", 20.0),
    ("defence", 15.0),
    ("water", 10.0),
    ("rail", 6.0),
    ("bus", 4.0),
    ("pensions", 2.0),
    ("road", 1.0),
];

fn speech_items() -> Vec<WordItem> {
    SPEECH
        .iter()
        .map(|&(text, value)| WordItem::new(text, value))
        .collect()
}

#[test]
fn small_exact_set() {
    let items = vec![
        WordItem::new("economy", 50.0),
        WordItem::new("tax", 30.0),
        WordItem::new("nhs", 10.0),
    ];
    let profile = LayoutProfile::interactive(1000.0, 800.0);
    assert_eq!(profile.padding, 32.0);

    for seed in 0..10 {
        let outcome = layout(&items, &profile, &mut rng(seed)).unwrap();
        assert_eq!(outcome.placed.len(), 3, "seed {seed}");
        assert_eq!(outcome.dropped, 0);

        let economy = find(&outcome, "economy").font_size;
        let tax = find(&outcome, "tax").font_size;
        let nhs = find(&outcome, "nhs").font_size;
        assert!(economy > tax && tax > nhs);

        for word in &outcome.placed {
            assert!(word.x >= 32.0 && word.x + word.width <= 968.0);
            assert!(word.y >= 32.0 && word.y + word.height <= 768.0);
        }
        assert_valid(&outcome, &profile);
    }
}

#[test]
fn forced_overflow_places_a_valid_subset() {
    let items: Vec<WordItem> = (0..500).map(|i| WordItem::new(format!("w{i}"), 5.0)).collect();
    let profile = LayoutProfile::interactive(200.0, 200.0);

    let outcome = layout(&items, &profile, &mut rng(1)).unwrap();
    assert!(outcome.placed.len() < 500);
    assert_eq!(outcome.placed.len() + outcome.dropped, 500);
    assert_valid(&outcome, &profile);
}

#[test]
fn empty_input_is_empty_output() {
    for profile in [
        LayoutProfile::interactive(1000.0, 800.0),
        ExportRenderer::default().profile(),
    ] {
        let outcome = layout(&[], &profile, &mut rng(3)).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.dropped, 0);
    }
}

#[test]
fn repeated_layouts_are_each_valid() {
    let items = speech_items();
    let profile = LayoutProfile::interactive(1000.0, 800.0);
    for seed in [11, 12] {
        let outcome = layout(&items, &profile, &mut rng(seed)).unwrap();
        assert!(!outcome.is_empty());
        assert_valid(&outcome, &profile);
    }
}

#[test]
fn same_seed_reproduces_layout() {
    let items = speech_items();
    let profile = LayoutProfile::interactive(1000.0, 800.0);
    let a = layout(&items, &profile, &mut rng(99)).unwrap();
    let b = layout(&items, &profile, &mut rng(99)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn frequent_words_sit_nearer_the_centre() {
    let items = speech_items();
    let profile = LayoutProfile::interactive(1000.0, 800.0);

    let (mut top, mut bottom, mut runs) = (0.0, 0.0, 0);
    for seed in 0..20 {
        let outcome = layout(&items, &profile, &mut rng(seed)).unwrap();
        let placed_top = outcome.placed.iter().find(|w| w.text == "nhs");
        let placed_bottom = outcome.placed.iter().find(|w| w.text == "road");
        if let (Some(t), Some(b)) = (placed_top, placed_bottom) {
            top += distance_from_center(t, &profile);
            bottom += distance_from_center(b, &profile);
            runs += 1;
        }
    }
    assert!(runs > 0);
    assert!(top / runs as f32 <= bottom / runs as f32);
}

#[test]
fn export_layout_stays_inside_the_ellipse() {
    let renderer = ExportRenderer::default();
    let profile = renderer.profile();
    let outcome = renderer.layout(&speech_items(), &mut rng(5)).unwrap();
    assert!(!outcome.is_empty());
    assert_valid(&outcome, &profile);

    // top size scales with canvas width
    let nhs = find(&outcome, "nhs");
    assert!((nhs.font_size - 256.0).abs() <= 1.0);
}

#[test]
fn spiral_starts_from_custom_centre() {
    let profile = LayoutProfile::interactive(1000.0, 800.0).with_center(300.0, 250.0);
    let items = [WordItem::new("economy", 50.0), WordItem::new("nhs", 10.0)];
    let outcome = layout(&items, &profile, &mut rng(8)).unwrap();
    let (cx, cy) = find(&outcome, "economy").center();
    assert!((cx - 300.0).abs() < 1e-3);
    assert!((cy - 250.0).abs() < 1e-3);
    assert_valid(&outcome, &profile);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_any_layout_is_valid(
        values in prop::collection::vec(1u32..500, 0..40),
        width in 300.0f32..1400.0,
        height in 300.0f32..1000.0,
        seed in any::<u64>(),
    ) {
        let items: Vec<WordItem> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| WordItem::new(format!("word{i}"), v as f32))
            .collect();
        let profile = LayoutProfile::interactive(width, height).with_max_attempts(400);
        let outcome = layout(&items, &profile, &mut rng(seed)).unwrap();

        prop_assert_eq!(outcome.placed.len() + outcome.dropped, items.len());
        for (i, p) in outcome.placed.iter().enumerate() {
            prop_assert!(profile.contains(&p.bounds()));
            for q in &outcome.placed[i + 1..] {
                prop_assert!(!overlaps(&p.bounds(), &q.bounds(), 0.0));
            }
        }
        for pair in outcome.placed.windows(2) {
            if pair[0].value > pair[1].value {
                prop_assert!(pair[0].font_size >= pair[1].font_size);
            }
        }
    }
}
