use glam::Vec2;
use trolley_core::{clamp, Progress, TrackLayout};

fn layout(dx: f32, dy: f32, sx: f32, sy: f32) -> TrackLayout {
    TrackLayout {
        direction: Vec2::new(dx, dy),
        start: Vec2::new(sx, sy),
    }
}

#[test]
fn clamp_keeps_any_progress_in_range() {
    let mut v = -250.0_f32;
    while v <= 250.0 {
        let c = clamp(0.0, v, 100.0);
        assert!((0.0..=100.0).contains(&c));
        assert!((0.0..=100.0).contains(&Progress::new(v).value()));
        v += 0.37;
    }
}

#[test]
fn default_layout_matches_reference_positions() {
    let l = TrackLayout::default();
    let element = Vec2::new(200.0, 150.0);
    let viewport = Vec2::new(1000.0, 800.0);
    assert_eq!(l.position(Progress::ZERO, element, viewport), Vec2::new(0.0, 50.0));
    assert_eq!(
        l.position(Progress::new(50.0), element, viewport),
        Vec2::new(400.0, 245.0)
    );
    assert_eq!(
        l.position(Progress::FULL, element, viewport),
        Vec2::new(800.0, 440.0)
    );
}

#[test]
fn negative_direction_travels_back_towards_origin() {
    let l = layout(-1.0, -0.5, 300.0, 200.0);
    let p = l.position(Progress::FULL, Vec2::new(50.0, 50.0), Vec2::new(1000.0, 800.0));
    assert_eq!(p, Vec2::new(0.0, 100.0));
}

#[test]
fn output_never_leaves_the_viewport() {
    let directions = [-1.0, -0.65, 0.0, 0.3, 0.65, 1.0];
    let starts = [0.0, 50.0, 400.0, 2000.0];
    let elements = [
        Vec2::new(0.0, 0.0),
        Vec2::new(120.0, 80.0),
        Vec2::new(900.0, 700.0),
        Vec2::new(1500.0, 1200.0),
    ];
    let viewports = [Vec2::new(320.0, 480.0), Vec2::new(1000.0, 800.0)];
    for &dx in &directions {
        for &dy in &directions {
            for &s in &starts {
                let l = layout(dx, dy, s, s);
                for &el in &elements {
                    for &vp in &viewports {
                        let limit = (vp - el).max(Vec2::ZERO);
                        for step in 0..=40 {
                            let p = Progress::new(step as f32 * 2.5);
                            let pos = l.position(p, el, vp);
                            assert!(
                                pos.x >= 0.0 && pos.y >= 0.0,
                                "negative {pos:?} for dir=({dx},{dy}) start={s} el={el:?} vp={vp:?}"
                            );
                            assert!(
                                pos.x <= limit.x && pos.y <= limit.y,
                                "{pos:?} beyond {limit:?} for dir=({dx},{dy}) start={s} el={el:?} vp={vp:?}"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn position_moves_monotonically_along_positive_direction() {
    let l = TrackLayout::default();
    let element = Vec2::new(120.0, 80.0);
    let viewport = Vec2::new(1280.0, 720.0);
    let mut prev = l.position(Progress::ZERO, element, viewport);
    for step in 1..=100 {
        let pos = l.position(Progress::new(step as f32), element, viewport);
        assert!(pos.x >= prev.x && pos.y >= prev.y);
        prev = pos;
    }
}
