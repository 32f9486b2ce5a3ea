mod common;

use common::{fire_timer, manager, Call};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use trolley_core::{plan_overlay, Clip, Progress};

#[test]
fn starting_twice_matches_starting_once() {
    let mut once = manager(11);
    once.start();
    let mut twice = manager(11);
    twice.start();
    twice.start();
    assert_eq!(once.backend().calls, twice.backend().calls);
    assert!(twice.is_playing());
}

#[test]
fn start_runs_one_background_loop_and_one_timer() {
    let mut m = manager(1);
    m.start();
    let b = m.backend();
    assert_eq!(b.count(&Call::StartLoop(Clip::Rumble)), 1);
    assert_eq!(b.live(Clip::Rumble), 1);
    assert_eq!(b.pending_timers.len(), 1);
    assert_eq!(b.calls.first(), Some(&Call::Resume));
}

#[test]
fn set_progress_never_starts_playback() {
    let mut m = manager(2);
    m.set_progress(Progress::new(90.0));
    m.set_progress(Progress::new(10.0));
    assert!(m.backend().calls.is_empty());
    assert!(!m.is_playing());
}

#[test]
fn stop_tears_down_and_suspends_once() {
    let mut m = manager(3);
    m.start();
    m.stop();
    m.stop();
    let b = m.backend();
    assert_eq!(b.live(Clip::Rumble), 0);
    assert!(b.pending_timers.is_empty());
    assert_eq!(b.count(&Call::Suspend), 1);
    assert_eq!(b.count(&Call::Cancel), 1);
    assert!(!m.is_playing());
}

#[test]
fn restart_cycles_never_overlap_background_loops() {
    let mut m = manager(4);
    for _ in 0..20 {
        m.start();
        m.start();
        assert_eq!(m.backend().live(Clip::Rumble), 1);
        assert!(m.backend().pending_timers.len() <= 1);
        m.stop();
        assert_eq!(m.backend().live(Clip::Rumble), 0);
    }
}

#[test]
fn overlay_timer_keeps_a_single_pending_pick() {
    let mut m = manager(5);
    m.set_progress(Progress::new(70.0));
    m.start();
    for _ in 0..50 {
        assert!(fire_timer(&mut m));
        assert_eq!(m.backend().pending_timers.len(), 1);
    }
    let played = m.backend().played();
    assert!(!played.is_empty());
    assert!(played
        .iter()
        .all(|c| Clip::DISTRESS.contains(c) || *c == Clip::OCCASIONAL));
}

#[test]
fn stale_timer_after_stop_does_nothing() {
    let mut m = manager(6);
    m.start();
    m.stop();
    let before = m.backend().calls.len();
    m.on_overlay_timer();
    assert_eq!(m.backend().calls.len(), before);
}

#[test]
fn calm_swaps_distress_for_happy_loop() {
    let mut m = manager(7);
    m.start();
    m.calm();
    m.calm();
    let b = m.backend();
    assert_eq!(b.live(Clip::Rumble), 0);
    assert_eq!(b.live(Clip::Happy), 1);
    assert_eq!(b.count(&Call::StartLoop(Clip::Happy)), 1);
    assert!(m.is_calm());
    assert!(!m.is_playing());

    m.start();
    assert_eq!(m.backend().live(Clip::Happy), 0);
    assert_eq!(m.backend().live(Clip::Rumble), 1);
}

#[test]
fn calm_never_suspends_the_context_it_plays_through() {
    let mut m = manager(13);
    m.start();
    let from = m.backend().calls.len();
    m.calm();
    let calls = &m.backend().calls[from..];
    assert!(!calls.contains(&Call::Suspend), "{calls:?}");
    let resume = calls.iter().position(|c| *c == Call::Resume).unwrap();
    let happy = calls
        .iter()
        .position(|c| *c == Call::StartLoop(Clip::Happy))
        .unwrap();
    assert!(resume < happy);
    assert!(calls.contains(&Call::StopLoop(Clip::Rumble)));
    assert!(m.backend().pending_timers.is_empty());
}

#[test]
fn blocked_playback_is_retried_once_after_resume() {
    let mut m = manager(8);
    m.backend_mut().block_plays = 1;
    m.finish();
    let b = m.backend();
    assert_eq!(b.count(&Call::PlayOnce(Clip::Crash)), 2);
    let tail = &b.calls[b.calls.len() - 3..];
    assert_eq!(
        tail,
        &[
            Call::PlayOnce(Clip::Crash),
            Call::Resume,
            Call::PlayOnce(Clip::Crash)
        ]
    );

    let mut stubborn = manager(8);
    stubborn.backend_mut().block_plays = 5;
    stubborn.finish();
    assert_eq!(stubborn.backend().count(&Call::PlayOnce(Clip::Crash)), 2);
}

#[test]
fn finish_plays_terminal_once_and_latches() {
    let mut m = manager(9);
    m.start();
    m.calm();
    m.finish();
    m.finish();
    let after = m.backend().calls.len();
    m.start();
    m.calm();
    m.on_overlay_timer();
    let b = m.backend();
    assert_eq!(b.calls.len(), after);
    assert_eq!(b.count(&Call::PlayOnce(Clip::Crash)), 1);
    assert!(b.live_loops.is_empty());
    assert!(b.pending_timers.is_empty());
    assert!(m.is_finished());
}

#[test]
fn plans_above_midpoint_are_frequent_and_distressed() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut fired = 0;
    for _ in 0..2000 {
        let plan = plan_overlay(Progress::new(75.0), &mut rng);
        assert!(plan.next_in >= Duration::from_millis(250));
        assert!(plan.next_in <= Duration::from_millis(1150));
        if let Some((clip, voice)) = plan.clip {
            fired += 1;
            assert!(Clip::DISTRESS.contains(&clip) || clip == Clip::OCCASIONAL);
            assert!((1.0..=1.8).contains(&voice.rate));
            assert!((-0.9..=0.9).contains(&voice.pan));
            assert!((0.7..=1.0).contains(&voice.gain));
        }
    }
    assert!(fired > 1500, "fired {fired}");
}

#[test]
fn plans_below_midpoint_are_rare_and_occasional() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut fired = 0;
    for p in [0.0, 25.0, 50.0] {
        for _ in 0..1000 {
            let plan = plan_overlay(Progress::new(p), &mut rng);
            assert!(plan.next_in >= Duration::from_millis(1000));
            assert!(plan.next_in <= Duration::from_millis(4000));
            if let Some((clip, _)) = plan.clip {
                fired += 1;
                assert_eq!(clip, Clip::ChooChoo);
            }
        }
    }
    assert!(fired > 0 && fired < 1500, "fired {fired}");
}
