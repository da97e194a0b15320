use glam::Vec3;
use scrollscene::scroll::{ScrollTrigger, ScrollTriggerConfig};
use scrollscene::sequence::{ScrollSequence, SequenceConfig, SequenceFrame};

fn sequence() -> ScrollSequence {
    ScrollSequence::build(&SequenceConfig::default()).unwrap()
}

fn frame_at_scroll(sequence: &ScrollSequence, trigger: &ScrollTrigger, scroll_y: f64) -> SequenceFrame {
    sequence.sample(trigger.progress(scroll_y), Vec3::ZERO)
}

#[test]
fn scrubbing_back_and_forth_reproduces_every_frame() {
    let sequence = sequence();
    let trigger = ScrollTrigger::new(ScrollTriggerConfig::default());

    let offsets: Vec<f64> = (0..=80).map(|i| f64::from(i) * 50.0).collect();
    let forward: Vec<_> = offsets
        .iter()
        .map(|&y| frame_at_scroll(&sequence, &trigger, y))
        .collect();

    // Jump around out of order, then scrub back down.
    for &y in [3900.0, 120.0, 2500.0, 0.0, 4000.0].iter() {
        frame_at_scroll(&sequence, &trigger, y);
    }
    for (i, &y) in offsets.iter().enumerate().rev() {
        assert_eq!(frame_at_scroll(&sequence, &trigger, y), forward[i], "scroll {y}");
    }
}

#[test]
fn camera_path_is_continuous() {
    let sequence = sequence();
    let steps = 2000;
    let mut previous = sequence.sample(0.0, Vec3::ZERO);
    for i in 1..=steps {
        let frame = sequence.sample(i as f32 / steps as f32, Vec3::ZERO);
        let jump = frame.camera_position.distance(previous.camera_position);
        assert!(jump < 1.0, "camera jumped {jump} at step {i}");
        for (now, before) in frame.panels.iter().zip(&previous.panels) {
            assert!((now.opacity - before.opacity).abs() < 0.05);
        }
        previous = frame;
    }
}

#[test]
fn scroll_outside_the_window_clamps() {
    let sequence = sequence();
    let trigger = ScrollTrigger::new(ScrollTriggerConfig {
        start_offset: 600.0,
        ..Default::default()
    });

    assert_eq!(frame_at_scroll(&sequence, &trigger, 0.0), frame_at_scroll(&sequence, &trigger, 600.0));
    assert_eq!(
        frame_at_scroll(&sequence, &trigger, 9000.0),
        frame_at_scroll(&sequence, &trigger, 4600.0)
    );
}

#[test]
fn each_panel_shows_once_in_order() {
    let sequence = sequence();
    let peaks: Vec<f32> = (0..4)
        .map(|panel| {
            (0..=650)
                .map(|i| i as f32 / 100.0)
                .max_by(|a, b| {
                    let oa = sequence.sample_at_time(*a, Vec3::ZERO).panels[panel].opacity;
                    let ob = sequence.sample_at_time(*b, Vec3::ZERO).panels[panel].opacity;
                    oa.total_cmp(&ob)
                })
                .unwrap()
        })
        .collect();

    for pair in peaks.windows(2) {
        assert!(pair[0] < pair[1], "panel peaks out of order: {peaks:?}");
    }
}
