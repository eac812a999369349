//! Tests for pan and zoom gestures.

use super::*;

fn modifiers(ctrl: bool, meta: bool, alt: bool, shift: bool) -> WheelModifiers {
    WheelModifiers {
        ctrl,
        meta,
        alt,
        shift,
    }
}

// ===== Wheel =====

mod wheel {
    use super::*;

    #[test]
    fn ctrl_wheel_zooms_at_pointer() {
        let tracker = PanTracker::new();
        let action = tracker.wheel(0.0, 50.0, modifiers(true, false, false, false), 250.0, 1_000.0, 1_000.0);
        assert_eq!(
            action,
            Some(ScrollAction::Zoom {
                scale: 2.0,
                anchor_ratio: 0.25
            })
        );
    }

    #[test]
    fn shift_wheel_scrolls_horizontally_by_delta_y() {
        let tracker = PanTracker::new();
        let action = tracker.wheel(7.0, 40.0, modifiers(false, false, false, true), 0.0, 1_000.0, 1_000.0);
        assert_eq!(action, Some(ScrollAction::ScrollTo(1_040.0)));
    }

    #[test]
    fn shift_wheel_falls_back_to_delta_x() {
        let tracker = PanTracker::new();
        let action = tracker.wheel(-30.0, 0.0, modifiers(false, false, false, true), 0.0, 1_000.0, 1_000.0);
        assert_eq!(action, Some(ScrollAction::ScrollTo(970.0)));
    }

    #[test]
    fn plain_wheel_is_ignored() {
        let tracker = PanTracker::new();
        assert_eq!(tracker.wheel(0.0, 50.0, WheelModifiers::default(), 0.0, 0.0, 1_000.0), None);
    }
}

// ===== Mouse =====

mod mouse {
    use super::*;

    #[test]
    fn drag_right_scrolls_left() {
        let mut tracker = PanTracker::new();
        tracker.mouse_down(true, 500.0);
        assert_eq!(
            tracker.mouse_move(520.0, 1_000.0, false),
            Some(ScrollAction::ScrollTo(980.0))
        );
        assert_eq!(
            tracker.mouse_move(530.0, 980.0, false),
            Some(ScrollAction::ScrollTo(970.0))
        );
    }

    #[test]
    fn secondary_button_does_not_pan() {
        let mut tracker = PanTracker::new();
        tracker.mouse_down(false, 500.0);
        assert!(!tracker.is_mouse_panning());
        assert_eq!(tracker.mouse_move(520.0, 1_000.0, false), None);
    }

    #[test]
    fn item_interaction_suppresses_pan() {
        let mut tracker = PanTracker::new();
        tracker.mouse_down(true, 500.0);
        assert_eq!(tracker.mouse_move(520.0, 1_000.0, true), None);
    }

    #[test]
    fn mouse_up_ends_pan() {
        let mut tracker = PanTracker::new();
        tracker.mouse_down(true, 500.0);
        tracker.mouse_up();
        assert_eq!(tracker.mouse_move(520.0, 1_000.0, false), None);
    }
}

// ===== Touch =====

mod touch {
    use super::*;

    #[test]
    fn pinch_out_zooms_in_around_midpoint() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(400.0, 0.0), TouchPoint::new(600.0, 0.0)], 0.0);
        let actions = tracker.touch_move(
            &[TouchPoint::new(300.0, 0.0), TouchPoint::new(700.0, 0.0)],
            1_000.0,
            1_000.0,
            false,
        );
        assert_eq!(
            actions,
            vec![ScrollAction::Zoom {
                scale: 0.5,
                anchor_ratio: 0.5
            }]
        );
    }

    #[test]
    fn horizontal_swipe_pans_only() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(100.0, 100.0)], 0.0);
        let actions = tracker.touch_move(&[TouchPoint::new(130.0, 105.0)], 1_000.0, 1_000.0, false);
        assert_eq!(actions, vec![ScrollAction::ScrollTo(970.0)]);
    }

    #[test]
    fn vertical_swipe_scrolls_page_only() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(100.0, 100.0)], 200.0);
        let actions = tracker.touch_move(&[TouchPoint::new(105.0, 160.0)], 1_000.0, 1_000.0, false);
        assert_eq!(actions, vec![ScrollAction::VerticalScroll(140.0)]);
    }

    #[test]
    fn diagonal_swipe_moves_both_axes() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(100.0, 100.0)], 0.0);
        let actions = tracker.touch_move(&[TouchPoint::new(120.0, 120.0)], 1_000.0, 1_000.0, false);
        assert_eq!(
            actions,
            vec![
                ScrollAction::ScrollTo(980.0),
                ScrollAction::VerticalScroll(-20.0)
            ]
        );
    }

    #[test]
    fn touch_end_resets_gesture() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(100.0, 100.0)], 0.0);
        tracker.touch_end();
        assert!(tracker
            .touch_move(&[TouchPoint::new(150.0, 100.0)], 0.0, 1_000.0, false)
            .is_empty());
    }

    #[test]
    fn item_interaction_suppresses_touch() {
        let mut tracker = PanTracker::new();
        tracker.touch_start(&[TouchPoint::new(100.0, 100.0)], 0.0);
        assert!(tracker
            .touch_move(&[TouchPoint::new(150.0, 100.0)], 0.0, 1_000.0, true)
            .is_empty());
    }
}
