/// End-to-end navigation through the portfolio menu

use approx::assert_relative_eq;
use cubefolio_core::snap::{ease_in_out_cubic, lerp};
use cubefolio_core::{
    CubeScene, Face, NavigateOutcome, NavigationGraph, SceneConfig, SnapConfig, SnapStatus,
};
use std::cell::Cell;
use std::rc::Rc;

const FRAME_MS: f64 = 16.0;

fn scene_with(snap: SnapConfig) -> CubeScene {
    let config = SceneConfig {
        snap,
        ..SceneConfig::default()
    };
    let mut scene = CubeScene::new(NavigationGraph::portfolio(), config).unwrap();
    scene.bind_cube();
    scene
}

/// Step frames from `from_ms` while the cube is animating, returning the
/// time of the frame that completed the snap
fn run_until_idle(scene: &mut CubeScene, from_ms: f64) -> f64 {
    let mut now = from_ms;
    loop {
        if let SnapStatus::Completed(_) = scene.frame(now) {
            return now;
        }
        assert!(now < from_ms + 5_000.0, "snap never completed");
        now += FRAME_MS;
    }
}

#[test]
fn home_to_projects_snaps_to_right_face() {
    let mut scene = scene_with(SnapConfig {
        duration_ms: 500.0,
        settle_delay_ms: 0.0,
    });
    assert_eq!(scene.current_screen().face(), Face::Front);
    assert_eq!(scene.cube().unwrap().rotation, Face::Front.rotation());

    let outcome = scene.on_navigate("projects", 1_000.0);
    assert_eq!(outcome, NavigateOutcome::Accepted);
    assert_eq!(scene.current_screen_id(), "projects");
    assert!(scene.is_animating());

    // Rotation moves monotonically from 0 towards -π/2 about y
    let target_y = Face::Right.rotation().y;
    let mut previous = 0.0;
    let mut now = 1_000.0;
    while now < 1_500.0 {
        scene.frame(now);
        assert!(scene.is_animating());
        let y = scene.cube().unwrap().rotation.y;
        assert!(y <= previous + 1e-6 && y >= target_y - 1e-6);
        previous = y;
        now += FRAME_MS;
    }

    assert_eq!(scene.frame(1_500.0), SnapStatus::Completed(Face::Right));
    assert_eq!(scene.cube().unwrap().rotation, Face::Right.rotation());
    assert!(!scene.is_animating());

    assert_eq!(scene.on_navigate("web-apps", 1_500.0), NavigateOutcome::Accepted);
}

#[test]
fn back_from_web_apps_returns_to_projects_face() {
    let mut scene = scene_with(SnapConfig::default());
    let lockout = SnapConfig::default().lockout_ms();

    assert_eq!(scene.on_navigate("projects", 0.0), NavigateOutcome::Accepted);
    let done = run_until_idle(&mut scene, 0.0).max(lockout);

    assert_eq!(scene.on_navigate("web-apps", done), NavigateOutcome::Accepted);
    let done = run_until_idle(&mut scene, done).max(done + lockout);
    assert_eq!(scene.cube().unwrap().rotation, Face::Top.rotation());

    assert_eq!(scene.on_navigate("projects", done), NavigateOutcome::Accepted);
    assert_eq!(scene.snap().state().start_rotation, Face::Top.rotation());
    run_until_idle(&mut scene, done);

    let rotation = scene.cube().unwrap().rotation;
    assert_relative_eq!(rotation.x, Face::Right.rotation().x);
    assert_relative_eq!(rotation.y, Face::Right.rotation().y);
    assert_ne!(rotation, Face::Front.rotation());
}

#[test]
fn clicks_within_a_millisecond_navigate_once() {
    let mut scene = scene_with(SnapConfig::default());
    let snaps = Rc::new(Cell::new(0));
    let counter = Rc::clone(&snaps);
    scene.on_snap_complete(move |_| counter.set(counter.get() + 1));

    assert_eq!(scene.on_navigate("projects", 100.0), NavigateOutcome::Accepted);
    assert_eq!(scene.on_navigate("about", 100.5), NavigateOutcome::Locked);
    assert_eq!(scene.current_screen_id(), "projects");

    run_until_idle(&mut scene, 100.5);
    assert_eq!(snaps.get(), 1);
    assert_eq!(scene.snap().state().target_face, Face::Right);
}

#[test]
fn lockout_covers_settle_delay() {
    let mut scene = scene_with(SnapConfig {
        duration_ms: 500.0,
        settle_delay_ms: 25.0,
    });
    scene.on_navigate("about", 0.0);

    assert_eq!(scene.frame(500.0), SnapStatus::Settling);
    assert_eq!(scene.on_navigate("home", 510.0), NavigateOutcome::Locked);

    assert_eq!(scene.frame(525.0), SnapStatus::Completed(Face::Left));
    assert_eq!(scene.on_navigate("home", 525.0), NavigateOutcome::Accepted);
}

#[test]
fn breathing_resumes_after_snap_without_a_jump() {
    let mut scene = scene_with(SnapConfig {
        duration_ms: 200.0,
        settle_delay_ms: 0.0,
    });
    scene.on_navigate("contact", 0.0);
    let done = run_until_idle(&mut scene, 0.0);
    let landed = *scene.cube().unwrap();

    scene.frame(done + FRAME_MS);
    let breathing = *scene.cube().unwrap();
    assert!((breathing.rotation - landed.rotation).norm() < 0.01);
    assert!((breathing.position - landed.position).norm() < 0.01);
}

#[test]
fn breathing_stays_off_the_cube_while_snapping_and_settling() {
    let mut scene = scene_with(SnapConfig {
        duration_ms: 500.0,
        settle_delay_ms: 100.0,
    });

    // Breathe for a second so the cube is off its rest pose
    let mut now = 0.0;
    while now <= 1_000.0 {
        assert_eq!(scene.frame(now), SnapStatus::Idle);
        now += FRAME_MS;
    }
    let start = *scene.cube().unwrap();
    assert!(start.position.y.abs() > 1e-3);
    assert!(start.rotation.x.abs() > 1e-3);

    assert_eq!(scene.on_navigate("projects", now), NavigateOutcome::Accepted);
    let target = Face::Right.rotation();
    let (mut animating, mut settling) = (0, 0);

    loop {
        let status = scene.frame(now);
        let cube = *scene.cube().unwrap();
        assert_eq!(cube.position, start.position, "position moved at {} ms", now);

        match status {
            SnapStatus::Animating { progress } => {
                animating += 1;
                let eased = ease_in_out_cubic(progress);
                assert_relative_eq!(cube.rotation.x, lerp(start.rotation.x, target.x, eased));
                assert_relative_eq!(cube.rotation.y, lerp(start.rotation.y, target.y, eased));
                assert_relative_eq!(cube.rotation.z, lerp(start.rotation.z, target.z, eased));
            }
            SnapStatus::Settling => {
                settling += 1;
                assert_eq!(cube.rotation, target);
            }
            SnapStatus::Completed(face) => {
                assert_eq!(face, Face::Right);
                assert_eq!(cube.rotation, target);
                break;
            }
            SnapStatus::Idle => panic!("snap ended without completing at {} ms", now),
        }
        now += FRAME_MS;
    }

    assert!(animating > 0);
    assert!(settling > 0);
}
