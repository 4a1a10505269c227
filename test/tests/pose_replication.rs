//! End-to-end tests for avatar pose replication

use tandem_client::{LocalEntityRegisteredEvent, RigBinding, TrackingRig};
use tandem_shared::{ClientMessage, ParticipantId, Pose, Quat, ServerMessage, Vec3};
use tandem_test::{ScriptedPoseSource, TestSession, TICK_DT};

fn setup() -> (TestSession, ParticipantId, ParticipantId) {
    let _ = env_logger::try_init();
    let mut session = TestSession::new();
    let a = session.connect(1).expect("fresh participant");
    let b = session.connect(2).expect("fresh participant");
    session.exchange_packets();
    (session, a, b)
}

fn standing_at(x: f32, z: f32) -> Pose {
    Pose::from_position(Vec3::new(x, 1.7, z))
}

#[test]
fn owner_pose_reaches_others_floor_locked() {
    let (mut session, a, b) = setup();
    let entity_a = session.entity_of(&a);
    let head = Pose::new(
        Vec3::new(1.0, 1.7, -2.0),
        Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.3),
    );
    let mut source = ScriptedPoseSource::tracking(head, 0.0);

    assert!(session.client_mut(&a).publish_local_pose(&mut source));
    session.exchange_packets();

    let expected = head.floor_locked(0.0);
    assert_eq!(expected.position(), Vec3::new(1.0, 0.0, -2.0));
    assert!((expected.yaw() - 0.5).abs() < 1e-5);
    assert_eq!(session.server.entity_pose(&entity_a), Some(&expected));
    assert_eq!(session.client(&b).replicated_pose(&entity_a), Some(expected));
    // first pose snaps, no interpolation from the spawn placeholder
    assert_eq!(session.client(&b).displayed_pose(&entity_a), Some(expected));
    assert_eq!(session.client(&a).displayed_pose(&entity_a), Some(expected));
}

#[test]
fn each_client_registers_its_own_avatar() {
    let _ = env_logger::try_init();
    let mut session = TestSession::new();
    let a = session.connect(1).expect("fresh participant");

    assert_eq!(session.client(&a).local_entity(), None);
    session.exchange_packets();

    let entity_a = session.entity_of(&a);
    let mut events = session.client_mut(&a).take_events();
    assert_eq!(
        events.read::<LocalEntityRegisteredEvent>().collect::<Vec<_>>(),
        vec![entity_a]
    );
    assert_eq!(session.client(&a).local_entity(), Some(entity_a));
}

#[test]
fn publish_before_registration_is_a_no_op() {
    let _ = env_logger::try_init();
    let mut session = TestSession::new();
    let a = session.connect(1).expect("fresh participant");
    let mut source = ScriptedPoseSource::tracking(standing_at(0.0, 0.0), 0.0);

    assert!(!session.client_mut(&a).publish_local_pose(&mut source));
    assert_eq!(source.samples, 0);

    session.exchange_packets();
    assert!(session.client_mut(&a).publish_local_pose(&mut source));
    assert_eq!(source.samples, 1);
}

struct Headset {
    head: Pose,
}

impl TrackingRig for Headset {
    fn head_pose(&self) -> Option<Pose> {
        Some(self.head)
    }

    fn floor_height(&self) -> f32 {
        0.0
    }
}

#[test]
fn lazy_rig_binding_skips_ticks_until_found() {
    let (mut session, a, b) = setup();
    let entity_a = session.entity_of(&a);
    let mut probes = 0;
    let mut binding = RigBinding::new(|| {
        probes += 1;
        if probes <= 3 {
            None
        } else {
            Some(Headset {
                head: standing_at(4.0, 4.0),
            })
        }
    });

    for _ in 0..3 {
        assert!(!session.client_mut(&a).publish_local_pose(&mut binding));
        session.tick_and_exchange();
    }
    assert!(!binding.is_bound());
    assert_eq!(
        session.client(&b).replicated_pose(&entity_a),
        Some(Pose::IDENTITY)
    );

    assert!(session.client_mut(&a).publish_local_pose(&mut binding));
    assert!(session.client_mut(&a).publish_local_pose(&mut binding));
    session.tick_and_exchange();

    assert!(binding.is_bound());
    assert_eq!(
        session
            .client(&b)
            .replicated_pose(&entity_a)
            .map(|pose| pose.position()),
        Some(Vec3::new(4.0, 0.0, 4.0))
    );
}

#[test]
fn lost_tracking_skips_publish() {
    let (mut session, a, b) = setup();
    let entity_a = session.entity_of(&a);
    let mut source = ScriptedPoseSource::tracking(standing_at(1.0, 0.0), 0.0);
    session.client_mut(&a).publish_local_pose(&mut source);
    session.tick_and_exchange();

    source.lose_tracking();
    assert!(!session.client_mut(&a).publish_local_pose(&mut source));
    assert!(session.client_mut(&a).take_outgoing().is_empty());
    session.tick_and_exchange();

    assert_eq!(
        session
            .client(&b)
            .replicated_pose(&entity_a)
            .map(|pose| pose.position().x),
        Some(1.0)
    );
}

#[test]
fn several_publishes_between_flushes_send_one_update() {
    let (mut session, a, _b) = setup();
    let entity_a = session.entity_of(&a);
    let mut source = ScriptedPoseSource::default();

    for x in [1.0, 2.0, 3.0] {
        source.set_head(standing_at(x, 0.0), 0.0);
        session.client_mut(&a).publish_local_pose(&mut source);
    }

    let outgoing = session.client_mut(&a).take_outgoing();
    assert_eq!(outgoing.len(), 1);
    match &outgoing[0] {
        ClientMessage::EntityPose {
            entity,
            sequence,
            pose,
        } => {
            assert_eq!(*entity, entity_a);
            assert_eq!(*sequence, 3);
            assert_eq!(pose.position(), Vec3::new(3.0, 0.0, 0.0));
        }
        other => panic!("Expected EntityPose, got {:?}", other),
    }
}

#[test]
fn remote_avatar_converges_geometrically() {
    let (mut session, a, b) = setup();
    let entity_a = session.entity_of(&a);
    let mut source = ScriptedPoseSource::tracking(standing_at(0.0, 0.0), 0.0);
    session.client_mut(&a).publish_local_pose(&mut source);
    session.tick_and_exchange();

    source.set_head(standing_at(10.0, 0.0), 0.0);
    session.client_mut(&a).publish_local_pose(&mut source);

    let factor = (20.0 * TICK_DT).min(1.0);
    let mut expected_gap = 10.0f32;
    for _ in 0..5 {
        session.tick_and_exchange();
        expected_gap *= 1.0 - factor;
        let shown = session
            .client(&b)
            .displayed_pose(&entity_a)
            .expect("remote avatar");
        let gap = 10.0 - shown.position().x;
        assert!(
            (gap - expected_gap).abs() < 1e-3,
            "gap {} should be {}",
            gap,
            expected_gap
        );
    }

    for _ in 0..60 {
        session.tick_and_exchange();
    }
    let shown = session
        .client(&b)
        .displayed_pose(&entity_a)
        .expect("remote avatar");
    assert!(shown.approx_eq(&standing_at(10.0, 0.0).floor_locked(0.0), 1e-3));
}

#[test]
fn stale_pose_is_ignored_by_receivers() {
    let (mut session, a, b) = setup();
    let entity_a = session.entity_of(&a);
    let mut source = ScriptedPoseSource::default();
    for x in [1.0, 2.0] {
        source.set_head(standing_at(x, 0.0), 0.0);
        session.client_mut(&a).publish_local_pose(&mut source);
        session.exchange_packets();
    }

    // a delayed duplicate of the first update shows up late
    session.client_mut(&b).receive_message(ServerMessage::EntityPose {
        entity: entity_a,
        sequence: 1,
        pose: standing_at(1.0, 0.0).floor_locked(0.0),
    });

    assert_eq!(
        session
            .client(&b)
            .replicated_pose(&entity_a)
            .map(|pose| pose.position().x),
        Some(2.0)
    );
}

#[test]
fn third_participant_sees_existing_avatar_pose() {
    let (mut session, a, _b) = setup();
    let entity_a = session.entity_of(&a);
    let mut source = ScriptedPoseSource::tracking(standing_at(-3.0, 2.0), 0.0);
    session.client_mut(&a).publish_local_pose(&mut source);
    session.exchange_packets();

    let c = session.connect(3).expect("fresh participant");
    session.exchange_packets();

    assert_eq!(
        session.client(&c).displayed_pose(&entity_a),
        Some(standing_at(-3.0, 2.0).floor_locked(0.0))
    );
}
