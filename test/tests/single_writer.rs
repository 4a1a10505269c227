//! Property tests: whatever the interleaving of requests and disconnects, an
//! object has at most one holder, only that holder moves it, and everyone
//! agrees on who it is.

use std::collections::BTreeSet;

use proptest::prelude::*;

use tandem_shared::{ClientMessage, GrantState, ParticipantId, Pose, Vec3};
use tandem_test::TestSession;

#[derive(Clone, Debug)]
enum Op {
    Grab(u64),
    Release(u64),
    Submit(u64, f32),
    Disconnect(u64),
    Connect(u64),
}

fn op() -> impl Strategy<Value = Op> {
    let participant = 1u64..4;
    prop_oneof![
        3 => participant.clone().prop_map(Op::Grab),
        3 => participant.clone().prop_map(Op::Release),
        3 => (participant.clone(), -5.0f32..5.0).prop_map(|(p, x)| Op::Submit(p, x)),
        1 => participant.clone().prop_map(Op::Disconnect),
        1 => participant.prop_map(Op::Connect),
    ]
}

fn held_at(x: f32) -> Pose {
    Pose::from_position(Vec3::new(x, 1.0, 0.0))
}

/// What the server should have done, one request at a time in queue order
struct Model {
    connected: BTreeSet<u64>,
    pending: Vec<(u64, Op)>,
    holder: Option<u64>,
    pose: Pose,
}

impl Model {
    fn disconnect(&mut self, participant: u64) {
        if !self.connected.remove(&participant) {
            return;
        }
        self.pending.retain(|(sender, _)| *sender != participant);
        if self.holder == Some(participant) {
            self.holder = None;
        }
    }

    fn process(&mut self) {
        for (sender, op) in std::mem::take(&mut self.pending) {
            match op {
                Op::Grab(_) if self.holder.is_none() => self.holder = Some(sender),
                Op::Release(_) if self.holder == Some(sender) => self.holder = None,
                Op::Submit(_, x) if self.holder == Some(sender) => self.pose = held_at(x),
                _ => {}
            }
        }
    }
}

proptest! {
    #[test]
    fn at_most_one_writer_over_any_interleaving(
        ops in prop::collection::vec(op(), 1..60),
        batch in 1usize..6,
    ) {
        let mut session = TestSession::new();
        let start = Pose::from_position(Vec3::ZERO);
        let object = session.spawn_object(start);
        let mut model = Model {
            connected: BTreeSet::new(),
            pending: Vec::new(),
            holder: None,
            pose: start,
        };
        for id in 1..4u64 {
            session.connect(id).expect("fresh participant");
            model.connected.insert(id);
        }
        session.exchange_packets();

        for chunk in ops.chunks(batch) {
            for op in chunk {
                match op {
                    Op::Disconnect(id) => {
                        session.disconnect(&ParticipantId::new(*id));
                        model.disconnect(*id);
                    }
                    Op::Connect(id) => {
                        if model.connected.insert(*id) {
                            session.connect(*id).expect("disconnected id reconnects");
                        }
                    }
                    Op::Grab(id) | Op::Release(id) | Op::Submit(id, _) => {
                        let message = match op {
                            Op::Grab(_) => ClientMessage::RequestGrab { object },
                            Op::Release(_) => ClientMessage::RequestRelease { object },
                            Op::Submit(_, x) => ClientMessage::SubmitPose {
                                object,
                                pose: held_at(*x),
                            },
                            _ => unreachable!(),
                        };
                        session.server.receive_message(&ParticipantId::new(*id), message);
                        if model.connected.contains(id) {
                            model.pending.push((*id, op.clone()));
                        }
                    }
                }
            }

            session.exchange_packets();
            model.process();

            let expected = match model.holder {
                Some(id) => GrantState::Held(ParticipantId::new(id)),
                None => GrantState::Free,
            };
            prop_assert_eq!(session.server.object_grant(&object), Some(expected));
            prop_assert_eq!(session.world.is_kinematic(&object), model.holder.is_some());
            prop_assert_eq!(session.world.body(&object).map(|body| body.pose), Some(model.pose));
            if let Some(holder) = model.holder {
                prop_assert!(model.connected.contains(&holder));
            }

            for id in &model.connected {
                let state = session
                    .client(&ParticipantId::new(*id))
                    .object_state(&object)
                    .copied();
                prop_assert_eq!(state.map(|state| state.grant), Some(expected));
                prop_assert_eq!(state.map(|state| state.pose), Some(model.pose));
            }
        }
    }
}
