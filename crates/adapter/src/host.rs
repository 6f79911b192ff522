//! Game-loop side of the adapter.
//!
//! [`SessionHost`] owns the scheduler, applies inbound commands between ticks and
//! turns the results into outbound messages. It is synchronous; the caller moves
//! messages between it and an [`Adapter`](crate::Adapter) (or channels in tests).

use crate::core::{GameSession, SessionSnapshot};
use crate::engine::Scheduler;
use crate::protocol::{create_ack, create_error, ErrorCode, ObservationMessage};
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::server::build_observation;
use crate::types::TickEvent;

pub struct SessionHost {
    scheduler: Scheduler,
    obs_seq: u64,
}

impl SessionHost {
    pub fn new(session: GameSession) -> Self {
        Self {
            scheduler: Scheduler::new(session),
            obs_seq: 0,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn session(&self) -> &GameSession {
        self.scheduler.session()
    }

    /// Current observation, consuming the pending tick event
    pub fn observation(&mut self) -> Box<ObservationMessage> {
        let last_event = self.scheduler.take_last_event();
        next_observation(&mut self.obs_seq, &self.scheduler.session().snapshot(), last_event)
    }

    /// Apply one inbound command; returns the messages to deliver, in order.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let client_id = inbound.client_id;
        let command = match inbound.payload {
            InboundPayload::SnapshotRequest => {
                return vec![OutboundMessage::ToClientObservation {
                    client_id,
                    obs: self.observation(),
                }];
            }
            InboundPayload::Command(command) => command,
        };

        let result = match command {
            ClientCommand::Command(cmd) => self.scheduler.apply(&cmd),
            ClientCommand::Restart => {
                self.scheduler.restart();
                log::info!(
                    "session restarted: seed={:?} episode={}",
                    self.session().seed(),
                    self.session().episode_id()
                );
                Ok(())
            }
        };

        match result {
            Ok(()) => vec![
                OutboundMessage::ToClientAck {
                    client_id,
                    ack: create_ack(inbound.seq),
                },
                OutboundMessage::BroadcastObservation {
                    obs: self.observation(),
                },
            ],
            Err(e) => {
                log::debug!("command {} rejected ({}): {}", inbound.seq, e.code(), e);
                vec![OutboundMessage::ToClientError {
                    client_id,
                    err: create_error(inbound.seq, ErrorCode::InvalidCommand, &e.to_string()),
                }]
            }
        }
    }

    /// Feed elapsed time; broadcasts one observation per tick run.
    ///
    /// Each observation carries its own tick's event, so a long step that runs
    /// several ticks still reports every fuse and detonation.
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<OutboundMessage> {
        let obs_seq = &mut self.obs_seq;
        let mut out = Vec::new();
        self.scheduler.advance_with(elapsed_ms, |session| {
            let last_event = session.take_last_event();
            out.push(OutboundMessage::BroadcastObservation {
                obs: next_observation(obs_seq, &session.snapshot(), last_event),
            });
        });
        out
    }
}

fn next_observation(
    obs_seq: &mut u64,
    snapshot: &SessionSnapshot,
    last_event: Option<TickEvent>,
) -> Box<ObservationMessage> {
    *obs_seq += 1;
    Box::new(build_observation(*obs_seq, snapshot, last_event))
}
