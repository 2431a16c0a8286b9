use std::time::Duration;

use gallery_core::{Effect, Msg};
use gallery_engine::EngineHandle;
use gallery_logging::{gallery_debug, gallery_info};

/// Hands effects produced by `update` to the engine and turns engine events
/// back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPage { ticket, query } => {
                    gallery_debug!(
                        "FetchPage kind={:?} generation={} cursor={:?} query={}",
                        ticket.kind,
                        ticket.generation,
                        ticket.cursor,
                        query
                    );
                    self.engine.fetch_page(ticket, query);
                }
                Effect::DeleteHit { id } => {
                    gallery_info!("DeleteHit id={}", id);
                    self.engine.delete(id);
                }
            }
        }
    }

    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(Msg::from)
    }
}
