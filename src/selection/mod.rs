pub mod state;

pub use state::*;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::{
    clients::{self, Clients, RenderablePath, TravelMode},
    display::View,
    shared::{
        Timestamp,
        geo::{self, Click, Coordinate},
    },
};

/// Sink for the parts of a selection the map widget draws itself.
pub trait MapView: Send {
    fn render_route(&mut self, path: &RenderablePath);
    fn alert(&mut self, message: &str);
    /// Drops the overlay and alert of the previous selection.
    fn clear(&mut self);
}

/// Map sink that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl MapView for Headless {
    fn render_route(&mut self, _: &RenderablePath) {}
    fn alert(&mut self, _: &str) {}
    fn clear(&mut self) {}
}

/// Owns the [`SelectionState`] and is the only place it gets mutated.
///
/// Every click fans out to the three clients as independent tasks. Their
/// results come back tagged with the selection's [`Generation`] and are
/// merged one at a time by [`Orchestrator::next`], so partial results show up
/// as soon as they land and results for a superseded click are dropped.
pub struct Orchestrator<M: MapView = Headless> {
    clients: Clients,
    origin: Coordinate,
    mode: TravelMode,
    state: SelectionState,
    map: M,
    sender: UnboundedSender<Resolution>,
    receiver: UnboundedReceiver<Resolution>,
}

impl Orchestrator<Headless> {
    pub fn new(clients: Clients, origin: Coordinate) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            clients,
            origin,
            mode: TravelMode::default(),
            state: SelectionState::new(),
            map: Headless,
            sender,
            receiver,
        }
    }
}

impl<M: MapView> Orchestrator<M> {
    pub fn with_map<N: MapView>(self, map: N) -> Orchestrator<N> {
        Orchestrator {
            clients: self.clients,
            origin: self.origin,
            mode: self.mode,
            state: self.state,
            map,
            sender: self.sender,
            receiver: self.receiver,
        }
    }

    /// Validates the click, resets the state and dispatches all three
    /// clients. Must be called from within a tokio runtime.
    pub fn select(&mut self, click: Click) -> Result<Generation, geo::Error> {
        let coordinate = Coordinate::try_from(click).inspect_err(|err| {
            warn!("Rejected click: {err}");
        })?;
        let generation = self.state.select(coordinate);
        self.map.clear();
        debug!("Selection {} at {coordinate}", generation.as_u64());
        self.dispatch(generation, coordinate);
        Ok(generation)
    }

    pub fn close_popup(&mut self) {
        self.state.close_popup();
    }

    fn dispatch(&self, generation: Generation, destination: Coordinate) {
        let routing = self.clients.routing.clone();
        let (origin, mode) = (self.origin, self.mode);
        self.spawn_call(
            generation,
            async move { routing.compute_route(origin, destination, mode).await },
            Outcome::Route,
        );

        let air_quality = self.clients.air_quality.clone();
        self.spawn_call(
            generation,
            async move { air_quality.fetch_air_quality(destination).await },
            Outcome::AirQuality,
        );

        let time_zone = self.clients.time_zone.clone();
        self.spawn_call(
            generation,
            async move {
                let at = Timestamp::now();
                time_zone.fetch_time_zone(destination, at).await
            },
            Outcome::TimeZone,
        );
    }

    /// Runs one client call in its own task so a panic still resolves its kind.
    fn spawn_call<T, F>(
        &self,
        generation: Generation,
        call: F,
        outcome: fn(Result<T, clients::Error>) -> Outcome,
    ) where
        T: Send + 'static,
        F: Future<Output = Result<T, clients::Error>> + Send + 'static,
    {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = match tokio::spawn(call).await {
                Ok(result) => result,
                Err(err) => Err(clients::Error::Task(err.to_string())),
            };
            deliver(&sender, generation, outcome(result));
        });
    }

    /// Waits for the next client to answer and merges its result. Cancel safe.
    pub async fn next(&mut self) -> Option<Merge> {
        let resolution = self.receiver.recv().await?;
        let generation = resolution.generation;
        let merge = self.state.apply(resolution);
        match merge {
            Merge::Merged(kind) => {
                debug!("Merged {kind} for selection {}", generation.as_u64());
                if kind == Kind::Route {
                    if let Some(route) = self.state.route() {
                        self.map.render_route(&route.path);
                    }
                }
            }
            Merge::Failed(Kind::Route) => {
                if let Some(alert) = self.state.alert() {
                    error!("{alert}");
                    self.map.alert(alert);
                }
            }
            Merge::Failed(kind) => {
                if let Some(failure) = self.state.failures().last() {
                    warn!("{kind} unavailable: {}", failure.cause);
                }
            }
            Merge::Stale(kind) => {
                debug!("Dropped stale {kind} from selection {}", generation.as_u64());
            }
        }
        Some(merge)
    }

    /// Merges results until the active selection has nothing pending.
    pub async fn settle(&mut self) {
        while !self.state.is_settled() {
            if self.next().await.is_none() {
                break;
            }
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn view(&self) -> View {
        View::from_state(&self.state)
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }
}

fn deliver(sender: &UnboundedSender<Resolution>, generation: Generation, outcome: Outcome) {
    if sender.send(Resolution { generation, outcome }).is_err() {
        debug!("Orchestrator gone, dropping resolution");
    }
}
