use async_trait::async_trait;
use pinpoint::{clients::Error, prelude::*};
use std::{
    sync::{Arc, Mutex},
    time,
};
use tokio::{sync::Notify, time::timeout};

const A: (f64, f64) = (44.6401, -63.5785);
const B: (f64, f64) = (45.9636, -66.6431);
const WAIT: time::Duration = time::Duration::from_secs(5);

/// Holds back the answer for one coordinate until opened.
#[derive(Clone)]
struct Gate {
    at: Coordinate,
    open: Arc<Notify>,
}

impl Gate {
    fn new(at: (f64, f64)) -> Self {
        Self {
            at: Coordinate::from(at),
            open: Arc::new(Notify::new()),
        }
    }

    fn open(&self) {
        self.open.notify_one();
    }
}

async fn pass(gate: &Option<Gate>, coordinate: Coordinate) {
    if let Some(gate) = gate {
        if gate.at == coordinate {
            gate.open.notified().await;
        }
    }
}

#[derive(Default)]
struct MockRouting {
    legs: Vec<u64>,
    status: Option<&'static str>,
    /// Answers ZERO_RESULTS for this destination only.
    unreachable: Option<Coordinate>,
    gate: Option<Gate>,
}

#[async_trait]
impl RoutingClient for MockRouting {
    async fn compute_route(
        &self,
        _origin: Coordinate,
        destination: Coordinate,
        _mode: TravelMode,
    ) -> Result<RouteResult, Error> {
        pass(&self.gate, destination).await;
        if self.unreachable == Some(destination) {
            return Err(Error::Routing {
                status: "ZERO_RESULTS".to_string(),
            });
        }
        match self.status {
            Some(status) => Err(Error::Routing {
                status: status.to_string(),
            }),
            None => Ok(RouteResult::from_legs(
                self.legs.iter().copied().map(Duration::from_seconds),
                RenderablePath(format!("path to {destination}")),
            )),
        }
    }
}

struct PanickingRouting;

#[async_trait]
impl RoutingClient for PanickingRouting {
    async fn compute_route(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        _mode: TravelMode,
    ) -> Result<RouteResult, Error> {
        panic!("directions backend crashed");
    }
}

#[derive(Default)]
struct MockAirQuality {
    fail: bool,
    gate: Option<Gate>,
}

#[async_trait]
impl AirQualityClient for MockAirQuality {
    async fn fetch_air_quality(&self, coordinate: Coordinate) -> Result<AirQualityResult, Error> {
        pass(&self.gate, coordinate).await;
        if self.fail {
            return Err(Error::AirQuality("status fail".to_string()));
        }
        Ok(AirQualityResult {
            city: city(coordinate),
            aqi_us: 42,
        })
    }
}

#[derive(Default)]
struct MockTimeZone {
    seen: Arc<Mutex<Vec<Timestamp>>>,
}

#[async_trait]
impl TimeZoneClient for MockTimeZone {
    async fn fetch_time_zone(&self, coordinate: Coordinate, at: Timestamp) -> Result<String, Error> {
        self.seen.lock().unwrap().push(at);
        Ok(format!("Zone/{}", coordinate.latitude))
    }
}

#[derive(Default)]
struct RecordingMap {
    routes: Vec<RenderablePath>,
    alerts: Vec<String>,
    overlay: Option<RenderablePath>,
    alert: Option<String>,
}

impl MapView for RecordingMap {
    fn render_route(&mut self, path: &RenderablePath) {
        self.routes.push(path.clone());
        self.overlay = Some(path.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
        self.alert = Some(message.to_string());
    }

    fn clear(&mut self) {
        self.overlay = None;
        self.alert = None;
    }
}

fn city(coordinate: Coordinate) -> String {
    format!("City {}", coordinate.latitude)
}

fn orchestrator(
    routing: MockRouting,
    air_quality: MockAirQuality,
    time_zone: MockTimeZone,
) -> Orchestrator<RecordingMap> {
    let clients = Clients::new(routing, air_quality, time_zone);
    Orchestrator::new(clients, Coordinate::from(A)).with_map(RecordingMap::default())
}

async fn settle(orchestrator: &mut Orchestrator<RecordingMap>) {
    timeout(WAIT, orchestrator.settle())
        .await
        .expect("selection did not settle");
}

#[tokio::test]
async fn all_three_results_merge() {
    let mut orchestrator = orchestrator(
        MockRouting {
            legs: vec![600, 900],
            ..Default::default()
        },
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;

    let view = orchestrator.view();
    assert!(view.popup_open);
    assert_eq!(view.travel_time.as_deref(), Some("25 min"));
    assert_eq!(view.severity, Severity::Known(AqiBucket::Green));
    assert_eq!(view.time_zone.as_deref(), Some("Zone/45.9636"));
    assert!(view.pending.is_empty());
    assert_eq!(orchestrator.map().routes.len(), 1);
    assert!(orchestrator.map().alerts.is_empty());
}

#[tokio::test]
async fn air_quality_failure_does_not_block_siblings() {
    let mut orchestrator = orchestrator(
        MockRouting {
            legs: vec![60],
            ..Default::default()
        },
        MockAirQuality {
            fail: true,
            ..Default::default()
        },
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;

    let state = orchestrator.state();
    assert!(state.route().is_some());
    assert!(state.time_zone().is_some());
    assert!(state.air_quality().is_none());
    assert_eq!(state.failures().len(), 1);
    assert_eq!(state.failures()[0].kind, Kind::AirQuality);
    assert!(state.alert().is_none());

    let view = orchestrator.view();
    assert_eq!(view.severity, Severity::Unknown);
    assert!(view.air_quality.is_none());
}

#[tokio::test]
async fn routing_failure_alerts_with_status() {
    let mut orchestrator = orchestrator(
        MockRouting {
            status: Some("ZERO_RESULTS"),
            ..Default::default()
        },
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;

    assert!(orchestrator.state().route().is_none());
    assert!(orchestrator.state().air_quality().is_some());
    assert_eq!(
        orchestrator.map().alerts,
        vec!["Directions request failed due to ZERO_RESULTS".to_string()]
    );
    assert!(orchestrator.map().routes.is_empty());
    assert!(orchestrator.view().travel_time.is_none());
}

#[tokio::test]
async fn stale_air_quality_never_lands_on_new_selection() {
    let gate = Gate::new(A);
    let mut orchestrator = orchestrator(
        MockRouting {
            legs: vec![300],
            ..Default::default()
        },
        MockAirQuality {
            gate: Some(gate.clone()),
            ..Default::default()
        },
        MockTimeZone::default(),
    );
    let first = orchestrator.select(Click::from(A)).unwrap();
    let second = orchestrator.select(Click::from(B)).unwrap();
    assert_ne!(first, second);
    settle(&mut orchestrator).await;
    assert_eq!(
        orchestrator.state().air_quality().map(|result| result.city.clone()),
        Some(city(Coordinate::from(B)))
    );

    gate.open();
    loop {
        let merge = timeout(WAIT, orchestrator.next())
            .await
            .expect("stale result never arrived");
        if merge == Some(Merge::Stale(Kind::AirQuality)) {
            break;
        }
    }
    assert_eq!(orchestrator.state().selected(), Some(Coordinate::from(B)));
    assert_eq!(
        orchestrator.state().air_quality().map(|result| result.city.clone()),
        Some(city(Coordinate::from(B)))
    );
}

#[tokio::test]
async fn partial_results_render_before_route() {
    let gate = Gate::new(B);
    let mut orchestrator = orchestrator(
        MockRouting {
            legs: vec![5400],
            gate: Some(gate.clone()),
            ..Default::default()
        },
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(B)).unwrap();
    for _ in 0..2 {
        timeout(WAIT, orchestrator.next()).await.unwrap();
    }

    let view = orchestrator.view();
    assert!(view.air_quality.is_some());
    assert!(view.time_zone.is_some());
    assert!(view.travel_time.is_none());
    assert_eq!(view.pending, vec![Kind::Route]);

    gate.open();
    settle(&mut orchestrator).await;
    assert_eq!(orchestrator.view().travel_time.as_deref(), Some("1 hr 30 min"));
}

#[tokio::test]
async fn close_keeps_last_selection() {
    let mut orchestrator = orchestrator(
        MockRouting::default(),
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;
    orchestrator.close_popup();

    let view = orchestrator.view();
    assert!(!view.popup_open);
    assert_eq!(view.latitude.as_deref(), Some("45.9636"));
    assert!(view.time_zone.is_some());
}

#[tokio::test]
async fn invalid_click_is_rejected() {
    let mut orchestrator = orchestrator(
        MockRouting::default(),
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    assert!(orchestrator.select(Click::from((120.0, 0.0))).is_err());
    assert!(orchestrator.state().selected().is_none());
    assert!(orchestrator.state().is_settled());
    assert!(!orchestrator.view().popup_open);
}

#[tokio::test]
async fn time_zone_uses_current_timestamp() {
    let time_zone = MockTimeZone::default();
    let seen = time_zone.seen.clone();
    let mut orchestrator = orchestrator(MockRouting::default(), MockAirQuality::default(), time_zone);
    let before = Timestamp::now();
    orchestrator.select(Click::from(A)).unwrap();
    settle(&mut orchestrator).await;
    let after = Timestamp::now();

    assert_eq!(seen.lock().unwrap().len(), 1);
    let first = seen.lock().unwrap()[0];
    assert!(first >= before && first <= after);

    tokio::time::sleep(time::Duration::from_millis(1100)).await;
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[1] > first);
    assert!(seen[1] >= after);
}

#[tokio::test]
async fn new_selection_clears_previous_overlay() {
    let mut orchestrator = orchestrator(
        MockRouting {
            legs: vec![600],
            unreachable: Some(Coordinate::from(B)),
            ..Default::default()
        },
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    orchestrator.select(Click::from(A)).unwrap();
    settle(&mut orchestrator).await;
    assert!(orchestrator.map().overlay.is_some());

    orchestrator.select(Click::from(B)).unwrap();
    assert!(orchestrator.map().overlay.is_none());
    settle(&mut orchestrator).await;

    assert!(orchestrator.map().overlay.is_none());
    assert_eq!(
        orchestrator.map().alert.as_deref(),
        Some("Directions request failed due to ZERO_RESULTS")
    );
    assert_eq!(orchestrator.view().latitude.as_deref(), Some("45.9636"));
}

#[tokio::test]
async fn panicking_client_still_settles() {
    let clients = Clients::new(
        PanickingRouting,
        MockAirQuality::default(),
        MockTimeZone::default(),
    );
    let mut orchestrator =
        Orchestrator::new(clients, Coordinate::from(A)).with_map(RecordingMap::default());
    orchestrator.select(Click::from(B)).unwrap();
    settle(&mut orchestrator).await;

    let state = orchestrator.state();
    assert!(state.is_settled());
    assert!(state.route().is_none());
    assert!(state.air_quality().is_some());
    assert!(state.time_zone().is_some());
    assert_eq!(state.failures().len(), 1);
    assert_eq!(state.failures()[0].kind, Kind::Route);
    assert!(state.failures()[0].cause.contains("Client task failed"));
    assert_eq!(orchestrator.map().alerts.len(), 1);
}
