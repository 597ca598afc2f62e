use pinpoint::{prelude::*, shared::geo};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 64;

/// What the map currently draws, as reported through [`MapView`].
#[derive(Debug, Clone, Default)]
pub struct ServerMap {
    pub overlay: Option<RenderablePath>,
    pub alert: Option<String>,
}

impl MapView for ServerMap {
    fn render_route(&mut self, path: &RenderablePath) {
        info!("Rendering route overlay ({} bytes)", path.0.len());
        self.overlay = Some(path.clone());
    }

    fn alert(&mut self, message: &str) {
        warn!("Alert: {message}");
        self.alert = Some(message.to_string());
    }

    fn clear(&mut self) {
        self.overlay = None;
        self.alert = None;
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub view: View,
    pub overlay: Option<RenderablePath>,
}

pub enum Command {
    Select {
        click: Click,
        reply: oneshot::Sender<Result<Snapshot, geo::Error>>,
    },
    Close {
        reply: oneshot::Sender<Snapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Handle to the task that owns the orchestrator.
#[derive(Clone)]
pub struct Driver {
    commands: mpsc::Sender<Command>,
}

impl Driver {
    pub fn spawn(orchestrator: Orchestrator<ServerMap>) -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run(orchestrator, receiver));
        Self { commands }
    }

    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }
}

async fn run(mut orchestrator: Orchestrator<ServerMap>, mut commands: mpsc::Receiver<Command>) {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle(&mut orchestrator, command),
                None => break,
            },
            Some(_) = orchestrator.next() => {}
        }
    }
    debug!("Driver stopped");
}

fn handle(orchestrator: &mut Orchestrator<ServerMap>, command: Command) {
    match command {
        Command::Select { click, reply } => {
            let result = orchestrator.select(click).map(|_| snapshot(orchestrator));
            let _ = reply.send(result);
        }
        Command::Close { reply } => {
            orchestrator.close_popup();
            let _ = reply.send(snapshot(orchestrator));
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(snapshot(orchestrator));
        }
    }
}

fn snapshot(orchestrator: &Orchestrator<ServerMap>) -> Snapshot {
    Snapshot {
        view: orchestrator.view(),
        overlay: orchestrator.map().overlay.clone(),
    }
}
