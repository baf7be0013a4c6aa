//! MPRIS (`org.mpris.MediaPlayer2`) service: desktop media keys and
//! now-playing widgets see the current track and can drive the player.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::library::Track;
use crate::playback::PlayerState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.tapedeck";

/// Commands arriving from the bus, routed into the same transitions as keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayerState,
    title: Option<String>,
    artist: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlayerState) {
        if let Ok(mut s) = self.state.lock() {
            if s.playback == playback {
                return;
            }
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish `track` (at catalog position `index`) as now playing; `None` clears.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.name.clone());
                    s.artist = vec![t.artist.clone()];
                    s.url = Some(t.playable_url.to_string());
                    s.length_micros = (t.duration_secs > 0.0)
                        .then(|| (t.duration_secs * 1_000_000.0).round() as i64);
                    s.track_id = index.and_then(|i| {
                        ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}"))
                            .ok()
                            .map(OwnedObjectPath::from)
                    });
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tapedeck"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned<'a>(v: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(v.into()).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlayerState::Idle | PlayerState::Ended => "Stopped",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let entries = [
            ("mpris:trackid", s.track_id.clone().and_then(owned)),
            ("xesam:title", s.title.clone().and_then(owned)),
            (
                "xesam:artist",
                (!s.artist.is_empty()).then(|| s.artist.clone()).and_then(owned),
            ),
            ("xesam:url", s.url.clone().and_then(owned)),
            ("mpris:length", s.length_micros.and_then(owned)),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

async fn emit_changes(player: &InterfaceRef<PlayerIface>) {
    let iface = player.get().await;
    let emitter = player.signal_emitter();
    if let Err(e) = iface.playback_status_changed(emitter).await {
        debug!("MPRIS: PlaybackStatus signal failed: {e}");
    }
    if let Err(e) = iface.metadata_changed(emitter).await {
        debug!("MPRIS: Metadata signal failed: {e}");
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server.at(OBJECT_PATH, RootIface { tx: tx.clone() }).await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    // Coalesce change notifications into PropertiesChanged signals.
    loop {
        Timer::after(Duration::from_millis(200)).await;
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if changed {
            emit_changes(&player).await;
        }
    }
}

/// Start the MPRIS service on its own thread. Bus failures are logged and the
/// player keeps working without it.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            warn!("MPRIS unavailable: {e}");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}
