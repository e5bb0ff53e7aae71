//! MPRIS publication of the now-playing state.
//!
//! The desktop can see what is playing and ask the program to quit. It
//! cannot steer playback: the shared timeline decides what plays, so every
//! transport capability is reported as unavailable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::display::{NowPlaying, Screen};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
}

#[derive(Debug, Default)]
struct SharedState {
    playing: bool,
    track_index: Option<usize>,
    title: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    /// Mirror `screen` into the published properties.
    pub fn publish(&self, screen: &Screen) {
        let now = match screen {
            Screen::Playing(np) => Some(np),
            _ => None,
        };
        self.set_now_playing(now);
    }

    pub fn set_now_playing(&self, now: Option<&NowPlaying>) {
        if let Ok(mut s) = self.state.lock() {
            s.playing = now.is_some();
            s.track_index = now.map(|np| np.index);
            s.title = now.map(|np| np.name.clone());
            s.length_micros = now
                .filter(|np| !np.length.is_zero())
                .map(|np| i64::try_from(np.length.as_micros()).unwrap_or(i64::MAX));
        }
    }
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

fn metadata_map(state: &SharedState) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();

    let title = state.title.clone().unwrap_or_default();
    if let Some(v) = owned(Value::from(title)) {
        map.insert("xesam:title".to_string(), v);
    }

    if let Some(index) = state.track_index {
        let path = format!("/org/mpris/MediaPlayer2/track/{index}");
        if let Some(v) = ObjectPath::try_from(path.as_str())
            .ok()
            .and_then(|p| owned(Value::from(p)))
        {
            map.insert("mpris:trackid".to_string(), v);
        }
    }

    if let Some(len) = state.length_micros {
        if let Some(v) = owned(Value::from(len)) {
            map.insert("mpris:length".to_string(), v);
        }
    }

    map
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
        "unison"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    // Transport requests are accepted and ignored; the timeline is not ours to move.
    fn next(&self) {}

    fn previous(&self) {}

    fn play(&self) {}

    fn pause(&self) {}

    fn play_pause(&self) {}

    fn stop(&self) {}

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        if s.playing { "Playing" } else { "Stopped" }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        match self.state.lock() {
            Ok(s) => metadata_map(&s),
            Err(_) => HashMap::new(),
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.unison")
                .await
            {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx }).await {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }

            info!("MPRIS: service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}
