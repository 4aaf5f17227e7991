use crate::config::Config;
use crate::model::{AppState, BufferId};
use crate::msg::{Msg, StoreEvent};
use gitbuf_core::services::{GitBackend, GitRepository};
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{mpsc, Arc, RwLock};
use std::thread;

mod effects;
mod executor;
mod reducer;

use effects::schedule_effect;
use executor::{default_worker_threads, TaskExecutor};
use reducer::reduce;

/// The state store the host editor drives: dispatch messages in, read
/// snapshots and events out. All git work happens on worker threads; the
/// reducer runs on a single state thread, so renders never interleave.
pub struct AppStore {
    state: Arc<RwLock<AppState>>,
    msg_tx: mpsc::Sender<Msg>,
}

impl Clone for AppStore {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            msg_tx: self.msg_tx.clone(),
        }
    }
}

impl AppStore {
    pub fn new(backend: Arc<dyn GitBackend>, config: Config) -> (Self, mpsc::Receiver<StoreEvent>) {
        let state = Arc::new(RwLock::new(AppState {
            config,
            ..AppState::default()
        }));
        let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
        let (event_tx, event_rx) = mpsc::channel::<StoreEvent>();

        let thread_state = Arc::clone(&state);
        let thread_msg_tx = msg_tx.clone();

        thread::spawn(move || {
            let executor = TaskExecutor::new(default_worker_threads());
            let mut repos: HashMap<BufferId, Arc<dyn GitRepository>> = HashMap::new();
            let id_alloc = AtomicU64::new(1);

            while let Ok(msg) = msg_rx.recv() {
                let mut events = Vec::new();
                let effects = {
                    let mut app_state = thread_state.write().expect("state lock poisoned (write)");
                    reduce(&mut repos, &id_alloc, &mut app_state, msg, &mut events)
                };

                let _ = event_tx.send(StoreEvent::StateChanged);
                for event in events {
                    let _ = event_tx.send(event);
                }

                for effect in effects {
                    schedule_effect(&executor, &backend, &repos, thread_msg_tx.clone(), effect);
                }
            }
        });

        (Self { state, msg_tx }, event_rx)
    }

    pub fn dispatch(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    pub fn snapshot(&self) -> AppState {
        self.state
            .read()
            .expect("state lock poisoned (read)")
            .clone()
    }
}
