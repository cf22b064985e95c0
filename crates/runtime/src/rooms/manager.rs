//! Registry of rooms and the operations clients drive them with.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use battle_core::{ActionKind, BattleRng, BattleSnapshot, BattleState, PcgRng, Side};
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info, warn};

use super::room::{Room, RoomStatus};
use crate::api::{DecisionProvider, Result, RuntimeError, StartReceipt, StartRequest};
use crate::config::{BattleConfig, RuntimeConfig};
use crate::events::{RoomEvent, RoomMessage, Subscriber, SubscriberId};
use crate::providers::{DecisionPolicy, ModelProvider, ReasoningClient};
use crate::types::RoomId;
use crate::workers::TurnScheduler;

/// Builds the random source of a battle from its seed.
pub type RngFactory = Arc<dyn Fn(u64) -> Box<dyn BattleRng> + Send + Sync>;

type SharedRoom = Arc<Mutex<Room>>;

struct Inner {
    config: RuntimeConfig,
    model: Option<Arc<dyn DecisionProvider>>,
    rng_factory: RngFactory,
    rooms: RwLock<BTreeMap<RoomId, SharedRoom>>,
    next_subscriber: AtomicU64,
}

/// Cloneable handle to every room of the process.
///
/// Each room serializes its own mutations behind a lock; different rooms
/// never contend with each other beyond the registry lookup.
#[derive(Clone)]
pub struct RoomManager {
    inner: Arc<Inner>,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RoomManager {
    pub fn builder() -> RoomManagerBuilder {
        RoomManagerBuilder::new()
    }

    /// Allocates a fresh subscriber and the receiver its events arrive on.
    pub fn subscriber(&self) -> (Subscriber, mpsc::UnboundedReceiver<RoomMessage>) {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        Subscriber::channel(id)
    }

    /// Registers `subscriber` with the room, creating the room when absent.
    ///
    /// The subscriber receives the current snapshot, log included, before any
    /// later event.
    pub async fn join(&self, room_id: &RoomId, subscriber: Subscriber) -> Option<BattleSnapshot> {
        let shared = self.room_or_create(room_id).await;
        let mut room = shared.lock().await;
        let snapshot = room.snapshot();
        let subscriber_id = subscriber.id();
        room.bus.subscribe(subscriber, RoomEvent::State(snapshot.clone()));
        debug!(
            target: "runtime::rooms",
            room = %room_id,
            subscriber = subscriber_id,
            subscribers = room.bus.len(),
            "Subscriber joined"
        );
        snapshot
    }

    /// Unregisters a subscriber. The battle is unaffected.
    pub async fn leave(&self, room_id: &RoomId, subscriber: SubscriberId) -> Result<bool> {
        let shared = self.room(room_id).await?;
        let mut room = shared.lock().await;
        Ok(room.bus.unsubscribe(subscriber))
    }

    /// Validates a `start` payload and starts the battle it describes.
    pub async fn start(&self, room_id: &RoomId, request: StartRequest) -> Result<StartReceipt> {
        let config = request.into_config(&self.inner.config)?;
        self.start_with_config(room_id, config).await
    }

    /// Starts a battle in the room, restarting one that is in progress.
    ///
    /// A rejected configuration leaves the room untouched.
    pub async fn start_with_config(
        &self,
        room_id: &RoomId,
        mut config: BattleConfig,
    ) -> Result<StartReceipt> {
        config.validate()?;
        if config.turn_delay < self.inner.config.min_turn_delay {
            warn!(
                target: "runtime::rooms",
                room = %room_id,
                requested = ?config.turn_delay,
                applied = ?self.inner.config.min_turn_delay,
                "Turn delay below minimum, raising it"
            );
            config.turn_delay = self.inner.config.min_turn_delay;
        }

        let shared = self.room(room_id).await?;
        let mut guard = shared.lock().await;
        let room = &mut *guard;

        let restarted = room.status() == RoomStatus::AwaitingAction;
        room.halt();

        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = (self.inner.rng_factory)(seed);
        let policy = self.policy_for(room_id, &config);

        let state = BattleState::new(config.names.clone(), config.first_turn);
        let snapshot = state.snapshot();
        room.battle = Some(state);
        room.seed = Some(seed);

        let mut scheduler = TurnScheduler::new(
            room_id.clone(),
            Arc::clone(&shared),
            room.epoch,
            config,
            policy,
            rng,
        );
        scheduler.arm(room);
        room.bus.publish(RoomEvent::State(Some(snapshot)));
        room.worker = Some(tokio::spawn(scheduler.run()));

        info!(
            target: "runtime::rooms",
            room = %room_id,
            seed,
            restarted,
            "Battle started"
        );
        Ok(StartReceipt { seed, restarted })
    }

    /// Halts the battle and returns the room to idle. Stopping an idle room
    /// is a no-op.
    pub async fn stop(&self, room_id: &RoomId) -> Result<()> {
        let shared = self.room(room_id).await?;
        let mut room = shared.lock().await;
        if room.halt() {
            room.bus.publish(RoomEvent::State(None));
            info!(target: "runtime::rooms", room = %room_id, "Battle stopped");
        }
        Ok(())
    }

    /// Hands a human-controlled side's action to the room's scheduler.
    pub async fn submit_action(
        &self,
        room_id: &RoomId,
        side: Side,
        action: ActionKind,
    ) -> Result<()> {
        let shared = self.room(room_id).await?;
        let mut room = shared.lock().await;

        match room.battle.as_ref() {
            Some(state) if !state.is_over() => {}
            _ => return Err(RuntimeError::NoActiveBattle(room_id.clone())),
        }

        let Some(pending) = room.pending.take_if(|pending| pending.side == side) else {
            return Err(RuntimeError::NotAwaitingAction {
                room: room_id.clone(),
                side,
            });
        };
        pending
            .reply
            .send(action)
            .map_err(|_| RuntimeError::SchedulerGone(room_id.clone()))?;

        debug!(
            target: "runtime::rooms",
            room = %room_id,
            %side,
            %action,
            "Human action accepted"
        );
        Ok(())
    }

    /// Current snapshot of the room with its log; `None` when idle.
    pub async fn snapshot(&self, room_id: &RoomId) -> Result<Option<BattleSnapshot>> {
        let shared = self.room(room_id).await?;
        let room = shared.lock().await;
        Ok(room.snapshot())
    }

    /// Full state of the running or finished battle, log included.
    pub async fn battle_state(&self, room_id: &RoomId) -> Result<Option<BattleState>> {
        let shared = self.room(room_id).await?;
        let room = shared.lock().await;
        Ok(room.battle.clone())
    }

    pub async fn status(&self, room_id: &RoomId) -> Result<RoomStatus> {
        let shared = self.room(room_id).await?;
        let room = shared.lock().await;
        Ok(room.status())
    }

    /// Seed of the current battle.
    pub async fn seed(&self, room_id: &RoomId) -> Result<Option<u64>> {
        let shared = self.room(room_id).await?;
        let room = shared.lock().await;
        Ok(room.seed)
    }

    /// Stops the battle and removes the room with its subscribers.
    pub async fn teardown(&self, room_id: &RoomId) -> Result<()> {
        let shared = self
            .inner
            .rooms
            .write()
            .await
            .remove(room_id)
            .ok_or_else(|| RuntimeError::UnknownRoom(room_id.clone()))?;
        let mut room = shared.lock().await;
        room.halt();
        info!(target: "runtime::rooms", room = %room_id, "Room torn down");
        Ok(())
    }

    /// Tears down every room.
    pub async fn shutdown(&self) {
        let rooms = std::mem::take(&mut *self.inner.rooms.write().await);
        let count = rooms.len();
        for shared in rooms.into_values() {
            shared.lock().await.halt();
        }
        info!(target: "runtime::rooms", rooms = count, "Room manager shut down");
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.inner.rooms.read().await.keys().cloned().collect()
    }

    async fn room(&self, room_id: &RoomId) -> Result<SharedRoom> {
        self.inner
            .rooms
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownRoom(room_id.clone()))
    }

    async fn room_or_create(&self, room_id: &RoomId) -> SharedRoom {
        if let Some(shared) = self.inner.rooms.read().await.get(room_id) {
            return Arc::clone(shared);
        }
        let mut rooms = self.inner.rooms.write().await;
        Arc::clone(rooms.entry(room_id.clone()).or_insert_with(|| {
            debug!(target: "runtime::rooms", room = %room_id, "Room created");
            Arc::new(Mutex::new(Room::new(room_id.clone())))
        }))
    }

    fn policy_for(&self, room_id: &RoomId, config: &BattleConfig) -> DecisionPolicy {
        if !config.use_automated_decisions {
            return DecisionPolicy::heuristic_only();
        }
        match &self.inner.model {
            Some(model) => DecisionPolicy::new(
                Arc::clone(model),
                config.decision_throttle_n,
                self.inner.config.decision_timeout,
            ),
            None => {
                warn!(
                    target: "runtime::rooms",
                    room = %room_id,
                    "Automated decisions requested but no reasoning client is configured, using heuristic only"
                );
                DecisionPolicy::heuristic_only()
            }
        }
    }
}

/// Builder for [`RoomManager`].
pub struct RoomManagerBuilder {
    config: RuntimeConfig,
    model: Option<Arc<dyn DecisionProvider>>,
    rng_factory: RngFactory,
}

impl Default for RoomManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManagerBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            model: None,
            rng_factory: Arc::new(|seed| Box::new(PcgRng::seeded(seed)) as Box<dyn BattleRng>),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables model-backed decisions through `client`.
    pub fn reasoning_client(mut self, client: Arc<dyn ReasoningClient>) -> Self {
        self.model = Some(Arc::new(ModelProvider::new(client)));
        self
    }

    /// Replaces the model-backed provider with an arbitrary one.
    pub fn decision_provider(mut self, provider: Arc<dyn DecisionProvider>) -> Self {
        self.model = Some(provider);
        self
    }

    /// Overrides how battle random sources are built from seeds.
    pub fn rng_factory(
        mut self,
        factory: impl Fn(u64) -> Box<dyn BattleRng> + Send + Sync + 'static,
    ) -> Self {
        self.rng_factory = Arc::new(factory);
        self
    }

    pub fn build(self) -> RoomManager {
        RoomManager {
            inner: Arc::new(Inner {
                config: self.config,
                model: self.model,
                rng_factory: self.rng_factory,
                rooms: RwLock::new(BTreeMap::new()),
                next_subscriber: AtomicU64::new(1),
            }),
        }
    }
}
