use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::{
    claim_seat, release_seat, Board, ClientId, Control, Direction, GameSession, Move, Phase,
    Quadrant, RuleViolation, Seat, SeatRecord, SeatStore, Side, Snapshot,
};

/// The whole mutable state of a game, as exchanged through a [`StateStore`].
///
/// Records are applied wholesale, never merged field by field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    /// Milliseconds since the epoch when the record was written.
    pub ts: u64,
    pub board: Board,
    /// Which cells hold committed markers. Derived from the board when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<Vec<bool>>,
    pub active_side: Side,
    pub phase: Phase,
    pub pending_cell: Option<usize>,
    pub pending_side: Option<Side>,
    pub selected_quadrant: Option<Quadrant>,
    pub selected_direction: Option<Direction>,
}

/// Name of a shared game room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Surrounding whitespace is ignored; an empty name means "no room".
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        match raw.trim() {
            "" => Err(SyncError::EmptyRoomId),
            name => Ok(Self(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub enum SyncError {
    EmptyRoomId,
    /// The store could not be reached.
    Unreachable,
    Json(serde_json::Error),
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::EmptyRoomId => write!(f, "The room name is empty"),
            SyncError::Unreachable => write!(f, "The room store is unreachable"),
            SyncError::Json(_) => write!(f, "Malformed data in the room store"),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Json(err)
    }
}

/// Source of wall-clock timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Remote records delivered by a [`StateStore`], in write order.
pub struct Subscription {
    rx: mpsc::Receiver<String>,
}

impl Subscription {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }

    /// The next undelivered record, without blocking.
    ///
    /// A record that fails to decode is logged and skipped.
    pub fn try_next(&self) -> Option<StateRecord> {
        loop {
            let text = self.rx.try_recv().ok()?;
            match serde_json::from_str(&text) {
                Ok(record) => return Some(record),
                Err(err) => warn!(%err, "Skipping malformed state record"),
            }
        }
    }
}

/// A real-time key-value store holding one [`StateRecord`] per room.
pub trait StateStore {
    /// Overwrites the room's state.
    fn write(&mut self, room: &RoomId, record: &StateRecord) -> Result<(), SyncError>;

    /// Stores `record` only if the room has no state yet.
    fn init_if_absent(&mut self, room: &RoomId, record: &StateRecord) -> Result<(), SyncError>;

    /// Delivers the current state (if any) and then every later write.
    fn subscribe(&mut self, room: &RoomId) -> Result<Subscription, SyncError>;
}

#[derive(Default)]
struct MemoryRoom {
    state: Option<String>,
    seats: Option<String>,
    subscribers: Vec<mpsc::Sender<String>>,
}

impl MemoryRoom {
    fn set_state(&mut self, text: String) {
        self.subscribers.retain(|tx| tx.send(text.clone()).is_ok());
        self.state = Some(text);
    }
}

#[derive(Default)]
struct MemoryInner {
    rooms: HashMap<RoomId, MemoryRoom>,
    unreachable: bool,
}

/// An in-process store. Clones share the same rooms, so two sessions holding
/// clones behave like two clients of one server.
///
/// Values are kept as JSON text, as they would be on the wire.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While unreachable, every operation fails with [`SyncError::Unreachable`].
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.borrow_mut().unreachable = !reachable;
    }

    /// The raw JSON state of a room.
    pub fn state_json(&self, room: &RoomId) -> Option<String> {
        let inner = self.inner.borrow();
        inner.rooms.get(room).and_then(|r| r.state.clone())
    }

    fn with_room<T>(
        &self,
        room: &RoomId,
        f: impl FnOnce(&mut MemoryRoom) -> Result<T, SyncError>,
    ) -> Result<T, SyncError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unreachable {
            return Err(SyncError::Unreachable);
        }
        f(inner.rooms.entry(room.clone()).or_default())
    }
}

impl StateStore for MemoryStore {
    fn write(&mut self, room: &RoomId, record: &StateRecord) -> Result<(), SyncError> {
        let text = serde_json::to_string(record)?;
        self.with_room(room, |r| {
            r.set_state(text);
            Ok(())
        })
    }

    fn init_if_absent(&mut self, room: &RoomId, record: &StateRecord) -> Result<(), SyncError> {
        let text = serde_json::to_string(record)?;
        self.with_room(room, |r| {
            if r.state.is_none() {
                r.set_state(text);
            }
            Ok(())
        })
    }

    fn subscribe(&mut self, room: &RoomId) -> Result<Subscription, SyncError> {
        self.with_room(room, |r| {
            let (tx, rx) = mpsc::channel();
            if let Some(text) = &r.state {
                // The receiver is alive, so this cannot fail
                let _ = tx.send(text.clone());
            }
            r.subscribers.push(tx);
            Ok(Subscription::new(rx))
        })
    }
}

impl SeatStore for MemoryStore {
    fn update_seats(
        &mut self,
        room: &RoomId,
        update: &mut dyn FnMut(&mut SeatRecord),
    ) -> Result<SeatRecord, SyncError> {
        self.with_room(room, |r| {
            let mut record: SeatRecord = match &r.seats {
                Some(text) => serde_json::from_str(text)?,
                None => SeatRecord::default(),
            };
            update(&mut record);
            r.seats = Some(serde_json::to_string(&record)?);
            Ok(record)
        })
    }
}

struct Connection {
    room: RoomId,
    seat: Seat,
    subscription: Subscription,
}

/// A [`GameSession`] that mirrors itself into a shared room.
///
/// Every accepted mutation is published with a fresh timestamp, and
/// [`pump()`](Self::pump) applies remote records that are not older than the
/// last local write. Without a room, or after the store fails, it is a plain
/// local session.
pub struct SyncedSession<S, C> {
    session: GameSession,
    store: S,
    clock: C,
    client: ClientId,
    connection: Option<Connection>,
    last_local_write: u64,
}

impl<S: StateStore + SeatStore, C: Clock> SyncedSession<S, C> {
    /// A local session that is not in any room yet.
    pub fn new(store: S, clock: C, client: ClientId) -> Self {
        Self {
            session: GameSession::new(),
            store,
            clock,
            client,
            connection: None,
            last_local_write: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn client(&self) -> &ClientId {
        &self.client
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.connection.as_ref().map(|c| &c.room)
    }

    /// `None` while playing locally.
    pub fn seat(&self) -> Option<Seat> {
        self.connection.as_ref().map(|c| c.seat)
    }

    /// Joins `room`: claims a seat, creates the room's state if there is none,
    /// and adopts the room's state.
    ///
    /// If the store fails, the session keeps playing locally and the error is
    /// returned for display.
    pub fn join(&mut self, room: RoomId) -> Result<Seat, SyncError> {
        self.leave();
        match self.connect(&room) {
            Ok(connection) => {
                let seat = connection.seat;
                info!(%room, ?seat, client = %self.client.0, "Joined room");
                self.session.set_control(Control::Remote(seat));
                self.connection = Some(connection);
                self.pump();
                Ok(seat)
            }
            Err(err) => {
                warn!(%room, %err, "Could not join room, playing locally");
                Err(err)
            }
        }
    }

    fn connect(&mut self, room: &RoomId) -> Result<Connection, SyncError> {
        let now = self.clock.now_ms();
        let seat = claim_seat(&mut self.store, room, &self.client, now)?;
        let subscription = self
            .store
            .init_if_absent(room, &GameSession::new().to_record(now))
            .and_then(|()| self.store.subscribe(room));
        match subscription {
            Ok(subscription) => Ok(Connection {
                room: room.clone(),
                seat,
                subscription,
            }),
            Err(err) => {
                // Don't hold a seat in a room we never entered
                if let Err(release_err) = release_seat(&mut self.store, room, &self.client) {
                    warn!(%room, err = %release_err, "Could not release seat");
                }
                Err(err)
            }
        }
    }

    /// Gives up the seat and goes back to local play. The board is kept.
    pub fn leave(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(err) = release_seat(&mut self.store, &connection.room, &self.client) {
                warn!(room = %connection.room, %err, "Could not release seat");
            }
            info!(room = %connection.room, "Left room");
        }
        self.session.set_control(Control::Hotseat);
    }

    /// Applies every pending remote record. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let Some(connection) = &self.connection else {
            return 0;
        };
        let mut applied = 0;
        while let Some(record) = connection.subscription.try_next() {
            if record.ts < self.last_local_write {
                trace!(ts = record.ts, last = self.last_local_write, "Ignoring stale record");
                continue;
            }
            match self.session.apply_record(&record) {
                Ok(()) => applied += 1,
                Err(err) => warn!(%err, ts = record.ts, "Ignoring invalid state record"),
            }
        }
        applied
    }

    /// Writes the current state to the room, if connected.
    ///
    /// Timestamps are strictly increasing, even if the clock is not.
    pub fn publish(&mut self) {
        let Some(connection) = &self.connection else {
            return;
        };
        let ts = self.clock.now_ms().max(self.last_local_write + 1);
        self.last_local_write = ts;
        let record = self.session.to_record(ts);
        match self.store.write(&connection.room, &record) {
            Ok(()) => debug!(ts, room = %connection.room, "Published state"),
            Err(err) => {
                warn!(room = %connection.room, %err, "Lost connection to room, playing locally");
                self.connection = None;
                self.session.set_control(Control::Hotseat);
            }
        }
    }

    fn published(&mut self, result: Result<(), RuleViolation>) -> Result<(), RuleViolation> {
        if result.is_ok() {
            self.publish();
        }
        result
    }

    pub fn select_cell(&mut self, cell: usize) -> Result<(), RuleViolation> {
        let result = self.session.select_cell(cell);
        self.published(result)
    }

    pub fn select_rotation(
        &mut self,
        quadrant: Quadrant,
        direction: Direction,
    ) -> Result<(), RuleViolation> {
        let result = self.session.select_rotation(quadrant, direction);
        self.published(result)
    }

    pub fn commit(&mut self) -> Result<(), RuleViolation> {
        let result = self.session.commit();
        self.published(result)
    }

    pub fn play(&mut self, mv: Move) -> Result<(), RuleViolation> {
        let result = self.session.play(mv);
        self.published(result)
    }

    pub fn undo(&mut self) -> Result<(), RuleViolation> {
        let result = self.session.undo();
        self.published(result)
    }

    pub fn reset(&mut self) -> Result<(), RuleViolation> {
        let result = self.session.reset();
        self.published(result)
    }
}
