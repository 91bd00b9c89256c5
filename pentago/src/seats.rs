use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{RoomId, Side, SyncError};

/// Identifies one client across reconnects.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    /// A random id of the form `c_<hex>_<hex>`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("c_{:x}_{:x}", rng.gen::<u64>(), rng.gen::<u32>()))
    }
}

/// What a client may do in a networked room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Dark,
    Light,
    Spectator,
}

impl Seat {
    /// The side this seat plays, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Seat::Dark => Some(Side::Dark),
            Seat::Light => Some(Side::Light),
            Seat::Spectator => None,
        }
    }
}

/// The shared record of who sits where, as kept in the room store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<ClientId>,
    /// When the dark seat was taken, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_dark: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_light: Option<u64>,
}

impl SeatRecord {
    pub fn seat_of(&self, client: &ClientId) -> Seat {
        if self.dark.as_ref() == Some(client) {
            Seat::Dark
        } else if self.light.as_ref() == Some(client) {
            Seat::Light
        } else {
            Seat::Spectator
        }
    }

    /// First come, first served: a client keeps a seat it already holds,
    /// otherwise takes dark, then light, and spectates if both are taken.
    ///
    /// This is the body of the compare-and-swap transaction on the record.
    pub fn claim(&mut self, client: &ClientId, now: u64) -> Seat {
        match self.seat_of(client) {
            Seat::Spectator => {}
            seat => return seat,
        }
        if self.dark.is_none() {
            self.dark = Some(client.clone());
            self.t_dark = Some(now);
            Seat::Dark
        } else if self.light.is_none() {
            self.light = Some(client.clone());
            self.t_light = Some(now);
            Seat::Light
        } else {
            Seat::Spectator
        }
    }

    /// Frees whatever seat the client holds, e.g. when it disconnects.
    pub fn release(&mut self, client: &ClientId) {
        match self.seat_of(client) {
            Seat::Dark => {
                self.dark = None;
                self.t_dark = None;
            }
            Seat::Light => {
                self.light = None;
                self.t_light = None;
            }
            Seat::Spectator => {}
        }
    }
}

/// A store that can update a room's [`SeatRecord`] atomically.
pub trait SeatStore {
    /// Runs `update` on the current record (default if absent) and stores the
    /// result atomically with respect to other clients. Returns the stored record.
    fn update_seats(
        &mut self,
        room: &RoomId,
        update: &mut dyn FnMut(&mut SeatRecord),
    ) -> Result<SeatRecord, SyncError>;
}

/// Claims a seat in `room` and reports which one the client ended up with.
pub fn claim_seat<S: SeatStore + ?Sized>(
    store: &mut S,
    room: &RoomId,
    client: &ClientId,
    now: u64,
) -> Result<Seat, SyncError> {
    let record = store.update_seats(room, &mut |record: &mut SeatRecord| {
        record.claim(client, now);
    })?;
    Ok(record.seat_of(client))
}

pub fn release_seat<S: SeatStore + ?Sized>(
    store: &mut S,
    room: &RoomId,
    client: &ClientId,
) -> Result<(), SyncError> {
    store.update_seats(room, &mut |record: &mut SeatRecord| record.release(client))?;
    Ok(())
}
