use std::collections::{HashMap, HashSet};
use tandem_core::{ConnectionId, Member, RoomName};

#[derive(Debug)]
struct MemberEntry {
    email: String,
    rooms: HashSet<RoomName>,
}

/// Rooms that lost a member on disconnect, with whoever is still inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomName,
    pub remaining: Vec<ConnectionId>,
}

/// Room membership plus the connection ↔ identity maps.
///
/// Both views are updated by the same `&mut self` call, so they can never
/// disagree about who is connected.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomName, HashSet<ConnectionId>>,
    members: HashMap<ConnectionId, MemberEntry>,
    by_email: HashMap<String, ConnectionId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `member` to `room` and returns the members that were already there.
    pub fn join(&mut self, room: RoomName, member: Member) -> Vec<ConnectionId> {
        let Member { email, id } = member;

        let entry = self.members.entry(id.clone()).or_insert_with(|| MemberEntry {
            email: email.clone(),
            rooms: HashSet::new(),
        });
        if entry.email != email {
            if self.by_email.get(&entry.email) == Some(&id) {
                self.by_email.remove(&entry.email);
            }
            entry.email = email.clone();
        }
        entry.rooms.insert(room.clone());
        self.by_email.insert(email, id.clone());

        let occupants = self.rooms.entry(room).or_default();
        let others = occupants.iter().filter(|other| **other != id).cloned().collect();
        occupants.insert(id);
        others
    }

    /// Removes `id` from every room and from the identity maps.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Vec<Departure> {
        let Some(entry) = self.members.remove(id) else {
            return Vec::new();
        };

        if self.by_email.get(&entry.email) == Some(id) {
            self.by_email.remove(&entry.email);
        }

        let mut departures = Vec::with_capacity(entry.rooms.len());
        for room in entry.rooms {
            let Some(occupants) = self.rooms.get_mut(&room) else {
                continue;
            };
            occupants.remove(id);

            if occupants.is_empty() {
                self.rooms.remove(&room);
                departures.push(Departure {
                    room,
                    remaining: Vec::new(),
                });
            } else {
                let remaining = occupants.iter().cloned().collect();
                departures.push(Departure { room, remaining });
            }
        }
        departures
    }

    pub fn members(&self, room: &RoomName) -> Vec<Member> {
        let Some(occupants) = self.rooms.get(room) else {
            return Vec::new();
        };
        occupants
            .iter()
            .filter_map(|id| {
                self.members
                    .get(id)
                    .map(|entry| Member::new(entry.email.clone(), id.clone()))
            })
            .collect()
    }

    pub fn identity_of(&self, id: &ConnectionId) -> Option<&str> {
        self.members.get(id).map(|entry| entry.email.as_str())
    }

    pub fn connection_of(&self, email: &str) -> Option<&ConnectionId> {
        self.by_email.get(email)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
