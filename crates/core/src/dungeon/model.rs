//! Room, link, and generated-dungeon data model.

use std::iter;

use crate::types::{Extent, LinkId, Pos, RoomId, SpawnRequest};

use super::graph::DungeonGraph;

/// One cover slot per this many tiles of room area.
const TILES_PER_COVER_SLOT: i32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorKind {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverSpot {
    pub pos: Pos,
    pub rotated: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MainRoomData {
    /// 1-based order in the main chain.
    pub sequence_index: usize,
    pub cover_slot_count: usize,
    pub enemy_positions: Vec<Pos>,
    pub cover_spots: Vec<CoverSpot>,
    /// Every link with an endpoint inside this room, chain and branches alike.
    pub links: Vec<LinkId>,
    pub cleared: bool,
}

impl MainRoomData {
    pub fn new(sequence_index: usize, size: Extent) -> Self {
        Self {
            sequence_index,
            cover_slot_count: (size.area() / TILES_PER_COVER_SLOT) as usize,
            enemy_positions: Vec::new(),
            cover_spots: Vec::new(),
            links: Vec::new(),
            cleared: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SideRoomData {
    pub chest_pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoomKind {
    Main(MainRoomData),
    Side(SideRoomData),
    Anchor(AnchorKind),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub center: Pos,
    pub size: Extent,
    pub kind: RoomKind,
}

impl Room {
    pub fn as_main(&self) -> Option<&MainRoomData> {
        match &self.kind {
            RoomKind::Main(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn as_main_mut(&mut self) -> Option<&mut MainRoomData> {
        match &mut self.kind {
            RoomKind::Main(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkEnd {
    pub room: RoomId,
    pub pos: Pos,
}

/// A symmetric teleporter pair: entering either end exits at the other.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub ends: [LinkEnd; 2],
    pub locked: bool,
}

impl Link {
    pub fn touches(&self, room: RoomId) -> bool {
        self.ends.iter().any(|end| end.room == room)
    }

    /// The end a traveller comes out of when entering from `from` room.
    pub fn exit_for(&self, from: RoomId) -> Option<LinkEnd> {
        if self.ends[0].room == from {
            Some(self.ends[1])
        } else if self.ends[1].room == from {
            Some(self.ends[0])
        } else {
            None
        }
    }
}

/// Result of one successful generation pass: the graph plus the static
/// geometry spawns (teleporters, cover, chests, exit marker) the caller
/// should instantiate before revealing the level.
#[derive(Clone, Debug)]
pub struct GeneratedDungeon {
    pub graph: DungeonGraph,
    pub spawn_requests: Vec<SpawnRequest>,
}

impl GeneratedDungeon {
    /// Stable byte encoding for determinism fingerprints.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }

        let mut bytes = Vec::new();

        let ordered_rooms = iter::once(self.graph.start_room())
            .chain(self.graph.main_chain().iter().copied())
            .chain(iter::once(self.graph.end_room()))
            .chain(self.graph.side_rooms().iter().copied());
        for room_id in ordered_rooms {
            let room = self.graph.room(room_id);
            push_pos(&mut bytes, room.center);
            bytes.extend(room.size.width.to_le_bytes());
            bytes.extend(room.size.height.to_le_bytes());
            match &room.kind {
                RoomKind::Main(data) => {
                    bytes.push(0);
                    bytes.extend((data.sequence_index as u32).to_le_bytes());
                    bytes.extend((data.enemy_positions.len() as u32).to_le_bytes());
                    for &pos in &data.enemy_positions {
                        push_pos(&mut bytes, pos);
                    }
                    bytes.extend((data.cover_spots.len() as u32).to_le_bytes());
                    for spot in &data.cover_spots {
                        push_pos(&mut bytes, spot.pos);
                        bytes.push(u8::from(spot.rotated));
                    }
                }
                RoomKind::Side(data) => {
                    bytes.push(1);
                    push_pos(&mut bytes, data.chest_pos);
                }
                RoomKind::Anchor(AnchorKind::Start) => bytes.push(2),
                RoomKind::Anchor(AnchorKind::End) => bytes.push(3),
            }
        }

        bytes.extend((self.graph.link_count() as u32).to_le_bytes());
        for (_, link) in self.graph.links() {
            push_pos(&mut bytes, link.ends[0].pos);
            push_pos(&mut bytes, link.ends[1].pos);
            bytes.push(u8::from(link.locked));
        }

        bytes.extend((self.spawn_requests.len() as u32).to_le_bytes());
        for request in &self.spawn_requests {
            bytes.extend(request.kind.key().as_bytes());
            push_pos(&mut bytes, request.pos);
            bytes.push(u8::from(request.rotated));
        }

        bytes
    }
}
