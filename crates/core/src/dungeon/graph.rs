//! Graph ownership: rooms, teleporter links, chain order, and the
//! lock/unlock protocol driven by room combat state.

use slotmap::SlotMap;

use crate::types::{LinkId, RoomId};

use super::layout;
use super::model::{AnchorKind, Link, LinkEnd, Room, RoomKind};

#[derive(Clone, Debug)]
pub struct DungeonGraph {
    rooms: SlotMap<RoomId, Room>,
    links: SlotMap<LinkId, Link>,
    main_chain: Vec<RoomId>,
    side_rooms: Vec<RoomId>,
    start_room: RoomId,
    end_room: RoomId,
    /// None until the player enters the first main room (the "no active
    /// room" sentinel); always advances monotonically along the chain.
    current_main: Option<RoomId>,
}

impl DungeonGraph {
    pub(super) fn empty() -> Self {
        Self {
            rooms: SlotMap::with_key(),
            links: SlotMap::with_key(),
            main_chain: Vec::new(),
            side_rooms: Vec::new(),
            start_room: RoomId::default(),
            end_room: RoomId::default(),
            current_main: None,
        }
    }

    pub(super) fn add_room(&mut self, room: Room) -> RoomId {
        let id = self.rooms.insert(room);
        match &self.rooms[id].kind {
            RoomKind::Main(_) => self.main_chain.push(id),
            RoomKind::Side(_) => self.side_rooms.push(id),
            RoomKind::Anchor(AnchorKind::Start) => self.start_room = id,
            RoomKind::Anchor(AnchorKind::End) => self.end_room = id,
        }
        id
    }

    /// Create the teleporter pair joining two rooms and register it with any
    /// main-room endpoint. Only main rooms take part in the lock protocol.
    pub(super) fn connect(&mut self, from: RoomId, to: RoomId) -> LinkId {
        let (near, far) = {
            let from_room = &self.rooms[from];
            let to_room = &self.rooms[to];
            layout::corridor_endpoints(
                from_room.center,
                from_room.size,
                to_room.center,
                to_room.size,
            )
        };
        let link = Link {
            ends: [LinkEnd { room: from, pos: near }, LinkEnd { room: to, pos: far }],
            locked: false,
        };
        let id = self.links.insert(link);
        for room_id in [from, to] {
            if let Some(data) = self.rooms[room_id].as_main_mut() {
                data.links.push(id);
            }
        }
        id
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id]
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> {
        self.links.iter()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Main rooms in sequence order; anchors are not part of the chain.
    pub fn main_chain(&self) -> &[RoomId] {
        &self.main_chain
    }

    pub fn side_rooms(&self) -> &[RoomId] {
        &self.side_rooms
    }

    pub fn start_room(&self) -> RoomId {
        self.start_room
    }

    pub fn end_room(&self) -> RoomId {
        self.end_room
    }

    pub fn current_main_room(&self) -> Option<RoomId> {
        self.current_main
    }

    pub(crate) fn set_current_main(&mut self, room: RoomId) {
        self.current_main = Some(room);
    }

    pub fn sequence_index(&self, room: RoomId) -> Option<usize> {
        self.rooms[room].as_main().map(|data| data.sequence_index)
    }

    /// Disable traversal on every link touching the room.
    pub fn lock_room(&mut self, room: RoomId) {
        self.set_room_locks(room, true);
    }

    pub fn unlock_room(&mut self, room: RoomId) {
        self.set_room_locks(room, false);
    }

    /// Room combat finished: reopen its exits and record the clear.
    pub(crate) fn mark_cleared(&mut self, room: RoomId) {
        if let Some(data) = self.rooms[room].as_main_mut() {
            data.cleared = true;
        }
        self.unlock_room(room);
    }

    fn set_room_locks(&mut self, room: RoomId, locked: bool) {
        let registered = match self.rooms[room].as_main() {
            Some(data) => data.links.clone(),
            None => return,
        };
        for link_id in registered {
            self.links[link_id].locked = locked;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Extent, Pos};

    use super::super::model::MainRoomData;
    use super::*;

    fn main_room(sequence_index: usize, center: Pos) -> Room {
        let size = Extent::square(20);
        Room { center, size, kind: RoomKind::Main(MainRoomData::new(sequence_index, size)) }
    }

    fn two_room_graph() -> (DungeonGraph, RoomId, RoomId, LinkId) {
        let mut graph = DungeonGraph::empty();
        let first = graph.add_room(main_room(1, Pos::ORIGIN));
        let second = graph.add_room(main_room(2, Pos { y: 0, x: 30 }));
        let link = graph.connect(first, second);
        (graph, first, second, link)
    }

    #[test]
    fn connect_registers_the_link_with_both_main_endpoints() {
        let (graph, first, second, link) = two_room_graph();
        for room in [first, second] {
            let data = graph.room(room).as_main().expect("main room");
            assert_eq!(data.links, vec![link]);
        }
    }

    #[test]
    fn link_traversal_is_symmetric() {
        let (graph, first, second, link_id) = two_room_graph();
        let link = graph.link(link_id).expect("link exists");

        let forward = link.exit_for(first).expect("first is an endpoint");
        let backward = link.exit_for(forward.room).expect("round trip");
        assert_eq!(forward.room, second);
        assert_eq!(backward.room, first);
    }

    #[test]
    fn locking_a_room_toggles_every_registered_link() {
        let (mut graph, first, _, link_id) = two_room_graph();
        graph.lock_room(first);
        assert!(graph.link(link_id).expect("link").locked);
        graph.mark_cleared(first);
        assert!(!graph.link(link_id).expect("link").locked);
        assert!(graph.room(first).as_main().expect("main").cleared);
    }

    #[test]
    fn anchors_do_not_take_part_in_the_lock_protocol() {
        let mut graph = DungeonGraph::empty();
        let start = graph.add_room(Room {
            center: Pos::ORIGIN,
            size: Extent::square(10),
            kind: RoomKind::Anchor(AnchorKind::Start),
        });
        let main = graph.add_room(main_room(1, Pos { y: 30, x: 0 }));
        let link = graph.connect(start, main);

        graph.lock_room(start);
        assert!(!graph.link(link).expect("link").locked, "anchor locking is a no-op");
        graph.lock_room(main);
        assert!(graph.link(link).expect("link").locked);
    }
}
