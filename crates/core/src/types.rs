use slotmap::new_key_type;

new_key_type! {
    pub struct RoomId;
    pub struct LinkId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { y: 0, x: 0 };

    pub fn squared_distance(self, other: Pos) -> i32 {
        let dy = self.y - other.y;
        let dx = self.x - other.x;
        dy * dy + dx * dx
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub fn square(side: i32) -> Self {
        Self { width: side, height: side }
    }

    pub fn area(self) -> i32 {
        self.width * self.height
    }
}

/// The four axis-aligned unit steps; all room placement moves along one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn step(self, from: Pos, distance: i32) -> Pos {
        match self {
            Direction::North => Pos { y: from.y + distance, x: from.x },
            Direction::East => Pos { y: from.y, x: from.x + distance },
            Direction::South => Pos { y: from.y - distance, x: from.x },
            Direction::West => Pos { y: from.y, x: from.x - distance },
        }
    }
}

/// Logical entity kinds the core asks the caller to instantiate. The caller
/// owns the entity pool and the handles it returns; the core only names kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpawnKind {
    Teleporter,
    Chest,
    Cover,
    FloorExit,
    Enemy,
}

impl SpawnKind {
    pub fn key(self) -> &'static str {
        match self {
            SpawnKind::Teleporter => "teleporter",
            SpawnKind::Chest => "chest",
            SpawnKind::Cover => "cover",
            SpawnKind::FloorExit => "floor_exit",
            SpawnKind::Enemy => "rifle_enemy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnRequest {
    pub kind: SpawnKind,
    pub pos: Pos,
    /// Cover pieces alternate a 90-degree rotation for visual variety only.
    pub rotated: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    LevelStarted { level: u32 },
    DungeonGenerated { main_rooms: usize, side_rooms: usize, links: usize },
    NavigationRebuildRequested,
    RoomUnderPopulated { room_index: usize, enemies_placed: usize, cover_placed: usize, cover_requested: usize },
    RoomLocked { room: RoomId },
    RoomCleared { room: RoomId, fairness: f32 },
    PopulationEvolved { generation: u32, elites_retained: usize },
}
