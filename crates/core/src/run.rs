//! The top-level run context. One `Run` owns every subsystem (generator,
//! difficulty engine, telemetry, the current dungeon, the event log) and is
//! driven by discrete game events: level start, teleporter use, enemy defeat.

use thiserror::Error;

use crate::config::{ConfigError, RunConfig};
use crate::difficulty::{DifficultyEngine, DifficultyError, EnemyLoadout, LevelSummary};
use crate::dungeon::{DungeonGenerator, DungeonGraph, GeneratedDungeon, GenerationError};
use crate::rng::RunRng;
use crate::telemetry::{CombatTelemetry, WeaponClass};
use crate::types::{LinkId, LogEvent, Pos, RoomId, SpawnKind, SpawnRequest};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error("no dungeon generated yet; call begin_level first")]
    NoDungeon,
    #[error("link does not exist in the current dungeon")]
    UnknownLink,
    #[error("link is locked")]
    LinkLocked,
    #[error("room {room:?} is not an endpoint of the link")]
    RoomNotOnLink { room: RoomId },
    #[error("no live enemy cluster to take losses")]
    NoLiveCluster,
}

/// Enemy spawn batch for a freshly entered main room: where to put the
/// cluster and which difficulty slice to apply to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterSpawn {
    pub room: RoomId,
    pub loadout: EnemyLoadout,
    pub spawns: Vec<SpawnRequest>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeleportOutcome {
    pub exit_position: Pos,
    pub entered_room: RoomId,
    pub is_level_exit: bool,
    /// Present when entering a main room deeper in the chain for the first
    /// time; the room has been locked behind the player.
    pub cluster: Option<ClusterSpawn>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomClearance {
    pub room: RoomId,
    pub fairness: f32,
}

struct LiveCluster {
    room: RoomId,
    remaining: usize,
}

pub struct Run {
    config: RunConfig,
    rng: RunRng,
    generator: DungeonGenerator,
    difficulty: DifficultyEngine,
    telemetry: CombatTelemetry,
    dungeon: Option<GeneratedDungeon>,
    live_cluster: Option<LiveCluster>,
    level_index: u32,
    log: Vec<LogEvent>,
}

impl Run {
    pub fn new(seed: u64, config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = RunRng::seed_from_u64(seed);
        let difficulty = DifficultyEngine::new(&config.difficulty, &mut rng);
        let telemetry = CombatTelemetry::new(config.difficulty.player_resource_pool);
        Ok(Self {
            config,
            rng,
            generator: DungeonGenerator::new(),
            difficulty,
            telemetry,
            dungeon: None,
            live_cluster: None,
            level_index: 0,
            log: Vec::new(),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 1-based once a level is live; 0 before the first `begin_level`.
    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    pub fn graph(&self) -> Option<&DungeonGraph> {
        self.dungeon.as_ref().map(|dungeon| &dungeon.graph)
    }

    /// Static geometry spawns for the current level.
    pub fn spawn_requests(&self) -> &[SpawnRequest] {
        self.dungeon.as_ref().map(|dungeon| dungeon.spawn_requests.as_slice()).unwrap_or(&[])
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn level_summary(&self) -> LevelSummary {
        self.difficulty.level_summary()
    }

    /// Build the next level. The previous dungeon stays live and traversable
    /// if generation fails, so a failed call is retryable; on success the old
    /// graph is replaced in one step. From the second level on a successful
    /// build also advances the difficulty population, and the fresh rooms are
    /// bound to the new generation's chromosomes.
    pub fn begin_level(&mut self) -> Result<(), RunError> {
        let mut events = Vec::new();
        let generated =
            self.generator.generate(&self.config.generation, &mut self.rng, &mut events)?;

        if self.level_index > 0 {
            self.difficulty.advance_generation(&self.config.difficulty, &mut self.rng, &mut events);
        }
        self.difficulty.assign_rooms(generated.graph.main_chain());

        self.dungeon = Some(generated);
        self.live_cluster = None;
        self.level_index += 1;
        self.log.push(LogEvent::LevelStarted { level: self.level_index });
        self.log.extend(events);
        Ok(())
    }

    /// Step through a teleporter from `from` room. Entering a main room
    /// deeper in the chain than the current one locks it and returns the
    /// enemy cluster to spawn; any other traversal is a plain move.
    pub fn teleport(&mut self, link_id: LinkId, from: RoomId) -> Result<TeleportOutcome, RunError> {
        let dungeon = self.dungeon.as_mut().ok_or(RunError::NoDungeon)?;
        let link = dungeon.graph.link(link_id).ok_or(RunError::UnknownLink)?.clone();
        if link.locked {
            return Err(RunError::LinkLocked);
        }
        let exit = link.exit_for(from).ok_or(RunError::RoomNotOnLink { room: from })?;
        let entered_room = exit.room;

        let entered_sequence = dungeon.graph.sequence_index(entered_room);
        let current_sequence = dungeon
            .graph
            .current_main_room()
            .and_then(|room| dungeon.graph.sequence_index(room));
        let advances = match (entered_sequence, current_sequence) {
            (Some(entered), Some(current)) => entered > current,
            (Some(_), None) => true,
            (None, _) => false,
        };

        let mut cluster = None;
        if advances {
            dungeon.graph.set_current_main(entered_room);
            let chromosome = self
                .difficulty
                .chromosome_for(entered_room)
                .ok_or(DifficultyError::UnboundChromosome { room: entered_room })?;
            let loadout = chromosome.loadout();
            let spawns: Vec<SpawnRequest> = dungeon
                .graph
                .room(entered_room)
                .as_main()
                .map(|data| {
                    data.enemy_positions
                        .iter()
                        .map(|&pos| SpawnRequest { kind: SpawnKind::Enemy, pos, rotated: false })
                        .collect()
                })
                .unwrap_or_default();
            dungeon.graph.lock_room(entered_room);
            self.log.push(LogEvent::RoomLocked { room: entered_room });
            self.live_cluster =
                Some(LiveCluster { room: entered_room, remaining: spawns.len() });
            cluster = Some(ClusterSpawn { room: entered_room, loadout, spawns });
        }

        Ok(TeleportOutcome {
            exit_position: exit.pos,
            entered_room,
            is_level_exit: entered_room == dungeon.graph.end_room(),
            cluster,
        })
    }

    pub fn record_damage(&mut self, amount: f32, armour_absorbed: f32) {
        self.telemetry.record_damage(amount, armour_absorbed);
    }

    pub fn record_attack(&mut self, weapon: WeaponClass, time_spent: f32, was_aggressive: bool) {
        self.telemetry.record_attack(weapon, time_spent, was_aggressive);
    }

    /// One enemy of the live cluster went down. When the cluster empties the
    /// bound chromosome is scored against the room's telemetry, the room
    /// unlocks, and the clearance is reported.
    pub fn enemy_defeated(&mut self) -> Result<Option<RoomClearance>, RunError> {
        let cluster = self.live_cluster.as_mut().ok_or(RunError::NoLiveCluster)?;
        cluster.remaining -= 1;
        if cluster.remaining > 0 {
            return Ok(None);
        }

        let room = cluster.room;
        self.live_cluster = None;
        let sample = self.telemetry.take_room_sample();
        let fairness =
            self.difficulty
                .room_cleared(room, &sample, self.config.difficulty.fairness_scaling)?;
        let dungeon = self.dungeon.as_mut().ok_or(RunError::NoDungeon)?;
        dungeon.graph.mark_cleared(room);
        self.log.push(LogEvent::RoomCleared { room, fairness });
        Ok(Some(RoomClearance { room, fairness }))
    }
}
