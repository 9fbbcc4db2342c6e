//! Combat telemetry reported by the external combat layer. Accumulates one
//! room's worth of evidence at a time; the difficulty engine drains it when
//! the room's cluster empties.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeaponClass {
    Rifle,
    Smg,
    Shotgun,
    Melee,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomCombatSample {
    /// Fraction of the player's health + armour pool lost in the room.
    pub effectiveness: f32,
    /// Share of attack time spent fighting at close quarters, in `[0, 1]`.
    pub aggression: f32,
}

pub struct CombatTelemetry {
    resource_pool: f32,
    pool_lost: f32,
    aggressive_attack_time: f32,
    total_attack_time: f32,
}

impl CombatTelemetry {
    pub fn new(resource_pool: f32) -> Self {
        Self {
            resource_pool,
            pool_lost: 0.0,
            aggressive_attack_time: 0.0,
            total_attack_time: 0.0,
        }
    }

    /// `amount` is health damage after armour; `armour_absorbed` is the share
    /// the armour soaked. Both count against the combined pool.
    pub fn record_damage(&mut self, amount: f32, armour_absorbed: f32) {
        self.pool_lost += amount + armour_absorbed;
    }

    pub fn record_attack(&mut self, weapon: WeaponClass, time_spent: f32, was_aggressive: bool) {
        // Melee is inherently aggressive regardless of what the caller reports.
        if was_aggressive || weapon == WeaponClass::Melee {
            self.aggressive_attack_time += time_spent;
        }
        self.total_attack_time += time_spent;
    }

    pub fn effectiveness(&self) -> f32 {
        self.pool_lost / self.resource_pool
    }

    /// 0.5 (balanced) until any attack time has been reported.
    pub fn aggression(&self) -> f32 {
        if self.total_attack_time <= 0.0 {
            return 0.5;
        }
        self.aggressive_attack_time / self.total_attack_time
    }

    /// Snapshot the current room's evidence and reset for the next room.
    pub fn take_room_sample(&mut self) -> RoomCombatSample {
        let sample =
            RoomCombatSample { effectiveness: self.effectiveness(), aggression: self.aggression() };
        self.pool_lost = 0.0;
        self.aggressive_attack_time = 0.0;
        self.total_attack_time = 0.0;
        sample
    }
}
