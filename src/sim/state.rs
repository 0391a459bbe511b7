//! Game state and core simulation types
//!
//! One `GameState` holds everything a single game session mutates. It is
//! rebuilt from scratch whenever a new game starts.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, Handle};
use super::rect::Rect;
use super::spawn::{self, SpawnDirector};
use super::timers::Timers;
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::InvariantViolation;

/// Lifecycle phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (lives exhausted)
    GameOver,
}

/// The player's craft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0 - PLAYER_WIDTH / 2.0, PLAYER_Y),
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Shift horizontally, clamped to the playfield
    pub fn shift(&mut self, dx: f32) {
        self.pos.x = (self.pos.x + dx).clamp(0.0, GAME_WIDTH - PLAYER_WIDTH);
    }
}

/// A player-fired bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Horizontal drift (radians-ish; 0 = straight up)
    pub angle: f32,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileKind {
    Normal,
    Fast,
}

impl HostileKind {
    pub fn points(&self) -> u64 {
        match self {
            HostileKind::Normal => NORMAL_HOSTILE_POINTS,
            HostileKind::Fast => FAST_HOSTILE_POINTS,
        }
    }
}

/// An ordinary descending enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub pos: Vec2,
    /// Descent per tick
    pub speed: f32,
    pub kind: HostileKind,
}

impl Hostile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT))
    }
}

/// Boss phase; only ever advances within one boss's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    One = 1,
    Two = 2,
    Three = 3,
}

/// The multi-phase boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    /// Resting height reached by the entry descent
    pub target_y: f32,
    pub health: i32,
    pub max_health: i32,
    pub phase: BossPhase,
    /// -1.0 (left) or +1.0 (right)
    pub direction: f32,
    /// Horizontal speed per tick once in position
    pub speed: f32,
    /// Number of phase-3 volleys fired; drives the spiral angle
    pub attack_pattern: u32,
    /// Ticks since the last volley
    pub shoot_timer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Normal,
    Spread,
    Spiral,
}

/// A projectile fired by the boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ProjectileKind,
}

impl BossProjectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(BOSS_PROJECTILE_SIZE))
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    RapidFire,
    Shield,
    Spread,
    ExtraLife,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::RapidFire,
        PowerupKind::Shield,
        PowerupKind::Spread,
        PowerupKind::ExtraLife,
    ];
}

/// A falling power-up capsule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    /// Fall speed per tick
    pub speed: f32,
}

impl Powerup {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT))
    }
}

/// Timed buffs currently in effect (extra life is applied instantly, never stored)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerups {
    pub rapid_fire: bool,
    pub shield: bool,
    pub spread: bool,
}

impl ActivePowerups {
    pub fn is_active(&self, kind: PowerupKind) -> bool {
        match kind {
            PowerupKind::RapidFire => self.rapid_fire,
            PowerupKind::Shield => self.shield,
            PowerupKind::Spread => self.spread,
            PowerupKind::ExtraLife => false,
        }
    }

    pub fn set(&mut self, kind: PowerupKind, on: bool) {
        match kind {
            PowerupKind::RapidFire => self.rapid_fire = on,
            PowerupKind::Shield => self.shield = on,
            PowerupKind::Spread => self.spread = on,
            PowerupKind::ExtraLife => {}
        }
    }
}

/// Cosmetic explosion, centered on `pos`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    /// Game clock at creation
    pub born: Duration,
}

impl Explosion {
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.born)
    }
}

/// Background star; wraps vertically
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    /// Best score this process has seen; only updated on game over
    pub high_score: u64,
    pub lives: u8,
    pub level: u32,
}

/// Something noteworthy that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    HostileDestroyed { pos: Vec2, kind: HostileKind, points: u64 },
    PowerupDropped { pos: Vec2, kind: PowerupKind },
    PowerupCollected { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
    PlayerHit { lives: u8 },
    ShieldAbsorbed,
    BossSpawned { level: u32, max_health: i32 },
    BossHit { health: i32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated { pos: Vec2, points: u64 },
    LevelUp { level: u32 },
    GameOver { score: u64, high_score: u64 },
}

/// Complete per-game simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Game clock: advances by the step length of every step run
    pub clock: Duration,
    /// Delivered play time: every frame's real elapsed time while playing.
    /// Deferred effects are due against this clock, so a slow frame rate
    /// does not stretch them. It stops while paused.
    pub timer_clock: Duration,
    pub scoreboard: Scoreboard,
    pub player: Player,
    /// Game clock time of the last shot
    pub last_shot: Option<Duration>,
    pub bullets: Arena<Bullet>,
    pub hostiles: Arena<Hostile>,
    pub boss: Option<Boss>,
    pub boss_fight: bool,
    pub boss_projectiles: Arena<BossProjectile>,
    pub powerups: Arena<Powerup>,
    pub active_powerups: ActivePowerups,
    pub explosions: Arena<Explosion>,
    pub stars: Vec<Star>,
    pub spawner: SpawnDirector,
    /// Deferred effects: powerup expiry, staggered boss drops
    pub timers: Timers,
    /// Events raised by the most recent step; cleared when the next step begins
    pub events: Vec<GameEvent>,
    /// Score when the current level began
    pub level_base_score: u64,
    next_boss_id: u32,
    /// Last phase observed for the current boss, for the regression check
    boss_phase_watermark: Option<(u32, BossPhase)>,
}

impl GameState {
    /// Fresh game: player centered, empty collections, no boss
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = spawn::make_starfield(&mut rng, config.star_count);
        let scoreboard = Scoreboard {
            score: 0,
            high_score: 0,
            lives: config.starting_lives,
            level: 1,
        };
        Self {
            seed,
            rng,
            phase: GamePhase::Start,
            time_ticks: 0,
            clock: Duration::ZERO,
            timer_clock: Duration::ZERO,
            scoreboard,
            player: Player::default(),
            last_shot: None,
            bullets: Arena::new(),
            hostiles: Arena::new(),
            boss: None,
            boss_fight: false,
            boss_projectiles: Arena::new(),
            powerups: Arena::new(),
            active_powerups: ActivePowerups::default(),
            explosions: Arena::new(),
            stars,
            spawner: SpawnDirector::new(1),
            timers: Timers::new(),
            events: Vec::new(),
            level_base_score: 0,
            next_boss_id: 1,
            boss_phase_watermark: None,
            config,
        }
    }

    /// Allocate a boss id
    pub fn next_boss_id(&mut self) -> u32 {
        let id = self.next_boss_id;
        self.next_boss_id += 1;
        id
    }

    /// Uniform sample in [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn award(&mut self, points: u64) {
        self.scoreboard.score += points;
    }

    pub fn spawn_explosion(&mut self, center: Vec2) -> Handle {
        let born = self.clock;
        self.explosions.insert(Explosion { pos: center, born })
    }

    /// Apply one life-loss hit to the player (shield absorbs it)
    pub fn hit_player(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.active_powerups.shield {
            self.events.push(GameEvent::ShieldAbsorbed);
            return;
        }
        if self.scoreboard.lives <= 1 {
            self.scoreboard.lives = 0;
            self.game_over();
        } else {
            self.scoreboard.lives -= 1;
            log::debug!("Player hit, {} lives left", self.scoreboard.lives);
            self.events.push(GameEvent::PlayerHit {
                lives: self.scoreboard.lives,
            });
        }
    }

    fn game_over(&mut self) {
        let board = &mut self.scoreboard;
        board.high_score = board.high_score.max(board.score);
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over at level {} with score {} (high score {})",
            board.level,
            board.score,
            board.high_score
        );
        self.events.push(GameEvent::GameOver {
            score: board.score,
            high_score: board.high_score,
        });
    }

    /// Move to the next level and restart the per-level bookkeeping
    pub fn advance_level(&mut self) {
        self.scoreboard.level += 1;
        self.level_base_score = self.scoreboard.score;
        self.spawner = SpawnDirector::new(self.scoreboard.level);
        log::info!("Level {}", self.scoreboard.level);
        self.events.push(GameEvent::LevelUp {
            level: self.scoreboard.level,
        });
    }

    /// Check the structural invariants of the simulation
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let board = &self.scoreboard;
        if board.lives > MAX_LIVES {
            return Err(InvariantViolation::LivesOutOfRange { lives: board.lives });
        }
        if board.lives == 0 && self.phase != GamePhase::GameOver {
            return Err(InvariantViolation::LivesZeroWithoutGameOver);
        }
        if board.level == 0 {
            return Err(InvariantViolation::LevelZero);
        }
        if self.boss.is_some() != self.boss_fight {
            return Err(InvariantViolation::BossOutsideBossFight);
        }
        if let Some(boss) = &self.boss {
            if boss.health < 0 || boss.health > boss.max_health {
                return Err(InvariantViolation::BossHealthOutOfRange {
                    health: boss.health,
                    max_health: boss.max_health,
                });
            }
            if let Some((id, phase)) = self.boss_phase_watermark {
                if id == boss.id && boss.phase < phase {
                    return Err(InvariantViolation::BossPhaseRegressed {
                        from: phase as u8,
                        to: boss.phase as u8,
                    });
                }
            }
            if !self.hostiles.is_empty() {
                return Err(InvariantViolation::HostileDuringBossFight);
            }
        }
        Ok(())
    }

    /// Remember the current boss phase for the next regression check
    pub fn record_boss_phase(&mut self) {
        self.boss_phase_watermark = self.boss.as_ref().map(|b| (b.id, b.phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 42);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.scoreboard.lives, 3);
        assert_eq!(state.scoreboard.level, 1);
        assert_eq!(state.scoreboard.score, 0);
        assert!(state.bullets.is_empty() && state.hostiles.is_empty());
        assert!(state.boss.is_none());
        assert_eq!(state.stars.len(), 50);
        assert_eq!(state.player.pos.x, GAME_WIDTH / 2.0 - PLAYER_WIDTH / 2.0);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_player_shift_is_clamped() {
        let mut player = Player::default();
        player.shift(-1000.0);
        assert_eq!(player.pos.x, 0.0);
        player.shift(1000.0);
        assert_eq!(player.pos.x, GAME_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_hit_player_decrements_lives() {
        let mut state = state();
        state.hit_player();
        assert_eq!(state.scoreboard.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::PlayerHit { lives: 2 }]);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut state = state();
        state.active_powerups.shield = true;
        state.hit_player();
        assert_eq!(state.scoreboard.lives, 3);
        assert_eq!(state.events, vec![GameEvent::ShieldAbsorbed]);
    }

    #[test]
    fn test_last_life_ends_game_and_records_high_score() {
        let mut state = state();
        state.scoreboard.lives = 1;
        state.scoreboard.score = 450;
        state.scoreboard.high_score = 300;
        state.hit_player();
        assert_eq!(state.scoreboard.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.scoreboard.high_score, 450);
        assert!(state.check_invariants().is_ok());

        // Further hits after game over change nothing
        state.hit_player();
        assert_eq!(state.scoreboard.lives, 0);
    }

    #[test]
    fn test_powerup_flags_are_independent() {
        let mut flags = ActivePowerups::default();
        flags.set(PowerupKind::Shield, true);
        flags.set(PowerupKind::Spread, true);
        flags.set(PowerupKind::ExtraLife, true);
        assert!(flags.is_active(PowerupKind::Shield));
        assert!(flags.is_active(PowerupKind::Spread));
        assert!(!flags.is_active(PowerupKind::RapidFire));
        assert!(!flags.is_active(PowerupKind::ExtraLife));
    }

    #[test]
    fn test_invariant_catches_lives_overflow() {
        let mut state = state();
        state.scoreboard.lives = 6;
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::LivesOutOfRange { lives: 6 })
        );
    }
}
