//! Demo intent source
//!
//! Plays the game from snapshots alone, the way an input collaborator would:
//! dodge incoming boss fire, grab powerups when nothing is close, otherwise
//! line up under the most dangerous target. Always holds the trigger.

use crate::consts::*;
use crate::sim::TickInput;
use crate::snapshot::Snapshot;

/// How far above the player boss projectiles start to matter
const DANGER_HEIGHT: f32 = 140.0;
/// Close enough horizontally; stops jitter around the target
const DEADZONE: f32 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Ticks spent committed to the current dodge direction
    dodge_ticks: u32,
    dodge_left: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(&mut self, snap: &Snapshot) -> TickInput {
        let player_cx = snap.player.x + PLAYER_WIDTH / 2.0;
        let mut input = TickInput {
            fire: true,
            ..Default::default()
        };

        if let Some(left) = self.dodge(snap, player_cx) {
            input.move_left = left;
            input.move_right = !left;
            return input;
        }

        if let Some(target_x) = self.target(snap, player_cx) {
            let dx = target_x - player_cx;
            if dx < -DEADZONE {
                input.move_left = true;
            } else if dx > DEADZONE {
                input.move_right = true;
            }
        }
        input
    }

    /// Direction to dodge in, if any boss projectile is about to land on us
    fn dodge(&mut self, snap: &Snapshot, player_cx: f32) -> Option<bool> {
        let threat = snap.boss_projectiles.iter().find(|p| {
            let px = p.pos.x + BOSS_PROJECTILE_SIZE / 2.0;
            p.pos.y > PLAYER_Y - DANGER_HEIGHT
                && p.pos.y < PLAYER_Y + PLAYER_HEIGHT
                && (px - player_cx).abs() < PLAYER_WIDTH
        });

        let Some(threat) = threat else {
            self.dodge_ticks = 0;
            return None;
        };

        if self.dodge_ticks == 0 {
            let threat_x = threat.pos.x + BOSS_PROJECTILE_SIZE / 2.0;
            let room_left = snap.player.x;
            let room_right = GAME_WIDTH - PLAYER_WIDTH - snap.player.x;
            self.dodge_left = if threat_x > player_cx {
                room_left > PLAYER_WIDTH || room_right < PLAYER_WIDTH
            } else {
                room_right < PLAYER_WIDTH
            };
        }
        self.dodge_ticks += 1;
        Some(self.dodge_left)
    }

    fn target(&self, snap: &Snapshot, player_cx: f32) -> Option<f32> {
        let hostile_close = snap
            .hostiles
            .iter()
            .any(|h| h.pos.y > PLAYER_Y - 150.0);

        if !hostile_close {
            let powerup = snap
                .powerups
                .iter()
                .filter(|p| p.pos.y < PLAYER_Y + PLAYER_HEIGHT)
                .min_by(|a, b| {
                    let da = (a.pos.x + POWERUP_WIDTH / 2.0 - player_cx).abs();
                    let db = (b.pos.x + POWERUP_WIDTH / 2.0 - player_cx).abs();
                    da.total_cmp(&db)
                });
            if let Some(p) = powerup {
                return Some(p.pos.x + POWERUP_WIDTH / 2.0);
            }
        }

        if let Some(boss) = &snap.boss {
            return Some(boss.pos.x + BOSS_WIDTH / 2.0);
        }

        // Lowest hostile is the most urgent
        snap.hostiles
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|h| h.pos.x + ENEMY_WIDTH / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{BossProjectile, GamePhase, GameState, Hostile, HostileKind, ProjectileKind};
    use glam::Vec2;

    fn snapshot_with(edit: impl FnOnce(&mut GameState)) -> Snapshot {
        let mut state = GameState::new(GameConfig::default(), 4);
        state.phase = GamePhase::Playing;
        edit(&mut state);
        Snapshot::capture(&state, &[])
    }

    #[test]
    fn test_always_fires() {
        let snap = snapshot_with(|_| {});
        let input = Autopilot::new().decide(&snap);
        assert!(input.fire);
        assert!(!input.pause);
    }

    #[test]
    fn test_lines_up_under_hostile() {
        let snap = snapshot_with(|s| {
            s.hostiles.insert(Hostile {
                pos: Vec2::new(10.0, 100.0),
                speed: 2.0,
                kind: HostileKind::Normal,
            });
        });
        let input = Autopilot::new().decide(&snap);
        assert!(input.move_left && !input.move_right);
    }

    #[test]
    fn test_dodges_incoming_fire() {
        let snap = snapshot_with(|s| {
            let p = s.player.pos;
            s.boss_projectiles.insert(BossProjectile {
                pos: Vec2::new(p.x + 30.0, p.y - 40.0),
                vel: Vec2::new(0.0, 4.0),
                kind: ProjectileKind::Normal,
            });
        });
        let input = Autopilot::new().decide(&snap);
        assert!(input.move_left, "threat on the right, dodge left");
    }
}
