//! ECS Components для игровых entity
//!
//! - player: marker игрока (Player)
//! - enemy: PlayerTarget, SightingHints, EnemyStatus

pub mod enemy;
pub mod player;

pub use enemy::*;
pub use player::*;
