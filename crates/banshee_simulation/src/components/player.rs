//! Player marker component
//!
//! Враги находят игрока один раз (первый entity с `Player`), дальше держат
//! ссылку в `PlayerTarget`.

use bevy::prelude::Component;

/// Marker component для entity игрока
///
/// Позиция игрока берётся из его `Transform`. В single-player сцене
/// ровно один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
