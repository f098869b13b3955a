//! Effects Dispatcher — presentation команды по состоянию FSM
//!
//! Edge-triggered: анимация шлётся только при смене, roar звук — на входе в
//! Roaring, камера/отключение игрока — один раз за жизнь агента.
//! Скорость анимации (нормализованная velocity) — при изменении больше
//! `ANIMATION_SPEED_EPSILON`.
//! Команды копятся в outbox, хост (Godot/Unity) их исполняет.

use serde::{Deserialize, Serialize};

use crate::ai::components::{AnimationState, EnemyState, EnemyStateKind};
use crate::config::EnemyConfig;

pub const ANIMATION_SPEED_EPSILON: f32 = 0.05;

/// Presentation команда для хоста
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// animation player: setState(name)
    Animation(AnimationState),
    /// animator: Speed параметр + playback speed, |velocity| / speed в 0..=1
    AnimationSpeed(f32),
    /// audio: playOneShot(clip)
    PlayOneShot { clip: String },
    /// Отключить управление игроком (и сам player объект)
    DisablePlayerControl,
    /// Переключиться на jumpscare камеру
    EnableEndingCamera,
    /// Scene transition: requestLoad(scene)
    LoadScene { scene: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsDispatcher {
    current_animation: Option<AnimationState>,
    animation_speed: Option<f32>,
    ending_presented: bool,
}

impl EffectsDispatcher {
    /// Применить presentation нового состояния
    ///
    /// `previous` — состояние на начало тика (None на самом первом present).
    pub fn present(
        &mut self,
        previous: Option<EnemyStateKind>,
        state: &EnemyState,
        config: &EnemyConfig,
        out: &mut Vec<Effect>,
    ) {
        let entered = previous != Some(state.kind());

        let animation = state.animation();
        if self.current_animation != Some(animation) {
            self.current_animation = Some(animation);
            out.push(Effect::Animation(animation));
        }

        match state {
            EnemyState::Roaring { .. } if entered => {
                out.push(Effect::PlayOneShot {
                    clip: config.roar_clip.clone(),
                });
            }
            EnemyState::Ending if !self.ending_presented => {
                self.ending_presented = true;
                out.push(Effect::DisablePlayerControl);
                out.push(Effect::EnableEndingCamera);
            }
            _ => {}
        }
    }

    /// Синхронизация walk/run цикла со скоростью движения
    pub fn present_speed(&mut self, normalized: f32, out: &mut Vec<Effect>) {
        let normalized = normalized.clamp(0.0, 1.0);
        let changed = match self.animation_speed {
            None => true,
            // Края (стоим / полный ход) шлём всегда, даже если шаг меньше epsilon
            Some(last) if normalized == 0.0 || normalized == 1.0 => last != normalized,
            Some(last) => (last - normalized).abs() > ANIMATION_SPEED_EPSILON,
        };
        if changed {
            self.animation_speed = Some(normalized);
            out.push(Effect::AnimationSpeed(normalized));
        }
    }
}
