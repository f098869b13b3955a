//! Ending Sequencer — jumpscare countdown → одна загрузка сцены
//!
//! One-shot `Timer`, тикается dt хоста (не wall clock): пауза хоста = пауза
//! отсчёта. Отмены нет — запущенный ending доигрывается до конца.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndingSequencer {
    countdown: Option<Timer>,
    scene_requested: bool,
}

impl EndingSequencer {
    /// `isEndingSequenceActive`
    pub fn is_active(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn scene_requested(&self) -> bool {
        self.scene_requested
    }

    /// Запуск countdown'а. Идемпотентно: true только на первом вызове.
    pub fn begin(&mut self, duration_secs: f32) -> bool {
        if self.countdown.is_some() {
            return false;
        }
        let duration =
            Duration::try_from_secs_f32(duration_secs.max(0.0)).unwrap_or(Duration::MAX);
        self.countdown = Some(Timer::new(duration, TimerMode::Once));
        true
    }

    /// true ровно один раз — на тике, когда countdown истёк
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.scene_requested {
            return false;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return false;
        };

        // Шаг не больше остатка: огромный dt не переполняет Duration
        let step = Duration::try_from_secs_f32(dt.max(0.0))
            .unwrap_or(Duration::MAX)
            .min(countdown.remaining());
        countdown.tick(step);
        if countdown.finished() {
            self.scene_requested = true;
            return true;
        }
        false
    }

    pub fn remaining_secs(&self) -> Option<f32> {
        self.countdown.as_ref().map(Timer::remaining_secs)
    }
}
