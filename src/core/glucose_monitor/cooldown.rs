//! Notification cooldown.
//!
//! Every out-of-range sample is audited, but a condition that persists across
//! many ticks must not page the recipients once per tick. The gate remembers
//! the last notified classification and when it was notified, and only lets a
//! repeat of the same classification through once the cooldown has elapsed.
//! A change of classification always passes.

use std::time::Duration;

use chrono::{DateTime, Local};

use super::types::Classification;

/// Decides whether a notification attempt is permitted right now
#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown: Duration,
    last_notified: Option<(Classification, DateTime<Local>)>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_notified: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Change the window length, keeping the notification history
    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    pub fn last_notified(&self) -> Option<(Classification, DateTime<Local>)> {
        self.last_notified
    }

    /// Check the gate and, when permitted, record the attempt before returning.
    ///
    /// A permitted attempt counts against the window whether or not the send
    /// later succeeds.
    pub fn should_notify(&mut self, classification: Classification, now: DateTime<Local>) -> bool {
        if !classification.is_alert() {
            return false;
        }

        let permitted = match self.last_notified {
            None => true,
            Some((last, _)) if last != classification => true,
            Some((_, last_at)) => match now.signed_duration_since(last_at).to_std() {
                Ok(elapsed) => elapsed >= self.cooldown,
                // Clock moved backwards; the window cannot be measured
                Err(_) => true,
            },
        };

        if permitted {
            self.last_notified = Some((classification, now));
        } else {
            log::debug!(
                "Suppressing {} notification, last one sent at {}",
                classification,
                self.last_notified
                    .map(|(_, at)| at.to_rfc3339())
                    .unwrap_or_default()
            );
        }

        permitted
    }
}
