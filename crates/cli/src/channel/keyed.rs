// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Channel identity by key.
//!
//! A [`KeyedChannel`] holds at most one live channel, opened for the current
//! key. Changing the key tears the old channel down and opens a new one;
//! clearing it stops the channel. A key whose channel finished is spent and
//! is never opened again.

use tracing::debug;

use super::live::ChannelHandle;

type Factory<K> = Box<dyn FnMut(&K) -> ChannelHandle + Send>;

pub struct KeyedChannel<K> {
    factory: Factory<K>,
    current: Option<(K, ChannelHandle)>,
    spent: Vec<K>,
}

impl<K> KeyedChannel<K>
where
    K: Clone + PartialEq + std::fmt::Debug,
{
    pub fn new(factory: impl FnMut(&K) -> ChannelHandle + Send + 'static) -> Self {
        KeyedChannel {
            factory: Box::new(factory),
            current: None,
            spent: Vec::new(),
        }
    }

    pub fn set_key(&mut self, key: Option<K>) {
        self.retire_finished();

        let unchanged = match (&self.current, &key) {
            (Some((current, _)), Some(next)) => current == next,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        if let Some((old, handle)) = self.current.take() {
            debug!(key = ?old, "closing channel");
            handle.close();
        }

        let Some(key) = key else {
            return;
        };
        if self.spent.contains(&key) {
            debug!(key = ?key, "channel key already spent, not reopening");
            return;
        }
        debug!(key = ?key, "opening channel");
        let handle = (self.factory)(&key);
        self.current = Some((key, handle));
    }

    pub fn key(&self) -> Option<&K> {
        self.current.as_ref().map(|(key, _)| key)
    }

    pub fn is_connected(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_connected())
    }

    /// Whether `key` finished and will not be reopened.
    pub fn is_spent(&self, key: &K) -> bool {
        self.spent.contains(key)
            || self
                .current
                .as_ref()
                .is_some_and(|(current, handle)| current == key && handle.is_finished())
    }

    pub fn close(&mut self) {
        self.set_key(None);
    }

    /// Closes the current channel and spends its key, without waiting for
    /// the channel task to wind down.
    pub fn finish(&mut self) {
        if let Some((key, handle)) = self.current.take() {
            debug!(key = ?key, "channel finished by owner");
            handle.close();
            if !self.spent.contains(&key) {
                self.spent.push(key);
            }
        }
    }

    fn retire_finished(&mut self) {
        if let Some((key, handle)) = &self.current {
            if handle.is_finished() && !self.spent.contains(key) {
                self.spent.push(key.clone());
            }
        }
    }
}
