// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live offers for one request.
//!
//! The book is valid for one status epoch. Every status change of the owning
//! request starts a new epoch: the previous offers are discarded and the book
//! only accepts offers again if the new status still collects them. Providers
//! are never told to withdraw once another offer wins, so this is the only
//! way stale offers leave the view.

use crate::offer::Offer;
use crate::request::RequestStatus;

#[derive(Debug, Clone, Default)]
pub struct OfferBook {
    /// Offers in arrival order.
    offers: Vec<Offer>,
    open: bool,
    epoch: u64,
}

impl OfferBook {
    /// A closed, empty book. It opens with the first [`begin_epoch`](Self::begin_epoch).
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new epoch for `status`, discarding every known offer.
    pub fn begin_epoch(&mut self, status: RequestStatus) {
        self.offers.clear();
        self.open = status.collects_offers();
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether offers are accepted in the current epoch.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Replaces the contents with a REST list result. Ignored while closed.
    ///
    /// Offers already pushed in this epoch are kept; listed offers the book
    /// does not know yet are appended in list order.
    pub fn seed(&mut self, offers: Vec<Offer>) {
        if !self.open {
            return;
        }
        for offer in offers {
            self.insert_if_absent(offer);
        }
    }

    /// Inserts a pushed offer unless it is already known or the book is closed.
    ///
    /// Returns whether the offer was inserted.
    pub fn upsert_from_push(&mut self, offer: Offer) -> bool {
        if !self.open {
            return false;
        }
        self.insert_if_absent(offer)
    }

    fn insert_if_absent(&mut self, offer: Offer) -> bool {
        if self.contains(offer.id) {
            return false;
        }
        self.offers.push(offer);
        true
    }

    /// Removes a withdrawn offer. Returns it if it was present.
    pub fn remove(&mut self, offer_id: u64) -> Option<Offer> {
        let pos = self.offers.iter().position(|o| o.id == offer_id)?;
        Some(self.offers.remove(pos))
    }

    /// Discards every offer without changing the epoch or open state.
    pub fn reset(&mut self) {
        self.offers.clear();
    }

    pub fn contains(&self, offer_id: u64) -> bool {
        self.offers.iter().any(|o| o.id == offer_id)
    }

    pub fn get(&self, offer_id: u64) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == offer_id)
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Every offer, in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Offer> {
        self.offers.iter()
    }

    /// Pending offers, cheapest first. Equal prices keep arrival order.
    pub fn ranked(&self) -> Vec<&Offer> {
        let mut pending: Vec<&Offer> = self.offers.iter().filter(|o| o.is_pending()).collect();
        pending.sort_by(|a, b| a.estimated_price.total_cmp(&b.estimated_price));
        pending
    }

    /// The offer to highlight. A display hint only; any offer may be accepted.
    pub fn lowest(&self) -> Option<&Offer> {
        self.ranked().into_iter().next()
    }
}

#[cfg(test)]
#[path = "offer_book_tests.rs"]
mod tests;
