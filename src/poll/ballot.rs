//! Poll, votable restaurants and vote tallies

use crate::error::{Error, Result};
use crate::upstream::Listing;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    /// Want to go
    Up,
    /// Rather not
    Down,
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteType::Up => f.write_str("up"),
            VoteType::Down => f.write_str("down"),
        }
    }
}

/// One restaurant on the ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotableRestaurant {
    /// Display name, unique within a poll (case-insensitive)
    pub name: String,
    /// Up votes received
    #[serde(default)]
    pub up_votes: u32,
    /// Down votes received
    #[serde(default)]
    pub down_votes: u32,
}

impl VotableRestaurant {
    /// A restaurant with no votes yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up_votes: 0,
            down_votes: 0,
        }
    }

    /// Net score: up votes minus down votes
    pub fn total_votes(&self) -> i64 {
        i64::from(self.up_votes) - i64::from(self.down_votes)
    }
}

/// A restaurant with its stable ballot position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing<'a> {
    /// Position to pass to [`Poll::vote`]
    pub position: usize,
    /// The restaurant
    pub restaurant: &'a VotableRestaurant,
}

/// A group lunch poll
///
/// Ballot positions are insertion order and never change, so a position
/// taken from [`Poll::standings`] stays valid while other votes arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Poll title
    #[serde(default)]
    pub title: String,
    /// Ballot, in insertion order
    #[serde(default)]
    restaurants: Vec<VotableRestaurant>,
}

impl Poll {
    /// Create an empty poll
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            restaurants: Vec::new(),
        }
    }

    /// Restaurants in ballot order
    pub fn restaurants(&self) -> &[VotableRestaurant] {
        &self.restaurants
    }

    /// Number of restaurants on the ballot
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the ballot is empty
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Add a restaurant by name and return its ballot position
    pub fn add_restaurant(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_poll("restaurant name is empty"));
        }
        if self
            .restaurants
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::invalid_poll(format!(
                "'{name}' is already on the ballot"
            )));
        }

        self.restaurants.push(VotableRestaurant::new(name));
        debug!(poll = %self.title, restaurant = name, "Added restaurant to poll");
        Ok(self.restaurants.len() - 1)
    }

    /// Add a fetched listing by its name
    pub fn add_listing(&mut self, listing: &Listing) -> Result<usize> {
        let name = listing
            .name()
            .ok_or_else(|| Error::invalid_poll("listing has no name"))?;
        self.add_restaurant(name)
    }

    /// Record one vote for the restaurant at `position`
    pub fn vote(&mut self, vote_type: VoteType, position: usize) -> Result<&VotableRestaurant> {
        let len = self.restaurants.len();
        let restaurant = self
            .restaurants
            .get_mut(position)
            .ok_or(Error::InvalidPosition { position, len })?;

        match vote_type {
            VoteType::Up => restaurant.up_votes = restaurant.up_votes.saturating_add(1),
            VoteType::Down => restaurant.down_votes = restaurant.down_votes.saturating_add(1),
        }
        debug!(
            restaurant = %restaurant.name,
            vote = %vote_type,
            total = restaurant.total_votes(),
            "Vote recorded"
        );
        Ok(restaurant)
    }

    /// Restaurants by descending net score; ties keep ballot order
    pub fn standings(&self) -> Vec<Standing<'_>> {
        let mut standings: Vec<Standing<'_>> = self
            .restaurants
            .iter()
            .enumerate()
            .map(|(position, restaurant)| Standing {
                position,
                restaurant,
            })
            .collect();
        standings.sort_by_key(|s| std::cmp::Reverse(s.restaurant.total_votes()));
        standings
    }

    /// Current leader, if any restaurant is on the ballot
    pub fn leader(&self) -> Option<&VotableRestaurant> {
        self.standings().first().map(|s| s.restaurant)
    }
}
