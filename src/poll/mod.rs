//! Poll module
//!
//! Group lunch polls: a ballot of restaurants, up and down votes, and a
//! view of the ballot ordered by net score.

mod ballot;

pub use ballot::{Poll, Standing, VotableRestaurant, VoteType};
