//! Services composing domain rules with the group store.

pub mod formation;
pub mod matching;
