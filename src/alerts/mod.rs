//! Alert synthesis (spec §4.8) and alternate-supplier ranking (§4.9).

pub mod ranker;
pub mod synth;
