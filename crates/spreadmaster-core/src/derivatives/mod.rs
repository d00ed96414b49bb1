pub mod spreads;
