pub mod growth;
pub mod margin;
pub mod spreads;
