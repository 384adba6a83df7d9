mod rapier;

pub use rapier::RapierWorld;
