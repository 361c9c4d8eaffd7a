mod leader;
mod swarm;
mod tally;

pub use leader::LeaderSystem;
pub use swarm::SwarmSystem;
pub use tally::TallySystem;
