mod consensus;
pub mod evaluate;
mod params;
pub mod pwm;
pub mod sampler;
pub mod scoring;
mod search;
pub mod simulate;

pub use consensus::majority;
pub use evaluate::{count_recovered, planted_starts};
pub use params::{InitStrategy, SamplerParams};
pub use pwm::{Pwm, Sign};
pub use sampler::{GibbsSampler, SamplerRun, SamplerState, Snapshot};
pub use search::{run_restart, search, MotifResult};
pub use simulate::{simulate, SimulatedSet};
