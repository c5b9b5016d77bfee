pub mod cliff_walking;

pub use cliff_walking::{CliffAction, CliffWalking};
