mod money;
mod secret;

pub use money::{Fee, FeeConversionError, DEFAULT_CURRENCY};
pub use secret::Secret;
