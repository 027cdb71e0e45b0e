/// The built-in registry and the scalar built-ins: `print`, `len`,
/// `push`, `pop`, `type`, `str`, `int`, `float`, `input`, `assert`,
/// and `array`.
pub mod core;

/// The higher-order built-ins: `filter`, `map`, `reduce`, `sort`,
/// `keys`, `values`, `has`, and `reverse`. These call back into user
/// code through the evaluator's calling convention.
pub mod higher_order;

pub use core::{BUILTIN_NAMES, register};
