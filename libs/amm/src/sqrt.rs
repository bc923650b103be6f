//! Newton-Raphson integer square root
//!
//! Reproduces the exact iteration used for first-deposit share issuance:
//!
//! ```text
//! y = x
//! z = (x + 1) / 2
//! while z < y { y = z; z = (x / z + z) / 2 }
//! return y
//! ```
//!
//! The result is `floor(sqrt(x))`.

use pool_types::U256;

/// Floor of the square root of `x`
pub fn integer_sqrt(x: U256) -> U256 {
    if x.is_zero() {
        return U256::zero();
    }

    // (x + 1) / 2 without the overflow at U256::MAX
    let two = U256::from(2);
    let mut y = x;
    let mut z = x / two + x % two;

    while z < y {
        y = z;
        z = (x / z + z) / two;
    }

    y
}
