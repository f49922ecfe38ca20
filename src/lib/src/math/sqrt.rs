/// Integer square root
///
/// Computes floor(√x) for any 256-bit input.

use super::wide::U256;

/// Below this the linear scan is cheaper than setting up Newton.
const LINEAR_SCAN_LIMIT: u64 = 256;

/// Returns `floor(sqrt(x))`.
///
/// Newton's method, seeded with `2^ceil(bits/2)` which is always an
/// over-estimate, so the iterates decrease monotonically until they stop
/// at the floor.
pub fn integer_sqrt(x: U256) -> U256 {
    if x < U256::from(LINEAR_SCAN_LIMIT) {
        let x = x.low_u64();
        let mut root = 0u64;
        while (root + 1) * (root + 1) <= x {
            root += 1;
        }
        return U256::from(root);
    }

    let mut z = U256::one() << ((x.bits() + 1) / 2);
    loop {
        let y = (z + x / z) >> 1usize;
        if y >= z {
            return z;
        }
        z = y;
    }
}
