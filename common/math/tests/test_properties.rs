//! Property-based coverage of the fixed-point round-trip invariant from
//! spec §8, property 7: `rayToWad(wadToRay(x)) == x` for any wad `x`.

use common_constants::{RAY, WAD};
use common_math::{ray_to_wad, wad_to_ray};
use proptest::prelude::*;

proptest! {
    #[test]
    fn wad_ray_round_trip(x in 0u128..=(u128::MAX / (RAY / WAD))) {
        let ray = wad_to_ray(x).expect("x is bounded to avoid overflow");
        prop_assert_eq!(ray_to_wad(ray), x);
    }

    #[test]
    fn ray_to_wad_never_panics(x in any::<u128>()) {
        let _ = ray_to_wad(x);
    }
}
