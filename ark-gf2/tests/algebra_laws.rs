use ark_gf2::{BitVec, LinearSystem};
use proptest::prelude::*;

fn two_vars(bits: usize) -> LinearSystem {
    LinearSystem::new([("a", bits), ("b", bits)]).unwrap()
}

proptest! {
    #[test]
    fn xor_is_commutative(bits in 1usize..32) {
        let sys = two_vars(bits);
        let a = sys.gen(0).unwrap();
        let b = sys.gen(1).unwrap();
        prop_assert_eq!(a.xor(&b).unwrap(), b.xor(&a).unwrap());
    }

    #[test]
    fn xor_is_associative(bits in 1usize..32) {
        let sys = LinearSystem::new([("a", bits), ("b", bits), ("c", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let b = sys.gen(1).unwrap();
        let c = sys.gen(2).unwrap();
        let left = a.xor(&b).unwrap().xor(&c).unwrap();
        let right = a.xor(&b.xor(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn xor_with_self_is_zero(bits in 1usize..32) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let zero = a.xor(&a).unwrap();
        for lane in zero.lanes() {
            prop_assert_eq!(lane.as_constant(), Some(false));
        }
    }

    #[test]
    fn not_is_involution(bits in 1usize..32) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        prop_assert_eq!(a.not().not(), a);
    }

    #[test]
    fn not_equals_xor_with_all_ones(bits in 1usize..32) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let all_ones = BitVec::constant(&sys, all_ones(bits), bits).unwrap();
        prop_assert_eq!(a.not(), a.xor(&all_ones).unwrap());
    }

    #[test]
    fn rotl_then_rotr_is_identity(bits in 1usize..32, amount in 0i64..64) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let roundtrip = a.rotl(amount).unwrap().rotr(amount).unwrap();
        prop_assert_eq!(roundtrip, a);
    }

    #[test]
    fn shl_then_lshr_clears_the_shifted_window(bits in 1usize..32, amount in 0i64..64) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let shifted = a.shl(amount).unwrap();
        let clamped = (amount as usize).min(bits);
        for i in 0..clamped {
            prop_assert_eq!(shifted.lane(i).as_constant(), Some(false));
        }
    }

    #[test]
    fn parity_is_invariant_under_lane_rotation(bits in 1usize..32, amount in 0i64..64) {
        let sys = LinearSystem::new([("a", bits)]).unwrap();
        let a = sys.gen(0).unwrap();
        let rotated = a.rotl(amount).unwrap();
        prop_assert_eq!(a.parity().unwrap(), rotated.parity().unwrap());
    }
}

/// Builds a `u128` with the lowest `bits` bits set, for `not`/xor-with-all-ones
/// comparisons; `bits` is always `< 32` in the properties above.
fn all_ones(bits: usize) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}
