//! Distribution validation
//!
//! Statistical checks that the distribution shapes and weighted choices
//! behave the way they claim to, with wide enough margins to stay
//! deterministic under the fixed seeds used here.

use bramble::*;

/// Property: frequency respects its weights
pub fn test_frequency_weights() {
    let gen = Gen::frequency(vec![(9, Gen::constant("common")), (1, Gen::constant("rare"))]);

    let mut common = 0;
    let mut seed = Seed::from_u64(40);
    for _ in 0..500 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(10), generation_seed).unwrap();
        if tree.value == "common" {
            common += 1;
        }
    }

    // Expect roughly 450 of 500; fail only on gross bias.
    assert!(
        (350..=500).contains(&common),
        "9:1 weighting produced {common}/500 common values"
    );
    println!("✓ Frequency weights property passed");
}

/// Property: one_of covers every alternative
pub fn test_one_of_coverage() {
    let gen = Gen::one_of(vec![Gen::constant(1), Gen::constant(2), Gen::constant(3)]);

    let mut counts = [0usize; 3];
    let mut seed = Seed::from_u64(41);
    for _ in 0..300 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(10), generation_seed).unwrap();
        counts[(tree.value - 1) as usize] += 1;
    }

    for (index, count) in counts.iter().enumerate() {
        assert!(
            *count > 30,
            "alternative {} chosen only {count}/300 times",
            index + 1
        );
    }
    println!("✓ One-of coverage property passed");
}

/// Property: linear ranges stay near the origin at size zero and reach the
/// full range at size one hundred
pub fn test_linear_distribution_scaling() {
    let gen = Gen::int(Range::linear(0, 1000));

    let mut seed = Seed::from_u64(42);
    for _ in 0..100 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(0), generation_seed).unwrap();
        assert_eq!(tree.value, 0, "size 0 must pin a linear range to its origin");
    }

    let mut seen_large = false;
    let mut seed = Seed::from_u64(43);
    for _ in 0..200 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(100), generation_seed).unwrap();
        assert!((0..=1000).contains(&tree.value));
        if tree.value > 500 {
            seen_large = true;
        }
    }
    assert!(
        seen_large,
        "a linear range at size 100 must cover the upper half"
    );
    println!("✓ Linear distribution scaling property passed");
}

/// Property: exponential ranges grow slower than linear ones
pub fn test_exponential_distribution_scaling() {
    let gen = Gen::int(Range::exponential(0, 1_000_000));

    // At size 10 the factor is (10/100)^2 = 0.01, so values stay within
    // one percent of the range.
    let mut seed = Seed::from_u64(44);
    for _ in 0..100 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(10), generation_seed).unwrap();
        assert!(
            tree.value <= 10_000,
            "exponential range at size 10 produced {}",
            tree.value
        );
    }
    println!("✓ Exponential distribution scaling property passed");
}

/// Property: constant ranges always produce the origin
pub fn test_constant_distribution() {
    let gen = Gen::int(Range::constant(17));

    let mut seed = Seed::from_u64(45);
    for _ in 0..50 {
        let (generation_seed, next) = seed.split();
        seed = next;
        let tree = gen.generate(Size::new(90), generation_seed).unwrap();
        assert_eq!(tree.value, 17);
        assert!(!tree.has_shrinks());
    }
    println!("✓ Constant distribution property passed");
}

/// Property: optional generates None roughly half the time at size zero and
/// rarely at size one hundred
pub fn test_optional_probability_scales_with_size() {
    let gen = Gen::int_range(0, 10).optional();

    let mut nones_small = 0;
    let mut seed = Seed::from_u64(46);
    for _ in 0..400 {
        let (generation_seed, next) = seed.split();
        seed = next;
        if gen
            .generate(Size::new(0), generation_seed)
            .unwrap()
            .value
            .is_none()
        {
            nones_small += 1;
        }
    }

    let mut nones_large = 0;
    let mut seed = Seed::from_u64(47);
    for _ in 0..400 {
        let (generation_seed, next) = seed.split();
        seed = next;
        if gen
            .generate(Size::new(100), generation_seed)
            .unwrap()
            .value
            .is_none()
        {
            nones_large += 1;
        }
    }

    // Probabilities are 0.5 and 0.1; allow wide margins.
    assert!(
        (120..=280).contains(&nones_small),
        "None probability at size 0 looks wrong: {nones_small}/400"
    );
    assert!(
        nones_large < 120,
        "None probability at size 100 looks wrong: {nones_large}/400"
    );
    assert!(
        nones_small > nones_large,
        "None probability must fall as size grows"
    );
    println!("✓ Optional probability scaling property passed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_distribution_validation_tests() {
        test_frequency_weights();
        test_one_of_coverage();
        test_linear_distribution_scaling();
        test_exponential_distribution_scaling();
        test_constant_distribution();
        test_optional_probability_scales_with_size();
    }
}
