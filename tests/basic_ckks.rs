use approx::assert_abs_diff_eq;
use num_bigint::BigInt;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use toy_leveled_ckks::{
    Ciphertext, CkksEngine, CkksError, CkksParams, Coefficient, EvaluationKey, PublicKey,
    SecretKey,
};

const TOLERANCE: f64 = 0.1;
const ENTRY_BOUND: f64 = 50.0;

struct Context<C: Coefficient = BigInt> {
    engine: CkksEngine<C>,
    sk: SecretKey<C>,
    pk: PublicKey<C>,
    evk: EvaluationKey<C>,
    rng: ChaCha20Rng,
}

fn setup<C: Coefficient>(params: CkksParams, seed: u64) -> Context<C> {
    let engine = CkksEngine::<C>::new(params).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let sk = engine.generate_secret_key(&mut rng).unwrap();
    let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
    let evk = engine.generate_evaluation_key(&sk, &mut rng).unwrap();
    Context {
        engine,
        sk,
        pk,
        evk,
        rng,
    }
}

fn params(ring_degree: usize, q0_bits: u64, scale_bits: u64, levels: usize) -> CkksParams {
    CkksParams::builder()
        .ring_degree(ring_degree)
        .q0_bits(q0_bits)
        .scale_bits(scale_bits)
        .levels(levels)
        .build()
        .unwrap()
}

fn random_vector(rng: &mut ChaCha20Rng, len: usize) -> Vec<Complex64> {
    (0..len)
        .map(|_| {
            Complex64::new(
                rng.random_range(-ENTRY_BOUND..ENTRY_BOUND),
                rng.random_range(-ENTRY_BOUND..ENTRY_BOUND),
            )
        })
        .collect()
}

fn encrypt<C: Coefficient>(ctx: &mut Context<C>, values: &[Complex64]) -> Ciphertext<C> {
    let pt = ctx.engine.encode(values).unwrap();
    ctx.engine.encrypt(&pt, &ctx.pk, &mut ctx.rng).unwrap()
}

fn decrypt<C: Coefficient>(ctx: &Context<C>, ct: &Ciphertext<C>) -> Vec<Complex64> {
    let pt = ctx.engine.decrypt(ct, &ctx.sk).unwrap();
    ctx.engine.decode(&pt).unwrap()
}

fn max_error(got: &[Complex64], want: &[Complex64]) -> f64 {
    assert_eq!(got.len(), want.len());
    got.iter()
        .zip(want)
        .map(|(g, w)| (g - w).norm())
        .fold(0.0, f64::max)
}

#[test]
fn end_to_end_two_slot_vector() {
    // Ring degree 4 (cyclotomic index 8) gives exactly two slots.
    let mut ctx = setup::<BigInt>(params(4, 100, 20, 2), 42);
    let values = [Complex64::new(3.0, 4.0), Complex64::new(2.0, -1.0)];
    let ct = encrypt(&mut ctx, &values);
    let decoded = decrypt(&ctx, &ct);
    assert!(max_error(&decoded, &values) <= TOLERANCE);
}

#[test]
fn end_to_end_ring_degree_eight() {
    let mut ctx = setup::<BigInt>(params(8, 100, 20, 2), 43);
    let values = [
        Complex64::new(3.0, 4.0),
        Complex64::new(2.0, -1.0),
        Complex64::new(0.0, 0.0),
        Complex64::new(-7.5, 0.25),
    ];
    let ct = encrypt(&mut ctx, &values);
    assert!(max_error(&decrypt(&ctx, &ct), &values) <= TOLERANCE);
}

#[test]
fn encryption_round_trip_ring_degree_64() {
    let mut ctx = setup::<BigInt>(params(64, 100, 20, 2), 1);
    for _ in 0..3 {
        let values = random_vector(&mut ctx.rng, 32);
        let ct = encrypt(&mut ctx, &values);
        assert_eq!(ct.level(), 2);
        assert!(max_error(&decrypt(&ctx, &ct), &values) <= TOLERANCE);
    }
}

#[test]
fn additive_homomorphism() {
    let mut ctx = setup::<BigInt>(params(64, 100, 20, 2), 2);
    let a = random_vector(&mut ctx.rng, 32);
    let b = random_vector(&mut ctx.rng, 32);
    let ct_a = encrypt(&mut ctx, &a);
    let ct_b = encrypt(&mut ctx, &b);

    let sum = ctx.engine.add(&ct_a, &ct_b).unwrap();
    let expected: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
    assert!(max_error(&decrypt(&ctx, &sum), &expected) <= TOLERANCE);
}

#[test]
fn multiplicative_homomorphism_with_rescale() {
    let mut ctx = setup::<BigInt>(params(64, 100, 20, 2), 3);
    let a = random_vector(&mut ctx.rng, 32);
    let b = random_vector(&mut ctx.rng, 32);
    let ct_a = encrypt(&mut ctx, &a);
    let ct_b = encrypt(&mut ctx, &b);
    let expected: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x * y).collect();

    let product = ctx.engine.mult(&ct_a, &ct_b, &ctx.evk).unwrap();
    assert_eq!(product.scale(), ct_a.scale() * ct_b.scale());
    assert_eq!(product.level(), ct_a.level());
    assert!(max_error(&decrypt(&ctx, &product), &expected) <= TOLERANCE);

    let rescaled = ctx.engine.rescale(&product).unwrap();
    assert_eq!(rescaled.level(), product.level() - 1);
    assert_abs_diff_eq!(rescaled.scale(), ct_a.scale(), epsilon = 1e-6);
    assert!(max_error(&decrypt(&ctx, &rescaled), &expected) <= TOLERANCE);
}

#[test]
fn rescale_divides_modulus_and_scale_by_delta() {
    let mut ctx = setup::<BigInt>(params(16, 100, 20, 3), 4);
    let values = random_vector(&mut ctx.rng, 8);
    let ct = encrypt(&mut ctx, &values);
    let lifted = ctx.engine.inc_scale(&ct, &BigInt::pow2(40)).unwrap();
    let before = decrypt(&ctx, &lifted);

    let delta = ctx.engine.delta().clone();
    let rescaled = ctx.engine.rescale(&lifted).unwrap();
    assert_eq!(rescaled.level(), lifted.level() - 1);
    assert_eq!(rescaled.modulus().clone() * &delta, *lifted.modulus());
    assert_abs_diff_eq!(rescaled.scale() * 2f64.powi(20), lifted.scale());

    let after = decrypt(&ctx, &rescaled);
    assert!(max_error(&after, &before) <= TOLERANCE);
    assert!(max_error(&after, &values) <= TOLERANCE);
}

#[test]
fn rescale_of_a_clone_leaves_original_untouched() {
    let mut ctx = setup::<BigInt>(params(16, 100, 20, 3), 5);
    let values = random_vector(&mut ctx.rng, 8);
    let ct = encrypt(&mut ctx, &values);
    let lifted = ctx.engine.inc_scale(&ct, &BigInt::pow2(20)).unwrap();
    let copy = lifted.clone();
    let rescaled = ctx.engine.rescale(&copy).unwrap();

    assert_eq!(lifted.modulus(), ctx.engine.top_modulus());
    assert_eq!(copy.modulus(), ctx.engine.top_modulus());
    assert_ne!(rescaled.modulus(), lifted.modulus());
    assert!(max_error(&decrypt(&ctx, &lifted), &values) <= TOLERANCE);
}

#[test]
fn levels_run_out() {
    let mut ctx = setup::<BigInt>(params(8, 60, 20, 1), 6);
    let values = random_vector(&mut ctx.rng, 4);
    let ct = encrypt(&mut ctx, &values);
    let lifted = ctx.engine.inc_scale(&ct, &BigInt::pow2(20)).unwrap();
    let once = ctx.engine.rescale(&lifted).unwrap();
    assert_eq!(once.level(), 0);
    assert!(matches!(
        ctx.engine.rescale(&once),
        Err(CkksError::LevelExhausted)
    ));
}

#[test]
fn mismatched_operands_are_rejected() {
    let mut ctx = setup::<BigInt>(params(16, 100, 20, 3), 7);
    let values = random_vector(&mut ctx.rng, 8);
    let ct = encrypt(&mut ctx, &values);
    let lowered = ctx.engine.mod_down_to(&ct, 1).unwrap();

    assert!(matches!(
        ctx.engine.mult(&ct, &lowered, &ctx.evk),
        Err(CkksError::ModulusMismatch { .. })
    ));
    let lifted = ctx.engine.inc_scale(&ct, &BigInt::from(3)).unwrap();
    assert!(matches!(
        ctx.engine.add(&ct, &lifted),
        Err(CkksError::ScaleMismatch { .. })
    ));
}

#[test]
fn multiplication_works_below_the_top_level() {
    let mut ctx = setup::<BigInt>(params(16, 100, 20, 3), 8);
    let a = random_vector(&mut ctx.rng, 8);
    let b = random_vector(&mut ctx.rng, 8);
    let ct_a = encrypt(&mut ctx, &a);
    let ct_b = encrypt(&mut ctx, &b);
    let low_a = ctx.engine.mod_down_to(&ct_a, 1).unwrap();
    let low_b = ctx.engine.mod_down_to(&ct_b, 1).unwrap();

    let product = ctx.engine.mult(&low_a, &low_b, &ctx.evk).unwrap();
    let expected: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x * y).collect();
    assert_eq!(product.level(), 1);
    assert!(max_error(&decrypt(&ctx, &product), &expected) <= TOLERANCE);
}

#[test]
fn fixed_width_backend_round_trip() {
    let mut ctx = setup::<i128>(params(8, 25, 15, 1), 9);
    let a = [
        Complex64::new(1.5, -2.0),
        Complex64::new(4.0, 0.5),
        Complex64::new(-3.0, 1.0),
        Complex64::new(0.0, -4.5),
    ];
    let b = [
        Complex64::new(-0.5, 1.0),
        Complex64::new(2.0, 2.0),
        Complex64::new(1.0, -1.0),
        Complex64::new(3.5, 0.0),
    ];
    let ct_a = encrypt(&mut ctx, &a);
    let ct_b = encrypt(&mut ctx, &b);
    assert!(max_error(&decrypt(&ctx, &ct_a), &a) <= TOLERANCE);

    let sum = ctx.engine.add(&ct_a, &ct_b).unwrap();
    let expected_sum: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
    assert!(max_error(&decrypt(&ctx, &sum), &expected_sum) <= TOLERANCE);

    let product = ctx.engine.mult(&ct_a, &ct_b, &ctx.evk).unwrap();
    let rescaled = ctx.engine.rescale(&product).unwrap();
    let expected_product: Vec<Complex64> = a.iter().zip(&b).map(|(x, y)| x * y).collect();
    assert_eq!(rescaled.level(), 0);
    assert!(max_error(&decrypt(&ctx, &rescaled), &expected_product) <= TOLERANCE);
}

#[test]
fn fixed_width_backend_scales_by_wide_factors() {
    let mut ctx = setup::<i128>(params(8, 25, 15, 1), 13);
    let values = [
        Complex64::new(1.0, -0.5),
        Complex64::new(-2.0, 1.5),
        Complex64::new(0.25, 3.0),
        Complex64::new(-1.5, -1.0),
    ];
    let ct = encrypt(&mut ctx, &values);

    // 2^100 + 3 is 3 modulo Q_1 = 2^40.
    let wide = i128::pow2(100) + 3;
    let tripled = ctx.engine.scale(&ct, &wide).unwrap();
    assert_eq!(tripled.scale(), ct.scale());
    let expected: Vec<Complex64> = values.iter().map(|v| v * 3.0).collect();
    assert!(max_error(&decrypt(&ctx, &tripled), &expected) <= TOLERANCE);

    let lifted = ctx.engine.inc_scale(&ct, &i128::pow2(100)).unwrap();
    assert_eq!(lifted.scale(), ct.scale() * 2f64.powi(100));
    assert_eq!(lifted.modulus(), ct.modulus());

    let lifted = ctx.engine.inc_scale(&ct, &7).unwrap();
    assert!(max_error(&decrypt(&ctx, &lifted), &values) <= TOLERANCE);
}
