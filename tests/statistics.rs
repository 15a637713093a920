use approx::assert_abs_diff_eq;
use num_bigint::BigInt;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use toy_leveled_ckks::{Ciphertext, CkksEngine, CkksError, CkksParams};

const STUDENTS: usize = 8;
const COURSES: usize = 10;
const MEAN_TOLERANCE: f64 = 0.1;
const VAR_TOLERANCE: f64 = 0.25;

/// Grades in {1, 1.5, ..., 6}.
fn grades(rng: &mut ChaCha20Rng) -> Vec<Vec<f64>> {
    (0..COURSES)
        .map(|_| {
            (0..STUDENTS)
                .map(|_| f64::from(rng.random_range(0..11u32)) / 2.0 + 1.0)
                .collect()
        })
        .collect()
}

fn engine() -> CkksEngine {
    let params = CkksParams::builder()
        .ring_degree(2 * STUDENTS)
        .q0_bits(100)
        .scale_bits(20)
        .levels(10)
        .build()
        .unwrap();
    CkksEngine::new(params).unwrap()
}

fn column_stats(data: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = data.len() as f64;
    let means: Vec<f64> = (0..STUDENTS)
        .map(|j| data.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect();
    let variances = (0..STUDENTS)
        .map(|j| {
            data.iter()
                .map(|row| (row[j] - means[j]).powi(2))
                .sum::<f64>()
                / n
        })
        .collect();
    (means, variances)
}

fn to_slots(row: &[f64]) -> Vec<Complex64> {
    row.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

#[test]
fn mean_and_variance_of_grades() {
    let engine = engine();
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let sk = engine.generate_secret_key(&mut rng).unwrap();
    let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
    let evk = engine.generate_evaluation_key(&sk, &mut rng).unwrap();

    let data = grades(&mut rng);
    let (expected_means, expected_vars) = column_stats(&data);
    let cts: Vec<Ciphertext> = data
        .iter()
        .map(|row| {
            let pt = engine.encode(&to_slots(row)).unwrap();
            engine.encrypt(&pt, &pk, &mut rng).unwrap()
        })
        .collect();

    let mean = engine.mean(&cts, &pk, &evk, &mut rng).unwrap();
    assert_eq!(mean.level(), engine.max_level());
    assert_eq!(
        mean.scale(),
        cts[0].scale() * engine.mean_constant_scale(COURSES)
    );
    let decoded = engine
        .encoder()
        .decode_real(&engine.decrypt(&mean, &sk).unwrap())
        .unwrap();
    for (got, want) in decoded.iter().zip(&expected_means) {
        assert_abs_diff_eq!(*got, *want, epsilon = MEAN_TOLERANCE);
    }

    let rescaled = engine.rescale(&mean).unwrap();
    let decoded = engine
        .encoder()
        .decode_real(&engine.decrypt(&rescaled, &sk).unwrap())
        .unwrap();
    for (got, want) in decoded.iter().zip(&expected_means) {
        assert_abs_diff_eq!(*got, *want, epsilon = MEAN_TOLERANCE);
    }

    let var = engine
        .var(&cts, &pk, &evk, engine.delta(), &mut rng)
        .unwrap();
    assert_eq!(var.level(), engine.max_level() - 2);
    let decoded = engine
        .encoder()
        .decode_real(&engine.decrypt(&var, &sk).unwrap())
        .unwrap();
    for (got, want) in decoded.iter().zip(&expected_vars) {
        assert_abs_diff_eq!(*got, *want, epsilon = VAR_TOLERANCE);
    }
}

#[test]
fn mean_of_a_single_ciphertext_is_itself() {
    let engine = engine();
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let sk = engine.generate_secret_key(&mut rng).unwrap();
    let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
    let evk = engine.generate_evaluation_key(&sk, &mut rng).unwrap();

    let row: Vec<f64> = (0..STUDENTS).map(|i| i as f64 - 3.5).collect();
    let pt = engine.encode(&to_slots(&row)).unwrap();
    let ct = engine.encrypt(&pt, &pk, &mut rng).unwrap();
    let mean = engine.mean(&[ct], &pk, &evk, &mut rng).unwrap();
    let decoded = engine
        .encoder()
        .decode_real(&engine.decrypt(&mean, &sk).unwrap())
        .unwrap();
    for (got, want) in decoded.iter().zip(&row) {
        assert_abs_diff_eq!(*got, *want, epsilon = MEAN_TOLERANCE);
    }
}

#[test]
fn variance_of_identical_inputs_is_zero() {
    let engine = engine();
    let mut rng = ChaCha20Rng::seed_from_u64(10);
    let sk = engine.generate_secret_key(&mut rng).unwrap();
    let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
    let evk = engine.generate_evaluation_key(&sk, &mut rng).unwrap();

    let row = vec![4.5; STUDENTS];
    let cts: Vec<Ciphertext> = (0..4)
        .map(|_| {
            let pt = engine.encode(&to_slots(&row)).unwrap();
            engine.encrypt(&pt, &pk, &mut rng).unwrap()
        })
        .collect();
    let var = engine
        .var(&cts, &pk, &evk, engine.delta(), &mut rng)
        .unwrap();
    for v in engine
        .encoder()
        .decode_real(&engine.decrypt(&var, &sk).unwrap())
        .unwrap()
    {
        assert_abs_diff_eq!(v, 0.0, epsilon = VAR_TOLERANCE);
    }
}

#[test]
fn mean_rejects_mismatched_inputs() {
    let engine = engine();
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let sk = engine.generate_secret_key(&mut rng).unwrap();
    let pk = engine.generate_public_key(&sk, &mut rng).unwrap();
    let evk = engine.generate_evaluation_key(&sk, &mut rng).unwrap();

    let pt = engine.encode(&to_slots(&[1.0; STUDENTS])).unwrap();
    let ct = engine.encrypt(&pt, &pk, &mut rng).unwrap();
    let lifted = engine.inc_scale(&ct, &BigInt::from(7)).unwrap();
    assert!(matches!(
        engine.mean(&[ct, lifted], &pk, &evk, &mut rng),
        Err(CkksError::ScaleMismatch { .. })
    ));
}
