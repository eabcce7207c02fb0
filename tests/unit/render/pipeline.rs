use super::*;
use crate::foundation::core::Rgb;

fn opts_with_threads(threads: usize) -> GenerateOpts {
    GenerateOpts {
        threads: Some(threads),
        ..GenerateOpts::default()
    }
}

#[test]
fn defaults_match_stock_generator() {
    let o = GenerateOpts::default();
    assert_eq!((o.min_depth, o.max_depth, o.max_attempts), (10, 30, 3));
    assert_eq!(o.accept_threshold, 30.0);
    assert_eq!(o.warn_threshold, 50.0);
    assert_eq!(o.threads, None);
    o.validate().unwrap();
}

#[test]
fn options_deserialize_with_missing_fields_defaulted() {
    let o: GenerateOpts = serde_json::from_str(r#"{ "max_depth": 12, "threads": 2 }"#).unwrap();
    assert_eq!(o.max_depth, 12);
    assert_eq!(o.threads, Some(2));
    assert_eq!(o.min_depth, 10);
    assert_eq!(o.max_attempts, 3);
}

#[test]
fn invalid_options_are_rejected() {
    let bad = [
        GenerateOpts {
            min_depth: 5,
            max_depth: 4,
            ..GenerateOpts::default()
        },
        GenerateOpts {
            max_attempts: 0,
            ..GenerateOpts::default()
        },
        GenerateOpts {
            threads: Some(0),
            ..GenerateOpts::default()
        },
        GenerateOpts {
            accept_threshold: f64::NAN,
            ..GenerateOpts::default()
        },
    ];
    for o in bad {
        assert!(matches!(
            generate_with_opts("x", 8, &o, None),
            Err(RandArtError::Validation(_))
        ));
    }
    assert!(matches!(
        generate("x", 0),
        Err(RandArtError::Validation(_))
    ));
}

#[test]
fn flat_trees_exhaust_attempts_and_are_flagged() {
    let mut calls = 0;
    let art = generate_with_builder("flat", 8, &opts_with_threads(2), None, |_, _| {
        calls += 1;
        Expr::Constant(Rgb::new(0.25, -0.5, 1.0))
    })
    .unwrap();
    assert_eq!(calls, 3);
    assert_eq!(art.attempts, 3);
    assert!(art.low_diversity);
    assert_eq!(art.diversity, 0.0);
    assert_eq!(art.tree, "Constant(0.25, -0.50, 1.00)");
}

#[test]
fn diverse_first_tree_is_accepted_immediately() {
    let art = generate_with_builder("grad", 32, &opts_with_threads(3), None, |_, _| {
        Expr::Product {
            left: Box::new(Expr::VariableX),
            right: Box::new(Expr::Constant(Rgb::splat(1.0))),
        }
    })
    .unwrap();
    assert_eq!(art.attempts, 1);
    assert!(art.diversity > 50.0);
    assert!(!art.low_diversity);
}

#[test]
fn accepted_but_modest_diversity_still_warns() {
    let art = generate_with_builder("modest", 64, &opts_with_threads(2), None, |_, _| {
        Expr::Mix {
            weight: 0.3,
            left: Box::new(Expr::VariableX),
            right: Box::new(Expr::Constant(Rgb::splat(0.0))),
        }
    })
    .unwrap();
    assert_eq!(art.attempts, 1);
    assert!(art.diversity > 30.0 && art.diversity <= 50.0, "{}", art.diversity);
    assert!(art.low_diversity);
}

#[test]
fn retries_keep_drawing_from_the_same_generator() {
    use rand::RngCore as _;

    let mut draws = Vec::new();
    let _ = generate_with_builder("retry", 4, &opts_with_threads(1), None, |rng, _| {
        draws.push(rng.next_u64());
        Expr::Constant(Rgb::splat(0.0))
    })
    .unwrap();

    let mut replay = StdRng::seed_from_u64(u64::from(seed_hash("retry")));
    let want: Vec<u64> = (0..3).map(|_| replay.next_u64()).collect();
    assert_eq!(draws, want);
}

#[test]
fn cancelled_before_start_returns_cancelled() {
    let token = CancelToken::new();
    token.cancel();
    let res = generate_with_opts("x", 8, &opts_with_threads(1), Some(&token));
    assert!(matches!(res, Err(RandArtError::Cancelled)));
}

#[test]
fn small_default_bounds_generate_valid_images() {
    let opts = GenerateOpts {
        min_depth: 2,
        max_depth: 6,
        threads: Some(2),
        ..GenerateOpts::default()
    };
    let art = generate_with_opts("tiny", 16, &opts, None).unwrap();
    assert!((1..=3).contains(&art.attempts));
    assert_eq!(art.image.data.len(), 16 * 16 * 4);
    assert!(art.image.data.chunks_exact(4).all(|px| px[3] == 255));
}
