use super::*;

fn image_from(pixels: &[[u8; 4]]) -> ImageRGBA {
    ImageRGBA {
        width: pixels.len() as u32,
        height: 1,
        data: pixels.iter().flatten().copied().collect(),
    }
}

#[test]
fn uniform_image_has_zero_diversity() {
    let img = image_from(&[[12, 200, 7, 255]; 16]);
    assert_eq!(diversity(&img), 0.0);
}

#[test]
fn single_channel_split_matches_hand_computation() {
    // R alternates 0/100: mean 50, variance 2500 -> sqrt = 50.
    let img = image_from(&[[0, 9, 9, 255], [100, 9, 9, 255]]);
    assert!((diversity(&img) - 50.0).abs() < 1e-9);
}

#[test]
fn channels_contribute_jointly() {
    // Each of R, G, B has variance 2500 -> sqrt(7500).
    let img = image_from(&[[0, 0, 0, 255], [100, 100, 100, 255]]);
    assert!((diversity(&img) - 7500f64.sqrt()).abs() < 1e-9);
}

#[test]
fn alpha_is_ignored() {
    let img = image_from(&[[5, 5, 5, 0], [5, 5, 5, 255]]);
    assert_eq!(diversity(&img), 0.0);
}

#[test]
fn empty_image_is_flat() {
    let img = ImageRGBA {
        width: 0,
        height: 0,
        data: vec![],
    };
    assert_eq!(diversity(&img), 0.0);
}

#[test]
fn gate_accepts_strictly_above_threshold() {
    assert_eq!(gate(30.5, 30.0, 1, 3), GateDecision::Accept);
    assert_eq!(gate(30.0, 30.0, 1, 3), GateDecision::Retry);
    assert_eq!(gate(30.0, 30.0, 3, 3), GateDecision::Exhausted);
    assert_eq!(gate(99.0, 30.0, 3, 3), GateDecision::Accept);
}
