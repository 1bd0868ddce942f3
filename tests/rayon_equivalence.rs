#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenmatch::{
    detect_edges, EdgeParams, Kernel, NccRayon, NccScalar, OwnedImage, SearchImage, TemplatePlan,
};

fn noise(rng: &mut StdRng, width: usize, height: usize) -> OwnedImage<f32> {
    let data = (0..width * height).map(|_| rng.random::<f32>()).collect();
    OwnedImage::new(data, width, height).unwrap()
}

#[test]
fn parallel_surface_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(1234);
    let params = EdgeParams {
        sigma: 1.0,
        ..EdgeParams::default()
    };
    let haystack = detect_edges(&noise(&mut rng, 96, 72), &params);
    let needle = detect_edges(&noise(&mut rng, 16, 12), &params);

    let image = SearchImage::new(&haystack);
    let plan = TemplatePlan::from_image(&needle);
    let sequential = NccScalar::surface(&image, &plan).unwrap();
    let parallel = NccRayon::surface(&image, &plan).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn parallel_surface_on_raw_luma() {
    let mut rng = StdRng::seed_from_u64(5678);
    let haystack = noise(&mut rng, 64, 48);
    let needle = noise(&mut rng, 9, 7);

    let image = SearchImage::new(&haystack);
    let plan = TemplatePlan::from_image(&needle);
    assert_eq!(
        NccScalar::surface(&image, &plan).unwrap(),
        NccRayon::surface(&image, &plan).unwrap()
    );
}
