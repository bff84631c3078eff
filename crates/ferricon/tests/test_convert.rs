mod fixture;

use fixture::Environment;
use predicates::prelude::*;

#[test]
fn test_png_at_default_size() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg"])
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let image = image::load_from_memory(&env.read("logo-48.png")).unwrap();
    assert_eq!((image.width(), image.height()), (48, 48));
    assert_eq!(image.to_rgba8().get_pixel(24, 24).0, [255, 0, 0, 255]);
}

#[test]
fn test_png_derives_non_square_file_name() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "-W", "32", "-H", "64"]).success();

    let image = image::load_from_memory(&env.read("logo-32x64.png")).unwrap();
    assert_eq!((image.width(), image.height()), (32, 64));
}

#[test]
fn test_png_preserves_transparency() {
    let env = Environment::with_logo(fixture::LEFT_HALF_RED);

    env.run_ferricon(["logo.svg", "--width", "64", "--height", "16"])
        .success();

    let image = image::load_from_memory(&env.read("logo-64x16.png"))
        .unwrap()
        .to_rgba8();

    assert_eq!(image.get_pixel(10, 8).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(54, 8).0[3], 0);
}

#[test]
fn test_jpeg_composites_onto_white() {
    let env = Environment::with_logo(fixture::LEFT_HALF_RED);

    env.run_ferricon(["logo.svg", "-f", "jpeg", "-W", "64", "-H", "16"])
        .success();

    let image = image::load_from_memory(&env.read("logo-64x16.jpeg"))
        .unwrap()
        .to_rgb8();

    let [r, g, b] = image.get_pixel(10, 8).0;
    assert!(r >= 240 && g <= 30 && b <= 30, "expected red, got {r} {g} {b}");

    let [r, g, b] = image.get_pixel(54, 8).0;
    assert!(
        r >= 240 && g >= 240 && b >= 240,
        "expected white, got {r} {g} {b}"
    );
}

#[test]
fn test_ico_forces_canonical_size_and_name() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "-f", "ico", "-W", "100", "-H", "100"])
        .success();

    let dir = ico::IconDir::read(std::io::Cursor::new(env.read("favicon.ico"))).unwrap();
    assert_eq!(dir.entries().len(), 1);
    assert_eq!(dir.entries()[0].width(), 48);
    assert_eq!(dir.entries()[0].height(), 48);
}

#[test]
fn test_output_directory_is_created() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "-o", "out/icons"]).success();

    assert!(env.exists("out/icons/logo-48.png"));
}

#[test]
fn test_optimized_png_stays_valid() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "--optimize"]).success();

    let image = image::load_from_memory(&env.read("logo-48.png")).unwrap();
    assert_eq!((image.width(), image.height()), (48, 48));
}
