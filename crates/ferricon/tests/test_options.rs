mod fixture;

use fixture::Environment;
use predicates::prelude::*;

#[test]
fn test_zero_width_is_rejected() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "-W", "0"])
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid dimensions"));

    assert!(!env.exists("logo-0x48.png"));
}

#[test]
fn test_malformed_input_is_rejected() {
    let env = Environment::with_logo(fixture::MALFORMED);

    env.run_ferricon(["logo.svg"])
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a valid SVG"));
}

#[test]
fn test_missing_input_is_rejected() {
    let env = Environment::new();

    env.run_ferricon(["absent.svg"])
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Couldn't read"));
}

#[test]
fn test_existing_output_requires_force() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg"]).success();

    // Without a terminal there is no overwrite prompt, the run aborts.
    env.run_ferricon(["logo.svg"])
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    env.run_ferricon(["logo.svg", "--force"]).success();
}

#[test]
fn test_config_file_supplies_defaults() {
    let env = Environment::with_logo(fixture::RED_SQUARE);
    env.write("config.toml", "format = \"ico\"\n");

    env.run_ferricon(["logo.svg", "--config", "config.toml"]).success();

    assert!(env.exists("favicon.ico"));
}

#[test]
fn test_arguments_override_config_file() {
    let env = Environment::with_logo(fixture::RED_SQUARE);
    env.write("config.toml", "format = \"ico\"\nwidth = 64\n");

    env.run_ferricon([
        "logo.svg",
        "--config",
        "config.toml",
        "-f",
        "png",
        "-W",
        "32",
        "-H",
        "32",
    ])
    .success();

    assert!(env.exists("logo-32.png"));
}

#[test]
fn test_optimize_warns_for_non_png_output() {
    let env = Environment::with_logo(fixture::RED_SQUARE);

    env.run_ferricon(["logo.svg", "-f", "jpeg", "--optimize"])
        .success()
        .stderr(predicate::str::contains("only applies to png"));
}
