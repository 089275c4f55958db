use clap::Parser;
use rstest::rstest;

use feedtree::application::ApplicationError;
use feedtree::cli::args::{Cli, Commands, LayoutArgs};
use feedtree::cli::commands::layout_config;
use feedtree::cli::CliError;
use feedtree::config::{Settings, SizingMode};
use feedtree::domain::{DomainError, Orientation, Sizing};
use feedtree::exitcode;

#[test]
fn given_no_overrides_when_building_layout_config_then_settings_apply() {
    let settings = Settings::default();

    let config = layout_config(&settings, &LayoutArgs::default()).unwrap();

    assert_eq!(config, settings.layout_config());
}

#[test]
fn given_width_override_when_building_layout_config_then_keeps_configured_height() {
    // Arrange
    let mut settings = Settings::default();
    settings.layout.height = 500.0;
    let opts = LayoutArgs {
        width: Some(1000.0),
        orientation: Some(Orientation::LeftRight),
        compact: true,
        ..LayoutArgs::default()
    };

    // Act
    let config = layout_config(&settings, &opts).unwrap();

    // Assert
    assert_eq!(
        config.sizing,
        Sizing::Fit {
            width: 1000.0,
            height: 500.0
        }
    );
    assert_eq!(config.orientation, Orientation::LeftRight);
    assert!(config.compact);
}

#[test]
fn given_node_size_settings_when_canvas_given_then_switches_to_fit() {
    let mut settings = Settings::default();
    settings.layout.sizing = SizingMode::NodeSize;
    let opts = LayoutArgs {
        height: Some(120.0),
        ..LayoutArgs::default()
    };

    let config = layout_config(&settings, &opts).unwrap();

    assert_eq!(
        config.sizing,
        Sizing::Fit {
            width: 400.0,
            height: 120.0
        }
    );
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-10.0)]
#[case::infinite(f64::INFINITY)]
fn given_bad_width_when_building_layout_config_then_invalid_args(#[case] width: f64) {
    let opts = LayoutArgs {
        width: Some(width),
        ..LayoutArgs::default()
    };

    let err = layout_config(&Settings::default(), &opts).unwrap_err();

    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_layout_command_line_when_parsing_then_options_land_in_args() {
    let cli = Cli::try_parse_from([
        "feedtree",
        "-d",
        "-d",
        "layout",
        "feed.json",
        "--width",
        "800",
        "--orientation",
        "left-right",
        "--compact",
        "-s",
        "3",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Layout {
            file,
            opts,
            selected,
        }) => {
            assert_eq!(file.to_str(), Some("feed.json"));
            assert_eq!(opts.width, Some(800.0));
            assert_eq!(opts.orientation, Some(Orientation::LeftRight));
            assert!(opts.compact);
            assert_eq!(selected, Some(3));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_negative_point_when_parsing_select_then_accepted() {
    let cli = Cli::try_parse_from(["feedtree", "select", "feed.json", "-x", "-4.5", "-y", "12"])
        .unwrap();

    match cli.command {
        Some(Commands::Select { x, y, .. }) => {
            assert_eq!(x, -4.5);
            assert_eq!(y, 12.0);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn given_unknown_orientation_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["feedtree", "layout", "feed.json", "--orientation", "diagonal"]);

    assert!(result.is_err());
}

#[rstest]
#[case::duplicate(
    CliError::Application(ApplicationError::Domain(DomainError::DuplicateId("1".into()))),
    exitcode::DATAERR
)]
#[case::cycle(
    CliError::Application(ApplicationError::Domain(DomainError::CycleDetected("1".into()))),
    exitcode::DATAERR
)]
#[case::layout(
    CliError::Application(ApplicationError::Domain(DomainError::InvalidLayout("w".into()))),
    exitcode::CONFIG
)]
#[case::config(
    CliError::Application(ApplicationError::Config { message: "bad".into() }),
    exitcode::CONFIG
)]
#[case::usage(CliError::Usage("no command".into()), exitcode::USAGE)]
fn given_error_when_mapping_exit_code_then_sysexits_value(#[case] err: CliError, #[case] code: i32) {
    assert_eq!(err.exit_code(), code);
}
