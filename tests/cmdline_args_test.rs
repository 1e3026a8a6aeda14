//! Tests for command-line argument parsing
//!
//! These tests check a parser built with the same arguments as the binary.

use clap::{Arg, ArgAction, Command as ClapCommand};

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("head-scroll")
        .version("0.1.0")
        .about("Head-pose gesture recognition engine for hands-free browser scrolling and tapping")
        .arg(
            Arg::new("trace")
                .short('t')
                .long("trace")
                .value_name("PATH")
                .required_unless_present("print-config")
                .help("Trace file to replay"),
        )
        .arg(
            Arg::new("config")
                .short('C')
                .long("config")
                .value_name("PATH")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("prefs")
                .short('p')
                .long("prefs")
                .value_name("PATH")
                .help("Preference file path"),
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .action(ArgAction::SetTrue)
                .help("Print an example configuration and exit"),
        )
        .arg(
            Arg::new("yaml")
                .long("yaml")
                .action(ArgAction::SetTrue)
                .help("Print the full report as YAML"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug output"),
        )
}

#[test]
fn test_help_argument() {
    let result = create_test_command().try_get_matches_from(vec!["head-scroll", "--help"]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_trace_is_required() {
    let result = create_test_command().try_get_matches_from(vec!["head-scroll"]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_print_config_without_trace() {
    let matches = create_test_command()
        .try_get_matches_from(vec!["head-scroll", "--print-config"])
        .unwrap();
    assert!(matches.get_flag("print-config"));
    assert!(matches.get_one::<String>("trace").is_none());
}

#[test]
fn test_all_arguments() {
    let matches = create_test_command()
        .try_get_matches_from(vec![
            "head-scroll",
            "--trace",
            "session.yaml",
            "-C",
            "config.yaml",
            "--prefs",
            "prefs.yaml",
            "--yaml",
            "-d",
        ])
        .unwrap();

    assert_eq!(matches.get_one::<String>("trace").map(String::as_str), Some("session.yaml"));
    assert_eq!(matches.get_one::<String>("config").map(String::as_str), Some("config.yaml"));
    assert_eq!(matches.get_one::<String>("prefs").map(String::as_str), Some("prefs.yaml"));
    assert!(matches.get_flag("yaml"));
    assert!(matches.get_flag("debug"));
}

#[test]
fn test_unknown_argument_rejected() {
    let result = create_test_command().try_get_matches_from(vec!["head-scroll", "--cam", "0"]);
    assert!(result.is_err());
}
