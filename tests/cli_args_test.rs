//! Argument parsing for the checktree binary.

use clap::Parser;

use checktree::cli::{Cli, Commands, ConfigCommands};

#[test]
fn given_toggle_paths_when_parsing_then_kept_in_order() {
    let cli = Cli::try_parse_from([
        "checktree",
        "-dd",
        "toggle",
        "-v",
        "Europe/England/London",
        "Europe/France",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Some(Commands::Toggle { paths, verbose }) => {
            assert!(verbose);
            assert_eq!(paths, ["Europe/England/London", "Europe/France"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_toggle_without_paths_when_parsing_then_error() {
    assert!(Cli::try_parse_from(["checktree", "toggle"]).is_err());
}

#[test]
fn given_global_file_after_subcommand_when_parsing_then_accepted() {
    let cli = Cli::try_parse_from(["checktree", "show", "--file", "tree.toml"]).unwrap();
    assert_eq!(cli.file.as_deref(), Some(std::path::Path::new("tree.toml")));
    assert!(matches!(cli.command, Some(Commands::Show)));
}

#[test]
fn given_config_template_when_parsing_then_nested_subcommand() {
    let cli = Cli::try_parse_from(["checktree", "config", "template"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Config {
            command: ConfigCommands::Template
        })
    ));
}
