use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_dedupe_with_parent() {
    let cli = Cli::try_parse_from([
        "datoso",
        "dedupe",
        "child.xml",
        "--parent",
        "nointro:Parent",
        "-o",
        "out.xml",
    ])
    .unwrap();
    match cli.command {
        Commands::Dedupe {
            child,
            parent,
            output,
            dry_run,
        } => {
            assert_eq!(child, "child.xml");
            assert_eq!(parent.as_deref(), Some("nointro:Parent"));
            assert_eq!(output, Some(PathBuf::from("out.xml")));
            assert!(!dry_run);
        }
        _ => panic!("expected dedupe"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["datoso", "detect", "a.dat", "b.xml", "--quiet"]).unwrap();
    assert!(cli.quiet);
    assert!(!cli.verbose);
    match cli.command {
        Commands::Detect { files } => assert_eq!(files.len(), 2),
        _ => panic!("expected detect"),
    }
}

#[test]
fn test_detect_requires_files() {
    assert!(Cli::try_parse_from(["datoso", "detect"]).is_err());
}

#[test]
fn test_mark_all_flags_override_each_other() {
    let cli = Cli::try_parse_from([
        "datoso",
        "mia",
        "set.dat",
        "--mias",
        "mia.json",
        "--mark-all",
        "--no-mark-all",
    ])
    .unwrap();
    match cli.command {
        Commands::Mia {
            mark_all,
            no_mark_all,
            ..
        } => {
            assert!(!mark_all);
            assert!(no_mark_all);
        }
        _ => panic!("expected mia"),
    }
}

#[test]
fn test_info_classification_args() {
    let cli = Cli::try_parse_from([
        "datoso",
        "info",
        "gb.dat",
        "--system",
        "Game Boy",
        "--company",
        "Nintendo",
    ])
    .unwrap();
    let Commands::Info { classification, .. } = cli.command else {
        panic!("expected info");
    };
    let c = classification.to_classification();
    assert_eq!(c.system.as_deref(), Some("Game Boy"));
    assert_eq!(c.company.as_deref(), Some("Nintendo"));
    assert_eq!(c.seed, None);
}
