//! CLI argument tests

use clap::{CommandFactory, Parser};

use super::*;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_resolve_domains_defaults_to_math() {
    assert_eq!(resolve_domains(Vec::new(), false), vec![Domain::Math]);
}

#[test]
fn test_resolve_domains_all_and_dedupe() {
    assert_eq!(resolve_domains(Vec::new(), true), Domain::all().to_vec());
    assert_eq!(
        resolve_domains(vec![Domain::Cs, Domain::Math, Domain::Cs], false),
        vec![Domain::Cs, Domain::Math]
    );
}

#[test]
fn test_generate_arguments() {
    let cli = Cli::try_parse_from([
        "ktree",
        "generate",
        "--domains",
        "math,physics",
        "--target",
        "4",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            domains,
            target,
            dry_run,
            seed_only,
            ..
        } => {
            assert_eq!(domains, vec![Domain::Math, Domain::Physics]);
            assert_eq!(target, 4);
            assert!(dry_run);
            assert!(!seed_only);
        }
        _ => panic!("expected generate"),
    }
}

#[test]
fn test_unknown_domain_is_rejected() {
    assert!(Cli::try_parse_from(["ktree", "generate", "--domains", "ASTROLOGY"]).is_err());
    assert!(Cli::try_parse_from(["ktree", "mvg", "Group", "--domain", "HISTORY"]).is_err());
}

#[test]
fn test_all_domains_conflicts_with_domains() {
    assert!(
        Cli::try_parse_from(["ktree", "generate", "--all-domains", "--domains", "CS"]).is_err()
    );
}

#[test]
fn test_global_format_flag() {
    let cli = Cli::try_parse_from(["ktree", "config", "list", "--format", "json"]).unwrap();
    assert!(cli.format == OutputFormat::Json);
}
