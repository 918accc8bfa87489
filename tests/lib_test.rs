//! Library integration tests.

use serenade::{SerenadeError, TransportError};

#[test]
fn error_types_are_public() {
    let err = SerenadeError::ConfigValidationError {
        message: "test".into(),
    };
    assert!(err.to_string().contains("test"));

    let err: SerenadeError = TransportError::Http {
        status: 404,
        body: "Not Found".into(),
    }
    .into();
    assert!(err.to_string().contains("404"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> serenade::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use serenade::cli::{Cli, Commands};

    let cli = Cli::parse_from(["serenade", "run", "--seed", "7", "--no-submit"]);

    if let Some(Commands::Run(args)) = cli.command {
        assert_eq!(args.seed, Some(7));
        assert!(args.no_submit);
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn config_and_schema_are_public() {
    let config = serenade::config::parse_config(r#"{ "personal": { "toName": "Sam" } }"#, "inline")
        .unwrap();
    assert_eq!(config.personal.to_name.as_deref(), Some("Sam"));
    assert!(serenade::config::json_schema().is_object());
}
