//! Config file loading and CLI overlay tests.

use clap::Parser;
use cur_mean::cli::Cli;
use cur_mean::config::Config;
use cur_mean::query::CostQuery;
use tempfile::tempdir;

#[test]
fn test_file_then_flags_precedence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[aws]
profile = "billing"

[query]
service = "AmazonEC2"
start_date = "2024-01-01"
end_date = "2024-02-01"

[extract]
divisor = 31
"#,
    )
    .unwrap();

    let cli = Cli::parse_from([
        "cur-mean",
        "--config",
        path.to_str().unwrap(),
        "--service",
        "AmazonRDS",
    ]);
    let mut config = Config::load_from_file(&cli.config_path()).unwrap();
    cli.apply_to(&mut config);
    config.validate().unwrap();

    assert_eq!(config.aws.profile, "billing");
    assert_eq!(config.query.service, "AmazonRDS");
    assert_eq!(config.query.start_date, "2024-01-01");
    assert_eq!(config.extract.divisor, 31.0);

    let sql = CostQuery::from_config(&config.query).to_sql();
    assert!(sql.contains("line_item_product_code='AmazonRDS'"));
    assert!(sql.contains("timestamp '2024-01-01' AND timestamp '2024-02-01'"));
}

#[test]
fn test_invalid_flag_value_fails_validation() {
    let cli = Cli::parse_from(["cur-mean", "--output-location", "/tmp/results"]);
    let mut config = Config::default();
    cli.apply_to(&mut config);

    assert!(config.validate().is_err());
}
