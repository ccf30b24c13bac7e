use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["basket-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["basket-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["basket-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn compare_collects_items_and_defaults_mode() {
    let cli = Cli::try_parse_from(["basket-cli", "compare", "Milk", "Bread"]).unwrap();
    match cli.command {
        Some(Commands::Compare { items, mode, json }) => {
            assert_eq!(items, vec!["Milk", "Bread"]);
            assert_eq!(mode, None);
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn compare_accepts_full_basket_mode() {
    let cli = Cli::try_parse_from([
        "basket-cli",
        "compare",
        "Milk",
        "--mode",
        "full_basket_only",
        "--json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Compare {
            mode: Some(TotalsMode::FullBasketOnly),
            json: true,
            ..
        })
    ));
}

#[test]
fn compare_rejects_unknown_mode() {
    let result = Cli::try_parse_from(["basket-cli", "compare", "Milk", "--mode", "cheapest"]);
    assert!(result.is_err());
}

#[test]
fn compare_requires_an_item() {
    assert!(Cli::try_parse_from(["basket-cli", "compare"]).is_err());
}

#[test]
fn breakdown_collects_items() {
    let cli = Cli::try_parse_from(["basket-cli", "breakdown", "Milk"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Breakdown { ref items, json: false }) if items == &["Milk"]
    ));
}

#[test]
fn ingest_defaults_output_path() {
    let cli = Cli::try_parse_from(["basket-cli", "ingest", "promo.txt"]).unwrap();
    match cli.command {
        Some(Commands::Ingest {
            input,
            output,
            store,
            keywords,
            dry_run,
            db,
            replace,
        }) => {
            assert!(!db && !replace);
            assert_eq!(input, PathBuf::from("promo.txt"));
            assert_eq!(output, PathBuf::from("products_data.json"));
            assert!(store.is_none());
            assert!(keywords.is_empty());
            assert!(!dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn ingest_repeats_keyword_flag() {
    let cli = Cli::try_parse_from([
        "basket-cli",
        "ingest",
        "promo.txt",
        "--store",
        "Coles",
        "--keyword",
        "milk",
        "--keyword",
        "cheese",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ingest { ref store, ref keywords, .. })
            if store.as_deref() == Some("Coles") && keywords == &["milk", "cheese"]
    ));
}

#[test]
fn receipts_add_parses_price_and_date() {
    let cli = Cli::try_parse_from([
        "basket-cli",
        "receipts",
        "add",
        "Milk",
        "3.10",
        "--date",
        "2024-10-18",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Receipts {
            command:
                ReceiptsCommands::Add {
                    product,
                    price,
                    date,
                },
        }) => {
            assert_eq!(product, "Milk");
            assert_eq!(price, Decimal::new(310, 2));
            assert_eq!(date, NaiveDate::from_ymd_opt(2024, 10, 18));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn receipts_add_rejects_bad_price() {
    let result = Cli::try_parse_from(["basket-cli", "receipts", "add", "Milk", "cheap"]);
    assert!(result.is_err());
}

#[test]
fn receipts_delete_parses_product() {
    let cli = Cli::try_parse_from(["basket-cli", "receipts", "delete", "Milk"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Receipts {
            command: ReceiptsCommands::Delete { ref product }
        }) if product == "Milk"
    ));
}

#[test]
fn ingest_db_with_replace() {
    let cli = Cli::try_parse_from([
        "basket-cli",
        "ingest",
        "receipt.txt",
        "--store",
        "Coles",
        "--db",
        "--replace",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ingest {
            db: true,
            replace: true,
            ..
        })
    ));
}

#[test]
fn ingest_db_conflicts_with_output_and_dry_run() {
    assert!(Cli::try_parse_from([
        "basket-cli",
        "ingest",
        "receipt.txt",
        "--db",
        "--output",
        "out.json",
    ])
    .is_err());
    assert!(Cli::try_parse_from(["basket-cli", "ingest", "receipt.txt", "--db", "--dry-run"]).is_err());
}

#[test]
fn ingest_replace_requires_db() {
    assert!(Cli::try_parse_from(["basket-cli", "ingest", "receipt.txt", "--replace"]).is_err());
}
