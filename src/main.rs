use address_search::config::cli::Command;
use address_search::core::{AddressVerifier, LocationSearch};
use address_search::domain::model::LocationQuery;
use address_search::utils::{logger, validation::Validate};
use address_search::{
    AppConfig, BasisregistersClient, Cli, DiskCache, GeolocationClient, LocalStorage,
    LookupService, ReferenceStore, StoreBuilder,
};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<LookupService> {
    let api = BasisregistersClient::new(&config.api)?;
    let storage = LocalStorage::new(config.cache.directory.clone());
    let builder = StoreBuilder::new(
        api,
        DiskCache::new(storage, config.cache.disabled),
        config.fetch.policy(),
    );

    let store = Arc::new(ReferenceStore::new());
    builder
        .build(&store)
        .await
        .context("Failed to initialise store")?;
    Ok(LookupService::new(store))
}

async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let lookup = if cli.command.needs_store() {
        Some(build_store(&config).await?)
    } else {
        None
    };

    match (cli.command, lookup) {
        (Command::WarmCache, _) => {
            println!(
                "✅ Cache at {} is up to date",
                config.cache.directory.display()
            );
        }
        (Command::PostalNames { postal_code, province }, Some(lookup)) => {
            print_json(&lookup.postal_names(postal_code.as_deref(), province)?)?;
        }
        (Command::PostalCodes { postal_name, province }, Some(lookup)) => {
            print_json(&lookup.postal_codes(postal_name.as_deref(), province)?)?;
        }
        (Command::Provinces { postal_code, postal_name }, Some(lookup)) => {
            print_json(&lookup.provinces(postal_code.as_deref(), postal_name.as_deref())?)?;
        }
        (Command::Search { query }, _) => {
            let client = GeolocationClient::new(&config.api)?;
            print_json(&client.search(&query).await?)?;
        }
        (
            Command::VerifyAddress {
                municipality,
                street,
                house_number,
                postal_code,
            },
            _,
        ) => {
            let client = BasisregistersClient::new(&config.api)?;
            let location = LocationQuery {
                municipality,
                street,
                house_number,
                postal_code,
            };
            print_json(&client.verified_addresses(&location).await?)?;
        }
        (Command::Countries, _) => {
            print_json(&address_search::core::lookup::EUROPEAN_COUNTRIES)?;
        }
        (command, None) => anyhow::bail!("{:?} requires the reference store", command),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting address-search");

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(mut config) => {
            cli.apply_overrides(&mut config);
            config
        }
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli, config).await {
        tracing::error!("❌ {:#}", e);
        eprintln!("❌ {:#}", e);

        // 查詢錯誤與初始化失敗用不同的退出碼
        let exit_code = match e.downcast_ref::<address_search::StoreError>() {
            Some(err) if (400..500).contains(&err.status()) => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
