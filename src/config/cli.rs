use crate::config::AppConfig;
use crate::core::province::Province;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "address-search")]
#[command(about = "Postal code, postal name and address lookups for Flanders")]
pub struct Cli {
    /// TOML 設定檔，未指定時使用預設值
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override cache.directory")]
    pub cache_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Always query the API instead of the cache")]
    pub disable_cache: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fill the cache and build the indexes, then exit
    WarmCache,
    PostalNames {
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        province: Option<Province>,
    },
    PostalCodes {
        #[arg(long)]
        postal_name: Option<String>,
        #[arg(long)]
        province: Option<Province>,
    },
    Provinces {
        #[arg(long)]
        postal_code: Option<String>,
        #[arg(long)]
        postal_name: Option<String>,
    },
    /// Free-text address search
    Search { query: String },
    /// Look up the official addresses matching a location
    VerifyAddress {
        #[arg(long)]
        municipality: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        house_number: String,
        #[arg(long)]
        postal_code: String,
    },
    Countries,
}

impl Command {
    /// 需要先建立參考資料的指令
    pub fn needs_store(&self) -> bool {
        matches!(
            self,
            Command::WarmCache
                | Command::PostalNames { .. }
                | Command::PostalCodes { .. }
                | Command::Provinces { .. }
        )
    }
}

impl Cli {
    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.cache_dir {
            config.cache.directory = dir.clone();
        }
        if self.disable_cache {
            config.cache.disabled = true;
        }
    }
}
