use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

mod passphrase;

use rediseal::crypto::{self, IV_SEED_LEN, SALT_LEN};
use rediseal::{Config, Rediseal, RedisStore};

#[derive(Debug, Parser)]
#[command(name = "rediseal")]
#[command(
    version,
    about = "Transparent client-side encryption for values stored in Redis/Valkey."
)]
struct Cli {
    /// Store connection URL
    #[arg(long, global = true, value_name = "URL", env = "REDISEAL_URL")]
    url: Option<String>,

    /// Path to a name=value key file
    #[arg(long, global = true, value_name = "PATH", env = "REDISEAL_KEYFILE")]
    keyfile: Option<PathBuf>,

    /// Raw 128-bit key as at least 32 hex characters
    #[arg(id = "key_hex", long = "key", global = true, value_name = "HEX", env = "REDISEAL_KEY")]
    key: Option<String>,

    /// Path to a JSON config file
    #[arg(long, global = true, value_name = "PATH", env = "REDISEAL_CONFIG")]
    config: Option<PathBuf>,

    /// Skip encryption and store/fetch raw values
    #[arg(long, global = true, default_value_t = false)]
    plaintext: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetches and decrypts a value
    #[command(arg_required_else_help = true)]
    Get { key: String },

    /// Encrypts and stores a value
    #[command(arg_required_else_help = true)]
    Set { key: String, value: String },

    /// Deletes a key
    #[command(arg_required_else_help = true)]
    Del { key: String },

    /// Checks whether a key exists
    #[command(arg_required_else_help = true)]
    Exists { key: String },

    /// Checks the store connection
    Ping,

    /// Generates a fresh key file with a random salt and IV
    #[command(arg_required_else_help = true)]
    Keygen {
        /// Where to write the key file
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(keyfile) = &cli.keyfile {
        config.keyfile = Some(keyfile.clone());
    }
    if let Some(key) = &cli.key {
        config.key_hex = Some(key.clone());
    }

    Ok(config)
}

/// Opens a session. Key material is only required for commands that
/// touch values; key bookkeeping and ping work without it.
fn open_session(cli: &Cli, need_crypt: bool) -> Result<Rediseal<RedisStore>> {
    let config = resolve_config(cli)?;

    if cli.plaintext || !need_crypt {
        let store = RedisStore::connect(&config.url)?;
        return Ok(Rediseal::with_store(store));
    }

    // resolve key material before dialing the store so configuration
    // errors surface without a live connection
    let Some(material) = config.key_material()? else {
        bail!("no key material configured; set --keyfile or --key, or pass --plaintext");
    };

    let store = RedisStore::connect(&config.url)?;
    let mut db = Rediseal::with_store(store);
    db.enable_crypt(material);
    Ok(db)
}

fn keygen(out: &Path) -> Result<()> {
    let passphrase = passphrase::read_passphrase()?;

    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_SEED_LEN];
    getrandom::fill(&mut salt).map_err(|_| anyhow::anyhow!("OS random generator unavailable"))?;
    getrandom::fill(&mut iv).map_err(|_| anyhow::anyhow!("OS random generator unavailable"))?;

    let contents = Zeroizing::new(format!(
        "salt={}\nkey={}\niv={}\n",
        hex::encode(salt),
        passphrase.as_str(),
        hex::encode(iv)
    ));
    fs::write(out, contents.as_bytes())
        .with_context(|| format!("could not write key file {}", out.display()))?;

    // make sure what we wrote actually loads
    crypto::load_key_file(out)?;

    println!("key file written to {}", out.display());
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Keygen { out } => keygen(out)?,
        Commands::Get { key } => {
            let mut db = open_session(&cli, true)?;
            match db.get(key)? {
                Some(value) => println!("{value}"),
                None => println!("key not found"),
            }
        }
        Commands::Set { key, value } => {
            let mut db = open_session(&cli, true)?;
            db.set(key, value)?;
            println!("stored '{key}'");
        }
        Commands::Del { key } => {
            let mut db = open_session(&cli, false)?;
            if db.del(key)? {
                println!("deleted '{key}'");
            } else {
                println!("key not found");
            }
        }
        Commands::Exists { key } => {
            let mut db = open_session(&cli, false)?;
            println!("{}", db.exists(key)?);
        }
        Commands::Ping => {
            let mut db = open_session(&cli, false)?;
            db.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}
