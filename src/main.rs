use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use zengin::{Config, Zengin};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["build", export, rest @ ..] => run_build(export, rest),
        ["bank", key] => run_bank_search(key),
        ["major"] => run_major(),
        ["branches", bank_code] => run_branches(bank_code),
        ["branch", bank_code, key] => run_branch_search(bank_code, key),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  zengin build <export.csv> [store.db] [document.json]");
    eprintln!("  zengin bank <code|kana|name>");
    eprintln!("  zengin major");
    eprintln!("  zengin branches <bank_code>");
    eprintln!("  zengin branch <bank_code> <code|kana|name>");
    eprintln!();
    eprintln!("The store location defaults to $ZENGIN_DB or ./zengin.db");
}

fn run_build(export: &str, rest: &[&str]) -> Result<()> {
    println!("🗄️  Zengin build - export → hierarchy → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = match rest.first() {
        Some(path) => PathBuf::from(path),
        None => Config::from_env().db_path,
    };
    let json_path = rest.get(1).map(PathBuf::from);

    let stats = zengin::build(PathBuf::from(export).as_path(), &db_path, json_path.as_deref())
        .with_context(|| format!("Failed to build store from {}", export))?;

    println!("✓ Banks:    {}", stats.banks);
    println!("✓ Branches: {}", stats.branches);
    println!("✓ Store:    {}", db_path.display());
    if let Some(json_path) = json_path {
        println!("✓ Document: {}", json_path.display());
    }

    Ok(())
}

fn open_store() -> Result<Zengin> {
    let config = Config::from_env();
    Zengin::open(&config.db_path).with_context(|| {
        format!(
            "Failed to open store {} (run `zengin build` first)",
            config.db_path.display()
        )
    })
}

fn run_bank_search(key: &str) -> Result<()> {
    let zengin = open_store()?;
    for bank in zengin.bank_search(key)? {
        println!("{}", bank);
    }
    zengin.close()?;
    Ok(())
}

fn run_major() -> Result<()> {
    let zengin = open_store()?;
    for bank in zengin.bank_major()? {
        println!("{}", bank);
    }
    zengin.close()?;
    Ok(())
}

fn run_branches(bank_code: &str) -> Result<()> {
    let zengin = open_store()?;
    for branch in zengin.bank_branches(bank_code)? {
        println!("{}", branch);
    }
    zengin.close()?;
    Ok(())
}

fn run_branch_search(bank_code: &str, key: &str) -> Result<()> {
    let zengin = open_store()?;
    for branch in zengin.branch_search(bank_code, key)? {
        println!("{}", branch);
    }
    zengin.close()?;
    Ok(())
}
