use colored::*;
use eyre::Result;

use crate::cli::{OutputFormat, SessionAction};
use crate::store::TrailStore;

pub fn run(action: SessionAction, store: &mut TrailStore) -> Result<()> {
    match action {
        SessionAction::Current => {
            println!("{}", store.settings().current_session);
            Ok(())
        }
        SessionAction::List { format } => list(OutputFormat::resolve(format), store),
        SessionAction::Create { name } => create(&name, store),
        SessionAction::Switch { name } => switch(&name, store),
    }
}

fn list(format: OutputFormat, store: &TrailStore) -> Result<()> {
    let current = &store.settings().current_session;
    let names: Vec<&String> = store.sessions().iter().collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&names)?),
        OutputFormat::Text => {
            println!("{}", "Sessions:".bold());
            for name in names {
                if name == current {
                    println!("  {} {}", "*".green(), name.green().bold());
                } else {
                    println!("    {}", name);
                }
            }
        }
    }
    Ok(())
}

fn create(name: &str, store: &mut TrailStore) -> Result<()> {
    if store.create_session(name)? {
        println!("{} Created session: {}", "✓".green(), name.cyan());
    } else {
        eyre::bail!("Session already exists: {}", name);
    }
    Ok(())
}

fn switch(name: &str, store: &mut TrailStore) -> Result<()> {
    store.set_current_session(name)?;
    println!("{} Switched to session: {}", "✓".green(), name.cyan());
    Ok(())
}
