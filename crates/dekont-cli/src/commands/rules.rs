//! Rules command - print the detector chain and the extractor keys.

use console::style;

use dekont_core::classify::rules;
use dekont_core::registered_keys;

pub async fn run() -> anyhow::Result<()> {
    println!("{}", style("Detector rules (first match wins)").bold());
    println!(
        "{:>3}  {:<5}  {:<16}  {:<16}  {}",
        "#", "STAGE", "KEY", "BANK", "MATCH"
    );

    for (idx, rule) in rules().iter().enumerate() {
        let bank = match rule.variant {
            Some(variant) => format!("{} {}", rule.issuer.name(), variant),
            None => rule.issuer.name().to_string(),
        };
        println!(
            "{:>3}  {:<5}  {:<16}  {:<16}  {}",
            idx + 1,
            rule.stage.as_str(),
            rule.key,
            bank,
            rule.describe()
        );
    }

    let keys = registered_keys();
    println!();
    println!(
        "{} ({})",
        style("Registered extractor keys").bold(),
        keys.len()
    );
    for key in keys {
        println!("  {}", key);
    }

    Ok(())
}
