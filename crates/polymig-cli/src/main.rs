use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use polymig_core::{
    convert_to_network_rule_set_policies, import_from_file, to_pretty_json, ExternalNetwork,
    NetworkRuleSetPolicy, SystemClock,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "polymig")]
#[command(version, about = "Migrate network access policies to rule-set policies", long_about = None)]
struct Cli {
    /// Path to the YAML document holding external networks and network access policies.
    #[arg(short, long, default_value = "./input.yaml")]
    input: PathBuf,

    /// Path to write the consolidated JSON result. Printed to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print each imported and translated object as it is processed.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MigrationOutput {
    external_networks: Vec<ExternalNetwork>,
    rule_set_policies: Vec<NetworkRuleSetPolicy>,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "migration failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(path = %cli.input.display(), "importing document");
    let imported = import_from_file(&cli.input)
        .with_context(|| format!("failed to import '{}'", cli.input.display()))?;

    if cli.verbose {
        for en in &imported.external_networks {
            println!("imported external network: {}", to_pretty_json(en)?);
        }
        for np in &imported.network_access_policies {
            println!("imported network access policy: {}", to_pretty_json(np)?);
        }
    }

    let clock = SystemClock;
    let mut rule_set_policies = Vec::new();

    // Consolidated, amended external networks: only those actually matched
    // by a rule, keyed by name so a network matched by more than one policy
    // is emitted once (last write wins, mirroring the `enmap[net.Name] = net`
    // consolidation this is grounded on).
    let mut external_networks: Vec<ExternalNetwork> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for nap in &imported.network_access_policies {
        tracing::info!(name = %nap.name, "translating network access policy");
        let (policies, matched) =
            convert_to_network_rule_set_policies(nap, &imported.external_networks, &clock)
                .with_context(|| format!("failed to translate policy '{}'", nap.name))?;

        if cli.verbose {
            for policy in &policies {
                println!("emitted rule-set policy: {}", to_pretty_json(policy)?);
            }
        }

        rule_set_policies.extend(policies);
        for network in matched {
            match index_by_name.get(&network.name) {
                Some(&idx) => external_networks[idx] = network,
                None => {
                    index_by_name.insert(network.name.clone(), external_networks.len());
                    external_networks.push(network);
                }
            }
        }
    }

    let output = MigrationOutput {
        external_networks,
        rule_set_policies,
    };
    let rendered = to_pretty_json(&output)?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            println!("wrote migration result to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
