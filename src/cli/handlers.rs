//! CLI command handlers

use super::commands::{RulesArgs, ScanArgs};
use crate::config::ScanConfig;
use crate::output::ScanReport;
use crate::rules::RuleSet;
use crate::scanner::Scanner;
use tracing::error;

/// Run a scan and emit the report. Returns the process exit code.
pub fn handle_scan(args: &ScanArgs) -> i32 {
    let mut config = ScanConfig::new(&args.path);
    config.rules_file = args.rules.clone();
    config.root_id_override = args.root_id.clone();
    config.remote_url = args.remote_url.clone();
    config.repo_subpath = args.repo_subpath.clone();
    config.require_deterministic = args.deterministic;

    let config = match config.apply_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return 2;
        }
    };

    let scanner = match Scanner::new(config) {
        Ok(scanner) => scanner,
        Err(err) => {
            error!("{err}");
            return 2;
        }
    };

    let outcome = match scanner.scan() {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("scan failed: {err}");
            return 1;
        }
    };

    let report = ScanReport::new(&outcome.tree, outcome.root_id);
    let rendered = if args.pretty {
        report.to_json_pretty()
    } else {
        report.to_json()
    };
    let rendered = match rendered {
        Ok(rendered) => rendered,
        Err(err) => {
            error!("failed to serialize report: {err}");
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, rendered) {
                error!("failed to write {}: {err}", path.display());
                return 1;
            }
        }
        None => println!("{rendered}"),
    }
    0
}

/// Print the active rule set as JSON.
pub fn handle_rules(args: &RulesArgs) -> i32 {
    let rules = match &args.rules {
        Some(path) => match RuleSet::from_file(path) {
            Ok(rules) => rules,
            Err(err) => {
                error!("{err}");
                return 2;
            }
        },
        None => RuleSet::builtin(),
    };
    match serde_json::to_string_pretty(&rules) {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(err) => {
            error!("failed to serialize rules: {err}");
            1
        }
    }
}
