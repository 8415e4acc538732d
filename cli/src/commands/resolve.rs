//! RESOLVE command - Print the route table of a manifest.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use routegraph_core::RouteTable;
use routegraph_resolver::{ConflictPolicy, Resolver, ResolverConfig, TableOrder};
use tracing::debug;

use super::{HumanReadable, load_store, output, paint_method};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Path to the JSON declaration manifest
    pub manifest: PathBuf,

    /// Fail when more inclusion paths than this are discovered
    #[arg(long)]
    pub max_paths: Option<usize>,

    /// Drop endpoints with conflicting response models instead of failing
    #[arg(long)]
    pub collect_conflicts: bool,

    /// Order the table by path and method instead of discovery order
    #[arg(long)]
    pub sorted: bool,
}

impl ResolveArgs {
    /// Applies command-line overrides on top of the environment configuration.
    fn config(&self, base: ResolverConfig) -> ResolverConfig {
        let mut config = base;
        if let Some(limit) = self.max_paths {
            config = config.with_max_inclusion_paths(limit);
        }
        if self.collect_conflicts {
            config = config.with_conflict_policy(ConflictPolicy::Collect);
        }
        if self.sorted {
            config = config.with_order(TableOrder::Sorted);
        }
        config
    }
}

impl HumanReadable for RouteTable {
    fn print_human(&self) {
        println!("{}", "Route Table".green().bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.is_empty() {
            println!("  {}", "(No endpoints reachable from the root)".dimmed());
        }

        for endpoint in self {
            let path = if endpoint.deprecated {
                endpoint.path.strikethrough()
            } else {
                endpoint.path.bold()
            };
            print!("  {} {}", paint_method(&endpoint.method), path);
            if let Some(summary) = endpoint.summary.as_deref() {
                print!(" {}", format!("- {}", summary).dimmed());
            }
            println!();

            if !endpoint.tags.is_empty() {
                println!("    {} {}", "Tags:".cyan(), endpoint.tags.join(", "));
            }
            if let Some(model) = endpoint.response_model.as_deref() {
                println!("    {} {}", "Response:".cyan(), model);
            }
            if let Some(code) = endpoint.status_code {
                println!("    {} {}", "Status:".cyan(), code);
            }
            if !endpoint.dependencies.is_empty() {
                println!(
                    "    {} {}",
                    "Dependencies:".cyan(),
                    endpoint.dependencies.join(" -> ")
                );
            }
            if endpoint.deprecated {
                println!("    {}", "DEPRECATED".red());
            }
            if endpoint.inclusion_paths.len() > 1 {
                println!(
                    "    {} {}",
                    "Reached via:".cyan(),
                    format!("{} inclusion paths", endpoint.inclusion_paths.len()).dimmed()
                );
            }
        }

        if !self.warnings.is_empty() {
            println!();
            println!("{}", "Conflicts".yellow().bold());
            for warning in &self.warnings {
                println!("  {} {}", "!".yellow(), warning);
            }
        }

        println!();
        println!("  {} {}", "Total:".cyan(), self.len());
    }
}

/// Resolve the manifest into a route table.
pub(super) fn run(args: &ResolveArgs, base: ResolverConfig) -> Result<RouteTable> {
    let store = load_store(&args.manifest)?;
    let config = args.config(base);
    debug!(?config, "Resolving manifest");

    Ok(Resolver::new(config).resolve(&store)?)
}

/// Execute the resolve command.
pub fn execute(human: bool, args: ResolveArgs) -> Result<()> {
    let table = run(&args, ResolverConfig::from_env()?)?;
    output(&table, human)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{USERS_MANIFEST, manifest_file};

    fn args(manifest: PathBuf) -> ResolveArgs {
        ResolveArgs {
            manifest,
            max_paths: None,
            collect_conflicts: false,
            sorted: false,
        }
    }

    #[test]
    fn flags_override_environment_config() {
        let mut a = args(PathBuf::from("routes.json"));
        a.sorted = true;
        a.max_paths = Some(8);

        let base = ResolverConfig::default().with_max_inclusion_paths(100);
        let config = a.config(base);
        assert_eq!(config.max_inclusion_paths, Some(8));
        assert_eq!(config.order, TableOrder::Sorted);
        assert_eq!(config.conflict_policy, ConflictPolicy::Abort);
    }

    #[test]
    fn unset_flags_keep_environment_config() {
        let a = args(PathBuf::from("routes.json"));
        let base = ResolverConfig::default()
            .with_max_inclusion_paths(100)
            .with_conflict_policy(ConflictPolicy::Collect);
        let config = a.config(base);
        assert_eq!(config.max_inclusion_paths, Some(100));
        assert_eq!(config.conflict_policy, ConflictPolicy::Collect);
    }

    #[test]
    fn resolves_manifest_file() {
        let file = manifest_file(USERS_MANIFEST);
        let table = run(&args(file.path().to_path_buf()), ResolverConfig::default()).unwrap();

        let lines: Vec<_> = table.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "GET /health",
                "GET /api/v1/users/ [users] -> List[User]",
                "DELETE /api/v1/users/{user_id} [users] [DEPRECATED]",
            ]
        );
    }

    #[test]
    fn path_limit_surfaces_as_error() {
        let file = manifest_file(USERS_MANIFEST);
        let mut a = args(file.path().to_path_buf());
        a.max_paths = Some(1);

        let err = run(&a, ResolverConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "inclusion path limit of 1 exceeded");
    }
}
