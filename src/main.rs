mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use vulnharvest::{config, output, plugins, scan};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            format,
            output: output_path,
            plugin,
            config: config_path,
        } => {
            if !path.exists() {
                eprintln!("Error: path does not exist: {}", path.display());
                std::process::exit(2);
            }

            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            let known: Vec<&str> = plugins::all_plugins().iter().map(|p| p.name()).collect();
            for name in &plugin {
                if !known.contains(&name.as_str()) {
                    eprintln!("Error: unknown plugin: {name}");
                    eprintln!("Use 'vulnharvest list-plugins' to see all available plugins.");
                    std::process::exit(2);
                }
            }

            let report = scan::run_scan(&path, &config, &plugin);
            let formatted = output::format_scan_report(&report, &format);

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                print!("{formatted}");
            }

            std::process::exit(if report.success { 0 } else { 1 });
        }

        Commands::ParseReport {
            file,
            output: output_path,
            config: config_path,
        } => {
            if !file.is_file() {
                eprintln!("Error: not a file: {}", file.display());
                std::process::exit(2);
            }

            let config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            let report = plugins::ncc_report::parse_report_file(&file, &config)
                .unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                });

            let formatted =
                serde_json::to_string_pretty(&report).expect("JSON serialization failed");

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &formatted).unwrap_or_else(|e| {
                    eprintln!("Error writing output: {e}");
                    std::process::exit(2);
                });
                eprintln!("Output written to {}", out_path.display());
            } else {
                println!("{formatted}");
            }
        }

        Commands::ListPlugins => {
            println!("{}", "Registered Plugins".bold().underline());
            println!();

            let all = plugins::all_plugins();
            for plugin in &all {
                println!(
                    "  {name:<14} {desc}",
                    name = plugin.name().bold(),
                    desc = plugin.description(),
                );
            }

            println!();
            println!("  Total: {} plugins", all.len());
        }

        Commands::CheckTools => {
            println!("{}", "Plugin Availability".bold().underline());
            println!();

            let all = plugins::all_plugins();
            for plugin in &all {
                let status = if plugin.is_available() {
                    "READY".green().bold().to_string()
                } else {
                    "NOT AVAILABLE".red().to_string()
                };

                println!(
                    "  [{status}] {name:<14} {desc}",
                    name = plugin.name(),
                    desc = plugin.description(),
                );
            }

            println!();
            println!(
                "Note: Built-in plugins (ncc_report, express_api, apigee_api) require no external tools."
            );
        }
    }
}
