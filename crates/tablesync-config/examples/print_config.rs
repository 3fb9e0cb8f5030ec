/// Example program to print the loaded configuration
///
/// Run with: cargo run -p tablesync-config --example print_config

fn main() {
    // Load configuration from tablesync.toml
    let config = tablesync_config::TableSyncConfig::load();

    println!("=== tablesync Configuration ===\n");

    println!("Style Rules:");
    println!("  Border: {}", config.style_rules.border);
    println!("  Background: {}", config.style_rules.background);
    println!("  Padding: {}", config.style_rules.padding);
    println!();

    println!("View Settings:");
    println!("  Wrapper Element: {}", config.view.wrapper_element);
    println!("  Diagnostics: {:?}", config.diagnostics);
    println!();

    println!("Table Defaults:");
    println!("  {:?}", config.table_defaults());
    println!();

    println!("Table Cell Defaults:");
    println!("  {:?}", config.table_cell_defaults());
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
