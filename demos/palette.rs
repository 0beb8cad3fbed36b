//! Palette dump - the host-facing operation catalog.
//!
//! This example demonstrates:
//! - Rendering the catalog embedding hosts build their block palette from
//! - The 1:1 mapping between catalog entries and session operations
//! - Locale selection for display text
//!
//! # Running
//!
//! ```bash
//! cargo run --example palette
//! ```

use aibot_link::descriptor::{build_descriptor, Locale};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let raw = build_descriptor(Locale::from_tag("en"));
    let catalog: serde_json::Value = serde_json::from_str(&raw)?;

    println!("extension {} ({})", catalog["name"], catalog["id"]);

    let operations = catalog["operations"]
        .as_array()
        .expect("catalog has operations");
    println!("{} operations:", operations.len());
    for op in operations {
        println!(
            "  {:8}  {:24}  {}",
            op["kind"].as_str().unwrap_or(""),
            op["op"].as_str().unwrap_or(""),
            op["text"].as_str().unwrap_or(""),
        );
    }

    let menus = catalog["menus"].as_object().expect("catalog has menus");
    let names: Vec<&str> = menus.keys().map(String::as_str).collect();
    println!("{} menus: {}", menus.len(), names.join(", "));

    // The Korean catalog swaps display text only; shapes are identical.
    let korean: serde_json::Value = serde_json::from_str(&build_descriptor(Locale::Ko))?;
    for op in korean["operations"].as_array().expect("catalog has operations") {
        if op["op"] == "set_angles_1234" {
            println!("ko text for set_angles_1234: {}", op["text"]);
        }
    }

    Ok(())
}
