//! Demonstration workflow against a running toolwire server.
//!
//! Start the server first, then run this binary; it drives the sample
//! tools and resources through the client gateway and prints each result.

use std::env;

use serde_json::Value;
use toolwire::client::Gateway;
use toolwire::errors::ClientError;

fn print_result(label: &str, value: &Value) {
    println!("\n[{label}]");
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

async fn run_workflow(gateway: &Gateway) -> Result<(), ClientError> {
    println!("=== Calculator operations ===");

    let sum = gateway.add_numbers(15.0, 27.0).await?;
    print_result("15 + 27", &sum);

    for (a, b) in [(5.0, 4.0), (12.0, 3.0), (100.0, 2.5)] {
        let product = gateway.multiply_numbers(a, b).await?;
        println!("  {a} x {b} = {}", product["result"]);
    }

    let numbers: Vec<f64> = (1..=10).map(|n| (n * 10) as f64).collect();
    let stats = gateway.calculate_statistics(&numbers).await?;
    print_result("statistics", &stats);

    println!("\n=== User management ===");
    let users = gateway.list_users().await?;
    print_result("all users", &users);
    let user = gateway.get_user(1).await?;
    print_result("user 1", &user);

    println!("\n=== Task management ===");
    let tasks = gateway.get_tasks(None).await?;
    print_result("all tasks", &tasks);
    let pending = gateway.get_tasks(Some("pending")).await?;
    print_result("pending tasks", &pending);
    let created = gateway.create_task("Setup testing environment", 1).await?;
    print_result("created task", &created);

    println!("\n=== Resources ===");
    let config = gateway.read_config_resource().await?;
    print_result("config", &config);
    let summary = gateway.read_summary_resource().await?;
    print_result("summary", &summary);
    let users_resource = gateway.read_users_resource().await?;
    print_result("users resource", &users_resource);

    println!("\n=== Error handling ===");
    match gateway
        .call_tool("add_numbers", serde_json::json!({"a": 15}))
        .await
    {
        Ok(value) => println!("unexpected success: {value}"),
        Err(err) => println!("server rejected the call as expected: {err}"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        env::var("TOOLWIRE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    println!("connecting to {base_url}");
    let gateway = Gateway::new(base_url)?;
    run_workflow(&gateway).await?;

    Ok(())
}
