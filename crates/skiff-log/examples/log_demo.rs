use skiff_log::{LoggingClient, Overrides, SessionDefaults};

#[tokio::main]
async fn main() {
    println!("=== skiff structured logging demo ===\n");

    // 1. Build a client with session defaults
    println!("1. Constructing the logging client");
    let defaults = SessionDefaults {
        logging_url: "http://logging:5100/api/log".to_string(),
        source: "demo".to_string(),
        destinations: vec!["web".to_string(), "teams".to_string()],
        group: "System".to_string(),
        category: "Demo".to_string(),
        alert: "None".to_string(),
        severity: "Info".to_string(),
        teams_chat_id: None,
    };
    let client = LoggingClient::new(defaults).unwrap();
    println!("Client ready\n");

    // 2. Log with defaults only
    println!("2. Logging with session defaults");
    let outcomes = client.log("service started", Overrides::new()).await.unwrap();
    for (destination, outcome) in &outcomes {
        println!("  {} -> {:?}", destination, outcome);
    }
    println!();

    // 3. Log with per-call overrides
    println!("3. Logging with overrides");
    let outcomes = client
        .log(
            "login rejected",
            Overrides::new()
                .severity("error")
                .category("Authentication")
                .teams_msg("Login failures are spiking, check the dashboard"),
        )
        .await
        .unwrap();
    for (destination, outcome) in &outcomes {
        println!("  {} -> {:?}", destination, outcome);
    }
    println!();

    // 4. Validation failures never reach the wire
    println!("4. A bad severity fails before any request");
    let err = client
        .log("x", Overrides::new().severity("shouting"))
        .await
        .unwrap_err();
    println!("  {}", err);
}
