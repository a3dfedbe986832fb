use named_primitive_ref::users_components;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // `--inline` shows the output with deduplication of named primitives off
    let inline = std::env::args().skip(1).any(|arg| arg == "--inline");
    let components = users_components(!inline)?;

    println!("{}", serde_json::to_string_pretty(&components)?);
    Ok(())
}
