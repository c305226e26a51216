use ingress_canary::annotations::canary::Config;

fn main() -> anyhow::Result<()> {
    // JSON Schema of the canary config consumed by the backend-weighting layer
    // Use: cargo run --bin gen-schema > canary-config.schema.json
    let schema = schemars::schema_for!(Config);

    let json_output = serde_json::to_string_pretty(&schema)?;
    println!("{}", json_output);
    Ok(())
}
