fn main() {
    // Validate the embedded default config at compile time.
    validate_toml(
        "src/default_config.toml",
        include_str!("src/default_config.toml"),
    );

    println!("cargo:rerun-if-changed=src/default_config.toml");
}

fn validate_toml(path: &str, content: &str) {
    content
        .parse::<toml::Value>()
        .unwrap_or_else(|e| panic!("{path} contains invalid TOML: {e}"));
}
