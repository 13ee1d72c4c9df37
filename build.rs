fn main() {
    // Config values baked into the device image; see `AgentConfig::from_build_env`.
    for key in [
        "WIFI_SSID",
        "WIFI_PASSWORD",
        "BROKER",
        "PORT",
        "INATORNAME",
        "INATORTOPIC",
        "ACQUIRETIME",
    ] {
        println!("cargo:rerun-if-env-changed={key}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
