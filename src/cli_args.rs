use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser)]
#[command(author, about, version)]
pub struct CliArgs {
    /// Path to the YAML configuration file.
    #[clap(long, env = "BOOKS_API_CONFIG_FILE", default_value = "config.yaml")]
    pub config_file: String,

    /// Overrides the `socket_address` of the configuration file.
    #[clap(long, env = "BOOKS_API_SOCKET_ADDRESS")]
    pub socket_address: Option<SocketAddr>,
}
