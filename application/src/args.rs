//! Command line [`Args`].

use clap::Parser;

/// HTTP API server of the user management service.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file, which may be absent.
    #[arg(short, long, env = "CONF_FILE", default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses [`Args`] out of the command line and the environment.
    ///
    /// # Errors
    ///
    /// If the command line is malformed, or `--help`/`--version` is
    /// requested.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults_config_path() {
        let args = Args::try_parse_from(["user-mgmt-api"]).unwrap();
        assert_eq!(args.config, "config.toml");

        let args =
            Args::try_parse_from(["user-mgmt-api", "-c", "/etc/users.toml"])
                .unwrap();
        assert_eq!(args.config, "/etc/users.toml");
    }
}
