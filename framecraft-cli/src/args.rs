//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "framecraft")]
#[command(
    version,
    about = "Protocol header composition and frame crafting tool",
    long_about = None
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered protocols
    List,

    /// Show the fields of a protocol
    Help {
        /// Protocol name (eth, arp, ipv4, ipv6, udp, tcp)
        #[arg(value_name = "PROTOCOL")]
        protocol: String,
    },

    /// Build a frame and print it as hex
    Hex {
        /// Frame description, e.g. `ipv4 sip 10.0.0.1 ... udp sport 53 ... data 0a0b`
        #[arg(value_name = "FRAME", required = true, num_args = 1..)]
        frame: Vec<String>,
    },

    /// Build a frame and write the raw bytes to a file
    Write {
        /// Output file
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// Frame description
        #[arg(value_name = "FRAME", required = true, num_args = 1..)]
        frame: Vec<String>,
    },
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
