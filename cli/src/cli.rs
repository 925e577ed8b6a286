use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "qrstamp")]
#[command(about = "Read, bump and compare createTime stamps in QR codes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode QR images and show their parameters
    Read {
        /// QR code images (PNG, JPEG, GIF, BMP, WebP)
        #[arg(required_unless_present = "stdin")]
        images: Vec<PathBuf>,

        /// Read payload text from stdin instead, one payload per line
        #[arg(long, conflicts_with = "images")]
        stdin: bool,
    },
    /// Add one hour to the createTime field and regenerate the QR code
    Bump {
        /// QR code image to read the payload from
        #[arg(required_unless_present_any = ["text", "stdin"])]
        image: Option<PathBuf>,

        /// Use this payload text instead of decoding an image
        #[arg(long, short = 't', conflicts_with_all = ["image", "stdin"])]
        text: Option<String>,

        /// Read the payload text from stdin
        #[arg(long, conflicts_with = "image")]
        stdin: bool,

        /// Where to write the regenerated QR code (PNG)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Image width in pixels (overrides config)
        #[arg(long)]
        width: Option<u32>,

        /// Quiet zone in modules (overrides config)
        #[arg(long)]
        margin: Option<u32>,
    },
    /// Compare the parameters of several QR codes
    Compare {
        /// QR code images to compare
        #[arg(required_unless_present = "stdin")]
        images: Vec<PathBuf>,

        /// Compare payloads read from stdin, one per line
        #[arg(long, conflicts_with = "images")]
        stdin: bool,
    },
    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
