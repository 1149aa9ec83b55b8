// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use fabdeploy::config::Inputs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fabdeploy")]
#[command(about = "Replace and publish custom libraries in Microsoft Fabric environments")]
#[command(version)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Settings file (default: fabdeploy.yml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fabdeploy.yml with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Replace the environment's custom library and publish it
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Library file to upload [env: FABRIC_FILE_PATH]
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Minutes to wait for each publish to finish
        #[arg(long, value_name = "MINUTES")]
        timeout_minutes: Option<u64>,
    },

    /// Show the environment's publish state and libraries
    Status {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Connection inputs. Each falls back to its FABRIC_* variable.
#[derive(Args)]
pub struct TargetArgs {
    /// Entra ID application (client) ID [env: FABRIC_CLIENT_ID]
    #[arg(long)]
    pub client_id: Option<String>,

    /// Entra ID client secret [env: FABRIC_CLIENT_SECRET]
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Entra ID tenant ID [env: FABRIC_TENANT_ID]
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// Fabric workspace ID [env: FABRIC_WORKSPACE_ID]
    #[arg(long)]
    pub workspace_id: Option<String>,

    /// Fabric environment ID [env: FABRIC_ENVIRONMENT_ID]
    #[arg(long)]
    pub environment_id: Option<String>,
}

impl TargetArgs {
    pub fn into_inputs(self, file_path: Option<PathBuf>) -> Inputs {
        Inputs {
            client_id: self.client_id,
            client_secret: self.client_secret,
            tenant_id: self.tenant_id,
            workspace_id: self.workspace_id,
            environment_id: self.environment_id,
            file_path,
        }
    }
}
