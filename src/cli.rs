use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use beelabel::data::ImageSource;

#[derive(Parser)]
#[command(name = "beelabel")]
#[command(about = "Classify bee crops into garbage/normal/atypical and export the labels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Session to work on (defaults to the configured session)
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Directory holding saved sessions
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Label images interactively
    Label(LabelArgs),

    /// Export the labels of the session
    Export {
        /// Export format, json or yolo-zip (default: yolo-zip for
        /// annotated archives, json otherwise)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (default: dated file name in the export folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave image files out of archive exports
        #[arg(long)]
        no_images: bool,
    },

    /// Show progress of the saved session
    Status,

    /// Forget the saved session
    Reset,

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Args)]
pub struct LabelArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Scan the folder recursively
    #[arg(short, long, requires = "folder")]
    pub recursive: bool,

    /// Start over even if a saved session exists
    #[arg(long)]
    pub fresh: bool,

    /// Item to start at (1-based)
    #[arg(long)]
    pub start: Option<usize>,

    /// Where to write the crop preview
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

#[derive(Args)]
#[group(multiple = false)]
pub struct SourceArgs {
    /// ZIP archive with images and YOLO annotations
    #[arg(long)]
    pub zip: Option<PathBuf>,

    /// Folder of images
    #[arg(long)]
    pub folder: Option<PathBuf>,

    /// Directory listing URL or saved HTML file
    #[arg(long)]
    pub listing: Option<String>,

    /// Individual image files, in order
    #[arg(long, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl SourceArgs {
    /// The source named on the command line, if any.
    pub fn image_source(&self, recursive: bool) -> Option<ImageSource> {
        if let Some(path) = &self.zip {
            Some(ImageSource::Archive { path: path.clone() })
        } else if let Some(path) = &self.folder {
            Some(ImageSource::Folder {
                path: path.clone(),
                recursive,
            })
        } else if let Some(location) = &self.listing {
            Some(ImageSource::Listing {
                location: location.clone(),
            })
        } else if !self.files.is_empty() {
            Some(ImageSource::Files(self.files.clone()))
        } else {
            None
        }
    }
}
