use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use sm_inference::{Backend, Config, DEFAULT_CACHE_CAPACITY};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "sm",
    author,
    version,
    about = "Summarize news articles, text and PDF files",
    long_about = None
)]
pub struct Cli {
    /// Model backend: pegasus (local weights), huggingface (inference endpoint) or lead (offline)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,
    /// Base URL of the inference endpoint; the model id is appended to it
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    #[arg(long, global = true, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Reload models for every request instead of keeping them in memory
    #[arg(long, global = true)]
    pub no_cache: bool,
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,
    /// Log at debug level instead of info
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a news article
    Url {
        url: String,
        /// Maximum number of words for the summary (10-100)
        #[arg(long)]
        length: Option<usize>,
    },
    /// Summarize text given as an argument, or read from stdin when omitted or "-"
    Text {
        text: Option<String>,
        #[arg(long)]
        length: Option<usize>,
    },
    /// Summarize a PDF file page by page, or as a whole
    Pdf {
        file: PathBuf,
        /// One summary for the whole file instead of one per page
        #[arg(long)]
        whole: bool,
        /// Number of leading pages to summarize (page-wise only)
        #[arg(long, conflicts_with = "whole")]
        pages: Option<usize>,
        #[arg(long)]
        length: Option<usize>,
    },
    /// Serve the web interface and JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

impl Cli {
    pub fn inference_config(&self) -> Config {
        Config {
            backend: self.backend.unwrap_or_default(),
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            cache: !self.no_cache,
            cache_capacity: self.cache_capacity,
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pdf_command() {
        let args = ["sm", "--backend", "lead", "pdf", "doc.pdf", "--pages", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.backend, Some(Backend::Lead));
        match cli.command {
            Commands::Pdf { file, whole, pages, length } => {
                assert_eq!(file, PathBuf::from("doc.pdf"));
                assert!(!whole);
                assert_eq!(pages, Some(3));
                assert_eq!(length, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_pages_conflicts_with_whole() {
        assert!(Cli::try_parse_from(["sm", "pdf", "doc.pdf", "--whole", "--pages", "2"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sm", "text", "hello", "--no-cache", "-vv"]).unwrap();
        let config = cli.inference_config();
        assert!(!config.cache);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_default_log_level_is_info() {
        let cli = Cli::try_parse_from(["sm", "serve"]).unwrap();
        assert_eq!(cli.log_level(), Level::INFO);

        let cli = Cli::try_parse_from(["sm", "-v", "serve"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_from(["sm", "--backend", "gpt", "text", "hello"]).is_err());
    }

    #[test]
    fn test_serve_default_addr() {
        let cli = Cli::try_parse_from(["sm", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { addr } => assert_eq!(addr.port(), 8080),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
