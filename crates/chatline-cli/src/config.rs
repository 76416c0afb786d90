//! Client configuration.
//!
//! Every option can come from a flag or from the environment; flags win.
//!
//! | Flag                   | Variable                      | Default                  |
//! |------------------------|-------------------------------|--------------------------|
//! | `--base-url`           | `CHATLINE_BASE_URL`           | `http://127.0.0.1:5000`  |
//! | `--fallback-delay-ms`  | `CHATLINE_FALLBACK_DELAY_MS`  | `600`                    |
//! | `--allow-overlap`      | `CHATLINE_ALLOW_OVERLAP`      | off                      |
//! | `--status-style`       | `CHATLINE_STATUS_STYLE`       | `compact`                |
//! | `--log-file`           | `CHATLINE_LOG_FILE`           | see [`ClientArgs::log_path`] |

use std::path::PathBuf;
use std::time::Duration;

use chatline_models::{BaseUrl, StatusLabelStyle, DEFAULT_BASE_URL};
use chatline_widget::WidgetConfig;
use clap::Args;

const APP_DIR: &str = "chatline";
const LOG_FILE: &str = "chatline.log";

#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Root URL of the chat backend
    #[arg(long, env = "CHATLINE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: BaseUrl,

    /// Pause before a fallback answer is shown, in milliseconds
    #[arg(long, env = "CHATLINE_FALLBACK_DELAY_MS", default_value_t = 600, global = true)]
    pub fallback_delay_ms: u64,

    /// Allow sending while a previous request is still in flight
    #[arg(long, env = "CHATLINE_ALLOW_OVERLAP", global = true)]
    pub allow_overlap: bool,

    /// Status line style: compact or detailed
    #[arg(long, env = "CHATLINE_STATUS_STYLE", default_value_t = StatusLabelStyle::Compact, global = true)]
    pub status_style: StatusLabelStyle,

    /// Where the interactive UI writes its logs
    #[arg(long, env = "CHATLINE_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

impl ClientArgs {
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            fallback_delay: Duration::from_millis(self.fallback_delay_ms),
            allow_overlap: self.allow_overlap,
            status_style: self.status_style,
            ..WidgetConfig::default()
        }
    }

    /// Log destination for the interactive UI: `--log-file`, else
    /// `<cache dir>/chatline/chatline.log`. `None` if neither is available.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR).join(LOG_FILE)))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        client: ClientArgs,
    }

    fn parse(args: &[&str]) -> ClientArgs {
        let mut argv = vec!["chatline"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().client
    }

    #[test]
    fn flags_map_onto_widget_config() {
        let args = parse(&[
            "--base-url",
            "http://chat.local:8080/",
            "--fallback-delay-ms",
            "0",
            "--allow-overlap",
            "--status-style",
            "detailed",
        ]);
        assert_eq!(args.base_url.as_str(), "http://chat.local:8080");

        let cfg = args.widget_config();
        assert_eq!(cfg.fallback_delay, Duration::ZERO);
        assert!(cfg.allow_overlap);
        assert_eq!(cfg.status_style, StatusLabelStyle::Detailed);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let argv = ["chatline", "--base-url", "localhost:5000"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn explicit_log_file_wins() {
        let args = parse(&["--log-file", "/tmp/chat.log"]);
        assert_eq!(args.log_path(), Some(PathBuf::from("/tmp/chat.log")));
    }
}
